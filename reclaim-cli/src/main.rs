mod app;
mod headless;
mod logging;
mod tui;
mod ui;

use std::io::{self, stdout};
use std::path::PathBuf;

use clap::Parser;
use color_eyre::Result;
use crossterm::{
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend, style::Style, widgets::Widget};
use reclaim_core::{
    Category, Pipeline, PipelineConfig, TargetPath, WalkConfig, is_elevated, resolve_root,
};

use app::{Action, AppMode, AppState};
use headless::HeadlessOptions;
use tui::{AppEvent, EventHandler, handle_key};
use ui::{
    AppLayout, ConfirmCleanupView, Footer, Header, HelpView, LogView, ProgressView, StatsCards,
    Theme,
};

/// RECLAIM - Find and remove temporary files, caches and leftovers
#[derive(Parser, Debug)]
#[command(name = "reclaim")]
#[command(about = "Find and remove temporary files, caches and OS leftovers")]
#[command(version)]
struct Args {
    /// Extra directory to clean (repeatable)
    #[arg(short, long = "root", value_name = "PATH")]
    roots: Vec<PathBuf>,

    /// How deep extra directories are walked
    #[arg(short, long, default_value_t = 1)]
    depth: usize,

    /// Walker threads (0 = auto, 1 = serial)
    #[arg(short = 'j', long, default_value_t = 0)]
    threads: usize,

    /// Leave the update service running during cleanup
    #[arg(long)]
    no_service: bool,

    /// Do not empty the trash after cleanup
    #[arg(long)]
    keep_trash: bool,

    /// Skip the background size estimate
    #[arg(long)]
    no_estimate: bool,

    /// Plain line output instead of the interactive UI
    #[arg(long)]
    headless: bool,

    /// Answer yes to the cleanup confirmation (headless only)
    #[arg(short, long, requires = "headless")]
    yes: bool,

    /// Log file (defaults to the user cache dir)
    #[arg(long, value_name = "PATH")]
    log_file: Option<PathBuf>,
}

impl Args {
    fn pipeline_config(&self, roots: Vec<PathBuf>) -> PipelineConfig {
        let defaults = PipelineConfig::default();
        PipelineConfig {
            walk: WalkConfig {
                num_threads: self.threads,
            },
            service: if self.no_service { None } else { defaults.service },
            empty_trash: !self.keep_trash,
            extra_roots: roots
                .into_iter()
                .map(|root| TargetPath::new(root, Category::Custom(self.depth)))
                .collect(),
            ..defaults
        }
    }
}

fn main() -> Result<()> {
    color_eyre::install()?;

    let args = Args::parse();

    // Resolve and validate extra roots
    let mut roots = Vec::with_capacity(args.roots.len());
    for root in &args.roots {
        match resolve_root(root) {
            Ok(path) => roots.push(path),
            Err(e) => {
                eprintln!("Error: {}", e);
                std::process::exit(1);
            }
        }
    }

    let _guard = logging::init_logger(args.log_file.clone())?;

    let pipeline = Pipeline::system(args.pipeline_config(roots));

    if args.headless {
        let options = HeadlessOptions {
            estimate: !args.no_estimate,
            assume_yes: args.yes,
        };
        return headless::run(pipeline, &options);
    }

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    // Run app
    let result = run_app(&mut terminal, pipeline, &args);

    // Restore terminal
    disable_raw_mode()?;
    execute!(io::stdout(), LeaveAlternateScreen)?;

    result
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    pipeline: Pipeline,
    args: &Args,
) -> Result<()> {
    let theme = Theme::default();
    let mut state = AppState::new(pipeline, is_elevated());
    let event_handler = EventHandler::new(50); // 50ms tick rate

    if !args.no_estimate {
        state.start_estimate();
    }

    loop {
        state.update();
        let snapshot = state.snapshot();

        terminal.draw(|frame| {
            let area = frame.area();
            let layout = AppLayout::new(area);

            frame
                .buffer_mut()
                .set_style(area, Style::default().bg(theme.bg));

            Header::new(&state, &theme).render(layout.header, frame.buffer_mut());
            StatsCards::new(&snapshot, &theme).render(layout.stats, frame.buffer_mut());
            ProgressView::new(&state, &theme).render(layout.progress, frame.buffer_mut());
            LogView::new(&state.log, state.log_scroll, &theme)
                .render(layout.log, frame.buffer_mut());

            if state.mode == AppMode::Help {
                HelpView::new(&theme).render(area, frame.buffer_mut());
            }

            if state.mode == AppMode::ConfirmCleanup
                && let Some(request) = state.pending_cleanup()
            {
                ConfirmCleanupView::new(request, &theme).render(area, frame.buffer_mut());
            }

            Footer::new(state.mode, &snapshot, &theme).render(layout.footer, frame.buffer_mut());
        })?;

        match event_handler.next()? {
            AppEvent::Key(key) => {
                let action = handle_key(key, state.mode);
                handle_action(&mut state, action);
            }
            AppEvent::Resize(_, _) => {
                // Terminal will redraw on next loop
            }
            AppEvent::Tick => {
                state.tick_spinner();
            }
        }

        if state.should_quit {
            break;
        }
    }

    Ok(())
}

fn handle_action(state: &mut AppState, action: Action) {
    match action {
        Action::Scan => state.request_scan(),
        Action::Clean => state.request_cleanup(),
        Action::ConfirmCleanup => state.confirm_cleanup(),
        Action::CancelCleanup => state.cancel_cleanup(),
        Action::ScrollUp => state.scroll_up(),
        Action::ScrollDown => state.scroll_down(),
        Action::ShowHelp => state.show_help(),
        Action::HideHelp => state.hide_help(),
        Action::Quit => state.quit(),
        Action::Tick => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_map_to_config() {
        let args = Args::try_parse_from(["reclaim"]).unwrap();
        let config = args.pipeline_config(Vec::new());

        assert_eq!(config.walk.num_threads, 0);
        assert_eq!(config.service.as_deref(), Some("wuauserv"));
        assert!(config.empty_trash);
        assert!(config.extra_roots.is_empty());
    }

    #[test]
    fn test_flags_map_to_config() {
        let args = Args::try_parse_from([
            "reclaim",
            "--root",
            "/tmp/a",
            "--root",
            "/tmp/b",
            "--depth",
            "3",
            "--threads",
            "1",
            "--no-service",
            "--keep-trash",
        ])
        .unwrap();
        let config = args.pipeline_config(args.roots.clone());

        assert_eq!(config.walk.num_threads, 1);
        assert!(config.service.is_none());
        assert!(!config.empty_trash);
        assert_eq!(config.extra_roots.len(), 2);
        assert_eq!(config.extra_roots[1].root, PathBuf::from("/tmp/b"));
        assert_eq!(config.extra_roots[0].max_depth(), 3);
    }

    #[test]
    fn test_yes_requires_headless() {
        assert!(Args::try_parse_from(["reclaim", "--yes"]).is_err());
        assert!(Args::try_parse_from(["reclaim", "--headless", "--yes"]).is_ok());
    }
}
