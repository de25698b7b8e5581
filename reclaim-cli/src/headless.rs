use std::io::{self, Write};
use std::time::Duration;

use color_eyre::Result;
use color_eyre::eyre::eyre;
use indicatif::{ProgressBar, ProgressStyle};
use reclaim_core::{
    CleanupResult, LogTag, Pipeline, PipelineEvent, Rejection, SessionSnapshot, SessionState,
    format_count, format_size, is_elevated,
};

const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Line-mode options
pub struct HeadlessOptions {
    pub estimate: bool,
    /// Treat the confirmation as answered yes
    pub assume_yes: bool,
}

/// Scan, confirm and clean without the TUI
pub fn run(mut pipeline: Pipeline, options: &HeadlessOptions) -> Result<()> {
    if !is_elevated() {
        println!(
            "[{}] Not running as administrator, some locations will be skipped",
            LogTag::System.label()
        );
    }

    if options.estimate {
        pipeline.start_estimate();
    }

    pipeline.request_scan()?;
    let pb = progress_bar(100, "{pos}%")?;
    pb.set_message("scanning");
    drive(&mut pipeline, &pb)?;
    pb.finish_and_clear();

    if pipeline.session().state() != SessionState::Scanned {
        return Err(eyre!("scan did not complete"));
    }

    let request = match pipeline.prepare_cleanup() {
        Ok(request) => request,
        Err(Rejection::NothingToClean) => {
            println!("Nothing to clean.");
            return Ok(());
        }
        Err(rejection) => return Err(rejection.into()),
    };

    let question = format!(
        "Permanently remove {} files ({})?",
        format_count(request.count),
        format_size(request.bytes)
    );
    if !options.assume_yes && !prompt_confirm(&question, Some(false))? {
        pipeline.discard_scan()?;
        println!("Cleanup cancelled.");
        return Ok(());
    }

    pipeline.confirm_cleanup(request)?;
    let pb = progress_bar(0, "{pos}/{len} files")?;
    pb.set_message("cleaning");
    let result = drive(&mut pipeline, &pb)?;
    pb.finish_and_clear();

    match result {
        Some(result) => print_summary(&result, &pipeline.snapshot()),
        None => return Err(eyre!("cleanup did not complete")),
    }
    Ok(())
}

fn progress_bar(len: u64, counter: &str) -> Result<ProgressBar> {
    let pb = ProgressBar::new(len);
    pb.set_style(
        ProgressStyle::default_bar()
            .template(&format!(
                "[{{elapsed_precise}}] [{{bar:40.cyan/blue}}] {} | {{msg}}",
                counter
            ))?
            .progress_chars("=>-"),
    );
    Ok(pb)
}

/// Pump pipeline events into the terminal until the running job ends.
/// Returns the cleanup result when the job was a cleanup.
fn drive(pipeline: &mut Pipeline, pb: &ProgressBar) -> Result<Option<CleanupResult>> {
    let mut cleanup = None;
    loop {
        for event in pipeline.poll_timeout(POLL_INTERVAL) {
            match event {
                PipelineEvent::Log(line) => pb.println(line.to_string()),
                PipelineEvent::ScanProgress(percent) => pb.set_position(percent as u64),
                PipelineEvent::CleanProgress { processed, total } => {
                    pb.set_length(total as u64);
                    pb.set_position(processed as u64);
                }
                PipelineEvent::CleanupCompleted(result) => cleanup = Some(result),
                PipelineEvent::Estimate(_) | PipelineEvent::ScanCompleted(_) => {}
            }
        }
        if !pipeline.is_busy() {
            return Ok(cleanup);
        }
    }
}

fn print_summary(result: &CleanupResult, snapshot: &SessionSnapshot) {
    println!(
        "Removed {} files, recovered {}.",
        format_count(result.cleaned_count()),
        format_size(result.cleaned_bytes())
    );
    if result.failed_count() > 0 {
        println!(
            "{} files could not be removed.",
            format_count(result.failed_count())
        );
    }
    if let Some(now) = snapshot.disk_now {
        println!(
            "System drive: {} free of {} ({:.0}% used).",
            format_size(now.free),
            format_size(now.total),
            now.percent_used()
        );
    }
}

/// Ask a yes/no question on stdin. End of input takes the default.
pub fn prompt_confirm(prompt: &str, default: Option<bool>) -> io::Result<bool> {
    let mut input = String::new();

    loop {
        input.clear();

        match default {
            Some(true) => print!("{} (Y/n): ", prompt),
            Some(false) | None => print!("{} (y/N): ", prompt),
        }
        io::stdout().flush()?;

        if io::stdin().read_line(&mut input)? == 0 {
            return Ok(default.unwrap_or(false));
        }

        match input.trim().to_uppercase().as_str() {
            "Y" | "YES" => return Ok(true),
            "N" | "NO" => return Ok(false),
            "" => {
                if let Some(default) = default {
                    return Ok(default);
                }
            }
            _ => {}
        }
    }
}
