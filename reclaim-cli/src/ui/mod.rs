pub mod bar_chart;
mod confirm;
mod footer;
mod header;
mod help;
mod layout;
mod log;
mod progress;
mod stats;
mod theme;

pub use confirm::ConfirmCleanupView;
pub use footer::Footer;
pub use header::Header;
pub use help::HelpView;
pub use layout::AppLayout;
pub use log::LogView;
pub use progress::ProgressView;
pub use stats::StatsCards;
pub use theme::Theme;
