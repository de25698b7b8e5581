/// User actions that can be performed in the app
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Start a scan (supersedes a finished one)
    Scan,
    /// Open the cleanup confirmation
    Clean,
    /// Confirm the pending cleanup
    ConfirmCleanup,
    /// Dismiss the pending cleanup
    CancelCleanup,
    /// Scroll the log towards older lines
    ScrollUp,
    /// Scroll the log towards newer lines
    ScrollDown,
    /// Show help overlay
    ShowHelp,
    /// Hide help overlay
    HideHelp,
    /// Quit the application
    Quit,
    /// No action (for tick events)
    Tick,
}
