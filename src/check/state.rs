/// State of the staleness check
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CheckState {
    /// Not activated yet
    #[default]
    Idle,
    /// Waiting for the manifest
    Checking,
    /// The client version is not behind the server version
    UpToDate,
    /// The client was behind; caches were cleared and a reload requested
    Stale,
    /// The check failed or a previous forced reload did not help
    Error,
}

impl CheckState {
    pub fn as_str(&self) -> &'static str {
        match self {
            CheckState::Idle => "idle",
            CheckState::Checking => "checking",
            CheckState::UpToDate => "up-to-date",
            CheckState::Stale => "stale",
            CheckState::Error => "error",
        }
    }
}

/// What a call to `activate` did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Activation {
    /// The dependency values did not change, no check ran
    Unchanged,
    /// A newer activation started before this one finished; its result was dropped
    Superseded,
    /// A reload was already requested by an earlier check; no check ran
    ReloadPending,
    /// The check ran to completion
    Completed(CheckState),
}
