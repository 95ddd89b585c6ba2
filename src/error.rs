use thiserror::Error;

/// Application error types
#[derive(Error, Debug)]
pub enum AppError {
    /// Error during file I/O operations
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
    /// Error during JSON serialization or deserialization
    #[error("json error: {0}")]
    SerdeJson(#[from] serde_json::Error),
    /// Error when user input fails.
    #[error("inquire error: {0}")]
    Inquire(#[from] inquire::InquireError),
    /// Empty field, bad format, or out-of-range menu selection.
    #[error("invalid input: {0}")]
    InvalidInput(String),
    /// Alias is already present in the profile store.
    #[error("alias already exists: '{0}'")]
    DuplicateAlias(String),
    /// A required external program is not installed or not on PATH.
    #[error("missing dependency: {0}")]
    MissingDependency(String),
    /// An external program ran but exited unsuccessfully.
    #[error("{program} failed: {detail}")]
    CommandFailed {
        /// Program that was invoked
        program: String,
        /// Trimmed stderr, or the exit status when stderr is empty
        detail: String,
    },
    /// Profiles file exists but could not be understood.
    #[error("could not read profiles file: {0}")]
    ConfigLoad(String),
    /// No per-user configuration directory on this platform.
    #[error("failed to find the user configuration directory")]
    ConfigDirNotFound,
}

impl AppError {
    /// True when the user pressed Ctrl-C at a prompt.
    pub fn is_interrupted(&self) -> bool {
        matches!(
            self,
            AppError::Inquire(inquire::InquireError::OperationInterrupted)
        )
    }

    /// True when the user pressed Escape at a prompt.
    pub fn is_canceled(&self) -> bool {
        matches!(
            self,
            AppError::Inquire(inquire::InquireError::OperationCanceled)
        )
    }
}
