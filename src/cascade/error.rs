use thiserror::Error;

/// Every way a dispatch can end other than normal completion.
///
/// The first two variants are control flow: help has already been written to
/// the output by the time they are returned, the caller only has to stop.
#[derive(Error, Debug)]
pub enum CascadeError {
    #[error("help shown")]
    HelpShown { requested: bool },

    #[error("missing required argument: {0}")]
    MissingArgument(String),

    #[error("{}", no_parent_message(.filter))]
    NoParentInChain { filter: Option<String> },

    #[error("{0}")]
    Bail(String),

    #[error("no command registered as root: {0}")]
    UnknownRoot(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Settings error: {0}")]
    Settings(#[from] serde_json::Error),
}

fn no_parent_message(filter: &Option<String>) -> String {
    match filter {
        Some(name) => format!("no parent command named {} in the call structure", name),
        None => "command has no parent in the call structure".to_string(),
    }
}

impl CascadeError {
    /// True when help text was already written and nothing else should be printed.
    pub fn help_already_shown(&self) -> bool {
        matches!(
            self,
            CascadeError::HelpShown { .. } | CascadeError::MissingArgument(_)
        )
    }

    pub fn exit_code(&self) -> i32 {
        match self {
            CascadeError::HelpShown { requested: true } => 0,
            _ => 1,
        }
    }
}

pub type Result<T> = std::result::Result<T, CascadeError>;
