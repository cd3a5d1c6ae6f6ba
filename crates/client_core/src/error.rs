use std::fmt;

use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    Reload,
    Create,
    Update,
    Remove,
}

impl Operation {
    pub fn as_str(self) -> &'static str {
        match self {
            Operation::Reload => "reload",
            Operation::Create => "create",
            Operation::Update => "update",
            Operation::Remove => "remove",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A remote directory call failed. Network, validation and server failures are not
/// distinguished.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DirectoryError {
    #[error("{operation} failed: {message}")]
    Remote {
        operation: Operation,
        message: String,
    },
}

impl DirectoryError {
    pub fn remote(operation: Operation, source: &anyhow::Error) -> Self {
        Self::Remote {
            operation,
            message: format!("{source:#}"),
        }
    }

    pub fn operation(&self) -> Operation {
        match self {
            Self::Remote { operation, .. } => *operation,
        }
    }

    pub fn message(&self) -> &str {
        match self {
            Self::Remote { message, .. } => message,
        }
    }
}
