use std::io;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CommandError {
    #[error("Empty command")]
    EmptyCommand,
    #[error("Unknown command: {0}")]
    UnknownCommand(String),
    #[error("Request is not valid UTF-8")]
    InvalidEncoding,
    #[error("Request too large")]
    RequestTooLarge,
    #[error("Missing {0}")]
    MissingArgument(&'static str),
    #[error("Invalid path: {0}")]
    PathOutsideRoot(String),
    #[error("File not found: {0}")]
    NotFound(String),
    #[error("Already exists: {0}")]
    AlreadyExists(String),
    #[error("Permission denied: {0}")]
    PermissionDenied(String),
    #[error("Not a regular file: {0}")]
    NotAFile(String),
    #[error("{path}: {source}")]
    Io {
        path: String,
        #[source]
        source: io::Error,
    },
}

/// Which stage of request handling rejected the request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Protocol,
    Argument,
    Confinement,
    Filesystem,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::Protocol => "protocol",
            ErrorKind::Argument => "argument",
            ErrorKind::Confinement => "confinement",
            ErrorKind::Filesystem => "filesystem",
        }
    }
}

impl CommandError {
    /// Classifies an I/O failure on the path the client named as `arg`.
    pub fn from_io(arg: &str, err: io::Error) -> Self {
        match err.kind() {
            io::ErrorKind::NotFound => CommandError::NotFound(arg.to_string()),
            io::ErrorKind::AlreadyExists => CommandError::AlreadyExists(arg.to_string()),
            io::ErrorKind::PermissionDenied => CommandError::PermissionDenied(arg.to_string()),
            _ => CommandError::Io { path: arg.to_string(), source: err },
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            CommandError::EmptyCommand
            | CommandError::UnknownCommand(_)
            | CommandError::InvalidEncoding
            | CommandError::RequestTooLarge => ErrorKind::Protocol,
            CommandError::MissingArgument(_) => ErrorKind::Argument,
            CommandError::PathOutsideRoot(_) => ErrorKind::Confinement,
            CommandError::NotFound(_)
            | CommandError::AlreadyExists(_)
            | CommandError::PermissionDenied(_)
            | CommandError::NotAFile(_)
            | CommandError::Io { .. } => ErrorKind::Filesystem,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            CommandError::EmptyCommand => "EmptyCommand",
            CommandError::UnknownCommand(_) => "UnknownCommand",
            CommandError::InvalidEncoding => "InvalidEncoding",
            CommandError::RequestTooLarge => "RequestTooLarge",
            CommandError::MissingArgument(_) => "MissingArgument",
            CommandError::PathOutsideRoot(_) => "PathOutsideRoot",
            CommandError::NotFound(_) => "NotFound",
            CommandError::AlreadyExists(_) => "AlreadyExists",
            CommandError::PermissionDenied(_) => "PermissionDenied",
            CommandError::NotAFile(_) => "NotAFile",
            CommandError::Io { .. } => "Io",
        }
    }
}

pub type CommandResult<T> = Result<T, CommandError>;

pub fn into_response(err: CommandError) -> String {
    format!("Error: {err}")
}
