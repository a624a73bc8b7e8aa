// Copyright (c) 2026 rezky_nightky

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("this program requires an interactive terminal (stdout is not a TTY)")]
    NotATerminal,

    #[error("terminal type {0:?} cannot draw full-screen output")]
    UnsupportedTerminal(String),

    #[error("terminal error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Environment problems are detected before the screen is taken over and
    /// end the program without a failure status.
    pub fn is_environment(&self) -> bool {
        matches!(self, Error::NotATerminal | Error::UnsupportedTerminal(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn io_errors_are_not_environment_errors() {
        let e: Error = std::io::Error::other("backend gone").into();
        assert!(!e.is_environment());
        assert_eq!(e.to_string(), "terminal error: backend gone");
    }

    #[test]
    fn dumb_terminal_is_an_environment_error() {
        let e = Error::UnsupportedTerminal("dumb".to_string());
        assert!(e.is_environment());
        assert!(e.to_string().contains("\"dumb\""));
    }
}
