use crate::grid::Position;
use std::fmt;
use thiserror::Error;

/// Which endpoint of a search a validation error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    Start,
    End,
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Endpoint::Start => write!(f, "start"),
            Endpoint::End => write!(f, "end"),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("Grid must have at least one row and one column")]
    EmptyGrid,
    #[error("A {rows}x{cols} grid has more cells than can be addressed")]
    GridTooLarge { rows: usize, cols: usize },
    #[error("Position {position} is outside the {rows}x{cols} grid")]
    InvalidBounds {
        position: Position,
        rows: usize,
        cols: usize,
    },
    #[error("The {role} cell {position} is a wall")]
    BlockedEndpoint { role: Endpoint, position: Position },
    #[error("Invalid grid layout on line {line}: {reason}")]
    Parse { line: usize, reason: String },
    #[error("Backend '{backend}' is unavailable: {reason}")]
    BackendUnavailable {
        backend: &'static str,
        reason: String,
    },
    #[error("Search produced an invalid path: {0}")]
    InvalidPath(String),
}

impl Error {
    /// Structural errors describe bad input rather than a failing backend,
    /// so no other backend can do better with the same arguments.
    pub fn is_structural(&self) -> bool {
        matches!(
            self,
            Error::EmptyGrid
                | Error::GridTooLarge { .. }
                | Error::InvalidBounds { .. }
                | Error::BlockedEndpoint { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, Error>;
