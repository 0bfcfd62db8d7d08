use std::fmt;

use crate::grid::GridError;

/// Error returned by [`EditorSession`](super::EditorSession) operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionError {
    /// The operation needs a working grid and there is none yet
    NoGrid,
    /// Brush size outside 1..=3
    BrushSize(u8),
    /// The edit itself was rejected
    Grid(GridError),
}

impl fmt::Display for SessionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionError::NoGrid => write!(f, "session has no grid"),
            SessionError::BrushSize(size) => {
                write!(f, "brush size {} out of range (1..=3)", size)
            }
            SessionError::Grid(err) => write!(f, "{}", err),
        }
    }
}

impl std::error::Error for SessionError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SessionError::Grid(err) => Some(err),
            _ => None,
        }
    }
}

impl From<GridError> for SessionError {
    fn from(err: GridError) -> Self {
        SessionError::Grid(err)
    }
}
