use std::fmt;

/// Why a block edit was refused. A refused edit never mutates the chunk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditError {
    OutOfBounds,
    /// Height-field chunks carry no block grid.
    Unsupported,
    /// The chunk failed to generate and holds no data.
    Degraded,
    /// No loaded chunk owns the position.
    Unloaded,
}

impl fmt::Display for EditError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EditError::OutOfBounds => write!(f, "position lies outside the chunk"),
            EditError::Unsupported => write!(f, "height-field chunks cannot be edited per block"),
            EditError::Degraded => write!(f, "chunk is degraded"),
            EditError::Unloaded => write!(f, "no chunk is loaded at that position"),
        }
    }
}

impl std::error::Error for EditError {}
