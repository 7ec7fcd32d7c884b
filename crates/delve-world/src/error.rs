use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub enum GenError {
    InvalidConfig(&'static str),
    /// A height sample came out NaN or infinite at local column `(x, z)`.
    NonFiniteHeight { x: usize, z: usize },
    /// The generator panicked; the payload message is kept when it was a string.
    Panicked(String),
}

impl fmt::Display for GenError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GenError::InvalidConfig(msg) => write!(f, "invalid worldgen config: {}", msg),
            GenError::NonFiniteHeight { x, z } => {
                write!(f, "non-finite height at local column ({}, {})", x, z)
            }
            GenError::Panicked(msg) => write!(f, "generator panicked: {}", msg),
        }
    }
}

impl std::error::Error for GenError {}
