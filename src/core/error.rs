use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SimError {
    #[error("Too many {what}: {count} (max {max})")]
    TooManyEntries {
        what: &'static str,
        count: usize,
        max: usize,
    },

    #[error("Total {what} size overflows a 64-bit integer")]
    SizeOverflow { what: &'static str },

    #[error("Invalid size '{value}' at position {position}: expected a non-negative integer")]
    InvalidSize { position: usize, value: String },

    #[error("Allocation covers {got} processes, expected {expected}")]
    MismatchedAllocation { expected: usize, got: usize },

    #[error("Unknown allocation strategy: {0} (expected first, best or worst)")]
    UnknownStrategy(String),
}

pub type Result<T> = std::result::Result<T, SimError>;
