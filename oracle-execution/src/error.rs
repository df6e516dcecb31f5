use thiserror::Error;

pub const ERR_NOT_AUTHORIZED: u32 = 100;
pub const ERR_INVALID_INPUT: u32 = 101;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OracleError {
    #[error("caller is not a registered oracle")]
    NotAuthorized,
    #[error("invalid input: {0}")]
    InvalidInput(String),
}

impl OracleError {
    /// Stable numeric code reported to callers.
    pub fn code(&self) -> u32 {
        match self {
            OracleError::NotAuthorized => ERR_NOT_AUTHORIZED,
            OracleError::InvalidInput(_) => ERR_INVALID_INPUT,
        }
    }
}
