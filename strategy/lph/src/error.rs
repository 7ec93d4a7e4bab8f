use thiserror::Error;

/// A raw position record that cannot be turned into a [`crate::Position`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValuationError {
    #[error("invalid {field} for position {id}: {value:?}")]
    InvalidField {
        id: String,
        field: &'static str,
        value: String,
    },
}

impl ValuationError {
    pub(crate) fn invalid(id: &str, field: &'static str, value: &str) -> Self {
        ValuationError::InvalidField {
            id: id.to_string(),
            field,
            value: value.to_string(),
        }
    }
}

/// Errors reported by an order venue.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VenueError {
    /// The quantity is too small for the instrument; nothing was traded.
    #[error("order quantity too small: {0}")]
    QuantityTooSmall(String),

    #[error("order rejected: code={code} msg={msg}")]
    Rejected { code: i64, msg: String },

    #[error("venue unavailable: {0}")]
    Transport(String),
}

/// Failure to hedge a single token.
#[derive(Debug, Error)]
pub enum HedgeError {
    #[error("no quantity precision known for symbol {0}")]
    UnknownSymbol(String),

    #[error(transparent)]
    Venue(#[from] VenueError),
}
