pub mod api;
pub mod photo;

use std::fmt;

#[derive(thiserror::Error, Debug)]
pub enum FlickrError {
    #[error(transparent)]
    Parse( #[from] ParseError ),
    #[error("ApiError {code}: {message}")]
    Api { code: i64, message: String },
}

#[derive(thiserror::Error, Debug)]
pub enum ParseError {
    #[error("malformed JSON: {0}")]
    Json( #[from] serde_json::Error ),
    #[error("missing field `{field}` in {location}")]
    MissingField { field: &'static str, location: Location },
    #[error("invalid field `{field}` in {location}: {reason}")]
    InvalidField { field: &'static str, location: Location, reason: String },
}

impl ParseError {
    pub fn field(&self) -> Option<&'static str> {
        match self {
            ParseError::Json(_) => None,
            ParseError::MissingField { field, .. } => Some(*field),
            ParseError::InvalidField { field, .. } => Some(*field),
        }
    }
}

/// Where in the response a malformed field was found.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Location {
    Listing,
    Entry(usize),
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Location::Listing => write!(f, "photo listing"),
            Location::Entry(index) => write!(f, "photo entry #{}", index),
        }
    }
}
