use std::sync::Arc;

use reqwest::StatusCode;

use crate::flickr::{FlickrError, ParseError};

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("TransportError: {0}")]
    Transport( #[from] reqwest::Error ),
    #[error("TransportError: server answered {0}")]
    Status(StatusCode),
    #[error("ParseError: {0}")]
    Parse( #[from] ParseError ),
    #[error("ApiError {code}: {message}")]
    Api { code: i64, message: String },
    #[error("Invalid page {0}, pages start at 1")]
    InvalidPage(u32),
    #[error("Fetch cancelled")]
    Cancelled,
    #[error("Fetch task died: {0}")]
    Task(String),
    #[error(transparent)]
    Fetch( Arc<Error> ),
    #[error("ConfigError: {0}")]
    Config(String),
    #[error("Could not encode listing: {0}")]
    Encode(serde_json::Error),
    #[error(transparent)]
    IoError( #[from] std::io::Error ),
    #[error(transparent)]
    YamlError( #[from] serde_yaml::Error ),
}

impl From<FlickrError> for Error {
    fn from(err: FlickrError) -> Self {
        match err {
            FlickrError::Parse(err) => Error::Parse(err),
            FlickrError::Api { code, message } => Error::Api { code, message },
        }
    }
}

impl Error {
    /// Network unreachable, timeout or a non-2xx answer.
    pub fn is_transport(&self) -> bool {
        match self {
            Error::Transport(_) | Error::Status(_) => true,
            Error::Fetch(inner) => inner.is_transport(),
            _ => false,
        }
    }

    pub fn is_parse(&self) -> bool {
        match self {
            Error::Parse(_) => true,
            Error::Fetch(inner) => inner.is_parse(),
            _ => false,
        }
    }
}
