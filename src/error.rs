use thiserror::Error;

#[derive(Error, Debug)]
pub enum KomikError {
    /// Non-2xx response. `message` is the `message` field of the error body, if any.
    #[error("Request failed with status code {status}")]
    Server { status: u16, message: Option<String> },

    #[error("{0}")]
    Transport(String),

    #[error("No comic data found")]
    EmptyBody,

    #[error("Invalid response: {0}")]
    Decode(String),

    #[error("Config error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl KomikError {
    /// Server-supplied message carried by an error response body.
    pub fn server_message(&self) -> Option<&str> {
        match self {
            KomikError::Server {
                message: Some(message),
                ..
            } if !message.is_empty() => Some(message),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, KomikError>;
