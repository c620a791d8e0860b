use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    /// Invalid user input, detected before any request is sent.
    #[error("invalid configuration: {0}")]
    Configuration(String),

    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// The server answered, but not with a success status.
    #[error("transport error: {0}")]
    Transport(String),

    /// The body could not be decoded into the expected XML envelope.
    #[error("malformed response: {0}")]
    MalformedResponse(String),

    /// The server parsed the request and reported one or more errors.
    #[error("server reported {} error(s): {}", .0.len(), .0.join("; "))]
    Application(Vec<String>),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("url parse error: {0}")]
    Url(#[from] url::ParseError),
}

impl Error {
    /// Server-reported error lines, one per `<error>` element.
    pub fn application_messages(&self) -> Option<&[String]> {
        match self {
            Error::Application(lines) => Some(lines),
            _ => None,
        }
    }
}
