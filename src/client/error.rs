use thiserror::Error;

/// Describes the various errors that can be returned from the client
#[derive(Error, Debug)]
pub enum ClientError {
    /// Indicates that the given URL is invalid, contains the underlying parsing error
    #[error("Invalid URL given: {0:?}")]
    InvalidURL(#[from] url::ParseError),
    /// There was a problem with the http client. This is likely not a user issue. Contains the
    /// underlying error
    #[error("Error creating request: {0:?}")]
    HttpClientError(#[from] reqwest::Error),
    /// The response body could not be deserialized. Contains the underlying error
    #[error("Invalid response body: {0:?}")]
    InvalidBody(#[from] serde_json::Error),
    /// The error returned when the request is invalid. Contains the underlying HTTP status code
    /// and any message returned from the API
    #[error("Invalid request (status code {status_code:?}): {message:?}")]
    InvalidRequest {
        status_code: reqwest::StatusCode,
        message: Option<String>,
    },
    /// A server error was encountered. Contains an optional message from the server
    #[error("Server has encountered an error: {0:?}")]
    ServerError(Option<String>),
    /// Invalid credentials were used or the identity does not hold the permission the route
    /// demands. The server does not distinguish the two causes
    #[error("Invalid credentials or missing permission for the requested resource")]
    Unauthorized,
    /// A catch-all for uncategorized errors. Contains an error message describing the underlying
    /// issue
    #[error("{0}")]
    Other(String),
}
