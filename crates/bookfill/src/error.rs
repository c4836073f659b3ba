pub(crate) type DynError = Box<dyn std::error::Error + Send + Sync>;

/// Why an ISBN was rejected, a lookup came back empty or a get-or-create request failed.
///
/// The autofill itself never hands an [`Error`] back, [`crate::FetchController`] and
/// [`crate::EntityResolver`] log and drop it. Only [`crate::Isbn::parse`] and the
/// [`crate::Client`] implementations return one.
#[derive(Debug)]
pub struct Error {
    kind: ErrorKind,
    message: Option<String>,
    source: Option<DynError>,
}

/// What went wrong, independent of the message.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    /// The request never got an answer: connection refused, timeout or an unreadable body.
    IO,
    /// The answer was not the JSON shape expected from the lookup or get-or-create endpoints.
    Deserialize,
    /// The lookup succeeded but listed no volume for the ISBN.
    NoValue,
    /// The remote service answered with a status that is not accepted.
    Status,
    /// The identifier failed normalization or its checksum.
    InvalidIsbn,
}

impl Error {
    /// Creates an [`Error`] of `kind` described by `message`.
    pub fn new<S: Into<String>>(kind: ErrorKind, message: S) -> Self {
        Self {
            kind,
            message: Some(message.into()),
            source: None,
        }
    }

    /// Creates an [`Error`] of `kind` caused by `source`, such as a reqwest or serde error.
    pub fn wrap<E>(kind: ErrorKind, source: E) -> Self
    where
        E: Into<DynError>,
    {
        Self {
            kind,
            message: None,
            source: Some(source.into()),
        }
    }

    /// Creates a [`ErrorKind::Status`] error for an unexpected HTTP status code.
    pub(crate) fn status(status: u16, url: &str) -> Self {
        Self::new(
            ErrorKind::Status,
            format!("unexpected status {status} from '{url}'"),
        )
    }

    /// Returns the kind of error.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        self.kind
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.kind {
            ErrorKind::IO => f.write_str("Request failed")?,
            ErrorKind::Deserialize => f.write_str("Unexpected response body")?,
            ErrorKind::NoValue => f.write_str("No match")?,
            ErrorKind::Status => f.write_str("Status error")?,
            ErrorKind::InvalidIsbn => f.write_str("Invalid ISBN")?,
        };

        if let Some(message) = &self.message {
            write!(f, ": {message}")?;
        }

        if let Some(cause) = &self.source {
            write!(f, ": caused by {cause}")?;
        }
        Ok(())
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source.as_ref().map(|e| &**e as _)
    }
}
