use core::fmt;

/// Errors produced by the match-finder core.
///
/// The crate is `no_std` + `alloc`, so this mirrors the small hand-rolled
/// error type idiom of the rest of the corpus rather than depending on
/// `thiserror`/`anyhow`.
#[derive(Debug)]
pub enum Error {
    /// The upstream [`ByteSource`](crate::ByteSource) returned an error.
    /// Latched on the window; every later call observes it again.
    UpstreamRead(&'static str),
    /// `Config::build` could not allocate the requested tables.
    Alloc,
    /// An invalid combination of configuration options was requested.
    Parameter(&'static str),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::UpstreamRead(msg) => write!(f, "upstream read failed: {msg}"),
            Error::Alloc => write!(f, "allocation failure while constructing match finder"),
            Error::Parameter(msg) => write!(f, "invalid match finder parameter: {msg}"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for Error {}

pub(crate) fn error_upstream(msg: &'static str) -> Error {
    Error::UpstreamRead(msg)
}

pub(crate) fn error_parameter(msg: &'static str) -> Error {
    Error::Parameter(msg)
}

/// Result alias used throughout the crate.
pub type Result<T> = core::result::Result<T, Error>;
