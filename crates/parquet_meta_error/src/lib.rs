use std::error::Error;
use std::fmt;

pub type Result<T, E = MetaError> = std::result::Result<T, E>;

/// Broad classification of an error.
///
/// Callers use the kind to decide what to do next. Corrupt metadata and
/// cipher errors are fatal for the whole file, page decode errors only for
/// the page being read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Footer or format invariants were violated.
    CorruptMetadata,
    /// A page failed to decompress or violated its declared sizing.
    PageDecode,
    /// Encrypt or decrypt failure from a pluggable cipher.
    Cipher,
    /// Failure reading from the underlying byte source.
    Io,
    Other,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CorruptMetadata => write!(f, "corrupt metadata"),
            Self::PageDecode => write!(f, "page decode error"),
            Self::Cipher => write!(f, "cipher error"),
            Self::Io => write!(f, "io error"),
            Self::Other => write!(f, "error"),
        }
    }
}

#[derive(Debug)]
pub struct MetaError {
    inner: Box<MetaErrorInner>,
}

#[derive(Debug)]
struct MetaErrorInner {
    kind: ErrorKind,
    msg: String,
    source: Option<Box<dyn Error + Send + Sync>>,
    /// Identity of the file being read when the error happened.
    file: Option<String>,
}

impl MetaError {
    pub fn new(msg: impl Into<String>) -> Self {
        Self::with_kind(ErrorKind::Other, msg)
    }

    pub fn with_kind(kind: ErrorKind, msg: impl Into<String>) -> Self {
        MetaError {
            inner: Box::new(MetaErrorInner {
                kind,
                msg: msg.into(),
                source: None,
                file: None,
            }),
        }
    }

    pub fn corrupt(msg: impl Into<String>) -> Self {
        Self::with_kind(ErrorKind::CorruptMetadata, msg)
    }

    pub fn page_decode(msg: impl Into<String>) -> Self {
        Self::with_kind(ErrorKind::PageDecode, msg)
    }

    pub fn cipher(msg: impl Into<String>) -> Self {
        Self::with_kind(ErrorKind::Cipher, msg)
    }

    pub fn with_source(msg: impl Into<String>, source: Box<dyn Error + Send + Sync>) -> Self {
        Self::with_kind_and_source(ErrorKind::Other, msg, source)
    }

    pub fn with_kind_and_source(
        kind: ErrorKind,
        msg: impl Into<String>,
        source: Box<dyn Error + Send + Sync>,
    ) -> Self {
        let mut err = Self::with_kind(kind, msg);
        err.inner.source = Some(source);
        err
    }

    /// Wrap this error in a new error with the given kind and message.
    ///
    /// The file identity is carried over to the new error.
    pub fn wrap(self, kind: ErrorKind, msg: impl Into<String>) -> Self {
        let file = self.inner.file.clone();
        let mut err = Self::with_kind(kind, msg);
        err.inner.file = file;
        err.inner.source = Some(Box::new(self));
        err
    }

    /// Tag the error with the identity of the file being read.
    ///
    /// An existing tag is kept.
    pub fn with_file(mut self, file: impl Into<String>) -> Self {
        if self.inner.file.is_none() {
            self.inner.file = Some(file.into());
        }
        self
    }

    pub fn kind(&self) -> ErrorKind {
        self.inner.kind
    }

    pub fn is_corrupt(&self) -> bool {
        self.inner.kind == ErrorKind::CorruptMetadata
    }

    pub fn message(&self) -> &str {
        &self.inner.msg
    }

    pub fn file(&self) -> Option<&str> {
        self.inner.file.as_deref()
    }
}

impl fmt::Display for MetaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(file) = &self.inner.file {
            write!(f, "[{file}] ")?;
        }
        write!(f, "{}", self.inner.msg)?;
        if let Some(source) = &self.inner.source {
            write!(f, ": {source}")?;
        }
        Ok(())
    }
}

impl Error for MetaError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        self.inner
            .source
            .as_ref()
            .map(|e| e.as_ref() as &(dyn Error + 'static))
    }
}

impl From<std::io::Error> for MetaError {
    fn from(value: std::io::Error) -> Self {
        let mut err = Self::with_kind(ErrorKind::Io, "IO error");
        err.inner.source = Some(Box::new(value));
        err
    }
}

impl From<fmt::Error> for MetaError {
    fn from(value: fmt::Error) -> Self {
        Self::with_source("Format error", Box::new(value))
    }
}

/// Extension methods for attaching context to arbitrary errors.
pub trait ResultExt<T, E> {
    /// Wrap an error with a static context string.
    fn context(self, msg: &'static str) -> Result<T>;

    /// Wrap an error with a context string generated from a function.
    fn context_fn<F>(self, f: F) -> Result<T>
    where
        F: Fn() -> String;

    /// Wrap an error with a context string and an explicit kind.
    fn context_kind(self, kind: ErrorKind, msg: &'static str) -> Result<T>;
}

impl<T, E: Error + Send + Sync + 'static> ResultExt<T, E> for std::result::Result<T, E> {
    fn context(self, msg: &'static str) -> Result<T> {
        self.map_err(|e| MetaError::with_source(msg, Box::new(e)))
    }

    fn context_fn<F>(self, f: F) -> Result<T>
    where
        F: Fn() -> String,
    {
        self.map_err(|e| MetaError::with_source(f(), Box::new(e)))
    }

    fn context_kind(self, kind: ErrorKind, msg: &'static str) -> Result<T> {
        self.map_err(|e| MetaError::with_kind_and_source(kind, msg, Box::new(e)))
    }
}

pub trait OptionExt<T> {
    /// Return an error if the option is None.
    ///
    /// Missing values are treated as corrupt metadata.
    fn required(self, msg: &'static str) -> Result<T>;
}

impl<T> OptionExt<T> for Option<T> {
    fn required(self, msg: &'static str) -> Result<T> {
        match self {
            Some(v) => Ok(v),
            None => Err(MetaError::corrupt(format!("Missing required value: {msg}"))),
        }
    }
}
