use std::error::Error as StdError;
use std::fmt;
use std::path::PathBuf;

use tracing_error::{SpanTrace, SpanTraceStatus};

/* 📖 # How are fileloc errors structured?

`FilelocError` pairs an `ErrorKind` with:
- a list of context strings, attached while the error propagates,
- an optional cause (another `FilelocError`), for wrapping lower-level failures,
- a `SpanTrace` captured when the error is created.

Callers match on `kind()` to tell recoverable failures (`NotFound`, `Read`)
from setup mistakes (`Config`, `Validation`).
*/

/// Error variants that can occur in fileloc operations.
#[derive(Debug)]
pub enum ErrorKind {
    /// Location configuration is missing or invalid
    Config { message: String },

    /// A metadata record or an argument failed validation
    Validation { message: String },

    /// The requested file does not exist or is not a regular file
    NotFound { url: String },

    /// Reading the content of a file failed, the cause holds the underlying failure
    Read { url: String },

    /// An operation was invoked in a state that does not allow it
    IllegalState { message: String },

    /// File system operation failed
    FileError {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Catch-all for other errors with a message
    Message { message: String },
}

/// Error type wrapping an [`ErrorKind`] with context, an optional cause and a span trace.
pub struct FilelocError {
    kind: ErrorKind,
    context: Vec<String>,
    cause: Option<Box<FilelocError>>,
    span_trace: SpanTrace,
}

impl FilelocError {
    /// Creates a new error from an ErrorKind, capturing the current span trace.
    pub fn new(kind: ErrorKind) -> Self {
        Self {
            kind,
            context: vec![],
            cause: None,
            span_trace: SpanTrace::capture(),
        }
    }

    pub fn message(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Message {
            message: message.into(),
        })
    }

    pub fn config(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Config {
            message: message.into(),
        })
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Validation {
            message: message.into(),
        })
    }

    pub fn not_found(url: impl Into<String>) -> Self {
        Self::new(ErrorKind::NotFound { url: url.into() })
    }

    pub fn illegal_state(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::IllegalState {
            message: message.into(),
        })
    }

    /// Attaches context to an error.
    pub fn context(mut self, context: impl Into<String>) -> Self {
        self.context.push(context.into());
        self
    }

    /// Attaches context using lazy evaluation.
    pub fn with_context<F>(mut self, f: F) -> Self
    where
        F: FnOnce() -> String,
    {
        self.context.push(f());
        self
    }

    /// Records `cause` as the error underlying this one.
    pub fn caused_by(mut self, cause: impl Into<Box<FilelocError>>) -> Self {
        self.cause = Some(cause.into());
        self
    }

    pub fn kind(&self) -> &ErrorKind {
        &self.kind
    }

    pub fn get_context(&self) -> &[String] {
        &self.context
    }

    pub fn cause(&self) -> Option<&FilelocError> {
        self.cause.as_deref()
    }

    pub fn span_trace(&self) -> &SpanTrace {
        &self.span_trace
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self.kind, ErrorKind::NotFound { .. })
    }

    /// Returns the innermost error in the source chain.
    pub fn root_cause(&self) -> &(dyn StdError + 'static) {
        let mut current: &(dyn StdError + 'static) = self;
        while let Some(next) = current.source() {
            current = next;
        }
        current
    }

    fn fmt_kind(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            ErrorKind::Config { message } => write!(f, "Invalid configuration: {}", message),
            ErrorKind::Validation { message } => write!(f, "{}", message),
            ErrorKind::NotFound { url } => write!(f, "File {} is not available", url),
            ErrorKind::Read { url } => write!(f, "Unable to read content of file {}", url),
            ErrorKind::IllegalState { message } => write!(f, "{}", message),
            ErrorKind::FileError { path, source } => {
                write!(f, "File error at {}: {}", path.display(), source)
            }
            ErrorKind::Message { message } => write!(f, "{}", message),
        }
    }

    fn fmt_tree(&self, f: &mut fmt::Formatter<'_>, indent: &str) -> fmt::Result {
        self.fmt_kind(f)?;
        writeln!(f)?;
        let branches = self.context.len() + usize::from(self.cause.is_some());
        for (i, ctx) in self.context.iter().enumerate() {
            let marker = if i + 1 == branches { "└─" } else { "├─" };
            writeln!(f, "{}{} {}", indent, marker, ctx)?;
        }
        if let Some(cause) = &self.cause {
            write!(f, "{}└─ cause: ", indent)?;
            cause.fmt_tree(f, &format!("{}   ", indent))?;
        }
        Ok(())
    }
}

impl From<ErrorKind> for FilelocError {
    fn from(kind: ErrorKind) -> Self {
        Self::new(kind)
    }
}

impl StdError for FilelocError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        if let Some(cause) = &self.cause {
            return Some(&**cause);
        }
        match &self.kind {
            ErrorKind::FileError { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl fmt::Display for FilelocError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for ctx in &self.context {
            write!(f, "{}: ", ctx)?;
        }
        self.fmt_kind(f)
    }
}

impl fmt::Debug for FilelocError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.fmt_tree(f, "")?;
        if self.span_trace.status() == SpanTraceStatus::CAPTURED {
            writeln!(f, "Trace: {}", self.span_trace)?;
        }
        Ok(())
    }
}

/// Standard result type for fileloc operations.
pub type FilelocResult<T> = std::result::Result<T, Box<FilelocError>>;

/// Extension trait for attaching context to Results.
pub trait ResultExt<T> {
    /// Attaches context to an error, consuming and re-wrapping it.
    fn context(self, context: impl Into<String>) -> FilelocResult<T>;

    /// Attaches context using lazy evaluation.
    /// Context is only evaluated if the result is an error.
    fn with_context<F>(self, f: F) -> FilelocResult<T>
    where
        F: FnOnce() -> String;
}

impl<T> ResultExt<T> for FilelocResult<T> {
    fn context(self, context: impl Into<String>) -> FilelocResult<T> {
        self.map_err(|err| Box::new(err.context(context)))
    }

    fn with_context<F>(self, f: F) -> FilelocResult<T>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|err| Box::new(err.with_context(f)))
    }
}

/// Creates a boxed message error from a format string.
#[macro_export]
macro_rules! err {
    ($($arg:tt)*) => {
        Box::new($crate::FilelocError::message(format!($($arg)*)))
    };
}

/// Returns early with a boxed message error.
#[macro_export]
macro_rules! bail {
    ($($arg:tt)*) => {
        return Err($crate::err!($($arg)*))
    };
}
