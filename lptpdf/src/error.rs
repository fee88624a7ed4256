//! Error taxonomy of the engine.
//!
//! Every failure a session can report carries a stable numeric code at or above
//! [`ERROR_BASE`]; codes below the base are raw OS `errno` values passed through from I/O
//! failures. Once a session records an error it stays sticky until cleared, and all further
//! operations short-circuit to it.

use std::io;

/// First numeric code owned by the engine. Values below this are OS `errno` values.
pub const ERROR_BASE: i32 = 10_000;

/// Failure modes of a printer session.
#[derive(Debug, Clone, thiserror::Error)]
pub enum Error {
    #[error("invalid printer handle")]
    BadHandle,

    #[error("output file name must end in .pdf")]
    BadFileName,

    #[error("printer session is not open")]
    NotOpen,

    #[error("error code is out of range")]
    BadErrno,

    #[error("file exists and is not empty")]
    NotEmpty,

    #[error("file is not a PDF file")]
    NotPdf,

    #[error("file can not be appended to")]
    NoAppend,

    #[error("file was not produced by this engine")]
    NotProduced,

    #[error("settings may not change after output has been produced")]
    Active,

    #[error("unknown setting")]
    BadSet,

    #[error("invalid value for setting")]
    Invalid,

    #[error("measurements must not be negative")]
    NegativeValue,

    #[error("font is not one of the 14 standard PDF fonts: {0}")]
    UnknownFont(String),

    #[error("unknown form name: {0}")]
    UnknownForm(String),

    #[error("page geometry is inconsistent: {0}")]
    InconsistentGeometry(String),

    #[error("I/O error: {message}")]
    Io {
        /// OS error number, when the failure carried one.
        errno: Option<i32>,
        message: String,
    },

    #[error("I/O error without an OS error code: {0}")]
    OtherIo(String),

    #[error("not a valid JPEG file: {0}")]
    BadJpeg(String),

    #[error("internal consistency check failed: {0}")]
    Bugcheck(&'static str),
}

impl Error {
    /// The stable numeric identity of this error. I/O failures that carry an OS error number
    /// report that number directly (below [`ERROR_BASE`]); everything else reports an
    /// engine-owned code.
    pub fn code(&self) -> i32 {
        match self {
            Error::BadHandle => ERROR_BASE + 1,
            Error::BadFileName => ERROR_BASE + 2,
            Error::NotOpen => ERROR_BASE + 3,
            Error::BadErrno => ERROR_BASE + 4,
            Error::NotEmpty => ERROR_BASE + 5,
            Error::NotPdf => ERROR_BASE + 6,
            Error::NoAppend => ERROR_BASE + 7,
            Error::NotProduced => ERROR_BASE + 8,
            Error::Active => ERROR_BASE + 9,
            Error::BadSet => ERROR_BASE + 10,
            Error::Invalid => ERROR_BASE + 11,
            Error::NegativeValue => ERROR_BASE + 12,
            Error::UnknownFont(_) => ERROR_BASE + 13,
            Error::UnknownForm(_) => ERROR_BASE + 14,
            Error::InconsistentGeometry(_) => ERROR_BASE + 15,
            Error::Io { errno, .. } => errno.unwrap_or(ERROR_BASE + 16),
            Error::OtherIo(_) => ERROR_BASE + 17,
            Error::BadJpeg(_) => ERROR_BASE + 18,
            Error::Bugcheck(_) => ERROR_BASE + 19,
        }
    }
}

impl From<io::Error> for Error {
    fn from(value: io::Error) -> Self {
        Error::Io {
            errno: value.raw_os_error(),
            message: value.to_string(),
        }
    }
}

/// Maps an error code back to a message. Codes below [`ERROR_BASE`] are treated as OS error
/// numbers and resolved through the host's error table.
pub fn strerror(code: i32) -> String {
    if code == 0 {
        return "no error".to_string();
    }
    if code < ERROR_BASE {
        return io::Error::from_raw_os_error(code).to_string();
    }
    match code - ERROR_BASE {
        1 => Error::BadHandle.to_string(),
        2 => Error::BadFileName.to_string(),
        3 => Error::NotOpen.to_string(),
        4 => Error::BadErrno.to_string(),
        5 => Error::NotEmpty.to_string(),
        6 => Error::NotPdf.to_string(),
        7 => Error::NoAppend.to_string(),
        8 => Error::NotProduced.to_string(),
        9 => Error::Active.to_string(),
        10 => Error::BadSet.to_string(),
        11 => Error::Invalid.to_string(),
        12 => Error::NegativeValue.to_string(),
        13 => "font is not one of the 14 standard PDF fonts".to_string(),
        14 => "unknown form name".to_string(),
        15 => "page geometry is inconsistent".to_string(),
        16 => "I/O error".to_string(),
        17 => "I/O error without an OS error code".to_string(),
        18 => "not a valid JPEG file".to_string(),
        19 => "internal consistency check failed".to_string(),
        _ => Error::BadErrno.to_string(),
    }
}
