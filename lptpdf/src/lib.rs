#![forbid(unsafe_code)]

//! `lptpdf` renders streams of ASCII lineprinter output into PDF documents whose pages emulate
//! continuous-feed stationery: bar-patterned paper with tractor-feed sprocket holes, line
//! numbers down both margins, and the source text overlaid at the configured pitch.
//!
//! A [`Printer`] session consumes raw print data (escape and control sequences included),
//! splits it into pages on form feeds and overflow, and writes each page incrementally into a
//! standards-conforming PDF 1.4 file. Closed files can be reopened and extended, and
//! [`Printer::checkpoint`] leaves a valid document on disk mid-session, so long-running
//! captures survive interruption.

mod append;
mod content;
mod control;
pub mod error;
mod form;
mod jpeg;
mod lzw;
mod objects;
mod page;
mod printer;
pub mod settings;
pub mod types;
mod writer;

use std::fs::File;
use std::io::Read;
use std::path::Path;

pub use error::{strerror, Error, ERROR_BASE};
pub use printer::Printer;
pub use settings::{FileMode, FormKind, Settings, CORE_FONTS, FORM_NAMES};
pub use writer::OutputMedium;

/// The names of the 14 standard fonts usable for text, numbers and labels.
pub fn font_list() -> &'static [&'static str] {
    &CORE_FONTS
}

/// The names of the selectable stationery forms.
pub fn form_list() -> &'static [&'static str] {
    &FORM_NAMES
}

/// Checks that the file at `path` begins with a PDF version line (`%PDF-1.<digits>`).
pub fn looks_like_pdf(path: impl AsRef<Path>) -> Result<(), Error> {
    let mut head = [0u8; 16];
    let mut file = File::open(path.as_ref())?;
    let got = file.read(&mut head)?;
    let head = &head[..got];

    let rest = head.strip_prefix(b"%PDF-1.").ok_or(Error::NotPdf)?;
    if rest.first().is_some_and(u8::is_ascii_digit) {
        Ok(())
    } else {
        Err(Error::NotPdf)
    }
}
