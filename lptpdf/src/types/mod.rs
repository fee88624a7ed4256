//! Primitive PDF syntax types shared by the whole engine.

pub(crate) mod name;
pub(crate) mod obj_id;
pub mod unit;

/// Common constants used when writing encoded PDF into a [`Write`].
///
/// [`Write`]: std::io::Write
pub(crate) mod constants {
    /// New line constant
    pub const NL_MARKER: &[u8] = b"\n";

    /// Single Space
    pub const SP: &[u8] = b" ";
}

/// Helper macro for counting the number of written bytes in multiple consecutive writes, where
/// each write returns a `Result<usize, std::io::Error>`
///
/// # Example
///
/// ```ignore
/// let mut writer = Vec::new();
/// let written = write_chain! {
///     writer.write(b"Hello"),
///     writer.write(b", World!"),
/// };
///
/// assert_eq!(written, 13);
/// ```
macro_rules! write_chain {
    ($($expression:expr),* $(,)?) => {{
        let mut written = 0;
        $(
            written += $expression?;
        )*
        written
    }}
}

pub(crate) use write_chain;

/// Formats a coordinate or length in default user space units the way it is placed into content
/// streams and dictionaries: up to four decimal places with trailing zeros removed.
pub(crate) fn fmt_coord(value: f64) -> String {
    let mut out = format!("{value:.4}");
    while out.ends_with('0') {
        out.pop();
    }
    if out.ends_with('.') {
        out.pop();
    }
    out
}

/// Writes a PDF literal string: the bytes wrapped in parentheses, with backslashes and both
/// parentheses escaped by a preceding backslash.
pub(crate) fn write_literal_string(
    writer: &mut dyn std::io::Write,
    bytes: &[u8],
) -> Result<usize, std::io::Error> {
    let mut written = writer.write(b"(")?;
    for &b in bytes {
        if matches!(b, b'(' | b')' | b'\\') {
            written += writer.write(b"\\")?;
        }
        written += writer.write(&[b])?;
    }
    written += writer.write(b")")?;
    Ok(written)
}
