//! Implementation of PDF name.

use std::io::{Error, Write};

/// [`Name`] object is an atomic symbol uniquely defined by a sequence of any characters (8-bit
/// values) except null (character code 0). When writing a name in a PDF file, a SOLIDUS (2Fh) (/)
/// shall be used to introduce a name; no token delimiter (such as white-space) occurs between the
/// SOLIDUS and the encoded name.
///
/// Every name this engine emits (dictionary keys, the core-14 font names, filter and form
/// resource names) consists of regular characters only, so no `#`-escaping is required here.
pub(crate) struct Name<T: AsRef<[u8]>> {
    inner: T,
}

impl<T: AsRef<[u8]>> Name<T> {
    /// Creates a new [`Name`] from a value implementing `AsRef<[u8]>`.
    pub fn new(inner: T) -> Self {
        let inner_ref = inner.as_ref();
        if inner_ref.is_empty() {
            panic!("Dictionary Key must start with '/' followed by at least one ASCII character.");
        }

        if inner_ref.contains(&b'/') {
            panic!("Dictionary Key is not allowed to contain '/'.");
        }

        Self { inner }
    }

    /// Encode and write this `Name` into the provided implementor of [`Write`].
    pub(crate) fn write(&self, writer: &mut dyn Write) -> Result<usize, Error> {
        let mut written = writer.write(b"/")?;
        written += writer.write(self.inner.as_ref())?;
        written += writer.write(b" ")?;
        Ok(written)
    }
}

impl Name<&'static [u8]> {
    pub(crate) const TYPE: Name<&'static [u8]> = Name::from_static(b"Type");

    /// Create a new [`Name`] from a static byte slice.
    /// This allows seamless creation of `Name` for static data without specifying lifetimes.
    pub const fn from_static(inner: &'static [u8]) -> Self {
        if inner.is_empty() {
            panic!("Dictionary Key must start with '/' followed by at least one ASCII character.");
        }

        let mut i = 0;
        while i < inner.len() {
            if inner[i] == b'/' {
                panic!("Dictionary Key is not allowed to contain '/'.");
            }
            i += 1;
        }

        Self { inner }
    }
}
