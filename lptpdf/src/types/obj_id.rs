//! Implementation of PDF indirect-object identifiers.

use std::io::{Error, Write};

use crate::types;

/// Any object in a PDF file may be labelled as an indirect object. This gives the object a unique
/// object identifier by which other objects can refer to it. The object may be referred to from
/// elsewhere in the file by an indirect reference. Such indirect references shall consist of the
/// object number, the generation number, and the keyword R (with whitespace separating each part).
///
/// Example: `4 0 R`
///
/// Identifiers are handed out by the [`ObjectWriter`], which records the file offset of every
/// object at the moment its number is allocated.
///
/// [`ObjectWriter`]: crate::writer::ObjectWriter
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct ObjId {
    /// Identifier of referenced object.
    id: u64,
}

impl ObjId {
    /// Marker indicating start of an object section
    const START_OBJ_MARKER: &[u8] = b"obj";

    pub(crate) fn new(id: u64) -> Self {
        Self { id }
    }

    /// The raw object number.
    pub fn number(&self) -> u64 {
        self.id
    }

    /// Write the encoded PDF object reference into the provided implementor of [`Write`].
    pub(crate) fn write_ref(&self, writer: &mut dyn Write) -> Result<usize, Error> {
        let written = types::write_chain! {
            writer.write(self.id.to_string().as_bytes()),
            // NOTE: generation is always 0; appended sessions rewrite whole objects in place
            //       instead of bumping generations
            writer.write(b" 0 R"),
        };

        Ok(written)
    }

    /// Write the encoded PDF object id into the provided implementor of [`Write`].
    pub(crate) fn write_def(&self, writer: &mut dyn Write) -> Result<usize, Error> {
        let written = types::write_chain! {
            writer.write(self.id.to_string().as_bytes()),
            writer.write(b" 0 "),
            writer.write(Self::START_OBJ_MARKER),
        };

        Ok(written)
    }
}

#[cfg(test)]
mod tests {
    use super::ObjId;

    #[test]
    fn def_and_ref() {
        let id = ObjId::new(4);

        let mut out = Vec::new();
        id.write_def(&mut out).unwrap();
        assert_eq!(&out, b"4 0 obj");

        out.clear();
        id.write_ref(&mut out).unwrap();
        assert_eq!(&out, b"4 0 R");
    }
}
