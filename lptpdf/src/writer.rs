//! The incremental object writer: object-number allocation, `N 0 obj` framing and the
//! cross-reference table.

use std::fs::File;
use std::io::{self, Cursor, Read, Seek, SeekFrom, Write};

use crate::types::obj_id::ObjId;

/// The output a session writes into. Sessions seek backwards to rewrite the append seam and may
/// shorten the file at close, so plain [`Write`] is not enough.
pub trait OutputMedium: Read + Write + Seek {
    /// Cuts the medium off at `len` bytes.
    fn truncate_to(&mut self, len: u64) -> io::Result<()>;
}

impl OutputMedium for File {
    fn truncate_to(&mut self, len: u64) -> io::Result<()> {
        self.set_len(len)
    }
}

impl OutputMedium for Cursor<Vec<u8>> {
    fn truncate_to(&mut self, len: u64) -> io::Result<()> {
        self.get_mut().truncate(len as usize);
        Ok(())
    }
}

/// This represents the PDF-s cross-reference (xref) table, which maps each object in the PDF to
/// its location within the file (byte offset from the start). Entry 0, the free-list head, is
/// implicit.
#[derive(Default, Debug, Clone)]
pub(crate) struct CrossReferenceTable {
    /// Storing solely byte offsets; the generation number is `00000` and the in-use flag `n`
    /// for every real entry this engine ever writes.
    offsets: Vec<u64>,
}

impl CrossReferenceTable {
    /// Marker representing the start of CRT section (4 characters “xref”).
    const XREF_MARKER: &[u8] = b"xref\n";

    /// Rebuilds the table from offsets recovered out of an existing file.
    pub fn from_offsets(offsets: Vec<u64>) -> Self {
        CrossReferenceTable { offsets }
    }

    /// Adds a new object offset to the table, returning the object's number.
    pub fn add_object(&mut self, byte_offset: u64) -> ObjId {
        self.offsets.push(byte_offset);
        ObjId::new(self.offsets.len() as u64)
    }

    /// The number the next allocated object will receive.
    pub fn next_number(&self) -> u64 {
        self.offsets.len() as u64 + 1
    }

    pub fn len(&self) -> usize {
        self.offsets.len()
    }

    /// Drops every entry past `len` objects; used when a checkpoint rewinds the session.
    pub fn rewind_to(&mut self, len: usize) {
        self.offsets.truncate(len);
    }

    pub fn offset_of(&self, id: ObjId) -> Option<u64> {
        self.offsets.get(id.number() as usize - 1).copied()
    }

    /// Writes the xref section: one subsection covering every object, each entry exactly
    /// twenty bytes (`%010u %05u n \n` — the trailing space is part of the two-byte EOL).
    pub fn write(&self, writer: &mut dyn Write) -> Result<usize, io::Error> {
        let written = crate::types::write_chain! {
            writer.write(Self::XREF_MARKER),
            writer.write(format!("0 {}\n", self.offsets.len() + 1).as_bytes()),
            writer.write(b"0000000000 65535 f \n"),
            self.offsets.iter()
                .map(|offset| writer.write(format!("{offset:010} 00000 n \n").as_bytes()))
                .sum::<Result<usize, _>>(),
        };

        Ok(written)
    }
}

/// A wrapper around the output medium that keeps the cross-reference table consistent with
/// every object framing it writes.
pub(crate) struct ObjectWriter<F> {
    inner: F,
    xref: CrossReferenceTable,
}

impl<F: OutputMedium> ObjectWriter<F> {
    pub fn new(inner: F) -> Self {
        ObjectWriter {
            inner,
            xref: CrossReferenceTable::default(),
        }
    }

    pub fn xref(&self) -> &CrossReferenceTable {
        &self.xref
    }

    pub fn xref_mut(&mut self) -> &mut CrossReferenceTable {
        &mut self.xref
    }

    /// Direct access to the medium, for content emission between the object frames and for the
    /// seam seeks of append mode.
    pub fn medium(&mut self) -> &mut F {
        &mut self.inner
    }

    pub fn position(&mut self) -> Result<u64, io::Error> {
        self.inner.stream_position()
    }

    /// Allocates the next object number, records the current offset for it, and writes the
    /// `N 0 obj` line.
    pub fn begin_obj(&mut self) -> Result<ObjId, io::Error> {
        let offset = self.inner.stream_position()?;
        let id = self.xref.add_object(offset);
        tracing::trace!(number = id.number(), offset, "object");
        id.write_def(&mut self.inner)?;
        self.inner.write_all(b"\n")?;
        Ok(id)
    }

    /// Closes the current object frame.
    pub fn end_obj(&mut self) -> Result<(), io::Error> {
        self.inner.write_all(b"endobj\n\n")
    }

    /// Writes the xref section, returning the offset it starts at for `startxref`.
    pub fn write_xref(&mut self) -> Result<u64, io::Error> {
        let offset = self.inner.stream_position()?;
        self.xref.write(&mut self.inner)?;
        Ok(offset)
    }

    /// Ends the file at the current position and pushes everything to the OS.
    pub fn finish_at_current_len(&mut self) -> Result<(), io::Error> {
        let len = self.inner.stream_position()?;
        self.inner.truncate_to(len)?;
        self.inner.flush()
    }

    pub fn seek(&mut self, pos: SeekFrom) -> Result<u64, io::Error> {
        self.inner.seek(pos)
    }

    pub fn into_inner(self) -> F {
        self.inner
    }
}

#[cfg(test)]
mod tests {
    use std::io::{Cursor, SeekFrom, Write};

    use super::{CrossReferenceTable, ObjectWriter};

    #[test]
    fn xref_entries_are_twenty_bytes() {
        let mut xref = CrossReferenceTable::default();
        xref.add_object(9);
        xref.add_object(147);

        let mut out = Vec::new();
        let written = xref.write(&mut out).unwrap();

        let output = String::from_utf8(out).unwrap();
        // the trailing space of each entry is significant: it is half of the 2-byte EOL
        assert_eq!(
            output,
            "xref\n0 3\n0000000000 65535 f \n0000000009 00000 n \n0000000147 00000 n \n"
        );
        assert_eq!(written, output.len());
        for line in output.lines().skip(2) {
            assert_eq!(line.len() + 1, 20);
        }
    }

    #[test]
    fn objects_are_framed_and_recorded() {
        let mut writer = ObjectWriter::new(Cursor::new(Vec::new()));
        writer.medium().write_all(b"%PDF-1.4\n").unwrap();

        let id = writer.begin_obj().unwrap();
        writer.medium().write_all(b"<< /Length 2 >>\n").unwrap();
        writer.end_obj().unwrap();

        assert_eq!(id.number(), 1);
        assert_eq!(writer.xref().offset_of(id), Some(9));

        let bytes = writer.into_inner().into_inner();
        let text = String::from_utf8(bytes).unwrap();
        assert!(text[9..].starts_with("1 0 obj\n"));
        assert!(text.ends_with("endobj\n\n"));
    }

    #[test]
    fn rewinding_drops_later_objects() {
        let mut writer = ObjectWriter::new(Cursor::new(Vec::new()));
        let first = writer.begin_obj().unwrap();
        writer.end_obj().unwrap();
        let keep = writer.xref().len();
        let pos = writer.position().unwrap();

        writer.begin_obj().unwrap();
        writer.end_obj().unwrap();

        writer.xref_mut().rewind_to(keep);
        writer.seek(SeekFrom::Start(pos)).unwrap();
        assert_eq!(writer.xref().next_number(), first.number() + 1);
    }

    #[test]
    fn truncation_shortens_a_cursor() {
        let mut writer = ObjectWriter::new(Cursor::new(Vec::new()));
        writer.medium().write_all(b"0123456789").unwrap();
        writer.seek(SeekFrom::Start(4)).unwrap();
        writer.finish_at_current_len().unwrap();
        assert_eq!(writer.into_inner().into_inner(), b"0123");
    }
}
