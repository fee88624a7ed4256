//! The printer session: configuration, the print loop, page emission and the append/checkpoint
//! protocol around the file tail.

use std::fs::{File, OpenOptions};
use std::io::{Read, SeekFrom, Write};
use std::path::Path;

use sha1::{Digest, Sha1};

use crate::append::{self, Carryover};
use crate::content;
use crate::control::{ControlParser, PITCH_6_LPI, PITCH_8_LPI};
use crate::error::Error;
use crate::form;
use crate::jpeg::JpegInfo;
use crate::objects::{Catalog, FontDictionary, InfoDictionary, PageObject, PageTreeNode};
use crate::page::PageBuffer;
use crate::settings::{check_font, FileMode, FormKind, Geometry, Settings};
use crate::types::obj_id::ObjId;
use crate::types::unit::Unit;
use crate::writer::{CrossReferenceTable, ObjectWriter, OutputMedium};

/// The file-header bytes: the version line and the high-bit comment that marks the file as
/// binary for transfer tools.
const HEADER: &[u8] = b"%PDF-1.4\n%\xE2\xE3\xCF\xD3\n";

/// Where a session stands with respect to the bytes on disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SessionState {
    /// Nothing written yet; settings may still change.
    Fresh,

    /// Output under way into a file this session created.
    DirtyNew,

    /// Output under way after an append seam; the previous root carries a parent placeholder.
    DirtyAppend,

    /// A checkpoint tail is on disk and will be overwritten by the next write.
    Resumed,
}

/// A printing session bound to one output file.
///
/// A session is driven by [`print`](Printer::print) calls carrying raw lineprinter data and is
/// finished with [`close`](Printer::close). [`checkpoint`](Printer::checkpoint) leaves a valid
/// PDF on disk at any point without ending the session. A session is single-threaded; separate
/// sessions on separate files are independent.
pub struct Printer<F: OutputMedium = File> {
    settings: Settings,
    state: SessionState,
    writer: ObjectWriter<F>,
    parser: ControlParser,
    /// Parse buffer reused across print calls.
    codes: Vec<u16>,
    page: PageBuffer,
    geometry: Option<Geometry>,
    /// Current vertical pitch; changed in-stream by `CSI Pn z`.
    lpi: u32,
    /// The pitch when the current page started, used for the page's base leading.
    page_start_lpi: u32,
    form_cache: Option<Vec<u8>>,
    jpeg: Option<(JpegInfo, Vec<u8>)>,
    image_obj: Option<ObjId>,
    /// Content-stream objects of the pages finished this session.
    content_ids: Vec<ObjId>,
    hasher: Sha1,
    carry: Option<Carryover>,
    /// File offset of the ten placeholder digits in the rewritten previous root.
    placeholder_at: Option<u64>,
    last_error: Option<Error>,
}

impl Printer<File> {
    /// Opens `path` for a new session. The file is created when absent and never truncated
    /// here; what an existing file may contain is decided by the file mode at first output.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, Error> {
        let path = path.as_ref();
        let is_pdf = path
            .extension()
            .map(|e| e.eq_ignore_ascii_case("pdf"))
            .unwrap_or(false);
        if !is_pdf {
            return Err(Error::BadFileName);
        }

        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(path)?;
        tracing::info!(path = %path.display(), "session opened");
        Ok(Self::from_medium(file))
    }
}

impl<F: OutputMedium> Printer<F> {
    /// Builds a session over an arbitrary medium. [`open`](Printer::open) is the file-backed
    /// front of this.
    pub fn from_medium(medium: F) -> Self {
        let settings = Settings::default();
        let lpi = settings.lpi;
        Printer {
            settings,
            state: SessionState::Fresh,
            writer: ObjectWriter::new(medium),
            parser: ControlParser::new(true),
            codes: Vec::new(),
            page: PageBuffer::new(1, 0),
            geometry: None,
            lpi,
            page_start_lpi: lpi,
            form_cache: None,
            jpeg: None,
            image_obj: None,
            content_ids: Vec::new(),
            hasher: Sha1::new(),
            carry: None,
            placeholder_at: None,
            last_error: None,
        }
    }

    // --- configuration ------------------------------------------------------------------

    /// Fails with [`Error::Active`] once any output has been produced.
    fn settable(&mut self) -> Result<&mut Settings, Error> {
        if self.state != SessionState::Fresh {
            return Err(Error::Active);
        }
        Ok(&mut self.settings)
    }

    pub fn set_file_mode(&mut self, mode: FileMode) -> Result<(), Error> {
        self.settable()?.mode = mode;
        Ok(())
    }

    pub fn set_page_width(&mut self, value: Unit) -> Result<(), Error> {
        Self::positive(value)?;
        self.settable()?.page_width = value;
        Ok(())
    }

    pub fn set_page_length(&mut self, value: Unit) -> Result<(), Error> {
        Self::positive(value)?;
        self.settable()?.page_length = value;
        Ok(())
    }

    pub fn set_top_margin(&mut self, value: Unit) -> Result<(), Error> {
        Self::positive(value)?;
        self.settable()?.top_margin = value;
        Ok(())
    }

    pub fn set_bottom_margin(&mut self, value: Unit) -> Result<(), Error> {
        Self::positive(value)?;
        self.settable()?.bottom_margin = value;
        Ok(())
    }

    pub fn set_side_margin(&mut self, value: Unit) -> Result<(), Error> {
        Self::positive(value)?;
        self.settable()?.side_margin = value;
        Ok(())
    }

    pub fn set_cpi(&mut self, value: f64) -> Result<(), Error> {
        if !(value > 0.0) {
            return Err(Error::Invalid);
        }
        self.settable()?.cpi = value;
        Ok(())
    }

    /// Only the two lineprinter pitches exist: 6 and 8 lines per inch.
    pub fn set_lpi(&mut self, value: u32) -> Result<(), Error> {
        if value != 6 && value != 8 {
            return Err(Error::Invalid);
        }
        self.settable()?.lpi = value;
        self.lpi = value;
        self.page_start_lpi = value;
        Ok(())
    }

    pub fn set_cols(&mut self, value: u32) -> Result<(), Error> {
        if value == 0 {
            return Err(Error::Invalid);
        }
        self.settable()?.cols = value;
        Ok(())
    }

    pub fn set_tof_offset(&mut self, value: u32) -> Result<(), Error> {
        self.settable()?.tof_offset = Some(value);
        Ok(())
    }

    pub fn set_number_width(&mut self, value: Unit) -> Result<(), Error> {
        Self::positive(value)?;
        self.settable()?.number_width = value;
        Ok(())
    }

    pub fn set_bar_height(&mut self, value: Unit) -> Result<(), Error> {
        Self::positive(value)?;
        self.settable()?.bar_height = value;
        Ok(())
    }

    /// Selects a named form. Image stationery is selected by
    /// [`set_form_image`](Printer::set_form_image) instead.
    pub fn set_form(&mut self, form: FormKind) -> Result<(), Error> {
        if form == FormKind::Image {
            return Err(Error::Invalid);
        }
        self.settable()?.form = form;
        Ok(())
    }

    /// Uses the JPEG file at `path` as the page background.
    pub fn set_form_image(&mut self, path: impl AsRef<Path>) -> Result<(), Error> {
        let settings = self.settable()?;
        settings.form_image = Some(path.as_ref().to_path_buf());
        settings.form = FormKind::Image;
        Ok(())
    }

    pub fn set_text_font(&mut self, name: &str) -> Result<(), Error> {
        let font = check_font(name)?;
        self.settable()?.text_font = font;
        Ok(())
    }

    pub fn set_number_font(&mut self, name: &str) -> Result<(), Error> {
        let font = check_font(name)?;
        self.settable()?.number_font = font;
        Ok(())
    }

    pub fn set_label_font(&mut self, name: &str) -> Result<(), Error> {
        let font = check_font(name)?;
        self.settable()?.label_font = font;
        Ok(())
    }

    pub fn set_title(&mut self, title: &str) -> Result<(), Error> {
        self.settable()?.title = title.to_string();
        Ok(())
    }

    pub fn set_creator(&mut self, creator: &str) -> Result<(), Error> {
        self.settable()?.creator = Some(creator.to_string());
        Ok(())
    }

    /// Disables LZW packing of content streams.
    pub fn set_uncompressed(&mut self, uncompressed: bool) -> Result<(), Error> {
        self.settable()?.no_lzw = uncompressed;
        Ok(())
    }

    fn positive(value: Unit) -> Result<(), Error> {
        if value.is_negative() {
            return Err(Error::NegativeValue);
        }
        Ok(())
    }

    // --- errors -------------------------------------------------------------------------

    /// The code of the sticky error, 0 when the session is healthy.
    pub fn last_error(&self) -> i32 {
        self.last_error.as_ref().map(Error::code).unwrap_or(0)
    }

    /// Clears the sticky error so operations stop short-circuiting.
    pub fn clear_error(&mut self) {
        self.last_error = None;
    }

    /// Prints the sticky error to standard error, `perror`-style.
    pub fn perror(&self, prefix: &str) {
        match &self.last_error {
            Some(error) => eprintln!("{prefix}: {error}"),
            None => eprintln!("{prefix}: no error"),
        }
    }

    fn guard(&self) -> Result<(), Error> {
        match &self.last_error {
            Some(error) => Err(error.clone()),
            None => Ok(()),
        }
    }

    fn record<T>(&mut self, result: Result<T, Error>) -> Result<T, Error> {
        if let Err(error) = &result {
            if self.last_error.is_none() {
                self.last_error = Some(error.clone());
            }
        }
        result
    }

    // --- the print path -----------------------------------------------------------------

    /// Submits raw lineprinter bytes.
    pub fn print(&mut self, data: &[u8]) -> Result<(), Error> {
        self.guard()?;
        let result = self.print_inner(data);
        self.record(result)
    }

    fn print_inner(&mut self, data: &[u8]) -> Result<(), Error> {
        if self.state == SessionState::Fresh {
            self.first_write()?;
        } else if self.state == SessionState::Resumed {
            // writing again invalidates the checkpoint tail
            self.state = if self.carry.is_some() {
                SessionState::DirtyAppend
            } else {
                SessionState::DirtyNew
            };
        }

        // the fingerprint sees every raw byte, before any filtering
        self.hasher.update(data);

        let mut codes = std::mem::take(&mut self.codes);
        codes.clear();
        self.parser.feed(data, &mut codes);

        for &code in &codes {
            match code {
                PITCH_6_LPI => self.lpi = 6,
                PITCH_8_LPI => self.lpi = 8,
                0x0A => self.page.line_feed(self.lpi),
                0x0D => self.page.carriage_return(),
                0x0C => self.turn_page(true)?,
                ch => {
                    while self.page.overflowed() {
                        self.turn_page(false)?;
                    }
                    self.page.put_char(ch, self.lpi);
                }
            }
        }

        self.codes = codes;
        Ok(())
    }

    /// Whether no output has been produced yet this session.
    pub fn is_empty(&self) -> bool {
        self.state == SessionState::Fresh
    }

    /// Total pages of the document so far, including previous sessions.
    pub fn page_count(&self) -> u64 {
        let previous = self.carry.as_ref().map(|c| c.count).unwrap_or(0);
        previous + self.content_ids.len() as u64
    }

    /// The 1-based (page, line) the next character would print at. Lines count from the
    /// top-of-form offset.
    pub fn position(&self) -> (u64, u64) {
        let page = self.page_count() + 1;
        let line = match self.page.current_line() {
            0 => 1,
            n => (n as i64 - self.page.top_of_form() as i64).max(1) as u64,
        };
        (page, line)
    }

    // --- first write --------------------------------------------------------------------

    fn first_write(&mut self) -> Result<(), Error> {
        let geometry = self.settings.resolve()?;

        if let Some(path) = self.settings.form_image.clone() {
            let mut bytes = Vec::new();
            File::open(&path)?.read_to_end(&mut bytes)?;
            let info = JpegInfo::probe(&bytes)?;
            tracing::debug!(width = info.width, height = info.height, "form image loaded");
            self.jpeg = Some((info, bytes));
        }

        let existing = self.writer.seek(SeekFrom::End(0))?;
        let appending = match self.settings.mode {
            FileMode::New if existing > 0 => return Err(Error::NotEmpty),
            FileMode::Replace => {
                self.writer.seek(SeekFrom::Start(0))?;
                self.writer.medium().truncate_to(0)?;
                false
            }
            FileMode::Append if existing > 0 => true,
            _ => false,
        };

        self.geometry = Some(geometry);
        self.parser = ControlParser::new(!appending);

        if appending {
            self.enter_append_mode()?;
            self.state = SessionState::DirtyAppend;
        } else {
            self.writer.seek(SeekFrom::Start(0))?;
            self.writer.medium().write_all(HEADER)?;
            self.state = SessionState::DirtyNew;
        }

        let geometry = self.geometry.as_ref().expect("geometry was just resolved");
        self.page = PageBuffer::new(
            geometry.lines_per_page(self.lpi),
            geometry.top_of_form(self.lpi),
        );
        self.page_start_lpi = self.lpi;
        Ok(())
    }

    /// Reads the previous session's tail and rewrites its root `Pages` node in place, with a
    /// placeholder `/Parent` to be patched at close. New objects follow the rewritten node.
    fn enter_append_mode(&mut self) -> Result<(), Error> {
        let mut magic = [0u8; 8];
        self.writer.seek(SeekFrom::Start(0))?;
        if self.writer.medium().read_exact(&mut magic).is_err() || !magic.starts_with(b"%PDF-1.") {
            return Err(Error::NotPdf);
        }

        let carry = append::read_tail(self.writer.medium())?;

        let xref = CrossReferenceTable::from_offsets(carry.offsets.clone());
        let anchor_offset = xref
            .offset_of(carry.anchor)
            .ok_or(Error::Bugcheck("append seam lost the anchor offset"))?;

        self.writer.seek(SeekFrom::Start(anchor_offset))?;
        let medium = self.writer.medium();
        carry.anchor.write_def(medium)?;
        medium.write_all(b"\n<< /Type /Pages \n/Parent ")?;
        let placeholder_at = medium.stream_position()?;
        medium.write_all(b"0000000000 0 R\n/Kids [")?;
        for (index, kid) in carry.kids.iter().enumerate() {
            if index > 0 {
                medium.write_all(b" ")?;
            }
            kid.write_ref(medium)?;
        }
        medium.write_all(format!("]\n/Count {} >>\nendobj\n\n", carry.count).as_bytes())?;

        *self.writer.xref_mut() = xref;
        self.placeholder_at = Some(placeholder_at);
        self.carry = Some(carry);
        Ok(())
    }

    // --- page emission ------------------------------------------------------------------

    /// Finishes the current page into the file and starts the next one. `after_ff` tells the
    /// buffer whether to resume at the top-of-form line or below the carried-over overflow.
    fn turn_page(&mut self, after_ff: bool) -> Result<(), Error> {
        self.emit_page_object()?;

        let geometry = self
            .geometry
            .as_ref()
            .ok_or(Error::Bugcheck("page turn before first write"))?;
        self.page.start_next_page(
            after_ff,
            geometry.lines_per_page(self.lpi),
            geometry.top_of_form(self.lpi),
        );
        self.page_start_lpi = self.lpi;
        Ok(())
    }

    /// Writes the content-stream object for the current page state.
    fn emit_page_object(&mut self) -> Result<(), Error> {
        let geometry = self
            .geometry
            .clone()
            .ok_or(Error::Bugcheck("page emission before first write"))?;

        if self.image_obj.is_none() {
            if let Some((info, bytes)) = self.jpeg.take() {
                let id = self.write_image_object(&info, &bytes)?;
                self.image_obj = Some(id);
                self.jpeg = Some((info, bytes));
            }
        }

        let form_bytes = match &self.form_cache {
            Some(cached) => cached.clone(),
            None => {
                let rendered = form::render(
                    &geometry,
                    self.settings.form,
                    self.jpeg.as_ref().map(|(info, _)| info),
                );
                self.form_cache = Some(rendered.clone());
                rendered
            }
        };

        let mut stream = form_bytes;
        stream.extend(content::text_overlay(
            self.page.visible_lines(),
            &geometry,
            self.page_start_lpi,
        ));

        let (body, packed) = if self.settings.no_lzw {
            (stream, false)
        } else {
            let compressed = crate::lzw::compress(&stream);
            if compressed.len() < stream.len() {
                (compressed, true)
            } else {
                (stream, false)
            }
        };

        let id = self.writer.begin_obj()?;
        let medium = self.writer.medium();
        if packed {
            medium.write_all(
                format!(
                    "<< /Length {} /Filter /LZWDecode /DecodeParms << /EarlyChange 0 >> >>\n",
                    body.len()
                )
                .as_bytes(),
            )?;
        } else {
            medium.write_all(format!("<< /Length {} >>\n", body.len()).as_bytes())?;
        }
        medium.write_all(b"stream\n")?;
        medium.write_all(&body)?;
        medium.write_all(b"\nendstream\n")?;
        self.writer.end_obj()?;

        self.content_ids.push(id);
        tracing::debug!(
            page = self.page_count(),
            object = id.number(),
            packed,
            "page content written"
        );
        Ok(())
    }

    /// The image XObject carrying the background JPEG verbatim under `DCTDecode`.
    fn write_image_object(&mut self, info: &JpegInfo, bytes: &[u8]) -> Result<ObjId, Error> {
        let id = self.writer.begin_obj()?;
        let medium = self.writer.medium();
        medium.write_all(
            format!(
                "<< /Type /XObject /Subtype /Image /Width {} /Height {} \
                 /ColorSpace /{} /BitsPerComponent 8 /Filter /DCTDecode /Length {} >>\n",
                info.width,
                info.height,
                info.color_space(),
                bytes.len()
            )
            .as_bytes(),
        )?;
        medium.write_all(b"stream\n")?;
        medium.write_all(bytes)?;
        medium.write_all(b"\nendstream\n")?;
        self.writer.end_obj()?;
        Ok(id)
    }

    // --- tail, checkpoint, close --------------------------------------------------------

    /// Writes everything after the page content: the session page tree, fonts, page objects,
    /// the linking anchor, catalog, info, xref and trailer; patches the append placeholder and
    /// cuts the file at the new end.
    fn write_tail(&mut self) -> Result<(), Error> {
        let session_pages = self.content_ids.len() as u64;
        let next = self.writer.xref().next_number();
        let leaf = ObjId::new(next);
        let fonts = ObjId::new(next + 1);
        let first_page = next + 2;
        let anchor = ObjId::new(first_page + session_pages);
        let catalog = ObjId::new(anchor.number() + 1);
        let info = ObjId::new(anchor.number() + 2);

        let geometry = self
            .geometry
            .as_ref()
            .ok_or(Error::Bugcheck("tail written before first write"))?;
        let page_ids: Vec<ObjId> = (0..session_pages)
            .map(|index| ObjId::new(first_page + index))
            .collect();

        // session leaf
        let id = self.writer.begin_obj()?;
        debug_assert_eq!(id, leaf);
        PageTreeNode {
            parent: Some(anchor),
            kids: page_ids.clone(),
            count: session_pages,
        }
        .write(self.writer.medium())?;
        self.writer.end_obj()?;

        // shared font dictionary
        self.writer.begin_obj()?;
        FontDictionary {
            text: self.settings.text_font,
            number: self.settings.number_font,
            label: self.settings.label_font,
        }
        .write(self.writer.medium())?;
        self.writer.end_obj()?;

        // page objects
        for (index, &contents) in self.content_ids.iter().enumerate() {
            let id = self.writer.begin_obj()?;
            debug_assert_eq!(id, page_ids[index]);
            PageObject {
                parent: leaf,
                media_width: geometry.width,
                media_height: geometry.length,
                contents,
                fonts,
                image: self.image_obj,
            }
            .write(self.writer.medium())?;
            self.writer.end_obj()?;
        }

        // the anchor linking this session below the previous ones
        let (kids, total) = match &self.carry {
            Some(carry) => (
                Vec::from([carry.anchor, leaf]),
                carry.count + session_pages,
            ),
            None => (Vec::from([leaf]), session_pages),
        };
        let id = self.writer.begin_obj()?;
        debug_assert_eq!(id, anchor);
        PageTreeNode {
            parent: None,
            kids,
            count: total,
        }
        .write(self.writer.medium())?;
        self.writer.end_obj()?;

        // catalog and info
        let id = self.writer.begin_obj()?;
        debug_assert_eq!(id, catalog);
        Catalog {
            root_page_tree: anchor,
        }
        .write(self.writer.medium())?;
        self.writer.end_obj()?;

        let now = pdf_date_now();
        let creation = match &self.carry {
            Some(carry) => carry.creation_date.clone(),
            None => now.clone(),
        };
        let id = self.writer.begin_obj()?;
        debug_assert_eq!(id, info);
        InfoDictionary {
            title: &self.settings.title,
            creator: self.settings.creator.as_deref(),
            producer: concat!("LPTPDF ", env!("CARGO_PKG_VERSION")),
            creation_date: &creation,
            mod_date: &now,
        }
        .write(self.writer.medium())?;
        self.writer.end_obj()?;

        // xref and trailer
        let xref_offset = self.writer.write_xref()?;
        let size = self.writer.xref().len() + 1;

        let fresh_id = hex::encode(self.hasher.clone().finalize());
        let first_id = self
            .carry
            .as_ref()
            .map(|c| c.first_id.clone())
            .unwrap_or_else(|| fresh_id.clone());

        let medium = self.writer.medium();
        medium.write_all(b"trailer\n")?;
        medium.write_all(
            format!(
                "<< /Size {size}\n/Root {} 0 R\n/Info {} 0 R\n/ID [<{first_id}> <{fresh_id}>]\n>>\n",
                catalog.number(),
                info.number()
            )
            .as_bytes(),
        )?;
        medium.write_all(format!("startxref\n{xref_offset}\n%%EOF\n").as_bytes())?;

        // resolve the reserved parent reference in the previous root
        let end = self.writer.position()?;
        if let Some(placeholder) = self.placeholder_at {
            self.writer.seek(SeekFrom::Start(placeholder))?;
            self.writer
                .medium()
                .write_all(format!("{:010}", anchor.number()).as_bytes())?;
            self.writer.seek(SeekFrom::Start(end))?;
        }
        self.writer.finish_at_current_len()?;
        Ok(())
    }

    /// Writes a complete, valid trailer and keeps the session open: the next print overwrites
    /// the just-written tail as if the file had been reopened for append.
    pub fn checkpoint(&mut self) -> Result<(), Error> {
        self.guard()?;
        let result = self.checkpoint_inner();
        self.record(result)
    }

    fn checkpoint_inner(&mut self) -> Result<(), Error> {
        if self.state == SessionState::Fresh {
            // nothing on disk yet, and nothing to make valid
            return Ok(());
        }

        let saved_xref = self.writer.xref().len();
        let saved_pages = self.content_ids.len();
        let saved_position = self.writer.position()?;
        let saved_image = self.image_obj;

        if self.page.is_dirty() {
            self.emit_page_object()?;
        }
        self.write_tail()?;

        self.writer.xref_mut().rewind_to(saved_xref);
        self.content_ids.truncate(saved_pages);
        self.image_obj = saved_image;
        self.writer.seek(SeekFrom::Start(saved_position))?;
        self.state = SessionState::Resumed;
        tracing::info!(pages = self.page_count(), "checkpoint written");
        Ok(())
    }

    /// Checkpoints, then copies the current file bytes to `path`.
    pub fn snapshot(&mut self, path: impl AsRef<Path>) -> Result<(), Error> {
        self.guard()?;
        let result = self.snapshot_inner(path.as_ref());
        self.record(result)
    }

    fn snapshot_inner(&mut self, path: &Path) -> Result<(), Error> {
        self.checkpoint_inner()?;
        let bytes = self.document_bytes()?;

        let mut out = File::create(path)?;
        out.write_all(&bytes)?;
        out.flush()?;
        tracing::info!(path = %path.display(), "snapshot copied");
        Ok(())
    }

    /// A copy of the document bytes as they currently stand on the medium. Right after a
    /// [`checkpoint`](Printer::checkpoint) this is a complete, valid PDF.
    pub fn document_bytes(&mut self) -> Result<Vec<u8>, Error> {
        // an explicit seek separates any pending write traffic from the read pass
        let resume_at = self.writer.position()?;
        self.writer.seek(SeekFrom::Start(0))?;
        let mut bytes = Vec::new();
        self.writer.medium().read_to_end(&mut bytes)?;
        self.writer.seek(SeekFrom::Start(resume_at))?;
        Ok(bytes)
    }

    /// Finalizes the document and releases the session. I/O failures still release the
    /// resources and report the first error encountered.
    pub fn close(self) -> Result<(), Error> {
        self.into_medium().map(drop)
    }

    /// Like [`close`](Printer::close), but hands the finished medium back.
    pub fn into_medium(mut self) -> Result<F, Error> {
        if let Some(error) = self.last_error.take() {
            return Err(error);
        }

        if self.state == SessionState::Fresh {
            // never written to: leave the file untouched
            return Ok(self.writer.into_inner());
        }

        if self.page.is_dirty() {
            self.emit_page_object()?;
        }
        self.write_tail()?;
        tracing::info!(pages = self.page_count(), "session closed");
        Ok(self.writer.into_inner())
    }
}

/// The current moment in PDF date syntax.
fn pdf_date_now() -> String {
    let now = time::OffsetDateTime::now_utc();
    format!(
        "D:{:04}{:02}{:02}{:02}{:02}{:02}Z",
        now.year(),
        u8::from(now.month()),
        now.day(),
        now.hour(),
        now.minute(),
        now.second()
    )
}
