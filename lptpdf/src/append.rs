//! Recovering the state of a previously written file so a new session can extend it.
//!
//! Only files this engine produced are accepted, so the reader is a strict scanner over the
//! exact layout the writer emits: one xref subsection starting at object 0, generation numbers
//! of 0, and the catalog and info dictionaries as the last two objects.

use std::io::{Read, Seek, SeekFrom};

use crate::error::Error;
use crate::types::obj_id::ObjId;
use crate::writer::OutputMedium;

/// How far before end-of-file the `startxref` marker is searched for.
const TRAILER_SCAN_WINDOW: u64 = 2048;

/// Everything carried across the session seam.
#[derive(Debug, Clone)]
pub(crate) struct Carryover {
    /// Object number of the previous session's root `Pages` node. The new session rewrites it
    /// in place and the new anchor adopts it as its first kid.
    pub anchor: ObjId,

    /// The children the previous root listed, preserved verbatim in the rewrite.
    pub kids: Vec<ObjId>,

    /// `/Count` of the previous root: total pages of all previous sessions.
    pub count: u64,

    /// First element of the previous `/ID`, preserved for the lifetime of the document.
    pub first_id: String,

    /// The previous `/CreationDate`, preserved while `/ModDate` moves forward.
    pub creation_date: String,

    /// Byte offsets of objects `1..=anchor`, for rebuilding the in-memory xref.
    pub offsets: Vec<u64>,
}

/// Reads the trailer, xref and page-tree seam of an existing file.
pub(crate) fn read_tail<F: OutputMedium>(file: &mut F) -> Result<Carryover, Error> {
    let file_len = file.seek(SeekFrom::End(0))?;

    let window = file_len.min(TRAILER_SCAN_WINDOW);
    let mut tail = vec![0u8; window as usize];
    file.seek(SeekFrom::Start(file_len - window))?;
    file.read_exact(&mut tail)?;

    let marker = find_last(&tail, b"\nstartxref\n").ok_or(Error::NoAppend)?;
    let after = &tail[marker + b"\nstartxref\n".len()..];
    let line_end = after
        .iter()
        .position(|&b| b == b'\n')
        .ok_or(Error::NoAppend)?;
    let xref_offset: u64 = std::str::from_utf8(&after[..line_end])
        .map_err(|_| Error::NoAppend)?
        .trim()
        .parse()
        .map_err(|_| Error::NoAppend)?;
    if !after[line_end + 1..].starts_with(b"%%EOF") {
        return Err(Error::NoAppend);
    }

    // the xref section, the trailer dictionary and everything after fit in one read
    if xref_offset >= file_len {
        return Err(Error::NoAppend);
    }
    let mut section = vec![0u8; (file_len - xref_offset) as usize];
    file.seek(SeekFrom::Start(xref_offset))?;
    file.read_exact(&mut section)?;

    let offsets = parse_xref(&section)?;
    let trailer = &section[find_last(&section, b"trailer").ok_or(Error::NoAppend)?..];

    let size = dict_integer(trailer, b"/Size").ok_or(Error::NoAppend)?;
    let root = ObjId::new(dict_integer(trailer, b"/Root").ok_or(Error::NoAppend)?);
    let info = ObjId::new(dict_integer(trailer, b"/Info").ok_or(Error::NoAppend)?);
    let first_id = dict_hex_string(trailer).ok_or(Error::NoAppend)?;

    // this engine always writes ... anchor, catalog, info, so the layout is checkable
    if size != offsets.len() as u64 + 1
        || info.number() != root.number() + 1
        || info.number() != offsets.len() as u64
        || root.number() < 2
    {
        return Err(Error::NoAppend);
    }
    let anchor = ObjId::new(root.number() - 1);

    let catalog_body = read_object(file, &offsets, root)?;
    let pages = ObjId::new(dict_integer(&catalog_body, b"/Pages").ok_or(Error::NoAppend)?);
    if pages != anchor {
        return Err(Error::NoAppend);
    }

    let info_body = read_object(file, &offsets, info)?;
    let producer = dict_literal_string(&info_body, b"/Producer").ok_or(Error::NotProduced)?;
    if !producer.starts_with("LPTPDF") {
        return Err(Error::NotProduced);
    }
    let creation_date =
        dict_literal_string(&info_body, b"/CreationDate").ok_or(Error::NoAppend)?;

    let anchor_body = read_object(file, &offsets, anchor)?;
    let count = dict_integer(&anchor_body, b"/Count").ok_or(Error::NoAppend)?;
    let kids = dict_references(&anchor_body, b"/Kids").ok_or(Error::NoAppend)?;

    let mut offsets = offsets;
    offsets.truncate(anchor.number() as usize);

    tracing::debug!(
        pages = count,
        anchor = anchor.number(),
        "recovered append seam"
    );

    Ok(Carryover {
        anchor,
        kids,
        count,
        first_id,
        creation_date,
        offsets,
    })
}

/// Parses the single-subsection xref this engine writes, returning the offsets of objects
/// `1..size`.
fn parse_xref(section: &[u8]) -> Result<Vec<u64>, Error> {
    let text = section;
    if !text.starts_with(b"xref\n") {
        return Err(Error::NoAppend);
    }
    let rest = &text[5..];
    let header_end = rest
        .iter()
        .position(|&b| b == b'\n')
        .ok_or(Error::NoAppend)?;
    let header = std::str::from_utf8(&rest[..header_end]).map_err(|_| Error::NoAppend)?;
    let mut parts = header.split_whitespace();
    let start: u64 = parts
        .next()
        .and_then(|v| v.parse().ok())
        .ok_or(Error::NoAppend)?;
    let count: usize = parts
        .next()
        .and_then(|v| v.parse().ok())
        .ok_or(Error::NoAppend)?;
    if start != 0 || parts.next().is_some() || count == 0 {
        return Err(Error::NoAppend);
    }

    let entries = &rest[header_end + 1..];
    if entries.len() < count * 20 {
        return Err(Error::NoAppend);
    }

    let mut offsets = Vec::with_capacity(count - 1);
    for index in 0..count {
        let entry = &entries[index * 20..index * 20 + 20];
        let offset: u64 = std::str::from_utf8(&entry[..10])
            .ok()
            .and_then(|v| v.parse().ok())
            .ok_or(Error::NoAppend)?;
        let flag = entry[17];
        if index == 0 {
            if flag != b'f' {
                return Err(Error::NoAppend);
            }
            continue;
        }
        if flag != b'n' || &entry[11..16] != b"00000" {
            return Err(Error::NoAppend);
        }
        offsets.push(offset);
    }

    Ok(offsets)
}

/// Reads the full `N 0 obj ... endobj` block of an object and checks the header matches the
/// recorded offset.
fn read_object<F: Read + Seek>(
    file: &mut F,
    offsets: &[u64],
    id: ObjId,
) -> Result<Vec<u8>, Error> {
    let offset = *offsets
        .get(id.number() as usize - 1)
        .ok_or(Error::NoAppend)?;
    file.seek(SeekFrom::Start(offset))?;

    let mut body = Vec::new();
    let mut chunk = [0u8; 512];
    loop {
        let n = file.read(&mut chunk)?;
        if n == 0 {
            break;
        }
        body.extend_from_slice(&chunk[..n]);
        if find_last(&body, b"endobj").is_some() || body.len() > 1 << 20 {
            break;
        }
    }

    let header = format!("{} 0 obj\n", id.number());
    if !body.starts_with(header.as_bytes()) {
        return Err(Error::NoAppend);
    }
    let end = find_last(&body, b"endobj").ok_or(Error::NoAppend)?;
    body.truncate(end);
    Ok(body)
}

fn find_last(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack
        .windows(needle.len())
        .rposition(|window| window == needle)
}

fn find_first(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack
        .windows(needle.len())
        .position(|window| window == needle)
}

/// The integer (or the object number of a reference) following a dictionary key.
fn dict_integer(body: &[u8], key: &[u8]) -> Option<u64> {
    let at = find_first(body, key)? + key.len();
    let rest = &body[at..];
    let start = rest.iter().position(|b| b.is_ascii_digit())?;
    // no other token may sit between the key and its value
    if rest[..start].iter().any(|&b| !matches!(b, b' ' | b'\n')) {
        return None;
    }
    let end = rest[start..]
        .iter()
        .position(|b| !b.is_ascii_digit())
        .map(|p| start + p)
        .unwrap_or(rest.len());
    std::str::from_utf8(&rest[start..end]).ok()?.parse().ok()
}

/// The `(...)`-delimited string following a dictionary key, unescaped.
fn dict_literal_string(body: &[u8], key: &[u8]) -> Option<String> {
    let at = find_first(body, key)? + key.len();
    let rest = &body[at..];
    let open = find_first(rest, b"(")?;
    let mut out = String::new();
    let mut escaped = false;
    for &b in &rest[open + 1..] {
        if escaped {
            out.push(b as char);
            escaped = false;
        } else if b == b'\\' {
            escaped = true;
        } else if b == b')' {
            return Some(out);
        } else {
            out.push(b as char);
        }
    }
    None
}

/// The first element of the trailer's `/ID [<...> <...>]` array.
fn dict_hex_string(body: &[u8]) -> Option<String> {
    let at = find_first(body, b"/ID")? + 3;
    let rest = &body[at..];
    let open = find_first(rest, b"<")?;
    let close = find_first(&rest[open..], b">")? + open;
    std::str::from_utf8(&rest[open + 1..close])
        .ok()
        .map(str::to_string)
}

/// The `N 0 R` references inside the array following a dictionary key.
fn dict_references(body: &[u8], key: &[u8]) -> Option<Vec<ObjId>> {
    let at = find_first(body, key)? + key.len();
    let rest = &body[at..];
    let open = find_first(rest, b"[")?;
    let close = find_first(&rest[open..], b"]")? + open;
    let inner = std::str::from_utf8(&rest[open + 1..close]).ok()?;

    let mut refs = Vec::new();
    let mut tokens = inner.split_whitespace().peekable();
    while let Some(token) = tokens.next() {
        let number: u64 = token.parse().ok()?;
        if tokens.next() != Some("0") || tokens.next() != Some("R") {
            return None;
        }
        refs.push(ObjId::new(number));
    }
    Some(refs)
}
