//! Rendering of the accumulated page text into PDF content-stream operators.

use std::io::Write;

use crate::page::{Line, OVERSTRIKE_MARK};
use crate::settings::Geometry;
use crate::types::fmt_coord;

/// Emits the text overlay for one page: a single text object positioned at the top of the
/// sheet, advancing one line per `T*` and escaping the literal strings. Overstrike marks inside
/// a line close the current string and reset the text position to the line start, so the
/// following characters overprint.
pub(crate) fn text_overlay(lines: &[Line], geometry: &Geometry, page_lpi: u32) -> Vec<u8> {
    let mut out = Vec::new();

    let last_used = match lines.iter().rposition(|l| !l.is_empty()) {
        Some(index) => index,
        None => {
            return out;
        }
    };

    let size = 72.0 / page_lpi as f64;
    let left = geometry.text_left();

    // w is infallible on Vec, expressed once here
    let put = |out: &mut Vec<u8>, text: &str| {
        out.write_all(text.as_bytes())
            .expect("writing to Vec cannot fail");
    };

    put(&mut out, "q 0 Tr 0 0 0 rg\n");
    put(&mut out, "BT\n");
    put(&mut out, &format!("/F1 {} Tf\n", fmt_coord(size)));
    put(&mut out, &format!("1 0 0 1 {} 0 Tm\n", fmt_coord(left)));
    put(&mut out, &format!("{} TL 0 Tc 100 Tz\n", fmt_coord(size)));
    put(&mut out, &format!("0 {} Td\n", fmt_coord(geometry.length)));

    let mut leading = page_lpi;
    for line in &lines[..=last_used] {
        if line.lpi != leading {
            leading = line.lpi;
            put(&mut out, &format!("{} TL\n", fmt_coord(72.0 / leading as f64)));
        }
        put(&mut out, "T*\n");
        if line.is_empty() {
            continue;
        }

        out.push(b'(');
        for &code in &line.codes {
            if code == OVERSTRIKE_MARK {
                put(&mut out, ") Tj 0 0 Td (");
                continue;
            }
            let byte = code as u8;
            if matches!(byte, b'(' | b')' | b'\\') {
                out.push(b'\\');
            }
            out.push(byte);
        }
        put(&mut out, ") Tj\n");
    }

    put(&mut out, "ET Q\n");
    out
}
