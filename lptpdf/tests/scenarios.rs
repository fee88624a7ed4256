//! End-to-end behavior of whole printing sessions, asserted against the bytes of the finished
//! documents.

use std::io::Cursor;

use lptpdf::Printer;

mod support;
use support::Doc;

fn memory_printer() -> Printer<Cursor<Vec<u8>>> {
    Printer::from_medium(Cursor::new(Vec::new()))
}

fn finish(printer: Printer<Cursor<Vec<u8>>>) -> Doc {
    Doc::parse(printer.into_medium().unwrap().into_inner())
}

#[test]
fn minimal_session() {
    let mut printer = memory_printer();
    printer.print(b"HELLO\n").unwrap();
    assert_eq!(printer.position(), (1, 2));
    let doc = finish(printer);

    // freelist head + content + session pages + font dict + page + anchor + catalog + info
    assert_eq!(doc.xref_offsets().len(), 7);
    assert_eq!(doc.page_count(), 1);
    assert_eq!(doc.info_value("/Title"), "Lineprinter data");
    assert!(doc.info_value("/Producer").starts_with("LPTPDF"));

    // greenbar stationery is the default
    let streams = doc.page_streams();
    assert_eq!(streams.len(), 1);
    let stream = String::from_utf8_lossy(&streams[0]);
    assert!(stream.contains("0.8 0.9 0.8 rg"));

    let lines = Doc::page_lines(&streams[0]);
    assert_eq!(lines.iter().filter(|l| !l.is_empty()).count(), 1);
    assert_eq!(lines[6], "HELLO");
}

#[test]
fn every_object_sits_at_its_xref_offset() {
    let mut printer = memory_printer();
    printer.print(b"first\x0csecond\x0cthird\n").unwrap();
    let doc = finish(printer);

    // Doc::object checks the `N 0 obj` header against the offset for each object
    for number in 1..=doc.xref_offsets().len() {
        doc.object(number);
    }
}

#[test]
fn form_feed_breaks_pages() {
    let mut printer = memory_printer();
    printer.print(b"A\nB\x0cC\n").unwrap();
    let doc = finish(printer);

    assert_eq!(doc.page_count(), 2);
    let streams = doc.page_streams();
    assert_eq!(streams.len(), 2);

    // page one carries A on the first printable line and B below it
    let first = Doc::page_lines(&streams[0]);
    assert_eq!(first[6], "A");
    assert_eq!(first[7], "B");

    // after the form feed, C sits on the top-of-form line
    let second = Doc::page_lines(&streams[1]);
    assert_eq!(second[5], "C");
}

#[test]
fn text_survives_the_round_trip() {
    let body = "INVOICE 0042\nQTY  ITEM        PRICE\n  1  widget       9.99\n";
    let mut printer = memory_printer();
    printer.print(body.as_bytes()).unwrap();
    let doc = finish(printer);

    let streams = doc.page_streams();
    let lines = Doc::page_lines(&streams[0]);
    let printed: Vec<&String> = lines.iter().filter(|l| !l.is_empty()).collect();
    let expected: Vec<&str> = body.trim_end().split('\n').collect();
    assert_eq!(printed.len(), expected.len());
    for (got, want) in printed.iter().zip(expected) {
        assert_eq!(got.as_str(), want);
    }
}

#[test]
fn overstrike_renders_in_place() {
    let mut printer = memory_printer();
    printer.print(b"ABC\rXYZ\n").unwrap();
    let doc = finish(printer);

    let streams = doc.page_streams();
    let stream = String::from_utf8_lossy(&streams[0]);
    assert!(stream.contains("(ABC) Tj 0 0 Td (XYZ) Tj"));
}

#[test]
fn pitch_switch_applies_on_the_same_page() {
    let mut printer = memory_printer();
    printer.print(b"X\n").unwrap();
    printer.print(&[0x9B, 0x32, 0x7A]).unwrap(); // CSI 2 z: eight lines per inch
    printer.print(b"Y\n").unwrap();
    let doc = finish(printer);

    assert_eq!(doc.page_count(), 1);
    let streams = doc.page_streams();
    let stream = String::from_utf8_lossy(&streams[0]);

    let x = stream.find("(X) Tj").expect("X must render");
    let tl = stream.rfind("9 TL").expect("the leading must tighten to 8 LPI");
    let y = stream.find("(Y) Tj").expect("Y must render");
    assert!(x < tl && tl < y);
}

#[test]
fn leading_form_feed_is_swallowed_once() {
    let mut printer = memory_printer();
    printer.print(b"\r\r\x0cHELLO\x0cWORLD\n").unwrap();
    let doc = finish(printer);

    // the positioning FF vanishes; the second FF makes a real page break
    assert_eq!(doc.page_count(), 2);
}

#[test]
fn content_streams_are_packed_only_when_smaller() {
    let mut printer = memory_printer();
    printer.print(b"HELLO\n").unwrap();
    let doc = finish(printer);

    let text = doc.text();
    let at = text.find("/Filter /LZWDecode").expect("default pages compress");
    let dict = &text[text[..at].rfind("<<").unwrap()..text[at..].find(">>").unwrap() + at];
    let length: usize = dict
        .split("/Length ")
        .nth(1)
        .unwrap()
        .split_whitespace()
        .next()
        .unwrap()
        .parse()
        .unwrap();

    // monotonicity: the stored stream is strictly shorter than what it decodes to
    let decoded = doc.page_streams().remove(0);
    assert!(length < decoded.len());
}

#[test]
fn compression_can_be_disabled() {
    let mut printer = memory_printer();
    printer.set_uncompressed(true).unwrap();
    printer.print(b"HELLO\n").unwrap();
    let doc = finish(printer);

    assert!(!doc.text().contains("/Filter"));
    let lines = Doc::page_lines(&doc.page_streams()[0]);
    assert_eq!(lines[6], "HELLO");
}

#[test]
fn overflowing_lines_spill_onto_the_next_page() {
    let mut printer = memory_printer();
    // the first text line lands below the top-of-form on line 7, so 60 more fill the page
    // and lines 61..=66 accumulate in the carry region past the page end
    let mut data = Vec::new();
    for n in 1..=66 {
        data.extend_from_slice(format!("line {n}\n").as_bytes());
    }
    printer.print(&data).unwrap();

    // the next character forces the page turn and prints below the carried lines
    printer.print(b"line 67\n").unwrap();
    assert_eq!(printer.position(), (2, 2));
    let doc = finish(printer);

    assert_eq!(doc.page_count(), 2);
    let streams = doc.page_streams();
    let first = Doc::page_lines(&streams[0]);
    assert_eq!(first[6], "line 1");
    assert_eq!(first[65], "line 60");

    // the carried region lands on the top lines of page two
    let second = Doc::page_lines(&streams[1]);
    assert_eq!(second[0], "line 61");
    assert_eq!(second[5], "line 66");
    assert_eq!(second[6], "line 67");
}

#[test]
fn blank_form_feeds_emit_blank_pages() {
    let mut printer = memory_printer();
    printer.print(b"A\x0c\x0cB\n").unwrap();
    let doc = finish(printer);

    assert_eq!(doc.page_count(), 3);
    let streams = doc.page_streams();
    assert!(Doc::page_lines(&streams[1]).iter().all(|l| l.is_empty()));
}

#[test]
fn jpeg_backgrounds_are_embedded_verbatim() {
    let dir = std::env::temp_dir().join("lptpdf-scenario-jpeg");
    std::fs::create_dir_all(&dir).unwrap();
    let image = dir.join("form.jpg");

    // SOI, an SOF0 frame header for a 200x100 RGB image, and some payload up to EOI
    let mut jpeg = vec![0xFF, 0xD8];
    jpeg.extend_from_slice(&[
        0xFF, 0xC0, 0x00, 0x0A, 0x08, 0x00, 0x64, 0x00, 0xC8, 0x03, 0x01, 0x02,
    ]);
    jpeg.extend_from_slice(&[0xFF, 0xDA, 0x00, 0x04, 0x01, 0x00]);
    jpeg.extend_from_slice(&[0x12, 0x34, 0x56, 0xFF, 0xD9]);
    std::fs::write(&image, &jpeg).unwrap();

    let mut printer = memory_printer();
    printer.set_form_image(&image).unwrap();
    printer.print(b"OVERLAY\n").unwrap();
    let doc = finish(printer);

    let text = doc.text();
    assert!(text.contains("/Subtype /Image"));
    assert!(text.contains("/Filter /DCTDecode"));
    assert!(text.contains("/Width 200"));
    assert!(text.contains("/Height 100"));
    assert!(text.contains("/XObject << /Bg "));
    assert!(text.contains("/ProcSet [/PDF /Text /ImageC]"));

    // the image bytes land in the file untouched
    let bytes = doc.bytes.clone();
    assert!(bytes
        .windows(jpeg.len())
        .any(|window| window == jpeg.as_slice()));

    // the page paints the image before the text
    let stream = String::from_utf8_lossy(&doc.page_streams()[0]).into_owned();
    assert!(stream.contains("cm /Bg Do Q"));
    assert!(stream.contains("(OVERLAY) Tj"));

    std::fs::remove_file(&image).ok();
}

#[test]
fn missing_form_image_is_a_bad_jpeg() {
    let dir = std::env::temp_dir().join("lptpdf-scenario-bad-jpeg");
    std::fs::create_dir_all(&dir).unwrap();
    let image = dir.join("truncated.jpg");
    std::fs::write(&image, [0xFF, 0xD8, 0xFF]).unwrap();

    let mut printer = memory_printer();
    printer.set_form_image(&image).unwrap();
    assert!(matches!(
        printer.print(b"X"),
        Err(lptpdf::Error::BadJpeg(_))
    ));

    std::fs::remove_file(&image).ok();
}

#[test]
fn file_check_accepts_own_output() {
    let dir = std::env::temp_dir().join("lptpdf-scenario-file-check");
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join("check.pdf");

    let mut printer = Printer::open(&path).unwrap();
    printer.set_file_mode(lptpdf::FileMode::Replace).unwrap();
    printer.print(b"HELLO\n").unwrap();
    printer.close().unwrap();

    lptpdf::looks_like_pdf(&path).unwrap();

    std::fs::write(&path, b"not a pdf").unwrap();
    assert!(lptpdf::looks_like_pdf(&path).is_err());

    std::fs::remove_file(&path).ok();
}

#[test]
fn bad_extension_is_rejected() {
    assert!(matches!(
        Printer::open("/tmp/output.txt"),
        Err(lptpdf::Error::BadFileName)
    ));
}
