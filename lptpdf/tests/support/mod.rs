//! Assertion helpers for the integration tests: a reference LZW decoder and a reader for the
//! exact PDF layout the engine writes. Neither aspires to parse anything else.

#![allow(dead_code)]

/// Decodes an `LZWDecode` stream with `EarlyChange = 0`, the parameters the engine declares.
pub fn lzw_decode(data: &[u8]) -> Vec<u8> {
    const CLEAR: usize = 256;
    const EOD: usize = 257;

    let fresh_dict = || -> Vec<Vec<u8>> {
        let mut dict: Vec<Vec<u8>> = (0u16..256).map(|b| vec![b as u8]).collect();
        dict.push(Vec::new()); // 256, never dereferenced
        dict.push(Vec::new()); // 257, never dereferenced
        dict
    };

    let mut dict = fresh_dict();
    let mut width = 9usize;
    let mut out = Vec::new();
    let mut prev: Option<Vec<u8>> = None;
    let mut bit = 0usize;
    let total_bits = data.len() * 8;

    loop {
        if bit + width > total_bits {
            panic!("LZW stream ended without an end-of-data code");
        }
        let mut code = 0usize;
        for _ in 0..width {
            let byte = data[bit / 8];
            code = (code << 1) | usize::from((byte >> (7 - bit % 8)) & 1);
            bit += 1;
        }

        match code {
            EOD => return out,
            CLEAR => {
                dict = fresh_dict();
                width = 9;
                prev = None;
            }
            _ => {
                let entry = if code < dict.len() {
                    dict[code].clone()
                } else if code == dict.len() {
                    let p = prev.as_ref().expect("KwKwK code without a predecessor");
                    let mut entry = p.clone();
                    entry.push(p[0]);
                    entry
                } else {
                    panic!("LZW code {code} beyond dictionary size {}", dict.len());
                };

                if let Some(p) = prev.take() {
                    let mut fresh = p;
                    fresh.push(entry[0]);
                    dict.push(fresh);
                    if dict.len() == 1 << width && width < 12 {
                        width += 1;
                    }
                }

                out.extend_from_slice(&entry);
                prev = Some(entry);
            }
        }
    }
}

fn find(haystack: &[u8], needle: &[u8], from: usize) -> Option<usize> {
    haystack[from..]
        .windows(needle.len())
        .position(|w| w == needle)
        .map(|p| p + from)
}

fn rfind(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack.windows(needle.len()).rposition(|w| w == needle)
}

/// A parsed document in the layout this engine emits. All offset arithmetic runs over the raw
/// bytes; compressed content streams make the file non-UTF-8.
pub struct Doc {
    pub bytes: Vec<u8>,
}

impl Doc {
    pub fn parse(bytes: Vec<u8>) -> Doc {
        assert!(bytes.starts_with(b"%PDF-1.4\n"), "missing PDF header line");
        assert!(bytes.ends_with(b"%%EOF\n"), "missing end-of-file marker");
        Doc { bytes }
    }

    /// The whole document, lossily decoded; usable for coarse substring checks only.
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.bytes).into_owned()
    }

    /// The xref offset promised by the trailer.
    pub fn startxref(&self) -> usize {
        let at = rfind(&self.bytes, b"\nstartxref\n").expect("startxref missing")
            + b"\nstartxref\n".len();
        let end = find(&self.bytes, b"\n", at).unwrap();
        std::str::from_utf8(&self.bytes[at..end])
            .unwrap()
            .trim()
            .parse()
            .unwrap()
    }

    /// Byte offsets of objects 1.., from the xref section.
    pub fn xref_offsets(&self) -> Vec<usize> {
        // everything from the xref marker on is plain ASCII
        let section = String::from_utf8_lossy(&self.bytes[self.startxref()..]).into_owned();
        let mut lines = section.lines();
        assert_eq!(lines.next(), Some("xref"));

        let header = lines.next().unwrap();
        let mut parts = header.split_whitespace();
        assert_eq!(parts.next(), Some("0"));
        let count: usize = parts.next().unwrap().parse().unwrap();

        let free = lines.next().unwrap();
        assert_eq!(free, "0000000000 65535 f ");

        (1..count)
            .map(|_| {
                let entry = lines.next().unwrap();
                assert_eq!(entry.len(), 19, "xref entry must be 20 bytes with its EOL");
                assert!(entry.ends_with(" 00000 n "));
                entry[..10].parse().unwrap()
            })
            .collect()
    }

    /// The raw bytes of object `number` between its header line and `endobj`, after checking
    /// the header really sits at the recorded offset.
    pub fn object_bytes(&self, number: usize) -> &[u8] {
        let offset = self.xref_offsets()[number - 1];
        let header = format!("{number} 0 obj\n");
        assert!(
            self.bytes[offset..].starts_with(header.as_bytes()),
            "object {number} is not at its xref offset"
        );
        let body_start = offset + header.len();
        let end = find(&self.bytes, b"endobj", body_start).unwrap();
        &self.bytes[body_start..end]
    }

    /// Object `number` as text; only meaningful for the dictionary objects.
    pub fn object(&self, number: usize) -> String {
        String::from_utf8_lossy(self.object_bytes(number)).into_owned()
    }

    fn trailer(&self) -> String {
        let at = rfind(&self.bytes, b"trailer\n").expect("trailer missing");
        String::from_utf8_lossy(&self.bytes[at..]).into_owned()
    }

    fn dict_ref(source: &str, key: &str) -> usize {
        let at = source.find(key).unwrap_or_else(|| panic!("{key} missing")) + key.len();
        source[at..]
            .split_whitespace()
            .next()
            .unwrap()
            .parse()
            .unwrap()
    }

    pub fn root_number(&self) -> usize {
        Self::dict_ref(&self.trailer(), "/Root")
    }

    pub fn info_number(&self) -> usize {
        Self::dict_ref(&self.trailer(), "/Info")
    }

    /// Both elements of the `/ID` array.
    pub fn id_elements(&self) -> (String, String) {
        let trailer = self.trailer();
        let at = trailer.find("/ID").expect("/ID missing");
        let mut parts = trailer[at..].split('<');
        parts.next();
        let first = parts.next().unwrap().split('>').next().unwrap().to_string();
        let second = parts.next().unwrap().split('>').next().unwrap().to_string();
        (first, second)
    }

    /// Total page count, from the root `Pages` node.
    pub fn page_count(&self) -> usize {
        let catalog = self.object(self.root_number());
        let anchor = Self::dict_ref(&catalog, "/Pages");
        Self::dict_ref(&self.object(anchor), "/Count")
    }

    /// A literal-string value out of the info dictionary.
    pub fn info_value(&self, key: &str) -> String {
        let info = self.object(self.info_number());
        let at = info.find(key).unwrap_or_else(|| panic!("{key} missing")) + key.len();
        let open = info[at..].find('(').unwrap() + at + 1;
        let close = info[open..].find(')').unwrap() + open;
        info[open..close].to_string()
    }

    /// The decoded content streams of all pages, in document order.
    pub fn page_streams(&self) -> Vec<Vec<u8>> {
        let offsets = self.xref_offsets();

        let mut streams = Vec::new();
        for number in 1..=offsets.len() {
            let body = self.object(number);
            if !body.contains("/Contents ") {
                continue;
            }
            let contents = Self::dict_ref(&body, "/Contents");

            // the stream dictionary is plain ASCII up to the stream keyword
            let offset = offsets[contents - 1];
            let data_at = find(&self.bytes, b"stream\n", offset).unwrap() + b"stream\n".len();
            let dict = String::from_utf8_lossy(&self.bytes[offset..data_at]).into_owned();
            let length: usize = Self::dict_ref(&dict, "/Length");
            let raw = &self.bytes[data_at..data_at + length];

            if dict.contains("/Filter /LZWDecode") {
                assert!(
                    dict.contains("/DecodeParms << /EarlyChange 0 >>"),
                    "filtered stream must declare EarlyChange 0"
                );
                streams.push(lzw_decode(raw));
            } else {
                streams.push(raw.to_vec());
            }
        }
        streams
    }

    /// The text lines of a decoded page stream: `Tj` strings placed by their `T*` line
    /// advances, unescaped, with overstrike resets concatenated in place.
    pub fn page_lines(stream: &[u8]) -> Vec<String> {
        let text = String::from_utf8_lossy(stream);
        let mut lines = Vec::new();
        let mut current = String::new();
        let mut in_string = false;
        let mut escaped = false;
        let mut started = false;

        let mut chars = text.chars().peekable();
        while let Some(c) = chars.next() {
            if in_string {
                if escaped {
                    current.push(c);
                    escaped = false;
                } else if c == '\\' {
                    escaped = true;
                } else if c == ')' {
                    in_string = false;
                } else {
                    current.push(c);
                }
                continue;
            }
            match c {
                '(' => in_string = true,
                'T' => {
                    if chars.peek() == Some(&'*') {
                        chars.next();
                        if started {
                            lines.push(std::mem::take(&mut current));
                        } else {
                            // drop anything gathered before the text overlay begins, such as
                            // the form's line-number labels
                            current.clear();
                            started = true;
                        }
                    }
                }
                _ => {}
            }
        }
        if started {
            lines.push(current);
        }
        lines
    }
}
