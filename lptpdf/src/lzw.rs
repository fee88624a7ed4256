//! LZW compression compatible with the PDF `LZWDecode` filter.
//!
//! Variable-width codes from 9 to 12 bits, packed big-endian, with the transition points of a
//! stream declaring `/EarlyChange 0`: the code width grows exactly when the dictionary contains
//! an entry whose number needs the wider code, and a Clear code resets the dictionary when a new
//! entry would pass 12 bits.

/// Resets the dictionary on both ends.
const CLEAR_CODE: u16 = 256;

/// Terminates the code stream.
const EOD_CODE: u16 = 257;

/// The first dictionary entry available for assignment.
const FIRST_CODE: u16 = 258;

/// Largest code expressible in 12 bits.
const MAX_CODE: u16 = 4095;

/// Dictionary node arena plus the output bit packer.
///
/// The dictionary is a forest rooted at the 256 single-byte codes: each node keeps its first
/// child and a sibling link, so looking up (prefix, byte) is a walk over the prefix's child
/// chain.
struct Encoder {
    first_child: [i16; MAX_CODE as usize + 1],
    next_sibling: [i16; MAX_CODE as usize + 1],
    suffix: [u8; MAX_CODE as usize + 1],
    next_code: u16,
    code_width: u32,
    bit_buf: u32,
    bit_count: u32,
    out: Vec<u8>,
}

impl Encoder {
    fn new(capacity_hint: usize) -> Self {
        Encoder {
            first_child: [-1; MAX_CODE as usize + 1],
            next_sibling: [-1; MAX_CODE as usize + 1],
            suffix: [0; MAX_CODE as usize + 1],
            next_code: FIRST_CODE,
            code_width: 9,
            bit_buf: 0,
            bit_count: 0,
            out: Vec::with_capacity(capacity_hint),
        }
    }

    fn find_child(&self, prefix: u16, byte: u8) -> Option<u16> {
        let mut child = self.first_child[prefix as usize];
        while child >= 0 {
            if self.suffix[child as usize] == byte {
                return Some(child as u16);
            }
            child = self.next_sibling[child as usize];
        }
        None
    }

    /// Records (prefix, byte) as the next dictionary entry, growing the code width or clearing
    /// the dictionary as the entry number demands.
    fn add_child(&mut self, prefix: u16, byte: u8) {
        if self.next_code > MAX_CODE {
            // a new entry would need 13 bits; restart the dictionary
            self.put_code(CLEAR_CODE);
            self.first_child = [-1; MAX_CODE as usize + 1];
            self.next_code = FIRST_CODE;
            self.code_width = 9;
            return;
        }

        let node = self.next_code as usize;
        self.suffix[node] = byte;
        self.next_sibling[node] = self.first_child[prefix as usize];
        self.first_child[prefix as usize] = node as i16;
        self.first_child[node] = -1;
        self.next_code += 1;

        // EarlyChange=0: the width grows only once an entry exists that the current width
        // cannot express
        if self.code_width < 12 && u32::from(self.next_code - 1) == 1 << self.code_width {
            self.code_width += 1;
        }
    }

    fn put_code(&mut self, code: u16) {
        self.bit_buf = (self.bit_buf << self.code_width) | u32::from(code);
        self.bit_count += self.code_width;
        while self.bit_count >= 8 {
            self.bit_count -= 8;
            self.out.push((self.bit_buf >> self.bit_count) as u8);
            self.bit_buf &= (1 << self.bit_count) - 1;
        }
    }

    fn finish(mut self) -> Vec<u8> {
        self.put_code(EOD_CODE);
        if self.bit_count > 0 {
            self.out.push((self.bit_buf << (8 - self.bit_count)) as u8);
        }
        self.out
    }
}

/// Compresses `input` into an `LZWDecode`-compatible byte stream.
///
/// The result is always a complete, decodable stream; callers that only want compression when
/// it pays off compare the returned length against the input length and keep the raw bytes
/// otherwise.
pub(crate) fn compress(input: &[u8]) -> Vec<u8> {
    let mut encoder = Encoder::new(input.len() / 2 + 8);
    encoder.put_code(CLEAR_CODE);

    let mut bytes = input.iter().copied();
    let Some(first) = bytes.next() else {
        return encoder.finish();
    };

    let mut current = u16::from(first);
    for byte in bytes {
        match encoder.find_child(current, byte) {
            Some(child) => current = child,
            None => {
                encoder.put_code(current);
                encoder.add_child(current, byte);
                current = u16::from(byte);
            }
        }
    }

    encoder.put_code(current);
    encoder.finish()
}
