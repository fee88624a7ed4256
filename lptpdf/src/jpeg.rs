//! Probing Joint Photographic Experts Group files for the frame header.
//!
//! Background images are embedded byte-for-byte under the `DCTDecode` filter, so the only
//! parsing needed is a walk over the `FF`-introduced blocks up to the start-of-frame that
//! carries the pixel dimensions and component count.

use crate::error::Error;

/// The frame parameters of a baseline or progressive JPEG stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct JpegInfo {
    pub width: u16,
    pub height: u16,
    pub components: u8,
}

impl JpegInfo {
    /// The PDF color space matching the component count.
    pub fn color_space(&self) -> &'static str {
        if self.components == 1 {
            "DeviceGray"
        } else {
            "DeviceRGB"
        }
    }

    /// Scans the blocks of `data` until a start-of-frame is found.
    pub fn probe(data: &[u8]) -> Result<Self, Error> {
        if data.len() < 4 || data[0] != 0xFF || data[1] != 0xD8 {
            return Err(Error::BadJpeg("missing start-of-image marker".into()));
        }

        let mut pos = 2;
        loop {
            if pos + 1 >= data.len() {
                return Err(Error::BadJpeg("no start-of-frame before end of data".into()));
            }
            if data[pos] != 0xFF {
                return Err(Error::BadJpeg(format!(
                    "expected a block marker at offset {pos}"
                )));
            }
            // fill bytes before a marker are legal
            while pos < data.len() && data[pos] == 0xFF {
                pos += 1;
            }
            if pos >= data.len() {
                return Err(Error::BadJpeg("truncated block marker".into()));
            }

            let kind = data[pos];
            pos += 1;
            match kind {
                // restart markers and end-of-image carry no payload
                0xD0..=0xD9 | 0x01 => {
                    if kind == 0xD9 {
                        return Err(Error::BadJpeg("end-of-image before start-of-frame".into()));
                    }
                }
                _ => {
                    if pos + 2 > data.len() {
                        return Err(Error::BadJpeg("truncated block length".into()));
                    }
                    let length = usize::from(u16::from_be_bytes([data[pos], data[pos + 1]]));
                    if length < 2 || pos + length > data.len() {
                        return Err(Error::BadJpeg("block length out of range".into()));
                    }

                    if let 0xC0..=0xC3 = kind {
                        // SOFn payload: precision, height, width, components
                        let body = &data[pos + 2..pos + length];
                        if body.len() < 6 {
                            return Err(Error::BadJpeg("start-of-frame too short".into()));
                        }
                        let height = u16::from_be_bytes([body[1], body[2]]);
                        let width = u16::from_be_bytes([body[3], body[4]]);
                        let components = body[5];
                        if width == 0 || height == 0 {
                            return Err(Error::BadJpeg("frame has a zero dimension".into()));
                        }
                        return Ok(JpegInfo {
                            width,
                            height,
                            components,
                        });
                    }

                    if kind == 0xDA {
                        return Err(Error::BadJpeg("scan data before start-of-frame".into()));
                    }
                    pos += length;
                }
            }
        }
    }
}
