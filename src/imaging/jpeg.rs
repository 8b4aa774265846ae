//! JPEG frame-size reader.
//!
//! Walks the marker segments of a JPEG byte stream until it reaches a
//! Start-Of-Frame segment and reads the frame dimensions from it. No pixel
//! data is decoded, so this works even when no image codec is usable.
//!
//! Segment layout after SOI (`FF D8`):
//!
//! ```text
//!   FF (FF)*  marker  [len_hi len_lo  payload(len - 2)]
//! ```
//!
//! Standalone markers (`01`, `D0`–`D7`, `D8`, `D9`) carry no length field.
//! In a SOF payload, byte 0 is the sample precision, bytes 1–2 the height and
//! bytes 3–4 the width. Offsets below are counted from the length field,
//! so height sits at +3 and width at +5.

use super::backend::Dimensions;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum JpegError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Malformed image: {0}")]
    MalformedImage(String),
}

const MARKER_PREFIX: u8 = 0xFF;
const SOI: u8 = 0xD8;
const EOI: u8 = 0xD9;
const TEM: u8 = 0x01;

/// SOF codes that carry frame dimensions. DHT (`C4`), JPG (`C8`) and DAC
/// (`CC`) share the `Cx` range but are not frames.
fn is_sof_marker(marker: u8) -> bool {
    matches!(marker, 0xC0..=0xC3 | 0xC5..=0xC7 | 0xC9..=0xCB | 0xCD..=0xCF)
}

fn is_standalone_marker(marker: u8) -> bool {
    marker == TEM || marker == SOI || marker == EOI || (0xD0..=0xD7).contains(&marker)
}

fn read_u16_be(data: &[u8], pos: usize) -> Option<u16> {
    let bytes = data.get(pos..pos + 2)?;
    Some(u16::from_be_bytes([bytes[0], bytes[1]]))
}

/// Read pixel dimensions from raw JPEG bytes.
pub fn read_dimensions(data: &[u8]) -> Result<Dimensions, JpegError> {
    if data.len() < 4 || data[0] != MARKER_PREFIX || data[1] != SOI {
        return Err(JpegError::MalformedImage("missing SOI marker".into()));
    }

    let mut pos = 2;
    while pos < data.len() {
        if data[pos] != MARKER_PREFIX {
            pos += 1;
            continue;
        }

        // Fill bytes: any run of 0xFF before the marker code
        while pos < data.len() && data[pos] == MARKER_PREFIX {
            pos += 1;
        }
        let Some(&marker) = data.get(pos) else {
            break;
        };
        pos += 1;

        if is_standalone_marker(marker) {
            continue;
        }

        let Some(block_len) = read_u16_be(data, pos) else {
            break;
        };
        let block_len = block_len as usize;
        if block_len < 2 {
            return Err(JpegError::MalformedImage(format!(
                "segment 0x{marker:02X} at offset {pos} has invalid length {block_len}"
            )));
        }
        if pos + block_len > data.len() {
            return Err(JpegError::MalformedImage(format!(
                "segment 0x{marker:02X} at offset {pos} declares {block_len} bytes past end of buffer"
            )));
        }

        if is_sof_marker(marker) {
            let height = read_u16_be(data, pos + 3).unwrap_or(0);
            let width = read_u16_be(data, pos + 5).unwrap_or(0);
            if width == 0 || height == 0 {
                return Err(JpegError::MalformedImage(format!(
                    "SOF 0x{marker:02X} has zero dimension ({width}x{height})"
                )));
            }
            return Ok(Dimensions {
                width: width as u32,
                height: height as u32,
            });
        }

        pos += block_len;
    }

    Err(JpegError::MalformedImage("no SOF marker found".into()))
}

/// Read pixel dimensions of a JPEG file on disk.
pub fn read_file_dimensions(path: &Path) -> Result<Dimensions, JpegError> {
    let bytes = std::fs::read(path)?;
    read_dimensions(&bytes).map_err(|e| match e {
        JpegError::MalformedImage(reason) => {
            JpegError::MalformedImage(format!("{}: {}", path.display(), reason))
        }
        other => other,
    })
}
