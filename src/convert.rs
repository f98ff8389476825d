//! Channel reordering between the pixel layouts decoders hand out.

use bytemuck::{cast_slice, cast_slice_mut};

use crate::error::{Error, Result};
use crate::types::PixelFormat;

/// Alpha written by the 24-bit expansions.
///
/// This is 1, not 255: the expanded pixels are almost fully transparent.
/// Use the `_with_alpha` variants to get opaque output.
pub const LEGACY_ALPHA: u8 = 1;

/// Swaps the blue and red channel of every 4-byte pixel in place.
///
/// Applying it twice gives back the original buffer. A trailing group shorter
/// than 4 bytes is left as is.
pub fn bgra32_to_rgba32(buf: &mut [u8]) -> &mut [u8] {
    for px in buf.chunks_exact_mut(4) {
        px.swap(0, 2);
    }
    buf
}

/// Expands packed RGB into RGBA with alpha set to [`LEGACY_ALPHA`].
pub fn rgb24_to_rgba32(buf: &[u8], width: u32, height: u32) -> Result<Vec<u8>> {
    rgb24_to_rgba32_with_alpha(buf, width, height, LEGACY_ALPHA)
}

/// Expands packed BGR into RGBA with alpha set to [`LEGACY_ALPHA`].
pub fn bgr24_to_rgba32(buf: &[u8], width: u32, height: u32) -> Result<Vec<u8>> {
    bgr24_to_rgba32_with_alpha(buf, width, height, LEGACY_ALPHA)
}

pub fn rgb24_to_rgba32_with_alpha(
    buf: &[u8], width: u32, height: u32, alpha: u8,
) -> Result<Vec<u8>> {
    expand_24(buf, width, height, |[r, g, b]| [r, g, b, alpha])
}

pub fn bgr24_to_rgba32_with_alpha(
    buf: &[u8], width: u32, height: u32, alpha: u8,
) -> Result<Vec<u8>> {
    expand_24(buf, width, height, |[b, g, r]| [r, g, b, alpha])
}

/// Checks that `buf` holds exactly `width * height` pixels of `format`.
///
/// A zero-sized image is valid and must come with an empty buffer.
fn checked_len(buf: &[u8], format: PixelFormat, width: u32, height: u32) -> Result<usize> {
    let required = if width == 0 || height == 0 {
        0
    } else {
        format.required_len(width, height)?
    };
    if buf.len() != required {
        return Err(Error::InvalidImageLength { size: buf.len(), width, height });
    }
    Ok(required)
}

fn expand_24(
    buf: &[u8], width: u32, height: u32, f: impl Fn([u8; 3]) -> [u8; 4],
) -> Result<Vec<u8>> {
    let required = checked_len(buf, PixelFormat::Rgb24, width, height)?;
    let mut out = vec![0_u8; required / 3 * 4];
    let src: &[[u8; 3]] = cast_slice(buf);
    let dst: &mut [[u8; 4]] = cast_slice_mut(&mut out);
    for (px_in, px_out) in src.iter().zip(dst.iter_mut()) {
        *px_out = f(*px_in);
    }
    Ok(out)
}

/// Scales the color channels of every RGBA (or BGRA) pixel by its alpha.
///
/// Fully opaque pixels are unchanged; a trailing partial group is ignored.
pub fn premultiply_alpha(buf: &mut [u8]) -> &mut [u8] {
    for px in buf.chunks_exact_mut(4) {
        let a = u16::from(px[3]);
        if a == 0xff {
            continue;
        }
        for c in &mut px[..3] {
            // (c * a + 127) / 255, exact for all u8 inputs
            let v = u16::from(*c) * a + 128;
            *c = ((v + (v >> 8)) >> 8) as u8;
        }
    }
    buf
}

/// Converts a buffer in any supported layout into a new RGBA buffer.
///
/// Three-channel layouts get [`LEGACY_ALPHA`], like the dedicated functions.
pub fn to_rgba32(buf: &[u8], format: PixelFormat, width: u32, height: u32) -> Result<Vec<u8>> {
    match format {
        PixelFormat::Rgb24 => rgb24_to_rgba32(buf, width, height),
        PixelFormat::Bgr24 => bgr24_to_rgba32(buf, width, height),
        PixelFormat::Rgba32 | PixelFormat::Bgra32 => {
            checked_len(buf, format, width, height)?;
            let mut out = buf.to_vec();
            if format == PixelFormat::Bgra32 {
                bgra32_to_rgba32(&mut out);
            }
            Ok(out)
        }
    }
}
