#![allow(unused)]

use rand::{rngs::StdRng, RngCore, SeedableRng};

/// Width and height of the bundled `crate.bmp`.
pub const CRATE_BMP_SIZE: (u32, u32) = (97, 61);

/// Expected RGBA value of the bundled bitmap at (x, y), top row first.
pub fn crate_bmp_pixel(x: u32, y: u32) -> [u8; 4] {
    let (w, h) = CRATE_BMP_SIZE;
    let r = x * 255 / (w - 1);
    let g = y * 255 / (h - 1);
    let b = ((x ^ y) * 7) & 0xff;
    [r as u8, g as u8, b as u8, 0xff]
}

pub fn random_bytes(seed: u64, len: usize) -> Vec<u8> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut out = vec![0; len];
    rng.fill_bytes(&mut out);
    out
}

/// Encodes a bottom-up 24-bit BMP from top-down RGB rows.
pub fn encode_bmp24(width: u32, height: u32, rgb: &[u8]) -> Vec<u8> {
    assert_eq!(rgb.len(), (width * height * 3) as usize);
    let row_len = ((width * 3 + 3) & !3) as usize;
    let mut pixels = Vec::with_capacity(row_len * height as usize);
    for row in rgb.chunks_exact(width as usize * 3).rev() {
        let start = pixels.len();
        for px in row.chunks_exact(3) {
            pixels.extend([px[2], px[1], px[0]]);
        }
        pixels.resize(start + row_len, 0);
    }

    let offset = 14 + 40_u32;
    let mut out = Vec::with_capacity(offset as usize + pixels.len());
    out.extend(b"BM");
    out.extend((offset + pixels.len() as u32).to_le_bytes());
    out.extend([0; 4]);
    out.extend(offset.to_le_bytes());
    out.extend(40_u32.to_le_bytes());
    out.extend((width as i32).to_le_bytes());
    out.extend((height as i32).to_le_bytes());
    out.extend(1_u16.to_le_bytes());
    out.extend(24_u16.to_le_bytes());
    out.extend(0_u32.to_le_bytes());
    out.extend((pixels.len() as u32).to_le_bytes());
    out.extend(2835_i32.to_le_bytes());
    out.extend(2835_i32.to_le_bytes());
    out.extend([0; 8]);
    out.extend(pixels);
    out
}
