use crate::error::{Error, Result};

/// Upper bound on the number of pixels a decoded image may hold.
pub const RAW_PIXELS_MAX: usize = 400_000_000;

/// Pixel layout of a raw buffer.
///
/// The layout does not depend on the endianness of the system.
/// The components are stored as bytes in the given order.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub enum PixelFormat {
    /// R, G, B and alpha
    Rgba32,
    /// B, G, R and alpha, as handed out by desktop bitmap surfaces
    Bgra32,
    /// R, G and B
    Rgb24,
    /// B, G and R, the order BMP stores 24-bit pixels in
    Bgr24,
}

impl PixelFormat {
    pub const fn bytes_per_pixel(self) -> usize {
        match self {
            Self::Rgba32 | Self::Bgra32 => 4,
            Self::Rgb24 | Self::Bgr24 => 3,
        }
    }

    /// Returns true if the format carries an alpha channel.
    pub const fn has_alpha(self) -> bool {
        matches!(self, Self::Rgba32 | Self::Bgra32)
    }

    /// Exact buffer length for an image of the given size in this format.
    pub fn required_len(self, width: u32, height: u32) -> Result<usize> {
        let n_pixels = checked_n_pixels(width, height)?;
        Ok(n_pixels * self.bytes_per_pixel())
    }
}

pub(crate) fn checked_n_pixels(width: u32, height: u32) -> Result<usize> {
    let n_pixels = (width as usize).saturating_mul(height as usize);
    if n_pixels == 0 {
        Err(Error::EmptyImage { width, height })
    } else if n_pixels > RAW_PIXELS_MAX {
        Err(Error::ImageTooLarge { width, height })
    } else {
        Ok(n_pixels)
    }
}

/// A decoded image: `width * height` interleaved RGBA pixels, top row first.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct RawImage {
    pub width: u32,
    pub height: u32,
    pub data: Vec<u8>,
}

impl RawImage {
    /// Wraps an RGBA buffer, checking that its length matches the dimensions.
    pub fn new(width: u32, height: u32, data: Vec<u8>) -> Result<Self> {
        let img = Self { width, height, data };
        img.validate()?;
        Ok(img)
    }

    pub const fn n_pixels(&self) -> usize {
        (self.width as usize).saturating_mul(self.height as usize)
    }

    pub const fn n_bytes(&self) -> usize {
        self.n_pixels().saturating_mul(4)
    }

    #[inline]
    pub fn validate(&self) -> Result<()> {
        let required = PixelFormat::Rgba32.required_len(self.width, self.height)?;
        if self.data.len() != required {
            return Err(Error::InvalidImageLength {
                size: self.data.len(),
                width: self.width,
                height: self.height,
            });
        }
        Ok(())
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    pub fn into_vec(self) -> Vec<u8> {
        self.data
    }
}

impl AsRef<[u8]> for RawImage {
    fn as_ref(&self) -> &[u8] {
        &self.data
    }
}
