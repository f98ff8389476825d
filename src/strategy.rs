//! Ways of turning a compressed bitmap into an RGBA buffer.
//!
//! Every decoder sits behind [`Strategy`]. Which decoders exist is decided at
//! build time by cargo features; which of them run is decided at run time
//! through [`StrategyKind`].

use std::fmt::{self, Display};
use std::io::Read;
use std::str::FromStr;
use std::thread;

use crate::error::{Error, Result};
use crate::types::RawImage;

/// Decodes compressed image bytes into a [`RawImage`] in RGBA order.
pub trait Strategy {
    fn name(&self) -> &str;

    fn decode(&self, data: &[u8]) -> Result<RawImage>;

    /// Decodes from a stream that may not be seekable by buffering it first.
    fn decode_reader(&self, reader: &mut dyn Read) -> Result<RawImage> {
        let mut data = Vec::new();
        reader.read_to_end(&mut data)?;
        self.decode(&data)
    }
}

impl<S: Strategy + ?Sized> Strategy for Box<S> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn decode(&self, data: &[u8]) -> Result<RawImage> {
        (**self).decode(data)
    }
}

impl<S: Strategy + ?Sized> Strategy for &S {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn decode(&self, data: &[u8]) -> Result<RawImage> {
        (**self).decode(data)
    }
}

/// The library under test: the `image` crate's BMP decoder.
#[cfg(feature = "image")]
#[derive(Copy, Clone, Debug, Default)]
pub struct ImageRs {
    /// Go through `ImageReader` over a cursor instead of decoding from memory.
    pub stream: bool,
}

#[cfg(feature = "image")]
impl Strategy for ImageRs {
    fn name(&self) -> &str {
        if self.stream {
            "image-rs[stream]"
        } else {
            "image-rs"
        }
    }

    fn decode(&self, data: &[u8]) -> Result<RawImage> {
        use image::{ImageFormat, ImageReader};
        use std::io::Cursor;

        let img = if self.stream {
            ImageReader::with_format(Cursor::new(data), ImageFormat::Bmp).decode()?
        } else {
            image::load_from_memory_with_format(data, ImageFormat::Bmp)?
        };
        let rgba = img.into_rgba8();
        let (width, height) = rgba.dimensions();
        log::trace!("{}: decoded {}x{}", self.name(), width, height);
        RawImage::new(width, height, rgba.into_raw())
    }
}

/// The native decoder: `tinybmp` rendered onto a BGRA surface, then swapped
/// into RGBA, the same path a desktop bitmap API takes.
///
/// tinybmp only yields color channels, so the output is always opaque.
#[cfg(feature = "tinybmp")]
#[derive(Copy, Clone, Debug, Default)]
pub struct TinyBmp;

#[cfg(feature = "tinybmp")]
impl TinyBmp {
    fn decode_bgra(data: &[u8]) -> Result<(u32, u32, Vec<u8>)> {
        use bytemuck::cast_slice_mut;
        use embedded_graphics_core::geometry::OriginDimensions;
        use embedded_graphics_core::pixelcolor::{Rgb888, RgbColor};
        use embedded_graphics_core::Pixel;
        use tinybmp::Bmp;

        let bmp = Bmp::<Rgb888>::from_slice(data)?;
        let size = bmp.size();
        let (width, height) = (size.width, size.height);
        let n_pixels = crate::types::checked_n_pixels(width, height)?;

        let mut surface = vec![0_u8; n_pixels * 4];
        let pixels: &mut [[u8; 4]] = cast_slice_mut(&mut surface);
        for Pixel(point, color) in bmp.pixels() {
            let (Ok(x), Ok(y)) = (u32::try_from(point.x), u32::try_from(point.y)) else {
                continue;
            };
            if x < width && y < height {
                let idx = (y as usize) * (width as usize) + (x as usize);
                pixels[idx] = [color.b(), color.g(), color.r(), 0xff];
            }
        }
        Ok((width, height, surface))
    }
}

#[cfg(feature = "tinybmp")]
impl Strategy for TinyBmp {
    fn name(&self) -> &str {
        "tinybmp"
    }

    fn decode(&self, data: &[u8]) -> Result<RawImage> {
        let (width, height, mut surface) = Self::decode_bgra(data)?;
        crate::convert::bgra32_to_rgba32(&mut surface);
        log::trace!("{}: decoded {}x{}", self.name(), width, height);
        RawImage::new(width, height, surface)
    }
}

/// Runs the inner strategy on a worker thread and blocks until it is done.
///
/// A panic on the worker is reported as [`Error::WorkerPanicked`].
#[derive(Clone, Debug)]
pub struct Threaded<S> {
    inner: S,
    name: String,
}

impl<S: Strategy> Threaded<S> {
    pub fn new(inner: S) -> Self {
        let name = format!("{}[threaded]", inner.name());
        Self { inner, name }
    }

    pub fn into_inner(self) -> S {
        self.inner
    }
}

impl<S: Strategy + Sync> Strategy for Threaded<S> {
    fn name(&self) -> &str {
        &self.name
    }

    fn decode(&self, data: &[u8]) -> Result<RawImage> {
        thread::scope(|scope| scope.spawn(|| self.inner.decode(data)).join())
            .map_err(|_| Error::WorkerPanicked { strategy: self.name.clone() })?
    }
}

/// Run-time selector for the strategies this crate knows about.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub enum StrategyKind {
    ImageRs,
    ImageRsStream,
    TinyBmp,
    TinyBmpThreaded,
}

impl StrategyKind {
    pub const ALL: [Self; 4] =
        [Self::ImageRs, Self::ImageRsStream, Self::TinyBmp, Self::TinyBmpThreaded];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ImageRs => "image-rs",
            Self::ImageRsStream => "image-rs-stream",
            Self::TinyBmp => "tinybmp",
            Self::TinyBmpThreaded => "tinybmp-threaded",
        }
    }

    /// Returns true if the decoder behind this kind was compiled in.
    pub const fn is_enabled(self) -> bool {
        match self {
            Self::ImageRs | Self::ImageRsStream => cfg!(feature = "image"),
            Self::TinyBmp | Self::TinyBmpThreaded => cfg!(feature = "tinybmp"),
        }
    }

    pub fn available() -> Vec<Self> {
        Self::ALL.into_iter().filter(|kind| kind.is_enabled()).collect()
    }

    /// The library being measured.
    pub const fn library() -> Self {
        Self::ImageRs
    }

    /// The decoder the library is measured against.
    pub const fn native() -> Self {
        Self::TinyBmp
    }

    pub fn build(self) -> Result<Box<dyn Strategy + Send + Sync>> {
        match self {
            #[cfg(feature = "image")]
            Self::ImageRs => Ok(Box::new(ImageRs { stream: false })),
            #[cfg(feature = "image")]
            Self::ImageRsStream => Ok(Box::new(ImageRs { stream: true })),
            #[cfg(feature = "tinybmp")]
            Self::TinyBmp => Ok(Box::new(TinyBmp::default())),
            #[cfg(feature = "tinybmp")]
            Self::TinyBmpThreaded => Ok(Box::new(Threaded::new(TinyBmp::default()))),
            #[allow(unreachable_patterns)]
            _ => Err(Error::UnknownStrategy { name: self.as_str().into() }),
        }
    }
}

impl Display for StrategyKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StrategyKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let name = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == name)
            .ok_or_else(|| Error::UnknownStrategy { name: s.into() })
    }
}
