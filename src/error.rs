use core::fmt::{self, Display};

use crate::types::RAW_PIXELS_MAX;

#[derive(Debug)]
pub enum Error {
    EmptyImage {
        width: u32,
        height: u32,
    },
    ImageTooLarge {
        width: u32,
        height: u32,
    },
    InvalidImageLength {
        size: usize,
        width: u32,
        height: u32,
    },
    UnknownResource {
        name: String,
    },
    UnknownStrategy {
        name: String,
    },
    WorkerPanicked {
        strategy: String,
    },
    NoIterations,
    Mismatch {
        left: String,
        right: String,
        left_len: usize,
        right_len: usize,
        first_mismatch: Option<usize>,
    },
    #[cfg(feature = "image")]
    Image(image::ImageError),
    #[cfg(feature = "tinybmp")]
    Bmp(tinybmp::ParseError),
    IoError(std::io::Error),
}

pub type Result<T> = core::result::Result<T, Error>;

impl Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            Self::EmptyImage { width, height } => {
                write!(f, "image contains no pixels: {}x{}", width, height)
            }
            Self::ImageTooLarge { width, height } => {
                let mp = RAW_PIXELS_MAX / 1_000_000;
                write!(f, "image is too large: {}x{} (max={}Mp)", width, height, mp)
            }
            Self::InvalidImageLength { size, width, height } => {
                write!(f, "invalid image length: {} for {}x{}", size, width, height)
            }
            Self::UnknownResource { ref name } => {
                write!(f, "no bundled resource named {:?}", name)
            }
            Self::UnknownStrategy { ref name } => {
                write!(f, "unknown or disabled decode strategy: {:?}", name)
            }
            Self::WorkerPanicked { ref strategy } => {
                write!(f, "{}: decode worker panicked", strategy)
            }
            Self::NoIterations => {
                write!(f, "benchmark needs at least one iteration")
            }
            Self::Mismatch { ref left, ref right, left_len, right_len, first_mismatch } => {
                write!(f, "{} and {} disagree: {} vs {} bytes", left, right, left_len, right_len)?;
                if let Some(pos) = first_mismatch {
                    write!(f, ", first difference at byte {}", pos)?;
                }
                Ok(())
            }
            #[cfg(feature = "image")]
            Self::Image(ref err) => {
                write!(f, "image-rs: {}", err)
            }
            #[cfg(feature = "tinybmp")]
            Self::Bmp(ref err) => {
                write!(f, "tinybmp: {:?}", err)
            }
            Self::IoError(ref err) => {
                write!(f, "i/o error: {}", err)
            }
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match *self {
            #[cfg(feature = "image")]
            Self::Image(ref err) => Some(err),
            Self::IoError(ref err) => Some(err),
            _ => None,
        }
    }
}

#[cfg(feature = "image")]
impl From<image::ImageError> for Error {
    fn from(err: image::ImageError) -> Self {
        Self::Image(err)
    }
}

#[cfg(feature = "tinybmp")]
impl From<tinybmp::ParseError> for Error {
    fn from(err: tinybmp::ParseError) -> Self {
        Self::Bmp(err)
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Self::IoError(err)
    }
}
