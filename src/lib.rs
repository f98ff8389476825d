#![forbid(unsafe_code)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(
    clippy::inline_always,
    clippy::similar_names,
    clippy::missing_errors_doc,
    clippy::must_use_candidate,
    clippy::module_name_repetitions,
    clippy::cargo_common_metadata,
    clippy::cast_precision_loss
)]

//! Decode the same bitmap through several strategies, check that they agree
//! byte for byte, and time them.

mod error;
mod types;

pub mod convert;
pub mod harness;
pub mod resource;
pub mod strategy;

pub use crate::error::{Error, Result};
pub use crate::harness::{compare, BenchResult, Comparison, Harness, Stats, ITERATIONS};
pub use crate::strategy::{Strategy, StrategyKind, Threaded};
pub use crate::types::{PixelFormat, RawImage};

#[cfg(feature = "image")]
pub use crate::strategy::ImageRs;
#[cfg(feature = "tinybmp")]
pub use crate::strategy::TinyBmp;
