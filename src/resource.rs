//! Bitmaps bundled into the binary.

use std::io::Cursor;

use crate::error::{Error, Result};

/// The bitmap every strategy is checked and timed against by default.
pub const DEFAULT_RESOURCE: &str = "crate.bmp";

const RESOURCES: &[(&str, &[u8])] = &[(DEFAULT_RESOURCE, include_bytes!("../assets/crate.bmp"))];

/// Names of all bundled resources.
pub fn names() -> impl Iterator<Item = &'static str> {
    RESOURCES.iter().map(|&(name, _)| name)
}

pub fn load(name: &str) -> Result<&'static [u8]> {
    RESOURCES
        .iter()
        .find(|&&(n, _)| n == name)
        .map(|&(_, data)| data)
        .ok_or_else(|| Error::UnknownResource { name: name.into() })
}

/// Same as [`load`], wrapped in a stream.
pub fn open(name: &str) -> Result<Cursor<&'static [u8]>> {
    load(name).map(Cursor::new)
}
