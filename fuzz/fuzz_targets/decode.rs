#![no_main]
use libfuzzer_sys::fuzz_target;

use rgbabench::{ImageRs, Strategy, TinyBmp};

fuzz_target!(|data: &[u8]| {
    for strategy in [&ImageRs::default() as &dyn Strategy, &TinyBmp::default()] {
        if let Ok(img) = strategy.decode(data) {
            assert_eq!(img.data.len(), img.n_bytes());
        }
    }
});
