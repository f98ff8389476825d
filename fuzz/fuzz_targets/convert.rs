#![no_main]
use libfuzzer_sys::fuzz_target;

use rgbabench::convert::{bgr24_to_rgba32, bgra32_to_rgba32, rgb24_to_rgba32};

fuzz_target!(|input: (u8, u8, &[u8])| {
    let (w, h, data) = input;
    let (w, h) = (1 + u32::from(w % 64), 1 + u32::from(h % 64));

    let mut buf = data.to_vec();
    bgra32_to_rgba32(&mut buf);
    bgra32_to_rgba32(&mut buf);
    assert_eq!(buf, data);

    let n = (w * h * 3) as usize;
    match (rgb24_to_rgba32(data, w, h), bgr24_to_rgba32(data, w, h)) {
        (Ok(rgba), Ok(bgra)) => {
            assert_eq!(data.len(), n);
            assert_eq!(rgba.len(), (w * h * 4) as usize);
            assert_eq!(bgra.len(), rgba.len());
        }
        (Err(_), Err(_)) => assert_ne!(data.len(), n),
        _ => panic!("rgb and bgr expansion disagree on validity"),
    }
});
