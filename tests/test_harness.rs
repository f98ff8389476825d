use std::cell::Cell;
use std::time::Duration;

use anyhow::Result;
use rgbabench::harness::{self, Comparison, Stats};
use rgbabench::{Error, Harness, RawImage, Strategy, ITERATIONS};

/// Hands out a fixed 2x1 image, optionally with one byte flipped.
struct Fixed {
    name: &'static str,
    flip: Option<usize>,
}

impl Strategy for Fixed {
    fn name(&self) -> &str {
        self.name
    }

    fn decode(&self, _data: &[u8]) -> rgbabench::Result<RawImage> {
        let mut data = vec![1, 2, 3, 255, 4, 5, 6, 255];
        if let Some(i) = self.flip {
            data[i] ^= 0xff;
        }
        RawImage::new(2, 1, data)
    }
}

/// Fails on the given call.
struct FailsOn {
    call: usize,
    calls: Cell<usize>,
}

impl Strategy for FailsOn {
    fn name(&self) -> &str {
        "fails-on"
    }

    fn decode(&self, _data: &[u8]) -> rgbabench::Result<RawImage> {
        self.calls.set(self.calls.get() + 1);
        if self.calls.get() == self.call {
            Err(Error::EmptyImage { width: 0, height: 0 })
        } else {
            RawImage::new(1, 1, vec![0; 4])
        }
    }
}

#[test]
fn test_run_collects_one_sample_per_iteration() -> Result<()> {
    let strategy = Fixed { name: "fixed", flip: None };
    let stats = harness::run(&strategy, &[], ITERATIONS)?;
    assert_eq!(stats.len(), 1000);
    assert_eq!(stats.samples().len(), 1000);
    assert!(stats.min() <= stats.average());
    assert!(stats.average() <= stats.max());
    assert!(stats.min() <= stats.median() && stats.median() <= stats.max());
    Ok(())
}

#[test]
fn test_zero_iterations_rejected() {
    let strategy = Fixed { name: "fixed", flip: None };
    assert!(matches!(harness::run(&strategy, &[], 0), Err(Error::NoIterations)));
    assert!(matches!(Stats::new(vec![]), Err(Error::NoIterations)));
}

#[test]
fn test_first_error_aborts_run() {
    let strategy = FailsOn { call: 3, calls: Cell::new(0) };
    let res = harness::run(&strategy, &[], 10);
    assert!(matches!(res, Err(Error::EmptyImage { .. })));
    assert_eq!(strategy.calls.get(), 3);
}

#[test]
fn test_stats_from_known_samples() -> Result<()> {
    let samples = [4, 1, 3, 2, 10].map(Duration::from_millis).to_vec();
    let stats = Stats::new(samples.clone())?;
    assert_eq!(stats.samples(), samples.as_slice());
    assert_eq!(stats.min(), Duration::from_millis(1));
    assert_eq!(stats.max(), Duration::from_millis(10));
    assert_eq!(stats.median(), Duration::from_millis(3));
    assert_eq!(stats.average(), Duration::from_millis(4));
    Ok(())
}

#[test]
fn test_comparison() -> Result<()> {
    let same = Comparison::new("a", &[1, 2, 3, 4], "b", &[1, 2, 3, 4]);
    assert!(same.is_identical());
    assert_eq!(same.to_string(), "a == b (4 bytes)");
    same.ensure_identical()?;

    let content = Comparison::new("a", &[1, 2, 3, 4], "b", &[1, 9, 3, 9]);
    assert!(!content.is_identical());
    assert_eq!(content.first_mismatch, Some(1));
    assert_eq!(content.mismatched_bytes, 2);
    assert_eq!(content.to_string(), "a != b (4 vs 4 bytes, 2 differ, first at byte 1)");

    let length = Comparison::new("a", &[1, 2, 3, 4], "b", &[1, 2, 3, 4, 5, 6, 7, 8]);
    assert!(!length.is_identical());
    assert_eq!((length.left_len, length.right_len), (4, 8));
    assert_eq!(length.first_mismatch, Some(4));
    assert_eq!(length.mismatched_bytes, 4);
    assert!(matches!(
        length.ensure_identical(),
        Err(Error::Mismatch { left_len: 4, right_len: 8, first_mismatch: Some(4), .. })
    ));
    Ok(())
}

#[test]
fn test_compare_strategies() -> Result<()> {
    let a = Fixed { name: "a", flip: None };
    let b = Fixed { name: "b", flip: Some(6) };
    assert!(harness::compare(&a, &a, &[])?.is_identical());
    let cmp = harness::compare(&a, &b, &[])?;
    assert_eq!(cmp.first_mismatch, Some(6));
    Ok(())
}

#[test]
fn test_harness_check_and_run() -> Result<()> {
    let harness = Harness::new(25)
        .with(Fixed { name: "reference", flip: None })
        .with(Fixed { name: "same", flip: None })
        .with(Fixed { name: "broken", flip: Some(0) });
    assert_eq!(harness.iterations(), 25);
    assert_eq!(harness.strategy_names(), ["reference", "same", "broken"]);

    let checks = harness.check(&[])?;
    assert_eq!(checks.len(), 2);
    assert!(checks[0].is_identical());
    assert!(!checks[1].is_identical());
    assert_eq!(checks[1].right, "broken");

    let results = harness.run(&[])?;
    assert_eq!(results.len(), 3);
    for r in &results {
        assert_eq!(r.stats.len(), 25);
        assert_eq!((r.n_pixels, r.n_bytes), (2, 8));
        assert!(r.min_ms() <= r.average_ms() && r.average_ms() <= r.max_ms());
        assert!(r.min_ms() <= r.median_ms() && r.median_ms() <= r.max_ms());
        assert!(r.mpixels_per_sec(true) > 0.);
        let report = r.to_string();
        assert!(report.starts_with(&r.strategy));
        assert!(report.contains("Average: ") && report.contains("Max.: ") && report.contains("Min.: "));
    }
    Ok(())
}

#[test]
fn test_empty_harness() -> Result<()> {
    let harness = Harness::new(ITERATIONS);
    assert!(harness.check(&[])?.is_empty());
    assert!(harness.run(&[])?.is_empty());
    Ok(())
}

#[cfg(all(feature = "image", feature = "tinybmp"))]
#[test]
fn test_bundled_bitmap_benchmark() -> Result<()> {
    use rgbabench::resource::{self, DEFAULT_RESOURCE};
    use rgbabench::StrategyKind;

    let data = resource::load(DEFAULT_RESOURCE)?;
    let mut harness = Harness::new(ITERATIONS);
    harness.add(StrategyKind::library().build()?);
    harness.add(StrategyKind::native().build()?);
    for cmp in harness.check(data)? {
        cmp.ensure_identical()?;
    }
    for r in harness.run(data)? {
        assert_eq!(r.stats.len(), ITERATIONS);
        assert_eq!(r.n_bytes, 97 * 61 * 4);
        assert!(r.min_ms() <= r.average_ms() && r.average_ms() <= r.max_ms());
    }
    Ok(())
}
