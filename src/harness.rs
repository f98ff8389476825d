//! Correctness check and timing loop over a set of strategies.

use std::fmt::{self, Display};
use std::hint::black_box;
use std::time::{Duration, Instant};

use crate::error::{Error, Result};
use crate::strategy::Strategy;
use crate::types::RawImage;

/// Default number of timed decodes per strategy.
pub const ITERATIONS: usize = 1000;

fn timeit<T>(func: impl FnOnce() -> T) -> (T, Duration) {
    let t0 = Instant::now();
    let out = func();
    let t1 = Instant::now();
    (black_box(out), t1 - t0)
}

fn ms(d: Duration) -> f64 {
    d.as_secs_f64() * 1e3
}

/// Elapsed-time samples of one strategy, kept in run order.
#[derive(Clone, Debug)]
pub struct Stats {
    samples: Vec<Duration>,
    sorted: Vec<Duration>,
}

impl Stats {
    pub fn new(samples: Vec<Duration>) -> Result<Self> {
        if samples.is_empty() {
            return Err(Error::NoIterations);
        }
        let mut sorted = samples.clone();
        sorted.sort_unstable();
        Ok(Self { samples, sorted })
    }

    pub fn samples(&self) -> &[Duration] {
        &self.samples
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn average(&self) -> Duration {
        let total: Duration = self.samples.iter().sum();
        match u32::try_from(self.samples.len()) {
            Ok(n) => total / n,
            Err(_) => total.div_f64(self.samples.len() as f64),
        }
    }

    pub fn min(&self) -> Duration {
        self.sorted[0]
    }

    pub fn max(&self) -> Duration {
        self.sorted[self.sorted.len() - 1]
    }

    pub fn median(&self) -> Duration {
        self.sorted[self.sorted.len() / 2]
    }
}

/// Decodes `data` with `strategy` `iterations` times and records each duration.
///
/// The first decode error aborts the run.
pub fn run<S: Strategy + ?Sized>(strategy: &S, data: &[u8], iterations: usize) -> Result<Stats> {
    if iterations == 0 {
        return Err(Error::NoIterations);
    }
    let mut samples = Vec::with_capacity(iterations);
    for _ in 0..iterations {
        let (decoded, elapsed) = timeit(|| strategy.decode(data));
        decoded?;
        samples.push(elapsed);
    }
    let stats = Stats::new(samples)?;
    log::debug!(
        "{}: {} runs, avg {:.3} ms, min {:.3} ms, max {:.3} ms",
        strategy.name(),
        stats.len(),
        ms(stats.average()),
        ms(stats.min()),
        ms(stats.max())
    );
    Ok(stats)
}

/// Outcome of decoding the same bytes through two strategies.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Comparison {
    pub left: String,
    pub right: String,
    pub left_len: usize,
    pub right_len: usize,
    pub first_mismatch: Option<usize>,
    pub mismatched_bytes: usize,
}

impl Comparison {
    pub fn new(left: &str, left_data: &[u8], right: &str, right_data: &[u8]) -> Self {
        let mut first_mismatch = None;
        let mut mismatched_bytes = 0;
        for (i, (a, b)) in left_data.iter().zip(right_data).enumerate() {
            if a != b {
                first_mismatch.get_or_insert(i);
                mismatched_bytes += 1;
            }
        }
        let common = left_data.len().min(right_data.len());
        if first_mismatch.is_none() && left_data.len() != right_data.len() {
            first_mismatch = Some(common);
        }
        mismatched_bytes += left_data.len().max(right_data.len()) - common;
        Self {
            left: left.into(),
            right: right.into(),
            left_len: left_data.len(),
            right_len: right_data.len(),
            first_mismatch,
            mismatched_bytes,
        }
    }

    pub const fn is_identical(&self) -> bool {
        self.first_mismatch.is_none()
    }

    pub fn ensure_identical(&self) -> Result<()> {
        if self.is_identical() {
            Ok(())
        } else {
            Err(Error::Mismatch {
                left: self.left.clone(),
                right: self.right.clone(),
                left_len: self.left_len,
                right_len: self.right_len,
                first_mismatch: self.first_mismatch,
            })
        }
    }
}

impl Display for Comparison {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.is_identical() {
            write!(f, "{} == {} ({} bytes)", self.left, self.right, self.left_len)
        } else {
            write!(
                f,
                "{} != {} ({} vs {} bytes, {} differ",
                self.left, self.right, self.left_len, self.right_len, self.mismatched_bytes
            )?;
            if let Some(pos) = self.first_mismatch {
                write!(f, ", first at byte {}", pos)?;
            }
            write!(f, ")")
        }
    }
}

/// Decodes `data` through both strategies and compares the RGBA bytes.
pub fn compare<A, B>(left: &A, right: &B, data: &[u8]) -> Result<Comparison>
where
    A: Strategy + ?Sized,
    B: Strategy + ?Sized,
{
    let a = left.decode(data)?;
    let b = right.decode(data)?;
    let cmp = Comparison::new(left.name(), a.as_bytes(), right.name(), b.as_bytes());
    log::debug!("{}", cmp);
    Ok(cmp)
}

#[derive(Clone, Debug)]
pub struct BenchResult {
    pub strategy: String,
    pub n_pixels: usize,
    pub n_bytes: usize,
    pub stats: Stats,
}

impl BenchResult {
    pub fn new(strategy: impl AsRef<str>, img: &RawImage, stats: Stats) -> Self {
        let strategy = strategy.as_ref().into();
        Self { strategy, n_pixels: img.n_pixels(), n_bytes: img.n_bytes(), stats }
    }

    pub fn average_ms(&self) -> f64 {
        ms(self.stats.average())
    }

    pub fn min_ms(&self) -> f64 {
        ms(self.stats.min())
    }

    pub fn max_ms(&self) -> f64 {
        ms(self.stats.max())
    }

    pub fn median_ms(&self) -> f64 {
        ms(self.stats.median())
    }

    /// Megapixels decoded per second, from the mean or the median time.
    pub fn mpixels_per_sec(&self, use_median: bool) -> f64 {
        let sec = if use_median { self.stats.median() } else { self.stats.average() };
        self.n_pixels as f64 / 1e6 / sec.as_secs_f64()
    }
}

impl Display for BenchResult {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "{}", self.strategy)?;
        writeln!(f, "Average: {:.3} ms", self.average_ms())?;
        writeln!(f, "Max.: {:.3} ms", self.max_ms())?;
        write!(f, "Min.: {:.3} ms", self.min_ms())
    }
}

/// A set of strategies checked and timed against the same input.
pub struct Harness<'a> {
    iterations: usize,
    strategies: Vec<Box<dyn Strategy + Send + Sync + 'a>>,
}

impl<'a> Harness<'a> {
    pub fn new(iterations: usize) -> Self {
        Self { iterations, strategies: vec![] }
    }

    #[must_use]
    pub fn with(mut self, strategy: impl Strategy + Send + Sync + 'a) -> Self {
        self.add(Box::new(strategy));
        self
    }

    pub fn add(&mut self, strategy: Box<dyn Strategy + Send + Sync + 'a>) {
        self.strategies.push(strategy);
    }

    pub const fn iterations(&self) -> usize {
        self.iterations
    }

    pub fn strategy_names(&self) -> Vec<&str> {
        self.strategies.iter().map(|s| s.name()).collect()
    }

    /// Compares every strategy against the first one, stopping at the first
    /// decode error. Mismatches are returned, not raised.
    pub fn check(&self, data: &[u8]) -> Result<Vec<Comparison>> {
        let Some((reference, others)) = self.strategies.split_first() else {
            return Ok(vec![]);
        };
        let expected = reference.decode(data)?;
        let mut out = Vec::with_capacity(others.len());
        for strategy in others {
            let actual = strategy.decode(data)?;
            let cmp = Comparison::new(
                reference.name(),
                expected.as_bytes(),
                strategy.name(),
                actual.as_bytes(),
            );
            if cmp.is_identical() {
                log::debug!("{}", cmp);
            } else {
                log::warn!("{}", cmp);
            }
            out.push(cmp);
        }
        Ok(out)
    }

    /// Times every strategy in turn.
    pub fn run(&self, data: &[u8]) -> Result<Vec<BenchResult>> {
        let mut results = Vec::with_capacity(self.strategies.len());
        for strategy in &self.strategies {
            let img = strategy.decode(data)?;
            let stats = run(strategy, data, self.iterations)?;
            results.push(BenchResult::new(strategy.name(), &img, stats));
        }
        Ok(results)
    }
}
