use std::borrow::Cow;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{ensure, Context, Result};
use rgbabench::resource::{self, DEFAULT_RESOURCE};
use rgbabench::{BenchResult, Harness, Stats, Strategy, StrategyKind};
use structopt::StructOpt;
use walkdir::WalkDir;

fn has_bmp_extension(path: &Path) -> bool {
    path.extension().map_or(false, |ext| ext.eq_ignore_ascii_case("bmp"))
}

/// Collects `.bmp` files from the given files and directory trees, sorted.
fn find_bmps(paths: &[PathBuf]) -> Result<Vec<PathBuf>> {
    let mut out = Vec::new();
    for path in paths {
        ensure!(path.exists(), "path doesn't exist: {}", path.display());
        for entry in WalkDir::new(path).follow_links(true) {
            let entry = entry.with_context(|| format!("error walking {}", path.display()))?;
            if entry.file_type().is_file() && has_bmp_extension(entry.path()) {
                out.push(entry.into_path());
            }
        }
    }
    out.sort_unstable();
    out.dedup();
    Ok(out)
}

enum Source {
    Bundled(&'static str),
    File(PathBuf),
}

impl Source {
    fn label(&self) -> Cow<'_, str> {
        match self {
            Self::Bundled(name) => format!("<bundled:{}>", name).into(),
            Self::File(path) => path.to_string_lossy(),
        }
    }

    fn read(&self) -> Result<Cow<'static, [u8]>> {
        Ok(match self {
            Self::Bundled(name) => resource::load(name)?.into(),
            Self::File(path) => fs::read(path)
                .with_context(|| format!("error reading {}", path.to_string_lossy()))?
                .into(),
        })
    }
}

#[derive(Clone)]
struct ImageBench {
    results: Vec<BenchResult>,
    n_pixels: usize,
    n_bytes: usize,
}

impl ImageBench {
    pub fn report(&self, use_median: bool) {
        let (w_name, w_col) = (20, 12);
        print!("{:<w$}", "", w = w_name);
        print!("{:>w$}", "avg:ms", w = w_col);
        print!("{:>w$}", "min:ms", w = w_col);
        print!("{:>w$}", "max:ms", w = w_col);
        print!("{:>w$}", "median:ms", w = w_col);
        print!("{:>w$}", "Mp/s", w = w_col);
        println!();
        for r in &self.results {
            print!("{:<w$}", r.strategy, w = w_name);
            print!("{:>w$.3}", r.average_ms(), w = w_col);
            print!("{:>w$.3}", r.min_ms(), w = w_col);
            print!("{:>w$.3}", r.max_ms(), w = w_col);
            print!("{:>w$.3}", r.median_ms(), w = w_col);
            print!("{:>w$.1}", r.mpixels_per_sec(use_median), w = w_col);
            println!();
        }
    }
}

#[derive(Default)]
struct BenchTotals {
    results: Vec<ImageBench>,
}

impl BenchTotals {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn update(&mut self, b: &ImageBench) {
        self.results.push(b.clone())
    }

    pub fn report(&self, use_median: bool, fancy: bool) {
        if self.results.is_empty() {
            return;
        }
        let names: Vec<_> = self.results[0].results.iter().map(|r| r.strategy.clone()).collect();
        let n = names.len();
        let (mut total_sec, mut worst, mut n_pixels_total, mut n_bytes_total) =
            (vec![0.; n], vec![vec![]; n], 0, 0);
        for r in &self.results {
            n_pixels_total += r.n_pixels;
            n_bytes_total += r.n_bytes;
            for i in 0..n {
                let res = &r.results[i];
                let ms = if use_median { res.median_ms() } else { res.average_ms() };
                total_sec[i] += ms / 1e3;
                worst[i].push(res.stats.max());
            }
        }
        let mpixels = n_pixels_total as f64 / 1e6;
        let mbytes = n_bytes_total as f64 / 1024. / 1024.;
        // mean over images of each image's slowest decode
        let worst_ms: Vec<f64> = worst
            .into_iter()
            .map(|max| Stats::new(max).map_or(0., |s| s.average().as_secs_f64() * 1e3))
            .collect();

        println!("---");
        println!(
            "Overall results: ({} images, {:.2} MB raw, {:.2} MP):",
            self.results.len(),
            mbytes,
            mpixels
        );
        if fancy {
            let (w_header, w_col) = (14, 20);
            let print_sep = |s| print!("{}{:->w$}", s, "", w = w_header + n * w_col);
            print_sep("");
            print!("\n{:<w$}", "", w = w_header);
            (0..n).for_each(|i| print!("{:>w$}", names[i], w = w_col));
            print_sep("\n");
            print!("\n{:<w$}", "decode   ms", w = w_header);
            (0..n).for_each(|i| print!("{:>w$.2}", total_sec[i] * 1e3, w = w_col));
            print!("\n{:<w$}", "         Mp/s", w = w_header);
            (0..n).for_each(|i| print!("{:>w$.1}", mpixels / total_sec[i], w = w_col));
            print!("\n{:<w$}", "         MB/s", w = w_header);
            (0..n).for_each(|i| print!("{:>w$.1}", mbytes / total_sec[i], w = w_col));
            print!("\n{:<w$}", "worst    ms", w = w_header);
            (0..n).for_each(|i| print!("{:>w$.2}", worst_ms[i], w = w_col));
            print_sep("\n");
            println!();
        } else {
            let (w_name, w_col) = (20, 13);
            print!("{:<w$}", "", w = w_name);
            print!("{:>w$}", "decode:ms", w = w_col);
            print!("{:>w$}", "decode:Mp/s", w = w_col);
            print!("{:>w$}", "decode:MB/s", w = w_col);
            println!();
            for (i, name) in names.iter().enumerate() {
                print!("{:<w$}", name, w = w_name);
                print!("{:>w$.2}", total_sec[i] * 1e3, w = w_col);
                print!("{:>w$.1}", mpixels / total_sec[i], w = w_col);
                print!("{:>w$.1}", mbytes / total_sec[i], w = w_col);
                println!();
            }
        }
    }
}

fn bench_image(
    source: &Source, kinds: &[StrategyKind], iterations: usize, use_median: bool,
) -> Result<ImageBench> {
    let label = source.label();
    let data = source.read()?;
    let strategies =
        kinds.iter().map(|kind| kind.build()).collect::<rgbabench::Result<Vec<_>>>()?;
    let img = strategies[0]
        .decode(&data)
        .with_context(|| format!("{}: error decoding {}", strategies[0].name(), label))?;
    println!(
        "{} ({}x{}, {} KB bmp, {:.2} MB raw, {:.2} MP)",
        label,
        img.width,
        img.height,
        data.len() / 1024,
        img.n_bytes() as f64 / 1024. / 1024.,
        img.n_pixels() as f64 / 1e6
    );

    let mut harness = Harness::new(iterations);
    strategies.into_iter().for_each(|s| harness.add(s));
    for cmp in harness.check(&data)? {
        cmp.ensure_identical().with_context(|| format!("output mismatch on {}", label))?;
    }
    let results = harness.run(&data)?;
    let bench = ImageBench { results, n_pixels: img.n_pixels(), n_bytes: img.n_bytes() };
    bench.report(use_median);
    Ok(bench)
}

fn bench_suite(
    sources: &[Source], kinds: &[StrategyKind], iterations: usize, use_median: bool,
    fancy: bool,
) -> Result<()> {
    let mut totals = BenchTotals::new();
    let mut n_failed = 0;
    for source in sources {
        match bench_image(source, kinds, iterations, use_median) {
            Ok(res) => totals.update(&res),
            Err(err) => {
                n_failed += 1;
                log::error!("{}: {:#}", source.label(), err);
            }
        }
    }
    if totals.results.len() > 1 {
        totals.report(use_median, fancy);
    }
    ensure!(n_failed == 0, "{} of {} images failed", n_failed, sources.len());
    Ok(())
}

#[derive(Debug, StructOpt)]
struct Args {
    /// BMP files or directories containing them (bundled bitmap if none given).
    #[structopt(parse(from_os_str))]
    paths: Vec<PathBuf>,
    /// Number of timed decodes per image and strategy.
    #[structopt(short = "n", long, default_value = "1000")]
    iterations: usize,
    /// Decode strategy to run, may be repeated (default: all available).
    #[structopt(short, long = "strategy")]
    strategies: Vec<StrategyKind>,
    /// Use the median instead of the average (mean) for throughput.
    #[structopt(long)]
    median: bool,
    /// Simple totals, no fancy tables.
    #[structopt(long)]
    simple: bool,
    /// Log more (-v info, -vv debug, -vvv trace).
    #[structopt(short, long, parse(from_occurrences))]
    verbose: u8,
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();
}

fn main() -> Result<()> {
    let args = <Args as StructOpt>::from_args();
    init_logging(args.verbose);
    ensure!(args.iterations > 0, "number of iterations must be positive");

    let kinds =
        if args.strategies.is_empty() { StrategyKind::available() } else { args.strategies };
    ensure!(!kinds.is_empty(), "no decode strategies compiled in");
    for kind in &kinds {
        ensure!(kind.is_enabled(), "strategy not compiled in: {}", kind);
    }
    log::info!("strategies: {:?}, {} iterations", kinds, args.iterations);

    let sources: Vec<_> = if args.paths.is_empty() {
        vec![Source::Bundled(DEFAULT_RESOURCE)]
    } else {
        find_bmps(&args.paths)?.into_iter().map(Source::File).collect()
    };
    ensure!(!sources.is_empty(), "no BMP files found in given paths");
    bench_suite(&sources, &kinds, args.iterations, args.median, !args.simple)
}
