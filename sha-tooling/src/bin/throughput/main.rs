use anyhow::{Context, Result};
use clap::Parser;
use humansize::{file_size_opts, FileSize};
use log::info;
use rand::{RngCore, SeedableRng};
use rand_xorshift::XorShiftRng;
use serde::Serialize;
use sha_core::TEST_SEED;
use sha_tooling::{measure_repeated, HashFn, Metadata};

#[derive(Debug, Parser)]
#[clap(
    name = "throughput",
    about = "Measure hashing throughput and print a JSON report."
)]
struct Cli {
    #[clap(short, long, arg_enum, default_value = "sha256", help = "Hash function to use.")]
    algorithm: HashFn,
    #[clap(long, default_value = "16777216", help = "Bytes hashed per iteration.")]
    size: usize,
    #[clap(long, default_value = "10", help = "Iterations per measurement.")]
    iterations: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
enum Mode {
    Stream,
    Batch,
    Merkle,
}

impl Mode {
    const ALL: [Mode; 3] = [Mode::Stream, Mode::Batch, Mode::Merkle];
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "kebab-case")]
struct Report {
    hash_fn: HashFn,
    mode: Mode,
    bytes: usize,
    iterations: usize,
    wall_time_ms: u128,
    cpu_time_ms: u128,
    bytes_per_second: f64,
}

fn run(cli: &Cli, mode: Mode, data: &[u8]) -> Result<Report> {
    let m = match mode {
        Mode::Stream => measure_repeated(cli.iterations, || cli.algorithm.hash(data).map(|_| ()))?,
        Mode::Batch => measure_repeated(cli.iterations, || {
            cli.algorithm.hash_many(data, 64).map(|_| ())
        })?,
        Mode::Merkle => {
            let whole = data.len() - data.len() % cli.algorithm.digest_bytes();
            measure_repeated(cli.iterations, || {
                cli.algorithm.merkle_root_bytes(&data[..whole]).map(|_| ())
            })?
        }
    };

    let total = (data.len() * cli.iterations) as u64;
    info!(
        "{:?} {:?}: {} in {:?}",
        cli.algorithm,
        mode,
        total.file_size(file_size_opts::BINARY).unwrap_or_default(),
        m.wall_time
    );

    Ok(Report {
        hash_fn: cli.algorithm,
        mode,
        bytes: data.len(),
        iterations: cli.iterations,
        wall_time_ms: m.wall_time.as_millis(),
        cpu_time_ms: m.cpu_time.as_millis(),
        bytes_per_second: m.throughput(total),
    })
}

fn main() -> Result<()> {
    fil_logger::init();

    let cli = Cli::parse();

    let mut data = vec![0u8; cli.size];
    XorShiftRng::from_seed(TEST_SEED).fill_bytes(&mut data);

    let reports = Mode::ALL
        .into_iter()
        .map(|mode| run(&cli, mode, &data))
        .collect::<Result<Vec<_>>>()?;

    let wrapped = Metadata::wrap(reports)?;
    serde_json::to_writer_pretty(std::io::stdout(), &wrapped).context("failed to write report")?;
    println!();

    Ok(())
}
