use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Parser;
use log::{error, info};
use rayon::prelude::*;
use sha_tooling::HashFn;

#[derive(Debug, Parser)]
#[clap(
    name = "shasum",
    version,
    about = "Print SHA-1/SHA-2 digests of files, or the Merkle root of a list of digests."
)]
struct Cli {
    #[clap(short, long, arg_enum, default_value = "sha256", help = "Hash function to use.")]
    algorithm: HashFn,
    #[clap(short, long, help = "Hash every digest once more.")]
    double: bool,
    #[clap(
        short,
        long,
        help = "Read hex digests, one per line, and print their Merkle root."
    )]
    merkle: bool,
    #[clap(short = 'j', long, help = "Number of files hashed in parallel.")]
    threads: Option<usize>,
    #[clap(help = "Files to read. Standard input is read when none are given.")]
    files: Vec<PathBuf>,
}

fn read_leaves(cli: &Cli) -> Result<Vec<String>> {
    let mut leaves = Vec::new();
    let mut push_lines = |reader: &mut dyn BufRead| -> Result<()> {
        for line in reader.lines() {
            let line = line.context("failed to read line")?;
            if !line.trim().is_empty() {
                leaves.push(line);
            }
        }
        Ok(())
    };

    if cli.files.is_empty() {
        push_lines(&mut io::stdin().lock())?;
    }
    for path in &cli.files {
        let file = File::open(path).with_context(|| format!("failed to open {}", path.display()))?;
        push_lines(&mut BufReader::new(file))?;
    }
    Ok(leaves)
}

fn main() -> Result<()> {
    fil_logger::init();

    let cli = Cli::parse();

    if cli.merkle {
        let leaves = read_leaves(&cli)?;
        info!("merkle root of {} leaves", leaves.len());
        println!("{}", cli.algorithm.merkle_root(&leaves)?);
        return Ok(());
    }

    if cli.files.is_empty() {
        let digest = cli.algorithm.hash_reader(&mut io::stdin().lock(), cli.double)?;
        println!("{}  -", digest);
        return Ok(());
    }

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(cli.threads.unwrap_or_else(num_cpus::get))
        .build()
        .context("failed to build thread pool")?;

    let digests = pool.install(|| {
        cli.files
            .par_iter()
            .map(|path| cli.algorithm.hash_file(path, cli.double))
            .collect::<Vec<_>>()
    });

    let mut failures = 0;
    for (path, digest) in cli.files.iter().zip(digests) {
        match digest {
            Ok(digest) => println!("{}  {}", digest, path.display()),
            Err(err) => {
                error!("{:?}", err);
                failures += 1;
            }
        }
    }

    if failures > 0 {
        bail!("{} of {} files could not be hashed", failures, cli.files.len());
    }
    Ok(())
}
