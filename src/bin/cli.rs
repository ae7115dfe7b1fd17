//
// SPDX-License-Identifier: Apache-2.0 OR MIT
//
//! CLI supporting `generate` and `verify` for keyed payload streams.
//!
//! Examples:
//! ```bash
//! payload-cli generate bucket/key-0001 --size 8192             # to stdout
//! payload-cli generate bucket/key-0001 --size 1048576 -o out.bin --offset 4096
//! payload-cli generate abc --size 9 --tiled                    # abcabcabc
//! payload-cli verify   bucket/key-0001 --size 1048576 --seeks 64 --rng-seed 42
//! ```

use anyhow::{bail, Context, Result};
use clap::{ArgAction, Args, Parser, Subcommand};
use rand::Rng;
use std::fs::File;
use std::io::{self, BufWriter, ErrorKind, Write};
use std::path::PathBuf;
use std::time::Instant;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use keyed_payload::{copy_payload, Anchor, DummyReader, GeneratorConfig, ReadOutcome};

/// Macro to safely print with broken pipe handling
macro_rules! safe_println {
    ($($arg:tt)*) => {
        match writeln!(io::stdout(), $($arg)*) {
            Ok(_) => {},
            Err(e) if e.kind() == ErrorKind::BrokenPipe => {
                // Gracefully exit on broken pipe (e.g., when piped to head/tail)
                std::process::exit(0);
            }
            Err(e) => return Err(e.into())
        }
    };
}

#[derive(Parser)]
#[command(name = "payload-cli", version, about = "Keyed synthetic payload streams")]
struct Cli {
    /// Increase log verbosity (-v = info, -vv = debug)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    cmd: Command,
}

/// Options shared by every subcommand that builds a stream.
#[derive(Args, Debug)]
struct StreamArgs {
    /// Object key (or any identifier) the payload is derived from
    seed: String,

    /// Logical size of the stream in bytes
    #[arg(short, long)]
    size: u64,

    /// Repeat the seed bytes verbatim instead of generating filler
    #[arg(long)]
    tiled: bool,

    /// Explicit filler RNG seed (overrides KEYED_PAYLOAD_SEED)
    #[arg(long)]
    rng_seed: Option<u64>,
}

impl StreamArgs {
    fn build(&self) -> DummyReader {
        if self.tiled {
            return DummyReader::tiled(self.size, &self.seed);
        }
        let mut config = GeneratorConfig::from_env();
        if self.rng_seed.is_some() {
            config.seed = self.rng_seed;
        }
        DummyReader::with_config(self.size, &self.seed, &config)
    }
}

#[derive(Subcommand)]
enum Command {
    /// Write the stream (from an optional offset) to stdout or a file
    Generate {
        #[command(flatten)]
        stream: StreamArgs,

        /// Start reading at this offset
        #[arg(long, default_value_t = 0)]
        offset: i64,

        /// Read size per call
        #[arg(short, long, default_value_t = 1024 * 1024)]
        chunk: usize,

        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Check that random seeks re-read the same bytes as a sequential pass
    Verify {
        #[command(flatten)]
        stream: StreamArgs,

        /// Number of random seek+read probes
        #[arg(long, default_value_t = 32)]
        seeks: usize,

        /// Bytes read per probe
        #[arg(long, default_value_t = 4096)]
        probe: usize,
    },
}

/// Main CLI function
fn main() -> Result<()> {
    // Loads any variables from .env file that are not already set
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => "warn",        // no -v: WARN level
        1 => "info",        // -v: INFO level
        _ => "debug",       // -vv or more: DEBUG level
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(filter)))
        .with_target(false)
        .with_writer(io::stderr)
        .init();

    // Capture log crate messages from dependencies
    tracing_log::LogTracer::init().ok();

    match cli.cmd {
        Command::Generate { stream, offset, chunk, output } => {
            generate_cmd(&stream, offset, chunk, output)?;
        }
        Command::Verify { stream, seeks, probe } => {
            verify_cmd(&stream, seeks, probe)?;
        }
    }

    Ok(())
}

fn generate_cmd(args: &StreamArgs, offset: i64, chunk: usize, output: Option<PathBuf>) -> Result<()> {
    let t0 = Instant::now();
    let mut reader = args.build();
    debug!("Built stream of {} bytes in {:?}", reader.size(), t0.elapsed());

    reader
        .seek(offset, Anchor::FromStart)
        .with_context(|| format!("cannot start at offset {offset}"))?;

    let mut out: Box<dyn Write> = match &output {
        Some(path) => Box::new(BufWriter::new(
            File::create(path).with_context(|| format!("failed to create {}", path.display()))?,
        )),
        None => Box::new(BufWriter::new(io::stdout().lock())),
    };

    let written = match copy_payload(&mut reader, &mut out, chunk) {
        Ok(n) => n,
        Err(e) if e.kind() == ErrorKind::BrokenPipe => std::process::exit(0),
        Err(e) => return Err(e).context("failed to write payload"),
    };
    out.flush().context("failed to flush output")?;

    info!(
        "Wrote {} bytes for seed {:?} in {:?}",
        written,
        args.seed,
        t0.elapsed()
    );
    Ok(())
}

fn verify_cmd(args: &StreamArgs, seeks: usize, probe: usize) -> Result<()> {
    let mut reader = args.build();
    let size = reader.size();
    if size == 0 {
        bail!("nothing to verify: stream size is 0");
    }

    let mut reference = Vec::with_capacity(size as usize);
    copy_payload(&mut reader, &mut reference, 1024 * 1024).context("sequential pass failed")?;

    let mut rng = rand::rng();
    let mut buf = vec![0u8; probe.max(1)];
    for i in 0..seeks {
        let at = rng.random_range(0..=size);
        reader.seek(at as i64, Anchor::FromStart)?;
        let n = match reader.try_read(&mut buf)? {
            ReadOutcome::Data(n) => n,
            ReadOutcome::EndOfStream => 0,
        };
        let start = at as usize;
        if buf[..n] != reference[start..start + n] {
            bail!("probe {i}: {n} bytes at offset {at} differ from the sequential pass");
        }
        debug!("probe {}: offset={} len={} ok", i, at, n);
    }

    safe_println!("OK: {} probes matched over {} bytes", seeks, size);
    Ok(())
}
