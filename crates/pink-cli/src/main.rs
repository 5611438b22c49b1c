use std::{fs, path::PathBuf};

use clap::{Args as ClapArgs, Parser, Subcommand};
use pink_core::{
    color_eyre::{self, eyre},
    octave::OctaveVoss,
    process_run,
    rand::{rngs::StdRng, SeedableRng},
    spectrum::DEFAULT_FRAMERATE,
    stochastic::StochasticVoss,
    tracing::info,
    NoiseMethod, RunOutput,
};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Seed for a reproducible run
    #[arg(short, long)]
    seed: Option<u64>,

    /// Directory receiving the plots
    #[arg(short, long, default_value = "images")]
    out_dir: PathBuf,

    /// Sample rate of the generated waveform
    #[arg(short, long, default_value_t = DEFAULT_FRAMERATE)]
    framerate: f64,

    /// Also export each signal to .wav
    #[arg(short, long)]
    wav: bool,

    /// Command (runs both generators when omitted)
    #[command(subcommand)]
    cmd: Option<SubCmd>,
}

#[derive(Subcommand, Debug)]
enum SubCmd {
    /// Sources refreshed on a fixed octave-like schedule
    Octave(OctaveCmd),
    /// Sources refreshed by random geometric events
    Stochastic(StochasticCmd),
    /// Both generators, octave first
    All,
}

#[derive(ClapArgs, Debug)]
struct OctaveCmd {
    /// Number of sources
    #[arg(long, default_value_t = 10)]
    nrows: usize,

    /// Number of samples
    #[arg(long, default_value_t = 11_205)]
    ncols: usize,
}

#[derive(ClapArgs, Debug)]
struct StochasticCmd {
    /// Number of samples
    #[arg(long, default_value_t = 11_205)]
    nrows: usize,

    /// Number of sources
    #[arg(long, default_value_t = 10)]
    ncols: usize,
}

fn build_methods(cmd: Option<SubCmd>) -> eyre::Result<Vec<NoiseMethod>> {
    let methods = match cmd {
        Some(SubCmd::Octave(c)) => vec![NoiseMethod::Octave(OctaveVoss::new(c.nrows, c.ncols)?)],
        Some(SubCmd::Stochastic(c)) => vec![NoiseMethod::Stochastic(StochasticVoss::new(
            c.nrows, c.ncols,
        )?)],
        Some(SubCmd::All) | None => vec![
            NoiseMethod::Octave(OctaveVoss::new(10, 11_205)?),
            NoiseMethod::Stochastic(StochasticVoss::with_rows(11_205)?),
        ],
    };

    Ok(methods)
}

fn build_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    }
}

fn setup_logging() -> eyre::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    Ok(())
}

fn main() -> eyre::Result<()> {
    color_eyre::install()?;
    setup_logging()?;

    let args = Args::parse();
    let methods = build_methods(args.cmd)?;
    fs::create_dir_all(&args.out_dir)?;

    let output = RunOutput {
        directory: args.out_dir,
        framerate: args.framerate,
        wav: args.wav,
    };
    let mut rng = build_rng(args.seed);

    for method in &methods {
        let report = process_run(method, &mut rng, &output)?;
        info!(
            plot = %report.plot.display(),
            samples = report.samples,
            slope = report.fit.map(|fit| fit.slope),
            "run complete"
        );
    }

    Ok(())
}
