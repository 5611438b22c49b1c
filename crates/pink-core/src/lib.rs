pub mod error;
pub mod export;
pub mod octave;
pub mod plot;
pub mod spectrum;
pub mod stochastic;
pub mod table;

use std::path::PathBuf;

pub use color_eyre;
pub use rand;
pub use tracing;

use rand::Rng;
use tracing::{info, warn};

pub use crate::error::{PinkError, Result};
use crate::octave::OctaveVoss;
use crate::spectrum::{SlopeFit, Wave};
use crate::stochastic::StochasticVoss;

pub enum NoiseMethod {
    Octave(OctaveVoss),
    Stochastic(StochasticVoss),
}

impl NoiseMethod {
    pub fn generate<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<Vec<f64>> {
        match self {
            Self::Octave(generator) => generator.generate(rng),
            Self::Stochastic(generator) => generator.generate(rng),
        }
    }

    pub fn file_stem(&self) -> &'static str {
        match self {
            Self::Octave(_) => "pink_noise_octaves_run",
            Self::Stochastic(_) => "pink_noise_stochastic_run",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Self::Octave(_) => "Pink noise (octave-interval updates)",
            Self::Stochastic(_) => "Pink noise (stochastic updates)",
        }
    }
}

pub struct RunOutput {
    pub directory: PathBuf,
    pub framerate: f64,
    pub wav: bool,
}

pub struct RunReport {
    pub plot: PathBuf,
    pub wav: Option<PathBuf>,
    pub samples: usize,
    /// `None` when the spectrum has too few bins to fit a line.
    pub fit: Option<SlopeFit>,
}

/// Generates one noise signal, plots its power spectrum and optionally
/// exports it as audio.
pub fn process_run<R: Rng + ?Sized>(
    method: &NoiseMethod,
    rng: &mut R,
    output: &RunOutput,
) -> Result<RunReport> {
    let ys = method.generate(rng)?;
    let wave = Wave::new(ys, output.framerate)?;
    let spectrum = wave.make_spectrum();
    let fit = match spectrum.estimate_slope() {
        Ok(fit) => {
            info!(
                method = method.file_stem(),
                samples = wave.len(),
                slope = fit.slope,
                "estimated spectral slope"
            );
            Some(fit)
        }
        Err(err) => {
            warn!(method = method.file_stem(), samples = wave.len(), %err, "no spectral slope");
            None
        }
    };

    let plot = output.directory.join(format!("{}.png", method.file_stem()));
    plot::plot_power(&spectrum, &plot, method.title())?;

    let wav = if output.wav {
        let path = output.directory.join(format!("{}.wav", method.file_stem()));
        export::export_to_wav(&path, &wave)?;
        Some(path)
    } else {
        None
    };

    Ok(RunReport {
        plot,
        wav,
        samples: wave.len(),
        fit,
    })
}
