use std::path::Path;

use tracing::info;

use crate::error::{invalid, Result};
use crate::spectrum::Wave;

/// Writes `wave` as mono 16-bit PCM, unbiased and normalized to full scale.
pub fn export_to_wav(path: &Path, wave: &Wave) -> Result<()> {
    let sample_rate = wave.framerate.round();
    if !(1.0..=u32::MAX as f64).contains(&sample_rate) {
        return Err(invalid(format!(
            "framerate {} cannot be stored in a wav header",
            wave.framerate
        )));
    }

    let spec = hound::WavSpec {
        channels: 1,
        sample_rate: sample_rate as u32,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };

    let mut scaled = wave.clone();
    scaled.unbias();
    scaled.normalize(1.0);

    let mut writer = hound::WavWriter::create(path, spec)?;
    for y in &scaled.ys {
        writer.write_sample((y * i16::MAX as f64) as i16)?;
    }
    writer.finalize()?;
    info!(path = %path.display(), samples = scaled.len(), "wrote wav");

    Ok(())
}
