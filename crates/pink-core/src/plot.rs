use std::{fmt::Display, io, ops::Range, path::Path, sync::OnceLock};

use plotters::{
    prelude::*,
    style::{register_font, FontStyle},
};
use tracing::{info, warn};

use crate::error::{PinkError, Result};
use crate::spectrum::Spectrum;

const PLOT_SIZE: (u32, u32) = (1024, 768);
const FONT_FAMILY: &str = "sans-serif";
const FONT_BYTES: &[u8] = include_bytes!("../assets/DejaVuSans.ttf");

fn plot_err(err: impl Display) -> PinkError {
    PinkError::Plot(err.to_string())
}

/// Registers the embedded font with plotters once per process.
fn ensure_font() -> Result<()> {
    static REGISTERED: OnceLock<Result<(), String>> = OnceLock::new();
    REGISTERED
        .get_or_init(|| {
            register_font(FONT_FAMILY, FontStyle::Normal, FONT_BYTES)
                .map_err(|_| "embedded font rejected".to_string())
        })
        .clone()
        .map_err(PinkError::Plot)
}

/// Smallest range covering `values`, widened a decade each way when it
/// collapses to a point. Empty input falls back to one decade.
fn log_range(values: impl Iterator<Item = f64>) -> Range<f64> {
    let (lo, hi) = values.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
        (lo.min(v), hi.max(v))
    });
    if !lo.is_finite() || !hi.is_finite() {
        1.0..10.0
    } else if hi > lo {
        lo..hi
    } else {
        lo / 10.0..hi * 10.0
    }
}

/// Renders power against frequency on log-log axes and writes it as a PNG.
///
/// Spectra with fewer than two plottable bins still produce a chart, just
/// with an empty or single-point line.
pub fn plot_power(spectrum: &Spectrum, path: &Path, title: &str) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        if !parent.is_dir() {
            return Err(PinkError::Io(io::Error::new(
                io::ErrorKind::NotFound,
                format!("output directory {} does not exist", parent.display()),
            )));
        }
    }
    ensure_font()?;

    let points = spectrum.loglog_points();
    if points.len() < 2 {
        warn!(bins = points.len(), title, "spectrum too short for a line");
    }
    let x_range = log_range(points.iter().map(|p| p.0));
    let y_range = log_range(points.iter().map(|p| p.1));

    let root = BitMapBackend::new(path, PLOT_SIZE).into_drawing_area();
    root.fill(&WHITE).map_err(plot_err)?;

    let mut chart = ChartBuilder::on(&root)
        .caption(title, (FONT_FAMILY, 28))
        .margin(20)
        .x_label_area_size(50)
        .y_label_area_size(80)
        .build_cartesian_2d(x_range.log_scale(), y_range.log_scale())
        .map_err(plot_err)?;

    chart
        .configure_mesh()
        .x_desc("Frequency (Hz)")
        .y_desc("Power")
        .label_style((FONT_FAMILY, 14))
        .axis_desc_style((FONT_FAMILY, 18))
        .draw()
        .map_err(plot_err)?;

    chart
        .draw_series(LineSeries::new(points, &BLUE))
        .map_err(plot_err)?;

    root.present().map_err(plot_err)?;
    info!(path = %path.display(), title, "wrote power spectrum");

    Ok(())
}
