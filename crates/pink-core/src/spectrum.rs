use rustfft::{num_complex::Complex, FftPlanner};

use crate::error::{invalid, Result};

pub const DEFAULT_FRAMERATE: f64 = 11_025.0;

/// A sampled signal.
#[derive(Debug, Clone, PartialEq)]
pub struct Wave {
    pub ys: Vec<f64>,
    pub framerate: f64,
}

impl Wave {
    pub fn new(ys: Vec<f64>, framerate: f64) -> Result<Self> {
        if !(framerate.is_finite() && framerate > 0.0) {
            return Err(invalid(format!("framerate must be positive, got {framerate}")));
        }
        Ok(Self { ys, framerate })
    }

    pub fn with_default_rate(ys: Vec<f64>) -> Self {
        Self {
            ys,
            framerate: DEFAULT_FRAMERATE,
        }
    }

    pub fn len(&self) -> usize {
        self.ys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ys.is_empty()
    }

    /// Removes the mean.
    pub fn unbias(&mut self) {
        if self.ys.is_empty() {
            return;
        }
        let mean = self.ys.iter().sum::<f64>() / self.ys.len() as f64;
        self.ys.iter_mut().for_each(|y| *y -= mean);
    }

    /// Scales so the largest magnitude equals `amp`. Silent waves are left alone.
    pub fn normalize(&mut self, amp: f64) {
        let peak = self.ys.iter().fold(0.0f64, |m, y| m.max(y.abs()));
        if peak > 0.0 {
            let gain = amp / peak;
            self.ys.iter_mut().for_each(|y| *y *= gain);
        }
    }

    /// Real FFT of the samples, bins `0..=n/2`.
    pub fn make_spectrum(&self) -> Spectrum {
        let n = self.ys.len();
        if n == 0 {
            return Spectrum {
                hs: Vec::new(),
                fs: Vec::new(),
            };
        }

        let mut buffer: Vec<Complex<f64>> =
            self.ys.iter().map(|&y| Complex::new(y, 0.0)).collect();
        let mut planner = FftPlanner::new();
        let fft = planner.plan_fft_forward(n);
        fft.process(&mut buffer);

        let bins = n / 2 + 1;
        buffer.truncate(bins);
        let fs = (0..bins)
            .map(|k| k as f64 * self.framerate / n as f64)
            .collect();

        Spectrum { hs: buffer, fs }
    }
}

/// Frequency-domain view of a [`Wave`].
#[derive(Debug, Clone)]
pub struct Spectrum {
    hs: Vec<Complex<f64>>,
    fs: Vec<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SlopeFit {
    pub slope: f64,
    pub intercept: f64,
}

impl Spectrum {
    pub fn len(&self) -> usize {
        self.hs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hs.is_empty()
    }

    pub fn freqs(&self) -> &[f64] {
        &self.fs
    }

    pub fn power(&self) -> Vec<f64> {
        self.hs.iter().map(|h| h.norm_sqr()).collect()
    }

    /// `(frequency, power)` pairs usable on log axes.
    pub fn loglog_points(&self) -> Vec<(f64, f64)> {
        self.fs
            .iter()
            .copied()
            .zip(self.power())
            .filter(|&(f, p)| f > 0.0 && p > 0.0)
            .collect()
    }

    /// Least-squares line through `(ln f, ln power)`.
    pub fn estimate_slope(&self) -> Result<SlopeFit> {
        let points: Vec<(f64, f64)> = self
            .loglog_points()
            .into_iter()
            .map(|(f, p)| (f.ln(), p.ln()))
            .collect();
        if points.len() < 2 {
            return Err(invalid(format!(
                "slope needs at least two non-zero bins, got {}",
                points.len()
            )));
        }

        let n = points.len() as f64;
        let mean_x = points.iter().map(|p| p.0).sum::<f64>() / n;
        let mean_y = points.iter().map(|p| p.1).sum::<f64>() / n;
        let (sxy, sxx) = points.iter().fold((0.0, 0.0), |(sxy, sxx), &(x, y)| {
            let dx = x - mean_x;
            (sxy + dx * (y - mean_y), sxx + dx * dx)
        });

        let slope = sxy / sxx;
        Ok(SlopeFit {
            slope,
            intercept: mean_y - slope * mean_x,
        })
    }
}

#[cfg(test)]
mod tests {
    use rand::{rngs::StdRng, Rng, SeedableRng};

    use super::*;
    use crate::stochastic::StochasticVoss;

    fn white(n: usize, rng: &mut StdRng) -> Vec<f64> {
        (0..n).map(|_| rng.gen_range(-1.0..1.0)).collect()
    }

    #[test]
    fn bins_cover_zero_to_nyquist() {
        let wave = Wave::new(vec![0.0; 8], 8.0).unwrap();
        let spectrum = wave.make_spectrum();
        assert_eq!(spectrum.len(), 5);
        assert_eq!(spectrum.freqs(), &[0.0, 1.0, 2.0, 3.0, 4.0]);

        let odd = Wave::with_default_rate(vec![0.0; 11205]).make_spectrum();
        assert_eq!(odd.len(), 5603);
    }

    #[test]
    fn pure_tone_lands_in_one_bin() {
        let n = 64;
        let ys = (0..n)
            .map(|i| (2.0 * std::f64::consts::PI * 4.0 * i as f64 / n as f64).cos())
            .collect();
        let power = Wave::new(ys, n as f64).unwrap().make_spectrum().power();

        let peak = power
            .iter()
            .enumerate()
            .max_by(|a, b| a.1.total_cmp(b.1))
            .map(|(i, _)| i);
        assert_eq!(peak, Some(4));
        assert!((power[4] - (n as f64 / 2.0).powi(2)).abs() < 1e-6);
        assert!(power[3] < 1e-12);
    }

    #[test]
    fn unbias_and_normalize() {
        let mut wave = Wave::with_default_rate(vec![1.0, 3.0, 5.0]);
        wave.unbias();
        assert_eq!(wave.ys, vec![-2.0, 0.0, 2.0]);
        wave.normalize(0.5);
        assert_eq!(wave.ys, vec![-0.5, 0.0, 0.5]);
    }

    #[test]
    fn slope_orders_white_pink_brown() {
        let mut rng = StdRng::seed_from_u64(2024);
        let n = 16_384;

        let white_ys = white(n, &mut rng);
        let brown_ys: Vec<f64> = white_ys
            .iter()
            .scan(0.0, |acc, y| {
                *acc += y;
                Some(*acc)
            })
            .collect();
        let pink_ys = StochasticVoss::with_rows(n)
            .unwrap()
            .generate(&mut rng)
            .unwrap();

        let slope = |ys: Vec<f64>| {
            let mut wave = Wave::with_default_rate(ys);
            wave.unbias();
            wave.make_spectrum().estimate_slope().unwrap().slope
        };
        let white_slope = slope(white_ys);
        let pink_slope = slope(pink_ys);
        let brown_slope = slope(brown_ys);

        assert!(white_slope.abs() < 0.2, "white slope {white_slope}");
        assert!(
            (-1.3..-0.7).contains(&pink_slope),
            "pink slope {pink_slope}"
        );
        assert!(brown_slope < pink_slope, "brown slope {brown_slope}");
    }

    #[test]
    fn slope_needs_two_bins() {
        let spectrum = Wave::with_default_rate(vec![1.0, -1.0]).make_spectrum();
        assert!(spectrum.estimate_slope().is_err());
    }

    #[test]
    fn rejects_bad_framerate() {
        assert!(Wave::new(vec![0.0], 0.0).is_err());
        assert!(Wave::new(vec![0.0], f64::NAN).is_err());
    }
}
