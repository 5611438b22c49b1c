//! Voss generator with a fixed, octave-like update schedule.

use rand::Rng;
use tracing::debug;

use crate::error::{invalid, Result};
use crate::table::SourceTable;

/// Deterministic-schedule Voss pink noise.
///
/// The table is laid out with `ncols` time steps and `nrows` sources, so the
/// output has `ncols` samples. Source `d - 1` (for `d` in `2..=nrows`) takes a
/// fresh value whenever the step index is a multiple of `d`. Source 0 is
/// seeded at every step and is never rescheduled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OctaveVoss {
    nrows: usize,
    ncols: usize,
}

impl OctaveVoss {
    pub fn new(nrows: usize, ncols: usize) -> Result<Self> {
        if nrows < 2 {
            return Err(invalid(format!(
                "octave generator needs at least 2 sources, got nrows = {nrows}"
            )));
        }
        if ncols < 1 {
            return Err(invalid("octave generator needs ncols >= 1"));
        }
        Ok(Self { nrows, ncols })
    }

    pub fn nrows(&self) -> usize {
        self.nrows
    }

    /// Number of samples [`generate`](Self::generate) returns.
    pub fn output_len(&self) -> usize {
        self.ncols
    }

    pub fn generate<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<Vec<f64>> {
        let steps = self.ncols;
        let sources = self.nrows;
        let mut table = SourceTable::new(steps, sources);

        let first_source: Vec<f64> = (0..steps).map(|_| rng.gen()).collect();
        table.seed_column(0, &first_source);
        let first_step: Vec<f64> = (0..sources).map(|_| rng.gen()).collect();
        table.seed_row(0, &first_step);

        let mut updates = 0usize;
        for counter in 1..steps {
            for divisor in 2..=sources {
                if counter % divisor == 0 {
                    table.set(counter, divisor - 1, rng.gen());
                    updates += 1;
                }
            }
        }
        debug!(steps, sources, updates, "octave table scheduled");

        Ok(table.forward_fill()?.row_sums())
    }
}

#[cfg(test)]
mod tests {
    use rand::{rngs::StdRng, SeedableRng};

    use super::*;
    use crate::error::PinkError;

    #[test]
    fn output_length_follows_ncols() {
        let mut rng = StdRng::seed_from_u64(7);
        for (nrows, ncols) in [(2, 1), (10, 5), (3, 100), (16, 257)] {
            let generator = OctaveVoss::new(nrows, ncols).unwrap();
            let ys = generator.generate(&mut rng).unwrap();
            assert_eq!(generator.output_len(), ncols);
            assert_eq!(ys.len(), ncols);
            assert!(ys.iter().all(|y| y.is_finite()));
        }
    }

    #[test]
    fn samples_are_bounded_by_source_count() {
        let mut rng = StdRng::seed_from_u64(11);
        let generator = OctaveVoss::new(10, 2048).unwrap();
        let ys = generator.generate(&mut rng).unwrap();
        assert!(ys.iter().all(|&y| (0.0..generator.nrows() as f64).contains(&y)));
    }

    #[test]
    fn same_seed_same_output() {
        let generator = OctaveVoss::new(10, 500).unwrap();
        let a = generator.generate(&mut StdRng::seed_from_u64(42)).unwrap();
        let b = generator.generate(&mut StdRng::seed_from_u64(42)).unwrap();
        let c = generator.generate(&mut StdRng::seed_from_u64(43)).unwrap();
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn first_sample_is_sum_of_first_step_seeds() {
        let (nrows, ncols) = (10, 5);
        let ys = OctaveVoss::new(nrows, ncols)
            .unwrap()
            .generate(&mut StdRng::seed_from_u64(1234))
            .unwrap();

        let mut rng = StdRng::seed_from_u64(1234);
        for _ in 0..ncols {
            let _: f64 = rng.gen();
        }
        let first_step: Vec<f64> = (0..nrows).map(|_| rng.gen()).collect();

        assert_eq!(ys.len(), 5);
        assert_eq!(ys[0], first_step.iter().sum::<f64>());
    }

    #[test]
    fn schedule_refreshes_sources_at_multiples() {
        // nrows = 3: source 1 refreshes on even steps, source 2 on multiples of 3.
        let ys = OctaveVoss::new(3, 7)
            .unwrap()
            .generate(&mut StdRng::seed_from_u64(5))
            .unwrap();

        let mut rng = StdRng::seed_from_u64(5);
        let first_source: Vec<f64> = (0..7).map(|_| rng.gen()).collect();
        let first_step: Vec<f64> = (0..3).map(|_| rng.gen()).collect();
        let s1_at2: f64 = rng.gen();
        let s2_at3: f64 = rng.gen();
        let s1_at4: f64 = rng.gen();
        let s1_at6: f64 = rng.gen();
        let s2_at6: f64 = rng.gen();

        let s1 = [first_step[1], first_step[1], s1_at2, s1_at2, s1_at4, s1_at4, s1_at6];
        let s2 = [first_step[2], first_step[2], first_step[2], s2_at3, s2_at3, s2_at3, s2_at6];
        for step in 0..7 {
            let s0 = if step == 0 { first_step[0] } else { first_source[step] };
            assert_eq!(ys[step], s0 + s1[step] + s2[step], "step {step}");
        }
    }

    #[test]
    fn rejects_degenerate_sizes() {
        assert!(matches!(
            OctaveVoss::new(1, 10),
            Err(PinkError::InvalidArgument(_))
        ));
        assert!(matches!(
            OctaveVoss::new(10, 0),
            Err(PinkError::InvalidArgument(_))
        ));
    }
}
