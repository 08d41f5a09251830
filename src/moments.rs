use compensated_summation::KahanBabuskaNeumaier;

/// Mean and sample standard deviation of a sample.
#[derive(Debug, Copy, Clone, PartialEq, Default)]
pub struct Moments {
    pub count: usize,
    pub mean: f64,
    /// Sample standard deviation (divided by `n - 1`), `0.0` for fewer than
    /// two values.
    pub std_dev: f64,
}

impl Moments {
    pub fn of(values: &[f64]) -> Moments {
        let count = values.len();
        if count == 0 {
            return Moments::default();
        }

        let mut total = KahanBabuskaNeumaier::<f64>::new();
        for &value in values {
            total += value;
        }
        let mean = total.total() / count as f64;

        if count < 2 {
            return Moments {
                count,
                mean,
                std_dev: 0.0,
            };
        }

        let mut squares = KahanBabuskaNeumaier::<f64>::new();
        for &value in values {
            squares += (value - mean) * (value - mean);
        }

        Moments {
            count,
            mean,
            std_dev: (squares.total() / (count - 1) as f64).sqrt(),
        }
    }

    /// Linear blend of two moments, giving `weight` to `other`.
    #[must_use]
    pub fn blend(self, other: Moments, weight: f64) -> Moments {
        Moments {
            count: self.count,
            mean: (1.0 - weight) * self.mean + weight * other.mean,
            std_dev: (1.0 - weight) * self.std_dev + weight * other.std_dev,
        }
    }

    /// Standard score of `value`, or `0.0` if the sample has no spread.
    pub fn z_score(&self, value: f64) -> f64 {
        if self.std_dev > 0.0 {
            (value - self.mean) / self.std_dev
        } else {
            0.0
        }
    }
}
