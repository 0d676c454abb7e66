use std::{fmt, str::FromStr};

use ndarray_rand::rand::{seq::index::sample, SeedableRng};
use rand_xoshiro::Xoshiro256PlusPlus;

use crate::{
    error::{Error, Result},
    frame::Frame,
};

/// How many rows go to the test partition.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TestSize {
    /// Fraction of all rows, rounded up.
    Fraction(f64),
    Count(usize),
}

impl TestSize {
    /// Number of test rows out of `n_rows`, checked so that neither partition is empty.
    pub fn resolve(&self, n_rows: usize) -> Result<usize> {
        let n_test = match *self {
            Self::Fraction(ratio) if 0.0 < ratio && ratio < 1.0 => {
                (ratio * n_rows as f64).ceil() as usize
            }
            Self::Count(count) => count,
            Self::Fraction(_) => 0,
        };
        if n_test == 0 || n_test >= n_rows {
            return Err(Error::InvalidTestSize {
                test_size: self.to_string(),
                n_rows,
            });
        }
        Ok(n_test)
    }
}

impl Default for TestSize {
    fn default() -> Self {
        Self::Fraction(0.2)
    }
}

impl fmt::Display for TestSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Fraction(ratio) => write!(f, "{}", ratio),
            Self::Count(count) => write!(f, "{}", count),
        }
    }
}

impl FromStr for TestSize {
    type Err = String;

    /// `"30"` is a row count, `"0.2"` a fraction.
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        if let Ok(count) = s.parse::<usize>() {
            return Ok(Self::Count(count));
        }
        match s.parse::<f64>() {
            Ok(ratio) if 0.0 < ratio && ratio < 1.0 => Ok(Self::Fraction(ratio)),
            _ => Err(format!(
                "`{}` is neither a row count nor a fraction in (0, 1)",
                s
            )),
        }
    }
}

/// Sampler produces the order in which rows are dealt out to partitions.
pub enum Sampler {
    Sequential(usize),
    Seeded(usize, Xoshiro256PlusPlus),
}

impl Sampler {
    /// `None` keeps rows in their original order.
    pub fn new(size: usize, seed: Option<u64>) -> Self {
        match seed {
            Some(seed) => Self::Seeded(size, Xoshiro256PlusPlus::seed_from_u64(seed)),
            None => Self::Sequential(size),
        }
    }

    pub fn sample(&mut self) -> Vec<usize> {
        match self {
            Self::Sequential(size) => (0..*size).collect(),
            Self::Seeded(size, rng) => sample(rng, *size, *size).into_vec(),
        }
    }
}

/// Split row positions `0..n_rows` into `(train, test)`.
///
/// With a seed, the first `n_test` positions of a seeded permutation are the test set and the
/// rest the train set, so the same seed always yields the same partitions. Without a seed the
/// last `n_test` rows are the test set.
pub fn split_indices(
    n_rows: usize,
    test_size: TestSize,
    seed: Option<u64>,
) -> Result<(Vec<usize>, Vec<usize>)> {
    let n_test = test_size.resolve(n_rows)?;
    let mut order = Sampler::new(n_rows, seed).sample();

    let (train, test) = if seed.is_some() {
        let train = order.split_off(n_test);
        (train, order)
    } else {
        let test = order.split_off(n_rows - n_test);
        (order, test)
    };

    tracing::debug!(
        "split {} rows: {} train, {} test",
        n_rows,
        train.len(),
        test.len()
    );
    Ok((train, test))
}

/// Train and test partitions of a features frame and its targets frame.
#[derive(Debug, Clone, PartialEq)]
pub struct TrainTestSplit {
    pub x_train: Frame,
    pub x_test: Frame,
    pub y_train: Frame,
    pub y_test: Frame,
}

/// Split `x` and `y` with one shared row assignment so every target stays next to its features.
pub fn train_test_split(
    x: &Frame,
    y: &Frame,
    test_size: TestSize,
    seed: Option<u64>,
) -> Result<TrainTestSplit> {
    if x.nrows() != y.nrows() {
        return Err(Error::RowCountMismatch {
            features: x.nrows(),
            targets: y.nrows(),
        });
    }

    let (train, test) = split_indices(x.nrows(), test_size, seed)?;
    Ok(TrainTestSplit {
        x_train: x.select(&train),
        x_test: x.select(&test),
        y_train: y.select(&train),
        y_test: y.select(&test),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::collections::HashSet;

    use crate::frame::Column;
    use ndarray::Array;

    fn frames(n: usize) -> (Frame, Frame) {
        let x = Frame::new(vec![(
            "x".to_string(),
            Column::Float(Array::linspace(0.0, (n - 1) as f64, n)),
        )])
        .unwrap();
        let y = Frame::new(vec![(
            "y".to_string(),
            Column::Text((0..n).map(|i| Some(format!("label-{}", i))).collect()),
        )])
        .unwrap();
        (x, y)
    }

    #[test]
    fn seeded_sampler_is_a_permutation() {
        let size = 10;
        let sequential = Sampler::new(size, None).sample();
        let mut random = Sampler::new(size, Some(42)).sample();
        assert_ne!(sequential, random);

        random.sort();
        assert_eq!(sequential, random);
    }

    #[test]
    fn test_size_for_150_rows() {
        let (train, test) = split_indices(150, TestSize::Fraction(0.2), Some(42)).unwrap();
        assert_eq!(120, train.len());
        assert_eq!(30, test.len());
    }

    #[test]
    fn fraction_is_rounded_up() {
        assert_eq!(3, TestSize::Fraction(0.25).resolve(10).unwrap());
        assert_eq!(7, TestSize::Count(7).resolve(10).unwrap());
    }

    #[test]
    fn partitions_are_disjoint_and_complete() {
        let (train, test) = split_indices(57, TestSize::Fraction(0.2), Some(7)).unwrap();
        let train = train.into_iter().collect::<HashSet<_>>();
        let test = test.into_iter().collect::<HashSet<_>>();
        assert!(train.is_disjoint(&test));

        let all = train.union(&test).copied().collect::<HashSet<_>>();
        assert_eq!((0..57).collect::<HashSet<_>>(), all);
    }

    #[test]
    fn same_seed_same_partitions() {
        let first = split_indices(150, TestSize::Fraction(0.2), Some(42)).unwrap();
        let second = split_indices(150, TestSize::Fraction(0.2), Some(42)).unwrap();
        assert_eq!(first, second);

        let other = split_indices(150, TestSize::Fraction(0.2), Some(43)).unwrap();
        assert_ne!(first, other);
    }

    #[test]
    fn unshuffled_test_set_is_the_tail() {
        let (train, test) = split_indices(5, TestSize::Count(2), None).unwrap();
        assert_eq!(vec![0, 1, 2], train);
        assert_eq!(vec![3, 4], test);
    }

    #[test]
    fn invalid_sizes_are_rejected() {
        assert!(split_indices(10, TestSize::Count(0), Some(42)).is_err());
        assert!(split_indices(10, TestSize::Count(10), Some(42)).is_err());
        assert!(split_indices(10, TestSize::Fraction(1.5), Some(42)).is_err());
        assert!(split_indices(0, TestSize::Fraction(0.2), Some(42)).is_err());
    }

    #[test]
    fn parse_test_size() {
        assert_eq!(Ok(TestSize::Count(30)), "30".parse());
        assert_eq!(Ok(TestSize::Fraction(0.2)), "0.2".parse());
        assert!("1.5".parse::<TestSize>().is_err());
        assert!("many".parse::<TestSize>().is_err());
    }

    #[test]
    fn targets_stay_aligned_with_features() {
        let (x, y) = frames(40);
        let split = train_test_split(&x, &y, TestSize::Fraction(0.2), Some(42)).unwrap();

        for (features, targets) in [(&split.x_train, &split.y_train), (&split.x_test, &split.y_test)]
        {
            assert_eq!(features.index(), targets.index());
            for (x_row, y_row) in features.records().iter().zip(targets.records()) {
                let source = x_row["x"].as_f64().unwrap() as usize;
                assert_eq!(format!("label-{}", source), y_row["y"]);
            }
        }
    }

    #[test]
    fn mismatched_row_counts_fail() {
        let (x, _) = frames(10);
        let (_, y) = frames(9);
        assert!(matches!(
            train_test_split(&x, &y, TestSize::default(), Some(42)),
            Err(Error::RowCountMismatch {
                features: 10,
                targets: 9
            })
        ));
    }
}
