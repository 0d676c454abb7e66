pub mod dataset;
pub mod error;
pub mod export;
pub mod fetch;
pub mod frame;
pub mod inspect;
pub mod pipeline;
pub mod split;

pub use dataset::Dataset;
pub use error::{Error, Result};
pub use fetch::{DatasetSource, LocalCsv, UciRepository};
pub use frame::{Column, Frame};
pub use pipeline::{run, ExportConfig, ExportSummary};
pub use split::{train_test_split, TestSize, TrainTestSplit};

/// Compare two 1D arrays element-wise with `approx::assert_relative_eq!`.
/// `assert_relative_eq` must be in scope at the call site.
#[macro_export]
macro_rules! assert_rel_eq_arr1 {
    ($actual:expr, $expected:expr) => {
        assert_eq!($actual.shape(), $expected.shape());
        ndarray::Zip::from(&$actual)
            .and(&$expected)
            .for_each(|v, w| {
                assert_relative_eq!(v, w);
            });
    };
}
