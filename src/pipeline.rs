use std::path::PathBuf;

use crate::{
    error::Result,
    export::{write_records, OutputPaths},
    fetch::DatasetSource,
    frame::Frame,
    inspect::RangeReport,
    split::{train_test_split, TestSize, TrainTestSplit},
};

/// Settings of one export run.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportConfig {
    /// Id of the dataset in the repository. 53 is Iris.
    pub dataset_id: u32,
    pub test_size: TestSize,
    /// `None` splits without shuffling.
    pub seed: Option<u64>,
    pub output_dir: PathBuf,
    /// File name prefix of the four output files.
    pub prefix: String,
    pub preview_rows: usize,
    pub indent: usize,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            dataset_id: 53,
            test_size: TestSize::default(),
            seed: Some(42),
            output_dir: PathBuf::from("."),
            prefix: "iris".to_string(),
            preview_rows: 5,
            indent: 4,
        }
    }
}

/// What a run produced.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportSummary {
    pub dataset: String,
    pub n_train: usize,
    pub n_test: usize,
    pub paths: OutputPaths,
}

/// Fetch, inspect, split, preview and write a dataset.
pub fn run(config: &ExportConfig, source: &dyn DatasetSource) -> Result<ExportSummary> {
    println!("Fetching dataset {}...", config.dataset_id);
    let dataset = source.fetch(config.dataset_id)?;
    tracing::info!(
        "fetched `{}`: {} rows, {} features, {} targets",
        dataset.name,
        dataset.features.nrows(),
        dataset.features.ncols(),
        dataset.targets.ncols()
    );

    print!("{}", RangeReport::new(&dataset.features));

    let split = train_test_split(
        &dataset.features,
        &dataset.targets,
        config.test_size,
        config.seed,
    )?;
    tracing::info!(
        "split into {} training and {} testing rows",
        split.x_train.nrows(),
        split.x_test.nrows()
    );

    preview(&split, config.preview_rows);

    let paths = OutputPaths::new(&config.output_dir, &config.prefix);
    let outputs: [(&PathBuf, &Frame); 4] = [
        (&paths.features_train, &split.x_train),
        (&paths.targets_train, &split.y_train),
        (&paths.features_test, &split.x_test),
        (&paths.targets_test, &split.y_test),
    ];
    for (path, frame) in outputs {
        write_records(path, frame, config.indent)?;
        tracing::info!("wrote {}", path.display());
    }

    Ok(ExportSummary {
        dataset: dataset.name,
        n_train: split.x_train.nrows(),
        n_test: split.x_test.nrows(),
        paths,
    })
}

fn preview(split: &TrainTestSplit, rows: usize) {
    println!("Training data:");
    println!("{}", split.x_train.head(rows));
    println!("{}", split.y_train.head(rows));

    println!("Testing data:");
    println!("{}", split.x_test.head(rows));
    println!("{}", split.y_test.head(rows));
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::{
        dataset::Dataset,
        error::Error,
        frame::{Column, Frame},
    };
    use ndarray::Array;

    struct Fixed(Dataset);

    impl DatasetSource for Fixed {
        fn fetch(&self, _id: u32) -> Result<Dataset> {
            Ok(self.0.clone())
        }
    }

    struct Unreachable;

    impl DatasetSource for Unreachable {
        fn fetch(&self, id: u32) -> Result<Dataset> {
            Err(Error::Http(format!("cannot reach repository for {}", id)))
        }
    }

    fn dataset(n: usize) -> Dataset {
        let features = Frame::new(vec![(
            "x".to_string(),
            Column::Float(Array::linspace(0.0, 1.0, n)),
        )])
        .unwrap();
        let targets = Frame::new(vec![(
            "y".to_string(),
            Column::Integer(Array::from_iter(0..n as i64)),
        )])
        .unwrap();
        Dataset {
            id: 1,
            name: "toy".to_string(),
            features,
            targets,
            ids: None,
        }
    }

    #[test]
    fn default_config_exports_iris() {
        let config = ExportConfig::default();
        assert_eq!(53, config.dataset_id);
        assert_eq!(TestSize::Fraction(0.2), config.test_size);
        assert_eq!(Some(42), config.seed);
        assert_eq!(4, config.indent);
        assert_eq!(5, config.preview_rows);
    }

    #[test]
    fn run_reports_partition_sizes() {
        let dir = tempfile::tempdir().unwrap();
        let config = ExportConfig {
            output_dir: dir.path().to_path_buf(),
            prefix: "toy".to_string(),
            ..ExportConfig::default()
        };
        let summary = run(&config, &Fixed(dataset(10))).unwrap();
        assert_eq!("toy", summary.dataset);
        assert_eq!(8, summary.n_train);
        assert_eq!(2, summary.n_test);
        assert!(summary.paths.iter().all(|path| path.exists()));
    }

    #[test]
    fn fetch_failure_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let config = ExportConfig {
            output_dir: dir.path().to_path_buf(),
            ..ExportConfig::default()
        };
        assert!(matches!(run(&config, &Unreachable), Err(Error::Http(_))));
        assert_eq!(0, std::fs::read_dir(dir.path()).unwrap().count());
    }
}
