mod dataset_source;

pub use dataset_source::{DatasetError, DatasetSource, FileDatasetSource, HttpDatasetSource};
