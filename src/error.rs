use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("missing required input: {0}")]
    MissingRequiredInput(&'static str),

    #[error("the annotation file must be in .gbk, .gff or .gff3 format. You provided {}", .0.display())]
    InvalidAnnotationFormat(PathBuf),

    #[error("invalid reference file {}: {reason}", path.display())]
    InvalidReferenceFormat { path: PathBuf, reason: String },
}
