use std::{fmt, path::Path, path::PathBuf};

use serde::Serialize;

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Aligner {
    #[default]
    Bwa,
    Minimap2,
}

impl fmt::Display for Aligner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bwa => write!(f, "bwa"),
            Self::Minimap2 => write!(f, "minimap2"),
        }
    }
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LongReadMode {
    #[default]
    None,
    Nanopore,
    Pacbio,
}

impl fmt::Display for LongReadMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::None => write!(f, "none"),
            Self::Nanopore => write!(f, "nanopore"),
            Self::Pacbio => write!(f, "pacbio"),
        }
    }
}

/// Construction strategy for the bwa index
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum IndexAlgorithm {
    Is,
    Bwtsw,
}

impl fmt::Display for IndexAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Is => write!(f, "is"),
            Self::Bwtsw => write!(f, "bwtsw"),
        }
    }
}

/// Fully resolved pipeline configuration. Only built by
/// [`build_configuration`](super::build_configuration) and never modified afterwards.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RunConfiguration {
    pub(super) reference_path: PathBuf,
    pub(super) annotation_path: Option<PathBuf>,
    pub(super) aligner: Aligner,
    // Extra minimap2 options (long read presets)
    pub(super) aligner_options: Option<&'static str>,
    pub(super) long_read_mode: LongReadMode,
    pub(super) do_coverage: bool,
    pub(super) circular: bool,
    pub(super) do_joint_calling: bool,
    pub(super) ploidy: u32,

    // Derived values
    pub(super) bwa_index_algorithm: IndexAlgorithm,
    pub(super) annotation_enabled: bool,
}

impl RunConfiguration {
    pub fn reference_path(&self) -> &Path {
        &self.reference_path
    }

    pub fn annotation_path(&self) -> Option<&Path> {
        self.annotation_path.as_deref()
    }

    pub fn aligner(&self) -> Aligner {
        self.aligner
    }

    pub fn aligner_options(&self) -> Option<&'static str> {
        self.aligner_options
    }

    pub fn long_read_mode(&self) -> LongReadMode {
        self.long_read_mode
    }

    pub fn do_coverage(&self) -> bool {
        self.do_coverage
    }

    pub fn circular(&self) -> bool {
        self.circular
    }

    pub fn do_joint_calling(&self) -> bool {
        self.do_joint_calling
    }

    pub fn ploidy(&self) -> u32 {
        self.ploidy
    }

    pub fn bwa_index_algorithm(&self) -> IndexAlgorithm {
        self.bwa_index_algorithm
    }

    pub fn annotation_enabled(&self) -> bool {
        self.annotation_enabled
    }

    /// Annotation path if it is a GenBank file (used for the coverage report)
    pub fn genbank_path(&self) -> Option<&Path> {
        self.annotation_path
            .as_deref()
            .filter(|p| last_extension(p) == Some("gbk"))
    }
}

/// Whatever follows the last '.' of the file name
pub(super) fn last_extension(p: &Path) -> Option<&str> {
    p.file_name()
        .and_then(|s| s.to_str())
        .and_then(|s| s.rsplit_once('.'))
        .map(|(_, e)| e)
}
