use std::path::{self, Path, PathBuf};

mod run_config;

pub use run_config::{Aligner, IndexAlgorithm, LongReadMode, RunConfiguration};

use run_config::last_extension;

use crate::{error::ConfigError, reference::reference_length};

/// Genome size from which bwa index has to switch to the bwtsw algorithm
pub const BWTSW_MIN_LENGTH: u64 = 2_000_000_000;

const ANNOTATION_EXTENSIONS: [&str; 3] = ["gbk", "gff", "gff3"];

const MINIMAP2_ONT: &str = "-x map-ont";
const MINIMAP2_PB: &str = "-x map-pb";

/// Raw pipeline options as collected from the command line
#[derive(Clone, Debug, Default)]
pub struct PipelineInputs {
    pub reference: Option<PathBuf>,
    pub annotation: Option<PathBuf>,
    pub aligner: Aligner,
    pub long_read_mode: LongReadMode,
    pub do_coverage: bool,
    pub circular: bool,
    pub do_joint_calling: bool,
    pub ploidy: u32,
}

/// Check the annotation file name. Returns true if annotation should be performed.
pub fn validate_annotation(path: Option<&Path>) -> Result<bool, ConfigError> {
    let Some(p) = path else {
        return Ok(false);
    };

    match last_extension(p) {
        Some(e) if ANNOTATION_EXTENSIONS.contains(&e) => Ok(true),
        _ => Err(ConfigError::InvalidAnnotationFormat(p.to_owned())),
    }
}

/// Long read modes always override the requested aligner
pub fn resolve_aligner(
    long_read_mode: LongReadMode,
    requested: Aligner,
) -> (Aligner, Option<&'static str>) {
    match long_read_mode {
        LongReadMode::Nanopore => (Aligner::Minimap2, Some(MINIMAP2_ONT)),
        LongReadMode::Pacbio => (Aligner::Minimap2, Some(MINIMAP2_PB)),
        LongReadMode::None => (requested, None),
    }
}

pub fn index_algorithm_for_length(n: u64) -> IndexAlgorithm {
    if n >= BWTSW_MIN_LENGTH {
        IndexAlgorithm::Bwtsw
    } else {
        IndexAlgorithm::Is
    }
}

pub fn derive_index_algorithm(reference: &Path) -> Result<IndexAlgorithm, ConfigError> {
    let n = reference_length(reference).map_err(|e| ConfigError::InvalidReferenceFormat {
        path: reference.to_owned(),
        reason: format!("{e:#}"),
    })?;
    let alg = index_algorithm_for_length(n);
    info!(
        "Reference {}: total length {} bp, bwa index algorithm {}",
        reference.display(),
        n,
        alg
    );
    Ok(alg)
}

/// Compose the final configuration from the raw inputs.
///
/// Checks are made in the order reference presence, annotation, reference contents
/// and the first failure is returned.
pub fn build_configuration(inputs: &PipelineInputs) -> Result<RunConfiguration, ConfigError> {
    let reference = inputs
        .reference
        .as_deref()
        .filter(|p| !p.as_os_str().is_empty())
        .ok_or(ConfigError::MissingRequiredInput("--reference-file"))?;
    let reference_path =
        path::absolute(reference).map_err(|e| ConfigError::InvalidReferenceFormat {
            path: reference.to_owned(),
            reason: e.to_string(),
        })?;

    let annotation_enabled = validate_annotation(inputs.annotation.as_deref())?;
    let annotation_path = match inputs.annotation.as_deref() {
        Some(p) => Some(
            path::absolute(p).map_err(|_| ConfigError::InvalidAnnotationFormat(p.to_owned()))?,
        ),
        None => None,
    };

    let (aligner, aligner_options) = resolve_aligner(inputs.long_read_mode, inputs.aligner);
    if aligner != inputs.aligner {
        warn!(
            "{} mode selected: aligner {} replaced by {}",
            inputs.long_read_mode, inputs.aligner, aligner
        );
    }

    let bwa_index_algorithm = derive_index_algorithm(&reference_path)?;

    Ok(RunConfiguration {
        reference_path,
        annotation_path,
        aligner,
        aligner_options,
        long_read_mode: inputs.long_read_mode,
        do_coverage: inputs.do_coverage,
        circular: inputs.circular,
        do_joint_calling: inputs.do_joint_calling,
        ploidy: inputs.ploidy,
        bwa_index_algorithm,
        annotation_enabled,
    })
}
