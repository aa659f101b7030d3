use std::path::Path;

use serde::{Serialize, Serializer};

use crate::{
    derivation::{Aligner, IndexAlgorithm, LongReadMode, RunConfiguration},
    input::InputOptions,
};

// Layout of the configuration file read by the workflow rules

#[derive(Serialize)]
struct General<'a> {
    input_directory: &'a Path,
    input_pattern: &'a str,
    input_readtag: &'a str,
    exclude_pattern: &'a str,
    reference_file: &'a Path,
    #[serde(serialize_with = "path_or_empty")]
    annotation_file: Option<&'a Path>,
    aligner_choice: Aligner,
    long_read_mode: LongReadMode,
}

#[derive(Serialize)]
struct BwaMem {
    index_algorithm: IndexAlgorithm,
}

#[derive(Serialize)]
struct Minimap2 {
    options: &'static str,
}

#[derive(Serialize)]
struct Coverage<'a> {
    #[serde(rename = "do")]
    run: bool,
    circular: bool,
    #[serde(serialize_with = "path_or_empty")]
    genbank_file: Option<&'a Path>,
}

#[derive(Serialize)]
struct Freebayes {
    ploidy: u32,
}

#[derive(Serialize)]
struct Toggle {
    #[serde(rename = "do")]
    run: bool,
}

#[derive(Serialize)]
pub struct ConfigFile<'a> {
    general: General<'a>,
    bwa_mem: BwaMem,
    minimap2: Minimap2,
    sequana_coverage: Coverage<'a>,
    freebayes: Freebayes,
    joint_freebayes: Toggle,
    snpeff: Toggle,
}

// Absent paths are written as an empty string
fn path_or_empty<S: Serializer>(p: &Option<&Path>, serializer: S) -> Result<S::Ok, S::Error> {
    match p {
        Some(p) => p.serialize(serializer),
        None => serializer.serialize_str(""),
    }
}

impl<'a> ConfigFile<'a> {
    /// `input` is expected to already hold an absolute input directory
    pub fn new(run: &'a RunConfiguration, input: &'a InputOptions) -> Self {
        Self {
            general: General {
                input_directory: &input.directory,
                input_pattern: &input.pattern,
                input_readtag: &input.readtag,
                exclude_pattern: input.exclude_pattern.as_deref().unwrap_or_default(),
                reference_file: run.reference_path(),
                annotation_file: run.annotation_path(),
                aligner_choice: run.aligner(),
                long_read_mode: run.long_read_mode(),
            },
            bwa_mem: BwaMem {
                index_algorithm: run.bwa_index_algorithm(),
            },
            minimap2: Minimap2 {
                options: run.aligner_options().unwrap_or_default(),
            },
            sequana_coverage: Coverage {
                run: run.do_coverage(),
                circular: run.circular(),
                genbank_file: run.genbank_path(),
            },
            freebayes: Freebayes {
                ploidy: run.ploidy(),
            },
            joint_freebayes: Toggle {
                run: run.do_joint_calling(),
            },
            snpeff: Toggle {
                run: run.annotation_enabled(),
            },
        }
    }
}
