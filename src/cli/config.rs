use std::path::PathBuf;

use crate::{derivation::PipelineInputs, input::InputOptions, launcher::ExecOptions};

mod getters;
mod make_config;

/// All inputs collected from the command line
pub struct Config {
    // Pipeline specific options
    pipeline: PipelineInputs,

    // Where to find the reads
    input: InputOptions,

    // Working directory options
    working_dir: PathBuf,
    force: bool,
    snakefile: Option<PathBuf>,

    // Execution backend
    exec: ExecOptions,
}
