use std::path::Path;

use super::Config;
use crate::{derivation::PipelineInputs, input::InputOptions, launcher::ExecOptions};

impl Config {
    pub fn pipeline(&self) -> &PipelineInputs {
        &self.pipeline
    }

    pub fn input(&self) -> &InputOptions {
        &self.input
    }

    pub fn working_dir(&self) -> &Path {
        self.working_dir.as_ref()
    }

    pub fn force(&self) -> bool {
        self.force
    }

    pub fn snakefile(&self) -> Option<&Path> {
        self.snakefile.as_deref()
    }

    pub fn exec(&self) -> &ExecOptions {
        &self.exec
    }
}
