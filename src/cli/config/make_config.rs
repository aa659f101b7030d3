use std::path::PathBuf;

use clap::ArgMatches;

use super::Config;

use crate::{
    derivation::{Aligner, LongReadMode, PipelineInputs},
    input::InputOptions,
    launcher::{ExecOptions, RunMode},
};

impl Config {
    pub fn from_matches(m: &ArgMatches) -> anyhow::Result<Self> {
        let pipeline = pipeline_inputs(m);

        let input = InputOptions {
            directory: m
                .get_one::<PathBuf>("input_directory")
                .expect("Missing default input directory")
                .to_owned(),
            pattern: m
                .get_one::<String>("input_pattern")
                .expect("Missing default input pattern")
                .to_owned(),
            readtag: m
                .get_one::<String>("input_readtag")
                .expect("Missing default read tag")
                .to_owned(),
            exclude_pattern: m.get_one::<String>("exclude_pattern").map(|s| s.to_owned()),
        };

        let working_dir = m
            .get_one::<PathBuf>("working_directory")
            .expect("Missing default working directory")
            .to_owned();
        let force = m.get_flag("force");

        let snakefile = m.get_one::<PathBuf>("snakefile").map(|p| p.to_owned());
        if let Some(p) = snakefile.as_deref() {
            if !p.is_file() {
                return Err(anyhow!("Workflow rules file {} not found", p.display()));
            }
        }

        let run_mode = m.get_one::<RunMode>("run_mode").copied().unwrap_or_else(|| {
            let mode = RunMode::detect();
            debug!("Run mode not specified: using {}", mode);
            mode
        });

        let exec = ExecOptions {
            run_mode,
            jobs: *m.get_one::<u64>("jobs").unwrap() as usize,
            use_apptainer: m.get_flag("use_apptainer"),
            apptainer_prefix: m.get_one::<PathBuf>("apptainer_prefix").map(|p| p.to_owned()),
            apptainer_args: m.get_one::<String>("apptainer_args").map(|s| s.to_owned()),
            slurm_queue: m.get_one::<String>("slurm_queue").unwrap().to_owned(),
            slurm_memory: m.get_one::<String>("slurm_memory").unwrap().to_owned(),
            slurm_cores_per_job: *m.get_one::<u64>("slurm_cores_per_job").unwrap() as usize,
        };

        Ok(Self {
            pipeline,
            input,
            working_dir,
            force,
            snakefile,
            exec,
        })
    }
}

fn pipeline_inputs(m: &ArgMatches) -> PipelineInputs {
    let long_read_mode = if m.get_flag("nanopore") {
        LongReadMode::Nanopore
    } else if m.get_flag("pacbio") {
        LongReadMode::Pacbio
    } else {
        LongReadMode::None
    };

    PipelineInputs {
        reference: m.get_one::<PathBuf>("reference").map(|p| p.to_owned()),
        annotation: m.get_one::<PathBuf>("annotation").map(|p| p.to_owned()),
        aligner: m.get_one::<Aligner>("aligner").copied().unwrap_or_default(),
        long_read_mode,
        do_coverage: m.get_flag("do_coverage"),
        circular: m.get_flag("circular"),
        do_joint_calling: m.get_flag("do_joint_calling"),
        ploidy: *m.get_one::<u32>("ploidy").unwrap(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::cli_model::cli_model;

    fn config(args: &[&str]) -> Config {
        let m = cli_model()
            .try_get_matches_from(std::iter::once("vc").chain(args.iter().copied()))
            .unwrap();
        Config::from_matches(&m).unwrap()
    }

    #[test]
    fn defaults() {
        let cfg = config(&["--reference-file", "ref.fa", "--run-mode", "local"]);
        let p = cfg.pipeline();
        assert_eq!(p.reference.as_deref(), Some(std::path::Path::new("ref.fa")));
        assert!(p.annotation.is_none());
        assert_eq!(p.aligner, Aligner::Bwa);
        assert_eq!(p.long_read_mode, LongReadMode::None);
        assert_eq!(p.ploidy, 1);
        assert!(!p.do_coverage && !p.circular && !p.do_joint_calling);

        assert_eq!(cfg.input().pattern, "*fastq.gz");
        assert_eq!(cfg.input().readtag, "_R[12]_");
        assert_eq!(cfg.working_dir(), std::path::Path::new("variant_calling"));
        assert!(!cfg.force());
        assert_eq!(cfg.exec().run_mode, RunMode::Local);
        assert_eq!(cfg.exec().jobs, 40);
        assert_eq!(cfg.exec().slurm_cores_per_job, 4);
    }

    #[test]
    fn pipeline_flags() {
        let cfg = config(&[
            "--reference-file",
            "ref.fa",
            "--aligner-choice",
            "bwa",
            "--pacbio",
            "--do-coverage",
            "-o",
            "--do-joint-calling",
            "--freebayes-ploidy",
            "2",
            "--annotation-file",
            "ann.gff",
        ]);
        let p = cfg.pipeline();
        assert_eq!(p.long_read_mode, LongReadMode::Pacbio);
        assert_eq!(p.aligner, Aligner::Bwa);
        assert!(p.do_coverage && p.circular && p.do_joint_calling);
        assert_eq!(p.ploidy, 2);
        assert!(p.annotation.is_some());
    }

    #[test]
    fn missing_snakefile() {
        let m = cli_model()
            .try_get_matches_from(["vc", "--snakefile", "/no/such/rules.smk"])
            .unwrap();
        assert!(Config::from_matches(&m).is_err());
    }
}
