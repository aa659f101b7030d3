use std::path::PathBuf;

use clap::{Arg, ArgAction, ArgGroup, Command, command, value_parser};

use super::LogLevel;
use crate::{derivation::Aligner, launcher::RunMode};

pub(super) fn cli_model() -> Command {
    command!()
        .about("Prepare a variant calling workflow: configuration file and launcher script")
        .next_help_heading("Pipeline Specific")
        .arg(
            Arg::new("reference")
                .long("reference-file")
                .value_parser(value_parser!(PathBuf))
                .value_name("FILE")
                .help("The input reference to map reads onto"),
        )
        .arg(
            Arg::new("annotation")
                .long("annotation-file")
                .value_parser(value_parser!(PathBuf))
                .value_name("FILE")
                .help("Annotation for snpEff (.gbk, .gff or .gff3). Optional but highly recommended"),
        )
        .arg(
            Arg::new("aligner")
                .long("aligner-choice")
                .value_parser(value_parser!(Aligner))
                .value_name("ALIGNER")
                .default_value("bwa")
                .help("The aligner"),
        )
        .arg(
            Arg::new("nanopore")
                .action(ArgAction::SetTrue)
                .long("nanopore")
                .help("Use minimap2 with -x map-ont (overrides --aligner-choice)"),
        )
        .arg(
            Arg::new("pacbio")
                .action(ArgAction::SetTrue)
                .long("pacbio")
                .help("Use minimap2 with -x map-pb (overrides --aligner-choice)"),
        )
        .group(
            ArgGroup::new("long_read")
                .args(["nanopore", "pacbio"])
                .multiple(false),
        )
        .arg(
            Arg::new("do_coverage")
                .action(ArgAction::SetTrue)
                .long("do-coverage")
                .help("Perform the coverage analysis using sequana_coverage"),
        )
        .arg(
            Arg::new("circular")
                .action(ArgAction::SetTrue)
                .short('o')
                .long("circular")
                .help("Recommended for bacteria genomes and circularised genomes"),
        )
        .arg(
            Arg::new("do_joint_calling")
                .action(ArgAction::SetTrue)
                .long("do-joint-calling")
                .help("Do the joint calling analysis"),
        )
        .arg(
            Arg::new("ploidy")
                .long("freebayes-ploidy")
                .value_parser(value_parser!(u32).range(1..))
                .value_name("INT")
                .default_value("1")
                .help("Ploidy used by freebayes. For populations, you may set it to 10"),
        )
        .next_help_heading("Input")
        .arg(
            Arg::new("input_directory")
                .long("input-directory")
                .value_parser(value_parser!(PathBuf))
                .value_name("PATH")
                .default_value(".")
                .help("Directory containing the read files"),
        )
        .arg(
            Arg::new("input_pattern")
                .long("input-pattern")
                .value_parser(value_parser!(String))
                .value_name("GLOB")
                .default_value("*fastq.gz")
                .help("Pattern selecting the read files"),
        )
        .arg(
            Arg::new("input_readtag")
                .long("input-readtag")
                .value_parser(value_parser!(String))
                .value_name("REGEX")
                .default_value("_R[12]_")
                .help("Tag identifying the two reads of a pair"),
        )
        .arg(
            Arg::new("exclude_pattern")
                .long("exclude-pattern")
                .value_parser(value_parser!(String))
                .value_name("STRING")
                .help("Exclude read files containing this string"),
        )
        .next_help_heading("Workflow")
        .arg(
            Arg::new("working_directory")
                .long("working-directory")
                .short('w')
                .value_parser(value_parser!(PathBuf))
                .value_name("PATH")
                .default_value("variant_calling")
                .help("Where to save the configuration and launcher"),
        )
        .arg(
            Arg::new("force")
                .action(ArgAction::SetTrue)
                .long("force")
                .help("Update the working directory if it already exists"),
        )
        .arg(
            Arg::new("snakefile")
                .long("snakefile")
                .value_parser(value_parser!(PathBuf))
                .value_name("FILE")
                .help("Workflow rules to copy into the working directory"),
        )
        .arg(
            Arg::new("run_mode")
                .long("run-mode")
                .value_parser(value_parser!(RunMode))
                .value_name("MODE")
                .help("Execution backend [default: slurm if sbatch is found, otherwise local]"),
        )
        .arg(
            Arg::new("jobs")
                .long("jobs")
                .short('j')
                .value_parser(value_parser!(u64).range(1..))
                .value_name("INT")
                .default_value("40")
                .help("Maximum number of concurrent jobs"),
        )
        .arg(
            Arg::new("use_apptainer")
                .action(ArgAction::SetTrue)
                .long("use-apptainer")
                .help("Run the workflow tools inside apptainer containers"),
        )
        .arg(
            Arg::new("apptainer_prefix")
                .long("apptainer-prefix")
                .value_parser(value_parser!(PathBuf))
                .value_name("PATH")
                .requires("use_apptainer")
                .help("Directory where apptainer images are stored"),
        )
        .arg(
            Arg::new("apptainer_args")
                .long("apptainer-args")
                .value_parser(value_parser!(String))
                .value_name("STRING")
                .allow_hyphen_values(true)
                .requires("use_apptainer")
                .help("Extra arguments passed to apptainer"),
        )
        .next_help_heading("Slurm")
        .arg(
            Arg::new("slurm_queue")
                .long("slurm-queue")
                .value_parser(value_parser!(String))
                .value_name("STRING")
                .default_value("common")
                .help("Slurm queue (qos)"),
        )
        .arg(
            Arg::new("slurm_memory")
                .long("slurm-memory")
                .value_parser(value_parser!(String))
                .value_name("STRING")
                .default_value("4G")
                .help("Memory per slurm job"),
        )
        .arg(
            Arg::new("slurm_cores_per_job")
                .long("slurm-cores-per-job")
                .value_parser(value_parser!(u64).range(1..))
                .value_name("INT")
                .default_value("4")
                .help("Cores per slurm job"),
        )
        .next_help_heading("Misc")
        .arg(
            Arg::new("timestamp")
                .short('X')
                .long("timestamp")
                .value_parser(value_parser!(stderrlog::Timestamp))
                .value_name("GRANULARITY")
                .default_value("none")
                .help("Prepend log entries with a timestamp"),
        )
        .arg(
            Arg::new("loglevel")
                .short('l')
                .long("loglevel")
                .value_name("LOGLEVEL")
                .value_parser(value_parser!(LogLevel))
                .ignore_case(true)
                .default_value("info")
                .help("Set log level"),
        )
        .arg(
            Arg::new("quiet")
                .action(ArgAction::SetTrue)
                .long("quiet")
                .conflicts_with("loglevel")
                .help("Silence all output"),
        )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn model_is_consistent() {
        cli_model().debug_assert();
    }

    #[test]
    fn long_read_flags_are_exclusive() {
        let r = cli_model().try_get_matches_from([
            "vc",
            "--reference-file",
            "ref.fa",
            "--nanopore",
            "--pacbio",
        ]);
        assert!(r.is_err());
    }

    #[test]
    fn ploidy_must_be_positive() {
        let r = cli_model().try_get_matches_from([
            "vc",
            "--reference-file",
            "ref.fa",
            "--freebayes-ploidy",
            "0",
        ]);
        assert!(r.is_err());
    }
}
