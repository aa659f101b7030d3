use std::{env, fmt, fs, path::Path, path::PathBuf};

use anyhow::Context;

pub const LAUNCHER_NAME: &str = "variant_calling.sh";
pub const RULES_NAME: &str = "variant_calling.rules";
pub const CONFIG_NAME: &str = "config.json";

#[derive(Copy, Clone, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum RunMode {
    Local,
    Slurm,
}

impl RunMode {
    /// Slurm if sbatch can be found on the PATH
    pub fn detect() -> Self {
        if find_on_path("sbatch").is_some() {
            Self::Slurm
        } else {
            Self::Local
        }
    }
}

impl fmt::Display for RunMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Local => write!(f, "local"),
            Self::Slurm => write!(f, "slurm"),
        }
    }
}

/// Execution backend options
#[derive(Clone, Debug)]
pub struct ExecOptions {
    pub run_mode: RunMode,
    pub jobs: usize,
    pub use_apptainer: bool,
    pub apptainer_prefix: Option<PathBuf>,
    pub apptainer_args: Option<String>,
    pub slurm_queue: String,
    pub slurm_memory: String,
    pub slurm_cores_per_job: usize,
}

impl Default for ExecOptions {
    fn default() -> Self {
        Self {
            run_mode: RunMode::Local,
            jobs: 40,
            use_apptainer: false,
            apptainer_prefix: None,
            apptainer_args: None,
            slurm_queue: String::from("common"),
            slurm_memory: String::from("4G"),
            slurm_cores_per_job: 4,
        }
    }
}

fn find_on_path(prog: &str) -> Option<PathBuf> {
    let paths = env::var_os("PATH")?;
    env::split_paths(&paths)
        .map(|d| d.join(prog))
        .find(|p| p.is_file())
}

// Single quote for the shell
fn quote(s: &str) -> String {
    if !s.is_empty()
        && s
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || "-_./=:,+@%".contains(c))
    {
        s.to_owned()
    } else {
        format!("'{}'", s.replace('\'', r"'\''"))
    }
}

/// Text of the launcher script
pub fn launcher_script(opt: &ExecOptions) -> String {
    let mut cmd = vec![
        String::from("snakemake"),
        format!("-s {RULES_NAME}"),
        format!("--configfile {CONFIG_NAME}"),
        String::from("--printshellcmds"),
        String::from("--rerun-incomplete"),
        String::from("--keep-going"),
    ];

    match opt.run_mode {
        RunMode::Local => cmd.push(format!("--cores {}", opt.jobs)),
        RunMode::Slurm => {
            let sbatch = format!(
                "sbatch --mem={} -c {} --qos={} -o logs/slurm-%j.out",
                opt.slurm_memory, opt.slurm_cores_per_job, opt.slurm_queue
            );
            cmd.push(format!("--jobs {}", opt.jobs));
            cmd.push(format!("--cluster {}", quote(&sbatch)));
            cmd.push(String::from("--latency-wait 60"));
        }
    }

    if opt.use_apptainer {
        cmd.push(String::from("--use-apptainer"));
        if let Some(p) = opt.apptainer_prefix.as_deref() {
            cmd.push(format!(
                "--apptainer-prefix {}",
                quote(&p.to_string_lossy())
            ));
        }
        if let Some(a) = opt.apptainer_args.as_deref() {
            cmd.push(format!("--apptainer-args {}", quote(a)));
        }
    }

    format!(
        "#!/bin/bash\n# {} {} ({} mode)\n\ncd \"$(dirname \"$0\")\" || exit 1\n\n{}\n",
        env!("CARGO_PKG_NAME"),
        env!("CARGO_PKG_VERSION"),
        opt.run_mode,
        cmd.join(" \\\n    ")
    )
}

pub fn write_launcher(dir: &Path, opt: &ExecOptions) -> anyhow::Result<PathBuf> {
    let fname = dir.join(LAUNCHER_NAME);
    fs::write(&fname, launcher_script(opt))
        .with_context(|| format!("Could not write launcher script {}", fname.display()))?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(&fname, fs::Permissions::from_mode(0o755))
            .with_context(|| format!("Could not set permissions on {}", fname.display()))?;
    }
    Ok(fname)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn local_script() {
        let s = launcher_script(&ExecOptions::default());
        assert!(s.starts_with("#!/bin/bash\n"));
        assert!(s.contains("-s variant_calling.rules"));
        assert!(s.contains("--configfile config.json"));
        assert!(s.contains("--cores 40"));
        assert!(!s.contains("sbatch"));
        assert!(!s.contains("apptainer"));
    }

    #[test]
    fn slurm_script_with_apptainer() {
        let opt = ExecOptions {
            run_mode: RunMode::Slurm,
            jobs: 10,
            use_apptainer: true,
            apptainer_prefix: Some(PathBuf::from("/data/my images")),
            apptainer_args: Some(String::from("-B /home")),
            slurm_memory: String::from("8G"),
            ..Default::default()
        };
        let s = launcher_script(&opt);
        assert!(s.contains("--jobs 10"));
        assert!(s.contains("--cluster 'sbatch --mem=8G -c 4 --qos=common -o logs/slurm-%j.out'"));
        assert!(s.contains("--use-apptainer"));
        assert!(s.contains("--apptainer-prefix '/data/my images'"));
        assert!(s.contains("--apptainer-args '-B /home'"));
        assert!(!s.contains("--cores"));
    }

    #[test]
    fn quoting() {
        assert_eq!(quote("/data/img"), "/data/img");
        assert_eq!(quote(""), "''");
        assert_eq!(quote("it's"), r"'it'\''s'");
    }
}
