use std::{env, path::Path, process};

use chrono::prelude::*;
use indexmap::IndexMap;
use sysinfo::System;
use users::{get_current_gid, get_current_uid, get_group_by_gid, get_user_by_uid};

use crate::{input::InputFiles, launcher::ExecOptions};

pub type Metadata = IndexMap<&'static str, String>;

/// Who generated the working directory, from where and when
pub fn collect_starting_metadata() -> Metadata {
    let mut md = Metadata::new();
    md.insert("program", env!("CARGO_PKG_NAME").to_owned());
    md.insert("version", env!("CARGO_PKG_VERSION").to_owned());

    let command_line = env::args_os()
        .map(|a| a.to_string_lossy().into_owned())
        .collect::<Vec<_>>()
        .join(" ");
    md.insert("command_line", command_line);
    match env::current_dir() {
        Ok(d) => {
            md.insert("cwd", d.display().to_string());
        }
        Err(e) => warn!("Could not get current directory: {}", e),
    }
    md.insert("pid", format!("{}", process::id()));

    if let Some(s) = System::host_name() {
        md.insert("node_name", s);
    }
    let mut sys = System::new();
    sys.refresh_memory();
    md.insert("total_memory", format!("{} K", sys.total_memory() / 1024));
    md.insert("physical_cores", format!("{}", num_cpus::get_physical()));

    let uid = get_current_uid();
    let gid = get_current_gid();
    if let (Some(user), Some(group)) = (get_user_by_uid(uid), get_group_by_gid(gid)) {
        md.insert(
            "user_group",
            format!(
                "{}:{}",
                user.name().to_string_lossy(),
                group.name().to_string_lossy()
            ),
        );
    }

    md.insert("generated", Local::now().to_rfc3339());
    md
}

/// Record how the workflow will be run and what it will read
pub fn add_run_info(md: &mut Metadata, wdir: &Path, exec: &ExecOptions, inputs: &InputFiles) {
    md.insert("working_directory", wdir.display().to_string());
    md.insert("run_mode", exec.run_mode.to_string());
    md.insert("jobs", format!("{}", exec.jobs));
    md.insert("apptainer", format!("{}", exec.use_apptainer));
    md.insert("n_input_files", format!("{}", inputs.files().len()));
    md.insert("n_samples", format!("{}", inputs.n_samples()));
    md.insert("paired", format!("{}", inputs.paired()));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starting_metadata_has_real_cwd() {
        let md = collect_starting_metadata();
        let cwd = env::current_dir().unwrap();
        assert_eq!(md.get("cwd"), Some(&cwd.display().to_string()));
        assert_eq!(md.get("pid"), Some(&process::id().to_string()));
        assert_eq!(md.get("program").map(|s| s.as_str()), Some("variant_calling_setup"));
    }
}
