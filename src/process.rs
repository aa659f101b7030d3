use std::{
    fmt::Display,
    fs,
    path::{self, Path},
};

use anyhow::Context;
use indexmap::IndexMap;
use serde::{
    ser::{SerializeMap, Serializer},
    Serialize,
};

use crate::{
    cli::config::Config,
    config_file::ConfigFile,
    derivation::build_configuration,
    input::{find_input_files, InputOptions},
    launcher::{write_launcher, CONFIG_NAME, RULES_NAME},
    metadata::{add_run_info, Metadata},
};

const INFO_DIR: &str = ".setup";
const INFO_NAME: &str = "info.json";

fn serialize_im<S, K, V>(im: &IndexMap<K, V>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
    K: Display + Serialize,
    V: Display + Serialize,
{
    let l: usize = im.len();
    let mut map = serializer.serialize_map(Some(l))?;
    for (key, val) in im.iter() {
        map.serialize_entry(key, val)?;
    }
    map.end()
}

#[derive(Serialize)]
struct Info {
    #[serde(serialize_with = "serialize_im")]
    metadata: Metadata,
}

/// Derive the run configuration and set up the working directory.
///
/// Nothing is written until the configuration has been derived and the input files found.
pub fn process(cfg: Config, mut metadata: Metadata) -> anyhow::Result<()> {
    let run = build_configuration(cfg.pipeline())?;

    let input = InputOptions {
        directory: path::absolute(&cfg.input().directory).with_context(|| {
            format!(
                "Invalid input directory {}",
                cfg.input().directory.display()
            )
        })?,
        ..cfg.input().clone()
    };
    let input_files = find_input_files(&input)?;

    let wdir = cfg.working_dir();
    prepare_working_dir(wdir, cfg.force())?;

    // Configuration file
    let fname = wdir.join(CONFIG_NAME);
    let wrt = fs::File::create(&fname)
        .with_context(|| format!("Could not open output file {}", fname.display()))?;
    serde_json::to_writer_pretty(wrt, &ConfigFile::new(&run, &input))
        .with_context(|| format!("Could not write configuration file {}", fname.display()))?;
    debug!("Configuration written to {}", fname.display());

    if let Some(rules) = cfg.snakefile() {
        let dest = wdir.join(RULES_NAME);
        fs::copy(rules, &dest).with_context(|| {
            format!(
                "Could not copy workflow rules {} to {}",
                rules.display(),
                dest.display()
            )
        })?;
    } else if !wdir.join(RULES_NAME).exists() {
        warn!(
            "No workflow rules supplied: copy them to {} before launching",
            wdir.join(RULES_NAME).display()
        );
    }

    let launcher = write_launcher(wdir, cfg.exec())?;

    add_run_info(&mut metadata, wdir, cfg.exec(), &input_files);
    let fname = wdir.join(INFO_DIR).join(INFO_NAME);
    let wrt = fs::File::create(&fname)
        .with_context(|| format!("Could not open output file {}", fname.display()))?;
    serde_json::to_writer_pretty(wrt, &Info { metadata })
        .with_context(|| "Could not write out run information")?;

    info!(
        "Working directory {} ready: execute {} to start the workflow",
        wdir.display(),
        launcher.display()
    );
    Ok(())
}

fn prepare_working_dir(wdir: &Path, force: bool) -> anyhow::Result<()> {
    if wdir.exists() {
        if !force {
            return Err(anyhow!(
                "Working directory {} exists. Use --force to overwrite its configuration",
                wdir.display()
            ));
        }
        warn!("Working directory {} exists and will be updated", wdir.display());
    }
    for d in [wdir.to_owned(), wdir.join("logs"), wdir.join(INFO_DIR)] {
        fs::create_dir_all(&d)
            .with_context(|| format!("Could not create directory {}", d.display()))?;
    }
    Ok(())
}
