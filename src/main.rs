#[macro_use]
extern crate log;
#[macro_use]
extern crate anyhow;

mod cli;
mod config_file;
mod derivation;
mod error;
mod input;
mod launcher;
mod metadata;
mod process;
mod reference;

fn main() -> anyhow::Result<()> {
    let cfg = cli::handle_cli()?;
    let metadata = metadata::collect_starting_metadata();
    process::process(cfg, metadata)
}
