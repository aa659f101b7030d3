#![allow(dead_code)]

use std::{fs, io::Write, path::Path};

use assert_cmd::Command;
use tempfile::TempDir;

/// Directory with a small reference and a pair of read files
pub struct Fixture {
    pub dir: TempDir,
}

impl Fixture {
    pub fn new() -> Self {
        let dir = TempDir::new().unwrap();
        let reads = dir.path().join("reads");
        fs::create_dir(&reads).unwrap();
        for n in ["A_R1_.fastq.gz", "A_R2_.fastq.gz"] {
            fs::File::create(reads.join(n)).unwrap();
        }
        let mut f = fs::File::create(dir.path().join("ref.fa")).unwrap();
        writeln!(f, ">chr1").unwrap();
        for _ in 0..100 {
            writeln!(f, "{}", "ACGT".repeat(15)).unwrap();
        }
        Self { dir }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn work(&self) -> std::path::PathBuf {
        self.path().join("work")
    }

    /// Command with the reference, input directory, working directory and local run mode set
    pub fn command(&self) -> Command {
        self.command_with_mode("local")
    }

    pub fn command_with_mode(&self, mode: &str) -> Command {
        let mut cmd = Command::cargo_bin("variant_calling_setup").unwrap();
        cmd.arg("--reference-file")
            .arg(self.path().join("ref.fa"))
            .arg("--input-directory")
            .arg(self.path().join("reads"))
            .arg("--working-directory")
            .arg(self.work())
            .arg("--run-mode")
            .arg(mode)
            .arg("--quiet");
        cmd
    }

    pub fn config(&self) -> serde_json::Value {
        let s = fs::read_to_string(self.work().join("config.json")).unwrap();
        serde_json::from_str(&s).unwrap()
    }
}
