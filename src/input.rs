use std::{
    collections::HashSet,
    fs,
    path::{Path, PathBuf},
};

use anyhow::Context;
use regex::Regex;

/// Options describing where the sequencing reads are found
#[derive(Clone, Debug)]
pub struct InputOptions {
    pub directory: PathBuf,
    pub pattern: String,
    pub readtag: String,
    pub exclude_pattern: Option<String>,
}

impl Default for InputOptions {
    fn default() -> Self {
        Self {
            directory: PathBuf::from("."),
            pattern: String::from("*fastq.gz"),
            readtag: String::from("_R[12]_"),
            exclude_pattern: None,
        }
    }
}

#[derive(Debug)]
pub struct InputFiles {
    files: Vec<PathBuf>,
    n_samples: usize,
    paired: bool,
}

impl InputFiles {
    pub fn files(&self) -> &[PathBuf] {
        &self.files
    }

    pub fn n_samples(&self) -> usize {
        self.n_samples
    }

    pub fn paired(&self) -> bool {
        self.paired
    }
}

/// Convert a shell style glob (`*`, `?`, `[...]`, `[!...]`) into an anchored regex
pub fn glob_to_regex(pattern: &str) -> anyhow::Result<Regex> {
    let mut s = String::from("^");
    let mut in_class = false;
    let mut class_start = false;
    for c in pattern.chars() {
        let first_in_class = std::mem::take(&mut class_start);
        match c {
            '!' if first_in_class => s.push('^'),
            _ if in_class => {
                if c == ']' {
                    in_class = false
                }
                if c == '\\' || c == '[' {
                    s.push('\\')
                }
                s.push(c)
            }
            '*' => s.push_str("[^/]*"),
            '?' => s.push_str("[^/]"),
            '[' => {
                in_class = true;
                class_start = true;
                s.push('[')
            }
            _ => s.push_str(&regex::escape(c.encode_utf8(&mut [0; 4]))),
        }
    }
    if in_class {
        return Err(anyhow!("Unterminated character class in pattern {}", pattern));
    }
    s.push('$');
    Regex::new(&s).with_context(|| format!("Invalid input pattern {}", pattern))
}

/// Locate the input read files and group them into samples using the read tag
pub fn find_input_files(opt: &InputOptions) -> anyhow::Result<InputFiles> {
    let dir = opt.directory.as_path();
    let re_pattern = glob_to_regex(&opt.pattern)?;
    let re_tag = Regex::new(&opt.readtag)
        .with_context(|| format!("Invalid read tag {}", opt.readtag))?;

    debug!(
        "Looking for input files in {} matching {}",
        dir.display(),
        opt.pattern
    );
    let mut files: Vec<PathBuf> = fs::read_dir(dir)
        .with_context(|| format!("Could not read input directory {}", dir.display()))?
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|p| p.is_file() && select_file(p, &re_pattern, opt.exclude_pattern.as_deref()))
        .collect();

    if files.is_empty() {
        return Err(anyhow!(
            "No files found in {} with pattern {}",
            dir.display(),
            opt.pattern
        ));
    }
    files.sort();

    let mut samples = HashSet::new();
    let mut tagged = 0;
    for p in files.iter() {
        let name = file_name(p);
        if re_tag.is_match(name) {
            tagged += 1;
        }
        samples.insert(re_tag.replace(name, "_").into_owned());
    }
    let n_samples = samples.len();
    let paired = tagged == files.len() && files.len() == 2 * n_samples;

    info!(
        "Found {} input files ({} samples, {})",
        files.len(),
        n_samples,
        if paired { "paired" } else { "single end" }
    );
    Ok(InputFiles {
        files,
        n_samples,
        paired,
    })
}

fn file_name(p: &Path) -> &str {
    p.file_name().and_then(|s| s.to_str()).unwrap_or_default()
}

fn select_file(p: &Path, re: &Regex, exclude: Option<&str>) -> bool {
    let name = file_name(p);
    re.is_match(name) && !exclude.map(|x| name.contains(x)).unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use std::fs::File;

    use tempfile::TempDir;

    use super::*;

    fn make_dir(names: &[&str]) -> TempDir {
        let d = TempDir::new().unwrap();
        for n in names {
            File::create(d.path().join(n)).unwrap();
        }
        d
    }

    fn opts(d: &TempDir) -> InputOptions {
        InputOptions {
            directory: d.path().to_owned(),
            ..Default::default()
        }
    }

    #[test]
    fn glob_conversion() {
        let re = glob_to_regex("*fastq.gz").unwrap();
        assert!(re.is_match("A_R1_.fastq.gz"));
        assert!(!re.is_match("A_R1_.fastq"));
        assert!(!re.is_match("sub/A.fastq.gz"));
        assert!(!glob_to_regex("*.fastq.gz").unwrap().is_match("Afastq.gz"));

        let re = glob_to_regex("sample?_[12].fq").unwrap();
        assert!(re.is_match("sampleA_1.fq"));
        assert!(!re.is_match("sampleA_3.fq"));
        assert!(glob_to_regex("bad[").is_err());

        let re = glob_to_regex("A_R[!2]_.fastq.gz").unwrap();
        assert_eq!(re.as_str(), r"^A_R[^2]_\.fastq\.gz$");
        assert!(re.is_match("A_R1_.fastq.gz"));
        assert!(!re.is_match("A_R2_.fastq.gz"));
        assert!(!re.is_match("A_R!_.fastq.gz"));
    }

    #[test]
    fn paired_samples() {
        let d = make_dir(&[
            "A_R1_.fastq.gz",
            "A_R2_.fastq.gz",
            "B_R1_.fastq.gz",
            "B_R2_.fastq.gz",
            "notes.txt",
        ]);
        let inp = find_input_files(&opts(&d)).unwrap();
        assert_eq!(inp.files().len(), 4);
        assert_eq!(inp.n_samples(), 2);
        assert!(inp.paired());
    }

    #[test]
    fn single_end_and_exclusion() {
        let d = make_dir(&["A.fastq.gz", "B.fastq.gz", "Undetermined.fastq.gz"]);
        let mut o = opts(&d);
        o.exclude_pattern = Some("Undetermined".to_owned());
        let inp = find_input_files(&o).unwrap();
        assert_eq!(inp.files().len(), 2);
        assert_eq!(inp.n_samples(), 2);
        assert!(!inp.paired());
    }

    #[test]
    fn no_input_files() {
        let d = make_dir(&["reads.bam"]);
        assert!(find_input_files(&opts(&d)).is_err());
    }

    #[test]
    fn invalid_readtag() {
        let d = make_dir(&["A_R1_.fastq.gz"]);
        let mut o = opts(&d);
        o.readtag = String::from("_R[12");
        assert!(find_input_files(&o).is_err());
    }
}
