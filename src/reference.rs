use std::path::Path;

use anyhow::Context;
use bio::io::fasta;
use compress_io::compress;

/// Total number of bases over all records of a (possibly compressed) FASTA file
pub fn reference_length<P: AsRef<Path>>(name: P) -> anyhow::Result<u64> {
    let fname = name.as_ref();
    debug!("Reading reference sequence from {}", fname.display());

    let f = compress::CompressIo::new()
        .path(fname)
        .bufreader()
        .with_context(|| format!("Could not open reference file {}", fname.display()))?;
    let reader = fasta::Reader::from_bufread(f);

    let mut n_records = 0;
    let mut total: u64 = 0;
    for result in reader.records() {
        let record = result
            .with_context(|| format!("Error parsing FASTA record {}", n_records + 1))?;
        if record.id().is_empty() {
            return Err(anyhow!("Missing sequence name for record {}", n_records + 1));
        }
        n_records += 1;
        total += record.seq().len() as u64;
    }

    if n_records == 0 {
        Err(anyhow!("No sequence records found"))
    } else {
        debug!(
            "Reference read in: {} records, {} bases",
            n_records, total
        );
        Ok(total)
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use tempfile::NamedTempFile;

    use super::*;

    fn write_tmp(s: &str) -> NamedTempFile {
        let mut f = NamedTempFile::new().unwrap();
        f.write_all(s.as_bytes()).unwrap();
        f.flush().unwrap();
        f
    }

    #[test]
    fn sums_all_records() {
        let f = write_tmp(">chr1 first\nACGTACGT\nACG\n>chr2\nNNNN\r\n>plasmid\nACGT\n");
        assert_eq!(reference_length(f.path()).unwrap(), 19);
    }

    #[test]
    fn empty_record_is_allowed() {
        let f = write_tmp(">empty\n>chr1\nACGT\n");
        assert_eq!(reference_length(f.path()).unwrap(), 4);
    }

    #[test]
    fn rejects_malformed() {
        for s in ["", "ACGT\n>chr1\nACGT\n", ">\nACGT\n"] {
            let f = write_tmp(s);
            assert!(reference_length(f.path()).is_err(), "{s:?}");
        }
    }

    #[test]
    fn rejects_missing_file() {
        assert!(reference_length("/no/such/file.fa").is_err());
    }
}
