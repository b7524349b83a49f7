use std::path::{Path, PathBuf};

use log::info;

use crate::config::Config;
use crate::error::Result;
use crate::mapper::Mapper;
use crate::reader::{read_contigs, BedRecords};
use crate::types::{Header, Vcf};

/// Everything needed to turn one input table into a VCF document.
#[derive(Debug, Clone)]
pub struct Conversion {
    bed: PathBuf,
    contigs: PathBuf,
    sample: Option<String>,
    skip: usize,
    has_header: bool,
}

impl Conversion {
    pub fn new<P: AsRef<Path>, Q: AsRef<Path>>(bed: P, contigs: Q) -> Self {
        Conversion {
            bed: bed.as_ref().to_path_buf(),
            contigs: contigs.as_ref().to_path_buf(),
            sample: None,
            skip: 0,
            has_header: false,
        }
    }

    /// Defaults to the input file name up to its first `.`.
    pub fn sample(mut self, sample: Option<String>) -> Self {
        self.sample = sample;
        self
    }

    pub fn skip(mut self, skip: usize) -> Self {
        self.skip = skip;
        self
    }

    pub fn has_header(mut self, has_header: bool) -> Self {
        self.has_header = has_header;
        self
    }

    /// Reads all input and builds the complete document; nothing is written.
    pub fn run(&self, config: &Config) -> Result<Vcf> {
        let sample = match &self.sample {
            Some(sample) => sample.clone(),
            None => default_sample_name(&self.bed),
        };
        let contigs = read_contigs(&self.contigs)?;
        info!(
            "read {} contigs from {}",
            contigs.len(),
            self.contigs.display()
        );
        let header = Header::from_config(config, &sample, contigs);

        let records = BedRecords::from_path(&self.bed, self.skip, self.has_header)?;
        let variants = Mapper::new(config).map_records(records)?;
        info!(
            "converted {} records from {} for sample {}",
            variants.len(),
            self.bed.display(),
            sample
        );
        Ok(Vcf::new(header, variants))
    }
}

/// `dir/sample1.bed.gz` -> `sample1`
pub fn default_sample_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy())
        .and_then(|name| name.split('.').next().map(str::to_owned))
        .unwrap_or_default()
}
