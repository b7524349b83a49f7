use crate::config::{Config, FieldSpec, InfoFormatSpec};
use crate::error::{Error, Result};
use crate::record::BedRecord;
use crate::types::{ResolvedField, Variant};

/// Turns input records into variants according to a [`Config`].
pub struct Mapper<'c> {
    config: &'c Config,
}

impl<'c> Mapper<'c> {
    pub fn new(config: &'c Config) -> Self {
        Self { config }
    }

    /// Maps every record in order. The first failure aborts the whole run.
    pub fn map_records<I>(&self, records: I) -> Result<Vec<Variant>>
    where
        I: IntoIterator<Item = Result<BedRecord>>,
    {
        records
            .into_iter()
            .enumerate()
            .map(|(ordinal, record)| self.map_record(ordinal, &record?))
            .collect()
    }

    /// Maps the `ordinal`-th record (0-based), which becomes part of the ID.
    pub fn map_record(&self, ordinal: usize, record: &BedRecord) -> Result<Variant> {
        let expected = record.columns().len();
        let found = record.cells().len();
        if found != expected {
            return Err(Error::ColumnCountMismatch {
                line: record.line(),
                expected,
                found,
            });
        }

        let config = self.config;
        Ok(Variant {
            chrom: field(record, "CHROM", config.chrom())?,
            pos: field(record, "POS", config.pos())?,
            id: field(record, "ID", config.id())? + &ordinal.to_string(),
            ref_allele: field(record, "REF", config.ref_allele())?,
            alt: field(record, "ALT", config.alt())?,
            qual: field(record, "QUAL", config.qual())?,
            filter: field(record, "FILTER", config.filter())?,
            info: fields(record, "INFO", config.info())?,
            format: fields(record, "FORMAT", config.format())?,
        })
    }
}

fn field(record: &BedRecord, name: &str, spec: &FieldSpec) -> Result<String> {
    let value = record
        .resolve(spec.expression())
        .map_err(|e| Error::Record {
            line: record.line(),
            field: name.to_owned(),
            source: Box::new(e),
        })?;
    Ok(spec.prefix().clone() + &value)
}

fn fields(
    record: &BedRecord,
    category: &str,
    specs: &[InfoFormatSpec],
) -> Result<Vec<ResolvedField>> {
    specs
        .iter()
        .map(|spec| {
            let label = format!("{}/{}", category, spec.name().to_uppercase());
            let value = field(record, &label, spec.field())?;
            Ok(ResolvedField::new(
                spec.name(),
                spec.number(),
                spec.kind(),
                value,
            ))
        })
        .collect()
}
