//! Conversion configuration.
//!
//! The YAML document is deserialized into private `Raw*` structs first and then
//! validated into [`Config`]. Validation fills in defaults for the standard VCF
//! columns and collects every problem it finds before failing, so a user sees
//! all mistakes in one go.
//!
//! ```yaml
//! header:
//!   - name: source
//!     content: bed2vcf
//! chrom:
//!   value: $chr
//! pos:
//!   field: start       # same as `value: $start`
//! alt:
//!   value: ~if $cn > 2 <DUP> <DEL>
//!   options:
//!     - name: DUP
//!       description: Duplication
//! info:
//!   SVLEN:
//!     value: ~min $end $start
//!     number: 1
//!     type: Integer
//!     description: Length of the structural variant
//! ```
use std::fmt;
use std::fs;
use std::path::Path;
use std::str::FromStr;

use getset::Getters;
use indexmap::IndexMap;
use log::info;
use serde::de::{Deserializer, MapAccess, SeqAccess, Visitor};
use serde::Deserialize;

use crate::error::{Error, Result};

/// A named, described value, used for free-form header lines and for the
/// options of the ALT and FILTER columns.
#[derive(Debug, Clone, PartialEq, Eq, Default, Getters)]
#[getset(get = "pub")]
pub struct HeaderSpec {
    name: String,
    content: String,
    description: String,
}

impl HeaderSpec {
    pub fn new(name: &str, content: &str, description: &str) -> Self {
        Self {
            name: name.into(),
            content: content.into(),
            description: description.into(),
        }
    }
}

/// How to derive one output value from an input record.
#[derive(Debug, Clone, PartialEq, Eq, Default, Getters)]
#[getset(get = "pub")]
pub struct FieldSpec {
    expression: String,
    prefix: String,
    options: Vec<HeaderSpec>,
}

impl FieldSpec {
    pub fn new(expression: &str, prefix: &str) -> Self {
        Self {
            expression: expression.into(),
            prefix: prefix.into(),
            options: Vec::new(),
        }
    }

    pub fn with_options(mut self, options: Vec<HeaderSpec>) -> Self {
        self.options = options;
        self
    }

    fn is_unset(&self) -> bool {
        self.expression.is_empty() && self.prefix.is_empty()
    }
}

/// One INFO or FORMAT declaration together with the rule for its value.
#[derive(Debug, Clone, PartialEq, Eq, Getters)]
#[getset(get = "pub")]
pub struct InfoFormatSpec {
    name: String,
    number: String,
    kind: String,
    description: String,
    field: FieldSpec,
}

impl InfoFormatSpec {
    pub fn new(name: &str, number: &str, kind: &str, description: &str, field: FieldSpec) -> Self {
        Self {
            name: name.into(),
            number: number.into(),
            kind: kind.into(),
            description: description.into(),
            field,
        }
    }
}

/// A validated configuration. It can only be built through validation and
/// is not modified afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Getters)]
#[getset(get = "pub")]
pub struct Config {
    header: Vec<HeaderSpec>,
    chrom: FieldSpec,
    pos: FieldSpec,
    id: FieldSpec,
    ref_allele: FieldSpec,
    alt: FieldSpec,
    qual: FieldSpec,
    filter: FieldSpec,
    info: Vec<InfoFormatSpec>,
    format: Vec<InfoFormatSpec>,
}

impl Config {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        fs::read_to_string(path)?.parse()
    }

    /// The standard columns in VCF order, with their column names.
    pub fn standard_fields(&self) -> [(&'static str, &FieldSpec); 7] {
        [
            ("CHROM", &self.chrom),
            ("POS", &self.pos),
            ("ID", &self.id),
            ("REF", &self.ref_allele),
            ("ALT", &self.alt),
            ("QUAL", &self.qual),
            ("FILTER", &self.filter),
        ]
    }
}

impl FromStr for Config {
    type Err = Error;

    fn from_str(document: &str) -> Result<Self> {
        let raw = if document.trim().is_empty() {
            RawConfig::default()
        } else {
            serde_yaml::from_str(document)?
        };
        raw.validate()
    }
}

/// Scalars keep the text written in the document: `10.0` stays `10.0`.
fn text(scalar: Option<String>) -> String {
    scalar.unwrap_or_default()
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawHeader {
    name: Option<String>,
    content: Option<String>,
    description: Option<String>,
}

impl From<RawHeader> for HeaderSpec {
    fn from(raw: RawHeader) -> Self {
        HeaderSpec {
            name: text(raw.name),
            content: text(raw.content),
            description: text(raw.description),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawField {
    value: Option<String>,
    field: Option<String>,
    prefix: Option<String>,
    options: Vec<RawHeader>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawInfoFormat {
    name: Option<String>,
    value: Option<String>,
    field: Option<String>,
    prefix: Option<String>,
    number: Option<String>,
    #[serde(rename = "type")]
    kind: Option<String>,
    description: Option<String>,
}

/// INFO and FORMAT may be written either as a mapping keyed by name or as a
/// list of entries carrying a `name`; both keep document order.
#[derive(Debug)]
enum RawInfoFormats {
    Named(IndexMap<String, RawInfoFormat>),
    Listed(Vec<RawInfoFormat>),
}

impl<'de> Deserialize<'de> for RawInfoFormats {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct EntriesVisitor;

        impl<'de> Visitor<'de> for EntriesVisitor {
            type Value = RawInfoFormats;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("a mapping of named entries or a list of entries")
            }

            fn visit_map<A>(self, mut map: A) -> std::result::Result<Self::Value, A::Error>
            where
                A: MapAccess<'de>,
            {
                let mut entries = IndexMap::new();
                while let Some((name, entry)) = map.next_entry::<String, RawInfoFormat>()? {
                    entries.insert(name, entry);
                }
                Ok(RawInfoFormats::Named(entries))
            }

            fn visit_seq<A>(self, mut seq: A) -> std::result::Result<Self::Value, A::Error>
            where
                A: SeqAccess<'de>,
            {
                let mut entries = Vec::new();
                while let Some(entry) = seq.next_element::<RawInfoFormat>()? {
                    entries.push(entry);
                }
                Ok(RawInfoFormats::Listed(entries))
            }
        }

        deserializer.deserialize_any(EntriesVisitor)
    }
}

impl RawInfoFormats {
    fn into_entries(self) -> Vec<RawInfoFormat> {
        match self {
            RawInfoFormats::Listed(entries) => entries,
            RawInfoFormats::Named(entries) => entries
                .into_iter()
                .map(|(name, mut entry)| {
                    if entry.name.is_none() {
                        entry.name = Some(name);
                    }
                    entry
                })
                .collect(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawConfig {
    header: Option<Vec<RawHeader>>,
    chrom: Option<RawField>,
    pos: Option<RawField>,
    id: Option<RawField>,
    #[serde(rename = "ref")]
    ref_allele: Option<RawField>,
    alt: Option<RawField>,
    qual: Option<RawField>,
    filter: Option<RawField>,
    info: Option<RawInfoFormats>,
    format: Option<RawInfoFormats>,
}

/// A column default, applied when neither value nor prefix is configured.
enum ColumnDefault {
    Value(&'static str),
    Prefix(&'static str),
}

/// Resolves the legacy `field: col` form into an expression.
fn expression(
    label: &str,
    value: Option<String>,
    field: Option<String>,
    problems: &mut Vec<String>,
) -> String {
    match (value, field) {
        (Some(value), None) => value,
        (None, Some(field)) => format!("${}", field),
        (Some(value), Some(_)) => {
            problems.push(format!(
                "{} sets both `value` and `field`, use only one of them",
                label
            ));
            value
        }
        (None, None) => String::new(),
    }
}

impl RawField {
    fn validate(
        self,
        label: &str,
        default: ColumnDefault,
        problems: &mut Vec<String>,
    ) -> FieldSpec {
        let mut spec = FieldSpec {
            expression: expression(label, self.value, self.field, problems),
            prefix: text(self.prefix),
            options: self.options.into_iter().map(HeaderSpec::from).collect(),
        };
        if spec.is_unset() {
            match default {
                ColumnDefault::Value(value) => {
                    info!(
                        "No value specified for {}, defaulting to '{}'",
                        label, value
                    );
                    spec.expression = value.into();
                }
                ColumnDefault::Prefix(prefix) => {
                    info!(
                        "No value or prefix specified for {}, defaulting to prefix '{}'",
                        label, prefix
                    );
                    spec.prefix = prefix.into();
                }
            }
        }
        spec
    }
}

impl RawInfoFormat {
    fn validate(self, category: &str, problems: &mut Vec<String>) -> Option<InfoFormatSpec> {
        let name = text(self.name);
        if name.is_empty() {
            problems.push(format!("{} entry without a name", category));
            return None;
        }
        let label = format!("{}/{}", category, name.to_uppercase());
        let expression = expression(&label, self.value, self.field, problems);
        if expression.is_empty() {
            problems.push(format!("No value specified for {}", label));
        }
        let number = text(self.number);
        let kind = text(self.kind);
        Some(InfoFormatSpec {
            number: if number.is_empty() { ".".into() } else { number },
            kind: if kind.is_empty() { "String".into() } else { kind },
            description: text(self.description),
            field: FieldSpec {
                expression,
                prefix: text(self.prefix),
                options: Vec::new(),
            },
            name,
        })
    }
}

impl RawConfig {
    fn validate(self) -> Result<Config> {
        let mut problems = Vec::new();
        let mut column = |raw: Option<RawField>, label: &str, default: ColumnDefault| {
            raw.unwrap_or_default()
                .validate(label, default, &mut problems)
        };
        let chrom = column(self.chrom, "CHROM", ColumnDefault::Value("$0"));
        let pos = column(self.pos, "POS", ColumnDefault::Value("$1"));
        let id = column(self.id, "ID", ColumnDefault::Prefix("id_"));
        let ref_allele = column(self.ref_allele, "REF", ColumnDefault::Value("N"));
        let alt = column(self.alt, "ALT", ColumnDefault::Value("<CNV>"));
        let qual = column(self.qual, "QUAL", ColumnDefault::Value("."));
        let filter = column(self.filter, "FILTER", ColumnDefault::Value("PASS"));
        let info = validate_all(self.info, "INFO", &mut problems);
        let format = validate_all(self.format, "FORMAT", &mut problems);

        if !problems.is_empty() {
            return Err(Error::Config(problems));
        }
        Ok(Config {
            header: self
                .header
                .unwrap_or_default()
                .into_iter()
                .map(HeaderSpec::from)
                .collect(),
            chrom,
            pos,
            id,
            ref_allele,
            alt,
            qual,
            filter,
            info,
            format,
        })
    }
}

fn validate_all(
    raw: Option<RawInfoFormats>,
    category: &str,
    problems: &mut Vec<String>,
) -> Vec<InfoFormatSpec> {
    raw.map(RawInfoFormats::into_entries)
        .unwrap_or_default()
        .into_iter()
        .filter_map(|entry| entry.validate(category, problems))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_document_is_all_defaults() {
        let config: Config = "".parse().unwrap();
        assert_eq!(config.chrom().expression(), "$0");
        assert_eq!(config.pos().expression(), "$1");
        assert_eq!(config.id(), &FieldSpec::new("", "id_"));
        assert_eq!(config.ref_allele().expression(), "N");
        assert_eq!(config.alt().expression(), "<CNV>");
        assert_eq!(config.qual().expression(), ".");
        assert_eq!(config.filter().expression(), "PASS");
        assert!(config.info().is_empty());
        assert!(config.format().is_empty());
    }

    #[test]
    fn test_prefix_only_is_not_defaulted() {
        let config: Config = "chrom:\n  prefix: chr\nid:\n  value: $name\n".parse().unwrap();
        assert_eq!(config.chrom(), &FieldSpec::new("", "chr"));
        assert_eq!(config.id(), &FieldSpec::new("$name", ""));
    }

    #[test]
    fn test_legacy_field() {
        let config: Config = "pos:\n  field: start\n".parse().unwrap();
        assert_eq!(config.pos().expression(), "$start");
    }

    #[test]
    fn test_value_and_field_conflict() {
        let err = "pos:\n  field: start\n  value: $start\n"
            .parse::<Config>()
            .unwrap_err();
        assert!(matches!(err, Error::Config(problems) if problems.len() == 1));
    }

    #[test]
    fn test_scalars_become_text() {
        let document = "
qual:
  value: 30
info:
  SVLEN:
    value: 1.5
    number: 1
    type: Integer
  PRECISE:
    value: true
    type: flag
";
        let config: Config = document.parse().unwrap();
        assert_eq!(config.qual().expression(), "30");
        let svlen = &config.info()[0];
        assert_eq!(svlen.name(), "SVLEN");
        assert_eq!(svlen.number(), "1");
        assert_eq!(svlen.field().expression(), "1.5");
        assert_eq!(config.info()[1].field().expression(), "true");
        assert_eq!(config.info()[1].number(), ".");
        assert_eq!(config.info()[1].kind(), "flag");
    }

    #[test]
    fn test_numbers_keep_their_spelling() {
        let document = "
qual:
  value: 10.0
ref:
  value: 1e3
info:
  - name: AF
    value: 0.50
    number: 1
";
        let config: Config = document.parse().unwrap();
        assert_eq!(config.qual().expression(), "10.0");
        assert_eq!(config.ref_allele().expression(), "1e3");
        assert_eq!(config.info()[0].field().expression(), "0.50");
    }

    #[test]
    fn test_info_keeps_document_order() {
        let document = "
info:
  ZETA:
    value: a
  ALPHA:
    value: b
  MID:
    value: c
format:
  - name: GT
    value: ./1
  - name: CN
    value: $cn
";
        let config: Config = document.parse().unwrap();
        let names = |specs: &[InfoFormatSpec]| {
            specs.iter().map(|s| s.name().clone()).collect::<Vec<_>>()
        };
        assert_eq!(names(config.info()), vec!["ZETA", "ALPHA", "MID"]);
        assert_eq!(names(config.format()), vec!["GT", "CN"]);
        assert_eq!(config.format()[1].kind(), "String");
    }

    #[test]
    fn test_missing_values_are_aggregated() {
        let document = "
info:
  SVLEN:
    number: 1
  END:
    value: $end
  SVTYPE:
    prefix: x
format:
  - value: ./1
  - name: GT
";
        let err = document.parse::<Config>().unwrap_err();
        match err {
            Error::Config(problems) => {
                assert_eq!(problems.len(), 4);
                assert!(problems[0].contains("INFO/SVLEN"));
                assert!(problems[1].contains("INFO/SVTYPE"));
                assert!(problems[2].contains("FORMAT entry without a name"));
                assert!(problems[3].contains("FORMAT/GT"));
            }
            other => panic!("unexpected error {:?}", other),
        }
    }

    #[test]
    fn test_header_and_options() {
        let document = "
header:
  - name: source
    content: bed2vcf
filter:
  value: $filter
  options:
    - name: q10
      description: Quality below 10
";
        let config: Config = document.parse().unwrap();
        assert_eq!(config.header(), &vec![HeaderSpec::new("source", "bed2vcf", "")]);
        assert_eq!(
            config.filter().options(),
            &vec![HeaderSpec::new("q10", "", "Quality below 10")]
        );
    }

    #[test]
    fn test_null_sections() {
        let config: Config = "header:\nchrom:\ninfo:\n".parse().unwrap();
        assert!(config.header().is_empty());
        assert_eq!(config.chrom().expression(), "$0");
    }

    #[test]
    fn test_malformed_document() {
        let err = "info: [unclosed".parse::<Config>().unwrap_err();
        assert!(matches!(err, Error::ConfigDocument(_)));
    }
}
