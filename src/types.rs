use std::str::FromStr;

use getset::Getters;
use strum::{Display, EnumString};

use crate::config::{Config, HeaderSpec, InfoFormatSpec};

pub const VCF_VERSION: &str = "4.2";

#[derive(Debug, Clone, Copy, Eq, PartialEq, EnumString, Display)]
#[strum(ascii_case_insensitive)]
pub enum InfoType {
    Integer,
    Float,
    Flag,
    Character,
    String,
}

/// Which of the two typed header sections a declaration belongs to.
#[derive(Debug, Clone, Copy, Eq, PartialEq, EnumString, Display)]
#[strum(serialize_all = "UPPERCASE", ascii_case_insensitive)]
pub enum FieldCategory {
    Info,
    Format,
}

/// Which of the two described-symbol header sections a declaration belongs to.
#[derive(Debug, Clone, Copy, Eq, PartialEq, EnumString, Display)]
#[strum(serialize_all = "UPPERCASE", ascii_case_insensitive)]
pub enum SymbolCategory {
    Alt,
    Filter,
}

#[derive(Debug, Clone, Eq, PartialEq)]
pub enum HeaderLine {
    Contig {
        id: String,
        length: String,
    },
    Field {
        category: FieldCategory,
        id: String,
        number: String,
        kind: String,
        description: String,
    },
    Symbol {
        category: SymbolCategory,
        id: String,
        description: String,
    },
    Freeform {
        category: String,
        content: String,
    },
}

impl HeaderLine {
    pub fn contig(id: &str, length: &str) -> Self {
        HeaderLine::Contig {
            id: id.into(),
            length: length.into(),
        }
    }

    pub fn freeform(category: &str, content: &str) -> Self {
        HeaderLine::Freeform {
            category: category.into(),
            content: content.into(),
        }
    }
}

#[derive(Debug, Clone, Eq, PartialEq, Getters)]
#[getset(get = "pub")]
pub struct Header {
    version: String,
    sample: String,
    lines: Vec<HeaderLine>,
}

impl Header {
    pub fn new(sample: &str) -> Self {
        Header {
            version: VCF_VERSION.into(),
            sample: sample.into(),
            lines: Vec::new(),
        }
    }

    pub fn push(&mut self, line: HeaderLine) {
        self.lines.push(line);
    }

    /// Builds the header for `config`: free-form lines, ALT options, INFO,
    /// FORMAT, FILTER options and finally `contigs`, each group in the order
    /// it was declared.
    pub fn from_config<I>(config: &Config, sample: &str, contigs: I) -> Self
    where
        I: IntoIterator<Item = HeaderLine>,
    {
        let mut header = Header::new(sample);
        for spec in config.header() {
            header.push(HeaderLine::freeform(spec.name(), spec.content()));
        }
        let symbols = |category, options: &[HeaderSpec]| {
            options
                .iter()
                .map(move |option| HeaderLine::Symbol {
                    category,
                    id: option.name().clone(),
                    description: option.description().clone(),
                })
                .collect::<Vec<_>>()
        };
        let fields = |category, specs: &[InfoFormatSpec]| {
            specs
                .iter()
                .map(move |spec| HeaderLine::Field {
                    category,
                    id: spec.name().clone(),
                    number: spec.number().clone(),
                    kind: spec.kind().clone(),
                    description: spec.description().clone(),
                })
                .collect::<Vec<_>>()
        };
        header
            .lines
            .extend(symbols(SymbolCategory::Alt, config.alt().options()));
        header
            .lines
            .extend(fields(FieldCategory::Info, config.info()));
        header
            .lines
            .extend(fields(FieldCategory::Format, config.format()));
        header
            .lines
            .extend(symbols(SymbolCategory::Filter, config.filter().options()));
        header.lines.extend(contigs);
        header
    }
}

/// One resolved INFO or FORMAT value of a variant.
#[derive(Debug, Clone, Eq, PartialEq, Getters)]
#[getset(get = "pub")]
pub struct ResolvedField {
    name: String,
    number: String,
    kind: String,
    value: String,
}

impl ResolvedField {
    pub fn new(name: &str, number: &str, kind: &str, value: String) -> Self {
        ResolvedField {
            name: name.into(),
            number: number.into(),
            kind: kind.into(),
            value,
        }
    }

    pub fn is_flag(&self) -> bool {
        InfoType::from_str(&self.kind) == Ok(InfoType::Flag)
    }
}

#[derive(Debug, Clone, Eq, PartialEq, Default, Getters)]
#[getset(get = "pub")]
pub struct Variant {
    pub(crate) chrom: String,
    pub(crate) pos: String,
    pub(crate) id: String,
    pub(crate) ref_allele: String,
    pub(crate) alt: String,
    pub(crate) qual: String,
    pub(crate) filter: String,
    pub(crate) info: Vec<ResolvedField>,
    pub(crate) format: Vec<ResolvedField>,
}

/// A complete VCF document: one header and its variants in input order.
#[derive(Debug, Clone, Eq, PartialEq, Getters)]
#[getset(get = "pub")]
pub struct Vcf {
    header: Header,
    variants: Vec<Variant>,
}

impl Vcf {
    pub fn new(header: Header, variants: Vec<Variant>) -> Self {
        Vcf { header, variants }
    }
}
