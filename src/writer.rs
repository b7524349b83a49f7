use std::fmt;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use itertools::Itertools;

use crate::error::Result;
use crate::types::{Header, HeaderLine, ResolvedField, Variant, Vcf};

const COLUMNS: [&str; 9] = [
    "#CHROM", "POS", "ID", "REF", "ALT", "QUAL", "FILTER", "INFO", "FORMAT",
];

/// `"integer"` -> `"Integer"`, `"FLAG"` -> `"Flag"`.
fn title_case(s: &str) -> String {
    let lower = s.to_lowercase();
    let mut chars = lower.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

impl fmt::Display for HeaderLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HeaderLine::Contig { id, length } => {
                write!(f, "##contig=<ID={},length={}>", id, length)
            }
            HeaderLine::Field {
                category,
                id,
                number,
                kind,
                description,
            } => write!(
                f,
                "##{}=<ID={},Number={},Type={},Description=\"{}\">",
                category,
                id.to_uppercase(),
                number,
                title_case(kind),
                description
            ),
            HeaderLine::Symbol {
                category,
                id,
                description,
            } => write!(
                f,
                "##{}=<ID={},Description=\"{}\">",
                category,
                id.to_uppercase(),
                description
            ),
            HeaderLine::Freeform { category, content } => write!(f, "##{}={}", category, content),
        }
    }
}

impl fmt::Display for Header {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "##fileformat=VCFv{}", self.version())?;
        for line in self.lines() {
            writeln!(f, "{}", line)?;
        }
        writeln!(f, "{}\t{}", COLUMNS.iter().join("\t"), self.sample())
    }
}

impl Variant {
    /// `KEY=value` pairs joined by `;`, flags as the bare key.
    pub fn info_string(&self) -> String {
        self.info()
            .iter()
            .map(|field| {
                let key = field.name().to_uppercase();
                if field.is_flag() {
                    key
                } else {
                    format!("{}={}", key, field.value())
                }
            })
            .join(";")
    }

    /// The FORMAT keys and the sample values, as two tab-separated columns.
    pub fn format_string(&self) -> String {
        let keys = self.format().iter().map(|f| f.name().to_uppercase()).join(":");
        let values = self.format().iter().map(ResolvedField::value).join(":");
        format!("{}\t{}", keys, values)
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let info = self.info_string();
        let format = self.format_string();
        let columns: [&str; 9] = [
            self.chrom(),
            self.pos(),
            self.id(),
            self.ref_allele(),
            self.alt(),
            self.qual(),
            self.filter(),
            &info,
            &format,
        ];
        writeln!(f, "{}", columns.iter().join("\t"))
    }
}

impl Vcf {
    pub fn write<W: Write>(&self, out: &mut W) -> io::Result<()> {
        write!(out, "{}", self.header())?;
        for variant in self.variants() {
            write!(out, "{}", variant)?;
        }
        Ok(())
    }

    /// Writes to `path`, or to standard output if there is none.
    pub fn write_to(&self, path: Option<&Path>) -> Result<()> {
        match path {
            Some(path) => {
                let mut out = BufWriter::new(File::create(path)?);
                self.write(&mut out)?;
                out.flush()?;
            }
            None => {
                let stdout = io::stdout();
                let mut out = BufWriter::new(stdout.lock());
                self.write(&mut out)?;
                out.flush()?;
            }
        }
        Ok(())
    }
}

impl fmt::Display for Vcf {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.header())?;
        self.variants().iter().try_for_each(|v| write!(f, "{}", v))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{FieldCategory, SymbolCategory};

    #[test]
    fn test_title_case() {
        assert_eq!(title_case("integer"), "Integer");
        assert_eq!(title_case("FLAG"), "Flag");
        assert_eq!(title_case("String"), "String");
        assert_eq!(title_case(""), "");
    }

    #[test]
    fn test_header_lines() {
        let info = HeaderLine::Field {
            category: FieldCategory::Info,
            id: "SVLEN".into(),
            number: "1".into(),
            kind: "Integer".into(),
            description: "d".into(),
        };
        assert_eq!(
            info.to_string(),
            "##INFO=<ID=SVLEN,Number=1,Type=Integer,Description=\"d\">"
        );
        let format = HeaderLine::Field {
            category: FieldCategory::Format,
            id: "gt".into(),
            number: "1".into(),
            kind: "string".into(),
            description: "Genotype".into(),
        };
        assert_eq!(
            format.to_string(),
            "##FORMAT=<ID=GT,Number=1,Type=String,Description=\"Genotype\">"
        );
        let alt = HeaderLine::Symbol {
            category: SymbolCategory::Alt,
            id: "del".into(),
            description: "Deletion".into(),
        };
        assert_eq!(alt.to_string(), "##ALT=<ID=DEL,Description=\"Deletion\">");
        assert_eq!(
            HeaderLine::contig("chr1", "248956422").to_string(),
            "##contig=<ID=chr1,length=248956422>"
        );
        assert_eq!(
            HeaderLine::freeform("source", "bed2vcf").to_string(),
            "##source=bed2vcf"
        );
    }

    #[test]
    fn test_header() {
        let mut header = Header::new("sample1");
        header.push(HeaderLine::contig("chr1", "100"));
        assert_eq!(
            header.to_string(),
            "##fileformat=VCFv4.2\n\
             ##contig=<ID=chr1,length=100>\n\
             #CHROM\tPOS\tID\tREF\tALT\tQUAL\tFILTER\tINFO\tFORMAT\tsample1\n"
        );
    }

    fn variant() -> Variant {
        Variant {
            chrom: "chr1".into(),
            pos: "100".into(),
            id: "id_0".into(),
            ref_allele: "N".into(),
            alt: "<DEL>".into(),
            qual: ".".into(),
            filter: "PASS".into(),
            info: vec![
                ResolvedField::new("svlen", "1", "Integer", "-100".into()),
                ResolvedField::new("imprecise", "0", "flag", "ignored".into()),
                ResolvedField::new("END", "1", "Integer", "200".into()),
            ],
            format: vec![
                ResolvedField::new("gt", "1", "String", "0/1".into()),
                ResolvedField::new("CN", "1", "Integer", "1".into()),
            ],
        }
    }

    #[test]
    fn test_info_string() {
        assert_eq!(variant().info_string(), "SVLEN=-100;IMPRECISE;END=200");
        assert_eq!(Variant::default().info_string(), "");
    }

    #[test]
    fn test_format_string() {
        assert_eq!(variant().format_string(), "GT:CN\t0/1:1");
        assert_eq!(Variant::default().format_string(), "\t");
    }

    #[test]
    fn test_variant_line() {
        assert_eq!(
            variant().to_string(),
            "chr1\t100\tid_0\tN\t<DEL>\t.\tPASS\tSVLEN=-100;IMPRECISE;END=200\tGT:CN\t0/1:1\n"
        );
    }

    #[test]
    fn test_write() {
        let vcf = Vcf::new(Header::new("s"), vec![variant()]);
        let mut out = Vec::new();
        vcf.write(&mut out).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), vcf.to_string());
    }
}
