use std::io::{BufRead, BufReader, Lines, Read};
use std::path::Path;

use log::debug;

use crate::error::{Error, Result};
use crate::parser;
use crate::record::{BedRecord, Columns, Shared};
use crate::types::HeaderLine;

/// Iterates over the records of a tab-delimited table.
///
/// The first `skip` lines are discarded. If `has_header` is set, the next
/// line names the columns; otherwise the columns are named after their
/// position (`"0"`, `"1"`, ...) using the width of the first record.
pub struct BedRecords<R: BufRead> {
    lines: Lines<R>,
    line_number: usize,
    skip: usize,
    has_header: bool,
    columns: Option<Shared<Columns>>,
}

impl BedRecords<BufReader<Box<dyn Read>>> {
    /// Opens `path`, which may be gzip compressed.
    pub fn from_path<P: AsRef<Path>>(path: P, skip: usize, has_header: bool) -> Result<Self> {
        let (reader, format) = niffler::from_path(path.as_ref()).map_err(niffler_error)?;
        debug!("reading {} as {:?}", path.as_ref().display(), format);
        let reader: Box<dyn Read> = reader;
        Ok(Self::new(BufReader::new(reader), skip, has_header))
    }
}

impl<R: BufRead> BedRecords<R> {
    pub fn new(reader: R, skip: usize, has_header: bool) -> Self {
        Self {
            lines: reader.lines(),
            line_number: 0,
            skip,
            has_header,
            columns: None,
        }
    }

    /// The column header, once it is known.
    pub fn columns(&self) -> Option<&Columns> {
        self.columns.as_deref()
    }

    fn next_line(&mut self) -> Option<Result<String>> {
        let line = self.lines.next()?;
        self.line_number += 1;
        Some(line.map_err(Error::from))
    }
}

impl<R: BufRead> Iterator for BedRecords<R> {
    type Item = Result<BedRecord>;

    fn next(&mut self) -> Option<Self::Item> {
        while self.skip > 0 {
            self.skip -= 1;
            match self.next_line()? {
                Ok(line) => debug!("skipping line {}: {}", self.line_number, line),
                Err(e) => return Some(Err(e)),
            }
        }
        let line = match self.next_line()? {
            Ok(line) => line,
            Err(e) => return Some(Err(e)),
        };
        let cells = BedRecord::split(&line);
        let columns = match self.columns.clone() {
            Some(columns) => columns,
            None if self.has_header => {
                let columns = Shared::new(Columns::new(cells));
                debug!("using columns {:?}", columns.names());
                self.columns = Some(columns);
                return self.next();
            }
            None => {
                let columns = Shared::new(Columns::positional(cells.len()));
                self.columns = Some(columns.clone());
                columns
            }
        };
        Some(Ok(BedRecord::new(self.line_number, cells, columns)))
    }
}

/// Reads `##contig` header lines from a fasta index or any table whose first
/// two tab-separated columns are the contig name and its length.
pub fn read_contigs<P: AsRef<Path>>(path: P) -> Result<Vec<HeaderLine>> {
    let (reader, _format) = niffler::from_path(path.as_ref()).map_err(niffler_error)?;
    parse_contigs(BufReader::new(reader))
}

pub fn parse_contigs<R: BufRead>(reader: R) -> Result<Vec<HeaderLine>> {
    let mut contigs = Vec::new();
    for (i, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let (_, (id, length)) = parser::contig(&line).map_err(|_| {
            Error::Parse(format!(
                "contig line {} is not of the form <name><TAB><length>: {}",
                i + 1,
                line
            ))
        })?;
        contigs.push(HeaderLine::contig(id, length));
    }
    Ok(contigs)
}

fn niffler_error(error: niffler::Error) -> Error {
    match error {
        niffler::Error::IOError(e) => Error::Io(e),
        other => Error::Io(std::io::Error::new(
            std::io::ErrorKind::InvalidData,
            other.to_string(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;
    use std::io::Write;

    use super::*;

    fn collect(input: &str, skip: usize, has_header: bool) -> Vec<BedRecord> {
        BedRecords::new(Cursor::new(input.to_owned()), skip, has_header)
            .collect::<Result<Vec<_>>>()
            .unwrap()
    }

    #[test]
    fn test_positional_columns() {
        let records = collect("chr1\t100\t200\nchr2\t5\t10\n", 0, false);
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].columns().names(), &["0", "1", "2"]);
        assert_eq!(records[1].get("0"), Some("chr2"));
        assert_eq!(records[1].line(), 2);
    }

    #[test]
    fn test_skip_and_header() {
        let input = "track name=foo\n# comment\nchr\tstart\tend\r\nchr1\t100\t200\r\n";
        let records = collect(input, 2, true);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].line(), 4);
        assert_eq!(records[0].get("end"), Some("200"));
    }

    #[test]
    fn test_skip_past_end() {
        assert!(collect("a\tb\n", 5, false).is_empty());
        assert!(collect("chr\tstart\n", 0, true).is_empty());
    }

    #[test]
    fn test_mismatched_widths_are_passed_through() {
        let records = collect("a\tb\tc\nd\te\n", 0, false);
        assert_eq!(records[1].cells().len(), 2);
        assert_eq!(records[1].columns().len(), 3);
    }

    #[test]
    fn test_from_path_gzip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("input.bed.gz");
        {
            let file = std::fs::File::create(&path).unwrap();
            let mut writer = niffler::get_writer(
                Box::new(file),
                niffler::compression::Format::Gzip,
                niffler::compression::Level::One,
            )
            .unwrap();
            writer.write_all(b"chr1\t1\t2\n").unwrap();
        }
        let records = BedRecords::from_path(&path, 0, false)
            .unwrap()
            .collect::<Result<Vec<_>>>()
            .unwrap();
        assert_eq!(records[0].cells(), &["chr1", "1", "2"]);
    }

    #[test]
    fn test_parse_contigs() {
        let input = "chr1\t248956422\t112\t70\t71\n\nchr2\t242193529\n";
        let contigs = parse_contigs(Cursor::new(input)).unwrap();
        assert_eq!(
            contigs,
            vec![
                HeaderLine::contig("chr1", "248956422"),
                HeaderLine::contig("chr2", "242193529"),
            ]
        );
    }

    #[test]
    fn test_parse_contigs_rejects_malformed_line() {
        let err = parse_contigs(Cursor::new("chr1 248956422\n")).unwrap_err();
        assert!(matches!(err, Error::Parse(message) if message.contains("line 1")));

        let err = parse_contigs(Cursor::new("chr1\t1000\nchr2\t\n")).unwrap_err();
        assert!(matches!(err, Error::Parse(message) if message.contains("line 2")));
    }
}
