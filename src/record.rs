use std::collections::HashMap;
#[cfg(not(feature = "sync"))]
use std::rc::Rc;
#[cfg(feature = "sync")]
use std::sync::Arc;

use getset::Getters;

use crate::error::Result;
use crate::resolve;

/// Handle through which all records of one input share their column header.
#[cfg(not(feature = "sync"))]
pub type Shared<T> = Rc<T>;
#[cfg(feature = "sync")]
pub type Shared<T> = Arc<T>;

/// The column names of an input table, with the name to position lookup
/// computed once up front.
#[derive(Debug, Clone, PartialEq, Eq, Getters)]
pub struct Columns {
    #[getset(get = "pub")]
    names: Vec<String>,
    index: HashMap<String, usize>,
}

impl Columns {
    /// If a name occurs more than once, lookups return its first position.
    pub fn new(names: Vec<String>) -> Self {
        let mut index = HashMap::with_capacity(names.len());
        for (position, name) in names.iter().enumerate() {
            index.entry(name.clone()).or_insert(position);
        }
        Self { names, index }
    }

    /// Columns named after their position: `"0"`, `"1"`, ...
    pub fn positional(width: usize) -> Self {
        Self::new((0..width).map(|i| i.to_string()).collect())
    }

    pub fn position(&self, name: &str) -> Option<usize> {
        self.index.get(name).copied()
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

impl<S: Into<String>> FromIterator<S> for Columns {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self::new(iter.into_iter().map(Into::into).collect())
    }
}

/// One row of the input table.
#[derive(Debug, Clone)]
pub struct BedRecord {
    line: usize,
    cells: Vec<String>,
    columns: Shared<Columns>,
}

impl BedRecord {
    pub fn new(line: usize, cells: Vec<String>, columns: Shared<Columns>) -> Self {
        Self {
            line,
            cells,
            columns,
        }
    }

    /// Splits a raw tab-delimited line into cells.
    pub fn split(line: &str) -> Vec<String> {
        line.split('\t').map(str::to_owned).collect()
    }

    /// The 1-based line number of this record in its source.
    pub fn line(&self) -> usize {
        self.line
    }

    pub fn cells(&self) -> &[String] {
        &self.cells
    }

    pub fn columns(&self) -> &Columns {
        self.columns.as_ref()
    }

    /// Returns the cell of the column called `name`, if both exist.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.columns
            .position(name)
            .and_then(|i| self.cells.get(i))
            .map(String::as_str)
    }

    /// Evaluates `expression` against this record.
    ///
    /// # Examples
    ///
    /// ```
    /// use rust_bed2vcf::record::{BedRecord, Columns, Shared};
    ///
    /// let columns = Shared::new(Columns::from_iter(vec!["chr", "start", "end"]));
    /// let record = BedRecord::new(1, BedRecord::split("chr1\t100\t250"), columns);
    /// assert_eq!(record.resolve("~min $end $start").unwrap(), "150");
    /// ```
    pub fn resolve(&self, expression: &str) -> Result<String> {
        resolve::resolve(expression, &self.cells, &self.columns)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_positional_columns() {
        let columns = Columns::positional(3);
        assert_eq!(columns.names(), &["0", "1", "2"]);
        assert_eq!(columns.position("2"), Some(2));
        assert_eq!(columns.position("3"), None);
    }

    #[test]
    fn test_first_duplicate_wins() {
        let columns: Columns = vec!["a", "b", "a"].into_iter().collect();
        assert_eq!(columns.len(), 3);
        assert_eq!(columns.position("a"), Some(0));
        assert_eq!(columns.position("b"), Some(1));
    }

    #[test]
    fn test_record_get() {
        let columns = Shared::new(Columns::from_iter(vec!["chr", "start"]));
        let record = BedRecord::new(4, BedRecord::split("chr2\t17"), columns);
        assert_eq!(record.line(), 4);
        assert_eq!(record.get("start"), Some("17"));
        assert_eq!(record.get("end"), None);
    }
}
