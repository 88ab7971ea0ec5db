use crate::error::Error;
use crate::records::codebook::Codebook;
use crate::records::codebook::FieldBook;
use crate::records::table::RecordTable;
use std::collections::HashMap;
use std::io::BufRead;

/// raw categorical dataset read from comma-separated text: a header of
/// attribute names followed by one line of category strings per record.
#[derive(Debug, Clone)]
pub struct Dataset {
    names: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl Dataset {
    pub fn open(path: &std::path::Path) -> Result<Self, Error> {
        Self::read(std::io::BufReader::new(std::fs::File::open(path)?))
    }

    /// assemble from rows already in memory, e.g. pulled from a store
    pub fn assemble(names: Vec<String>, rows: Vec<Vec<String>>) -> Result<Self, Error> {
        if names.is_empty() {
            return Err(Error::Construction("empty header".into()));
        }
        if let Some(i) = rows.iter().position(|r| r.len() != names.len()) {
            return Err(Error::Construction(format!(
                "row {} has {} values, expected {}",
                i,
                rows[i].len(),
                names.len()
            )));
        }
        Ok(Self { names, rows })
    }

    pub fn read<R: BufRead>(reader: R) -> Result<Self, Error> {
        let mut lines = reader.lines();
        let header = match lines.next() {
            Some(line) => line?,
            None => return Err(Error::Construction("missing header line".into())),
        };
        let names = header.split(',').map(str::to_string).collect::<Vec<_>>();
        if names.iter().all(|n| n.is_empty()) {
            return Err(Error::Construction("empty header".into()));
        }
        let mut rows = Vec::new();
        for (i, line) in lines.enumerate() {
            let row = line?.split(',').map(str::to_string).collect::<Vec<_>>();
            if row.len() != names.len() {
                return Err(Error::Construction(format!(
                    "line {} has {} values, expected {}",
                    i + 2,
                    row.len(),
                    names.len()
                )));
            }
            rows.push(row);
        }
        Ok(Self { names, rows })
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }
    pub fn len(&self) -> usize {
        self.rows.len()
    }
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
    pub fn row(&self, i: usize) -> &[String] {
        &self.rows[i]
    }

    /// symbolic table with every raw column as its own meta-field
    pub fn encode(&self) -> Result<(RecordTable, Codebook), Error> {
        let singles = self
            .names
            .iter()
            .map(|n| vec![n.as_str()])
            .collect::<Vec<_>>();
        self.compound(&singles)
    }

    /// symbolic table over the given meta-fields. A meta-field spanning
    /// several raw columns treats the tuple of their values as a single
    /// category. Distinct categories are coded by first appearance.
    pub fn compound(&self, fields: &[Vec<&str>]) -> Result<(RecordTable, Codebook), Error> {
        if fields.is_empty() {
            return Err(Error::Construction("no meta-fields selected".into()));
        }
        let mut columns = Vec::with_capacity(fields.len());
        for group in fields {
            if group.is_empty() {
                return Err(Error::Construction("empty meta-field".into()));
            }
            let mut indices = Vec::with_capacity(group.len());
            for name in group {
                match self.names.iter().position(|n| n == name) {
                    Some(j) => indices.push(j),
                    None => return Err(Error::Construction(format!("unknown column {}", name))),
                }
            }
            columns.push(indices);
        }
        let mut books = Vec::with_capacity(fields.len());
        let mut codes = vec![Vec::with_capacity(fields.len()); self.rows.len()];
        for (group, indices) in fields.iter().zip(columns.iter()) {
            let mut seen: HashMap<Vec<String>, usize> = HashMap::new();
            let mut categories: Vec<Vec<String>> = Vec::new();
            for (i, row) in self.rows.iter().enumerate() {
                let category = indices.iter().map(|&j| row[j].clone()).collect::<Vec<_>>();
                let code = match seen.get(&category) {
                    Some(&code) => code,
                    None => {
                        categories.push(category.clone());
                        seen.insert(category, categories.len());
                        categories.len()
                    }
                };
                codes[i].push(code);
            }
            if categories.is_empty() {
                // a column of an empty dataset still needs a positive arity
                categories.push(vec![String::new(); indices.len()]);
            }
            books.push(FieldBook::new(
                group.iter().map(|s| s.to_string()).collect(),
                categories,
            ));
        }
        let arities = books.iter().map(|b| b.arity()).collect();
        let table = RecordTable::new(arities, codes)?;
        Ok((table, Codebook::from(books)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::source::Records;

    const CSV: &str = "\
user,host,logon
alice,web01,2
bob,web01,3
alice,db01,2
alice,web01,10
";

    #[test]
    fn parses_header_and_rows() {
        let data = Dataset::read(CSV.as_bytes()).unwrap();
        assert_eq!(data.names(), &["user", "host", "logon"]);
        assert_eq!(data.len(), 4);
        assert_eq!(data.row(2), &["alice", "db01", "2"]);
    }

    #[test]
    fn codes_by_first_appearance() {
        let data = Dataset::read(CSV.as_bytes()).unwrap();
        let (table, book) = data.encode().unwrap();
        assert_eq!(table.arities(), &[2, 2, 3]);
        // alice first, bob second
        assert_eq!(table.value(0, 0), 1);
        assert_eq!(table.value(1, 0), 2);
        assert_eq!(book.field(0).decode(1), &["alice".to_string()]);
        assert_eq!(book.field(2).decode(3), &["10".to_string()]);
    }

    #[test]
    fn compound_fields_tuple_their_columns() {
        let data = Dataset::read(CSV.as_bytes()).unwrap();
        let (table, book) = data.compound(&[vec!["user", "host"], vec!["logon"]]).unwrap();
        assert_eq!(table.fields(), 2);
        // (alice, web01), (bob, web01), (alice, db01)
        assert_eq!(table.arity(0), 3);
        assert_eq!(table.value(3, 0), 1);
        assert_eq!(book.field(0).name(), "user+host");
        assert_eq!(
            book.field(0).decode(2),
            &["bob".to_string(), "web01".to_string()]
        );
    }

    #[test]
    fn rejects_ragged_lines() {
        let bad = "a,b\n1,2\n3\n";
        assert!(matches!(
            Dataset::read(bad.as_bytes()),
            Err(Error::Construction(_))
        ));
    }

    #[test]
    fn rejects_unknown_meta_field_column() {
        let data = Dataset::read(CSV.as_bytes()).unwrap();
        assert!(matches!(
            data.compound(&[vec!["nope"]]),
            Err(Error::Construction(_))
        ));
    }

    #[test]
    fn empty_dataset_encodes_to_empty_table() {
        let data = Dataset::read("a,b\n".as_bytes()).unwrap();
        let (table, book) = data.encode().unwrap();
        assert_eq!(table.len(), 0);
        assert_eq!(book.fields(), 2);
    }
}
