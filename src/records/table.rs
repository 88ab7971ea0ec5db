use crate::error::Error;
use crate::records::source::Records;

/// Immutable symbolic dataset: arity per attribute plus a row-major
/// matrix of 1-based codes. Built once, read-only thereafter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordTable {
    arities: Vec<usize>,
    values: Vec<usize>,
}

impl RecordTable {
    pub fn new(arities: Vec<usize>, rows: Vec<Vec<usize>>) -> Result<Self, Error> {
        if arities.is_empty() {
            return Err(Error::Construction("empty attribute list".into()));
        }
        if let Some(j) = arities.iter().position(|&a| a == 0) {
            return Err(Error::Construction(format!("attribute {} has arity 0", j)));
        }
        if let Some(j) = arities.iter().position(|&a| a >= crate::ARITY_LIMIT) {
            return Err(Error::Saturation(format!("attribute {} arity {}", j, arities[j])));
        }
        if rows.len() as u128 >= crate::RECORD_LIMIT {
            return Err(Error::Saturation(format!("{} records", rows.len())));
        }
        let fields = arities.len();
        let mut values = Vec::with_capacity(rows.len() * fields);
        for (i, row) in rows.into_iter().enumerate() {
            if row.len() != fields {
                return Err(Error::Construction(format!(
                    "row {} has {} values, expected {}",
                    i,
                    row.len(),
                    fields
                )));
            }
            for (j, v) in row.iter().enumerate() {
                if *v == 0 || *v > arities[j] {
                    return Err(Error::Construction(format!(
                        "row {} attribute {} holds {}, outside 1..={}",
                        i, j, v, arities[j]
                    )));
                }
            }
            values.extend(row);
        }
        Ok(Self { arities, values })
    }

    pub fn arities(&self) -> &[usize] {
        &self.arities
    }
}

impl Records for RecordTable {
    fn fields(&self) -> usize {
        self.arities.len()
    }
    fn arity(&self, field: usize) -> usize {
        self.arities[field]
    }
    fn value(&self, row: usize, field: usize) -> usize {
        self.values[row * self.arities.len() + field]
    }
    fn len(&self) -> usize {
        match self.arities.len() {
            0 => 0,
            d => self.values.len() / d,
        }
    }
}

impl crate::Arbitrary for RecordTable {
    fn random() -> Self {
        let fields = rand::random_range(2..=4);
        let arities = (0..fields)
            .map(|_| rand::random_range(2..=4))
            .collect::<Vec<usize>>();
        let rows = (0..rand::random_range(1..=64))
            .map(|_| arities.iter().map(|&a| rand::random_range(1..=a)).collect())
            .collect::<Vec<Vec<usize>>>();
        Self::new(arities, rows).expect("random table is well formed")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_ragged_rows() {
        let table = RecordTable::new(vec![2, 2], vec![vec![1, 1], vec![2]]);
        assert!(matches!(table, Err(Error::Construction(_))));
    }

    #[test]
    fn rejects_zero_codes() {
        let table = RecordTable::new(vec![2, 2], vec![vec![1, 0]]);
        assert!(matches!(table, Err(Error::Construction(_))));
    }

    #[test]
    fn rejects_codes_beyond_arity() {
        let table = RecordTable::new(vec![2, 2], vec![vec![1, 3]]);
        assert!(matches!(table, Err(Error::Construction(_))));
    }

    #[test]
    fn rejects_empty_attribute_list() {
        let table = RecordTable::new(vec![], vec![]);
        assert!(matches!(table, Err(Error::Construction(_))));
    }

    #[test]
    fn empty_table_is_valid() {
        let table = RecordTable::new(vec![2, 3], vec![]).unwrap();
        assert_eq!(table.len(), 0);
        assert_eq!(table.fields(), 2);
    }

    #[test]
    fn indexes_row_major() {
        let table = RecordTable::new(vec![2, 3], vec![vec![1, 3], vec![2, 1]]).unwrap();
        assert_eq!(table.value(0, 1), 3);
        assert_eq!(table.value(1, 0), 2);
        assert_eq!(table.len(), 2);
    }
}
