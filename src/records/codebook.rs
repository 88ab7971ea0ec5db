use serde::Deserialize;
use serde::Serialize;

/// translation between the 1-based codes of one meta-field and the raw
/// category tuples behind them. Slot v - 1 holds the categories of code v.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldBook {
    name: String,
    columns: Vec<String>,
    categories: Vec<Vec<String>>,
}

impl FieldBook {
    pub fn new(columns: Vec<String>, categories: Vec<Vec<String>>) -> Self {
        Self {
            name: columns.join("+"),
            columns,
            categories,
        }
    }
    pub fn name(&self) -> &str {
        &self.name
    }
    pub fn columns(&self) -> &[String] {
        &self.columns
    }
    pub fn arity(&self) -> usize {
        self.categories.len()
    }
    /// raw category tuple of a code
    pub fn decode(&self, value: usize) -> &[String] {
        &self.categories[value - 1]
    }
    /// code of a raw category tuple, if it was observed
    pub fn encode(&self, categories: &[String]) -> Option<usize> {
        self.categories.iter().position(|c| c == categories).map(|i| i + 1)
    }
}

/// per-field codebooks for a whole symbolic table, surfaced to callers so
/// mining results can be translated back to readable categories.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Codebook(Vec<FieldBook>);

impl Codebook {
    pub fn field(&self, field: usize) -> &FieldBook {
        &self.0[field]
    }
    pub fn fields(&self) -> usize {
        self.0.len()
    }
    pub fn names(&self) -> Vec<&str> {
        self.0.iter().map(|f| f.name()).collect()
    }
}

impl From<Vec<FieldBook>> for Codebook {
    fn from(fields: Vec<FieldBook>) -> Self {
        Self(fields)
    }
}
