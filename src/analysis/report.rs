use crate::error::Error;
use crate::mining::pairing::Modality;
use crate::mining::pairing::Pairing;
use crate::records::codebook::Codebook;
use crate::Count;
use serde::Deserialize;
use serde::Serialize;
use std::collections::BTreeMap;

/// canonical fixed-precision encoding for floating-point fields, so that
/// loading a report and writing it back reproduces the bytes exactly
mod decimal {
    use serde::Deserialize;
    use serde::Deserializer;
    use serde::Serializer;

    pub fn serialize<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(&format_args!("{:.6}", value))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
        String::deserialize(deserializer)?
            .parse()
            .map_err(serde::de::Error::custom)
    }

    pub mod list {
        use serde::Deserialize;
        use serde::Deserializer;
        use serde::Serializer;

        pub fn serialize<S: Serializer>(
            values: &[f64],
            serializer: S,
        ) -> Result<S::Ok, S::Error> {
            serializer.collect_seq(values.iter().map(|v| format!("{:.6}", v)))
        }

        pub fn deserialize<'de, D: Deserializer<'de>>(
            deserializer: D,
        ) -> Result<Vec<f64>, D::Error> {
            Vec::<String>::deserialize(deserializer)?
                .iter()
                .map(|s| s.parse().map_err(serde::de::Error::custom))
                .collect()
        }
    }
}

/// one scored pairing translated back to category strings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entry {
    /// meta-field names of the two sides
    pub fields: (Vec<String>, Vec<String>),
    /// category tuples of the two sides, one tuple per meta-field
    pub modalities: (Vec<Vec<String>>, Vec<Vec<String>>),
    #[serde(with = "decimal")]
    pub score: f64,
    pub cardinality: Count,
}

impl From<(&Pairing, &Codebook)> for Entry {
    fn from((pairing, codebook): (&Pairing, &Codebook)) -> Self {
        let names = |side: &[Modality]| {
            side.iter()
                .map(|m| codebook.field(m.field).name().to_string())
                .collect::<Vec<_>>()
        };
        let categories = |side: &[Modality]| {
            side.iter()
                .map(|m| codebook.field(m.field).decode(m.value).to_vec())
                .collect::<Vec<_>>()
        };
        Self {
            fields: (names(&pairing.lhs), names(&pairing.rhs)),
            modalities: (categories(&pairing.lhs), categories(&pairing.rhs)),
            score: pairing.score,
            cardinality: pairing.cardinality,
        }
    }
}

/// one score group with the per-level ranks of its members
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Group {
    pub members: Vec<Entry>,
    /// (rank, size of the head it was ranked in) per member
    pub ranks: Vec<(usize, usize)>,
    pub score: usize,
}

/// self-describing export of one mining run: where the records came
/// from, the parameters, the head scores per level, and the groupings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    /// source table identifier
    pub table: String,
    /// query that produced the input records
    pub query: String,
    /// meta-field names considered
    pub fields: Vec<String>,
    pub t_alpha: Count,
    pub firsts_n: usize,
    /// chosen mutual-information cutoffs, levels 2.. in order
    #[serde(with = "decimal::list")]
    pub mus: Vec<f64>,
    /// top scores per level
    pub levels: BTreeMap<usize, Vec<Entry>>,
    pub groups: Vec<Group>,
}

impl Report {
    pub fn save(&self, path: &std::path::Path) -> Result<(), Error> {
        std::fs::write(path, self.render()?)?;
        Ok(())
    }

    pub fn load(path: &std::path::Path) -> Result<Self, Error> {
        Ok(serde_json::from_str(&std::fs::read_to_string(path)?)?)
    }

    /// canonical textual form
    pub fn render(&self) -> Result<String, Error> {
        let mut text = serde_json::to_string_pretty(self)?;
        text.push('\n');
        Ok(text)
    }
}

impl std::fmt::Display for Report {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        writeln!(f, "table:    {}", self.table)?;
        writeln!(f, "query:    {}", self.query)?;
        writeln!(f, "fields:   {}", self.fields.join(", "))?;
        writeln!(f, "t_alpha:  {}", self.t_alpha)?;
        writeln!(f, "firsts_n: {}", self.firsts_n)?;
        let mus = self
            .mus
            .iter()
            .map(|mu| format!("{:.6}", mu))
            .collect::<Vec<_>>();
        writeln!(f, "mus:      {}", mus.join(", "))?;
        for (level, entries) in self.levels.iter() {
            writeln!(f, "\nlevel {}", level)?;
            for (rank, entry) in entries.iter().enumerate() {
                writeln!(f, "{:>4}. {}", rank, entry)?;
            }
        }
        for (index, group) in self.groups.iter().enumerate() {
            writeln!(f, "\ngroup {} (score {})", index, group.score)?;
            for (entry, (rank, of)) in group.members.iter().zip(group.ranks.iter()) {
                writeln!(f, "{:>4}/{:<4} {}", rank, of, entry)?;
            }
        }
        Ok(())
    }
}

impl std::fmt::Display for Entry {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        let side = |fields: &[String], modalities: &[Vec<String>]| {
            fields
                .iter()
                .zip(modalities.iter())
                .map(|(name, tuple)| format!("{}={}", name, tuple.join("/")))
                .collect::<Vec<_>>()
                .join(" ")
        };
        write!(
            f,
            "({}) ~ ({}) score {:.6} x{}",
            side(&self.fields.0, &self.modalities.0),
            side(&self.fields.1, &self.modalities.1),
            self.score,
            self.cardinality
        )
    }
}
