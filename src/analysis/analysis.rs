use crate::analysis::report::Entry;
use crate::analysis::report::Group;
use crate::analysis::report::Report;
use crate::error::Error;
use crate::mining::cache::Cache;
use crate::mining::cache::Table;
use crate::mining::contingency::ContingencyTable;
use crate::mining::grouping::collapse;
use crate::mining::grouping::PairingGroup;
use crate::mining::mutual::MutualInfo;
use crate::mining::pairing::Pairing;
use crate::mining::pairing::Pairings;
use crate::records::codebook::Codebook;
use crate::records::source::Records;
use crate::tree::tree::AdTree;
use crate::Count;
use crate::Information;

/// mining parameters, passed explicitly through the pipeline
#[derive(Debug, Clone, Copy)]
pub struct Config {
    /// deepest attribute-subset size to cache and score
    pub max_level: usize,
    /// minimum marginal support for a joint modality to be scored
    pub t_alpha: Count,
    /// how many head scores per level feed the groupings
    pub firsts_n: usize,
    /// how the mutual-information cutoff is chosen
    pub threshold: Threshold,
}

/// choice of the per-level mutual-information cutoff μ
#[derive(Debug, Clone, Copy)]
pub enum Threshold {
    /// one fixed μ for every level
    Fixed(Information),
    /// elbow of the sorted curve; a level with no elbow keeps everything
    Elbow {
        prominence: f64,
        separation: Option<usize>,
    },
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_level: crate::MAX_LEVEL,
            t_alpha: crate::T_ALPHA,
            firsts_n: crate::FIRSTS_N,
            threshold: Threshold::Elbow {
                prominence: crate::ELBOW_PROMINENCE,
                separation: None,
            },
        }
    }
}

/// the full mining pipeline over one record table, built once and then
/// read-only: AD-tree, cache of contingency tables, mutual-information
/// gate, pairing scores per level, and the cross-level groupings.
pub struct Analysis<'a, R: Records> {
    records: &'a R,
    tree: AdTree<'a, R>,
    cache: Cache,
    mutuals: Vec<MutualInfo>,
    pairings: Vec<Pairings>,
    mus: Vec<Information>,
    groups: Vec<PairingGroup>,
    config: Config,
}

impl<'a, R: Records> Analysis<'a, R> {
    pub fn new(records: &'a R, config: Config) -> Result<Self, Error> {
        let tree = AdTree::new(records)?;
        let cache = Cache::new(&tree, config.max_level)?;
        let mut mutuals = Vec::new();
        let mut pairings = Vec::new();
        let mut mus = Vec::new();
        for level in 2..=config.max_level {
            log::info!("{:<32}{:<32}", "scoring level", level);
            let mutual = MutualInfo::new(&cache, level);
            let mu = match config.threshold {
                Threshold::Fixed(mu) => mu,
                Threshold::Elbow {
                    prominence,
                    separation,
                } => mutual.threshold(prominence, separation).unwrap_or(0.0),
            };
            let keep = mutual.keep(mu);
            pairings.push(Pairings::new(&cache, level, config.t_alpha, &keep));
            mutuals.push(mutual);
            mus.push(mu);
        }
        let levels = pairings
            .iter()
            .map(|p| (p.level(), p.scores()))
            .collect::<Vec<_>>();
        let groups = collapse(&levels, config.firsts_n);
        Ok(Self {
            records,
            tree,
            cache,
            mutuals,
            pairings,
            mus,
            groups,
            config,
        })
    }

    pub fn records(&self) -> &R {
        self.records
    }
    pub fn tree(&self) -> &AdTree<'a, R> {
        &self.tree
    }
    pub fn cache(&self) -> &Cache {
        &self.cache
    }
    pub fn config(&self) -> &Config {
        &self.config
    }
    /// chosen μ per level, levels 2.. in order
    pub fn mus(&self) -> &[Information] {
        &self.mus
    }
    pub fn mutual(&self, level: usize) -> Option<&MutualInfo> {
        self.mutuals.iter().find(|m| m.level() == level)
    }
    /// ranked pairing list of one level
    pub fn pairings(&self, level: usize) -> Option<&Pairings> {
        self.pairings.iter().find(|p| p.level() == level)
    }
    pub fn groups(&self) -> &[PairingGroup] {
        &self.groups
    }

    /// joint-count table of an arbitrary subset: served from the cache
    /// when present, materialized from the tree otherwise
    pub fn contingency(&self, fields: &[usize]) -> Result<Table, Error> {
        match self.cache.table(fields) {
            Some(table) => Ok(table.clone()),
            None => Ok(ContingencyTable::new(&self.tree, fields)?.table()),
        }
    }

    /// indices of the records matching every modality of a pairing
    pub fn rows(&self, pairing: &Pairing) -> Vec<usize> {
        (0..self.records.len())
            .filter(|&row| {
                pairing
                    .lhs
                    .iter()
                    .chain(pairing.rhs.iter())
                    .all(|m| self.records.value(row, m.field) == m.value)
            })
            .collect()
    }

    /// human-readable export of the head scores and groupings
    pub fn report(&self, table: &str, query: &str, codebook: &Codebook) -> Report {
        let levels = self
            .pairings
            .iter()
            .map(|scored| {
                let entries = scored
                    .top(self.config.firsts_n)
                    .iter()
                    .map(|pairing| Entry::from((pairing, codebook)))
                    .collect::<Vec<_>>();
                (scored.level(), entries)
            })
            .collect();
        let groups = self
            .groups
            .iter()
            .map(|group| Group {
                members: group
                    .members
                    .iter()
                    .map(|(pairing, _)| Entry::from((pairing, codebook)))
                    .collect(),
                ranks: group
                    .members
                    .iter()
                    .map(|(_, rank)| (*rank, self.config.firsts_n))
                    .collect(),
                score: group.score,
            })
            .collect();
        Report {
            table: table.to_string(),
            query: query.to_string(),
            fields: codebook.names().iter().map(|n| n.to_string()).collect(),
            t_alpha: self.config.t_alpha,
            firsts_n: self.config.firsts_n,
            mus: self.mus.clone(),
            levels,
            groups,
        }
    }
}
