use std::collections::HashMap;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::dataset::Gender;

pub const LOOKUP_TABLES_VERSION: u32 = 1;

static BUILTIN: Lazy<LookupTables> = Lazy::new(|| {
    LookupTables::from_json_str(include_str!("../assets/lookup_tables_v1.json"))
        .expect("embedded lookup tables are valid")
});

#[derive(Debug, Error)]
pub enum LookupError {
    #[error("malformed lookup tables: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("unsupported lookup tables version {found} (expected {expected})")]
    UnsupportedVersion { found: u32, expected: u32 },
    #[error("table '{table}' has an empty default bucket")]
    EmptyDefault { table: &'static str },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BucketSpec {
    pub label: String,
    pub members: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableSpec {
    pub default: String,
    pub buckets: Vec<BucketSpec>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LookupTablesArtifact {
    pub version: u32,
    pub region: TableSpec,
    pub league_men: TableSpec,
    pub league_women: TableSpec,
}

/// A member listed under more than one bucket. The earlier bucket wins.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DuplicateEntry {
    pub member: String,
    pub kept: String,
    pub ignored: String,
}

#[derive(Debug, Clone)]
pub struct BucketTable {
    default: String,
    labels: Vec<String>,
    index: HashMap<String, usize>,
    duplicates: Vec<DuplicateEntry>,
}

impl BucketTable {
    pub fn from_spec(spec: &TableSpec) -> Self {
        let mut labels = Vec::with_capacity(spec.buckets.len());
        let mut index = HashMap::new();
        let mut duplicates = Vec::new();

        for (bucket_idx, bucket) in spec.buckets.iter().enumerate() {
            labels.push(bucket.label.clone());
            for member in &bucket.members {
                match index.get(member) {
                    None => {
                        index.insert(member.clone(), bucket_idx);
                    }
                    Some(&kept_idx) if kept_idx != bucket_idx => {
                        duplicates.push(DuplicateEntry {
                            member: member.clone(),
                            kept: spec.buckets[kept_idx].label.clone(),
                            ignored: bucket.label.clone(),
                        });
                    }
                    Some(_) => {}
                }
            }
        }

        Self {
            default: spec.default.clone(),
            labels,
            index,
            duplicates,
        }
    }

    /// Exact, case-sensitive allowlist lookup; unmatched input lands in the default bucket.
    pub fn classify(&self, raw: &str) -> &str {
        match self.index.get(raw) {
            Some(&idx) => &self.labels[idx],
            None => &self.default,
        }
    }

    pub fn default_label(&self) -> &str {
        &self.default
    }

    /// Bucket labels in priority order, followed by the default bucket.
    pub fn labels(&self) -> Vec<&str> {
        let mut out: Vec<&str> = self.labels.iter().map(String::as_str).collect();
        if !out.contains(&self.default.as_str()) {
            out.push(&self.default);
        }
        out
    }

    pub fn members(&self) -> usize {
        self.index.len()
    }

    pub fn duplicates(&self) -> &[DuplicateEntry] {
        &self.duplicates
    }
}

#[derive(Debug, Clone)]
pub struct LookupTables {
    pub version: u32,
    pub region: BucketTable,
    pub league_men: BucketTable,
    pub league_women: BucketTable,
}

impl LookupTables {
    /// Canonical tables compiled into the binary.
    pub fn builtin() -> &'static LookupTables {
        &BUILTIN
    }

    pub fn from_artifact(artifact: &LookupTablesArtifact) -> Result<Self, LookupError> {
        if artifact.version != LOOKUP_TABLES_VERSION {
            return Err(LookupError::UnsupportedVersion {
                found: artifact.version,
                expected: LOOKUP_TABLES_VERSION,
            });
        }
        for (name, spec) in [
            ("region", &artifact.region),
            ("league_men", &artifact.league_men),
            ("league_women", &artifact.league_women),
        ] {
            if spec.default.trim().is_empty() {
                return Err(LookupError::EmptyDefault { table: name });
            }
        }

        let tables = Self {
            version: artifact.version,
            region: BucketTable::from_spec(&artifact.region),
            league_men: BucketTable::from_spec(&artifact.league_men),
            league_women: BucketTable::from_spec(&artifact.league_women),
        };
        for (name, table) in tables.named_tables() {
            for dup in table.duplicates() {
                log::warn!(
                    "lookup table {name}: '{}' listed under '{}' and '{}', keeping '{}'",
                    dup.member,
                    dup.kept,
                    dup.ignored,
                    dup.kept
                );
            }
        }
        Ok(tables)
    }

    pub fn from_json_str(raw: &str) -> Result<Self, LookupError> {
        let artifact = serde_json::from_str::<LookupTablesArtifact>(raw)?;
        Self::from_artifact(&artifact)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("read lookup tables {}", path.display()))?;
        Self::from_json_str(&raw)
            .with_context(|| format!("parse lookup tables {}", path.display()))
    }

    pub fn classify_region(&self, nation: &str) -> &str {
        self.region.classify(nation)
    }

    /// Picks the men's or women's team table before matching, so shared club names resolve
    /// per gender.
    pub fn classify_league(&self, team: &str, gender: Gender) -> &str {
        self.league_table(gender).classify(team)
    }

    pub fn league_table(&self, gender: Gender) -> &BucketTable {
        match gender {
            Gender::Men => &self.league_men,
            Gender::Women => &self.league_women,
        }
    }

    fn named_tables(&self) -> [(&'static str, &BucketTable); 3] {
        [
            ("region", &self.region),
            ("league_men", &self.league_men),
            ("league_women", &self.league_women),
        ]
    }
}
