use std::collections::HashMap;
use std::fmt;

use serde::Serialize;

use crate::attributes::Attribute;
use crate::dataset::Gender;
use crate::derived::EnrichedPlayer;
use crate::selection::{Selection, SelectionError};

pub const DEFAULT_MIN_ATTRIBUTES: usize = 1;
pub const DEFAULT_MAX_ATTRIBUTES: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttributeLimits {
    pub min: usize,
    pub max: usize,
}

impl Default for AttributeLimits {
    fn default() -> Self {
        Self {
            min: DEFAULT_MIN_ATTRIBUTES,
            max: DEFAULT_MAX_ATTRIBUTES,
        }
    }
}

impl AttributeLimits {
    pub fn check(&self, attributes: &[Attribute]) -> Result<Vec<Attribute>, SelectionError> {
        let mut out: Vec<Attribute> = Vec::with_capacity(attributes.len());
        for attr in attributes {
            if !out.contains(attr) {
                out.push(*attr);
            }
        }
        if out.len() < self.min.max(1) {
            return Err(SelectionError::NoAttributes { min: self.min.max(1) });
        }
        if out.len() > self.max {
            return Err(SelectionError::TooManyAttributes {
                max: self.max,
                got: out.len(),
            });
        }
        Ok(out)
    }

    /// Whether picking "All" can ever pass `check`.
    pub fn allows_all(&self) -> bool {
        Attribute::ALL.len() <= self.max
    }

    /// "All" expands to the whole vocabulary and is then held to the same bounds.
    pub fn resolve(&self, selection: &Selection<Attribute>) -> Result<Vec<Attribute>, SelectionError> {
        self.check(&selection.resolve(&Attribute::ALL))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GroupField {
    Region,
    League,
    Gender,
    Age,
    Nation,
    Team,
    Position,
}

impl GroupField {
    pub fn label(self) -> &'static str {
        match self {
            GroupField::Region => "Region",
            GroupField::League => "League",
            GroupField::Gender => "Gender",
            GroupField::Age => "Age",
            GroupField::Nation => "Nation",
            GroupField::Team => "Team",
            GroupField::Position => "Position",
        }
    }

    /// `None` means the row has no value for this field and joins no group.
    pub fn key(self, row: &EnrichedPlayer<'_>) -> Option<GroupKey> {
        match self {
            GroupField::Region => Some(GroupKey::Label(row.region.to_string())),
            GroupField::League => row.league.map(|l| GroupKey::Label(l.to_string())),
            GroupField::Gender => row.gender().map(GroupKey::Gender),
            GroupField::Age => row.age.map(GroupKey::Age),
            GroupField::Nation => Some(GroupKey::Label(row.record.nation.clone())),
            GroupField::Team => Some(GroupKey::Label(row.record.team.clone())),
            GroupField::Position => Some(GroupKey::Label(row.record.position.clone())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum GroupKey {
    Label(String),
    Gender(Gender),
    Age(i32),
}

impl fmt::Display for GroupKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GroupKey::Label(label) => f.write_str(label),
            GroupKey::Gender(gender) => write!(f, "{gender}"),
            GroupKey::Age(age) => write!(f, "{age}"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupOrder {
    FirstSeen,
    Sorted,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AttributeMean {
    pub attribute: Attribute,
    // Missing when no row in the group has a value; never coerced to zero.
    pub mean: Option<f64>,
    pub samples: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AggregateRow {
    pub key: GroupKey,
    pub rows: usize,
    pub means: Vec<AttributeMean>,
}

impl AggregateRow {
    pub fn mean(&self, attribute: Attribute) -> Option<f64> {
        self.means
            .iter()
            .find(|m| m.attribute == attribute)
            .and_then(|m| m.mean)
    }
}

/// One (group, attribute, value) triple, the shape grouped bar charts consume.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LongRow {
    pub key: GroupKey,
    pub attribute: Attribute,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AggregateTable {
    pub group_by: &'static str,
    pub attributes: Vec<Attribute>,
    pub rows: Vec<AggregateRow>,
}

impl AggregateTable {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn row(&self, key: &GroupKey) -> Option<&AggregateRow> {
        self.rows.iter().find(|row| &row.key == key)
    }

    /// Melted view of the table. Missing means are left out rather than drawn as zero.
    pub fn long_rows(&self) -> Vec<LongRow> {
        let mut out = Vec::with_capacity(self.rows.len() * self.attributes.len());
        for attribute in &self.attributes {
            for row in &self.rows {
                if let Some(value) = row.mean(*attribute) {
                    out.push(LongRow {
                        key: row.key.clone(),
                        attribute: *attribute,
                        value,
                    });
                }
            }
        }
        out
    }

    /// Largest mean in the table, for axis scaling.
    pub fn max_mean(&self) -> Option<f64> {
        self.rows
            .iter()
            .flat_map(|row| row.means.iter().filter_map(|m| m.mean))
            .fold(None, |acc: Option<f64>, v| Some(acc.map_or(v, |a| a.max(v))))
    }
}

#[derive(Debug, Clone, Copy, Default)]
struct Accumulator {
    sum: f64,
    count: usize,
}

/// Per-group arithmetic means of `attributes`, skipping nulls attribute by attribute.
pub fn aggregate(
    rows: &[EnrichedPlayer<'_>],
    group_by: GroupField,
    attributes: &[Attribute],
    limits: AttributeLimits,
    order: GroupOrder,
) -> Result<AggregateTable, SelectionError> {
    let attributes = limits.check(attributes)?;

    let mut index: HashMap<GroupKey, usize> = HashMap::new();
    let mut groups: Vec<(GroupKey, usize, Vec<Accumulator>)> = Vec::new();

    for row in rows {
        let Some(key) = group_by.key(row) else {
            continue;
        };
        let slot = match index.get(&key) {
            Some(&slot) => slot,
            None => {
                groups.push((key.clone(), 0, vec![Accumulator::default(); attributes.len()]));
                index.insert(key, groups.len() - 1);
                groups.len() - 1
            }
        };
        let (_, size, accs) = &mut groups[slot];
        *size += 1;
        for (acc, attr) in accs.iter_mut().zip(&attributes) {
            if let Some(value) = row.record.attribute(*attr) {
                acc.sum += value;
                acc.count += 1;
            }
        }
    }

    let mut out: Vec<AggregateRow> = groups
        .into_iter()
        .map(|(key, size, accs)| AggregateRow {
            key,
            rows: size,
            means: accs
                .iter()
                .zip(&attributes)
                .map(|(acc, attr)| AttributeMean {
                    attribute: *attr,
                    mean: (acc.count > 0).then(|| acc.sum / acc.count as f64),
                    samples: acc.count,
                })
                .collect(),
        })
        .collect();

    if order == GroupOrder::Sorted {
        out.sort_by(|a, b| a.key.cmp(&b.key));
    }

    log::debug!(
        "aggregated {} rows into {} {} group(s) over {} attribute(s)",
        rows.len(),
        out.len(),
        group_by.label(),
        attributes.len()
    );

    Ok(AggregateTable {
        group_by: group_by.label(),
        attributes,
        rows: out,
    })
}
