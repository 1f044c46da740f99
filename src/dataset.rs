use std::collections::HashMap;
use std::fmt;
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::age;
use crate::attributes::{ATTRIBUTE_COUNT, Attribute};

pub const COL_NAME: &str = "Name";
pub const COL_NATION: &str = "Nation";
pub const COL_TEAM: &str = "Team";
pub const COL_GENDER: &str = "Gender";
pub const COL_BIRTHDATE: &str = "Birthdate";
pub const COL_POSITION: &str = "Position";

const REQUIRED_COLUMNS: [&str; 6] = [
    COL_NAME,
    COL_NATION,
    COL_TEAM,
    COL_GENDER,
    COL_BIRTHDATE,
    COL_POSITION,
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Gender {
    Men,
    Women,
}

impl Gender {
    pub const BOTH: [Gender; 2] = [Gender::Men, Gender::Women];

    /// Value used in the ratings file.
    pub fn label(self) -> &'static str {
        match self {
            Gender::Men => "Men's Football",
            Gender::Women => "Women's Football",
        }
    }

    pub fn short_label(self) -> &'static str {
        match self {
            Gender::Men => "Men",
            Gender::Women => "Women",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "men's football" | "men" | "m" | "male" => Some(Gender::Men),
            "women's football" | "women" | "w" | "f" | "female" => Some(Gender::Women),
            _ => None,
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.short_label())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlayerRecord {
    pub name: String,
    pub nation: String,
    pub team: String,
    pub gender: Option<Gender>,
    pub birth_date: Option<NaiveDate>,
    pub position: String,
    ratings: [Option<f64>; ATTRIBUTE_COUNT],
}

impl PlayerRecord {
    pub fn new(
        name: impl Into<String>,
        nation: impl Into<String>,
        team: impl Into<String>,
        gender: Option<Gender>,
        birth_date: Option<NaiveDate>,
        position: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            nation: nation.into(),
            team: team.into(),
            gender,
            birth_date,
            position: position.into(),
            ratings: [None; ATTRIBUTE_COUNT],
        }
    }

    pub fn with_attribute(mut self, attr: Attribute, value: f64) -> Self {
        self.set_attribute(attr, Some(value));
        self
    }

    pub fn set_attribute(&mut self, attr: Attribute, value: Option<f64>) {
        self.ratings[attr.index()] = value.filter(|v| v.is_finite());
    }

    pub fn attribute(&self, attr: Attribute) -> Option<f64> {
        self.ratings[attr.index()]
    }

    pub fn is_goalkeeper(&self) -> bool {
        self.position.trim().eq_ignore_ascii_case("GK")
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DatasetSource {
    Csv(PathBuf),
    Synthetic { seed: u64, players: usize },
    InMemory,
}

/// Row-level problems tolerated while reading the ratings file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadSummary {
    pub rows_read: usize,
    pub rows_skipped: usize,
    pub unknown_gender: usize,
    pub unparsed_birth_dates: usize,
    pub missing_attribute_columns: Vec<Attribute>,
}

/// The process-lifetime player table. Built once, then only borrowed.
#[derive(Debug, Clone)]
pub struct Dataset {
    players: Vec<PlayerRecord>,
    source: DatasetSource,
}

impl Dataset {
    pub fn from_players(players: Vec<PlayerRecord>) -> Self {
        Self {
            players,
            source: DatasetSource::InMemory,
        }
    }

    pub fn with_source(players: Vec<PlayerRecord>, source: DatasetSource) -> Self {
        Self { players, source }
    }

    pub fn players(&self) -> &[PlayerRecord] {
        &self.players
    }

    pub fn len(&self) -> usize {
        self.players.len()
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }

    pub fn source(&self) -> &DatasetSource {
        &self.source
    }

    pub fn load_csv(path: &Path) -> Result<(Self, LoadSummary)> {
        let file =
            File::open(path).with_context(|| format!("open dataset {}", path.display()))?;
        let (mut dataset, summary) = Self::from_reader(file)
            .with_context(|| format!("read dataset {}", path.display()))?;
        dataset.source = DatasetSource::Csv(path.to_path_buf());
        Ok((dataset, summary))
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<(Self, LoadSummary)> {
        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let headers = rdr.headers().context("read csv header")?.clone();
        let columns: HashMap<&str, usize> = headers
            .iter()
            .enumerate()
            .map(|(idx, name)| (name, idx))
            .collect();

        let mut required = [0usize; REQUIRED_COLUMNS.len()];
        for (slot, name) in required.iter_mut().zip(REQUIRED_COLUMNS) {
            *slot = *columns
                .get(name)
                .ok_or_else(|| anyhow!("missing required column '{name}'"))?;
        }
        let [name_col, nation_col, team_col, gender_col, birth_col, position_col] = required;

        let mut summary = LoadSummary::default();
        let attribute_cols: Vec<(Attribute, usize)> = Attribute::ALL
            .iter()
            .filter_map(|attr| match columns.get(attr.label()) {
                Some(idx) => Some((*attr, *idx)),
                None => {
                    summary.missing_attribute_columns.push(*attr);
                    None
                }
            })
            .collect();
        if !summary.missing_attribute_columns.is_empty() {
            log::warn!(
                "dataset has no column for {} attribute(s): {:?}",
                summary.missing_attribute_columns.len(),
                summary.missing_attribute_columns
            );
        }

        let mut players = Vec::new();
        for row in rdr.records() {
            let record = match row {
                Ok(record) => record,
                Err(err) => {
                    summary.rows_skipped += 1;
                    log::warn!("skipping undecodable dataset row: {err}");
                    continue;
                }
            };
            summary.rows_read += 1;
            let cell = |idx: usize| record.get(idx).unwrap_or("");

            let gender = Gender::parse(cell(gender_col));
            if gender.is_none() {
                summary.unknown_gender += 1;
            }
            let raw_birth = cell(birth_col);
            let birth_date = age::parse_birth_date(raw_birth);
            if birth_date.is_none() && !raw_birth.is_empty() {
                summary.unparsed_birth_dates += 1;
            }

            let mut player = PlayerRecord::new(
                cell(name_col),
                cell(nation_col),
                cell(team_col),
                gender,
                birth_date,
                cell(position_col),
            );
            for (attr, idx) in &attribute_cols {
                player.set_attribute(*attr, parse_rating(cell(*idx)));
            }
            players.push(player);
        }

        log::debug!(
            "dataset loaded: {} rows, {} skipped, {} unknown gender, {} bad birth dates",
            summary.rows_read,
            summary.rows_skipped,
            summary.unknown_gender,
            summary.unparsed_birth_dates
        );
        Ok((Self::from_players(players), summary))
    }
}

pub fn parse_rating(raw: &str) -> Option<f64> {
    let cleaned = raw.trim();
    if cleaned.is_empty() {
        return None;
    }
    cleaned.parse::<f64>().ok().filter(|v| v.is_finite())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gender_accepts_file_and_short_forms() {
        assert_eq!(Gender::parse("Men's Football"), Some(Gender::Men));
        assert_eq!(Gender::parse("women's football"), Some(Gender::Women));
        assert_eq!(Gender::parse("F"), Some(Gender::Women));
        assert_eq!(Gender::parse("Mixed"), None);
    }

    #[test]
    fn rating_cells_tolerate_blanks_and_garbage() {
        assert_eq!(parse_rating("87"), Some(87.0));
        assert_eq!(parse_rating(" 71.5 "), Some(71.5));
        assert_eq!(parse_rating(""), None);
        assert_eq!(parse_rating("n/a"), None);
        assert_eq!(parse_rating("NaN"), None);
    }

    #[test]
    fn goalkeeper_check_ignores_case() {
        let gk = PlayerRecord::new("A", "B", "C", Some(Gender::Men), None, "gk");
        let st = PlayerRecord::new("A", "B", "C", Some(Gender::Men), None, "ST");
        assert!(gk.is_goalkeeper());
        assert!(!st.is_goalkeeper());
    }
}
