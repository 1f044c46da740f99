use chrono::NaiveDate;

use crate::age::derive_age;
use crate::dataset::{Dataset, Gender, PlayerRecord};
use crate::lookup::LookupTables;

/// A player row with its derived columns attached for one request.
#[derive(Debug, Clone, Copy)]
pub struct EnrichedPlayer<'a> {
    pub record: &'a PlayerRecord,
    pub region: &'a str,
    // Only known when the row's gender is, since league tables are split by gender.
    pub league: Option<&'a str>,
    pub age: Option<i32>,
}

impl<'a> EnrichedPlayer<'a> {
    pub fn gender(&self) -> Option<Gender> {
        self.record.gender
    }
}

pub fn enrich<'a>(
    dataset: &'a Dataset,
    tables: &'a LookupTables,
    reference_date: NaiveDate,
) -> Vec<EnrichedPlayer<'a>> {
    dataset
        .players()
        .iter()
        .map(|record| enrich_one(record, tables, reference_date))
        .collect()
}

pub fn enrich_one<'a>(
    record: &'a PlayerRecord,
    tables: &'a LookupTables,
    reference_date: NaiveDate,
) -> EnrichedPlayer<'a> {
    EnrichedPlayer {
        record,
        region: tables.classify_region(&record.nation),
        league: record
            .gender
            .map(|gender| tables.classify_league(&record.team, gender)),
        age: derive_age(record.birth_date, reference_date),
    }
}
