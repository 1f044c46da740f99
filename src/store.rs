use anyhow::{Context, Result};

use crate::config::{AppConfig, DEFAULT_DEMO_PLAYERS, DEMO_SEED};
use crate::dataset::{Dataset, DatasetSource, LoadSummary};
use crate::fake_dataset;
use crate::lookup::LookupTables;
use crate::views::ViewContext;

/// Read-only data shared by every view for the lifetime of the process.
#[derive(Debug, Clone)]
pub struct DataStore {
    pub dataset: Dataset,
    pub tables: LookupTables,
    pub config: AppConfig,
    pub load_summary: Option<LoadSummary>,
}

impl DataStore {
    pub fn new(dataset: Dataset, tables: LookupTables, config: AppConfig) -> Self {
        Self {
            dataset,
            tables,
            config,
            load_summary: None,
        }
    }

    /// Loads tables and the ratings file. A missing ratings file falls back to the
    /// synthetic dataset; a present but unreadable one is an error.
    pub fn open(config: AppConfig) -> Result<Self> {
        let tables = match &config.lookup_tables_path {
            Some(path) => LookupTables::load(path)?,
            None => LookupTables::builtin().clone(),
        };

        let (dataset, load_summary) = match config.demo_players {
            Some(players) => (fake_dataset::generate(players, DEMO_SEED), None),
            None if config.dataset_path.exists() => {
                let (dataset, summary) = Dataset::load_csv(&config.dataset_path)
                    .context("load player ratings")?;
                (dataset, Some(summary))
            }
            None => {
                log::warn!(
                    "dataset {} not found, using {} synthetic players",
                    config.dataset_path.display(),
                    DEFAULT_DEMO_PLAYERS
                );
                (fake_dataset::generate(DEFAULT_DEMO_PLAYERS, DEMO_SEED), None)
            }
        };

        Ok(Self {
            dataset,
            tables,
            config,
            load_summary,
        })
    }

    pub fn context(&self) -> ViewContext<'_> {
        let mut ctx = ViewContext::new(&self.dataset, &self.tables, self.config.reference_date);
        ctx.resolution = self.config.trend_resolution;
        ctx
    }

    /// One-line description of where the rows came from.
    pub fn describe(&self) -> String {
        let source = match self.dataset.source() {
            DatasetSource::Csv(path) => path.display().to_string(),
            DatasetSource::Synthetic { seed, .. } => format!("synthetic (seed {seed})"),
            DatasetSource::InMemory => "in-memory".to_string(),
        };
        format!(
            "{} players from {} | tables v{} | reference {}",
            self.dataset.len(),
            source,
            self.tables.version,
            self.config.reference_date
        )
    }

    pub fn load_notes(&self) -> Vec<String> {
        let mut notes = Vec::new();
        if let DatasetSource::Synthetic { .. } = self.dataset.source() {
            notes.push("[INFO] Showing synthetic players".to_string());
        }
        for (name, table) in [
            ("region", &self.tables.region),
            ("men's leagues", &self.tables.league_men),
            ("women's leagues", &self.tables.league_women),
        ] {
            if !table.duplicates().is_empty() {
                notes.push(format!(
                    "[WARN] {} duplicate entries in {name} table",
                    table.duplicates().len()
                ));
            }
        }
        let Some(summary) = &self.load_summary else {
            return notes;
        };
        if summary.rows_skipped > 0 {
            notes.push(format!("[WARN] Skipped {} unreadable rows", summary.rows_skipped));
        }
        if summary.unknown_gender > 0 {
            notes.push(format!(
                "[WARN] {} rows with unknown gender excluded from gender views",
                summary.unknown_gender
            ));
        }
        if summary.unparsed_birth_dates > 0 {
            notes.push(format!(
                "[WARN] {} birth dates could not be parsed",
                summary.unparsed_birth_dates
            ));
        }
        if !summary.missing_attribute_columns.is_empty() {
            notes.push(format!(
                "[WARN] {} attribute columns missing",
                summary.missing_attribute_columns.len()
            ));
        }
        notes
    }
}
