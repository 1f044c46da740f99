use std::env;
use std::path::PathBuf;

use chrono::NaiveDate;

use crate::age::{default_reference_date, parse_reference_date};
use crate::trend::DEFAULT_RESOLUTION;
use crate::views::{AGE_SLIDER_MAX, AGE_SLIDER_MIN};

pub const DEFAULT_DATASET_PATH: &str = "ea_sports_fc_player_ratings.csv";
pub const DEFAULT_DEMO_PLAYERS: usize = 600;
pub const DEMO_SEED: u64 = 25;

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub dataset_path: PathBuf,
    pub lookup_tables_path: Option<PathBuf>,
    pub reference_date: NaiveDate,
    pub trend_resolution: usize,
    pub age_min: u32,
    pub age_max: u32,
    // Set when the synthetic dataset was requested explicitly.
    pub demo_players: Option<usize>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            dataset_path: PathBuf::from(DEFAULT_DATASET_PATH),
            lookup_tables_path: None,
            reference_date: default_reference_date(),
            trend_resolution: DEFAULT_RESOLUTION,
            age_min: AGE_SLIDER_MIN,
            age_max: AGE_SLIDER_MAX,
            demo_players: None,
        }
    }
}

impl AppConfig {
    /// Reads `FC25_*` variables. Call after `dotenvy` has loaded any env files.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Same rules as `from_env`, reading values through `lookup`.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let get = |key: &str| {
            lookup(key)
                .map(|raw| raw.trim().to_string())
                .filter(|raw| !raw.is_empty())
        };

        let dataset_path = get("FC25_DATASET_PATH")
            .map(PathBuf::from)
            .unwrap_or(defaults.dataset_path);
        let lookup_tables_path = get("FC25_LOOKUP_TABLES").map(PathBuf::from);
        let reference_date = get("FC25_REFERENCE_DATE")
            .and_then(|raw| parse_reference_date(&raw))
            .unwrap_or(defaults.reference_date);
        let trend_resolution = parse_or_default(
            get("FC25_TREND_RESOLUTION"),
            defaults.trend_resolution,
        )
        .clamp(2, 1000);

        let mut age_min = parse_or_default(get("FC25_AGE_MIN"), defaults.age_min);
        let mut age_max = parse_or_default(get("FC25_AGE_MAX"), defaults.age_max);
        if age_min >= age_max {
            age_min = defaults.age_min;
            age_max = defaults.age_max;
        }

        let demo_players = get("FC25_DEMO_PLAYERS")
            .and_then(|raw| raw.parse::<usize>().ok())
            .filter(|n| *n > 0);

        Self {
            dataset_path,
            lookup_tables_path,
            reference_date,
            trend_resolution,
            age_min,
            age_max,
            demo_players,
        }
    }
}

pub fn load_env_files() {
    let _ = dotenvy::from_filename(".env.local");
    let _ = dotenvy::from_filename(".env");
}

fn parse_or_default<T: std::str::FromStr>(raw: Option<String>, default: T) -> T {
    raw.and_then(|raw| raw.parse::<T>().ok()).unwrap_or(default)
}
