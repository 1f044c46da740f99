use std::collections::HashMap;
use std::path::PathBuf;

use chrono::NaiveDate;

use fc25_lens::config::{AppConfig, DEFAULT_DEMO_PLAYERS};
use fc25_lens::dataset::DatasetSource;
use fc25_lens::store::DataStore;

fn fixture_path(name: &str) -> PathBuf {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("tests");
    path.push("fixtures");
    path.push(name);
    path
}

fn config_from(pairs: &[(&str, &str)]) -> AppConfig {
    let vars: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    AppConfig::from_lookup(|key| vars.get(key).cloned())
}

#[test]
fn empty_environment_gives_defaults() {
    assert_eq!(config_from(&[]), AppConfig::default());
}

#[test]
fn reads_every_setting() {
    let cfg = config_from(&[
        ("FC25_DATASET_PATH", "ratings.csv"),
        ("FC25_LOOKUP_TABLES", "tables.json"),
        ("FC25_REFERENCE_DATE", "2025-01-15"),
        ("FC25_TREND_RESOLUTION", "50"),
        ("FC25_AGE_MIN", "20"),
        ("FC25_AGE_MAX", "30"),
        ("FC25_DEMO_PLAYERS", "40"),
    ]);
    assert_eq!(cfg.dataset_path, PathBuf::from("ratings.csv"));
    assert_eq!(cfg.lookup_tables_path, Some(PathBuf::from("tables.json")));
    assert_eq!(cfg.reference_date, NaiveDate::from_ymd_opt(2025, 1, 15).unwrap());
    assert_eq!(cfg.trend_resolution, 50);
    assert_eq!((cfg.age_min, cfg.age_max), (20, 30));
    assert_eq!(cfg.demo_players, Some(40));
}

#[test]
fn trend_resolution_is_clamped() {
    let low = config_from(&[("FC25_TREND_RESOLUTION", "1")]);
    assert_eq!(low.trend_resolution, 2);
    let high = config_from(&[("FC25_TREND_RESOLUTION", "5000")]);
    assert_eq!(high.trend_resolution, 1000);
    let junk = config_from(&[("FC25_TREND_RESOLUTION", "lots")]);
    assert_eq!(junk.trend_resolution, 100);
}

#[test]
fn inverted_age_bounds_fall_back_to_defaults() {
    let cfg = config_from(&[("FC25_AGE_MIN", "30"), ("FC25_AGE_MAX", "30")]);
    assert_eq!((cfg.age_min, cfg.age_max), (17, 43));
    let cfg = config_from(&[("FC25_AGE_MIN", "35"), ("FC25_AGE_MAX", "20")]);
    assert_eq!((cfg.age_min, cfg.age_max), (17, 43));
}

#[test]
fn unparseable_values_fall_back() {
    let cfg = config_from(&[
        ("FC25_REFERENCE_DATE", "01/10/2024"),
        ("FC25_DEMO_PLAYERS", "0"),
        ("FC25_DATASET_PATH", "   "),
    ]);
    let defaults = AppConfig::default();
    assert_eq!(cfg.reference_date, defaults.reference_date);
    assert_eq!(cfg.demo_players, None);
    assert_eq!(cfg.dataset_path, defaults.dataset_path);
}

#[test]
fn missing_dataset_falls_back_to_synthetic_players() {
    let cfg = AppConfig {
        dataset_path: fixture_path("no_such_ratings.csv"),
        ..AppConfig::default()
    };
    let store = DataStore::open(cfg).unwrap();
    assert_eq!(store.dataset.len(), DEFAULT_DEMO_PLAYERS);
    assert!(matches!(
        store.dataset.source(),
        DatasetSource::Synthetic { .. }
    ));
    assert!(store.load_summary.is_none());
    assert!(store
        .load_notes()
        .iter()
        .any(|note| note.starts_with("[INFO]")));
}

#[test]
fn demo_players_override_the_csv() {
    let cfg = AppConfig {
        dataset_path: fixture_path("players_small.csv"),
        demo_players: Some(25),
        ..AppConfig::default()
    };
    let store = DataStore::open(cfg).unwrap();
    assert_eq!(store.dataset.len(), 25);
}

#[test]
fn opens_csv_with_alternate_tables() {
    let cfg = AppConfig {
        dataset_path: fixture_path("players_small.csv"),
        lookup_tables_path: Some(fixture_path("lookup_tables_alt.json")),
        ..AppConfig::default()
    };
    let store = DataStore::open(cfg).unwrap();
    assert_eq!(store.dataset.len(), 9);
    assert_eq!(store.tables.classify_region("Morocco"), "Maghreb");
    assert!(store.load_summary.is_some());

    let notes = store.load_notes();
    assert!(notes.iter().any(|n| n.contains("duplicate entries in region table")));
    assert!(notes.iter().any(|n| n.contains("unknown gender")));
}

#[test]
fn wrong_table_version_fails_to_open() {
    let cfg = AppConfig {
        dataset_path: fixture_path("players_small.csv"),
        lookup_tables_path: Some(fixture_path("lookup_tables_future.json")),
        ..AppConfig::default()
    };
    let err = DataStore::open(cfg).unwrap_err();
    assert!(format!("{err:#}").contains("unsupported lookup tables version 2"));
}
