use std::fs;
use std::path::PathBuf;

use fc25_lens::dataset::Gender;
use fc25_lens::lookup::{LookupError, LookupTables};

fn read_fixture(name: &str) -> String {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("tests");
    path.push("fixtures");
    path.push(name);
    fs::read_to_string(path).expect("fixture file should be readable")
}

#[test]
fn builtin_regions_split_africa() {
    let tables = LookupTables::builtin();
    assert_eq!(tables.classify_region("Morocco"), "North Africa");
    assert_eq!(tables.classify_region("Egypt"), "North Africa");
    assert_eq!(tables.classify_region("Nigeria"), "Rest of Africa");
    assert_eq!(tables.classify_region("Côte d'Ivoire"), "Rest of Africa");
    assert_eq!(tables.classify_region("Brazil"), "Rest of World");
}

#[test]
fn region_lookup_is_exact_and_case_sensitive() {
    let tables = LookupTables::builtin();
    assert_eq!(tables.classify_region("morocco"), "Rest of World");
    assert_eq!(tables.classify_region(" Morocco"), "Rest of World");
    assert_eq!(tables.classify_region(""), "Rest of World");
}

#[test]
fn shared_club_names_resolve_per_gender() {
    let tables = LookupTables::builtin();
    assert_eq!(tables.classify_league("Real Madrid", Gender::Men), "Spain");
    assert_eq!(
        tables.classify_league("Real Madrid", Gender::Women),
        "Rest of the World"
    );
    assert_eq!(tables.classify_league("Real Madrid CF", Gender::Women), "Spain");
    assert_eq!(tables.classify_league("Wolves", Gender::Men), "England");
    assert_eq!(
        tables.classify_league("Wolves", Gender::Women),
        "Rest of the World"
    );
    assert_eq!(tables.classify_league("Arsenal", Gender::Men), "England");
    assert_eq!(tables.classify_league("Arsenal", Gender::Women), "England");
}

#[test]
fn unknown_teams_fall_back_to_default_bucket() {
    let tables = LookupTables::builtin();
    for gender in Gender::BOTH {
        assert_eq!(
            tables.classify_league("Al Hilal", gender),
            tables.league_table(gender).default_label()
        );
    }
}

#[test]
fn builtin_tables_list_buckets_then_default() {
    let tables = LookupTables::builtin();
    assert_eq!(
        tables.region.labels(),
        vec!["North Africa", "Rest of Africa", "Rest of World"]
    );
    assert_eq!(
        tables.league_men.labels(),
        vec!["England", "Spain", "Germany", "France", "USA", "Rest of the World"]
    );
}

#[test]
fn alternate_tables_load_and_keep_first_bucket_on_duplicates() {
    let tables = LookupTables::from_json_str(&read_fixture("lookup_tables_alt.json"))
        .expect("fixture should parse");
    assert_eq!(tables.classify_region("Morocco"), "Maghreb");
    assert_eq!(tables.classify_region("Ghana"), "West Africa");
    assert_eq!(tables.classify_region("Egypt"), "Elsewhere");

    let dups = tables.region.duplicates();
    assert_eq!(dups.len(), 1);
    assert_eq!(dups[0].member, "Morocco");
    assert_eq!(dups[0].kept, "Maghreb");
    assert_eq!(dups[0].ignored, "West Africa");
}

#[test]
fn rejects_unknown_table_version() {
    let raw = read_fixture("lookup_tables_alt.json").replace("\"version\": 1", "\"version\": 2");
    let err = LookupTables::from_json_str(&raw).unwrap_err();
    assert!(matches!(
        err,
        LookupError::UnsupportedVersion {
            found: 2,
            expected: 1
        }
    ));
}

#[test]
fn rejects_malformed_tables() {
    let err = LookupTables::from_json_str("{\"version\": 1}").unwrap_err();
    assert!(matches!(err, LookupError::Parse(_)));
}
