use std::path::PathBuf;

use fc25_lens::age::default_reference_date;
use fc25_lens::aggregate::GroupKey;
use fc25_lens::attributes::Attribute;
use fc25_lens::dataset::{Dataset, Gender};
use fc25_lens::lookup::LookupTables;
use fc25_lens::selection::{Selection, SelectionError};
use fc25_lens::views::{
    AgeParams, GenderParams, RegionParams, ViewContext, ViewOutput, ViewRequest, age_trend,
    gender_comparison, league_options, region_comparison, run_view,
};

fn load_fixture() -> Dataset {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("tests");
    path.push("fixtures");
    path.push("players_small.csv");
    Dataset::load_csv(&path).expect("fixture should load").0
}

fn label(raw: &str) -> GroupKey {
    GroupKey::Label(raw.to_string())
}

fn close(a: Option<f64>, b: f64) -> bool {
    a.is_some_and(|a| (a - b).abs() < 1e-9)
}

#[test]
fn region_view_uses_default_traits() {
    let dataset = load_fixture();
    let ctx = ViewContext::new(&dataset, LookupTables::builtin(), default_reference_date());
    let table = region_comparison(&ctx, &RegionParams::default()).unwrap();

    assert_eq!(
        table.attributes,
        vec![
            Attribute::Pace,
            Attribute::Stamina,
            Attribute::Strength,
            Attribute::Aggression
        ]
    );
    let keys: Vec<String> = table.rows.iter().map(|r| r.key.to_string()).collect();
    assert_eq!(keys, vec!["North Africa", "Rest of Africa", "Rest of World"]);

    let north = table.row(&label("North Africa")).unwrap();
    assert!(close(north.mean(Attribute::Pace), 90.0));
    let rest = table.row(&label("Rest of Africa")).unwrap();
    assert!(close(rest.mean(Attribute::Pace), 81.0));
    assert!(close(rest.mean(Attribute::Stamina), 75.0));
    assert!(close(rest.mean(Attribute::Aggression), 70.0));
    let world = table.row(&label("Rest of World")).unwrap();
    assert_eq!(world.rows, 5);
    assert!(close(world.mean(Attribute::Pace), 69.6));
}

#[test]
fn region_view_rejects_bad_selections() {
    let dataset = load_fixture();
    let ctx = ViewContext::new(&dataset, LookupTables::builtin(), default_reference_date());

    let none = RegionParams {
        attributes: Selection::specific(Vec::<Attribute>::new()),
    };
    assert_eq!(
        region_comparison(&ctx, &none).unwrap_err(),
        SelectionError::NoAttributes { min: 1 }
    );

    let six = RegionParams {
        attributes: Selection::specific(Attribute::ALL[..6].to_vec()),
    };
    assert!(matches!(
        region_comparison(&ctx, &six).unwrap_err(),
        SelectionError::TooManyAttributes { got: 6, .. }
    ));
}

#[test]
fn gender_view_filters_to_selected_leagues() {
    let dataset = load_fixture();
    let ctx = ViewContext::new(&dataset, LookupTables::builtin(), default_reference_date());
    let view = gender_comparison(&ctx, &GenderParams::default()).unwrap();

    assert_eq!(view.points_for(Gender::Men).count(), 4);
    assert_eq!(view.points_for(Gender::Women).count(), 3);
    assert!(view.points.iter().all(|p| p.name != "V. Osimhen"));
    assert!(view.points.iter().all(|p| p.name != "T. Mystery"));

    let men = view.summary.row(&GroupKey::Gender(Gender::Men)).unwrap();
    assert!(close(men.mean(Attribute::Aggression), 67.0));
    let women = view.summary.row(&GroupKey::Gender(Gender::Women)).unwrap();
    assert!(close(women.mean(Attribute::Aggression), 70.0));

    assert!(view.trend_for(Gender::Men).is_some());
    assert!(view.trend_for(Gender::Women).is_some());
    assert_eq!(view.trend_for(Gender::Men).unwrap().points.len(), 100);
}

#[test]
fn gender_view_drops_trend_for_single_point_group() {
    let dataset = load_fixture();
    let ctx = ViewContext::new(&dataset, LookupTables::builtin(), default_reference_date());
    let params = GenderParams {
        leagues: Selection::specific(["Spain".to_string()]),
        ..GenderParams::default()
    };
    let view = gender_comparison(&ctx, &params).unwrap();

    assert_eq!(view.points_for(Gender::Men).count(), 1);
    assert_eq!(view.points_for(Gender::Women).count(), 2);
    assert!(view.trend_for(Gender::Men).is_none());
    assert!(view.trend_for(Gender::Women).is_some());
}

#[test]
fn gender_view_needs_a_league() {
    let dataset = load_fixture();
    let ctx = ViewContext::new(&dataset, LookupTables::builtin(), default_reference_date());
    let params = GenderParams {
        leagues: Selection::specific(Vec::<String>::new()),
        ..GenderParams::default()
    };
    assert_eq!(
        gender_comparison(&ctx, &params).unwrap_err(),
        SelectionError::NoLeagues
    );
}

#[test]
fn leagues_missing_from_the_data_are_dropped() {
    let dataset = load_fixture();
    let ctx = ViewContext::new(&dataset, LookupTables::builtin(), default_reference_date());

    let only_unknown = GenderParams {
        leagues: Selection::specific(["Italy".to_string()]),
        ..GenderParams::default()
    };
    assert_eq!(
        gender_comparison(&ctx, &only_unknown).unwrap_err(),
        SelectionError::NoLeagues
    );

    let mixed = GenderParams {
        leagues: Selection::specific(["Italy".to_string(), "Spain".to_string()]),
        ..GenderParams::default()
    };
    let view = gender_comparison(&ctx, &mixed).unwrap();
    assert_eq!(view.leagues, vec!["Spain"]);
    assert_eq!(view.points.len(), 3);
}

#[test]
fn default_leagues_keep_only_those_present() {
    let dataset = load_fixture();
    let ctx = ViewContext::new(&dataset, LookupTables::builtin(), default_reference_date());
    let view = gender_comparison(&ctx, &GenderParams::default()).unwrap();
    assert_eq!(view.leagues, vec!["England", "France", "Spain"]);
}

#[test]
fn all_leagues_includes_rest_of_world() {
    let dataset = load_fixture();
    let ctx = ViewContext::new(&dataset, LookupTables::builtin(), default_reference_date());
    let params = GenderParams {
        leagues: Selection::All,
        ..GenderParams::default()
    };
    let view = gender_comparison(&ctx, &params).unwrap();
    assert!(view.leagues.iter().any(|l| l == "Rest of the World"));
    assert!(view.points.iter().any(|p| p.name == "V. Osimhen"));
    // Gender is unknown, so the row never reaches either cohort.
    assert!(view.points.iter().all(|p| p.name != "T. Mystery"));
}

#[test]
fn league_options_follow_first_encounter() {
    let dataset = load_fixture();
    let ctx = ViewContext::new(&dataset, LookupTables::builtin(), default_reference_date());
    assert_eq!(
        league_options(&ctx),
        vec!["France", "England", "Rest of the World", "Spain"]
    );
}

#[test]
fn age_view_excludes_goalkeepers_and_sorts_ages() {
    let dataset = load_fixture();
    let ctx = ViewContext::new(&dataset, LookupTables::builtin(), default_reference_date());
    let view = age_trend(&ctx, &AgeParams::default()).unwrap();

    let ages: Vec<GroupKey> = view.table.rows.iter().map(|r| r.key.clone()).collect();
    assert_eq!(
        ages,
        [21, 23, 24, 25, 29, 32].map(GroupKey::Age).to_vec()
    );
    let twenty_five = view.table.row(&GroupKey::Age(25)).unwrap();
    assert_eq!(twenty_five.rows, 2);
    assert!(close(twenty_five.mean(Attribute::Pace), 86.5));
    assert!(view.table.row(&GroupKey::Age(31)).is_none());
}

#[test]
fn age_view_swaps_reversed_bounds() {
    let dataset = load_fixture();
    let ctx = ViewContext::new(&dataset, LookupTables::builtin(), default_reference_date());
    let params = AgeParams {
        range: (25, 21),
        ..AgeParams::default()
    };
    let view = age_trend(&ctx, &params).unwrap();
    assert_eq!((view.range.min, view.range.max), (21, 25));
    assert_eq!(view.table.rows.len(), 4);
}

#[test]
fn age_view_rejects_equal_bounds() {
    let dataset = load_fixture();
    let ctx = ViewContext::new(&dataset, LookupTables::builtin(), default_reference_date());
    let params = AgeParams {
        range: (30, 30),
        ..AgeParams::default()
    };
    assert_eq!(
        age_trend(&ctx, &params).unwrap_err(),
        SelectionError::DegenerateAgeRange { age: 30 }
    );
}

#[test]
fn views_are_deterministic() {
    let dataset = load_fixture();
    let ctx = ViewContext::new(&dataset, LookupTables::builtin(), default_reference_date());
    for request in [
        ViewRequest::Region(RegionParams::default()),
        ViewRequest::Gender(GenderParams::default()),
        ViewRequest::Age(AgeParams::default()),
    ] {
        let first = run_view(&ctx, &request).unwrap();
        let second = run_view(&ctx, &request).unwrap();
        assert_eq!(first, second);
    }
}

#[test]
fn view_output_serializes_with_tag() {
    let dataset = load_fixture();
    let ctx = ViewContext::new(&dataset, LookupTables::builtin(), default_reference_date());
    let out = run_view(&ctx, &ViewRequest::Age(AgeParams::default())).unwrap();
    assert!(matches!(out, ViewOutput::Age(_)));
    let json = serde_json::to_value(&out).unwrap();
    assert_eq!(json["view"], "age");
}
