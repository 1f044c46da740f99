use fc25_lens::attributes::Attribute;
use fc25_lens::config::AppConfig;
use fc25_lens::fake_dataset;
use fc25_lens::lookup::LookupTables;
use fc25_lens::selection::{LastSelection, Selection, SelectionError};
use fc25_lens::state::{AppState, Focus, Screen};
use fc25_lens::store::DataStore;
use fc25_lens::views::{
    DEFAULT_REGION_TRAITS, ViewKind, ViewOutput, default_league_selection,
};

fn demo_store() -> DataStore {
    DataStore::new(
        fake_dataset::generate(300, 11),
        LookupTables::builtin().clone(),
        AppConfig::default(),
    )
}

fn options(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

#[test]
fn recall_keeps_valid_memory() {
    let mut memory = LastSelection::new();
    memory.remember(Selection::specific(options(&["Spain", "England"])));
    let recalled = memory.recall(
        &options(&["England", "Spain", "France"]),
        &default_league_selection(),
    );
    assert_eq!(recalled, Selection::specific(options(&["Spain", "England"])));
}

#[test]
fn recall_drops_stale_members() {
    let mut memory = LastSelection::new();
    memory.remember(Selection::specific(options(&["Spain", "Italy"])));
    let recalled = memory.recall(&options(&["Spain", "France"]), &default_league_selection());
    assert_eq!(recalled, Selection::specific(options(&["Spain"])));
}

#[test]
fn recall_falls_back_to_default_then_all() {
    let mut memory = LastSelection::new();
    memory.remember(Selection::specific(options(&["Italy"])));
    let recalled = memory.recall(&options(&["Spain", "Japan"]), &default_league_selection());
    assert_eq!(recalled, Selection::specific(options(&["Spain"])));

    let recalled = memory.recall(&options(&["Japan"]), &default_league_selection());
    assert_eq!(recalled, Selection::All);
}

#[test]
fn state_starts_on_home_without_output() {
    let state = AppState::new(&AppConfig::default());
    assert_eq!(state.screen, Screen::Home);
    assert!(state.request().is_none());
}

#[test]
fn region_page_recomputes_with_defaults() {
    let store = demo_store();
    let mut state = AppState::new(&store.config);
    state.set_screen(Screen::View(ViewKind::RegionComparison));
    state.recompute(&store);
    match state.output {
        Some(Ok(ViewOutput::Region(ref table))) => assert!(!table.is_empty()),
        ref other => panic!("unexpected output: {other:?}"),
    }
}

#[test]
fn clearing_every_trait_warns_instead_of_failing() {
    let store = demo_store();
    let mut state = AppState::new(&store.config);
    state.set_screen(Screen::View(ViewKind::RegionComparison));
    state.region_attributes = Selection::specific(Vec::new());
    state.recompute(&store);
    assert_eq!(
        state.output,
        Some(Err(SelectionError::NoAttributes { min: 1 }))
    );
    assert!(state.logs.back().is_some_and(|l| l.starts_with("[WARN]")));

    // Same warning is not logged twice in a row.
    let before = state.logs.len();
    state.recompute(&store);
    assert_eq!(state.logs.len(), before);
}

#[test]
fn toggling_every_league_off_reports_no_leagues() {
    let store = demo_store();
    let mut state = AppState::new(&store.config);
    state.set_screen(Screen::View(ViewKind::GenderComparison));
    state.recompute(&store);
    assert!(matches!(state.output, Some(Ok(ViewOutput::Gender(_)))));

    state.league_memory.remember(Selection::specific(Vec::new()));
    state.recompute(&store);
    assert_eq!(state.output, Some(Err(SelectionError::NoLeagues)));
}

#[test]
fn age_sliders_stay_inside_bounds() {
    let mut state = AppState::new(&AppConfig::default());
    state.set_screen(Screen::View(ViewKind::AgeTrend));
    state.focus = Focus::MinAge;
    for _ in 0..10 {
        state.select_prev();
    }
    assert_eq!(state.age_min, 17);
    state.focus = Focus::MaxAge;
    for _ in 0..10 {
        state.select_next();
    }
    assert_eq!(state.age_max, 43);
}

#[test]
fn focus_cycles_through_page_controls() {
    let mut state = AppState::new(&AppConfig::default());
    state.set_screen(Screen::View(ViewKind::GenderComparison));
    assert_eq!(state.focus, Focus::Leagues);
    state.cycle_focus();
    assert_eq!(state.focus, Focus::XAxis);
    state.cycle_focus();
    assert_eq!(state.focus, Focus::YAxis);
    state.cycle_focus();
    assert_eq!(state.focus, Focus::Leagues);
}

#[test]
fn push_log_keeps_recent_entries() {
    let mut state = AppState::new(&AppConfig::default());
    for i in 0..250 {
        state.push_log(format!("[INFO] {i}"));
    }
    assert_eq!(state.logs.len(), 200);
    assert_eq!(state.logs.front().map(String::as_str), Some("[INFO] 50"));
}

#[test]
fn all_traits_is_not_offered_under_the_attribute_cap() {
    let mut state = AppState::new(&AppConfig::default());
    assert!(Attribute::ALL.len() > 5);
    assert!(!state.offers_all_attributes());

    state.set_screen(Screen::View(ViewKind::RegionComparison));
    state.select_all();
    assert_eq!(
        state.region_attributes,
        Selection::specific(DEFAULT_REGION_TRAITS)
    );

    state.set_screen(Screen::View(ViewKind::GenderComparison));
    state.select_all();
    assert!(state.league_selection().is_all());
}
