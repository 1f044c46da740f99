use std::collections::VecDeque;

use crate::aggregate::AttributeLimits;
use crate::attributes::Attribute;
use crate::config::AppConfig;
use crate::selection::{LastSelection, Selection, SelectionError};
use crate::store::DataStore;
use crate::views::{
    self, AgeParams, GenderParams, RegionParams, ViewKind, ViewOutput, ViewRequest,
};

const MAX_LOGS: usize = 200;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Home,
    View(ViewKind),
}

/// Which control on the current page receives movement and toggle keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Attributes,
    Leagues,
    XAxis,
    YAxis,
    MinAge,
    MaxAge,
}

pub struct AppState {
    pub screen: Screen,
    pub focus: Focus,
    pub cursor: usize,
    pub region_attributes: Selection<Attribute>,
    pub age_attributes: Selection<Attribute>,
    pub league_options: Vec<String>,
    pub league_memory: LastSelection<String>,
    pub x_attribute: Attribute,
    pub y_attribute: Attribute,
    pub age_min: u32,
    pub age_max: u32,
    pub age_bounds: (u32, u32),
    pub output: Option<Result<ViewOutput, SelectionError>>,
    pub logs: VecDeque<String>,
    pub help_overlay: bool,
    pub should_quit: bool,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(&AppConfig::default())
    }
}

impl AppState {
    pub fn new(config: &AppConfig) -> Self {
        let region = RegionParams::default();
        let gender = GenderParams::default();
        let age = AgeParams::default();
        Self {
            screen: Screen::Home,
            focus: Focus::Attributes,
            cursor: 0,
            region_attributes: region.attributes,
            age_attributes: age.attributes,
            league_options: Vec::new(),
            league_memory: LastSelection::new(),
            x_attribute: gender.x,
            y_attribute: gender.y,
            age_min: config.age_min,
            age_max: config.age_max,
            age_bounds: (config.age_min, config.age_max),
            output: None,
            logs: VecDeque::with_capacity(MAX_LOGS),
            help_overlay: false,
            should_quit: false,
        }
    }

    pub fn push_log(&mut self, msg: impl Into<String>) {
        self.logs.push_back(msg.into());
        while self.logs.len() > MAX_LOGS {
            self.logs.pop_front();
        }
    }

    pub fn set_screen(&mut self, screen: Screen) {
        if self.screen == screen {
            return;
        }
        self.screen = screen;
        self.focus = match screen {
            Screen::View(ViewKind::GenderComparison) => Focus::Leagues,
            _ => Focus::Attributes,
        };
        self.cursor = 0;
        self.output = None;
    }

    pub fn view_kind(&self) -> Option<ViewKind> {
        match self.screen {
            Screen::Home => None,
            Screen::View(kind) => Some(kind),
        }
    }

    /// Controls available on the current page, in Tab order.
    pub fn focus_order(&self) -> &'static [Focus] {
        match self.screen {
            Screen::Home => &[],
            Screen::View(ViewKind::RegionComparison) => &[Focus::Attributes],
            Screen::View(ViewKind::GenderComparison) => {
                &[Focus::Leagues, Focus::XAxis, Focus::YAxis]
            }
            Screen::View(ViewKind::AgeTrend) => &[Focus::Attributes, Focus::MinAge, Focus::MaxAge],
        }
    }

    pub fn cycle_focus(&mut self) {
        let order = self.focus_order();
        if order.is_empty() {
            return;
        }
        let idx = order.iter().position(|f| *f == self.focus).unwrap_or(0);
        self.focus = order[(idx + 1) % order.len()];
        self.cursor = 0;
    }

    /// Current league filter, revalidated against the options the data offers right now.
    pub fn league_selection(&self) -> Selection<String> {
        self.league_memory
            .recall(&self.league_options, &views::default_league_selection())
    }

    fn list_len(&self) -> usize {
        match self.focus {
            Focus::Attributes => Attribute::ALL.len(),
            Focus::Leagues => self.league_options.len(),
            _ => 0,
        }
    }

    pub fn select_next(&mut self) {
        match self.focus {
            Focus::Attributes | Focus::Leagues => {
                let len = self.list_len();
                if len > 0 && self.cursor + 1 < len {
                    self.cursor += 1;
                }
            }
            _ => self.adjust(1),
        }
    }

    pub fn select_prev(&mut self) {
        match self.focus {
            Focus::Attributes | Focus::Leagues => {
                self.cursor = self.cursor.saturating_sub(1);
            }
            _ => self.adjust(-1),
        }
    }

    /// Steps axis attributes or age bounds. The slider never crosses its bounds.
    pub fn adjust(&mut self, step: i32) {
        match self.focus {
            Focus::XAxis => self.x_attribute = step_attribute(self.x_attribute, step),
            Focus::YAxis => self.y_attribute = step_attribute(self.y_attribute, step),
            Focus::MinAge => self.age_min = self.step_age(self.age_min, step),
            Focus::MaxAge => self.age_max = self.step_age(self.age_max, step),
            Focus::Attributes | Focus::Leagues => {}
        }
    }

    fn step_age(&self, age: u32, step: i32) -> u32 {
        let (lo, hi) = self.age_bounds;
        (age as i64 + step as i64).clamp(lo as i64, hi as i64) as u32
    }

    pub fn toggle_current(&mut self) {
        match (self.focus, self.screen) {
            (Focus::Attributes, Screen::View(ViewKind::RegionComparison)) => {
                if let Some(attr) = Attribute::ALL.get(self.cursor) {
                    self.region_attributes.toggle(*attr);
                }
            }
            (Focus::Attributes, Screen::View(ViewKind::AgeTrend)) => {
                if let Some(attr) = Attribute::ALL.get(self.cursor) {
                    self.age_attributes.toggle(*attr);
                }
            }
            (Focus::Leagues, _) => {
                if let Some(league) = self.league_options.get(self.cursor).cloned() {
                    let mut current = self.league_selection();
                    current.toggle(league);
                    self.league_memory.remember(current);
                }
            }
            _ => {}
        }
    }

    /// "All" is only offered for traits when the attribute cap can hold the whole vocabulary.
    pub fn offers_all_attributes(&self) -> bool {
        AttributeLimits::default().allows_all()
    }

    pub fn select_all(&mut self) {
        let all_attributes = self.offers_all_attributes();
        match (self.focus, self.screen) {
            (Focus::Attributes, Screen::View(ViewKind::RegionComparison)) if all_attributes => {
                self.region_attributes = Selection::All;
            }
            (Focus::Attributes, Screen::View(ViewKind::AgeTrend)) if all_attributes => {
                self.age_attributes = Selection::All;
            }
            (Focus::Leagues, _) => self.league_memory.remember(Selection::All),
            _ => {}
        }
    }

    pub fn reset_defaults(&mut self) {
        match self.screen {
            Screen::View(ViewKind::RegionComparison) => {
                self.region_attributes = RegionParams::default().attributes;
            }
            Screen::View(ViewKind::GenderComparison) => {
                let defaults = GenderParams::default();
                self.league_memory.forget();
                self.x_attribute = defaults.x;
                self.y_attribute = defaults.y;
            }
            Screen::View(ViewKind::AgeTrend) => {
                self.age_attributes = AgeParams::default().attributes;
                self.age_min = self.age_bounds.0;
                self.age_max = self.age_bounds.1;
            }
            Screen::Home => {}
        }
    }

    pub fn request(&self) -> Option<ViewRequest> {
        let request = match self.view_kind()? {
            ViewKind::RegionComparison => ViewRequest::Region(RegionParams {
                attributes: self.region_attributes.clone(),
            }),
            ViewKind::GenderComparison => ViewRequest::Gender(GenderParams {
                leagues: self.league_selection(),
                x: self.x_attribute,
                y: self.y_attribute,
            }),
            ViewKind::AgeTrend => ViewRequest::Age(AgeParams {
                range: (self.age_min, self.age_max),
                attributes: self.age_attributes.clone(),
                exclude_goalkeepers: true,
            }),
        };
        Some(request)
    }

    /// Runs the current page's view from scratch against the store.
    pub fn recompute(&mut self, store: &DataStore) {
        let ctx = store.context();
        if self.league_options.is_empty() {
            self.league_options = views::league_options(&ctx);
        }
        let Some(request) = self.request() else {
            self.output = None;
            return;
        };
        let result = views::run_view(&ctx, &request);
        if let Err(err) = &result {
            let msg = format!("[WARN] {err}");
            if self.logs.back() != Some(&msg) {
                self.push_log(msg);
            }
        }
        self.output = Some(result);
    }
}

fn step_attribute(current: Attribute, step: i32) -> Attribute {
    let len = Attribute::ALL.len() as i32;
    let idx = (current.index() as i32 + step).rem_euclid(len);
    Attribute::ALL[idx as usize]
}

pub fn focus_label(focus: Focus) -> &'static str {
    match focus {
        Focus::Attributes => "Traits",
        Focus::Leagues => "Leagues",
        Focus::XAxis => "X axis",
        Focus::YAxis => "Y axis",
        Focus::MinAge => "Min age",
        Focus::MaxAge => "Max age",
    }
}

pub fn screen_label(screen: Screen) -> &'static str {
    match screen {
        Screen::Home => "HOME",
        Screen::View(ViewKind::RegionComparison) => "AFRICA",
        Screen::View(ViewKind::GenderComparison) => "MEN VS WOMEN",
        Screen::View(ViewKind::AgeTrend) => "AGES",
    }
}
