use chrono::NaiveDate;
use serde::Serialize;

use crate::aggregate::{AggregateTable, AttributeLimits, GroupField, GroupOrder, aggregate};
use crate::attributes::Attribute;
use crate::dataset::{Dataset, Gender};
use crate::derived::{EnrichedPlayer, enrich};
use crate::lookup::LookupTables;
use crate::selection::{Selection, SelectionError};
use crate::trend::{DEFAULT_RESOLUTION, TrendLine, fit_trends_by_group};

pub const DEFAULT_REGION_TRAITS: [Attribute; 4] = [
    Attribute::Pace,
    Attribute::Stamina,
    Attribute::Strength,
    Attribute::Aggression,
];
pub const DEFAULT_AGE_TRAITS: [Attribute; 4] = [
    Attribute::Pace,
    Attribute::Stamina,
    Attribute::Reactions,
    Attribute::Strength,
];
pub const DEFAULT_LEAGUES: [&str; 5] = ["England", "France", "Germany", "Spain", "USA"];
pub const DEFAULT_X_ATTRIBUTE: Attribute = Attribute::Aggression;
pub const DEFAULT_Y_ATTRIBUTE: Attribute = Attribute::Composure;
pub const AGE_SLIDER_MIN: u32 = 17;
pub const AGE_SLIDER_MAX: u32 = 43;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewKind {
    RegionComparison,
    GenderComparison,
    AgeTrend,
}

impl ViewKind {
    pub const ALL: [ViewKind; 3] = [
        ViewKind::RegionComparison,
        ViewKind::GenderComparison,
        ViewKind::AgeTrend,
    ];

    pub fn title(self) -> &'static str {
        match self {
            ViewKind::RegionComparison => "Africa - Regional Physical Abilities",
            ViewKind::GenderComparison => "Men vs Women - Gendered Attributes",
            ViewKind::AgeTrend => "Ages - Age-Based Performance",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "region" | "regions" | "africa" => Some(ViewKind::RegionComparison),
            "gender" | "men-vs-women" | "mvw" => Some(ViewKind::GenderComparison),
            "age" | "ages" => Some(ViewKind::AgeTrend),
            _ => None,
        }
    }
}

/// Everything a view reads. The dataset and tables are borrowed, never mutated.
#[derive(Debug, Clone, Copy)]
pub struct ViewContext<'a> {
    pub dataset: &'a Dataset,
    pub tables: &'a LookupTables,
    pub reference_date: NaiveDate,
    pub limits: AttributeLimits,
    pub resolution: usize,
}

impl<'a> ViewContext<'a> {
    pub fn new(dataset: &'a Dataset, tables: &'a LookupTables, reference_date: NaiveDate) -> Self {
        Self {
            dataset,
            tables,
            reference_date,
            limits: AttributeLimits::default(),
            resolution: DEFAULT_RESOLUTION,
        }
    }

    fn rows(&self) -> Vec<EnrichedPlayer<'a>> {
        enrich(self.dataset, self.tables, self.reference_date)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RegionParams {
    pub attributes: Selection<Attribute>,
}

impl Default for RegionParams {
    fn default() -> Self {
        Self {
            attributes: Selection::specific(DEFAULT_REGION_TRAITS),
        }
    }
}

pub fn region_comparison(
    ctx: &ViewContext<'_>,
    params: &RegionParams,
) -> Result<AggregateTable, SelectionError> {
    let attributes = ctx.limits.resolve(&params.attributes)?;
    let rows = ctx.rows();
    aggregate(
        &rows,
        GroupField::Region,
        &attributes,
        ctx.limits,
        GroupOrder::Sorted,
    )
}

#[derive(Debug, Clone, PartialEq)]
pub struct GenderParams {
    pub leagues: Selection<String>,
    pub x: Attribute,
    pub y: Attribute,
}

impl Default for GenderParams {
    fn default() -> Self {
        Self {
            leagues: default_league_selection(),
            x: DEFAULT_X_ATTRIBUTE,
            y: DEFAULT_Y_ATTRIBUTE,
        }
    }
}

pub fn default_league_selection() -> Selection<String> {
    Selection::specific(DEFAULT_LEAGUES.iter().map(|l| l.to_string()))
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScatterPoint {
    pub name: String,
    pub gender: Gender,
    pub league: String,
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GenderView {
    pub leagues: Vec<String>,
    pub x: Attribute,
    pub y: Attribute,
    pub points: Vec<ScatterPoint>,
    pub summary: AggregateTable,
    pub trends: Vec<TrendLine<Gender>>,
}

impl GenderView {
    pub fn points_for(&self, gender: Gender) -> impl Iterator<Item = &ScatterPoint> {
        self.points.iter().filter(move |p| p.gender == gender)
    }

    pub fn trend_for(&self, gender: Gender) -> Option<&TrendLine<Gender>> {
        self.trends.iter().find(|t| t.group == gender)
    }
}

/// League buckets present in the data, in first-encounter order.
pub fn league_options(ctx: &ViewContext<'_>) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for row in ctx.rows() {
        if let Some(league) = row.league {
            if !out.iter().any(|l| l == league) {
                out.push(league.to_string());
            }
        }
    }
    out
}

pub fn gender_comparison(
    ctx: &ViewContext<'_>,
    params: &GenderParams,
) -> Result<GenderView, SelectionError> {
    let axes: Vec<Attribute> = if params.x == params.y {
        vec![params.x]
    } else {
        vec![params.x, params.y]
    };
    let axes = ctx.limits.check(&axes)?;

    let options = league_options(ctx);
    let leagues: Vec<String> = params
        .leagues
        .resolve(&options)
        .into_iter()
        .filter(|league| options.contains(league))
        .collect();
    if leagues.is_empty() {
        return Err(SelectionError::NoLeagues);
    }

    let rows: Vec<EnrichedPlayer<'_>> = ctx
        .rows()
        .into_iter()
        .filter(|row| row.gender().is_some())
        .filter(|row| {
            row.league
                .map(|league| leagues.iter().any(|l| l == league))
                .unwrap_or(false)
        })
        .collect();

    let mut points = Vec::new();
    for row in &rows {
        let (Some(gender), Some(league)) = (row.gender(), row.league) else {
            continue;
        };
        let (Some(x), Some(y)) = (row.record.attribute(params.x), row.record.attribute(params.y))
        else {
            continue;
        };
        points.push(ScatterPoint {
            name: row.record.name.clone(),
            gender,
            league: league.to_string(),
            x,
            y,
        });
    }

    let groups: Vec<(Gender, Vec<(f64, f64)>)> = Gender::BOTH
        .iter()
        .filter(|gender| rows.iter().any(|row| row.gender() == Some(**gender)))
        .map(|gender| {
            let xy = points
                .iter()
                .filter(|p| p.gender == *gender)
                .map(|p| (p.x, p.y))
                .collect();
            (*gender, xy)
        })
        .collect();
    let trends = fit_trends_by_group(&groups, ctx.resolution);

    let summary = aggregate(
        &rows,
        GroupField::Gender,
        &axes,
        ctx.limits,
        GroupOrder::Sorted,
    )?;

    Ok(GenderView {
        leagues,
        x: params.x,
        y: params.y,
        points,
        summary,
        trends,
    })
}

/// Inclusive age bounds that are guaranteed to differ.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AgeRange {
    pub min: u32,
    pub max: u32,
}

impl AgeRange {
    pub fn new(a: u32, b: u32) -> Result<Self, SelectionError> {
        if a == b {
            return Err(SelectionError::DegenerateAgeRange { age: a });
        }
        Ok(Self {
            min: a.min(b),
            max: a.max(b),
        })
    }

    pub fn contains(&self, age: i32) -> bool {
        age >= self.min as i32 && age <= self.max as i32
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AgeParams {
    pub range: (u32, u32),
    pub attributes: Selection<Attribute>,
    pub exclude_goalkeepers: bool,
}

impl Default for AgeParams {
    fn default() -> Self {
        Self {
            range: (AGE_SLIDER_MIN, AGE_SLIDER_MAX),
            attributes: Selection::specific(DEFAULT_AGE_TRAITS),
            exclude_goalkeepers: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AgeView {
    pub range: AgeRange,
    pub table: AggregateTable,
}

pub fn age_trend(ctx: &ViewContext<'_>, params: &AgeParams) -> Result<AgeView, SelectionError> {
    let range = AgeRange::new(params.range.0, params.range.1)?;
    let attributes = ctx.limits.resolve(&params.attributes)?;

    let rows: Vec<EnrichedPlayer<'_>> = ctx
        .rows()
        .into_iter()
        .filter(|row| !(params.exclude_goalkeepers && row.record.is_goalkeeper()))
        .filter(|row| row.age.map(|age| range.contains(age)).unwrap_or(false))
        .collect();

    let table = aggregate(
        &rows,
        GroupField::Age,
        &attributes,
        ctx.limits,
        GroupOrder::Sorted,
    )?;
    Ok(AgeView { range, table })
}

#[derive(Debug, Clone, PartialEq)]
pub enum ViewRequest {
    Region(RegionParams),
    Gender(GenderParams),
    Age(AgeParams),
}

impl ViewRequest {
    pub fn kind(&self) -> ViewKind {
        match self {
            ViewRequest::Region(_) => ViewKind::RegionComparison,
            ViewRequest::Gender(_) => ViewKind::GenderComparison,
            ViewRequest::Age(_) => ViewKind::AgeTrend,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "view", rename_all = "snake_case")]
pub enum ViewOutput {
    Region(AggregateTable),
    Gender(GenderView),
    Age(AgeView),
}

pub fn run_view(ctx: &ViewContext<'_>, request: &ViewRequest) -> Result<ViewOutput, SelectionError> {
    let out = match request {
        ViewRequest::Region(params) => ViewOutput::Region(region_comparison(ctx, params)?),
        ViewRequest::Gender(params) => ViewOutput::Gender(gender_comparison(ctx, params)?),
        ViewRequest::Age(params) => ViewOutput::Age(age_trend(ctx, params)?),
    };
    Ok(out)
}
