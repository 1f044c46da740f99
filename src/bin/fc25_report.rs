use std::path::PathBuf;

use anyhow::{Context, Result, anyhow};

use fc25_lens::aggregate::AggregateTable;
use fc25_lens::attributes::{Attribute, parse_attribute_list};
use fc25_lens::config::{self, AppConfig};
use fc25_lens::selection::{Choice, Selection};
use fc25_lens::store::DataStore;
use fc25_lens::views::{
    self, AgeParams, GenderParams, RegionParams, ViewKind, ViewOutput, ViewRequest,
};

fn main() -> Result<()> {
    config::load_env_files();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = std::env::args().skip(1).collect::<Vec<_>>();
    let mut cfg = AppConfig::from_env();
    if let Some(path) = arg_value(&args, "--data") {
        cfg.dataset_path = PathBuf::from(path);
        cfg.demo_players = None;
    }

    let store = DataStore::open(cfg)?;
    log::info!("{}", store.describe());

    let kind = match arg_value(&args, "--view") {
        Some(raw) => ViewKind::parse(&raw).ok_or_else(|| anyhow!("unknown view '{raw}'"))?,
        None => ViewKind::RegionComparison,
    };
    let request = build_request(kind, &args)?;

    let ctx = store.context();
    let output = match views::run_view(&ctx, &request) {
        Ok(output) => output,
        Err(err) => {
            // Invalid selections are warnings, not failures.
            log::warn!("{err}");
            println!("warning: {err}");
            return Ok(());
        }
    };

    if args.iter().any(|a| a == "--json") {
        let json = serde_json::to_string_pretty(&output).context("serialize view output")?;
        println!("{json}");
        return Ok(());
    }

    println!("{}", kind.title());
    match &output {
        ViewOutput::Region(table) => print_table(table),
        ViewOutput::Gender(view) => {
            println!("Leagues: {}", view.leagues.join(", "));
            println!("Points: {}", view.points.len());
            print_table(&view.summary);
            for trend in &view.trends {
                let (first, last) = match (trend.points.first(), trend.points.last()) {
                    (Some(first), Some(last)) => (*first, *last),
                    _ => continue,
                };
                println!(
                    "{} trend: y = {:.3}x {:+.3} (n={}), {:.1}->{:.1} over x {:.0}..{:.0}",
                    trend.group,
                    trend.fit.slope,
                    trend.fit.intercept,
                    trend.fit.samples,
                    first.1,
                    last.1,
                    first.0,
                    last.0
                );
            }
        }
        ViewOutput::Age(view) => {
            println!("Ages {}-{} (goalkeepers excluded)", view.range.min, view.range.max);
            print_table(&view.table);
        }
    }
    Ok(())
}

fn build_request(kind: ViewKind, args: &[String]) -> Result<ViewRequest> {
    let attributes = match arg_value(args, "--attrs") {
        Some(raw) if raw.trim().eq_ignore_ascii_case("all") => Some(Selection::All),
        Some(raw) => Some(Selection::specific(parse_attribute_list(&raw)?)),
        None => None,
    };

    let request = match kind {
        ViewKind::RegionComparison => {
            let mut params = RegionParams::default();
            if let Some(attrs) = attributes {
                params.attributes = attrs;
            }
            ViewRequest::Region(params)
        }
        ViewKind::GenderComparison => {
            let mut params = GenderParams::default();
            if let Some(raw) = arg_value(args, "--leagues") {
                params.leagues = Selection::from_choices(parse_choices(&raw))?;
            }
            if let Some(raw) = arg_value(args, "--x") {
                params.x = raw.parse::<Attribute>()?;
            }
            if let Some(raw) = arg_value(args, "--y") {
                params.y = raw.parse::<Attribute>()?;
            }
            ViewRequest::Gender(params)
        }
        ViewKind::AgeTrend => {
            let mut params = AgeParams::default();
            if let Some(attrs) = attributes {
                params.attributes = attrs;
            }
            if let Some(raw) = arg_value(args, "--ages") {
                params.range = parse_age_range(&raw)?;
            }
            ViewRequest::Age(params)
        }
    };
    Ok(request)
}

fn parse_choices(raw: &str) -> Vec<Choice<String>> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| {
            if s.eq_ignore_ascii_case("all") {
                Choice::All
            } else {
                Choice::Item(s.to_string())
            }
        })
        .collect()
}

fn parse_age_range(raw: &str) -> Result<(u32, u32)> {
    let (lo, hi) = raw
        .split_once('-')
        .ok_or_else(|| anyhow!("age range must look like MIN-MAX, got '{raw}'"))?;
    let lo = lo.trim().parse::<u32>().context("parse minimum age")?;
    let hi = hi.trim().parse::<u32>().context("parse maximum age")?;
    Ok((lo, hi))
}

fn arg_value(args: &[String], name: &str) -> Option<String> {
    let prefix = format!("{name}=");
    for (idx, arg) in args.iter().enumerate() {
        if let Some(value) = arg.strip_prefix(&prefix) {
            let trimmed = value.trim();
            if !trimmed.is_empty() {
                return Some(trimmed.to_string());
            }
        }
        if arg == name {
            let Some(next) = args.get(idx + 1) else {
                continue;
            };
            if !next.trim().is_empty() {
                return Some(next.clone());
            }
        }
    }
    None
}

fn print_table(table: &AggregateTable) {
    if table.is_empty() {
        println!("(no rows)");
        return;
    }
    let key_width = table
        .rows
        .iter()
        .map(|row| row.key.to_string().chars().count())
        .max()
        .unwrap_or(0)
        .max(table.group_by.len());
    let col_width = table
        .attributes
        .iter()
        .map(|a| a.label().len())
        .max()
        .unwrap_or(0)
        .max(6);

    let mut header = format!("{:<key_width$}  {:>5}", table.group_by, "n");
    for attr in &table.attributes {
        header.push_str(&format!("  {:>col_width$}", attr.label()));
    }
    println!("{header}");
    for row in &table.rows {
        let mut line = format!("{:<key_width$}  {:>5}", row.key.to_string(), row.rows);
        for attr in &table.attributes {
            let cell = match row.mean(*attr) {
                Some(v) => format!("{v:.2}"),
                None => "n/a".to_string(),
            };
            line.push_str(&format!("  {cell:>col_width$}"));
        }
        println!("{line}");
    }
}
