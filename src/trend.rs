use serde::Serialize;
use thiserror::Error;

pub const DEFAULT_RESOLUTION: usize = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TrendError {
    #[error("insufficient data for fit: {points} point(s), {distinct_x} distinct x value(s)")]
    InsufficientData { points: usize, distinct_x: usize },
    #[error("trend resolution must be at least 1")]
    ZeroResolution,
}

/// Ordinary least squares line `y = slope * x + intercept`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LinearFit {
    pub slope: f64,
    pub intercept: f64,
    pub samples: usize,
}

impl LinearFit {
    pub fn predict(&self, x: f64) -> f64 {
        self.slope * x + self.intercept
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrendLine<K> {
    pub group: K,
    pub fit: LinearFit,
    pub points: Vec<(f64, f64)>,
}

pub fn fit_line(points: &[(f64, f64)]) -> Result<LinearFit, TrendError> {
    let usable: Vec<(f64, f64)> = points
        .iter()
        .copied()
        .filter(|(x, y)| x.is_finite() && y.is_finite())
        .collect();

    let distinct_x = distinct_count(usable.iter().map(|(x, _)| *x));
    if usable.len() < 2 || distinct_x < 2 {
        return Err(TrendError::InsufficientData {
            points: usable.len(),
            distinct_x,
        });
    }

    let n = usable.len() as f64;
    let mean_x = usable.iter().map(|(x, _)| x).sum::<f64>() / n;
    let mean_y = usable.iter().map(|(_, y)| y).sum::<f64>() / n;

    let mut sxx = 0.0_f64;
    let mut sxy = 0.0_f64;
    for (x, y) in &usable {
        let dx = x - mean_x;
        sxx += dx * dx;
        sxy += dx * (y - mean_y);
    }
    if sxx <= 0.0 {
        return Err(TrendError::InsufficientData {
            points: usable.len(),
            distinct_x,
        });
    }

    let slope = sxy / sxx;
    Ok(LinearFit {
        slope,
        intercept: mean_y - slope * mean_x,
        samples: usable.len(),
    })
}

/// Fitted values at `resolution` evenly spaced x positions across the observed x range.
pub fn fit_trend(points: &[(f64, f64)], resolution: usize) -> Result<Vec<(f64, f64)>, TrendError> {
    if resolution == 0 {
        return Err(TrendError::ZeroResolution);
    }
    let fit = fit_line(points)?;
    Ok(sample_line(&fit, points, resolution))
}

/// Fits each group on its own. Groups that cannot be fit are left out so the rest still render.
pub fn fit_trends_by_group<K: Clone + std::fmt::Debug>(
    groups: &[(K, Vec<(f64, f64)>)],
    resolution: usize,
) -> Vec<TrendLine<K>> {
    let mut out = Vec::with_capacity(groups.len());
    for (group, points) in groups {
        if resolution == 0 {
            log::warn!("trend line for {group:?} omitted: {}", TrendError::ZeroResolution);
            continue;
        }
        match fit_line(points) {
            Ok(fit) => out.push(TrendLine {
                group: group.clone(),
                fit,
                points: sample_line(&fit, points, resolution),
            }),
            Err(err) => log::warn!("trend line for {group:?} omitted: {err}"),
        }
    }
    out
}

fn sample_line(fit: &LinearFit, points: &[(f64, f64)], resolution: usize) -> Vec<(f64, f64)> {
    let Some((min_x, max_x)) = x_range(points) else {
        return Vec::new();
    };
    linspace(min_x, max_x, resolution)
        .into_iter()
        .map(|x| (x, fit.predict(x)))
        .collect()
}

pub fn linspace(start: f64, end: f64, count: usize) -> Vec<f64> {
    match count {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (end - start) / (count - 1) as f64;
            let mut out: Vec<f64> = (0..count).map(|i| start + step * i as f64).collect();
            out[count - 1] = end;
            out
        }
    }
}

fn x_range(points: &[(f64, f64)]) -> Option<(f64, f64)> {
    points
        .iter()
        .filter(|(x, y)| x.is_finite() && y.is_finite())
        .map(|(x, _)| *x)
        .fold(None, |acc, x| match acc {
            None => Some((x, x)),
            Some((lo, hi)) => Some((lo.min(x), hi.max(x))),
        })
}

fn distinct_count(values: impl Iterator<Item = f64>) -> usize {
    let mut sorted: Vec<f64> = values.collect();
    sorted.sort_by(|a, b| a.total_cmp(b));
    sorted.dedup();
    sorted.len()
}
