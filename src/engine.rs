use std::collections::HashMap;

use thiserror::Error;

use crate::models::{
    EmissionCategory, MonthlyTrendPoint, ReductionTarget, ScopeOneAggregate, YearOverYearPoint,
};

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("recomputed aggregate failed validation: {0}")]
    Validation(String),
}

/// Rebuilds the aggregate from raw per-category values.
///
/// Category names and colors carry over from `previous` unchanged; the
/// monthly trend keeps its historical shape by scaling every point with
/// the ratio of new to previous total. The year-over-year entry for
/// `previous.current_year` takes the new total, and the reduction target
/// for `target_year` takes 90% of it, rounded. A target year with no
/// matching entry updates nothing — no entry is ever inserted.
///
/// Pure over its arguments: no clock, no storage, no ambient state.
pub fn recompute(
    raw_values: &HashMap<String, f64>,
    previous: &ScopeOneAggregate,
    target_year: &str,
) -> Result<ScopeOneAggregate, EngineError> {
    let total: f64 = previous
        .categories
        .iter()
        .map(|category| raw_value(raw_values, &category.name))
        .sum();

    let categories: Vec<EmissionCategory> = previous
        .categories
        .iter()
        .map(|category| {
            let value = raw_value(raw_values, &category.name);
            // A zero total would divide to NaN; the defined degenerate
            // form is all-zero percentages.
            let percentage = if total == 0.0 {
                0.0
            } else {
                round1(value / total * 100.0)
            };
            EmissionCategory {
                name: category.name.clone(),
                value,
                percentage,
                color: category.color.clone(),
            }
        })
        .collect();

    let scale_factor = if previous.total == 0.0 {
        1.0
    } else {
        total / previous.total
    };
    let monthly_trend: Vec<MonthlyTrendPoint> = previous
        .monthly_trend
        .iter()
        .map(|point| MonthlyTrendPoint {
            month: point.month.clone(),
            value: round1(point.value * scale_factor),
        })
        .collect();

    let year_over_year: Vec<YearOverYearPoint> = previous
        .year_over_year
        .iter()
        .map(|point| YearOverYearPoint {
            year: point.year.clone(),
            value: if point.year == previous.current_year {
                total
            } else {
                point.value
            },
        })
        .collect();

    let reduction_targets: Vec<ReductionTarget> = previous
        .reduction_targets
        .iter()
        .map(|entry| ReductionTarget {
            year: entry.year.clone(),
            target: if entry.year == target_year {
                (total * 0.9).round()
            } else {
                entry.target
            },
        })
        .collect();

    let result = ScopeOneAggregate {
        total,
        unit: previous.unit.clone(),
        current_year: previous.current_year.clone(),
        categories,
        monthly_trend,
        year_over_year,
        reduction_targets,
    };

    match result.validation_error() {
        Some(reason) => Err(EngineError::Validation(reason)),
        None => Ok(result),
    }
}

/// Hosts coerce malformed numeric input to 0 before it reaches the
/// engine; a missing or non-finite entry follows the same policy.
fn raw_value(raw_values: &HashMap<String, f64>, name: &str) -> f64 {
    match raw_values.get(name).copied() {
        Some(value) if value.is_finite() => value,
        _ => 0.0,
    }
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
