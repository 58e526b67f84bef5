use serde::{Deserialize, Serialize};

/// Allowed drift of the percentage sum from 100, per category.
const PERCENTAGE_EPSILON: f64 = 0.1;
/// Relative tolerance when comparing `total` against the category sum.
const TOTAL_TOLERANCE: f64 = 1e-6;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmissionCategory {
    pub name: String,
    pub value: f64,
    pub percentage: f64, // share of total, one decimal
    pub color: String,   // opaque style token, e.g. "bg-purple-500"
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyTrendPoint {
    pub month: String,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YearOverYearPoint {
    pub year: String,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReductionTarget {
    pub year: String,
    pub target: f64,
}

/// The full derived inventory for one point in time. Serialized with
/// camelCase keys to stay readable by lists persisted before this crate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScopeOneAggregate {
    pub total: f64,
    pub unit: String,
    /// The year-over-year entry a recomputation overwrites. Lists saved
    /// before this field existed default to the original reporting year.
    #[serde(default = "default_reporting_year")]
    pub current_year: String,
    pub categories: Vec<EmissionCategory>,
    pub monthly_trend: Vec<MonthlyTrendPoint>,
    pub year_over_year: Vec<YearOverYearPoint>,
    pub reduction_targets: Vec<ReductionTarget>,
}

fn default_reporting_year() -> String {
    "2022年度".to_string()
}

impl ScopeOneAggregate {
    /// Returns why the aggregate is internally inconsistent, or None if it
    /// holds together. A zero total is the defined degenerate form: every
    /// category value and percentage must then be exactly zero.
    pub fn validation_error(&self) -> Option<String> {
        for category in &self.categories {
            if category.value < 0.0 {
                return Some(format!(
                    "category {} has negative value {}",
                    category.name, category.value
                ));
            }
            if !(0.0..=100.0).contains(&category.percentage) {
                return Some(format!(
                    "category {} percentage {} outside [0, 100]",
                    category.name, category.percentage
                ));
            }
        }

        for point in &self.monthly_trend {
            if point.value < 0.0 {
                return Some(format!(
                    "monthly trend {} has negative value {}",
                    point.month, point.value
                ));
            }
        }

        let value_sum: f64 = self.categories.iter().map(|c| c.value).sum();

        if self.total == 0.0 {
            if value_sum != 0.0 {
                return Some(format!("total is 0 but category values sum to {value_sum}"));
            }
            if let Some(category) = self.categories.iter().find(|c| c.percentage != 0.0) {
                return Some(format!(
                    "total is 0 but category {} has percentage {}",
                    category.name, category.percentage
                ));
            }
            return None;
        }

        let tolerance = TOTAL_TOLERANCE * self.total.abs().max(value_sum.abs());
        if (self.total - value_sum).abs() > tolerance {
            return Some(format!(
                "total {} does not match category sum {}",
                self.total, value_sum
            ));
        }

        let percentage_sum: f64 = self.categories.iter().map(|c| c.percentage).sum();
        let epsilon = PERCENTAGE_EPSILON * self.categories.len() as f64;
        if (percentage_sum - 100.0).abs() > epsilon {
            return Some(format!(
                "percentages sum to {percentage_sum}, expected 100 within {epsilon}"
            ));
        }

        None
    }

    pub fn is_valid(&self) -> bool {
        self.validation_error().is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::defaults::default_aggregate;

    #[test]
    fn default_dataset_is_valid() {
        assert_eq!(default_aggregate().validation_error(), None);
    }

    #[test]
    fn negative_category_value_is_invalid() {
        let mut aggregate = default_aggregate();
        aggregate.categories[0].value = -1.0;
        assert!(!aggregate.is_valid());
    }

    #[test]
    fn stale_total_is_invalid() {
        let mut aggregate = default_aggregate();
        aggregate.total += 50.0;
        assert!(aggregate
            .validation_error()
            .expect("stale total detected")
            .contains("category sum"));
    }

    #[test]
    fn drifted_percentages_are_invalid() {
        let mut aggregate = default_aggregate();
        aggregate.categories[0].percentage += 5.0;
        assert!(!aggregate.is_valid());
    }

    #[test]
    fn zero_total_with_zero_categories_is_the_valid_degenerate_form() {
        let mut aggregate = default_aggregate();
        aggregate.total = 0.0;
        for category in &mut aggregate.categories {
            category.value = 0.0;
            category.percentage = 0.0;
        }
        assert_eq!(aggregate.validation_error(), None);
    }

    #[test]
    fn zero_total_with_leftover_percentage_is_invalid() {
        let mut aggregate = default_aggregate();
        aggregate.total = 0.0;
        for category in &mut aggregate.categories {
            category.value = 0.0;
            category.percentage = 0.0;
        }
        aggregate.categories[2].percentage = 15.0;
        assert!(!aggregate.is_valid());
    }

    #[test]
    fn aggregate_json_uses_camel_case_keys() {
        let raw = serde_json::to_string(&default_aggregate()).expect("serialize aggregate");
        assert!(raw.contains("\"monthlyTrend\""));
        assert!(raw.contains("\"yearOverYear\""));
        assert!(raw.contains("\"reductionTargets\""));
        assert!(raw.contains("\"currentYear\""));
    }

    #[test]
    fn missing_current_year_falls_back_to_reporting_default() {
        let mut value = serde_json::to_value(default_aggregate()).expect("to value");
        value
            .as_object_mut()
            .expect("aggregate object")
            .remove("currentYear");
        let parsed: ScopeOneAggregate = serde_json::from_value(value).expect("parse aggregate");
        assert_eq!(parsed.current_year, "2022年度");
    }
}
