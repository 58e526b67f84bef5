use super::aggregate::{
    EmissionCategory, MonthlyTrendPoint, ReductionTarget, ScopeOneAggregate, YearOverYearPoint,
};

/// The ready-made inventory the wizard opens on: four direct-emission
/// categories, a fiscal-year monthly trend, three reported years and the
/// candidate reduction-target years.
pub fn default_aggregate() -> ScopeOneAggregate {
    ScopeOneAggregate {
        total: 261.0,
        unit: "t-CO2".to_string(),
        current_year: "2022年度".to_string(),
        categories: vec![
            category("社有車", 124.5, 47.7, "bg-purple-500"),
            category("定置燃焼機器", 78.2, 30.0, "bg-indigo-500"),
            category("空調設備", 42.3, 16.2, "bg-sky-500"),
            category("その他", 16.0, 6.1, "bg-teal-500"),
        ],
        monthly_trend: vec![
            trend_point("4月", 22.5),
            trend_point("5月", 21.8),
            trend_point("6月", 23.1),
            trend_point("7月", 24.6),
            trend_point("8月", 25.3),
            trend_point("9月", 24.1),
            trend_point("10月", 20.8),
            trend_point("11月", 19.5),
            trend_point("12月", 18.9),
            trend_point("1月", 20.2),
            trend_point("2月", 19.6),
            trend_point("3月", 20.6),
        ],
        year_over_year: vec![
            YearOverYearPoint {
                year: "2020年度".to_string(),
                value: 285.6,
            },
            YearOverYearPoint {
                year: "2021年度".to_string(),
                value: 272.4,
            },
            YearOverYearPoint {
                year: "2022年度".to_string(),
                value: 261.0,
            },
        ],
        reduction_targets: vec![
            ReductionTarget {
                year: "2023年度".to_string(),
                target: 235.0,
            },
            ReductionTarget {
                year: "2025年度".to_string(),
                target: 209.0,
            },
            ReductionTarget {
                year: "2030年度".to_string(),
                target: 157.0,
            },
        ],
    }
}

fn category(name: &str, value: f64, percentage: f64, color: &str) -> EmissionCategory {
    EmissionCategory {
        name: name.to_string(),
        value,
        percentage,
        color: color.to_string(),
    }
}

fn trend_point(month: &str, value: f64) -> MonthlyTrendPoint {
    MonthlyTrendPoint {
        month: month.to_string(),
        value,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_dataset_covers_a_full_fiscal_year() {
        let aggregate = default_aggregate();
        assert_eq!(aggregate.categories.len(), 4);
        assert_eq!(aggregate.monthly_trend.len(), 12);
        assert_eq!(aggregate.monthly_trend[0].month, "4月");
        assert_eq!(aggregate.monthly_trend[11].month, "3月");
    }

    #[test]
    fn default_current_year_is_the_latest_reported_year() {
        let aggregate = default_aggregate();
        let latest = aggregate.year_over_year.last().expect("reported years");
        assert_eq!(latest.year, aggregate.current_year);
        assert_eq!(latest.value, aggregate.total);
    }
}
