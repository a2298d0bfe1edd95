//! Aggregation Engine Module
//! Grouped record counts, the per-district pressure index, and the
//! dashboard view-model assembled from them.

use polars::prelude::*;
use thiserror::Error;

use crate::data::{COL_DISTRICT, COL_MONTH, COL_STATE};

#[derive(Error, Debug)]
pub enum AnalyzerError {
    #[error("Polars error: {0}")]
    PolarsError(#[from] PolarsError),
}

/// Count of records sharing one grouping-key value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupCount {
    pub key: String,
    pub count: u32,
}

/// A district's count plus its pressure index: count divided by the mean
/// count over all districts of the same computation. Indices are only
/// comparable within one computation - the mean moves with the filter.
#[derive(Debug, Clone, PartialEq)]
pub struct PressureRow {
    pub district: String,
    pub count: u32,
    pub pressure_index: f64,
}

/// Everything the four dashboard views render, computed in one pass over
/// the filtered table.
#[derive(Debug, Clone, Default)]
pub struct DashboardData {
    pub total_records: usize,
    pub state_count: usize,
    pub district_count: usize,
    /// Max pressure index of the current computation, 0.0 when empty.
    pub max_pressure: f64,
    /// Per-state counts, descending.
    pub state_counts: Vec<GroupCount>,
    /// Per-district counts, descending.
    pub district_counts: Vec<GroupCount>,
    /// Per-month counts, month ascending.
    pub month_counts: Vec<(i32, u32)>,
    /// Pressure index per district, descending by index.
    pub pressure: Vec<PressureRow>,
    /// Month trend for each of the top-N pressure districts.
    pub district_month: Vec<(String, Vec<(i32, u32)>)>,
}

/// Handles grouped counting and pressure-index computations.
pub struct Analyzer;

impl Analyzer {
    /// Count records per distinct value of `column`. Keys appear in
    /// first-occurrence order, which makes repeated calls agree exactly;
    /// unobserved values are absent, not zero. Callers sort explicitly.
    pub fn count_by(df: &DataFrame, column: &str) -> Result<Vec<GroupCount>, AnalyzerError> {
        let grouped = df
            .clone()
            .lazy()
            .group_by_stable([col(column)])
            .agg([len().alias("count")])
            .collect()?;

        let keys = grouped.column(column)?.str()?;
        let counts = grouped.column("count")?.u32()?;

        Ok(keys
            .into_iter()
            .zip(counts)
            .filter_map(|(key, count)| {
                Some(GroupCount {
                    key: key?.to_string(),
                    count: count?,
                })
            })
            .collect())
    }

    /// Record counts per derived month, sorted ascending by month.
    pub fn monthly_counts(df: &DataFrame) -> Result<Vec<(i32, u32)>, AnalyzerError> {
        let grouped = df
            .clone()
            .lazy()
            .group_by_stable([col(COL_MONTH)])
            .agg([len().alias("count")])
            .collect()?;

        let months = grouped.column(COL_MONTH)?.i32()?;
        let counts = grouped.column("count")?.u32()?;

        let mut rows: Vec<(i32, u32)> = months
            .into_iter()
            .zip(counts)
            .filter_map(|(month, count)| Some((month?, count?)))
            .collect();
        rows.sort_by_key(|&(month, _)| month);
        Ok(rows)
    }

    /// Month trend per district, for a caller-chosen district list.
    pub fn district_month_counts(
        df: &DataFrame,
        districts: &[String],
    ) -> Result<Vec<(String, Vec<(i32, u32)>)>, AnalyzerError> {
        let mut series = Vec::with_capacity(districts.len());
        for district in districts {
            let scoped = df
                .clone()
                .lazy()
                .filter(col(COL_DISTRICT).eq(lit(district.as_str())))
                .collect()?;
            series.push((district.clone(), Self::monthly_counts(&scoped)?));
        }
        Ok(series)
    }

    /// Pressure index per group: `count / mean(count)`, ranked descending.
    /// Empty input yields an empty result - there is no mean to divide by.
    /// The sort is stable, so equal indices keep their input order.
    pub fn pressure_index(counts: &[GroupCount]) -> Vec<PressureRow> {
        if counts.is_empty() {
            return Vec::new();
        }

        let mean = counts.iter().map(|c| c.count as f64).sum::<f64>() / counts.len() as f64;
        let mut rows: Vec<PressureRow> = counts
            .iter()
            .map(|c| PressureRow {
                district: c.key.clone(),
                count: c.count,
                pressure_index: c.count as f64 / mean,
            })
            .collect();

        rows.sort_by(|a, b| {
            b.pressure_index
                .partial_cmp(&a.pressure_index)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        rows
    }

    /// First `n` rows of a ranked sequence; shorter sequences come back
    /// whole.
    pub fn top_n<T: Clone>(rows: &[T], n: usize) -> Vec<T> {
        rows.iter().take(n).cloned().collect()
    }

    /// Sort counts descending, keeping first-occurrence order on ties.
    fn sorted_desc(mut counts: Vec<GroupCount>) -> Vec<GroupCount> {
        counts.sort_by(|a, b| b.count.cmp(&a.count));
        counts
    }

    /// Assemble the view-model for all four dashboard views from an
    /// already-filtered table.
    pub fn compute_dashboard(df: &DataFrame, top_n: usize) -> Result<DashboardData, AnalyzerError> {
        let state_counts = Self::count_by(df, COL_STATE)?;
        let district_counts = Self::count_by(df, COL_DISTRICT)?;
        let month_counts = Self::monthly_counts(df)?;

        let pressure = Self::pressure_index(&district_counts);
        let max_pressure = pressure.first().map(|r| r.pressure_index).unwrap_or(0.0);

        let top_districts: Vec<String> = Self::top_n(&pressure, top_n)
            .into_iter()
            .map(|r| r.district)
            .collect();
        let district_month = Self::district_month_counts(df, &top_districts)?;

        Ok(DashboardData {
            total_records: df.height(),
            state_count: state_counts.len(),
            district_count: district_counts.len(),
            max_pressure,
            state_counts: Self::sorted_desc(state_counts),
            district_counts: Self::sorted_desc(district_counts),
            month_counts,
            pressure,
            district_month,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use polars::df;

    fn sample() -> DataFrame {
        df!(
            COL_STATE => ["A", "A", "A"],
            COL_DISTRICT => ["X", "X", "Y"],
            COL_MONTH => [1i32, 1, 2],
        )
        .unwrap()
    }

    fn counts(pairs: &[(&str, u32)]) -> Vec<GroupCount> {
        pairs
            .iter()
            .map(|&(key, count)| GroupCount {
                key: key.to_string(),
                count,
            })
            .collect()
    }

    #[test]
    fn count_by_district_in_first_occurrence_order() {
        let rows = Analyzer::count_by(&sample(), COL_DISTRICT).unwrap();
        assert_eq!(rows, counts(&[("X", 2), ("Y", 1)]));
    }

    #[test]
    fn count_by_is_deterministic_across_calls() {
        let df = sample();
        let first = Analyzer::count_by(&df, COL_DISTRICT).unwrap();
        let second = Analyzer::count_by(&df, COL_DISTRICT).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn pressure_matches_worked_example() {
        let rows = Analyzer::pressure_index(&counts(&[("X", 2), ("Y", 1)]));
        assert_eq!(rows.len(), 2);
        // mean = 1.5 => indices 1.333.. and 0.666.., X ranked first
        assert_eq!(rows[0].district, "X");
        assert!((rows[0].pressure_index - 2.0 / 1.5).abs() < 1e-12);
        assert_eq!(rows[1].district, "Y");
        assert!((rows[1].pressure_index - 1.0 / 1.5).abs() < 1e-12);
    }

    #[test]
    fn pressure_mean_is_one_and_counts_survive() {
        let input = counts(&[("X", 7), ("Y", 3), ("Z", 5)]);
        let rows = Analyzer::pressure_index(&input);

        let mean_index =
            rows.iter().map(|r| r.pressure_index).sum::<f64>() / rows.len() as f64;
        assert!((mean_index - 1.0).abs() < 1e-12);

        let in_sum: u32 = input.iter().map(|c| c.count).sum();
        let out_sum: u32 = rows.iter().map(|r| r.count).sum();
        assert_eq!(in_sum, out_sum);
    }

    #[test]
    fn single_group_pressure_is_one() {
        let rows = Analyzer::pressure_index(&counts(&[("X", 2)]));
        assert_eq!(rows.len(), 1);
        assert!((rows[0].pressure_index - 1.0).abs() < 1e-12);
    }

    #[test]
    fn empty_input_gives_empty_result() {
        assert!(Analyzer::pressure_index(&[]).is_empty());
    }

    #[test]
    fn equal_indices_keep_input_order() {
        let rows = Analyzer::pressure_index(&counts(&[("B", 4), ("A", 4), ("C", 4)]));
        let order: Vec<&str> = rows.iter().map(|r| r.district.as_str()).collect();
        assert_eq!(order, vec!["B", "A", "C"]);
    }

    #[test]
    fn top_n_handles_zero_and_overlong() {
        let rows = counts(&[("X", 2), ("Y", 1)]);
        assert!(Analyzer::top_n(&rows, 0).is_empty());
        assert_eq!(Analyzer::top_n(&rows, 1), counts(&[("X", 2)]));
        assert_eq!(Analyzer::top_n(&rows, 10), rows);
    }

    #[test]
    fn monthly_counts_sorted_by_month() {
        let df = df!(
            COL_STATE => ["A", "A", "A"],
            COL_DISTRICT => ["X", "Y", "X"],
            COL_MONTH => [3i32, 1, 3],
        )
        .unwrap();
        let rows = Analyzer::monthly_counts(&df).unwrap();
        assert_eq!(rows, vec![(1, 1), (3, 2)]);
    }

    #[test]
    fn dashboard_over_month_filter() {
        use crate::data::FilterSelection;

        let sel = FilterSelection {
            month: Some(1),
            ..Default::default()
        };
        let filtered = sel.apply(&sample()).unwrap();
        let data = Analyzer::compute_dashboard(&filtered, 10).unwrap();

        assert_eq!(data.total_records, 2);
        assert_eq!(data.district_counts, counts(&[("X", 2)]));
        // a single surviving group always has index 1.0
        assert!((data.max_pressure - 1.0).abs() < 1e-12);
        assert_eq!(data.month_counts, vec![(1, 2)]);
    }

    #[test]
    fn dashboard_over_empty_table_is_all_zero() {
        let sel = crate::data::FilterSelection {
            state: Some("missing".into()),
            ..Default::default()
        };
        let filtered = sel.apply(&sample()).unwrap();
        let data = Analyzer::compute_dashboard(&filtered, 10).unwrap();

        assert_eq!(data.total_records, 0);
        assert!(data.pressure.is_empty());
        assert!(data.district_month.is_empty());
        assert_eq!(data.max_pressure, 0.0);
    }

    #[test]
    fn district_month_trend_is_scoped() {
        let df = df!(
            COL_STATE => ["A", "A", "A", "A"],
            COL_DISTRICT => ["X", "X", "Y", "X"],
            COL_MONTH => [1i32, 2, 1, 1],
        )
        .unwrap();
        let series =
            Analyzer::district_month_counts(&df, &["X".to_string(), "Y".to_string()]).unwrap();
        assert_eq!(series[0], ("X".to_string(), vec![(1, 2), (2, 1)]));
        assert_eq!(series[1], ("Y".to_string(), vec![(1, 1)]));
    }
}
