//! Filter Module
//! Optional state/district/month predicates over the loaded table.

use polars::prelude::*;

use super::{COL_DISTRICT, COL_MONTH, COL_STATE};

/// Analyst's current filter choices. `None` means "All" - no constraint on
/// that attribute. Present predicates are AND-combined.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct FilterSelection {
    pub state: Option<String>,
    pub district: Option<String>,
    pub month: Option<i32>,
}

impl FilterSelection {
    /// True when no predicate is set.
    pub fn is_all(&self) -> bool {
        self.state.is_none() && self.district.is_none() && self.month.is_none()
    }

    /// Apply the selection, returning a new table. The source table is
    /// never mutated. A district that does not occur within the selected
    /// state simply produces an empty result.
    pub fn apply(&self, df: &DataFrame) -> Result<DataFrame, PolarsError> {
        let mut lf = df.clone().lazy();

        if let Some(state) = &self.state {
            lf = lf.filter(col(COL_STATE).eq(lit(state.as_str())));
        }
        if let Some(district) = &self.district {
            lf = lf.filter(col(COL_DISTRICT).eq(lit(district.as_str())));
        }
        if let Some(month) = self.month {
            lf = lf.filter(col(COL_MONTH).eq(lit(month)));
        }

        lf.collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use polars::df;

    fn sample() -> DataFrame {
        df!(
            COL_STATE => ["A", "A", "A", "B"],
            COL_DISTRICT => ["X", "X", "Y", "Z"],
            COL_MONTH => [1i32, 1, 2, 2],
        )
        .unwrap()
    }

    #[test]
    fn wildcard_returns_everything() {
        let df = sample();
        let sel = FilterSelection::default();
        assert!(sel.is_all());
        assert_eq!(sel.apply(&df).unwrap().height(), df.height());
    }

    #[test]
    fn predicates_are_and_combined() {
        let df = sample();
        let sel = FilterSelection {
            state: Some("A".into()),
            district: None,
            month: Some(1),
        };
        assert_eq!(sel.apply(&df).unwrap().height(), 2);
    }

    #[test]
    fn application_order_is_irrelevant() {
        let df = sample();
        let combined = FilterSelection {
            state: Some("A".into()),
            district: Some("X".into()),
            month: Some(1),
        };

        let month_first = FilterSelection {
            month: Some(1),
            ..Default::default()
        };
        let district_then = FilterSelection {
            district: Some("X".into()),
            ..Default::default()
        };
        let state_last = FilterSelection {
            state: Some("A".into()),
            ..Default::default()
        };

        let staged = state_last
            .apply(&district_then.apply(&month_first.apply(&df).unwrap()).unwrap())
            .unwrap();

        assert!(combined.apply(&df).unwrap().equals(&staged));
    }

    #[test]
    fn district_outside_state_is_empty_not_error() {
        let df = sample();
        let sel = FilterSelection {
            state: Some("B".into()),
            district: Some("X".into()),
            month: None,
        };
        assert_eq!(sel.apply(&df).unwrap().height(), 0);
    }

    #[test]
    fn source_table_is_untouched() {
        let df = sample();
        let sel = FilterSelection {
            month: Some(1),
            ..Default::default()
        };
        sel.apply(&df).unwrap();
        assert_eq!(df.height(), 4);
    }
}
