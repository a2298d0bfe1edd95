//! CSV Dataset Loader Module
//! Reads the update-record CSV into memory and derives the month column.

use polars::prelude::*;
use std::path::PathBuf;
use thiserror::Error;
use tracing::debug;

use super::{COL_DATE, COL_DISTRICT, COL_MONTH, COL_STATE};

#[derive(Error, Debug)]
pub enum LoaderError {
    #[error("Failed to load CSV: {0}")]
    CsvError(#[from] PolarsError),
    #[error("Missing required column '{0}'")]
    MissingColumn(String),
    #[error("Unparseable date values: {0}")]
    DateParse(PolarsError),
    #[error("No data loaded")]
    NoData,
}

/// Read the dataset from disk: full CSV read, required-column check,
/// strict date parse, derived `month` column.
///
/// Date parsing is strict on purpose: a single bad date fails the whole
/// load rather than silently dropping rows.
pub fn read_dataset(path: &str) -> Result<DataFrame, LoaderError> {
    let raw = LazyCsvReader::new(path)
        .with_infer_schema_length(Some(10000))
        .finish()?
        .collect()?;

    for required in [COL_STATE, COL_DISTRICT, COL_DATE] {
        if raw.column(required).is_err() {
            return Err(LoaderError::MissingColumn(required.to_string()));
        }
    }

    let df = raw
        .lazy()
        .with_column(
            col(COL_DATE)
                .str()
                .to_date(StrptimeOptions {
                    strict: true,
                    ..Default::default()
                })
                .alias(COL_DATE),
        )
        .with_column(col(COL_DATE).dt().month().cast(DataType::Int32).alias(COL_MONTH))
        .collect()
        .map_err(LoaderError::DateParse)?;

    debug!(rows = df.height(), cols = df.width(), path, "dataset loaded");
    Ok(df)
}

/// Session cache around [`read_dataset`]: the file is read once per path and
/// the in-memory table is reused for the rest of the session.
pub struct DataLoader {
    df: Option<DataFrame>,
    file_path: Option<PathBuf>,
}

impl Default for DataLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl DataLoader {
    pub fn new() -> Self {
        Self {
            df: None,
            file_path: None,
        }
    }

    /// Load a CSV file, returning the cached table when this path has
    /// already been read this session.
    pub fn load_csv(&mut self, file_path: &str) -> Result<&DataFrame, LoaderError> {
        let path = PathBuf::from(file_path);
        if self.df.is_some() && self.file_path.as_deref() == Some(path.as_path()) {
            return self.df.as_ref().ok_or(LoaderError::NoData);
        }

        let df = read_dataset(file_path)?;
        self.file_path = Some(path);
        self.df = Some(df);
        self.df.as_ref().ok_or(LoaderError::NoData)
    }

    /// Sorted unique states observed in the dataset.
    pub fn states(&self) -> Vec<String> {
        let Some(df) = &self.df else {
            return Vec::new();
        };
        Self::unique_sorted(df, COL_STATE)
    }

    /// Sorted unique districts, optionally constrained to one state.
    pub fn districts(&self, state: Option<&str>) -> Vec<String> {
        let Some(df) = &self.df else {
            return Vec::new();
        };

        match state {
            None => Self::unique_sorted(df, COL_DISTRICT),
            Some(state) => df
                .clone()
                .lazy()
                .filter(col(COL_STATE).eq(lit(state)))
                .collect()
                .map(|scoped| Self::unique_sorted(&scoped, COL_DISTRICT))
                .unwrap_or_default(),
        }
    }

    /// Sorted non-null unique values of a column, as strings.
    fn unique_sorted(df: &DataFrame, column: &str) -> Vec<String> {
        df.column(column)
            .ok()
            .and_then(|col| col.unique().ok())
            .map(|unique| {
                let series = unique.as_materialized_series();
                let mut values: Vec<String> = (0..series.len())
                    .filter_map(|i| {
                        let val = series.get(i).ok()?;
                        if val.is_null() {
                            None
                        } else {
                            Some(val.to_string().trim_matches('"').to_string())
                        }
                    })
                    .collect();
                values.sort();
                values
            })
            .unwrap_or_default()
    }

    /// Get the number of rows in the DataFrame.
    pub fn get_row_count(&self) -> usize {
        self.df.as_ref().map(|df| df.height()).unwrap_or(0)
    }

    /// Get a reference to the loaded DataFrame.
    pub fn get_dataframe(&self) -> Option<&DataFrame> {
        self.df.as_ref()
    }

    /// Get file path.
    pub fn get_file_path(&self) -> Option<&PathBuf> {
        self.file_path.as_ref()
    }

    /// Set DataFrame directly (used for async loading)
    pub fn set_dataframe(&mut self, df: DataFrame, path: PathBuf) {
        self.df = Some(df);
        self.file_path = Some(path);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_csv(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        file.write_all(contents.as_bytes()).expect("write csv");
        file
    }

    #[test]
    fn derives_month_from_date() {
        let file = write_csv(
            "state,district,date\n\
             A,X,2023-01-05\n\
             A,X,2023-01-10\n\
             A,Y,2023-02-01\n",
        );
        let df = read_dataset(file.path().to_str().unwrap()).expect("load");

        assert_eq!(df.height(), 3);
        let months: Vec<i32> = df
            .column(COL_MONTH)
            .unwrap()
            .i32()
            .unwrap()
            .into_no_null_iter()
            .collect();
        assert_eq!(months, vec![1, 1, 2]);
    }

    #[test]
    fn missing_required_column_fails() {
        let file = write_csv("state,date\nA,2023-01-05\n");
        let err = read_dataset(file.path().to_str().unwrap()).unwrap_err();
        assert!(matches!(err, LoaderError::MissingColumn(c) if c == COL_DISTRICT));
    }

    #[test]
    fn unparseable_date_fails() {
        let file = write_csv("state,district,date\nA,X,not-a-date\n");
        let err = read_dataset(file.path().to_str().unwrap()).unwrap_err();
        assert!(matches!(err, LoaderError::DateParse(_)));
    }

    #[test]
    fn missing_file_fails() {
        assert!(matches!(
            read_dataset("/no/such/file.csv"),
            Err(LoaderError::CsvError(_))
        ));
    }

    #[test]
    fn reload_of_same_path_reuses_cache() {
        let file = write_csv("state,district,date\nA,X,2023-01-05\n");
        let path = file.path().to_str().unwrap().to_string();

        let mut loader = DataLoader::new();
        loader.load_csv(&path).expect("first load");
        drop(file); // file gone from disk; cached table must still serve
        let df = loader.load_csv(&path).expect("cached load");
        assert_eq!(df.height(), 1);
    }

    #[test]
    fn districts_are_scoped_to_state() {
        let file = write_csv(
            "state,district,date\n\
             A,X,2023-01-05\n\
             A,Y,2023-02-01\n\
             B,Z,2023-03-01\n",
        );
        let mut loader = DataLoader::new();
        loader
            .load_csv(file.path().to_str().unwrap())
            .expect("load");

        assert_eq!(loader.states(), vec!["A", "B"]);
        assert_eq!(loader.districts(None), vec!["X", "Y", "Z"]);
        assert_eq!(loader.districts(Some("A")), vec!["X", "Y"]);
        assert_eq!(loader.districts(Some("B")), vec!["Z"]);
    }
}
