//! Compression Transform Module
//! Batch shrink of the on-disk dataset: drops scratch columns, narrows
//! numeric storage, and dictionary-encodes the repeated string columns.

use polars::prelude::*;
use serde::Serialize;
use std::fs;
use std::fs::File;
use std::path::Path;
use thiserror::Error;
use tracing::{debug, info};

use crate::data::{COL_DISTRICT, COL_STATE, COL_UPDATE_TYPE};

/// Scratch columns with no analytical value; dropped when present.
pub const DROP_COLUMNS: [&str; 3] = ["raw_id", "uuid", "remarks"];

/// Heavily repeated string columns, stored dictionary-coded.
pub const CATEGORY_COLUMNS: [&str; 3] = [COL_STATE, COL_DISTRICT, COL_UPDATE_TYPE];

#[derive(Error, Debug)]
pub enum CompressError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to process CSV: {0}")]
    Csv(#[from] PolarsError),
    #[error("Column '{column}' range {min}..={max} exceeds 32-bit integers")]
    RangeOverflow {
        column: String,
        min: i64,
        max: i64,
    },
}

/// One numeric column whose storage width was reduced.
#[derive(Debug, Clone, Serialize)]
pub struct NarrowedColumn {
    pub name: String,
    pub from: String,
    pub to: String,
}

/// Outcome of one compression run.
#[derive(Debug, Clone, Serialize)]
pub struct CompressionReport {
    pub original_bytes: u64,
    pub compressed_bytes: u64,
    pub dropped_columns: Vec<String>,
    pub narrowed_columns: Vec<NarrowedColumn>,
}

impl CompressionReport {
    pub fn original_mb(&self) -> f64 {
        self.original_bytes as f64 / (1024.0 * 1024.0)
    }

    pub fn compressed_mb(&self) -> f64 {
        self.compressed_bytes as f64 / (1024.0 * 1024.0)
    }
}

/// Smallest signed integer type holding the observed range, if any fits
/// the 32-bit ceiling.
fn narrow_int_dtype(min: i64, max: i64) -> Option<DataType> {
    if min >= i8::MIN as i64 && max <= i8::MAX as i64 {
        Some(DataType::Int8)
    } else if min >= i16::MIN as i64 && max <= i16::MAX as i64 {
        Some(DataType::Int16)
    } else if min >= i32::MIN as i64 && max <= i32::MAX as i64 {
        Some(DataType::Int32)
    } else {
        None
    }
}

/// Runs the compression transform end to end.
pub struct Compressor;

impl Compressor {
    /// Load `input`, shrink it, and write the result to `output`.
    ///
    /// Integer narrowing is validate-then-narrow: the observed range is
    /// checked first and a range beyond 32 bits aborts the whole run
    /// instead of wrapping. Float narrowing to f32 is accepted precision
    /// loss. Rerunning on the output is a clean no-op size-wise.
    pub fn run(input: &Path, output: &Path) -> Result<CompressionReport, CompressError> {
        let original_bytes = fs::metadata(input)?.len();

        let input_str = input.to_string_lossy();
        let mut df = LazyCsvReader::new(input_str.as_ref())
            .with_infer_schema_length(Some(10000))
            .finish()?
            .collect()?;

        let mut dropped_columns = Vec::new();
        for name in DROP_COLUMNS {
            if df.column(name).is_ok() {
                df = df.drop(name)?;
                dropped_columns.push(name.to_string());
            }
        }

        let (casts, narrowed_columns) = Self::plan_narrowing(&df)?;
        if !casts.is_empty() {
            df = df.lazy().with_columns(casts).collect()?;
        }

        for name in CATEGORY_COLUMNS {
            if df.column(name).is_ok() {
                df = df
                    .lazy()
                    .with_column(col(name).cast(DataType::Categorical(
                        None,
                        CategoricalOrdering::Physical,
                    )))
                    .collect()?;
            }
        }

        let mut file = File::create(output)?;
        CsvWriter::new(&mut file).finish(&mut df)?;

        let compressed_bytes = fs::metadata(output)?.len();
        info!(
            original_bytes,
            compressed_bytes,
            dropped = dropped_columns.len(),
            narrowed = narrowed_columns.len(),
            "compression complete"
        );

        Ok(CompressionReport {
            original_bytes,
            compressed_bytes,
            dropped_columns,
            narrowed_columns,
        })
    }

    /// Decide the narrowing cast for every wide numeric column, validating
    /// integer ranges before committing to a width.
    fn plan_narrowing(
        df: &DataFrame,
    ) -> Result<(Vec<Expr>, Vec<NarrowedColumn>), CompressError> {
        let mut casts = Vec::new();
        let mut narrowed = Vec::new();

        for column in df.get_columns() {
            let name = column.name().to_string();
            match column.dtype() {
                DataType::Int64 => {
                    let ca = column.i64()?;
                    // All-null columns carry no range; 32 bits is a safe floor.
                    let target = match (ca.min(), ca.max()) {
                        (Some(min), Some(max)) => {
                            narrow_int_dtype(min, max).ok_or(CompressError::RangeOverflow {
                                column: name.clone(),
                                min,
                                max,
                            })?
                        }
                        _ => DataType::Int32,
                    };
                    debug!(column = %name, to = %target, "narrowing integer column");
                    casts.push(col(name.as_str()).cast(target.clone()));
                    narrowed.push(NarrowedColumn {
                        name,
                        from: DataType::Int64.to_string(),
                        to: target.to_string(),
                    });
                }
                DataType::Float64 => {
                    debug!(column = %name, "narrowing float column");
                    casts.push(col(name.as_str()).cast(DataType::Float32));
                    narrowed.push(NarrowedColumn {
                        name,
                        from: DataType::Float64.to_string(),
                        to: DataType::Float32.to_string(),
                    });
                }
                _ => {}
            }
        }

        Ok((casts, narrowed))
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

    fn out_path() -> tempfile::NamedTempFile {
        tempfile::NamedTempFile::new().expect("output file")
    }

    const SAMPLE: &str = "state,district,update_type,date,updates,score,raw_id,uuid,remarks\n\
        Kerala,Kochi,address,2023-01-05,120,0.5,1,aa-1,ok\n\
        Kerala,Kannur,biometric,2023-01-10,40000,1.25,2,aa-2,fine\n\
        Goa,Panaji,address,2023-02-01,7,2.5,3,aa-3,meh\n";

    #[test]
    fn drops_scratch_columns_and_reports_them() {
        let input = write_csv(SAMPLE);
        let output = out_path();
        let report = Compressor::run(input.path(), output.path()).expect("compress");

        assert_eq!(report.dropped_columns, vec!["raw_id", "uuid", "remarks"]);

        let df = LazyCsvReader::new(output.path().to_string_lossy().as_ref())
            .finish()
            .unwrap()
            .collect()
            .unwrap();
        for gone in DROP_COLUMNS {
            assert!(df.column(gone).is_err());
        }
    }

    #[test]
    fn absent_drop_columns_are_not_an_error() {
        let input = write_csv("state,district,date,updates\nKerala,Kochi,2023-01-05,12\n");
        let output = out_path();
        let report = Compressor::run(input.path(), output.path()).expect("compress");
        assert!(report.dropped_columns.is_empty());
    }

    #[test]
    fn integers_narrow_to_smallest_fitting_width() {
        let input = write_csv(SAMPLE);
        let output = out_path();
        let report = Compressor::run(input.path(), output.path()).expect("compress");

        let updates = report
            .narrowed_columns
            .iter()
            .find(|c| c.name == "updates")
            .expect("updates narrowed");
        // max observed 40000 needs 32 bits, not 16
        assert_eq!(updates.to, DataType::Int32.to_string());

        let score = report
            .narrowed_columns
            .iter()
            .find(|c| c.name == "score")
            .expect("score narrowed");
        assert_eq!(score.to, DataType::Float32.to_string());
    }

    #[test]
    fn out_of_range_integer_aborts_the_run() {
        let input =
            write_csv("state,district,date,updates\nKerala,Kochi,2023-01-05,3000000000\n");
        let output = out_path();
        let err = Compressor::run(input.path(), output.path()).unwrap_err();
        assert!(
            matches!(err, CompressError::RangeOverflow { ref column, .. } if column == "updates")
        );
    }

    #[test]
    fn strings_and_numbers_round_trip() {
        let input = write_csv(SAMPLE);
        let output = out_path();
        Compressor::run(input.path(), output.path()).expect("compress");

        let df = LazyCsvReader::new(output.path().to_string_lossy().as_ref())
            .finish()
            .unwrap()
            .collect()
            .unwrap();

        let states: Vec<&str> = df
            .column("state")
            .unwrap()
            .str()
            .unwrap()
            .into_no_null_iter()
            .collect();
        assert_eq!(states, vec!["Kerala", "Kerala", "Goa"]);

        let updates: Vec<i64> = df
            .column("updates")
            .unwrap()
            .i64()
            .unwrap()
            .into_no_null_iter()
            .collect();
        assert_eq!(updates, vec![120, 40000, 7]);

        let scores: Vec<f64> = df
            .column("score")
            .unwrap()
            .f64()
            .unwrap()
            .into_no_null_iter()
            .collect();
        assert_eq!(scores, vec![0.5, 1.25, 2.5]);
    }

    #[test]
    fn recompression_is_a_size_noop() {
        let input = write_csv(SAMPLE);
        let first = out_path();
        let second = out_path();

        Compressor::run(input.path(), first.path()).expect("first run");
        let report = Compressor::run(first.path(), second.path()).expect("second run");

        assert_eq!(report.original_bytes, report.compressed_bytes);
    }

    #[test]
    fn report_carries_byte_sizes() {
        let input = write_csv(SAMPLE);
        let output = out_path();
        let report = Compressor::run(input.path(), output.path()).expect("compress");

        assert_eq!(
            report.original_bytes,
            fs::metadata(input.path()).unwrap().len()
        );
        assert_eq!(
            report.compressed_bytes,
            fs::metadata(output.path()).unwrap().len()
        );
        assert!(report.compressed_bytes < report.original_bytes);
    }
}
