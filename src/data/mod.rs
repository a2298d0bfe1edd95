//! Data module - CSV loading and filtering

mod filter;
mod loader;

pub use filter::FilterSelection;
pub use loader::{read_dataset, DataLoader, LoaderError};

/// Required dataset columns.
pub const COL_STATE: &str = "state";
pub const COL_DISTRICT: &str = "district";
pub const COL_DATE: &str = "date";

/// Derived at load time from `date`, stored as Int32 1-12.
pub const COL_MONTH: &str = "month";

/// Update-type tag; optional, passed through untouched by the loader.
pub const COL_UPDATE_TYPE: &str = "update_type";

/// Default dataset location, matching the shipped data layout.
pub const DEFAULT_DATA_PATH: &str = "data/merged_data_clean.csv";
