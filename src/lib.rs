//! Aadhaar Pulse - Aadhaar Update Analysis Dashboard & Dataset Compressor
//!
//! Library crate shared by the dashboard binary and the `compress_data`
//! batch utility.

pub mod charts;
pub mod compress;
pub mod data;
pub mod gui;
pub mod stats;
