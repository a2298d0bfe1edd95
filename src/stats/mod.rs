//! Stats module - grouped counts and the pressure index

mod calculator;

pub use calculator::{
    Analyzer, AnalyzerError, DashboardData, GroupCount, PressureRow,
};
