//! Writing rendered reports to disk

pub mod report_file;

pub use report_file::{SaveTarget, compute_and_persist, persist_report};
