//! Utility functions for display formatting.

pub mod format;

// Re-export commonly used functions at module level
pub use format::{format_date, format_phone, format_week_label, kst_to_utc, truncate_string, week_of_month};
