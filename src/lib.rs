//! amz-compare - Side-by-side Amazon product comparison CLI
//!
//! Fetches two product pages, lines their specifications up, normalizes
//! units, ranks each row and summarizes the strengths of each product.

pub mod advice;
pub mod amazon;
pub mod commands;
pub mod comparison;
pub mod config;
pub mod format;
pub mod source;

pub use amazon::models::ProductRecord;
pub use amazon::regions::Region;
pub use comparison::{compare_products, ComparisonEngine, ComparisonResult, Locale};
pub use config::Config;
