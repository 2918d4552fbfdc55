//! CLI command implementations.

pub mod compare;
pub mod normalize;
pub mod product;

pub use compare::{CompareCommand, CompareOptions};
pub use normalize::NormalizeCommand;
pub use product::ProductCommand;
