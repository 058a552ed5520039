//! Result normalization and output shaping

mod builder;
mod database_model;
mod elements;
mod output;

pub use builder::build_model;
pub use database_model::DdlOutput;
pub use elements::*;
pub use output::{render, OutputMode, ParseOptions};
