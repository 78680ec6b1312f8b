pub mod analysis;
pub mod analyze;
pub mod cli;
pub mod collect;
pub mod config;
pub mod error;
pub mod git;
pub mod model;
pub mod normalize;
pub mod parse;
pub mod report;
pub mod table;
pub mod util;
