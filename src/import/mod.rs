//! Import functionality
//!
//! Parsers that bring a data package back into memory:
//! - `datapackage.json` descriptors
//! - the four flat metadata CSV tables written by `export::datapackage_to_csv`

mod csv;
mod datapackage;

pub use self::csv::{csv_to_datapackage, unflatten};
pub use datapackage::read_datapackage;
