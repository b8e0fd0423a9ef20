//! Ingestion: read exports, drop unusable rows, normalize the rest.

pub mod normalize;
pub mod raw;
pub mod reader;

pub use normalize::Normalizer;
pub use raw::RawRecord;
pub use reader::{read_alias_table, read_records};
