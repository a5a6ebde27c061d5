//! Input/output layer of vafboot-rs: reading variant observation tables into
//! a validated [`vaf_bootstrap::VariantTable`], and writing resampling
//! results to disk.

pub mod read;
pub mod write;

pub use read::TableReader;
pub use write::ResultWriter;
