//! Material loading subsystem
//!
//! File-based (MTL) materials for loaded levels.

pub mod mtl_parser;

pub use mtl_parser::{MtlData, MtlError, MtlParser};
