//! Export core modules shared by the CLI and external request layers.

#[cfg(feature = "excel")]
pub mod excel_core;
