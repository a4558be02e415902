pub mod cli;
pub mod config;
pub mod error;
pub mod export;
pub mod logging;
pub mod query;
pub mod reference;
pub mod workbook;
