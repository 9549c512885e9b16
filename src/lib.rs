pub mod analyzers;
pub mod config;
pub mod ingest;
pub mod output;
