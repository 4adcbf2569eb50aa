pub mod aggregate;
pub mod commands;
pub mod config;
pub mod context;
pub mod derive;
pub mod indicators;
pub mod ingest;
pub mod marks;
pub mod models;
pub mod persistence;
pub mod workbench;
