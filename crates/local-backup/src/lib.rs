//! # local-backup
//! Backup a local directory with duplicity running in a container, and check that the backups
//! are recent.
//!

pub mod cli;
pub mod config;
pub mod freshness;
pub mod invocation;
pub mod operations;
pub mod runner;
pub mod startup;
pub mod status;
