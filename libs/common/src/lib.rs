//! Common library for the inventory application
//!
//! This crate provides the storage abstractions shared across the
//! inventory services: hierarchical document paths, a constraint-based
//! query DSL, the document and blob store traits, and the Postgres, S3
//! and in-memory adapters behind them.

pub mod blob;
pub mod database;
pub mod document;
pub mod error;
pub mod memory;
pub mod postgres;
pub mod s3;
