//! dbterd engine - Core business logic
//!
//! This crate implements the conversion from dbt artifacts to DBML:
//! - Table emission for catalog nodes joined to schema models
//! - Relationship emission from `relationships` tests
//! - The end-to-end generate pipeline

pub mod dbml;
pub mod generate;

pub use dbml::{write_table, write_relationships, relationships, Relationship};
pub use generate::{generate, render, write_dbml, GenerateSummary};
