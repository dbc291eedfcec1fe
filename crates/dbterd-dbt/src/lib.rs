//! dbt artifact parsing
//!
//! This crate handles:
//! - Parsing catalog.json (warehouse tables and columns)
//! - Parsing schema.yml (model descriptions and column tests)
//! - Extracting parent tables from `relationships` tests

pub mod catalog;
pub mod schema;
pub mod relationship;

pub use catalog::{Catalog, CatalogNode, CatalogColumn, NodeMetadata};
pub use schema::{SchemaFile, SchemaModel, SchemaColumn, TestEntry, RelationshipTest};
pub use relationship::RelationshipTarget;

use dbterd_core::Result;
use std::path::Path;

/// Load the catalog and schema documents
pub fn load(catalog_path: &Path, schema_path: &Path) -> Result<(Catalog, SchemaFile)> {
    let catalog = Catalog::from_file(catalog_path)?;
    let schema = SchemaFile::from_file(schema_path)?;
    Ok((catalog, schema))
}
