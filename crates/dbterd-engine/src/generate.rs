//! End-to-end conversion: load artifacts, join by model name, write DBML
//!
//! Output goes to a temporary file next to the destination and is renamed
//! into place only once every table and ref has been written.

use dbterd_core::{DbterdError, Result, TypeMap};
use dbterd_dbt::{Catalog, SchemaFile};
use std::io::{BufWriter, Write};
use std::path::Path;
use tempfile::NamedTempFile;

use crate::dbml::{write_relationships, write_table};

/// Counts reported after a successful run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GenerateSummary {
    /// Table blocks written
    pub tables: usize,

    /// Ref lines written
    pub relationships: usize,

    /// Catalog nodes with no schema model of the same name
    pub skipped_nodes: usize,
}

/// Write every joined table followed by every relationship
pub fn write_dbml<W: Write>(
    sink: &mut W,
    catalog: &Catalog,
    schema: &SchemaFile,
    type_map: &TypeMap,
) -> Result<GenerateSummary> {
    let models = schema.models_by_name()?;
    let mut summary = GenerateSummary::default();

    for (node_id, node) in catalog.nodes()? {
        let name = node.require_name(node_id)?;

        match models.get(name) {
            Some(model) => {
                write_table(sink, node_id, node, model, type_map)?;
                summary.tables += 1;
            }
            None => {
                tracing::debug!(node = %node_id, "no schema model named '{}', skipping", name);
                summary.skipped_nodes += 1;
            }
        }
    }

    summary.relationships = write_relationships(sink, schema)?;

    Ok(summary)
}

/// Render the DBML document in memory
pub fn render(catalog: &Catalog, schema: &SchemaFile, type_map: &TypeMap) -> Result<String> {
    let mut out = Vec::new();
    write_dbml(&mut out, catalog, schema, type_map)?;
    String::from_utf8(out).map_err(|e| DbterdError::Io(e.to_string()))
}

/// Convert a catalog and schema on disk into a DBML file
///
/// An existing file at `output_path` is replaced only if the whole document
/// was written; on error it is left untouched.
pub fn generate(
    catalog_path: &Path,
    schema_path: &Path,
    output_path: &Path,
    type_map: &TypeMap,
) -> Result<GenerateSummary> {
    let (catalog, schema) = dbterd_dbt::load(catalog_path, schema_path)?;

    tracing::debug!(
        catalog = %catalog_path.display(),
        schema = %schema_path.display(),
        "loaded artifacts"
    );

    let dir = match output_path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    // Dropped (and deleted) on any early return
    let staging = NamedTempFile::new_in(dir)?;

    let mut sink = BufWriter::new(staging);
    let summary = write_dbml(&mut sink, &catalog, &schema, type_map)?;

    let staging = sink
        .into_inner()
        .map_err(|e| DbterdError::Io(e.error().to_string()))?;
    staging
        .persist(output_path)
        .map_err(|e| DbterdError::Io(format!("{}: {}", output_path.display(), e.error)))?;

    tracing::info!(
        output = %output_path.display(),
        tables = summary.tables,
        relationships = summary.relationships,
        skipped = summary.skipped_nodes,
        "wrote DBML"
    );

    Ok(summary)
}
