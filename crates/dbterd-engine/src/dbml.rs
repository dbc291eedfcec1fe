//! DBML emitters
//!
//! Writes `Table` blocks from joined catalog/schema records and `Ref` lines
//! from `relationships` tests. Both write straight into the sink.

use dbterd_core::{Result, TypeMap};
use dbterd_dbt::{CatalogNode, RelationshipTarget, SchemaFile, SchemaModel};
use std::io::Write;

/// Append one `Table` block for a catalog node joined to its schema model
///
/// ```text
/// Table orders {
/// id integer
/// Note: 'Order facts'
/// }
/// ```
///
/// Returns the number of column lines written.
pub fn write_table<W: Write>(
    sink: &mut W,
    node_id: &str,
    node: &CatalogNode,
    model: &SchemaModel,
    type_map: &TypeMap,
) -> Result<usize> {
    let name = node.require_name(node_id)?;
    let columns = node.require_columns(node_id)?;

    writeln!(sink, "Table {} {{", name)?;

    for (key, column) in columns {
        let context = format!("column '{}' of catalog node '{}'", key, node_id);
        let column_name = column.require_name(&context)?;
        let data_type = column.require_type(&context)?;

        writeln!(sink, "{} {}", column_name, type_map.resolve(data_type))?;
    }

    if let Some(description) = model.note() {
        writeln!(sink, "Note: '{}'", description)?;
    }

    writeln!(sink, "}}")?;

    tracing::debug!(table = name, columns = columns.len(), "wrote table");
    Ok(columns.len())
}

/// A foreign-key edge discovered from a `relationships` test
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Relationship {
    /// Parent table (from the test's `to:`)
    pub to_table: String,

    /// Parent column (from the test's `field:`)
    pub to_field: String,

    /// Model declaring the test
    pub from_model: String,

    /// Column declaring the test
    pub from_column: String,
}

impl std::fmt::Display for Relationship {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Ref: {}.{} > {}.{}",
            self.to_table, self.to_field, self.from_model, self.from_column
        )
    }
}

/// Collect every relationship in schema order: models, then columns, then tests
pub fn relationships(schema: &SchemaFile) -> Result<Vec<Relationship>> {
    let mut found = Vec::new();

    for (position, model) in schema.models()?.iter().enumerate() {
        let model_name = model.require_name(position)?;

        for column in &model.columns {
            for test in column.all_tests().filter_map(|t| t.as_relationship()) {
                let column_name = column.require_name(model_name)?;
                let context = format!("relationships test on {}.{}", model_name, column_name);
                let target = RelationshipTarget::parse(test.require_to(&context)?)?;

                found.push(Relationship {
                    to_table: target.table,
                    to_field: test.require_field(&context)?.to_string(),
                    from_model: model_name.to_string(),
                    from_column: column_name.to_string(),
                });
            }
        }
    }

    Ok(found)
}

/// Append one `Ref` line per relationship test in the schema
///
/// Returns the number of lines written.
pub fn write_relationships<W: Write>(sink: &mut W, schema: &SchemaFile) -> Result<usize> {
    let found = relationships(schema)?;

    for relationship in &found {
        writeln!(sink, "{}", relationship)?;
        tracing::debug!(%relationship, "wrote ref");
    }

    Ok(found.len())
}
