//! dbt catalog.json parsing
//!
//! The catalog describes physical tables as the warehouse reports them.
//! Node and column order follow the document, so maps are `IndexMap`s.

use dbterd_core::{DbterdError, Result};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// dbt catalog.json structure (subset of fields we care about)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Catalog {
    /// Catalog nodes keyed by unique_id (e.g. "model.jaffle_shop.orders")
    #[serde(default)]
    pub nodes: Option<IndexMap<String, CatalogNode>>,
}

impl Catalog {
    /// Load catalog from file
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| DbterdError::NotFound {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;

        Self::parse(&contents, &path.display().to_string())
    }

    /// Parse catalog from JSON string
    pub fn from_str(json: &str) -> Result<Self> {
        Self::parse(json, "<catalog>")
    }

    fn parse(json: &str, origin: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| DbterdError::ParseError {
            path: origin.to_string(),
            reason: e.to_string(),
        })
    }

    /// Nodes in document order
    pub fn nodes(&self) -> Result<&IndexMap<String, CatalogNode>> {
        self.nodes
            .as_ref()
            .ok_or_else(|| DbterdError::key_missing("nodes", "catalog"))
    }
}

/// A table or view in the catalog
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CatalogNode {
    #[serde(default)]
    pub metadata: Option<NodeMetadata>,

    #[serde(default)]
    pub columns: Option<IndexMap<String, CatalogColumn>>,
}

impl CatalogNode {
    /// Physical table name (`metadata.name`)
    pub fn name(&self) -> Option<&str> {
        self.metadata.as_ref()?.name.as_deref()
    }

    /// Physical table name, or `KeyMissing` naming the node
    pub fn require_name(&self, node_id: &str) -> Result<&str> {
        self.name().ok_or_else(|| {
            DbterdError::key_missing("metadata.name", format!("catalog node '{}'", node_id))
        })
    }

    /// Columns in document order, or `KeyMissing` naming the node
    pub fn require_columns(&self, node_id: &str) -> Result<&IndexMap<String, CatalogColumn>> {
        self.columns.as_ref().ok_or_else(|| {
            DbterdError::key_missing("columns", format!("catalog node '{}'", node_id))
        })
    }
}

/// Node metadata as reported by the warehouse
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NodeMetadata {
    /// Relation name
    #[serde(default)]
    pub name: Option<String>,

    /// Warehouse schema
    #[serde(default)]
    pub schema: Option<String>,

    /// Relation type (BASE TABLE, VIEW, ...)
    #[serde(default, rename = "type")]
    pub relation_type: Option<String>,
}

/// A physical column
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CatalogColumn {
    #[serde(default)]
    pub name: Option<String>,

    /// Warehouse-native type name
    #[serde(default, rename = "type")]
    pub data_type: Option<String>,

    /// Ordinal position
    #[serde(default)]
    pub index: Option<u32>,
}

impl CatalogColumn {
    pub fn require_name(&self, context: &str) -> Result<&str> {
        self.name
            .as_deref()
            .ok_or_else(|| DbterdError::key_missing("name", context))
    }

    pub fn require_type(&self, context: &str) -> Result<&str> {
        self.data_type
            .as_deref()
            .ok_or_else(|| DbterdError::key_missing("type", context))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CATALOG: &str = r#"{
        "metadata": {"dbt_version": "1.7.0"},
        "nodes": {
            "model.jaffle_shop.orders": {
                "metadata": {"type": "BASE TABLE", "schema": "analytics", "name": "orders"},
                "columns": {
                    "order_id": {"type": "integer", "index": 1, "name": "order_id", "comment": null},
                    "amount": {"type": "double precision", "index": 2, "name": "amount", "comment": null},
                    "customer_id": {"type": "integer", "index": 3, "name": "customer_id", "comment": null}
                },
                "stats": {},
                "unique_id": "model.jaffle_shop.orders"
            },
            "model.jaffle_shop.customers": {
                "metadata": {"name": "customers"},
                "columns": {}
            }
        },
        "sources": {},
        "errors": null
    }"#;

    #[test]
    fn parse_catalog_preserves_order() {
        let catalog = Catalog::from_str(CATALOG).unwrap();
        let nodes = catalog.nodes().unwrap();

        let ids: Vec<&str> = nodes.keys().map(String::as_str).collect();
        assert_eq!(ids, ["model.jaffle_shop.orders", "model.jaffle_shop.customers"]);

        let orders = &nodes["model.jaffle_shop.orders"];
        assert_eq!(orders.name(), Some("orders"));

        let columns: Vec<&str> = orders
            .require_columns("model.jaffle_shop.orders")
            .unwrap()
            .values()
            .filter_map(|c| c.name.as_deref())
            .collect();
        assert_eq!(columns, ["order_id", "amount", "customer_id"]);
    }

    #[test]
    fn missing_nodes_is_key_missing() {
        let catalog = Catalog::from_str(r#"{"sources": {}}"#).unwrap();
        assert!(matches!(
            catalog.nodes(),
            Err(DbterdError::KeyMissing { ref key, .. }) if key == "nodes"
        ));
    }

    #[test]
    fn missing_metadata_name_is_key_missing() {
        let catalog =
            Catalog::from_str(r#"{"nodes": {"model.pkg.x": {"metadata": {}, "columns": {}}}}"#)
                .unwrap();
        let node = &catalog.nodes().unwrap()["model.pkg.x"];

        let err = node.require_name("model.pkg.x").unwrap_err();
        assert!(err.to_string().contains("metadata.name"));
        assert!(err.to_string().contains("model.pkg.x"));
    }

    #[test]
    fn invalid_json_is_parse_error() {
        assert!(matches!(
            Catalog::from_str("{ not json"),
            Err(DbterdError::ParseError { .. })
        ));
    }

    #[test]
    fn missing_file_is_not_found() {
        let result = Catalog::from_file(Path::new("does/not/exist/catalog.json"));
        assert!(matches!(result, Err(DbterdError::NotFound { .. })));
    }
}
