//! dbt schema.yml parsing
//!
//! Parses the human-authored model properties file: model names, descriptions
//! and column-level tests. Test entries are classified once, at parse time.

use dbterd_core::{DbterdError, Result};
use indexmap::IndexMap;
use serde::{de, Deserialize, Deserializer};
use std::collections::HashMap;
use std::path::Path;

/// schema.yml structure (subset of fields we care about)
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct SchemaFile {
    #[serde(default)]
    pub version: Option<u32>,

    #[serde(default)]
    pub models: Option<Vec<SchemaModel>>,
}

impl SchemaFile {
    /// Load schema from file
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| DbterdError::NotFound {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;

        Self::parse(&contents, &path.display().to_string())
    }

    /// Parse schema from YAML string
    pub fn from_str(yaml: &str) -> Result<Self> {
        Self::parse(yaml, "<schema>")
    }

    fn parse(yaml: &str, origin: &str) -> Result<Self> {
        serde_yaml::from_str(yaml).map_err(|e| DbterdError::ParseError {
            path: origin.to_string(),
            reason: e.to_string(),
        })
    }

    /// Models in document order
    pub fn models(&self) -> Result<&[SchemaModel]> {
        self.models
            .as_deref()
            .ok_or_else(|| DbterdError::key_missing("models", "schema"))
    }

    /// Index models by name; a later model with the same name replaces an earlier one
    pub fn models_by_name(&self) -> Result<HashMap<&str, &SchemaModel>> {
        let mut lookup = HashMap::new();
        for (position, model) in self.models()?.iter().enumerate() {
            lookup.insert(model.require_name(position)?, model);
        }
        Ok(lookup)
    }
}

/// A model entry under `models:`
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct SchemaModel {
    #[serde(default)]
    pub name: Option<String>,

    #[serde(default)]
    pub description: Option<String>,

    #[serde(default)]
    pub columns: Vec<SchemaColumn>,
}

impl SchemaModel {
    /// Model name, or `KeyMissing` naming its position under `models:`
    pub fn require_name(&self, position: usize) -> Result<&str> {
        self.name
            .as_deref()
            .ok_or_else(|| DbterdError::key_missing("name", format!("schema model #{}", position)))
    }

    /// Description if present and non-empty
    pub fn note(&self) -> Option<&str> {
        self.description.as_deref().filter(|d| !d.is_empty())
    }
}

/// A column entry under a model
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct SchemaColumn {
    #[serde(default)]
    pub name: Option<String>,

    #[serde(default)]
    pub description: Option<String>,

    #[serde(default)]
    pub tests: Vec<TestEntry>,

    /// dbt >= 1.8 spelling of `tests`
    #[serde(default)]
    pub data_tests: Vec<TestEntry>,
}

impl SchemaColumn {
    pub fn require_name(&self, model: &str) -> Result<&str> {
        self.name
            .as_deref()
            .ok_or_else(|| DbterdError::key_missing("name", format!("column of model '{}'", model)))
    }

    /// `tests` followed by `data_tests`
    pub fn all_tests(&self) -> impl Iterator<Item = &TestEntry> {
        self.tests.iter().chain(self.data_tests.iter())
    }
}

/// A column test declaration
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(try_from = "RawTestEntry")]
pub enum TestEntry {
    /// Bare test name (`- not_null`)
    Opaque(String),

    /// `relationships:` test
    Relationship(RelationshipTest),

    /// Any other configured test (`accepted_values:` ...), keyed by test name
    Other(String, serde_yaml::Value),
}

impl TestEntry {
    pub fn as_relationship(&self) -> Option<&RelationshipTest> {
        match self {
            Self::Relationship(test) => Some(test),
            _ => None,
        }
    }
}

/// Arguments of a `relationships` test
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct RelationshipTest {
    /// Parent model expression, e.g. `ref('customers')`
    #[serde(default, deserialize_with = "scalar_string")]
    pub to: Option<String>,

    /// Parent column
    #[serde(default, deserialize_with = "scalar_string")]
    pub field: Option<String>,
}

/// Read a YAML scalar (string, number or bool) as its text
fn scalar_string<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<serde_yaml::Value>::deserialize(deserializer)? {
        None | Some(serde_yaml::Value::Null) => Ok(None),
        Some(serde_yaml::Value::String(s)) => Ok(Some(s)),
        Some(serde_yaml::Value::Number(n)) => Ok(Some(n.to_string())),
        Some(serde_yaml::Value::Bool(b)) => Ok(Some(b.to_string())),
        Some(other) => Err(de::Error::custom(format!(
            "expected a scalar, found {:?}",
            other
        ))),
    }
}

impl RelationshipTest {
    pub fn require_to(&self, context: &str) -> Result<&str> {
        self.to
            .as_deref()
            .ok_or_else(|| DbterdError::key_missing("relationships.to", context))
    }

    pub fn require_field(&self, context: &str) -> Result<&str> {
        self.field
            .as_deref()
            .ok_or_else(|| DbterdError::key_missing("relationships.field", context))
    }
}

/// Wire shape of a test entry: a string or a single-key mapping
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum RawTestEntry {
    Name(String),
    Mapping(IndexMap<String, serde_yaml::Value>),
}

impl TryFrom<RawTestEntry> for TestEntry {
    type Error = String;

    fn try_from(raw: RawTestEntry) -> std::result::Result<Self, Self::Error> {
        let mut mapping = match raw {
            RawTestEntry::Name(name) => return Ok(Self::Opaque(name)),
            RawTestEntry::Mapping(mapping) => mapping,
        };

        if let Some(args) = mapping.shift_remove("relationships") {
            // `relationships:` with no body still counts; its keys are reported missing on use
            let test = match args {
                serde_yaml::Value::Null => RelationshipTest::default(),
                args => serde_yaml::from_value(args)
                    .map_err(|e| format!("invalid relationships test: {}", e))?,
            };
            return Ok(Self::Relationship(test));
        }

        match mapping.into_iter().next() {
            Some((name, args)) => Ok(Self::Other(name, args)),
            None => Err("empty test declaration".to_string()),
        }
    }
}
