//! Relationship target parsing
//!
//! A `relationships` test names its parent model with a macro call:
//!
//! ```text
//! target  := identifier? "(" "'" name "'" ( "," ... )* ")"
//! ```
//!
//! e.g. `ref('customers')`. Only the first single-quoted literal is used as
//! the table name; any further arguments are ignored. The quoted literal may
//! appear anywhere in the expression and may span lines.

use dbterd_core::{DbterdError, Result};

/// Parsed `to:` expression of a relationship test
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelationshipTarget {
    /// Macro name in front of the argument list (`ref`, `source`), if any
    pub function: Option<String>,

    /// First quoted argument
    pub table: String,
}

impl RelationshipTarget {
    /// Parse a relationship target expression
    pub fn parse(expr: &str) -> Result<Self> {
        let table = first_quoted(expr).ok_or_else(|| DbterdError::MalformedRelationshipTarget {
            target: expr.to_string(),
        })?;

        Ok(Self {
            function: call_name(expr).map(str::to_string),
            table: table.to_string(),
        })
    }
}

/// Content of the first `'...'` literal (shortest match)
fn first_quoted(expr: &str) -> Option<&str> {
    let open = expr.find('\'')?;
    let rest = &expr[open + 1..];
    let close = rest.find('\'')?;
    Some(&rest[..close])
}

/// Identifier directly in front of the first `(`
fn call_name(expr: &str) -> Option<&str> {
    let (head, _) = expr.split_once('(')?;
    let name = head.trim();
    let is_identifier = !name.is_empty()
        && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
        && !name.starts_with(|c: char| c.is_ascii_digit());

    is_identifier.then_some(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_ref() {
        let target = RelationshipTarget::parse("ref('dim_customer')").unwrap();
        assert_eq!(target.table, "dim_customer");
        assert_eq!(target.function.as_deref(), Some("ref"));
    }

    #[test]
    fn first_quoted_argument_wins() {
        let target = RelationshipTarget::parse("source('raw', 'customers')").unwrap();
        assert_eq!(target.table, "raw");
        assert_eq!(target.function.as_deref(), Some("source"));

        let target = RelationshipTarget::parse("ref('analytics', 'customers', v=2)").unwrap();
        assert_eq!(target.table, "analytics");
    }

    #[test]
    fn jinja_wrapped_target() {
        let target = RelationshipTarget::parse("{{ ref('customers') }}").unwrap();
        assert_eq!(target.table, "customers");
        assert_eq!(target.function, None);
    }

    #[test]
    fn quoted_name_may_span_lines() {
        let target = RelationshipTarget::parse("ref('multi\nline')").unwrap();
        assert_eq!(target.table, "multi\nline");
    }

    #[test]
    fn bare_quoted_name() {
        let target = RelationshipTarget::parse("'customers'").unwrap();
        assert_eq!(target.table, "customers");
        assert_eq!(target.function, None);
    }

    #[test]
    fn unquoted_target_is_malformed() {
        for expr in ["ref(customers)", "ref(\"customers\")", "", "ref('unterminated)"] {
            let err = RelationshipTarget::parse(expr).unwrap_err();
            assert!(
                matches!(err, DbterdError::MalformedRelationshipTarget { ref target } if target == expr),
                "expected malformed target for {expr:?}"
            );
        }
    }
}
