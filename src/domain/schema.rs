//! The ordered feature-column schema captured at training time.
//!
//! A trained tabular model is only meaningful together with the exact column
//! order it was fit on. The schema is serialized next to the model as a JSON
//! array of names and loaded once at startup; from then on it is the single
//! source of truth for feature-vector width and ordering.

use crate::core::errors::{DermError, DermResult};
use std::path::Path;

/// Ordered, immutable list of feature-column names.
///
/// The set of columns in any inference call must be a reordering of this
/// list, never a superset or subset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnSchema {
    columns: Vec<String>,
}

impl ColumnSchema {
    /// Builds a schema from an ordered sequence of column names.
    ///
    /// Names are canonicalized the way the training pipeline canonicalized
    /// them before the model was fit: spaces become underscores and every
    /// character outside `[A-Za-z0-9_]` is stripped. Empty or duplicate
    /// names are rejected.
    pub fn from_columns<I, S>(columns: I) -> DermResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut canonical = Vec::new();
        for raw in columns {
            let name = Self::canonicalize_name(raw.as_ref());
            if name.is_empty() {
                return Err(DermError::schema(format!(
                    "column name '{}' canonicalizes to an empty string",
                    raw.as_ref()
                )));
            }
            if canonical.contains(&name) {
                return Err(DermError::schema(format!("duplicate column name '{name}'")));
            }
            canonical.push(name);
        }
        if canonical.is_empty() {
            return Err(DermError::schema("schema contains no columns"));
        }
        Ok(Self { columns: canonical })
    }

    /// Loads a schema from a JSON artifact containing an ordered array of
    /// column names.
    pub fn load(path: impl AsRef<Path>) -> DermResult<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|e| {
            DermError::model_load(
                path,
                "failed to read column-schema artifact",
                Some(Box::new(e)),
            )
        })?;
        let names: Vec<String> = serde_json::from_str(&raw).map_err(|e| {
            DermError::model_load(
                path,
                "column-schema artifact is not a JSON array of names",
                Some(Box::new(e)),
            )
        })?;
        let schema = Self::from_columns(names)?;
        tracing::info!(path = %path.display(), columns = schema.len(), "loaded column schema");
        Ok(schema)
    }

    /// Applies the training pipeline's column-name cleanup: spaces to
    /// underscores, then everything outside `[A-Za-z0-9_]` removed.
    pub fn canonicalize_name(raw: &str) -> String {
        raw.replace(' ', "_")
            .chars()
            .filter(|c| c.is_ascii_alphanumeric() || *c == '_')
            .collect()
    }

    /// Number of columns.
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    /// True when the schema has no columns; never true for a loaded schema.
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Position of a column name, if present.
    pub fn position(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// True when the schema contains the given column.
    pub fn contains(&self, name: &str) -> bool {
        self.position(name).is_some()
    }

    /// Column names in schema order.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Iterator over column names in schema order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canonicalization_matches_training_cleanup() {
        assert_eq!(
            ColumnSchema::canonicalize_name("localization lower extremity"),
            "localization_lower_extremity"
        );
        assert_eq!(ColumnSchema::canonicalize_name("dx_type_histo"), "dx_type_histo");
        assert_eq!(ColumnSchema::canonicalize_name("age (years)"), "age_years");
    }

    #[test]
    fn order_is_preserved() {
        let schema =
            ColumnSchema::from_columns(["age", "sex_female", "sex_male"]).unwrap();
        assert_eq!(schema.columns(), &["age", "sex_female", "sex_male"]);
        assert_eq!(schema.position("sex_male"), Some(2));
        assert_eq!(schema.position("sex_unknown"), None);
    }

    #[test]
    fn duplicates_and_empties_are_rejected() {
        assert!(ColumnSchema::from_columns(["age", "age"]).is_err());
        assert!(ColumnSchema::from_columns(["age", "()"]).is_err());
        assert!(ColumnSchema::from_columns(Vec::<String>::new()).is_err());
    }

    #[test]
    fn load_fails_for_missing_artifact() {
        assert!(ColumnSchema::load("no/such/columns.json").is_err());
    }
}
