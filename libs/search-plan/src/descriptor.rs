//! Field index descriptors.
//!
//! A descriptor is the declarative configuration of one document type: which
//! collection and index hold it, which fields are searched (and how), which
//! fields are projected into results, and the page-size bounds. Descriptors are
//! loaded once at startup and never mutated afterwards.

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::error::{Error, Result};

/// Matching semantics for a searchable field.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchKind {
    /// Tokenized full-text match, tolerant of small spelling differences.
    #[default]
    Text,
    /// Whole-value token equality (tags, categories, codes).
    Exact,
    /// Value or any word in it starts with the query (autocomplete style).
    Prefix,
}

impl MatchKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Exact => "exact",
            Self::Prefix => "prefix",
        }
    }
}

/// One searchable field of a document type.
///
/// In configuration a bare string (`"title"`) is shorthand for a text field
/// with boost `1.0`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "SearchableFieldRepr")]
pub struct SearchableField {
    pub path: String,
    pub kind: MatchKind,
    pub boost: f64,
}

impl SearchableField {
    pub fn text(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            kind: MatchKind::Text,
            boost: 1.0,
        }
    }

    pub fn exact(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            kind: MatchKind::Exact,
            boost: 1.0,
        }
    }

    pub fn prefix(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            kind: MatchKind::Prefix,
            boost: 1.0,
        }
    }

    pub fn with_boost(mut self, boost: f64) -> Self {
        self.boost = boost;
        self
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum SearchableFieldRepr {
    Path(String),
    Full {
        path: String,
        #[serde(default)]
        kind: MatchKind,
        #[serde(default = "default_boost")]
        boost: f64,
    },
}

impl From<SearchableFieldRepr> for SearchableField {
    fn from(repr: SearchableFieldRepr) -> Self {
        match repr {
            SearchableFieldRepr::Path(path) => SearchableField::text(path),
            SearchableFieldRepr::Full { path, kind, boost } => SearchableField { path, kind, boost },
        }
    }
}

fn default_boost() -> f64 {
    1.0
}

/// Document fields that drive visibility and the owner part of the projection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VisibilityFields {
    #[serde(default = "default_owner_field")]
    pub owner_field: String,
    #[serde(default = "default_public_field")]
    pub public_field: String,
    #[serde(default = "default_contact_field")]
    pub contact_field: String,
}

impl Default for VisibilityFields {
    fn default() -> Self {
        Self {
            owner_field: default_owner_field(),
            public_field: default_public_field(),
            contact_field: default_contact_field(),
        }
    }
}

fn default_owner_field() -> String {
    "userId".to_string()
}

fn default_public_field() -> String {
    "isPublic".to_string()
}

fn default_contact_field() -> String {
    "userEmail".to_string()
}

fn default_id_field() -> String {
    "_id".to_string()
}

/// Immutable configuration of one document type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct FieldIndexDescriptor {
    /// Key under which the descriptor is registered. Filled from the
    /// configuration map key when left empty.
    #[serde(default)]
    pub document_type: String,
    #[validate(length(min = 1, message = "collection must not be empty"))]
    pub collection: String,
    #[validate(length(min = 1, message = "index must not be empty"))]
    pub index: String,
    #[serde(default = "default_id_field")]
    pub id_field: String,
    /// Searched fields in declaration order; the first is the primary/title field.
    #[validate(length(min = 1, message = "searchable_fields must not be empty"))]
    pub searchable_fields: Vec<SearchableField>,
    #[serde(default)]
    pub summary_fields: Vec<String>,
    #[validate(range(min = 1, message = "max_page_size must be at least 1"))]
    pub max_page_size: u32,
    #[validate(range(min = 1, message = "default_page_size must be at least 1"))]
    pub default_page_size: u32,
    #[serde(default)]
    pub visibility: VisibilityFields,
}

impl FieldIndexDescriptor {
    /// Check every descriptor invariant, including the cross-field ones the
    /// derive cannot express.
    pub fn ensure_valid(&self) -> Result<()> {
        let document_type = self.document_type.as_str();

        if document_type.trim().is_empty() {
            return Err(Error::invalid(document_type, "document_type must not be empty"));
        }

        self.validate()
            .map_err(|e| Error::invalid(document_type, e.to_string()))?;

        if self.default_page_size > self.max_page_size {
            return Err(Error::invalid(
                document_type,
                format!(
                    "default_page_size ({}) exceeds max_page_size ({})",
                    self.default_page_size, self.max_page_size
                ),
            ));
        }

        if self.id_field.trim().is_empty() {
            return Err(Error::invalid(document_type, "id_field must not be empty"));
        }

        for field in &self.searchable_fields {
            if field.path.trim().is_empty() {
                return Err(Error::invalid(
                    document_type,
                    "searchable field path must not be empty",
                ));
            }
            if !field.boost.is_finite() || field.boost <= 0.0 {
                return Err(Error::invalid(
                    document_type,
                    format!("boost for '{}' must be a positive number", field.path),
                ));
            }
        }

        if self.summary_fields.iter().any(|f| f.trim().is_empty()) {
            return Err(Error::invalid(
                document_type,
                "summary field names must not be empty",
            ));
        }

        Ok(())
    }
}
