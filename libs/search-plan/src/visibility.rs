//! Visibility filter builder.
//!
//! Every search is restricted to documents the caller may see: their own
//! documents when an identity is known, plus anything marked public.

use serde::Serialize;
use serde_json::Value as JsonValue;

use crate::descriptor::VisibilityFields;

/// Who is searching.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Identity {
    Anonymous,
    User(String),
}

impl Identity {
    pub fn user(id: impl Into<String>) -> Self {
        Self::User(id.into())
    }

    pub fn is_anonymous(&self) -> bool {
        matches!(self, Self::Anonymous)
    }
}

/// Access predicate conjoined with the match stage of every search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum VisibilityPredicate {
    /// `public_field == true`
    PublicOnly { public_field: String },
    /// `owner_field == owner OR public_field == true`
    OwnerOrPublic {
        owner_field: String,
        owner: String,
        public_field: String,
    },
}

impl VisibilityPredicate {
    /// Evaluate the predicate against a JSON document.
    ///
    /// Only a literal JSON `true` counts as public, and only a string equal to
    /// the owner counts as owned.
    pub fn matches(&self, doc: &JsonValue) -> bool {
        match self {
            Self::PublicOnly { public_field } => is_public(doc, public_field),
            Self::OwnerOrPublic {
                owner_field,
                owner,
                public_field,
            } => {
                doc.get(owner_field).and_then(|v| v.as_str()) == Some(owner.as_str())
                    || is_public(doc, public_field)
            }
        }
    }
}

fn is_public(doc: &JsonValue, public_field: &str) -> bool {
    doc.get(public_field).and_then(|v| v.as_bool()) == Some(true)
}

/// Build the visibility predicate for an identity.
pub fn build(identity: &Identity, fields: &VisibilityFields) -> VisibilityPredicate {
    match identity {
        Identity::Anonymous => VisibilityPredicate::PublicOnly {
            public_field: fields.public_field.clone(),
        },
        Identity::User(owner) => VisibilityPredicate::OwnerOrPublic {
            owner_field: fields.owner_field.clone(),
            owner: owner.clone(),
            public_field: fields.public_field.clone(),
        },
    }
}
