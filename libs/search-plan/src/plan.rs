//! Executable search plan handed to a document store.
//!
//! A plan is the merge of the compiled match clauses, the visibility
//! predicate, the resolved page window and the projection. Stores must
//! evaluate it as:
//!
//! 1. keep documents matching at least one clause AND the visibility predicate,
//! 2. score each kept document (sum of boosted clause scores),
//! 3. count the kept set and return the `window` slice ordered by score
//!    descending, then identifier ascending,
//!
//! with the count and the page taken from the same filtered set.

use serde::Serialize;
use serde_json::{Map, Value as JsonValue};

use crate::compile::MatchClause;
use crate::descriptor::FieldIndexDescriptor;
use crate::envelope::ProjectedDocument;
use crate::paging::PageWindow;
use crate::visibility::VisibilityPredicate;

/// Fields copied from a stored document into a result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Projection {
    pub id_field: String,
    pub owner_field: String,
    pub public_field: String,
    pub contact_field: String,
    pub summary_fields: Vec<String>,
}

impl Projection {
    pub fn for_descriptor(descriptor: &FieldIndexDescriptor) -> Self {
        Self {
            id_field: descriptor.id_field.clone(),
            owner_field: descriptor.visibility.owner_field.clone(),
            public_field: descriptor.visibility.public_field.clone(),
            contact_field: descriptor.visibility.contact_field.clone(),
            summary_fields: descriptor.summary_fields.clone(),
        }
    }

    /// All projected field names, identifier first, without duplicates.
    pub fn field_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = Vec::with_capacity(4 + self.summary_fields.len());
        for name in [
            self.id_field.as_str(),
            self.owner_field.as_str(),
            self.public_field.as_str(),
            self.contact_field.as_str(),
        ]
        .into_iter()
        .chain(self.summary_fields.iter().map(String::as_str))
        {
            if !names.contains(&name) {
                names.push(name);
            }
        }
        names
    }

    /// Project a stored document. Fields missing from the document are
    /// omitted rather than emitted as null; the relevance score replaces any
    /// stored `score` field.
    pub fn project(&self, doc: &JsonValue, score: f64) -> ProjectedDocument {
        let mut fields = Map::new();
        for name in self.field_names() {
            if let Some(value) = doc.get(name) {
                fields.insert(name.to_string(), value.clone());
            }
        }
        ProjectedDocument::new(fields, score)
    }
}

/// One search, ready for a single store round-trip.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchPlan {
    pub index: String,
    /// Disjunctive match clauses; never empty.
    pub clauses: Vec<MatchClause>,
    pub visibility: VisibilityPredicate,
    pub window: PageWindow,
    pub projection: Projection,
}

impl SearchPlan {
    pub fn assemble(
        descriptor: &FieldIndexDescriptor,
        clauses: Vec<MatchClause>,
        visibility: VisibilityPredicate,
        window: PageWindow,
    ) -> Self {
        debug_assert!(!clauses.is_empty(), "search plans need at least one clause");
        Self {
            index: descriptor.index.clone(),
            clauses,
            visibility,
            window,
            projection: Projection::for_descriptor(descriptor),
        }
    }

    /// Field used to break score ties.
    pub fn tie_break_field(&self) -> &str {
        &self.projection.id_field
    }
}
