//! Query planning for paginated document search.
//!
//! Pure building blocks, free of I/O:
//! - descriptors and the document-type catalog,
//! - the search expression compiler,
//! - the pagination resolver,
//! - the visibility filter builder,
//! - the assembled [`SearchPlan`] and the [`ResultEnvelope`] it resolves to.
#![forbid(unsafe_code)]

mod catalog;
mod compile;
mod descriptor;
mod envelope;
mod error;
pub mod paging;
mod plan;
pub mod visibility;

pub use catalog::DescriptorCatalog;
pub use compile::{compile, MatchClause};
pub use descriptor::{FieldIndexDescriptor, MatchKind, SearchableField, VisibilityFields};
pub use envelope::{ProjectedDocument, ResultEnvelope};
pub use error::{Error, Result};
pub use paging::{total_pages, PageWindow};
pub use plan::{Projection, SearchPlan};
pub use visibility::{Identity, VisibilityPredicate};
