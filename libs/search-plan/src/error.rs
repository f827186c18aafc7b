//! Error types for descriptor and catalog validation

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("document type '{document_type}': {message}")]
    InvalidDescriptor {
        document_type: String,
        message: String,
    },

    #[error("duplicate document type '{0}'")]
    DuplicateDocumentType(String),
}

impl Error {
    pub(crate) fn invalid(document_type: &str, message: impl Into<String>) -> Self {
        Self::InvalidDescriptor {
            document_type: document_type.to_string(),
            message: message.into(),
        }
    }
}
