//! Document-type catalog: an immutable map from document-type key to its
//! descriptor, built once at startup and shared freely between requests.

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::descriptor::FieldIndexDescriptor;
use crate::error::{Error, Result};

#[derive(Debug, Clone, Default)]
pub struct DescriptorCatalog {
    descriptors: Arc<BTreeMap<String, Arc<FieldIndexDescriptor>>>,
}

impl DescriptorCatalog {
    /// Build a catalog from descriptors, validating each one.
    pub fn new(descriptors: impl IntoIterator<Item = FieldIndexDescriptor>) -> Result<Self> {
        let mut map = BTreeMap::new();
        for descriptor in descriptors {
            descriptor.ensure_valid()?;
            let key = descriptor.document_type.clone();
            if map.insert(key.clone(), Arc::new(descriptor)).is_some() {
                return Err(Error::DuplicateDocumentType(key));
            }
        }
        Ok(Self {
            descriptors: Arc::new(map),
        })
    }

    /// Build a catalog from a configuration map, filling each descriptor's
    /// `document_type` from its key when it was left empty.
    pub fn from_keyed(
        descriptors: impl IntoIterator<Item = (String, FieldIndexDescriptor)>,
    ) -> Result<Self> {
        Self::new(descriptors.into_iter().map(|(key, mut descriptor)| {
            if descriptor.document_type.is_empty() {
                descriptor.document_type = key;
            }
            descriptor
        }))
    }

    pub fn get(&self, document_type: &str) -> Option<Arc<FieldIndexDescriptor>> {
        self.descriptors.get(document_type).cloned()
    }

    pub fn contains(&self, document_type: &str) -> bool {
        self.descriptors.contains_key(document_type)
    }

    /// Descriptors in document-type order.
    pub fn iter(&self) -> impl Iterator<Item = &Arc<FieldIndexDescriptor>> {
        self.descriptors.values()
    }

    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::{SearchableField, VisibilityFields};

    fn descriptor(document_type: &str) -> FieldIndexDescriptor {
        FieldIndexDescriptor {
            document_type: document_type.to_string(),
            collection: format!("{document_type}_collection"),
            index: format!("{document_type}_index"),
            id_field: "_id".to_string(),
            searchable_fields: vec![SearchableField::text("title")],
            summary_fields: Vec::new(),
            max_page_size: 25,
            default_page_size: 10,
            visibility: VisibilityFields::default(),
        }
    }

    #[test]
    fn fills_document_type_from_key() {
        let mut d = descriptor("ignored");
        d.document_type.clear();
        let catalog = DescriptorCatalog::from_keyed([("articles".to_string(), d)]).unwrap();
        let found = catalog.get("articles").unwrap();
        assert_eq!(found.document_type, "articles");
        assert!(catalog.get("ignored").is_none());
    }

    #[test]
    fn rejects_duplicates() {
        let err = DescriptorCatalog::new([descriptor("articles"), descriptor("articles")])
            .unwrap_err();
        assert!(matches!(err, Error::DuplicateDocumentType(ref t) if t == "articles"));
    }

    #[test]
    fn rejects_invalid_descriptor() {
        let mut d = descriptor("templates");
        d.default_page_size = 100;
        assert!(DescriptorCatalog::new([d]).is_err());
    }

    #[test]
    fn iterates_in_key_order() {
        let catalog =
            DescriptorCatalog::new([descriptor("templates"), descriptor("articles")]).unwrap();
        let keys: Vec<_> = catalog.iter().map(|d| d.document_type.as_str()).collect();
        assert_eq!(keys, vec!["articles", "templates"]);
        assert_eq!(catalog.len(), 2);
    }
}
