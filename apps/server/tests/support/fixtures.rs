use docsearch_plan::{FieldIndexDescriptor, SearchableField, VisibilityFields};
use docsearch_server::db::MemoryDocumentStore;
use serde_json::{json, Value};

/// Public articles matching "rust" in the standard fixtures.
pub const PUBLIC_RUST_ARTICLES: u64 = 23;

pub fn articles_descriptor() -> FieldIndexDescriptor {
    FieldIndexDescriptor {
        document_type: "articles".to_string(),
        collection: "articles".to_string(),
        index: "articles_search".to_string(),
        id_field: "_id".to_string(),
        searchable_fields: vec![SearchableField::text("title"), SearchableField::text("body")],
        summary_fields: vec!["title".to_string()],
        max_page_size: 50,
        default_page_size: 10,
        visibility: VisibilityFields::default(),
    }
}

pub fn templates_descriptor() -> FieldIndexDescriptor {
    FieldIndexDescriptor {
        document_type: "templates".to_string(),
        collection: "templates".to_string(),
        index: "templates_search".to_string(),
        id_field: "_id".to_string(),
        searchable_fields: vec![
            SearchableField::text("name").with_boost(2.0),
            SearchableField::prefix("category"),
        ],
        summary_fields: vec!["name".to_string(), "category".to_string()],
        max_page_size: 5,
        default_page_size: 2,
        visibility: VisibilityFields {
            owner_field: "authorId".to_string(),
            public_field: "shared".to_string(),
            contact_field: "authorEmail".to_string(),
        },
    }
}

pub fn public_article(id: &str, title: &str) -> Value {
    json!({
        "_id": id,
        "title": title,
        "body": "",
        "userId": "carol",
        "userEmail": "carol@example.com",
        "isPublic": true
    })
}

pub fn private_article(id: &str, owner: &str, title: &str) -> Value {
    json!({
        "_id": id,
        "title": title,
        "body": "",
        "userId": owner,
        "userEmail": format!("{owner}@example.com"),
        "isPublic": false
    })
}

/// 23 public "rust" articles (`p00`..`p22`), one private to alice, one
/// private to bob, and a public article that never matches "rust".
pub async fn seed_standard_documents(store: &MemoryDocumentStore) {
    store
        .insert_many(
            "articles",
            (0..PUBLIC_RUST_ARTICLES).map(|i| public_article(&format!("p{i:02}"), "learning rust")),
        )
        .await;
    store
        .insert("articles", private_article("alice-draft", "alice", "rust draft"))
        .await;
    store
        .insert("articles", private_article("bob-draft", "bob", "rust notes"))
        .await;
    store
        .insert("articles", public_article("py", "python tips"))
        .await;

    store
        .insert_many(
            "templates",
            [
                json!({ "_id": "t1", "name": "weekly report", "category": "reporting/weekly", "authorId": "dave", "shared": true }),
                json!({ "_id": "t2", "name": "monthly report", "category": "reporting/monthly", "authorId": "erin", "shared": false }),
                json!({ "_id": "t3", "name": "incident review", "category": "operations", "authorId": "dave", "shared": true }),
            ],
        )
        .await;
}
