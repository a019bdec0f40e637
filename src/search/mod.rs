//! Tantivy-based search index module.
//!
//! Provides full-text search over adoption requests (applicant name, email,
//! phone, message) for the staff request listing.

use std::path::Path;
use std::sync::Arc;
use tantivy::collector::TopDocs;
use tantivy::query::{BooleanQuery, BoostQuery, Occur, QueryParser};
use tantivy::schema::{Field, Schema, Value, STORED, TEXT};
use tantivy::{doc, Index, IndexReader, IndexWriter, ReloadPolicy, TantivyDocument};
use tokio::sync::RwLock;

use crate::errors::AppError;
use crate::models::AdoptionRequest;

/// Field boost values: who the applicant is outranks what they wrote.
const BOOST_FULL_NAME: f32 = 10.0;
const BOOST_EMAIL: f32 = 8.0;
const BOOST_PHONE: f32 = 8.0;
const BOOST_MESSAGE: f32 = 4.0;

/// Search result with request id and relevance score.
#[derive(Debug, Clone)]
pub struct SearchResult {
    pub request_id: String,
    pub score: f32,
}

/// Search index schema fields.
struct SearchFields {
    request_id: Field,
    full_name: Field,
    email: Field,
    phone: Field,
    message: Field,
}

/// Tantivy search index for adoption requests.
pub struct SearchIndex {
    index: Index,
    reader: IndexReader,
    writer: Arc<RwLock<IndexWriter>>,
    fields: SearchFields,
}

impl SearchIndex {
    /// Create or open a search index at the specified path.
    pub fn open(index_path: &Path) -> Result<Self, AppError> {
        std::fs::create_dir_all(index_path)
            .map_err(|e| AppError::Search(format!("Failed to create index directory: {}", e)))?;

        // Define schema
        let mut schema_builder = Schema::builder();
        let request_id = schema_builder.add_text_field("request_id", STORED);
        let full_name = schema_builder.add_text_field("full_name", TEXT | STORED);
        let email = schema_builder.add_text_field("email", TEXT);
        let phone = schema_builder.add_text_field("phone", TEXT);
        let message = schema_builder.add_text_field("message", TEXT);
        let schema = schema_builder.build();

        let fields = SearchFields {
            request_id,
            full_name,
            email,
            phone,
            message,
        };

        // Try to open existing index or create new one
        let index = Index::open_in_dir(index_path)
            .or_else(|_| Index::create_in_dir(index_path, schema.clone()))
            .map_err(|e| AppError::Search(format!("Failed to open/create index: {}", e)))?;

        let reader = index
            .reader_builder()
            .reload_policy(ReloadPolicy::OnCommitWithDelay)
            .try_into()
            .map_err(|e| AppError::Search(format!("Failed to create reader: {}", e)))?;

        let writer = index
            .writer(50_000_000) // 50MB buffer
            .map_err(|e| AppError::Search(format!("Failed to create writer: {}", e)))?;

        Ok(Self {
            index,
            reader,
            writer: Arc::new(RwLock::new(writer)),
            fields,
        })
    }

    /// Rebuild the entire index from adoption requests.
    pub async fn rebuild(&self, requests: &[AdoptionRequest]) -> Result<(), AppError> {
        let mut writer = self.writer.write().await;

        // Clear existing index
        writer.delete_all_documents()?;

        for request in requests {
            let doc = self.create_document(request);
            writer.add_document(doc)?;
        }

        writer.commit()?;

        // Reload reader to see new documents
        self.reader.reload()?;

        tracing::info!("Search index rebuilt with {} adoption requests", requests.len());
        Ok(())
    }

    /// Index a single adoption request.
    pub async fn index_request(&self, request: &AdoptionRequest) -> Result<(), AppError> {
        let mut writer = self.writer.write().await;

        // Delete existing document if any
        let term = tantivy::Term::from_field_text(self.fields.request_id, &request.id);
        writer.delete_term(term);

        let doc = self.create_document(request);
        writer.add_document(doc)?;
        writer.commit()?;

        self.reader.reload()?;

        Ok(())
    }

    /// Remove an adoption request from the index.
    pub async fn remove_request(&self, request_id: &str) -> Result<(), AppError> {
        let mut writer = self.writer.write().await;

        let term = tantivy::Term::from_field_text(self.fields.request_id, request_id);
        writer.delete_term(term);
        writer.commit()?;

        self.reader.reload()?;

        Ok(())
    }

    /// Search for adoption requests matching the query.
    pub fn search(
        &self,
        query_str: &str,
        limit: usize,
        offset: usize,
    ) -> Result<Vec<SearchResult>, AppError> {
        if query_str.trim().is_empty() {
            return Ok(Vec::new());
        }

        let searcher = self.reader.searcher();

        let query_parser = QueryParser::for_index(
            &self.index,
            vec![
                self.fields.full_name,
                self.fields.email,
                self.fields.phone,
                self.fields.message,
            ],
        );

        let base_query = query_parser
            .parse_query(query_str)
            .map_err(|e| AppError::Search(format!("Invalid search query: {}", e)))?;

        // Create field-specific boosted queries
        let mut subqueries: Vec<(Occur, Box<dyn tantivy::query::Query>)> = Vec::new();

        let field_queries = [
            (self.fields.full_name, BOOST_FULL_NAME),
            (self.fields.email, BOOST_EMAIL),
            (self.fields.phone, BOOST_PHONE),
            (self.fields.message, BOOST_MESSAGE),
        ];

        for (field, boost) in field_queries {
            let field_parser = QueryParser::for_index(&self.index, vec![field]);
            if let Ok(field_query) = field_parser.parse_query(query_str) {
                let boosted = BoostQuery::new(field_query, boost);
                subqueries.push((Occur::Should, Box::new(boosted)));
            }
        }

        // Combine with OR semantics
        let combined_query = if subqueries.is_empty() {
            base_query
        } else {
            Box::new(BooleanQuery::new(subqueries))
        };

        // Execute search with pagination
        let top_docs = searcher
            .search(&combined_query, &TopDocs::with_limit(limit + offset))
            .map_err(|e| AppError::Search(format!("Search failed: {}", e)))?;

        let results: Vec<SearchResult> = top_docs
            .into_iter()
            .skip(offset)
            .take(limit)
            .filter_map(|(score, doc_address)| {
                let doc: TantivyDocument = searcher.doc(doc_address).ok()?;
                let request_id = doc
                    .get_first(self.fields.request_id)?
                    .as_str()?
                    .to_string();
                Some(SearchResult { request_id, score })
            })
            .collect();

        Ok(results)
    }

    /// Create a Tantivy document from an adoption request.
    fn create_document(&self, request: &AdoptionRequest) -> TantivyDocument {
        doc!(
            self.fields.request_id => request.id.clone(),
            self.fields.full_name => request.full_name.clone(),
            self.fields.email => request.email.clone(),
            self.fields.phone => request.phone.clone(),
            self.fields.message => request.message.clone().unwrap_or_default()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::AdoptionStatus;
    use tempfile::TempDir;

    fn create_test_request(id: &str, full_name: &str, message: &str) -> AdoptionRequest {
        AdoptionRequest {
            id: id.to_string(),
            pet_id: "p1".to_string(),
            shelter_id: "s1".to_string(),
            full_name: full_name.to_string(),
            email: format!("{}@example.com", id),
            phone: "555-1234".to_string(),
            household: None,
            message: Some(message.to_string()),
            status: AdoptionStatus::Pending,
            decision_notes: None,
            created_at: "2024-01-01T00:00:00Z".to_string(),
            updated_at: "2024-01-01T00:00:00Z".to_string(),
        }
    }

    #[tokio::test]
    async fn test_search_index_creation() {
        let temp_dir = TempDir::new().unwrap();
        let index = SearchIndex::open(temp_dir.path()).unwrap();

        let requests = vec![
            create_test_request("1", "Jane Miller", "We have a fenced garden"),
            create_test_request("2", "Tom Baker", "Looking for a calm senior cat"),
        ];

        index.rebuild(&requests).await.unwrap();

        let results = index.search("Jane", 10, 0).unwrap();
        assert!(!results.is_empty());
        assert_eq!(results[0].request_id, "1");
    }

    #[tokio::test]
    async fn test_search_message_text() {
        let temp_dir = TempDir::new().unwrap();
        let index = SearchIndex::open(temp_dir.path()).unwrap();

        let requests = vec![
            create_test_request("1", "Jane Miller", "We have a fenced garden"),
            create_test_request("2", "Tom Baker", "Looking for a calm senior cat"),
        ];

        index.rebuild(&requests).await.unwrap();

        let results = index.search("senior cat", 10, 0).unwrap();
        assert!(!results.is_empty());
        assert_eq!(results[0].request_id, "2");
    }

    #[tokio::test]
    async fn test_search_empty_query() {
        let temp_dir = TempDir::new().unwrap();
        let index = SearchIndex::open(temp_dir.path()).unwrap();

        let results = index.search("", 10, 0).unwrap();
        assert!(results.is_empty());
    }

    #[tokio::test]
    async fn test_remove_request() {
        let temp_dir = TempDir::new().unwrap();
        let index = SearchIndex::open(temp_dir.path()).unwrap();

        let requests = vec![create_test_request("1", "Jane Miller", "garden")];
        index.rebuild(&requests).await.unwrap();

        index.remove_request("1").await.unwrap();
        let results = index.search("Jane", 10, 0).unwrap();
        assert!(results.is_empty());
    }
}
