//! Concept storage and persistence.
//!
//! The `ConceptStore` keeps every concept in memory and mirrors the whole set
//! to a single JSON document in its data directory after each change.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tokio::fs;
use tracing::{debug, info};

use dmensions_embeddings::{
    EmbeddingError, EmbeddingProvider, EmbeddingRequest, EmbeddingResponse, Entity, EntityId,
};

use crate::concept::{Concept, ConceptRecord, normalize_content};
use crate::error::{Result, StoreError};

/// File name of the store document inside the data directory.
pub const STORE_FILE: &str = "concepts.json";

#[derive(Debug, Default, Serialize, Deserialize)]
struct StoreDocument {
    concepts: Vec<ConceptRecord>,
}

/// Persistent set of concepts with uniform-length embeddings.
pub struct ConceptStore {
    /// Root directory for storage.
    root: PathBuf,

    /// Concepts keyed by id.
    concepts: BTreeMap<EntityId, Concept>,

    /// Source of embeddings for new concepts.
    provider: Arc<dyn EmbeddingProvider>,

    /// Whether `open` had to create the store document.
    created: bool,
}

impl ConceptStore {
    /// Open the store in `root`, creating the directory if needed.
    pub async fn open(
        root: impl AsRef<Path>,
        provider: Arc<dyn EmbeddingProvider>,
    ) -> Result<Self> {
        let root = root.as_ref().to_path_buf();

        fs::create_dir_all(&root)
            .await
            .map_err(|e| StoreError::Storage(format!("{}: {e}", root.display())))?;

        let mut store = Self {
            root,
            concepts: BTreeMap::new(),
            provider,
            created: false,
        };

        let path = store.document_path();
        if fs::try_exists(&path)
            .await
            .map_err(|e| StoreError::Storage(format!("{}: {e}", path.display())))?
        {
            store.load().await?;
        } else {
            store.created = true;
            store.save().await?;
        }

        Ok(store)
    }

    fn document_path(&self) -> PathBuf {
        self.root.join(STORE_FILE)
    }

    /// Directory holding the store document.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Whether this store was created by the `open` call that returned it.
    pub fn is_new(&self) -> bool {
        self.created
    }

    async fn load(&mut self) -> Result<()> {
        let path = self.document_path();
        let content = fs::read_to_string(&path)
            .await
            .map_err(|e| StoreError::Storage(format!("{}: {e}", path.display())))?;

        let document: StoreDocument = serde_json::from_str(&content)?;
        let mut concepts: BTreeMap<EntityId, Concept> = BTreeMap::new();
        for record in document.concepts {
            let concept = record.into_concept()?;
            if concepts.contains_key(&concept.id) {
                return Err(StoreError::InvalidDocument(format!(
                    "duplicate id {}",
                    concept.id
                )));
            }
            if concepts.values().any(|c| c.content == concept.content) {
                return Err(StoreError::InvalidDocument(format!(
                    "duplicate concept {:?}",
                    concept.content
                )));
            }
            if let Some(first) = concepts.values().next() {
                let (expected, actual) = (first.vector.len(), concept.vector.len());
                if expected != actual {
                    return Err(EmbeddingError::DimensionMismatch { expected, actual }.into());
                }
            }
            concepts.insert(concept.id, concept);
        }
        self.concepts = concepts;

        info!("Loaded {} concepts from {}", self.concepts.len(), path.display());
        Ok(())
    }

    async fn save(&self) -> Result<()> {
        let path = self.document_path();
        let document = StoreDocument {
            concepts: self.concepts.values().map(ConceptRecord::from).collect(),
        };
        let content = serde_json::to_string_pretty(&document)?;

        // Write atomically using a temp file
        let temp_path = path.with_extension("json.tmp");
        fs::write(&temp_path, &content)
            .await
            .map_err(|e| StoreError::Storage(format!("{}: {e}", temp_path.display())))?;
        fs::rename(&temp_path, &path)
            .await
            .map_err(|e| StoreError::Storage(format!("{}: {e}", path.display())))?;

        debug!("Saved {} concepts", self.concepts.len());
        Ok(())
    }

    /// Embed `text` and store it.
    ///
    /// The text is normalized first. Saving text that is already stored
    /// keeps its id and replaces its vector.
    pub async fn save_concept(&mut self, text: &str) -> Result<&Concept> {
        let content = normalize_content(text);
        if content.is_empty() {
            return Err(StoreError::EmptyConcept);
        }

        let response = self.embed(content.clone()).await?;

        let existing = self.find(&content).map(|c| (c.id, c.created_at));
        let id = match existing {
            Some((id, _)) => id,
            None => self.next_id(),
        };

        let actual = response.embedding.len();
        match self.dimension_excluding(id) {
            Some(expected) if expected != actual => {
                return Err(EmbeddingError::DimensionMismatch { expected, actual }.into());
            }
            _ => {}
        }

        let concept = Concept {
            id,
            content,
            vector: response.embedding,
            created_at: existing.map_or_else(Utc::now, |(_, created_at)| created_at),
        };
        let previous = self.concepts.insert(id, concept);
        if let Err(e) = self.save().await {
            match previous {
                Some(previous) => self.concepts.insert(id, previous),
                None => self.concepts.remove(&id),
            };
            return Err(e);
        }

        let concept = self.concepts.get(&id).ok_or(StoreError::NotFound(id))?;
        match existing {
            Some(_) => debug!("Updated concept {id}: {}", concept.content),
            None => info!("Added concept {id}: {}", concept.content),
        }
        Ok(concept)
    }

    /// Save every word in `words`, returning how many were stored.
    pub async fn populate(&mut self, words: &[&str]) -> Result<usize> {
        for word in words {
            self.save_concept(word).await?;
        }
        info!("Populated store with {} concepts", words.len());
        Ok(words.len())
    }

    /// Remove a concept by id.
    pub async fn remove(&mut self, id: EntityId) -> Result<Concept> {
        let concept = self.concepts.remove(&id).ok_or(StoreError::NotFound(id))?;
        if let Err(e) = self.save().await {
            self.concepts.insert(id, concept);
            return Err(e);
        }
        info!("Removed concept {id}: {}", concept.content);
        Ok(concept)
    }

    /// Get a concept by id.
    pub fn get(&self, id: EntityId) -> Option<&Concept> {
        self.concepts.get(&id)
    }

    /// Find a concept by its text, normalizing the query the same way
    /// [`save_concept`](Self::save_concept) does.
    pub fn find(&self, text: &str) -> Option<&Concept> {
        let content = normalize_content(text);
        self.concepts.values().find(|c| c.content == content)
    }

    /// All concepts in id order.
    pub fn concepts(&self) -> impl Iterator<Item = &Concept> {
        self.concepts.values()
    }

    /// Every concept as a corpus entity, in id order.
    pub fn all_entities(&self) -> Vec<Entity> {
        self.concepts.values().map(Concept::to_entity).collect()
    }

    /// Embed arbitrary text without storing it, for use as a search query.
    pub async fn embed_query(&self, text: &str) -> Result<Vec<f32>> {
        let response = self.embed(normalize_content(text)).await?;
        Ok(response.embedding)
    }

    async fn embed(&self, content: String) -> Result<EmbeddingResponse> {
        if !self.provider.is_available() {
            return Err(EmbeddingError::ProviderNotConfigured.into());
        }
        self.provider
            .embed(EmbeddingRequest::new(content))
            .await
            .map_err(StoreError::from)
    }

    /// Number of stored concepts.
    pub fn len(&self) -> usize {
        self.concepts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.concepts.is_empty()
    }

    fn next_id(&self) -> EntityId {
        self.concepts.keys().next_back().map_or(1, |id| id + 1)
    }

    fn dimension_excluding(&self, id: EntityId) -> Option<usize> {
        self.concepts
            .values()
            .find(|c| c.id != id)
            .map(|c| c.vector.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use pretty_assertions::assert_eq;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tempfile::TempDir;

    /// Embeds text as `[len, first byte, call count]`.
    #[derive(Default)]
    struct FakeProvider {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl EmbeddingProvider for FakeProvider {
        fn name(&self) -> &str {
            "fake"
        }

        fn default_model(&self) -> &str {
            "fake-model"
        }

        async fn embed(
            &self,
            request: EmbeddingRequest,
        ) -> dmensions_embeddings::Result<EmbeddingResponse> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst) as f32;
            let first = request.text.bytes().next().unwrap_or(0) as f32;
            let embedding = vec![request.text.len() as f32, first, call];
            Ok(EmbeddingResponse {
                dimension: embedding.len(),
                embedding,
                model: "fake-model".to_string(),
            })
        }

        fn is_available(&self) -> bool {
            true
        }
    }

    /// Embeds everything to a vector of the text's length.
    struct LengthProvider;

    #[async_trait]
    impl EmbeddingProvider for LengthProvider {
        fn name(&self) -> &str {
            "length"
        }

        fn default_model(&self) -> &str {
            "length"
        }

        async fn embed(
            &self,
            request: EmbeddingRequest,
        ) -> dmensions_embeddings::Result<EmbeddingResponse> {
            let embedding = vec![1.0; request.text.len()];
            Ok(EmbeddingResponse {
                dimension: embedding.len(),
                embedding,
                model: "length".to_string(),
            })
        }

        fn is_available(&self) -> bool {
            true
        }
    }

    /// Has no model configured.
    struct UnconfiguredProvider;

    #[async_trait]
    impl EmbeddingProvider for UnconfiguredProvider {
        fn name(&self) -> &str {
            "unconfigured"
        }

        fn default_model(&self) -> &str {
            ""
        }

        async fn embed(
            &self,
            _request: EmbeddingRequest,
        ) -> dmensions_embeddings::Result<EmbeddingResponse> {
            panic!("embed called on an unavailable provider");
        }

        fn is_available(&self) -> bool {
            false
        }
    }

    async fn open(dir: &TempDir) -> ConceptStore {
        ConceptStore::open(dir.path(), Arc::new(FakeProvider::default()))
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_open_creates_document() {
        let temp_dir = TempDir::new().unwrap();
        let store = open(&temp_dir).await;
        assert!(store.is_new());
        assert!(store.is_empty());
        assert!(temp_dir.path().join(STORE_FILE).exists());

        let reopened = open(&temp_dir).await;
        assert!(!reopened.is_new());
    }

    #[tokio::test]
    async fn test_save_assigns_sequential_ids() {
        let temp_dir = TempDir::new().unwrap();
        let mut store = open(&temp_dir).await;

        let fox = store.save_concept("Fox").await.unwrap().id;
        let owl = store.save_concept("owl").await.unwrap().id;
        assert_eq!((fox, owl), (1, 2));
        assert_eq!(store.get(1).unwrap().content, "fox");
    }

    #[tokio::test]
    async fn test_save_existing_keeps_id_and_replaces_vector() {
        let temp_dir = TempDir::new().unwrap();
        let mut store = open(&temp_dir).await;

        let first = store.save_concept("fox").await.unwrap().clone();
        let second = store.save_concept("  FOX ").await.unwrap().clone();

        assert_eq!(store.len(), 1);
        assert_eq!(second.id, first.id);
        assert_eq!(second.created_at, first.created_at);
        assert_ne!(second.vector, first.vector);
    }

    #[tokio::test]
    async fn test_empty_concept_rejected() {
        let temp_dir = TempDir::new().unwrap();
        let mut store = open(&temp_dir).await;
        assert!(matches!(
            store.save_concept(" \t ").await,
            Err(StoreError::EmptyConcept)
        ));
    }

    #[tokio::test]
    async fn test_mixed_dimensions_rejected() {
        let temp_dir = TempDir::new().unwrap();
        let mut store = ConceptStore::open(temp_dir.path(), Arc::new(LengthProvider))
            .await
            .unwrap();

        store.save_concept("ape").await.unwrap();
        store.save_concept("bat").await.unwrap();
        let err = store.save_concept("bear").await.unwrap_err();
        assert!(matches!(
            err,
            StoreError::Embedding(EmbeddingError::DimensionMismatch {
                expected: 3,
                actual: 4
            })
        ));
        assert_eq!(store.len(), 2);
    }

    #[tokio::test]
    async fn test_persistence() {
        let temp_dir = TempDir::new().unwrap();

        let saved = {
            let mut store = open(&temp_dir).await;
            store.populate(&["kiwi", "koala", "lion"]).await.unwrap();
            store.all_entities()
        };

        let store = open(&temp_dir).await;
        assert_eq!(store.all_entities(), saved);
        assert_eq!(store.find("Koala").map(|c| c.id), Some(2));
    }

    #[tokio::test]
    async fn test_remove() {
        let temp_dir = TempDir::new().unwrap();
        let mut store = open(&temp_dir).await;
        store.populate(&["mole", "newt"]).await.unwrap();

        let removed = store.remove(1).await.unwrap();
        assert_eq!(removed.content, "mole");
        assert!(matches!(store.remove(1).await, Err(StoreError::NotFound(1))));

        // New ids follow the highest remaining id.
        let id = store.save_concept("owl").await.unwrap().id;
        assert_eq!(id, 3);
    }

    #[tokio::test]
    async fn test_embed_query_does_not_store() {
        let temp_dir = TempDir::new().unwrap();
        let store = open(&temp_dir).await;
        let vector = store.embed_query("Panda").await.unwrap();
        assert_eq!(vector.len(), 3);
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn test_failed_write_keeps_memory_unchanged() {
        let temp_dir = TempDir::new().unwrap();
        let mut store = open(&temp_dir).await;
        store.populate(&["fox", "owl"]).await.unwrap();
        let fox = store.find("fox").unwrap().clone();

        std::fs::remove_dir_all(temp_dir.path()).unwrap();

        assert!(store.save_concept("yak").await.is_err());
        assert!(store.find("yak").is_none());
        assert_eq!(store.len(), 2);

        assert!(store.save_concept("fox").await.is_err());
        assert_eq!(store.find("fox"), Some(&fox));

        assert!(store.remove(fox.id).await.is_err());
        assert_eq!(store.get(fox.id), Some(&fox));
        assert_eq!(store.len(), 2);
    }

    fn write_document(dir: &TempDir, concepts: &[Concept]) {
        let document = StoreDocument {
            concepts: concepts.iter().map(ConceptRecord::from).collect(),
        };
        std::fs::write(
            dir.path().join(STORE_FILE),
            serde_json::to_string(&document).unwrap(),
        )
        .unwrap();
    }

    fn concept(id: EntityId, content: &str, vector: Vec<f32>) -> Concept {
        Concept {
            id,
            content: content.to_string(),
            vector,
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_load_rejects_mixed_dimensions() {
        let temp_dir = TempDir::new().unwrap();
        write_document(
            &temp_dir,
            &[concept(1, "ape", vec![1.0, 0.0]), concept(2, "bat", vec![1.0])],
        );

        let err = ConceptStore::open(temp_dir.path(), Arc::new(FakeProvider::default()))
            .await
            .err()
            .unwrap();
        assert!(matches!(
            err,
            StoreError::Embedding(EmbeddingError::DimensionMismatch {
                expected: 2,
                actual: 1
            })
        ));
    }

    #[tokio::test]
    async fn test_load_rejects_duplicate_content() {
        let temp_dir = TempDir::new().unwrap();
        write_document(
            &temp_dir,
            &[concept(1, "ape", vec![1.0]), concept(2, "ape", vec![2.0])],
        );

        let err = ConceptStore::open(temp_dir.path(), Arc::new(FakeProvider::default()))
            .await
            .err()
            .unwrap();
        assert!(matches!(err, StoreError::InvalidDocument(_)));
    }

    #[tokio::test]
    async fn test_unavailable_provider_is_not_called() {
        let temp_dir = TempDir::new().unwrap();
        let mut store = ConceptStore::open(temp_dir.path(), Arc::new(UnconfiguredProvider))
            .await
            .unwrap();

        assert!(matches!(
            store.save_concept("fox").await,
            Err(StoreError::Embedding(EmbeddingError::ProviderNotConfigured))
        ));
        assert!(matches!(
            store.embed_query("fox").await,
            Err(StoreError::Embedding(EmbeddingError::ProviderNotConfigured))
        ));
        assert!(store.is_empty());
    }
}
