//! End-to-end tests over [`QaService`]: retrieval, orchestration, and
//! both caches exercised together against a stub index.

use async_trait::async_trait;
use fireqa::{
    IndexDocument, IndexHit, LanguageModel, LlmError, QaConfig, QaService, VectorIndex,
};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tempfile::TempDir;

/// In-memory index: naive substring matching, distance by match quality.
struct StubIndex {
    documents: Mutex<Vec<IndexDocument>>,
    queries: AtomicUsize,
}

impl StubIndex {
    fn new() -> Arc<Self> {
        Arc::new(Self {
            documents: Mutex::new(Vec::new()),
            queries: AtomicUsize::new(0),
        })
    }
}

#[async_trait]
impl VectorIndex for StubIndex {
    async fn add(&self, documents: &[IndexDocument]) -> fireqa::Result<()> {
        self.documents.lock().unwrap().extend_from_slice(documents);
        Ok(())
    }

    async fn query(&self, text: &str, top_k: usize) -> fireqa::Result<Vec<IndexHit>> {
        self.queries.fetch_add(1, Ordering::SeqCst);
        let documents = self.documents.lock().unwrap();
        let mut hits: Vec<IndexHit> = documents
            .iter()
            .map(|doc| {
                let related = text.chars().any(|c| doc.content.contains(c));
                IndexHit {
                    content: doc.content.clone(),
                    metadata: doc.metadata.clone(),
                    distance: if related { 0.2 } else { 0.9 },
                }
            })
            .collect();
        hits.sort_by(|a, b| a.distance.total_cmp(&b.distance));
        hits.truncate(top_k);
        Ok(hits)
    }

    async fn count(&self) -> fireqa::Result<usize> {
        Ok(self.documents.lock().unwrap().len())
    }
}

struct CountingModel {
    calls: AtomicUsize,
}

#[async_trait]
impl LanguageModel for CountingModel {
    async fn complete(&self, _prompt: &str) -> Result<String, LlmError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok("来自模型的回答。".to_string())
    }
}

fn config(dir: &TempDir) -> QaConfig {
    QaConfig {
        cache_dir: dir.path().to_path_buf(),
        ..QaConfig::default()
    }
}

#[tokio::test]
async fn ask_without_model_returns_the_canned_answer_and_caches_nothing() {
    let dir = TempDir::new().unwrap();
    let service = QaService::new(config(&dir), StubIndex::new(), None).unwrap();

    let first = service.ask("如何使用灭火器？").await;
    let second = service.ask("如何使用灭火器？").await;

    assert_eq!(
        first.answer,
        "灭火器应放置在易于取用的位置，定期检查压力表，确保在有效期内使用。"
    );
    // Fallback answers are never cached: both calls recompute and agree.
    assert_eq!(first.answer, second.answer);
    let answer_cache = service.stats().answer_cache.unwrap();
    assert_eq!(answer_cache.fast_count, 0);
    assert_eq!(answer_cache.durable_count, 0);
}

#[tokio::test]
async fn repeated_search_is_served_from_cache() {
    let dir = TempDir::new().unwrap();
    let index = StubIndex::new();
    let service = QaService::new(config(&dir), index.clone(), None).unwrap();
    service
        .add_documents(&[
            IndexDocument::new("灭火器应定期检查压力表，确保在有效期内。"),
            IndexDocument::new("疏散通道必须保持畅通。"),
        ])
        .await
        .unwrap();

    let first = service.search("灭火器检查", 2).await;
    let second = service.search("灭火器检查", 2).await;

    assert_eq!(first.len(), 2);
    assert_eq!(first, second);
    assert_eq!(index.queries.load(Ordering::SeqCst), 1);
    assert!(first[0].score > first[1].score);
}

#[tokio::test]
async fn model_answers_are_cached_across_identical_requests() {
    let dir = TempDir::new().unwrap();
    let index = StubIndex::new();
    let model = Arc::new(CountingModel {
        calls: AtomicUsize::new(0),
    });
    let service = QaService::new(config(&dir), index, Some(model.clone())).unwrap();
    service
        .add_documents(&[IndexDocument::new("灭火器使用要点。")])
        .await
        .unwrap();

    let first = service.ask("灭火器怎么用？").await;
    let second = service.ask("灭火器怎么用？").await;

    assert_eq!(first.answer, "来自模型的回答。");
    assert_eq!(second.answer, first.answer);
    assert_eq!(model.calls.load(Ordering::SeqCst), 1);
    let answer_cache = service.stats().answer_cache.unwrap();
    assert!(answer_cache.fast_count >= 1);
}

#[tokio::test]
async fn retrieval_switch_off_skips_the_index_entirely() {
    let dir = TempDir::new().unwrap();
    let index = StubIndex::new();
    let mut cfg = config(&dir);
    cfg.retrieval_enabled = false;
    let service = QaService::new(cfg, index.clone(), None).unwrap();

    let outcome = service.ask("如何预防火灾？").await;

    assert!(outcome.documents.is_empty());
    assert!(outcome.answer.contains("火灾预防"));
    assert_eq!(index.queries.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn health_and_collection_info_reflect_the_index() {
    let dir = TempDir::new().unwrap();
    let index = StubIndex::new();
    let service = QaService::new(config(&dir), index, None).unwrap();
    service
        .add_documents(&[IndexDocument::new("文档一"), IndexDocument::new("文档二")])
        .await
        .unwrap();

    let health = service.health().await;
    assert!(health.index_ok);
    assert!(!health.model_configured);

    let info = service.collection_info().await;
    assert!(info.healthy);
    assert_eq!(info.document_count, 2);
}

#[tokio::test]
async fn clear_caches_forces_fresh_retrieval() {
    let dir = TempDir::new().unwrap();
    let index = StubIndex::new();
    let service = QaService::new(config(&dir), index.clone(), None).unwrap();
    service
        .add_documents(&[IndexDocument::new("消防通道保持畅通。")])
        .await
        .unwrap();

    service.search("消防", 1).await;
    service.clear_caches().await;
    service.search("消防", 1).await;

    assert_eq!(index.queries.load(Ordering::SeqCst), 2);
    let stats = service.stats();
    assert_eq!(stats.retrieval_cache.unwrap().fast_count, 1);
}
