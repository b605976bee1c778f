use async_trait::async_trait;
use pr_core::{ArticleRecord, ArticleStorage, Error, FindManyQuery, Result, ARTICLE_ENTITY};
use std::path::Path;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::info;

pub struct MemoryStore {
    articles: Vec<ArticleRecord>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self { articles: Vec::new() }
    }

    pub fn store_article(&mut self, article: &ArticleRecord) {
        if let Some(existing) = self.articles.iter_mut().find(|a| a.id == article.id) {
            *existing = article.clone();
        } else {
            self.articles.push(article.clone());
        }
    }

    pub fn find_many(&self, query: &FindManyQuery) -> Vec<ArticleRecord> {
        self.articles.iter().map(|article| query.project(article)).collect()
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Clone, Default)]
pub struct MemoryStorage {
    store: Arc<RwLock<MemoryStore>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_articles(articles: impl IntoIterator<Item = ArticleRecord>) -> Self {
        let mut store = MemoryStore::new();
        for article in articles {
            store.store_article(&article);
        }
        Self { store: Arc::new(RwLock::new(store)) }
    }

    /// Seed from a JSON array of articles with nested `author` and `category`.
    pub async fn from_json_file(path: &Path) -> Result<Self> {
        let raw = tokio::fs::read_to_string(path).await?;
        let articles: Vec<ArticleRecord> = serde_json::from_str(&raw)?;
        info!("📰 Loaded {} articles from {}", articles.len(), path.display());
        Ok(Self::with_articles(articles))
    }

    pub async fn articles(&self) -> Vec<ArticleRecord> {
        self.store.read().await.articles.clone()
    }
}

#[async_trait]
impl ArticleStorage for MemoryStorage {
    async fn find_many(
        &self,
        entity: &str,
        query: &FindManyQuery,
    ) -> Result<Option<Vec<ArticleRecord>>> {
        if entity != ARTICLE_ENTITY {
            return Err(Error::Storage(format!("Unknown entity type: {}", entity)));
        }
        let store = self.store.read().await;
        Ok(Some(store.find_many(query)))
    }

    async fn store_article(&self, article: &ArticleRecord) -> Result<()> {
        let mut store = self.store.write().await;
        store.store_article(article);
        Ok(())
    }
}
