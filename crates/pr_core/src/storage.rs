use async_trait::async_trait;
use crate::query::FindManyQuery;
use crate::types::ArticleRecord;
use crate::Result;

#[async_trait]
pub trait ArticleStorage: Send + Sync {
    /// Fetch every record of `entity`, reduced to what `query` selects.
    /// `Ok(None)` means the store answered with no sequence at all.
    async fn find_many(
        &self,
        entity: &str,
        query: &FindManyQuery,
    ) -> Result<Option<Vec<ArticleRecord>>>;

    /// Insert or replace an article together with its relations
    async fn store_article(&self, article: &ArticleRecord) -> Result<()>;
}
