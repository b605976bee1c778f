use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::debug;

use crate::query::{FindManyQuery, ARTICLE_ENTITY};
use crate::storage::ArticleStorage;
use crate::types::{ArticleRecord, ReportRow};
use crate::{Error, Result};

/// Calendar date without time, e.g. `Thu Jan 01 1970`.
const PUBLISHED_DATE_FORMAT: &str = "%a %b %d %Y";

pub fn format_published_date(created_at: &DateTime<Utc>) -> String {
    created_at.format(PUBLISHED_DATE_FORMAT).to_string()
}

fn non_empty(value: Option<&String>) -> String {
    value.filter(|v| !v.is_empty()).cloned().unwrap_or_default()
}

impl ReportRow {
    /// Flattens one article. Author fields degrade to empty strings, but a
    /// missing category relation is an error.
    pub fn from_record(record: &ArticleRecord) -> Result<Self> {
        let category = record
            .category
            .as_ref()
            .ok_or(Error::MissingCategory { id: record.id })?;
        let author = record.author.as_ref();

        Ok(Self {
            id: record.id,
            title: non_empty(record.title.as_ref()),
            category: non_empty(category.name.as_ref()),
            published_date: record
                .created_at
                .as_ref()
                .map(format_published_date)
                .unwrap_or_default(),
            author_name: non_empty(author.and_then(|a| a.name.as_ref())),
            author_email: non_empty(author.and_then(|a| a.email.as_ref())),
        })
    }
}

/// Builds the posts report from whatever store it is handed.
#[derive(Clone)]
pub struct ReportBuilder {
    storage: Arc<dyn ArticleStorage>,
}

impl ReportBuilder {
    pub fn new(storage: Arc<dyn ArticleStorage>) -> Self {
        Self { storage }
    }

    /// Returns `Ok(None)` when the store yields no sequence, which is not the
    /// same as an empty report.
    pub async fn build_report(&self) -> Result<Option<Vec<ReportRow>>> {
        let query = FindManyQuery::posts_report();
        let Some(records) = self.storage.find_many(ARTICLE_ENTITY, &query).await? else {
            debug!("Article store returned no sequence for {}", ARTICLE_ENTITY);
            return Ok(None);
        };

        let rows = records
            .iter()
            .map(ReportRow::from_record)
            .collect::<Result<Vec<_>>>()?;
        Ok(Some(rows))
    }
}
