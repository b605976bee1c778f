use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// An article as returned by the data store, limited to whatever fields the
/// query asked for.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArticleRecord {
    pub id: i64,
    pub title: Option<String>,
    pub slug: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
    pub author: Option<AuthorRef>,
    pub category: Option<CategoryRef>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthorRef {
    pub name: Option<String>,
    pub email: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryRef {
    pub name: Option<String>,
}

/// One flattened line of the posts report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportRow {
    pub id: i64,
    pub title: String,
    pub category: String,
    pub published_date: String,
    pub author_name: String,
    pub author_email: String,
}
