use super::*;
use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use chrono::{TimeZone, Utc};
use pr_core::{ArticleRecord, ArticleStorage, AuthorRef, CategoryRef, FindManyQuery, ReportBuilder};
use pr_storage::MemoryStorage;
use serde_json::{json, Value};
use tower::ServiceExt;

struct NullStorage;

#[async_trait]
impl ArticleStorage for NullStorage {
    async fn find_many(
        &self,
        _entity: &str,
        _query: &FindManyQuery,
    ) -> pr_core::Result<Option<Vec<ArticleRecord>>> {
        Ok(None)
    }

    async fn store_article(&self, _article: &ArticleRecord) -> pr_core::Result<()> {
        Ok(())
    }
}

struct FailingStorage;

#[async_trait]
impl ArticleStorage for FailingStorage {
    async fn find_many(
        &self,
        _entity: &str,
        _query: &FindManyQuery,
    ) -> pr_core::Result<Option<Vec<ArticleRecord>>> {
        Err(pr_core::Error::Database("database is locked".to_string()))
    }

    async fn store_article(&self, _article: &ArticleRecord) -> pr_core::Result<()> {
        Ok(())
    }
}

fn hello_article() -> ArticleRecord {
    ArticleRecord {
        id: 1,
        title: Some("Hello".to_string()),
        slug: Some("hello".to_string()),
        created_at: Some(Utc.timestamp_opt(0, 0).unwrap()),
        author: Some(AuthorRef {
            name: Some("Ann".to_string()),
            email: Some("ann@x.com".to_string()),
        }),
        category: Some(CategoryRef { name: Some("News".to_string()) }),
    }
}

fn app_with(storage: Arc<dyn ArticleStorage>) -> Router {
    create_app(AppState::new(ReportBuilder::new(storage)))
}

async fn get_report(app: Router) -> (StatusCode, Vec<u8>) {
    let request = Request::builder()
        .method("GET")
        .uri(POSTS_REPORT_ROUTE)
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, body.to_vec())
}

#[tokio::test]
async fn test_report_returns_flat_rows() {
    let storage = MemoryStorage::with_articles([hello_article()]);
    let (status, body) = get_report(app_with(Arc::new(storage))).await;

    assert_eq!(status, StatusCode::OK);
    let json: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(
        json,
        json!([{
            "id": 1,
            "title": "Hello",
            "category": "News",
            "publishedDate": "Thu Jan 01 1970",
            "authorName": "Ann",
            "authorEmail": "ann@x.com"
        }])
    );
}

#[tokio::test]
async fn test_empty_store_returns_empty_array() {
    let (status, body) = get_report(app_with(Arc::new(MemoryStorage::new()))).await;

    assert_eq!(status, StatusCode::OK);
    let json: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json, json!([]));
}

#[tokio::test]
async fn test_null_sequence_returns_no_content() {
    let (status, body) = get_report(app_with(Arc::new(NullStorage))).await;

    assert_eq!(status, StatusCode::NO_CONTENT);
    assert!(body.is_empty());
}

#[tokio::test]
async fn test_store_failure_returns_bad_request() {
    let (status, body) = get_report(app_with(Arc::new(FailingStorage))).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    let json: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json["message"], "Post report controller error");
    assert_eq!(json["moreDetails"]["error"], "Database error: database is locked");
}

#[tokio::test]
async fn test_missing_category_returns_bad_request() {
    let mut article = hello_article();
    article.category = None;
    let storage = MemoryStorage::with_articles([article]);
    let (status, body) = get_report(app_with(Arc::new(storage))).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    let json: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json["message"], "Post report controller error");
    assert_eq!(json["moreDetails"]["error"], "Article 1 has no category");
}

#[tokio::test]
async fn test_unknown_route_is_not_found() {
    let app = app_with(Arc::new(MemoryStorage::new()));
    let request = Request::builder()
        .uri("/api/posts")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
