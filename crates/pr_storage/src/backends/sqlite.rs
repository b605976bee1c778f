use async_trait::async_trait;
use chrono::{DateTime, Utc};
use pr_core::{
    ArticleRecord, ArticleStorage, AuthorRef, CategoryRef, Error, FindManyQuery, Result,
    ARTICLE_ENTITY,
};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqliteRow};
use sqlx::Row;
use std::path::Path;
use std::sync::Arc;
use tracing::info;

const MIGRATIONS: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS authors (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT,
        email TEXT
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS categories (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS articles (
        id INTEGER PRIMARY KEY,
        title TEXT,
        slug TEXT,
        created_at TEXT,
        author_id INTEGER REFERENCES authors(id),
        category_id INTEGER REFERENCES categories(id)
    )
    "#,
];

const INSERT_AUTHOR: &str = "INSERT INTO authors (name, email) VALUES (?, ?) RETURNING id";
const INSERT_CATEGORY: &str = "INSERT INTO categories (name) VALUES (?) RETURNING id";

pub struct SQLiteStorage {
    pool: Arc<SqlitePool>,
}

fn db_error(context: &str, e: sqlx::Error) -> Error {
    Error::Database(format!("{}: {}", context, e))
}

impl SQLiteStorage {
    pub async fn new_with_path(db_path: &Path) -> Result<Self> {
        if let Some(parent) = db_path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let options = SqliteConnectOptions::new()
            .filename(db_path)
            .create_if_missing(true);
        let pool = SqlitePool::connect_with(options)
            .await
            .map_err(|e| db_error("Failed to connect to database", e))?;

        for (i, migration) in MIGRATIONS.iter().enumerate() {
            sqlx::query(migration)
                .execute(&pool)
                .await
                .map_err(|e| db_error(&format!("Failed to run migration {}", i), e))?;
        }

        info!("🏦 SQLite storage ready at {}", db_path.display());
        Ok(Self { pool: Arc::new(pool) })
    }

    fn row_to_article(row: &SqliteRow) -> Result<ArticleRecord> {
        let created_at = row
            .get::<Option<String>, _>("created_at")
            .map(|raw| {
                DateTime::parse_from_rfc3339(&raw)
                    .map(|dt| dt.with_timezone(&Utc))
                    .map_err(|e| Error::Database(format!("Invalid created_at '{}': {}", raw, e)))
            })
            .transpose()?;

        let author = row
            .get::<Option<i64>, _>("author_id")
            .map(|_| AuthorRef {
                name: row.get("author_name"),
                email: row.get("author_email"),
            });
        let category = row
            .get::<Option<i64>, _>("category_id")
            .map(|_| CategoryRef {
                name: row.get("category_name"),
            });

        Ok(ArticleRecord {
            id: row.get("id"),
            title: row.get("title"),
            slug: row.get("slug"),
            created_at,
            author,
            category,
        })
    }
}

#[async_trait]
impl ArticleStorage for SQLiteStorage {
    async fn find_many(
        &self,
        entity: &str,
        query: &FindManyQuery,
    ) -> Result<Option<Vec<ArticleRecord>>> {
        if entity != ARTICLE_ENTITY {
            return Err(Error::Storage(format!("Unknown entity type: {}", entity)));
        }

        let rows = sqlx::query(
            r#"
            SELECT a.id, a.title, a.slug, a.created_at,
                   au.id AS author_id, au.name AS author_name, au.email AS author_email,
                   c.id AS category_id, c.name AS category_name
            FROM articles a
            LEFT JOIN authors au ON au.id = a.author_id
            LEFT JOIN categories c ON c.id = a.category_id
            ORDER BY a.id
            "#,
        )
        .fetch_all(&*self.pool)
        .await
        .map_err(|e| db_error("Failed to fetch articles", e))?;

        let mut articles = Vec::with_capacity(rows.len());
        for row in &rows {
            articles.push(query.project(&Self::row_to_article(row)?));
        }
        Ok(Some(articles))
    }

    async fn store_article(&self, article: &ArticleRecord) -> Result<()> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| db_error("Failed to begin transaction", e))?;

        // Relation rows belong to a single article and go away when it is replaced.
        let previous: Option<(Option<i64>, Option<i64>)> =
            sqlx::query_as("SELECT author_id, category_id FROM articles WHERE id = ?")
                .bind(article.id)
                .fetch_optional(&mut *tx)
                .await
                .map_err(|e| db_error("Failed to look up existing article", e))?;

        let author_id = match &article.author {
            Some(author) => {
                let id: i64 = sqlx::query_scalar(INSERT_AUTHOR)
                    .bind(author.name.as_deref())
                    .bind(author.email.as_deref())
                    .fetch_one(&mut *tx)
                    .await
                    .map_err(|e| db_error("Failed to store author", e))?;
                Some(id)
            }
            None => None,
        };

        let category_id = match &article.category {
            Some(category) => {
                let id: i64 = sqlx::query_scalar(INSERT_CATEGORY)
                    .bind(category.name.as_deref())
                    .fetch_one(&mut *tx)
                    .await
                    .map_err(|e| db_error("Failed to store category", e))?;
                Some(id)
            }
            None => None,
        };

        sqlx::query(
            r#"
            INSERT OR REPLACE INTO articles
            (id, title, slug, created_at, author_id, category_id)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(article.id)
        .bind(article.title.as_deref())
        .bind(article.slug.as_deref())
        .bind(article.created_at.map(|dt| dt.to_rfc3339()))
        .bind(author_id)
        .bind(category_id)
        .execute(&mut *tx)
        .await
        .map_err(|e| db_error("Failed to store article", e))?;

        if let Some((old_author, old_category)) = previous {
            if let Some(id) = old_author {
                sqlx::query("DELETE FROM authors WHERE id = ?")
                    .bind(id)
                    .execute(&mut *tx)
                    .await
                    .map_err(|e| db_error("Failed to remove replaced author", e))?;
            }
            if let Some(id) = old_category {
                sqlx::query("DELETE FROM categories WHERE id = ?")
                    .bind(id)
                    .execute(&mut *tx)
                    .await
                    .map_err(|e| db_error("Failed to remove replaced category", e))?;
            }
        }

        tx.commit()
            .await
            .map_err(|e| db_error("Failed to commit article", e))?;
        Ok(())
    }
}
