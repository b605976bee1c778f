use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::types::{ArticleRecord, AuthorRef, CategoryRef};

/// Entity type the posts report reads from.
pub const ARTICLE_ENTITY: &str = "api::article.article";

/// Field selection for a `find_many` call: top-level `fields` plus the
/// relations to `populate` and the fields to keep on each of them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FindManyQuery {
    pub fields: Vec<String>,
    pub populate: BTreeMap<String, Vec<String>>,
}

impl FindManyQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.fields.extend(fields.into_iter().map(Into::into));
        self
    }

    pub fn with_populate<I, S>(mut self, relation: &str, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.populate
            .entry(relation.to_string())
            .or_default()
            .extend(fields.into_iter().map(Into::into));
        self
    }

    /// The query issued by the posts report.
    pub fn posts_report() -> Self {
        Self::new()
            .with_fields(["id", "title", "slug", "createdAt"])
            .with_populate("author", ["name", "email"])
            .with_populate("category", ["name"])
    }

    pub fn selects(&self, field: &str) -> bool {
        self.fields.iter().any(|f| f == field)
    }

    fn relation_selects(&self, relation: &str, field: &str) -> bool {
        self.populate
            .get(relation)
            .map(|fields| fields.iter().any(|f| f == field))
            .unwrap_or(false)
    }

    /// Drops everything from `record` the query did not ask for. The id is
    /// always kept.
    pub fn project(&self, record: &ArticleRecord) -> ArticleRecord {
        let author = if self.populate.contains_key("author") {
            record.author.as_ref().map(|author| AuthorRef {
                name: author
                    .name
                    .clone()
                    .filter(|_| self.relation_selects("author", "name")),
                email: author
                    .email
                    .clone()
                    .filter(|_| self.relation_selects("author", "email")),
            })
        } else {
            None
        };

        let category = if self.populate.contains_key("category") {
            record.category.as_ref().map(|category| CategoryRef {
                name: category
                    .name
                    .clone()
                    .filter(|_| self.relation_selects("category", "name")),
            })
        } else {
            None
        };

        ArticleRecord {
            id: record.id,
            title: record.title.clone().filter(|_| self.selects("title")),
            slug: record.slug.clone().filter(|_| self.selects("slug")),
            created_at: record.created_at.filter(|_| self.selects("createdAt")),
            author,
            category,
        }
    }
}
