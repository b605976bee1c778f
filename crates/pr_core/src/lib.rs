pub mod error;
pub mod query;
pub mod report;
pub mod storage;
pub mod types;

pub use error::{Error, Result};
pub use query::{FindManyQuery, ARTICLE_ENTITY};
pub use report::ReportBuilder;
pub use storage::ArticleStorage;
pub use types::{ArticleRecord, AuthorRef, CategoryRef, ReportRow};
