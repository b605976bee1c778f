use anyhow::Context;
use clap::Parser;
use pr_core::{ArticleStorage, ReportBuilder};
use pr_storage::MemoryStorage;
use pr_web::AppState;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, Level};

#[derive(Parser, Debug)]
#[command(author, version, about = "Serve the posts report over HTTP", long_about = None)]
pub struct Cli {
    /// Address the HTTP server listens on
    #[arg(long, env = "POSTS_REPORT_BIND", default_value = "127.0.0.1:1337")]
    bind: SocketAddr,
    /// Article store backend: memory or sqlite
    #[arg(long, env = "POSTS_REPORT_STORAGE", default_value = "memory")]
    storage: String,
    /// SQLite database file, used by the sqlite backend
    #[arg(long, env = "POSTS_REPORT_DATABASE", default_value = "posts-report.db")]
    database: PathBuf,
    /// JSON array of articles to load into the store at startup
    #[arg(long, env = "POSTS_REPORT_SEED")]
    seed: Option<PathBuf>,
    /// Maximum log level (trace, debug, info, warn, error). The built report is logged at debug.
    #[arg(long, env = "POSTS_REPORT_LOG_LEVEL", default_value = "info")]
    log_level: Level,
}

async fn open_storage(cli: &Cli) -> anyhow::Result<Arc<dyn ArticleStorage>> {
    let storage = pr_storage::create_storage(&cli.storage, &cli.database)
        .await
        .with_context(|| format!("Failed to open {} storage", cli.storage))?;

    if let Some(seed) = &cli.seed {
        let fixtures = MemoryStorage::from_json_file(seed)
            .await
            .with_context(|| format!("Failed to read seed file {}", seed.display()))?;
        let articles = fixtures.articles().await;
        for article in &articles {
            storage.store_article(article).await?;
        }
        info!("🌱 Seeded {} articles into {} storage", articles.len(), cli.storage);
    }

    Ok(storage)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    tracing_subscriber::fmt()
        .with_max_level(cli.log_level)
        .init();

    let storage = open_storage(&cli).await?;
    let state = AppState::new(ReportBuilder::new(storage));
    pr_web::serve(cli.bind, state).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_defaults() {
        let cli = Cli::try_parse_from(["posts-report"]).unwrap();
        assert_eq!(cli.bind, "127.0.0.1:1337".parse::<SocketAddr>().unwrap());
        assert_eq!(cli.storage, "memory");
        assert_eq!(cli.log_level, Level::INFO);
        assert!(cli.seed.is_none());
    }

    #[test]
    fn test_cli_rejects_bad_log_level() {
        assert!(Cli::try_parse_from(["posts-report", "--log-level", "loud"]).is_err());
    }

    #[tokio::test]
    async fn test_seed_file_is_loaded_into_memory_storage() {
        let dir = tempfile::tempdir().unwrap();
        let seed = dir.path().join("seed.json");
        std::fs::write(
            &seed,
            r#"[{"id": 3, "title": "Seeded", "createdAt": "1970-01-01T00:00:00Z",
                 "category": {"name": "News"}}]"#,
        )
        .unwrap();

        let cli = Cli::try_parse_from(["posts-report", "--seed", seed.to_str().unwrap()]).unwrap();
        let storage = open_storage(&cli).await.unwrap();
        let rows = ReportBuilder::new(storage).build_report().await.unwrap().unwrap();

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].title, "Seeded");
        assert_eq!(rows[0].author_name, "");
    }
}
