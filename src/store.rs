//! Persistence for scraped articles.
//!
//! [`ArticleStore`] is the seam the scraper and the API talk to;
//! [`MySqlArticleStore`] implements it on a bounded `sqlx` MySQL pool.
//!
//! Uniqueness by `href` is an application-level rule: callers check
//! [`ArticleStore::exists`] before [`ArticleStore::insert`]. The table has no
//! unique constraint on `href`.

use crate::error::StoreError;
use crate::models::{Article, NewArticle};
use async_trait::async_trait;
use sqlx::mysql::{MySqlConnectOptions, MySqlPool, MySqlPoolOptions};
use tracing::{info, instrument};

const CREATE_ARTICLES_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS articles (
    id INT AUTO_INCREMENT PRIMARY KEY,
    source VARCHAR(50),
    text TEXT,
    href TEXT,
    imgSrc TEXT,
    date TIMESTAMP DEFAULT CURRENT_TIMESTAMP
)
"#;

#[async_trait]
pub trait ArticleStore: Send + Sync {
    /// Create the `articles` table if it does not exist.
    async fn ensure_schema(&self) -> Result<(), StoreError>;

    async fn exists(&self, href: &str) -> Result<bool, StoreError>;

    /// Append a row; `date` defaults to the insertion time.
    async fn insert(&self, article: &NewArticle) -> Result<(), StoreError>;

    /// Every article, newest first.
    async fn list_all(&self) -> Result<Vec<Article>, StoreError>;
}

/// Connection parameters for the MySQL store.
#[derive(Debug, Clone)]
pub struct MySqlSettings {
    pub host: String,
    pub user: String,
    pub password: String,
    pub database: String,
    pub port: u16,
    pub max_connections: u32,
}

#[derive(Debug, Clone)]
pub struct MySqlArticleStore {
    pool: MySqlPool,
}

impl MySqlArticleStore {
    /// Build a lazily-connecting pool; connections are opened on first use.
    pub fn connect_lazy(settings: &MySqlSettings) -> Self {
        let options = MySqlConnectOptions::new()
            .host(&settings.host)
            .port(settings.port)
            .username(&settings.user)
            .password(&settings.password)
            .database(&settings.database);
        let pool = MySqlPoolOptions::new()
            .max_connections(settings.max_connections)
            .connect_lazy_with(options);
        info!(
            host = %settings.host,
            port = settings.port,
            database = %settings.database,
            max_connections = settings.max_connections,
            "Configured MySQL pool"
        );
        Self { pool }
    }

    pub fn pool(&self) -> &MySqlPool {
        &self.pool
    }
}

#[async_trait]
impl ArticleStore for MySqlArticleStore {
    #[instrument(level = "info", skip_all)]
    async fn ensure_schema(&self) -> Result<(), StoreError> {
        sqlx::query(CREATE_ARTICLES_TABLE).execute(&self.pool).await?;
        info!("Database initialized");
        Ok(())
    }

    async fn exists(&self, href: &str) -> Result<bool, StoreError> {
        let row: Option<(i32,)> = sqlx::query_as("SELECT id FROM articles WHERE href = ? LIMIT 1")
            .bind(href)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.is_some())
    }

    async fn insert(&self, article: &NewArticle) -> Result<(), StoreError> {
        sqlx::query("INSERT INTO articles (source, text, href, imgSrc) VALUES (?, ?, ?, ?)")
            .bind(&article.source)
            .bind(&article.text)
            .bind(&article.href)
            .bind(&article.img_src)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn list_all(&self) -> Result<Vec<Article>, StoreError> {
        let articles = sqlx::query_as::<_, Article>(
            r#"
            SELECT id, source, text, href, imgSrc, date
            FROM articles
            ORDER BY date DESC, id DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(articles)
    }
}
