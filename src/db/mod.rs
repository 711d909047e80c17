use crate::error::Result;
use crate::models::Theme;
use sqlx::migrate::MigrateDatabase;
use sqlx::sqlite::{SqlitePool, SqlitePoolOptions};
use sqlx::{Row, Sqlite};

/// Key the theme choice is stored under.
pub const THEME_KEY: &str = "gdgc_darkmode";

pub struct Preferences {
    pool: SqlitePool,
}

impl Preferences {
    pub async fn open(db_url: &str) -> Result<Self> {
        // Create database if it doesn't exist
        if !Sqlite::database_exists(db_url).await.unwrap_or(false) {
            Sqlite::create_database(db_url).await?;
        }

        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect(db_url)
            .await?;

        Self::init_schema(&pool).await?;

        Ok(Self { pool })
    }

    async fn init_schema(pool: &SqlitePool) -> Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS preferences (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL
            );
            "#,
        )
        .execute(pool)
        .await?;

        Ok(())
    }

    pub async fn get(&self, key: &str) -> Result<Option<String>> {
        let row = sqlx::query("SELECT value FROM preferences WHERE key = ?")
            .bind(key)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(|r| r.get::<String, _>("value")))
    }

    pub async fn set(&self, key: &str, value: &str) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO preferences (key, value)
            VALUES (?, ?)
            ON CONFLICT(key) DO UPDATE SET value = excluded.value
            "#,
        )
        .bind(key)
        .bind(value)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    pub async fn theme(&self) -> Result<Option<Theme>> {
        Ok(self.get(THEME_KEY).await?.map(|v| {
            if v == "true" { Theme::Dark } else { Theme::Light }
        }))
    }

    pub async fn save_theme(&self, theme: Theme) -> Result<()> {
        self.set(THEME_KEY, if theme.is_dark() { "true" } else { "false" }).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn db_url(dir: &tempfile::TempDir) -> String {
        format!("sqlite:{}", dir.path().join("prefs.db").display())
    }

    #[tokio::test]
    async fn theme_is_unset_on_fresh_database() {
        let dir = tempfile::tempdir().unwrap();
        let prefs = Preferences::open(&db_url(&dir)).await.unwrap();
        assert_eq!(prefs.theme().await.unwrap(), None);
    }

    #[tokio::test]
    async fn theme_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let url = db_url(&dir);
        {
            let prefs = Preferences::open(&url).await.unwrap();
            prefs.save_theme(Theme::Light).await.unwrap();
            prefs.save_theme(Theme::Dark).await.unwrap();
            prefs.save_theme(Theme::Light).await.unwrap();
        }
        let reopened = Preferences::open(&url).await.unwrap();
        assert_eq!(reopened.theme().await.unwrap(), Some(Theme::Light));
        assert_eq!(reopened.get(THEME_KEY).await.unwrap().as_deref(), Some("false"));
    }
}
