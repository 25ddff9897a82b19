//! Database migrations
//!
//! Code-embedded migrations, applied in version order and tracked in a
//! `_migrations` table so re-running is safe. The schema carries the
//! uniqueness constraints the service layer's check-then-act sequences
//! rely on under concurrency: unique username/email/slug, case-insensitive
//! unique tag names, and composite primary keys on the relationship tables.

use anyhow::{Context, Result};
use sqlx::SqlitePool;

/// A single schema migration
#[derive(Debug, Clone)]
pub struct Migration {
    /// Unique, sequential version number
    pub version: i32,
    /// Human-readable name
    pub name: &'static str,
    /// SQL statements, semicolon-separated
    pub up: &'static str,
}

pub const MIGRATIONS: &[Migration] = &[
    Migration {
        version: 1,
        name: "create_users",
        up: r#"
            CREATE TABLE IF NOT EXISTS users (
                id TEXT PRIMARY KEY,
                username VARCHAR(50) NOT NULL UNIQUE,
                email VARCHAR(255) NOT NULL UNIQUE,
                password_hash VARCHAR(255) NOT NULL,
                bio TEXT,
                image VARCHAR(500),
                created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP,
                updated_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
            );
            CREATE INDEX IF NOT EXISTS idx_users_username ON users(username);
            CREATE INDEX IF NOT EXISTS idx_users_email ON users(email);
        "#,
    },
    Migration {
        version: 2,
        name: "create_articles",
        up: r#"
            CREATE TABLE IF NOT EXISTS articles (
                id TEXT PRIMARY KEY,
                slug VARCHAR(255) NOT NULL UNIQUE,
                title VARCHAR(255) NOT NULL,
                description TEXT NOT NULL,
                body TEXT NOT NULL,
                author_id TEXT NOT NULL,
                created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP,
                updated_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP,
                FOREIGN KEY (author_id) REFERENCES users(id) ON DELETE CASCADE
            );
            CREATE INDEX IF NOT EXISTS idx_articles_slug ON articles(slug);
            CREATE INDEX IF NOT EXISTS idx_articles_author_id ON articles(author_id);
            CREATE INDEX IF NOT EXISTS idx_articles_created_at ON articles(created_at);
        "#,
    },
    Migration {
        version: 3,
        name: "create_tags",
        up: r#"
            CREATE TABLE IF NOT EXISTS tags (
                id TEXT PRIMARY KEY,
                name VARCHAR(100) NOT NULL UNIQUE COLLATE NOCASE,
                created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
            );
        "#,
    },
    Migration {
        version: 4,
        name: "create_article_tags",
        up: r#"
            CREATE TABLE IF NOT EXISTS article_tags (
                article_id TEXT NOT NULL,
                tag_id TEXT NOT NULL,
                PRIMARY KEY (article_id, tag_id),
                FOREIGN KEY (article_id) REFERENCES articles(id) ON DELETE CASCADE,
                FOREIGN KEY (tag_id) REFERENCES tags(id) ON DELETE CASCADE
            );
            CREATE INDEX IF NOT EXISTS idx_article_tags_tag_id ON article_tags(tag_id);
        "#,
    },
    Migration {
        version: 5,
        name: "create_favorites",
        up: r#"
            CREATE TABLE IF NOT EXISTS favorites (
                user_id TEXT NOT NULL,
                article_id TEXT NOT NULL,
                created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP,
                PRIMARY KEY (user_id, article_id),
                FOREIGN KEY (user_id) REFERENCES users(id) ON DELETE CASCADE,
                FOREIGN KEY (article_id) REFERENCES articles(id) ON DELETE CASCADE
            );
            CREATE INDEX IF NOT EXISTS idx_favorites_article_id ON favorites(article_id);
        "#,
    },
    Migration {
        version: 6,
        name: "create_follows",
        up: r#"
            CREATE TABLE IF NOT EXISTS follows (
                follower_id TEXT NOT NULL,
                followed_id TEXT NOT NULL,
                created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP,
                PRIMARY KEY (follower_id, followed_id),
                FOREIGN KEY (follower_id) REFERENCES users(id) ON DELETE CASCADE,
                FOREIGN KEY (followed_id) REFERENCES users(id) ON DELETE CASCADE
            );
            CREATE INDEX IF NOT EXISTS idx_follows_followed_id ON follows(followed_id);
        "#,
    },
    Migration {
        version: 7,
        name: "create_comments",
        up: r#"
            CREATE TABLE IF NOT EXISTS comments (
                id TEXT PRIMARY KEY,
                body TEXT NOT NULL,
                author_id TEXT NOT NULL,
                article_id TEXT NOT NULL,
                created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP,
                FOREIGN KEY (author_id) REFERENCES users(id) ON DELETE CASCADE,
                FOREIGN KEY (article_id) REFERENCES articles(id) ON DELETE CASCADE
            );
            CREATE INDEX IF NOT EXISTS idx_comments_article_id ON comments(article_id);
            CREATE INDEX IF NOT EXISTS idx_comments_author_id ON comments(author_id);
        "#,
    },
];

/// Run all pending migrations, returning how many were applied.
pub async fn run_migrations(pool: &SqlitePool) -> Result<usize> {
    create_migrations_table(pool).await?;

    let applied: Vec<i32> =
        sqlx::query_scalar("SELECT version FROM _migrations ORDER BY version")
            .fetch_all(pool)
            .await
            .context("Failed to read applied migrations")?;

    let mut count = 0;
    for migration in MIGRATIONS {
        if !applied.contains(&migration.version) {
            tracing::info!("Applying migration {}: {}", migration.version, migration.name);
            apply_migration(pool, migration)
                .await
                .with_context(|| format!("Failed to apply migration: {}", migration.name))?;
            count += 1;
        }
    }

    if count > 0 {
        tracing::info!("Applied {} migration(s)", count);
    } else {
        tracing::debug!("No pending migrations");
    }

    Ok(count)
}

/// Check whether every migration has been applied.
pub async fn is_up_to_date(pool: &SqlitePool) -> Result<bool> {
    create_migrations_table(pool).await?;

    let applied: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM _migrations")
        .fetch_one(pool)
        .await?;

    Ok(applied as usize == MIGRATIONS.len())
}

async fn create_migrations_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS _migrations (
            version INTEGER PRIMARY KEY,
            name VARCHAR(255) NOT NULL UNIQUE,
            applied_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
        )
        "#,
    )
    .execute(pool)
    .await
    .context("Failed to create migrations table")?;

    Ok(())
}

async fn apply_migration(pool: &SqlitePool, migration: &Migration) -> Result<()> {
    for statement in migration.up.split(';') {
        let statement = statement.trim();
        if !statement.is_empty() {
            sqlx::query(statement)
                .execute(pool)
                .await
                .with_context(|| format!("Failed to execute: {statement}"))?;
        }
    }

    sqlx::query("INSERT INTO _migrations (version, name) VALUES (?, ?)")
        .bind(migration.version)
        .bind(migration.name)
        .execute(pool)
        .await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::create_test_pool;

    #[tokio::test]
    async fn test_run_migrations_is_idempotent() {
        let pool = create_test_pool().await.expect("Failed to create test pool");

        let count = run_migrations(&pool).await.expect("Failed to run migrations");
        assert_eq!(count, MIGRATIONS.len());

        let count = run_migrations(&pool).await.expect("Failed to run migrations");
        assert_eq!(count, 0);
    }

    #[tokio::test]
    async fn test_is_up_to_date() {
        let pool = create_test_pool().await.expect("Failed to create test pool");

        assert!(!is_up_to_date(&pool).await.expect("Failed to check"));
        run_migrations(&pool).await.expect("Failed to run migrations");
        assert!(is_up_to_date(&pool).await.expect("Failed to check"));
    }

    #[tokio::test]
    async fn test_tag_names_are_unique_case_insensitively() {
        let pool = create_test_pool().await.expect("Failed to create test pool");
        run_migrations(&pool).await.expect("Failed to run migrations");

        sqlx::query("INSERT INTO tags (id, name) VALUES (?, ?)")
            .bind("t1")
            .bind("Rust")
            .execute(&pool)
            .await
            .expect("Failed to insert tag");

        let result = sqlx::query("INSERT INTO tags (id, name) VALUES (?, ?)")
            .bind("t2")
            .bind("rust")
            .execute(&pool)
            .await;

        assert!(result.is_err(), "case-variant duplicate should be rejected");
    }

    #[tokio::test]
    async fn test_article_delete_cascades_to_relationships() {
        let pool = create_test_pool().await.expect("Failed to create test pool");
        run_migrations(&pool).await.expect("Failed to run migrations");

        sqlx::query("INSERT INTO users (id, username, email, password_hash) VALUES ('u1', 'alice', 'a@example.com', 'h')")
            .execute(&pool)
            .await
            .expect("Failed to insert user");
        sqlx::query("INSERT INTO articles (id, slug, title, description, body, author_id) VALUES ('a1', 's', 't', 'd', 'b', 'u1')")
            .execute(&pool)
            .await
            .expect("Failed to insert article");
        sqlx::query("INSERT INTO tags (id, name) VALUES ('t1', 'rust')")
            .execute(&pool)
            .await
            .expect("Failed to insert tag");
        sqlx::query("INSERT INTO article_tags (article_id, tag_id) VALUES ('a1', 't1')")
            .execute(&pool)
            .await
            .expect("Failed to insert relationship");
        sqlx::query("INSERT INTO favorites (user_id, article_id) VALUES ('u1', 'a1')")
            .execute(&pool)
            .await
            .expect("Failed to insert favorite");

        sqlx::query("DELETE FROM articles WHERE id = 'a1'")
            .execute(&pool)
            .await
            .expect("Failed to delete article");

        let tags: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM article_tags")
            .fetch_one(&pool)
            .await
            .expect("Failed to count");
        let favorites: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM favorites")
            .fetch_one(&pool)
            .await
            .expect("Failed to count");

        assert_eq!(tags, 0);
        assert_eq!(favorites, 0);
    }

    #[tokio::test]
    async fn test_duplicate_favorite_pair_is_rejected() {
        let pool = create_test_pool().await.expect("Failed to create test pool");
        run_migrations(&pool).await.expect("Failed to run migrations");

        sqlx::query("INSERT INTO users (id, username, email, password_hash) VALUES ('u1', 'alice', 'a@example.com', 'h')")
            .execute(&pool)
            .await
            .expect("Failed to insert user");
        sqlx::query("INSERT INTO articles (id, slug, title, description, body, author_id) VALUES ('a1', 's', 't', 'd', 'b', 'u1')")
            .execute(&pool)
            .await
            .expect("Failed to insert article");

        sqlx::query("INSERT INTO favorites (user_id, article_id) VALUES ('u1', 'a1')")
            .execute(&pool)
            .await
            .expect("Failed to insert favorite");

        let result = sqlx::query("INSERT INTO favorites (user_id, article_id) VALUES ('u1', 'a1')")
            .execute(&pool)
            .await;

        assert!(result.is_err(), "duplicate pair should be rejected");
    }
}
