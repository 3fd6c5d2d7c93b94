//! # seed
//!
//! Operations tool for Quarterdeck:
//!
//! ```text
//! seed                 # insert the six standard forum categories (skips existing)
//! seed --recount       # recompute every category's counters from topics/posts
//! seed --admin-token   # mint a short-lived admin JWT for local testing
//! ```
//!
//! Database commands read `DATABASE_URL`; `--admin-token` reads
//! `QUARTERDECK__AUTH__JWT_SECRET`, the same variable the server uses.

use anyhow::{bail, Context};
use chrono::{Duration, Utc};
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use uuid::Uuid;

use auth_adapters::JwtIdentityProvider;
use domains::{Actor, Role};

/// The platform's standard categories, as shipped on the forum landing page.
const CATEGORIES: [(&str, &str, &str, &str); 6] = [
    (
        "Navigation & Equipment",
        "Discuss navigation tools and equipment issues",
        "Compass",
        "blue",
    ),
    (
        "Regulations & Compliance",
        "Discuss maritime laws and regulatory compliance",
        "FileText",
        "green",
    ),
    (
        "Safety & Wellbeing",
        "Discuss health issues and wellbeing at sea",
        "Shield",
        "red",
    ),
    (
        "Career Development",
        "Career advice and professional development for maritime professionals",
        "Anchor",
        "purple",
    ),
    (
        "Technology & Innovation",
        "Discuss emerging technologies in the maritime industry",
        "Ship",
        "cyan",
    ),
    (
        "General Discussion",
        "General maritime topics and community discussions",
        "MessageCircle",
        "orange",
    ),
];

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    match args.first().map(String::as_str) {
        None => seed_categories(&connect().await?).await,
        Some("--recount") => recount(&connect().await?).await,
        Some("--admin-token") => admin_token(),
        Some(other) => bail!("unknown argument {other}; expected --recount or --admin-token"),
    }
}

async fn connect() -> anyhow::Result<PgPool> {
    let url = std::env::var("DATABASE_URL").context("DATABASE_URL must be set")?;
    let pool = PgPoolOptions::new()
        .max_connections(2)
        .connect(&url)
        .await
        .context("failed to connect to PostgreSQL")?;
    sqlx::migrate!("../../crates/storage-adapters/migrations")
        .run(&pool)
        .await
        .context("failed to run migrations")?;
    Ok(pool)
}

async fn seed_categories(pool: &PgPool) -> anyhow::Result<()> {
    let now = Utc::now();
    let mut inserted = 0u64;

    for (name, description, icon, color) in CATEGORIES {
        let result = sqlx::query(
            "INSERT INTO forum_categories \
             (id, name, description, icon, color, topics_count, posts_count, created_at, updated_at) \
             SELECT $1, $2, $3, $4, $5, 0, 0, $6, $6 \
             WHERE NOT EXISTS (SELECT 1 FROM forum_categories WHERE name = $2)",
        )
        .bind(Uuid::now_v7())
        .bind(name)
        .bind(description)
        .bind(icon)
        .bind(color)
        .bind(now)
        .execute(pool)
        .await
        .with_context(|| format!("failed to seed category {name}"))?;
        inserted += result.rows_affected();
    }

    println!(
        "seeded {inserted} categories ({} already present)",
        CATEGORIES.len() as u64 - inserted
    );
    Ok(())
}

/// One statement recomputes both counters for every category from the
/// source-of-truth collections; safe to run at any time.
async fn recount(pool: &PgPool) -> anyhow::Result<()> {
    let result = sqlx::query(
        "UPDATE forum_categories c SET \
           topics_count = (SELECT COUNT(*) FROM forum_topics t WHERE t.category_id = c.id), \
           posts_count  = (SELECT COUNT(*) FROM forum_posts p \
                           JOIN forum_topics t ON p.topic_id = t.id \
                           WHERE t.category_id = c.id), \
           updated_at = $1",
    )
    .bind(Utc::now())
    .execute(pool)
    .await
    .context("recount failed")?;

    println!("recounted {} categories", result.rows_affected());
    Ok(())
}

fn admin_token() -> anyhow::Result<()> {
    let secret = std::env::var("QUARTERDECK__AUTH__JWT_SECRET")
        .context("QUARTERDECK__AUTH__JWT_SECRET must be set")?;
    let provider = JwtIdentityProvider::new(&secret);
    let admin = Actor::new(Uuid::new_v4(), Role::Admin).with_name("Local Admin".to_string());
    let token = provider
        .issue(&admin, Duration::hours(12))
        .context("failed to mint token")?;
    println!("{token}");
    Ok(())
}
