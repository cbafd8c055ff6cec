use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::config::BannerConfig;
use crate::models::auth::Actor;
use crate::models::banner::{Banner, CreateBannerRequest, UpdateBannerRequest};
use crate::services::error::BannerError;
use crate::services::policy::{self, Action};
use crate::services::search::{self, BannerPage, SearchBind, SearchParams};
use crate::services::sweeper::SweeperService;

/// The only entry point external callers use: every operation checks the
/// capability policy first, then talks to the store.
pub struct BannerService;

impl BannerService {
    pub async fn create(
        pool: &SqlitePool,
        cfg: &BannerConfig,
        actor: &Actor,
        req: CreateBannerRequest,
    ) -> Result<Banner, BannerError> {
        policy::check(actor, Action::Create)?;

        let mut errors = Vec::new();

        let message = req.message.filter(|m| !m.trim().is_empty());
        if message.is_none() {
            errors.push("message: required and must not be empty".to_string());
        }

        let category = req.category.filter(|c| !c.is_empty());
        match &category {
            Some(c) if !cfg.is_valid_category(c) => {
                errors.push(format!("category: '{c}' is not a configured category"));
            }
            None => errors.push("category: required".to_string()),
            _ => {}
        }

        let url_path = req.url_path.filter(|p| !p.is_empty());
        if let Some(p) = &url_path {
            if !p.starts_with('/') {
                errors.push(format!("url_path: '{p}' must start with '/'"));
            }
        }

        if !errors.is_empty() {
            return Err(BannerError::Validation(errors));
        }
        let (Some(message), Some(category)) = (message, category) else {
            return Err(BannerError::Validation(vec!["invalid input".to_string()]));
        };

        // end_datetime < start_datetime is deliberately allowed (legacy
        // behavior); such a banner is simply never active.
        let now = Utc::now();
        let banner = sqlx::query_as::<_, Banner>(
            "INSERT INTO banners
                (id, message, url_path, category, start_datetime, end_datetime, active, created, updated)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
             RETURNING *",
        )
        .bind(Uuid::new_v4())
        .bind(message)
        .bind(url_path)
        .bind(category)
        .bind(req.start_datetime.unwrap_or(now))
        .bind(req.end_datetime)
        .bind(req.active.unwrap_or(true))
        .bind(now)
        .bind(now)
        .fetch_one(pool)
        .await?;

        // Consistency-maintenance side effect; a failure here aborts the
        // whole request.
        SweeperService::disable_expired(pool, Utc::now()).await?;

        Ok(banner)
    }

    pub async fn read(pool: &SqlitePool, actor: &Actor, id: Uuid) -> Result<Banner, BannerError> {
        policy::check(actor, Action::Read)?;
        Self::fetch(pool, id).await
    }

    pub async fn update(
        pool: &SqlitePool,
        cfg: &BannerConfig,
        actor: &Actor,
        id: Uuid,
        req: UpdateBannerRequest,
    ) -> Result<Banner, BannerError> {
        policy::check(actor, Action::Update)?;

        // Existence check first so a missing id reports NotFound instead of
        // a silent no-op.
        Self::fetch(pool, id).await?;

        let mut errors = Vec::new();
        if let Some(m) = &req.message {
            if m.trim().is_empty() {
                errors.push("message: must not be empty".to_string());
            }
        }
        if let Some(c) = &req.category {
            if !cfg.is_valid_category(c) {
                errors.push(format!("category: '{c}' is not a configured category"));
            }
        }
        let url_path = req.url_path.filter(|p| !p.is_empty());
        if let Some(p) = &url_path {
            if !p.starts_with('/') {
                errors.push(format!("url_path: '{p}' must start with '/'"));
            }
        }
        if !errors.is_empty() {
            return Err(BannerError::Validation(errors));
        }

        let banner = sqlx::query_as::<_, Banner>(
            "UPDATE banners SET
                message = COALESCE(?, message),
                url_path = COALESCE(?, url_path),
                category = COALESCE(?, category),
                start_datetime = COALESCE(?, start_datetime),
                end_datetime = COALESCE(?, end_datetime),
                active = COALESCE(?, active),
                updated = ?
             WHERE id = ?
             RETURNING *",
        )
        .bind(req.message)
        .bind(url_path)
        .bind(req.category)
        .bind(req.start_datetime)
        .bind(req.end_datetime)
        .bind(req.active)
        .bind(Utc::now())
        .bind(id)
        .fetch_one(pool)
        .await?;

        SweeperService::disable_expired(pool, Utc::now()).await?;

        Ok(banner)
    }

    pub async fn delete(pool: &SqlitePool, actor: &Actor, id: Uuid) -> Result<(), BannerError> {
        policy::check(actor, Action::Delete)?;

        let result = sqlx::query("DELETE FROM banners WHERE id = ?")
            .bind(id)
            .execute(pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(BannerError::NotFound { id });
        }
        Ok(())
    }

    pub async fn search(
        pool: &SqlitePool,
        cfg: &BannerConfig,
        actor: &Actor,
        params: &SearchParams,
    ) -> Result<BannerPage, BannerError> {
        policy::check(actor, Action::Search)?;

        let query = search::build_query(cfg, params)?;

        let sql = format!(
            "SELECT * FROM banners {} {} LIMIT ? OFFSET ?",
            query.where_sql, query.order_sql
        );
        let mut rows = sqlx::query_as::<_, Banner>(&sql);
        for bind in &query.binds {
            rows = match bind {
                SearchBind::Text(s) => rows.bind(s.clone()),
                SearchBind::Bool(v) => rows.bind(*v),
            };
        }
        let items = rows
            .bind(query.size)
            .bind(query.offset)
            .fetch_all(pool)
            .await?;

        let count_sql = format!("SELECT COUNT(*) FROM banners {}", query.where_sql);
        let mut count = sqlx::query_scalar::<_, i64>(&count_sql);
        for bind in &query.binds {
            count = match bind {
                SearchBind::Text(s) => count.bind(s.clone()),
                SearchBind::Bool(v) => count.bind(*v),
            };
        }
        let total = count.fetch_one(pool).await?;

        Ok(BannerPage {
            items,
            total,
            page: query.page,
            size: query.size,
        })
    }

    pub async fn disable_expired(pool: &SqlitePool, actor: &Actor) -> Result<u64, BannerError> {
        policy::check(actor, Action::Disable)?;
        SweeperService::disable_expired(pool, Utc::now()).await
    }

    /// All banners currently active for the given request path, in creation
    /// order. Pure read, no capability required: this feeds the public page
    /// render.
    pub async fn resolve_active(
        pool: &SqlitePool,
        path: &str,
        now: DateTime<Utc>,
    ) -> Result<Vec<Banner>, BannerError> {
        // An empty path is the site root
        let path = if path.is_empty() { "/" } else { path };

        let rows = sqlx::query_as::<_, Banner>(
            "SELECT * FROM banners
             WHERE active = 1
               AND start_datetime <= ?
               AND (end_datetime IS NULL OR ? <= end_datetime)
             ORDER BY rowid",
        )
        .bind(now)
        .bind(now)
        .fetch_all(pool)
        .await?;

        Ok(rows.into_iter().filter(|b| b.matches_path(path)).collect())
    }

    /// Legacy single-slot variant: the first active banner for the path in
    /// creation order, if any.
    pub async fn first_active(
        pool: &SqlitePool,
        path: &str,
        now: DateTime<Utc>,
    ) -> Result<Option<Banner>, BannerError> {
        let banners = Self::resolve_active(pool, path, now).await?;
        Ok(banners.into_iter().next())
    }

    async fn fetch(pool: &SqlitePool, id: Uuid) -> Result<Banner, BannerError> {
        sqlx::query_as::<_, Banner>("SELECT * FROM banners WHERE id = ?")
            .bind(id)
            .fetch_optional(pool)
            .await?
            .ok_or(BannerError::NotFound { id })
    }
}
