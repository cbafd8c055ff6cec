use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Banner {
    pub id: Uuid,
    /// Message content; may contain markup, sanitization is the
    /// presentation layer's concern.
    pub message: String,
    /// URL path prefix the banner is shown on. NULL means every path.
    pub url_path: Option<String>,
    pub category: String,
    pub start_datetime: DateTime<Utc>,
    /// NULL means no expiry.
    pub end_datetime: Option<DateTime<Utc>>,
    pub active: bool,
    pub created: DateTime<Utc>,
    pub updated: DateTime<Utc>,
}

impl Banner {
    /// Raw textual prefix match: `/records` matches `/records/123` but also
    /// `/recordsXYZ`. Intentional legacy behavior, short prefixes get
    /// site-wide reach.
    pub fn matches_path(&self, path: &str) -> bool {
        match self.url_path.as_deref() {
            Some(prefix) => path.starts_with(prefix),
            None => true,
        }
    }

    pub fn style_class(&self) -> &'static str {
        style_class(&self.category)
    }
}

/// Bootstrap CSS classes per banner category, consumed verbatim by the
/// presentation layer.
pub fn style_class(category: &str) -> &'static str {
    match category {
        "warning" => "alert alert-warning",
        "other" => "alert alert-secondary",
        _ => "alert alert-primary",
    }
}

/// Serialized banner plus the derived style token.
#[derive(Debug, Serialize)]
pub struct BannerView<'a> {
    #[serde(flatten)]
    pub banner: &'a Banner,
    pub style: &'static str,
}

impl<'a> From<&'a Banner> for BannerView<'a> {
    fn from(banner: &'a Banner) -> Self {
        Self {
            banner,
            style: banner.style_class(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct CreateBannerRequest {
    pub message: Option<String>,
    pub url_path: Option<String>,
    pub category: Option<String>,
    /// Defaults to "now" when omitted.
    pub start_datetime: Option<DateTime<Utc>>,
    pub end_datetime: Option<DateTime<Utc>>,
    /// Defaults to true when omitted.
    pub active: Option<bool>,
}

/// Partial update: only supplied fields change.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateBannerRequest {
    pub message: Option<String>,
    pub url_path: Option<String>,
    pub category: Option<String>,
    pub start_datetime: Option<DateTime<Utc>>,
    pub end_datetime: Option<DateTime<Utc>>,
    pub active: Option<bool>,
}
