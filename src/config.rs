use std::env;

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub host: String,
    pub port: u16,
    pub jwt_secret: String,
    pub banners: BannerConfig,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        Ok(Self {
            database_url: env::var("DATABASE_URL")
                .unwrap_or_else(|_| "sqlite://banners.db?mode=rwc".into()),
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".into())
                .parse()?,
            jwt_secret: required("JWT_SECRET")?,
            banners: BannerConfig::from_env(),
        })
    }
}

fn required(key: &str) -> anyhow::Result<String> {
    env::var(key).map_err(|_| anyhow::anyhow!("Missing required env var: {}", key))
}

/// A banner category: stable id plus the label shown in the admin UI.
#[derive(Debug, Clone)]
pub struct Category {
    pub id: String,
    pub label: String,
}

/// Banner-specific settings, passed explicitly into validation and the
/// search query builder instead of being read as ambient globals.
#[derive(Debug, Clone)]
pub struct BannerConfig {
    pub categories: Vec<Category>,
    pub sort_fields: Vec<String>,
    pub default_sort: String,
    pub default_sort_direction: String,
    pub default_page_size: i64,
    pub max_page_size: i64,
}

impl Default for BannerConfig {
    fn default() -> Self {
        Self {
            categories: parse_categories("info:Info,warning:Warning,other:Other"),
            sort_fields: [
                "start_datetime",
                "end_datetime",
                "active",
                "category",
                "url_path",
                "created",
                "updated",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
            default_sort: "start_datetime".into(),
            default_sort_direction: "asc".into(),
            default_page_size: 25,
            max_page_size: 100,
        }
    }
}

impl BannerConfig {
    pub fn from_env() -> Self {
        let mut cfg = Self::default();
        if let Ok(raw) = env::var("BANNER_CATEGORIES") {
            let categories = parse_categories(&raw);
            if !categories.is_empty() {
                cfg.categories = categories;
            }
        }
        if let Some(max) = env::var("BANNER_MAX_PAGE_SIZE")
            .ok()
            .and_then(|v| v.parse::<i64>().ok())
        {
            // never below the minimum page size
            cfg.max_page_size = max.max(1);
        }
        cfg
    }

    pub fn is_valid_category(&self, id: &str) -> bool {
        self.categories.iter().any(|c| c.id == id)
    }
}

/// Parse `"id:Label,id:Label"` into categories. Entries without an explicit
/// label reuse the id as label.
pub(crate) fn parse_categories(raw: &str) -> Vec<Category> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|entry| match entry.split_once(':') {
            Some((id, label)) => Category {
                id: id.trim().to_string(),
                label: label.trim().to_string(),
            },
            None => Category {
                id: entry.to_string(),
                label: entry.to_string(),
            },
        })
        .collect()
}
