use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    pub secret: String,
    pub issuer: String,
    pub audience: String,
    pub ttl_minutes: i64,
    pub refresh_ttl_minutes: i64,
}

/// Styling for the dashboard bar chart, handed to the renderer on every call.
#[derive(Debug, Clone, Deserialize)]
pub struct ChartConfig {
    pub width: u32,
    pub height: u32,
    pub background: [u8; 3],
    pub target_color: [u8; 3],
    pub achieved_color: [u8; 3],
    pub axis_color: [u8; 3],
    /// Fraction of a category slot covered by its two bars.
    pub bar_ratio: f32,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            width: 640,
            height: 480,
            background: [255, 255, 255],
            target_color: [128, 128, 128],
            achieved_color: [31, 119, 180],
            axis_color: [40, 40, 40],
            bar_ratio: 0.7,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub database_url: String,
    pub jwt: JwtConfig,
    pub chart: ChartConfig,
    pub seed_categories: Vec<String>,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = std::env::var("DATABASE_URL")?;
        let jwt = JwtConfig {
            secret: std::env::var("JWT_SECRET")?,
            issuer: std::env::var("JWT_ISSUER").unwrap_or_else(|_| "study-tracker".into()),
            audience: std::env::var("JWT_AUDIENCE")
                .unwrap_or_else(|_| "study-tracker-users".into()),
            ttl_minutes: env_parse("JWT_TTL_MINUTES").unwrap_or(60),
            refresh_ttl_minutes: env_parse("JWT_REFRESH_TTL_MINUTES").unwrap_or(60 * 24 * 14),
        };

        let defaults = ChartConfig::default();
        let chart = ChartConfig {
            width: env_parse("CHART_WIDTH").unwrap_or(defaults.width).max(64),
            height: env_parse("CHART_HEIGHT").unwrap_or(defaults.height).max(64),
            ..defaults
        };

        let seed_categories = std::env::var("STUDY_CATEGORIES")
            .map(|v| parse_category_list(&v))
            .unwrap_or_default();

        Ok(Self {
            database_url,
            jwt,
            chart,
            seed_categories,
        })
    }
}

fn env_parse<T: std::str::FromStr>(key: &str) -> Option<T> {
    std::env::var(key).ok().and_then(|v| v.parse::<T>().ok())
}

fn parse_category_list(raw: &str) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for name in raw.split(',').map(str::trim).filter(|s| !s.is_empty()) {
        if !out.iter().any(|n| n == name) {
            out.push(name.to_string());
        }
    }
    out
}
