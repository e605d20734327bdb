use anyhow::Context;
use axum::http::HeaderValue;
use serde::Deserialize;

pub const DEFAULT_GENERATOR_URL: &str = "https://api-inference.huggingface.co/models/gpt2";

#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    pub secret: String,
    pub issuer: String,
    pub audience: String,
    pub ttl_minutes: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GeneratorConfig {
    pub api_url: String,
    pub api_token: Option<String>,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub db_max_connections: u32,
    pub jwt: JwtConfig,
    pub allowed_origin: Option<HeaderValue>,
    pub generator: GeneratorConfig,
    pub host: String,
    pub port: u16,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = std::env::var("DATABASE_URL").context("DATABASE_URL must be set")?;

        let secret = std::env::var("JWT_SECRET").context("JWT_SECRET must be set")?;
        anyhow::ensure!(!secret.trim().is_empty(), "JWT_SECRET must not be empty");

        let jwt = JwtConfig {
            secret,
            issuer: std::env::var("JWT_ISSUER").unwrap_or_else(|_| "aibuilder".into()),
            audience: std::env::var("JWT_AUDIENCE").unwrap_or_else(|_| "aibuilder-users".into()),
            ttl_minutes: std::env::var("JWT_TTL_MINUTES")
                .ok()
                .and_then(|v| v.parse::<i64>().ok())
                .unwrap_or(60),
        };

        let generator = GeneratorConfig {
            api_url: std::env::var("HF_API_URL").unwrap_or_else(|_| DEFAULT_GENERATOR_URL.into()),
            api_token: std::env::var("HF_API_TOKEN").ok().filter(|t| !t.is_empty()),
        };

        let port = std::env::var("APP_PORT")
            .or_else(|_| std::env::var("PORT"))
            .unwrap_or_else(|_| "5000".into())
            .parse::<u16>()
            .context("APP_PORT must be a valid port number")?;

        Ok(Self {
            database_url,
            db_max_connections: std::env::var("DB_MAX_CONNECTIONS")
                .ok()
                .and_then(|v| v.parse::<u32>().ok())
                .unwrap_or(10),
            jwt,
            allowed_origin: allowed_origin()?,
            generator,
            host: std::env::var("APP_HOST").unwrap_or_else(|_| "0.0.0.0".into()),
            port,
        })
    }
}

/// `ALLOWED_ORIGIN`, if set, must be a usable `http(s)://` origin.
fn allowed_origin() -> anyhow::Result<Option<HeaderValue>> {
    let Some(origin) = std::env::var("ALLOWED_ORIGIN")
        .ok()
        .map(|o| o.trim().to_string())
        .filter(|o| !o.is_empty())
    else {
        return Ok(None);
    };
    anyhow::ensure!(
        origin.starts_with("http://") || origin.starts_with("https://"),
        "ALLOWED_ORIGIN must start with http:// or https://, got {origin:?}"
    );
    let value = HeaderValue::from_str(&origin)
        .with_context(|| format!("ALLOWED_ORIGIN is not a valid header value: {origin:?}"))?;
    Ok(Some(value))
}
