use std::sync::Arc;

use tracing::{info, warn};

use crate::auth::{jwt::JwtKeys, repo::PgUserRepo, repo::UserRepo};
use crate::config::AppConfig;
use crate::dashboard::repo::{MetricsRepo, PgMetricsRepo};
use crate::db;
use crate::templates::{
    repo::{PgTemplateRepo, TemplateRepo},
    suggestions::{HuggingFaceGenerator, TextGenerator},
};

/// Everything a handler may touch. Built once at startup and read-only after.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub keys: JwtKeys,
    pub users: Arc<dyn UserRepo>,
    pub templates: Arc<dyn TemplateRepo>,
    pub metrics: Arc<dyn MetricsRepo>,
    pub generator: Arc<dyn TextGenerator>,
}

impl AppState {
    /// Fails when configuration is incomplete or the database is unreachable.
    pub async fn init() -> anyhow::Result<Self> {
        let config = Arc::new(AppConfig::from_env()?);
        let db = db::connect(&config).await?;
        info!("connected to database");

        if config.generator.api_token.is_none() {
            warn!("HF_API_TOKEN not set; template suggestions will be sent unauthenticated");
        }
        let generator = Arc::new(HuggingFaceGenerator::new(&config.generator)?);

        Ok(Self::from_parts(
            config,
            Arc::new(PgUserRepo::new(db.clone())),
            Arc::new(PgTemplateRepo::new(db.clone())),
            Arc::new(PgMetricsRepo::new(db)),
            generator,
        ))
    }

    pub fn from_parts(
        config: Arc<AppConfig>,
        users: Arc<dyn UserRepo>,
        templates: Arc<dyn TemplateRepo>,
        metrics: Arc<dyn MetricsRepo>,
        generator: Arc<dyn TextGenerator>,
    ) -> Self {
        Self {
            keys: JwtKeys::new(&config.jwt),
            config,
            users,
            templates,
            metrics,
            generator,
        }
    }
}
