use std::sync::Arc;

use sqlx::SqlitePool;

use crate::assistant::engine::Assistant;
use crate::assistant::model::{ChatModel, HttpChatModel};
use crate::assistant::threads::DialogueThreads;
use crate::config::AppConfig;
use crate::db;

#[derive(Clone)]
pub struct AppState {
    pub db: SqlitePool,
    pub config: Arc<AppConfig>,
    pub model: Arc<dyn ChatModel>,
    pub threads: Arc<DialogueThreads>,
}

impl AppState {
    pub async fn init() -> anyhow::Result<Self> {
        let config = Arc::new(AppConfig::from_env()?);
        let pool = db::connect(&config.database_url).await?;
        let model = Arc::new(HttpChatModel::new(&config.assistant)?) as Arc<dyn ChatModel>;

        Ok(Self {
            db: pool,
            config,
            model,
            threads: Arc::new(DialogueThreads::default()),
        })
    }

    pub fn from_parts(db: SqlitePool, config: Arc<AppConfig>, model: Arc<dyn ChatModel>) -> Self {
        Self {
            db,
            config,
            model,
            threads: Arc::new(DialogueThreads::default()),
        }
    }

    /// One submission engine per request; the collaborators are shared.
    pub fn assistant(&self) -> Assistant {
        Assistant::new(
            self.model.clone(),
            self.threads.clone(),
            self.config.assistant.step_budget,
        )
    }

    pub fn fake() -> Self {
        use crate::assistant::model::{ChatMessage, ModelError};
        use crate::config::{AssistantConfig, SessionConfig};
        use async_trait::async_trait;

        struct EchoModel;

        #[async_trait]
        impl ChatModel for EchoModel {
            async fn send(
                &self,
                _thread_key: &str,
                messages: &[ChatMessage],
                _step_budget: u32,
            ) -> Result<String, ModelError> {
                Ok(messages
                    .last()
                    .map(|m| m.content.clone())
                    .unwrap_or_default())
            }
        }

        let pool = sqlx::sqlite::SqlitePoolOptions::new()
            .connect_lazy("sqlite::memory:")
            .expect("lazy pool ok");

        let config = Arc::new(AppConfig {
            database_url: "sqlite::memory:".into(),
            session: SessionConfig {
                secret: "test".into(),
                issuer: "test".into(),
                audience: "test".into(),
                ttl_seconds: 3600,
            },
            assistant: AssistantConfig {
                api_base: "http://fake.local".into(),
                api_key: "test".into(),
                model: "fake".into(),
                step_budget: 10,
                timeout_seconds: 5,
            },
        });

        Self::from_parts(pool, config, Arc::new(EchoModel) as Arc<dyn ChatModel>)
    }
}
