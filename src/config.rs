#[derive(Debug, Clone)]
pub struct SessionConfig {
    pub secret: String,
    pub issuer: String,
    pub audience: String,
    pub ttl_seconds: i64,
}

#[derive(Debug, Clone)]
pub struct AssistantConfig {
    pub api_base: String,
    pub api_key: String,
    pub model: String,
    pub step_budget: u32,
    pub timeout_seconds: u64,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub session: SessionConfig,
    pub assistant: AssistantConfig,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url =
            std::env::var("DATABASE_URL").unwrap_or_else(|_| "sqlite:taskmind.db".into());

        let session = SessionConfig {
            secret: std::env::var("SESSION_SECRET")?,
            issuer: std::env::var("SESSION_ISSUER").unwrap_or_else(|_| "taskmind".into()),
            audience: std::env::var("SESSION_AUDIENCE").unwrap_or_else(|_| "taskmind-web".into()),
            ttl_seconds: std::env::var("SESSION_TTL_SECONDS")
                .ok()
                .and_then(|v| v.parse::<i64>().ok())
                .unwrap_or(3600),
        };

        let assistant = AssistantConfig {
            api_base: std::env::var("ASSISTANT_API_BASE")
                .unwrap_or_else(|_| "https://api.openai.com/v1".into()),
            api_key: std::env::var("ASSISTANT_API_KEY").unwrap_or_default(),
            model: std::env::var("ASSISTANT_MODEL").unwrap_or_else(|_| "gpt-4o".into()),
            step_budget: std::env::var("ASSISTANT_STEP_BUDGET")
                .ok()
                .and_then(|v| v.parse::<u32>().ok())
                .unwrap_or(10),
            timeout_seconds: std::env::var("ASSISTANT_TIMEOUT_SECONDS")
                .ok()
                .and_then(|v| v.parse::<u64>().ok())
                .unwrap_or(30),
        };

        Ok(Self {
            database_url,
            session,
            assistant,
        })
    }
}
