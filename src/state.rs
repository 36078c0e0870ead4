use std::sync::{Arc, Mutex};

use anyhow::Context;
use rusqlite::Connection;

use crate::api::ApiClient;
use crate::config::AppConfig;
use crate::db::{self, queries};
use crate::models::User;
use crate::services::payment::PollSettings;

pub struct AppState {
    pub db: Arc<Mutex<Connection>>,
    pub config: AppConfig,
    pub api: Arc<ApiClient>,
}

impl AppState {
    /// Opens the session store and builds an API client carrying the
    /// injected user's token, or the stored one.
    pub fn init(config: AppConfig, injected: Option<&User>) -> anyhow::Result<Self> {
        let conn = db::init_db(&config.session_db)?;
        let token = queries::resolve_token(&conn, injected)?;
        if token.is_none() {
            tracing::debug!("no session token, calling the API anonymously");
        }

        let api = ApiClient::new(&config.api_base_url, config.request_timeout())
            .context("failed to build HTTP client")?
            .with_token(token);

        Ok(Self {
            db: Arc::new(Mutex::new(conn)),
            config,
            api: Arc::new(api),
        })
    }

    pub fn poll_settings(&self) -> PollSettings {
        PollSettings::from(&self.config)
    }
}
