use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use nework_client::Nework;
use nework_core::ClientConfig;
use nework_kv::RedbStore;

use crate::output::Output;

/// Everything a command needs: the wired client core and the output mode.
pub struct Session {
    pub app: Nework,
    pub out: Output,
}

impl Session {
    pub fn open(config_path: &Path, out: Output) -> Result<Self> {
        let config = ClientConfig::load(config_path)
            .with_context(|| format!("load {}", config_path.display()))?
            .with_env_overrides();
        if config.api_key.is_empty() {
            tracing::warn!("no api key configured, run `nework config set --api-key <key>`");
        }

        let db = config.resolve_db_path();
        let kv = RedbStore::open(&db).with_context(|| format!("open session store {}", db.display()))?;
        let app = Nework::new(&config, Arc::new(kv))?;
        Ok(Self { app, out })
    }

    /// Fail early for commands the backend only serves to signed-in users.
    pub fn require_auth(&self) -> Result<i64> {
        let state = self.app.auth().state();
        if !state.is_authenticated() {
            anyhow::bail!("Not signed in. Run `nework login`.");
        }
        Ok(state.id)
    }
}
