//! Persisted configuration document (LMDB via heed).
//!
//! The raw document is stored as JSON under a single key so that a restart, or another
//! process sharing the environment, reloads exactly what was saved.

use std::path::Path;

use heed::types::Str;
use heed::{Database, Env, EnvOpenOptions};
use tracing::info;

use crate::config::RawConfig;
use crate::error::{store_err, Result};
use crate::snapshot::ConfigurationSnapshot;

const CONFIG_DB: &str = "grievance_config";
const CONFIG_KEY: &str = "config";

/// Handle on the configuration environment.
#[derive(Clone)]
pub struct ConfigStore {
    env: Env,
    db: Database<Str, Str>,
}

impl ConfigStore {
    /// Open (creating if needed) the environment at `path`.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        std::fs::create_dir_all(path).map_err(store_err)?;
        // SAFETY: LMDB requires no other processes access this path concurrently during open.
        let env = unsafe {
            EnvOpenOptions::new()
                .map_size(16 << 20)
                .max_dbs(1)
                .open(path)
                .map_err(store_err)?
        };
        let mut tx = env.write_txn().map_err(store_err)?;
        let db = env.create_database(&mut tx, Some(CONFIG_DB)).map_err(store_err)?;
        tx.commit().map_err(store_err)?;
        Ok(ConfigStore { env, db })
    }

    /// Replace the stored document.
    pub fn save(&self, raw: &RawConfig) -> Result<()> {
        let doc = raw.to_json()?;
        let mut tx = self.env.write_txn().map_err(store_err)?;
        self.db.put(&mut tx, CONFIG_KEY, &doc).map_err(store_err)?;
        tx.commit().map_err(store_err)?;
        info!(bytes = doc.len(), "grievance configuration saved");
        Ok(())
    }

    /// The stored document, if one was saved.
    pub fn load(&self) -> Result<Option<RawConfig>> {
        let tx = self.env.read_txn().map_err(store_err)?;
        match self.db.get(&tx, CONFIG_KEY).map_err(store_err)? {
            Some(doc) => Ok(Some(RawConfig::from_json(doc)?)),
            None => Ok(None),
        }
    }

    /// The stored document, or the stock configuration when nothing was saved.
    pub fn load_or_default(&self) -> Result<RawConfig> {
        Ok(self.load()?.unwrap_or_else(|| {
            info!("no stored grievance configuration; using stock defaults");
            RawConfig::stock()
        }))
    }

    /// Resolve whatever [`load_or_default`](Self::load_or_default) returns.
    pub fn snapshot(&self) -> Result<ConfigurationSnapshot> {
        Ok(ConfigurationSnapshot::load(&self.load_or_default()?))
    }

    /// Remove the stored document.
    pub fn clear(&self) -> Result<()> {
        let mut tx = self.env.write_txn().map_err(store_err)?;
        self.db.clear(&mut tx).map_err(store_err)?;
        tx.commit().map_err(store_err)
    }
}
