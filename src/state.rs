use std::sync::Arc;

use tera::Tera;

use crate::catalog::Catalog;
use crate::db::RegistrationStore;
use crate::register;

/// Shared per-process state. The catalog is immutable after load, so it is
/// safe to share by read-only reference across concurrent requests; the
/// store serializes its own writers.
pub struct AppState {
    pub catalog: Catalog,
    pub store: RegistrationStore,
    pub templates: Tera,
    pub public_base: Option<String>,
    pub host: String,
    pub port: u16,
}

impl AppState {
    pub fn new(
        catalog: Catalog,
        store: RegistrationStore,
        host: String,
        port: u16,
    ) -> anyhow::Result<Arc<Self>> {
        let templates = register::templates()?;
        let public_base = std::env::var("PUBLIC_URL")
            .ok()
            .filter(|v| !v.trim().is_empty());
        Ok(Arc::new(Self {
            catalog,
            store,
            templates,
            public_base,
            host,
            port,
        }))
    }
}
