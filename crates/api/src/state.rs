use std::sync::Arc;

use tiledash_core::assets::ObjectStore;
use tiledash_core::tile::workflow::TileWorkflow;
use tiledash_db::catalog::PgCatalog;
use tiledash_mail::Mailer;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Cheaply cloneable: every field is an `Arc` or a pool handle.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: tiledash_db::DbPool,
    pub config: Arc<ServerConfig>,
    /// Postgres-backed catalog lookups, tile storage and drafts.
    pub catalog: PgCatalog,
    /// Where uploaded masks are stored.
    pub objects: Arc<dyn ObjectStore>,
    pub mailer: Arc<dyn Mailer>,
}

impl AppState {
    pub fn new(
        pool: tiledash_db::DbPool,
        config: ServerConfig,
        objects: Arc<dyn ObjectStore>,
        mailer: Arc<dyn Mailer>,
    ) -> Self {
        Self {
            catalog: PgCatalog::new(pool.clone()),
            pool,
            config: Arc::new(config),
            objects,
            mailer,
        }
    }

    /// Tile workflow bound to this state's stores.
    pub fn tiles(&self) -> TileWorkflow<'_> {
        TileWorkflow::new(
            &self.catalog,
            &self.catalog,
            Arc::clone(&self.objects),
            self.config.max_upload_bytes,
        )
    }
}
