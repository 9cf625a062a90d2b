//! Postgres implementations of the core lookup and store traits.

use async_trait::async_trait;
use sqlx::PgPool;
use tiledash_core::draft::{DraftKey, DraftStore};
use tiledash_core::error::CoreError;
use tiledash_core::tile::{
    CatalogLookup, CategorySummary, ColorSwatch, NewTile, TileRecord, TileStore,
};
use tiledash_core::types::DbId;

use crate::repositories::{CategoryRepo, ColorRepo, DraftRepo, TileRepo};

fn persistence(op: &'static str) -> impl FnOnce(sqlx::Error) -> CoreError {
    move |e| {
        tracing::error!(op, error = %e, "Database operation failed");
        CoreError::Persistence(e.to_string())
    }
}

/// Pool-backed catalog: category/color lookups, tile storage and drafts.
#[derive(Clone)]
pub struct PgCatalog {
    pool: PgPool,
}

impl PgCatalog {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CatalogLookup for PgCatalog {
    async fn categories(&self, ids: &[DbId]) -> Result<Vec<CategorySummary>, CoreError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let rows = CategoryRepo::find_many(&self.pool, ids)
            .await
            .map_err(persistence("categories.find_many"))?;
        Ok(rows.into_iter().map(CategorySummary::from).collect())
    }

    async fn colors(&self, ids: &[DbId]) -> Result<Vec<ColorSwatch>, CoreError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let rows = ColorRepo::find_many(&self.pool, ids)
            .await
            .map_err(persistence("colors.find_many"))?;
        Ok(rows.into_iter().map(ColorSwatch::from).collect())
    }
}

#[async_trait]
impl TileStore for PgCatalog {
    async fn insert(&self, tile: &NewTile) -> Result<TileRecord, CoreError> {
        TileRepo::create(&self.pool, tile)
            .await
            .map_err(persistence("tiles.create"))?
            .try_into()
    }

    async fn find(&self, id: DbId) -> Result<Option<TileRecord>, CoreError> {
        TileRepo::find_by_id(&self.pool, id)
            .await
            .map_err(persistence("tiles.find_by_id"))?
            .map(TileRecord::try_from)
            .transpose()
    }

    async fn list(&self) -> Result<Vec<TileRecord>, CoreError> {
        TileRepo::list(&self.pool)
            .await
            .map_err(persistence("tiles.list"))?
            .into_iter()
            .map(TileRecord::try_from)
            .collect()
    }

    async fn replace(&self, tile: &TileRecord) -> Result<Option<TileRecord>, CoreError> {
        TileRepo::replace(&self.pool, tile)
            .await
            .map_err(persistence("tiles.replace"))?
            .map(TileRecord::try_from)
            .transpose()
    }

    async fn delete(&self, id: DbId) -> Result<bool, CoreError> {
        TileRepo::delete(&self.pool, id)
            .await
            .map_err(persistence("tiles.delete"))
    }
}

#[async_trait]
impl DraftStore for PgCatalog {
    async fn load(
        &self,
        owner: DbId,
        key: DraftKey,
    ) -> Result<Option<serde_json::Value>, CoreError> {
        let draft = DraftRepo::find(&self.pool, owner, key.kind.as_str(), &key.target_key())
            .await
            .map_err(persistence("drafts.find"))?;
        Ok(draft.map(|d| d.payload))
    }

    async fn save(
        &self,
        owner: DbId,
        key: DraftKey,
        payload: &serde_json::Value,
    ) -> Result<(), CoreError> {
        DraftRepo::upsert(
            &self.pool,
            owner,
            key.kind.as_str(),
            &key.target_key(),
            payload,
        )
        .await
        .map_err(persistence("drafts.upsert"))?;
        Ok(())
    }

    async fn discard(&self, owner: DbId, key: DraftKey) -> Result<bool, CoreError> {
        DraftRepo::delete(&self.pool, owner, key.kind.as_str(), &key.target_key())
            .await
            .map_err(persistence("drafts.delete"))
    }
}
