//! In-memory implementations of the tile seams for unit tests.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicI64, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use crate::assets::{AssetRef, IncomingFile, ObjectStore, StorageError};
use crate::error::CoreError;
use crate::types::DbId;

use super::{
    CatalogLookup, CategorySummary, ColorSwatch, GroutShape, NewTile, ShapeStyle, SubMask,
    TileRecord, TileStore,
};

pub const PNG: &[u8] = &[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A, 0, 0, 0, 0];

pub fn asset(tag: &str) -> AssetRef {
    AssetRef {
        url: format!("https://cdn.test/{tag}"),
        deletion_handle: tag.to_string(),
    }
}

pub fn png(name: &str) -> IncomingFile {
    IncomingFile::new(name, PNG)
}

/// A persisted-looking record with `subs` sub-masks (`sub-0`, `sub-1`, ...)
/// colored 10, 11, ... and an optional border colored 9.
pub fn sample_record(subs: usize, border: bool) -> TileRecord {
    let now = Utc::now();
    TileRecord {
        id: 1,
        name: "Sample".into(),
        category_id: 1,
        main_mask: asset("main"),
        background_color_id: None,
        grout_shape: GroutShape::Square,
        shape_style: ShapeStyle::Square,
        scale: 1.0,
        sub_masks: (0..subs)
            .map(|i| SubMask {
                id: Uuid::new_v4(),
                mask: asset(&format!("sub-{i}")),
                color_id: 10 + i as DbId,
            })
            .collect(),
        border_mask: border.then(|| asset("border")),
        border_color_id: border.then_some(9),
        created_at: now,
        updated_at: now,
    }
}

// ---------------------------------------------------------------------------
// Object store
// ---------------------------------------------------------------------------

#[derive(Default)]
pub struct MemoryObjectStore {
    objects: Mutex<HashMap<String, Vec<u8>>>,
    stored: Mutex<Vec<String>>,
    deleted: Mutex<Vec<String>>,
    fail_after: Mutex<Option<usize>>,
    fail_deletes: AtomicBool,
    slow: Mutex<Option<(String, Duration)>>,
}

impl MemoryObjectStore {
    /// Let `n` more uploads succeed, then fail every following one.
    pub fn fail_uploads_after(&self, n: usize) {
        *self.fail_after.lock().unwrap() = Some(n);
    }

    pub fn fail_deletes(&self) {
        self.fail_deletes.store(true, Ordering::SeqCst);
    }

    pub fn stored(&self) -> Vec<String> {
        self.stored.lock().unwrap().clone()
    }

    pub fn deleted(&self) -> Vec<String> {
        self.deleted.lock().unwrap().clone()
    }

    /// Objects still present in the store.
    pub fn live(&self) -> usize {
        self.objects.lock().unwrap().len()
    }

    /// Hold every upload whose key contains `pattern` for `delay`.
    pub fn delay_uploads(&self, pattern: &str, delay: Duration) {
        *self.slow.lock().unwrap() = Some((pattern.to_string(), delay));
    }
}

#[async_trait]
impl ObjectStore for MemoryObjectStore {
    async fn store(
        &self,
        key: &str,
        bytes: Vec<u8>,
        _content_type: &str,
    ) -> Result<AssetRef, StorageError> {
        let delay = self
            .slow
            .lock()
            .unwrap()
            .as_ref()
            .filter(|(pattern, _)| key.contains(pattern.as_str()))
            .map(|(_, delay)| *delay);
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        {
            let mut fail_after = self.fail_after.lock().unwrap();
            if let Some(remaining) = fail_after.as_mut() {
                if *remaining == 0 {
                    return Err(StorageError::Backend("simulated outage".into()));
                }
                *remaining -= 1;
            }
        }
        self.objects.lock().unwrap().insert(key.to_string(), bytes);
        self.stored.lock().unwrap().push(key.to_string());
        Ok(AssetRef {
            url: format!("https://cdn.test/{key}"),
            deletion_handle: key.to_string(),
        })
    }

    async fn delete(&self, handle: &str) -> Result<(), StorageError> {
        if self.fail_deletes.load(Ordering::SeqCst) {
            return Err(StorageError::Backend("simulated delete failure".into()));
        }
        self.objects.lock().unwrap().remove(handle);
        self.deleted.lock().unwrap().push(handle.to_string());
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Catalog + tile store
// ---------------------------------------------------------------------------

#[derive(Default)]
pub struct MemoryCatalog {
    categories: Mutex<HashMap<DbId, CategorySummary>>,
    colors: Mutex<HashMap<DbId, ColorSwatch>>,
    tiles: Mutex<HashMap<DbId, TileRecord>>,
    next_id: AtomicI64,
    fail_writes: AtomicBool,
}

impl MemoryCatalog {
    pub fn with_category(self, id: DbId, name: &str) -> Self {
        self.categories.lock().unwrap().insert(
            id,
            CategorySummary {
                id,
                name: name.into(),
                is_border_category: false,
            },
        );
        self
    }

    pub fn with_color(self, id: DbId, hex: &str) -> Self {
        self.colors.lock().unwrap().insert(
            id,
            ColorSwatch {
                id,
                hex_code: hex.into(),
                no_background: false,
            },
        );
        self
    }

    pub fn remove_color(&self, id: DbId) {
        self.colors.lock().unwrap().remove(&id);
    }

    pub fn remove_category(&self, id: DbId) {
        self.categories.lock().unwrap().remove(&id);
    }

    pub fn fail_writes(&self) {
        self.fail_writes.store(true, Ordering::SeqCst);
    }

    pub fn tile(&self, id: DbId) -> Option<TileRecord> {
        self.tiles.lock().unwrap().get(&id).cloned()
    }

    pub fn put_tile(&self, record: TileRecord) {
        self.tiles.lock().unwrap().insert(record.id, record);
    }

    fn check_writable(&self) -> Result<(), CoreError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(CoreError::Persistence("simulated database outage".into()));
        }
        Ok(())
    }
}

#[async_trait]
impl CatalogLookup for MemoryCatalog {
    async fn categories(&self, ids: &[DbId]) -> Result<Vec<CategorySummary>, CoreError> {
        let map = self.categories.lock().unwrap();
        Ok(ids.iter().filter_map(|id| map.get(id).cloned()).collect())
    }

    async fn colors(&self, ids: &[DbId]) -> Result<Vec<ColorSwatch>, CoreError> {
        let map = self.colors.lock().unwrap();
        Ok(ids.iter().filter_map(|id| map.get(id).cloned()).collect())
    }
}

#[async_trait]
impl TileStore for MemoryCatalog {
    async fn insert(&self, tile: &NewTile) -> Result<TileRecord, CoreError> {
        self.check_writable()?;
        let id = self.next_id.fetch_add(1, Ordering::SeqCst) + 1;
        let now = Utc::now();
        let record = TileRecord {
            id,
            name: tile.name.clone(),
            category_id: tile.category_id,
            main_mask: tile.main_mask.clone(),
            background_color_id: tile.background_color_id,
            grout_shape: tile.grout_shape,
            shape_style: tile.shape_style,
            scale: tile.scale,
            sub_masks: tile.sub_masks.clone(),
            border_mask: tile.border_mask.clone(),
            border_color_id: tile.border_color_id,
            created_at: now,
            updated_at: now,
        };
        self.put_tile(record.clone());
        Ok(record)
    }

    async fn find(&self, id: DbId) -> Result<Option<TileRecord>, CoreError> {
        Ok(self.tile(id))
    }

    async fn list(&self) -> Result<Vec<TileRecord>, CoreError> {
        let mut tiles: Vec<_> = self.tiles.lock().unwrap().values().cloned().collect();
        tiles.sort_by(|a, b| b.id.cmp(&a.id));
        Ok(tiles)
    }

    async fn replace(&self, tile: &TileRecord) -> Result<Option<TileRecord>, CoreError> {
        self.check_writable()?;
        let mut tiles = self.tiles.lock().unwrap();
        match tiles.get_mut(&tile.id) {
            Some(existing) => {
                *existing = TileRecord {
                    updated_at: Utc::now(),
                    created_at: existing.created_at,
                    ..tile.clone()
                };
                Ok(Some(existing.clone()))
            }
            None => Ok(None),
        }
    }

    async fn delete(&self, id: DbId) -> Result<bool, CoreError> {
        self.check_writable()?;
        Ok(self.tiles.lock().unwrap().remove(&id).is_some())
    }
}
