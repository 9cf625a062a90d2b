//! Tile composition workflow.
//!
//! Mutations run in a fixed order: field validation, the sub-mask pairing
//! gate, file inspection and reference validation all complete before the
//! first upload. Uploads run concurrently and every success is recorded in
//! an [`AssetLedger`]. The ledger is committed once the record is persisted
//! and rolled back on any failure in between.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use futures::stream::{FuturesUnordered, StreamExt};

use crate::assets::{
    inspect_image, object_key, AssetRef, ImageKind, IncomingFile, ObjectStore, StorageError,
    MASK_FOLDER,
};
use crate::error::{CoreError, ReferenceKind};
use crate::types::DbId;

use super::builder::{self, CreateAssets, PatchAssets, PatchOutcome, ValidatedCreate};
use super::input::{CreateTileInput, TilePatch};
use super::ledger::{purge, AssetLedger, WorkflowPhase};
use super::view::{self, TileView};
use super::{CatalogLookup, CategorySummary, ColorSwatch, TileRecord, TileStore};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Slot {
    Main,
    Border,
    SubMask,
}

impl Slot {
    fn name(self) -> &'static str {
        match self {
            Self::Main => "main",
            Self::Border => "border",
            Self::SubMask => "sub",
        }
    }
}

/// A file that passed inspection and is ready to upload.
struct PlannedUpload<'f> {
    slot: Slot,
    file: &'f IncomingFile,
    kind: ImageKind,
}

#[derive(Default)]
struct Uploaded {
    main: Option<AssetRef>,
    border: Option<AssetRef>,
    sub_masks: Vec<AssetRef>,
}

pub struct TileWorkflow<'a> {
    catalog: &'a dyn CatalogLookup,
    tiles: &'a dyn TileStore,
    objects: Arc<dyn ObjectStore>,
    max_upload_bytes: usize,
}

impl<'a> TileWorkflow<'a> {
    pub fn new(
        catalog: &'a dyn CatalogLookup,
        tiles: &'a dyn TileStore,
        objects: Arc<dyn ObjectStore>,
        max_upload_bytes: usize,
    ) -> Self {
        Self {
            catalog,
            tiles,
            objects,
            max_upload_bytes,
        }
    }

    // -----------------------------------------------------------------------
    // Reads
    // -----------------------------------------------------------------------

    pub async fn get(&self, id: DbId) -> Result<TileView, CoreError> {
        let record = self
            .tiles
            .find(id)
            .await?
            .ok_or(CoreError::NotFound { entity: "tile", id })?;
        self.compose_one(record).await
    }

    /// All tiles, newest first, with references resolved in two batched
    /// lookups.
    pub async fn list(&self) -> Result<Vec<TileView>, CoreError> {
        let records = self.tiles.list().await?;

        let category_ids: Vec<DbId> = unique(records.iter().map(|r| r.category_id));
        let color_ids: Vec<DbId> = unique(records.iter().flat_map(view::referenced_color_ids));

        let categories: HashMap<DbId, CategorySummary> = self
            .catalog
            .categories(&category_ids)
            .await?
            .into_iter()
            .map(|c| (c.id, c))
            .collect();
        let colors = self.color_map(&color_ids).await?;

        Ok(records
            .into_iter()
            .map(|r| {
                let category = categories.get(&r.category_id).cloned();
                view::compose(r, category, &colors)
            })
            .collect())
    }

    // -----------------------------------------------------------------------
    // Create
    // -----------------------------------------------------------------------

    pub async fn create(&self, input: CreateTileInput) -> Result<TileView, CoreError> {
        let fields = builder::validate_create(&input)?;

        let main = input
            .main_mask
            .as_ref()
            .ok_or_else(|| CoreError::missing("mainMask"))?;
        let mut plan = vec![self.plan("mainMask", Slot::Main, main)?];
        if let Some(border) = &input.border_mask {
            plan.push(self.plan("borderMask", Slot::Border, border)?);
        }
        for file in &input.sub_masks {
            plan.push(self.plan("tileMasks", Slot::SubMask, file)?);
        }

        self.verify_references(Some(fields.category_id), &input.referenced_color_ids())
            .await?;

        let mut ledger = AssetLedger::new(Arc::clone(&self.objects));
        let result = self.create_tracked(&mut ledger, fields, plan).await;
        let record = finish(ledger, result).await?;

        tracing::info!(
            tile_id = record.id,
            sub_masks = record.sub_masks.len(),
            "Tile created"
        );
        self.compose_one(record).await
    }

    async fn create_tracked(
        &self,
        ledger: &mut AssetLedger,
        fields: ValidatedCreate,
        plan: Vec<PlannedUpload<'_>>,
    ) -> Result<TileRecord, CoreError> {
        ledger.advance(WorkflowPhase::Uploading);
        let uploaded = self.upload_all(ledger, plan).await?;

        ledger.advance(WorkflowPhase::Validating);
        let main = uploaded
            .main
            .ok_or_else(|| CoreError::Internal("main mask was not uploaded".into()))?;
        let tile = builder::assemble_new(
            fields,
            CreateAssets {
                main,
                sub_masks: uploaded.sub_masks,
                border: uploaded.border,
            },
        )?;

        ledger.advance(WorkflowPhase::Persisting);
        self.tiles.insert(&tile).await
    }

    // -----------------------------------------------------------------------
    // Update
    // -----------------------------------------------------------------------

    pub async fn update(&self, id: DbId, patch: TilePatch) -> Result<TileView, CoreError> {
        let current = self
            .tiles
            .find(id)
            .await?
            .ok_or(CoreError::NotFound { entity: "tile", id })?;
        builder::validate_patch(&current, &patch)?;

        let mut plan = Vec::new();
        if let Some(main) = &patch.main_mask {
            plan.push(self.plan("mainMask", Slot::Main, main)?);
        }
        if let Some(border) = &patch.border_mask {
            plan.push(self.plan("borderMask", Slot::Border, border)?);
        }
        for file in &patch.sub_masks.appended {
            plan.push(self.plan("tileMasks", Slot::SubMask, file)?);
        }

        self.verify_references(patch.category_id, &patch.referenced_color_ids())
            .await?;

        let mut ledger = AssetLedger::new(Arc::clone(&self.objects));
        let result = self.update_tracked(&mut ledger, &current, &patch, plan).await;
        let (record, superseded) = finish(ledger, result).await?;

        // Old assets go only after the replacement is persisted.
        if !superseded.is_empty() {
            purge(self.objects.as_ref(), &superseded).await;
        }

        tracing::info!(
            tile_id = record.id,
            superseded = superseded.len(),
            "Tile updated"
        );
        self.compose_one(record).await
    }

    async fn update_tracked(
        &self,
        ledger: &mut AssetLedger,
        current: &TileRecord,
        patch: &TilePatch,
        plan: Vec<PlannedUpload<'_>>,
    ) -> Result<(TileRecord, Vec<AssetRef>), CoreError> {
        ledger.advance(WorkflowPhase::Uploading);
        let uploaded = self.upload_all(ledger, plan).await?;

        ledger.advance(WorkflowPhase::Validating);
        let PatchOutcome { record, superseded } = builder::apply_patch(
            current,
            patch,
            PatchAssets {
                main: uploaded.main,
                border: uploaded.border,
                appended: uploaded.sub_masks,
            },
        )?;

        ledger.advance(WorkflowPhase::Persisting);
        let saved = self
            .tiles
            .replace(&record)
            .await?
            .ok_or(CoreError::NotFound {
                entity: "tile",
                id: record.id,
            })?;
        Ok((saved, superseded))
    }

    // -----------------------------------------------------------------------
    // Delete
    // -----------------------------------------------------------------------

    /// Delete the tile row, then every asset it owned.
    pub async fn delete(&self, id: DbId) -> Result<(), CoreError> {
        let record = self
            .tiles
            .find(id)
            .await?
            .ok_or(CoreError::NotFound { entity: "tile", id })?;
        if !self.tiles.delete(id).await? {
            return Err(CoreError::NotFound { entity: "tile", id });
        }

        let assets = record.owned_assets();
        let failures = purge(self.objects.as_ref(), &assets).await;
        tracing::info!(tile_id = id, assets = assets.len(), failures, "Tile deleted");
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Helpers
    // -----------------------------------------------------------------------

    fn plan<'f>(
        &self,
        field: &'static str,
        slot: Slot,
        file: &'f IncomingFile,
    ) -> Result<PlannedUpload<'f>, CoreError> {
        let kind = inspect_image(field, file, self.max_upload_bytes)?;
        Ok(PlannedUpload { slot, file, kind })
    }

    /// Upload every planned file concurrently.
    ///
    /// Each upload is tracked the moment it completes, even when a sibling
    /// fails or is still in flight, so a rollback or a dropped ledger can
    /// remove it.
    async fn upload_all(
        &self,
        ledger: &mut AssetLedger,
        plan: Vec<PlannedUpload<'_>>,
    ) -> Result<Uploaded, CoreError> {
        let mut pending: FuturesUnordered<_> = plan
            .iter()
            .enumerate()
            .map(|(index, p)| {
                let key = object_key(MASK_FOLDER, p.slot.name(), p.kind);
                let bytes = p.file.bytes.clone();
                async move {
                    let result = self.objects.store(&key, bytes, p.kind.content_type()).await;
                    (index, result)
                }
            })
            .collect();

        let mut results: Vec<Option<Result<AssetRef, StorageError>>> =
            plan.iter().map(|_| None).collect();
        while let Some((index, result)) = pending.next().await {
            if let Ok(asset) = &result {
                ledger.track(asset.clone());
            }
            results[index] = Some(result);
        }

        let mut uploaded = Uploaded::default();
        let mut first_error = None;
        for (planned, result) in plan.iter().zip(results.into_iter().flatten()) {
            match result {
                Ok(asset) => match planned.slot {
                    Slot::Main => uploaded.main = Some(asset),
                    Slot::Border => uploaded.border = Some(asset),
                    Slot::SubMask => uploaded.sub_masks.push(asset),
                },
                Err(e) => {
                    tracing::error!(
                        file = %planned.file.file_name,
                        slot = planned.slot.name(),
                        error = %e,
                        "Asset upload failed"
                    );
                    if first_error.is_none() {
                        first_error = Some(e);
                    }
                }
            }
        }

        match first_error {
            Some(e) => Err(CoreError::Upload(e.to_string())),
            None => Ok(uploaded),
        }
    }

    /// Confirm the category and every color id resolve.
    ///
    /// Colors are resolved in one batch; the first missing id in request
    /// order is reported.
    async fn verify_references(
        &self,
        category_id: Option<DbId>,
        color_ids: &[DbId],
    ) -> Result<(), CoreError> {
        if let Some(category_id) = category_id {
            let found = self.catalog.categories(&[category_id]).await?;
            if !found.iter().any(|c| c.id == category_id) {
                return Err(CoreError::reference(ReferenceKind::Category, category_id));
            }
        }

        if color_ids.is_empty() {
            return Ok(());
        }
        let wanted = unique(color_ids.iter().copied());
        let found: HashSet<DbId> = self
            .catalog
            .colors(&wanted)
            .await?
            .into_iter()
            .map(|c| c.id)
            .collect();
        if let Some(missing) = color_ids.iter().find(|id| !found.contains(id)) {
            return Err(CoreError::reference(ReferenceKind::Color, missing));
        }
        Ok(())
    }

    async fn color_map(&self, ids: &[DbId]) -> Result<HashMap<DbId, ColorSwatch>, CoreError> {
        if ids.is_empty() {
            return Ok(HashMap::new());
        }
        Ok(self
            .catalog
            .colors(ids)
            .await?
            .into_iter()
            .map(|c| (c.id, c))
            .collect())
    }

    async fn compose_one(&self, record: TileRecord) -> Result<TileView, CoreError> {
        let category = self
            .catalog
            .categories(&[record.category_id])
            .await?
            .into_iter()
            .find(|c| c.id == record.category_id);
        let colors = self
            .color_map(&unique(view::referenced_color_ids(&record)))
            .await?;
        Ok(view::compose(record, category, &colors))
    }
}

/// Commit the ledger on success, roll it back on failure.
async fn finish<T>(ledger: AssetLedger, result: Result<T, CoreError>) -> Result<T, CoreError> {
    match result {
        Ok(value) => {
            ledger.commit();
            Ok(value)
        }
        Err(e) => {
            tracing::warn!(error = %e, "Tile mutation failed, rolling back uploads");
            ledger.rollback().await;
            Err(e)
        }
    }
}

/// Deduplicate ids, keeping first-seen order.
fn unique(ids: impl IntoIterator<Item = DbId>) -> Vec<DbId> {
    let mut seen = HashSet::new();
    ids.into_iter().filter(|id| seen.insert(*id)).collect()
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use assert_matches::assert_matches;

    use super::*;
    use crate::tile::fakes::{png, MemoryCatalog, MemoryObjectStore};
    use crate::tile::input::SubMaskChanges;
    use crate::tile::SubMask;

    struct Harness {
        catalog: MemoryCatalog,
        store: Arc<MemoryObjectStore>,
    }

    impl Harness {
        fn new() -> Self {
            Self {
                catalog: MemoryCatalog::default()
                    .with_category(1, "Hexagons")
                    .with_color(1, "#FF0000")
                    .with_color(2, "#00ff00")
                    .with_color(3, "#0000ff")
                    .with_color(4, "#ff0000"),
                store: Arc::new(MemoryObjectStore::default()),
            }
        }

        fn workflow(&self) -> TileWorkflow<'_> {
            TileWorkflow::new(&self.catalog, &self.catalog, self.store.clone(), 1024)
        }
    }

    fn basic_input() -> CreateTileInput {
        CreateTileInput {
            name: Some("Hex Basic".into()),
            category_id: Some(1),
            main_mask: Some(png("main.png")),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn scenario_a_create_without_sub_masks() {
        let h = Harness::new();
        let view = h.workflow().create(basic_input()).await.unwrap();

        assert_eq!(view.name, "Hex Basic");
        assert!(view.sub_masks.is_empty());
        assert!(view.colors_used.is_empty());
        assert_eq!(view.category.as_ref().map(|c| c.name.as_str()), Some("Hexagons"));
        assert_eq!(h.store.stored().len(), 1);
        assert!(h.store.deleted().is_empty());
    }

    #[tokio::test]
    async fn scenario_b_pairing_mismatch_uploads_nothing() {
        let h = Harness::new();
        let input = CreateTileInput {
            sub_masks: vec![png("a.png"), png("b.png")],
            sub_mask_colors: vec![1],
            ..basic_input()
        };
        let err = h.workflow().create(input).await.unwrap_err();

        assert_matches!(err, CoreError::PairingMismatch { expected: 2, actual: 1 });
        assert!(h.store.stored().is_empty());
        assert_eq!(h.store.live(), 0);
    }

    #[tokio::test]
    async fn scenario_c_background_only_update() {
        let h = Harness::new();
        let created = h.workflow().create(basic_input()).await.unwrap();

        let patch = TilePatch {
            background_color_id: Some(Some(3)),
            ..Default::default()
        };
        let updated = h.workflow().update(created.id, patch).await.unwrap();

        assert_eq!(updated.main_mask, created.main_mask);
        assert_eq!(updated.colors_used, vec!["#0000ff"]);
        assert!(h.store.deleted().is_empty());
        assert_eq!(h.store.stored().len(), 1);
    }

    #[tokio::test]
    async fn scenario_d_delete_removes_every_asset() {
        let h = Harness::new();
        let input = CreateTileInput {
            sub_masks: vec![png("a.png"), png("b.png"), png("c.png")],
            sub_mask_colors: vec![1, 2, 3],
            border_mask: Some(png("border.png")),
            border_color_id: Some(2),
            ..basic_input()
        };
        let created = h.workflow().create(input).await.unwrap();
        assert_eq!(h.store.live(), 5);

        h.workflow().delete(created.id).await.unwrap();

        assert_eq!(h.store.deleted().len(), 5);
        assert_eq!(h.store.live(), 0);
        assert!(h.catalog.tile(created.id).is_none());
    }

    #[tokio::test]
    async fn sub_mask_order_matches_input() {
        let h = Harness::new();
        let input = CreateTileInput {
            sub_masks: vec![png("a.png"), png("b.png"), png("c.png")],
            sub_mask_colors: vec![3, 1, 2],
            ..basic_input()
        };
        let view = h.workflow().create(input).await.unwrap();

        let colors: Vec<_> = view.sub_masks.iter().map(|s| s.color_id).collect();
        assert_eq!(colors, vec![3, 1, 2]);
        assert_eq!(view.colors_used, vec!["#0000ff", "#ff0000", "#00ff00"]);
    }

    #[tokio::test]
    async fn colors_used_dedupes_by_hex_across_ids() {
        let h = Harness::new();
        let input = CreateTileInput {
            background_color_id: Some(1),
            sub_masks: vec![png("a.png"), png("b.png")],
            sub_mask_colors: vec![4, 2],
            ..basic_input()
        };
        let view = h.workflow().create(input).await.unwrap();
        assert_eq!(view.colors_used, vec!["#ff0000", "#00ff00"]);

        let reread = h.workflow().get(view.id).await.unwrap();
        assert_eq!(reread.colors_used, view.colors_used);
    }

    #[tokio::test]
    async fn unknown_color_rejected_before_upload() {
        let h = Harness::new();
        let input = CreateTileInput {
            sub_masks: vec![png("a.png")],
            sub_mask_colors: vec![404],
            ..basic_input()
        };
        let err = h.workflow().create(input).await.unwrap_err();

        assert_matches!(
            err,
            CoreError::ReferenceNotFound { kind: ReferenceKind::Color, ref id } if id == "404"
        );
        assert!(h.store.stored().is_empty());
    }

    #[tokio::test]
    async fn unknown_category_rejected_before_upload() {
        let h = Harness::new();
        let input = CreateTileInput {
            category_id: Some(9),
            ..basic_input()
        };
        assert_matches!(
            h.workflow().create(input).await,
            Err(CoreError::ReferenceNotFound { kind: ReferenceKind::Category, .. })
        );
        assert!(h.store.stored().is_empty());
    }

    #[tokio::test]
    async fn non_image_rejected_before_upload() {
        let h = Harness::new();
        let input = CreateTileInput {
            sub_masks: vec![IncomingFile::new("notes.txt", b"not an image".to_vec())],
            sub_mask_colors: vec![1],
            ..basic_input()
        };
        assert_matches!(
            h.workflow().create(input).await,
            Err(CoreError::Validation { field: "tileMasks", .. })
        );
        assert!(h.store.stored().is_empty());
    }

    #[tokio::test]
    async fn failed_upload_rolls_back_siblings() {
        let h = Harness::new();
        h.store.fail_uploads_after(2);
        let input = CreateTileInput {
            sub_masks: vec![png("a.png"), png("b.png")],
            sub_mask_colors: vec![1, 2],
            ..basic_input()
        };
        let err = h.workflow().create(input).await.unwrap_err();

        assert_matches!(err, CoreError::Upload(_));
        assert_eq!(h.store.stored().len(), 2);
        assert_eq!(h.store.deleted().len(), 2);
        assert_eq!(h.store.live(), 0);
    }

    #[tokio::test]
    async fn failed_persist_rolls_back_uploads() {
        let h = Harness::new();
        h.catalog.fail_writes();
        let input = CreateTileInput {
            sub_masks: vec![png("a.png")],
            sub_mask_colors: vec![1],
            ..basic_input()
        };
        let err = h.workflow().create(input).await.unwrap_err();

        assert_matches!(err, CoreError::Persistence(_));
        assert_eq!(h.store.stored().len(), 2);
        assert_eq!(h.store.live(), 0);
    }

    #[tokio::test]
    async fn cancelled_create_removes_finished_uploads() {
        let h = Harness::new();
        h.store.delay_uploads("/sub-", Duration::from_secs(5));
        let input = CreateTileInput {
            sub_masks: vec![png("a.png")],
            sub_mask_colors: vec![1],
            ..basic_input()
        };

        let outcome =
            tokio::time::timeout(Duration::from_millis(100), h.workflow().create(input)).await;
        assert!(outcome.is_err());

        for _ in 0..50 {
            if h.store.live() == 0 {
                break;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        assert_eq!(h.store.stored().len(), 1);
        assert_eq!(h.store.deleted(), h.store.stored());
        assert_eq!(h.store.live(), 0);
    }

    #[tokio::test]
    async fn failed_main_replacement_keeps_original() {
        let h = Harness::new();
        let created = h.workflow().create(basic_input()).await.unwrap();
        h.store.fail_uploads_after(0);

        let patch = TilePatch {
            main_mask: Some(png("new.png")),
            ..Default::default()
        };
        let err = h.workflow().update(created.id, patch).await.unwrap_err();

        assert_matches!(err, CoreError::Upload(_));
        assert!(h.store.deleted().is_empty());
        let stored = h.catalog.tile(created.id).unwrap();
        assert_eq!(stored.main_mask, created.main_mask);
        assert_eq!(h.store.live(), 1);
    }

    #[tokio::test]
    async fn main_replacement_deletes_old_after_persist() {
        let h = Harness::new();
        let created = h.workflow().create(basic_input()).await.unwrap();

        let patch = TilePatch {
            main_mask: Some(png("new.png")),
            ..Default::default()
        };
        let updated = h.workflow().update(created.id, patch).await.unwrap();

        assert_ne!(updated.main_mask, created.main_mask);
        assert_eq!(h.store.deleted(), vec![created.main_mask.deletion_handle.clone()]);
        assert_eq!(h.store.live(), 1);
    }

    #[tokio::test]
    async fn failed_persist_on_update_keeps_old_assets() {
        let h = Harness::new();
        let created = h.workflow().create(basic_input()).await.unwrap();
        h.catalog.fail_writes();

        let patch = TilePatch {
            main_mask: Some(png("new.png")),
            ..Default::default()
        };
        assert_matches!(
            h.workflow().update(created.id, patch).await,
            Err(CoreError::Persistence(_))
        );

        let deleted = h.store.deleted();
        assert_eq!(deleted.len(), 1);
        assert_ne!(deleted[0], created.main_mask.deletion_handle);
        assert_eq!(h.store.live(), 1);
    }

    #[tokio::test]
    async fn update_composes_sub_mask_modes() {
        let h = Harness::new();
        let input = CreateTileInput {
            sub_masks: vec![png("a.png"), png("b.png"), png("c.png")],
            sub_mask_colors: vec![1, 2, 3],
            ..basic_input()
        };
        let created = h.workflow().create(input).await.unwrap();
        let ids: Vec<_> = created.sub_masks.iter().map(|s| s.id).collect();

        let patch = TilePatch {
            sub_masks: SubMaskChanges {
                deleted: vec![ids[0]],
                recolor: vec![(ids[2], 1)],
                appended: vec![png("d.png")],
                appended_colors: vec![2],
            },
            ..Default::default()
        };
        let updated = h.workflow().update(created.id, patch).await.unwrap();

        let survivors: Vec<_> = updated.sub_masks.iter().map(|s| s.id).collect();
        assert_eq!(survivors.len(), 3);
        assert_eq!(&survivors[..2], &[ids[1], ids[2]]);
        assert_eq!(updated.sub_masks[1].color_id, 1);
        assert_eq!(updated.sub_masks[2].color_id, 2);
        assert_eq!(
            h.store.deleted(),
            vec![created.sub_masks[0].mask.deletion_handle.clone()]
        );
    }

    #[tokio::test]
    async fn update_missing_tile_is_not_found() {
        let h = Harness::new();
        assert_matches!(
            h.workflow().update(42, TilePatch::default()).await,
            Err(CoreError::NotFound { entity: "tile", id: 42 })
        );
    }

    #[tokio::test]
    async fn deleted_references_are_orphaned_on_read() {
        let h = Harness::new();
        let input = CreateTileInput {
            background_color_id: Some(2),
            ..basic_input()
        };
        let created = h.workflow().create(input).await.unwrap();
        h.catalog.remove_color(2);
        h.catalog.remove_category(1);

        let view = h.workflow().get(created.id).await.unwrap();
        assert_eq!(view.background_color_id, Some(2));
        assert!(view.background_color.is_none());
        assert_eq!(view.category_id, 1);
        assert!(view.category.is_none());
        assert!(view.colors_used.is_empty());
    }

    #[tokio::test]
    async fn list_is_newest_first() {
        let h = Harness::new();
        let first = h.workflow().create(basic_input()).await.unwrap();
        let second = h.workflow().create(basic_input()).await.unwrap();

        let ids: Vec<_> = h.workflow().list().await.unwrap().iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![second.id, first.id]);
    }

    #[tokio::test]
    async fn recolor_to_unknown_color_rejected() {
        let h = Harness::new();
        let mut record = crate::tile::fakes::sample_record(1, false);
        record.sub_masks = vec![SubMask {
            color_id: 1,
            ..record.sub_masks[0].clone()
        }];
        let id = record.sub_masks[0].id;
        h.catalog.put_tile(record);

        let patch = TilePatch {
            sub_masks: SubMaskChanges {
                recolor: vec![(id, 500)],
                ..Default::default()
            },
            ..Default::default()
        };
        assert_matches!(
            h.workflow().update(1, patch).await,
            Err(CoreError::ReferenceNotFound { kind: ReferenceKind::Color, .. })
        );
    }
}
