use async_trait::async_trait;
use sea_orm::{ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, Set};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{load_paths, Path, Persistable};
use crate::entity::bundle::{self, Entity as Bundles};
use crate::error::{Result, StoreError};

/// A named collection of paths, the root of the trail graph.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Bundle {
    /// Store-assigned id; `0` until the bundle is saved.
    #[serde(default)]
    pub id: i64,
    /// Display name.
    pub name: String,
    /// Free-text description.
    #[serde(default)]
    pub info: String,
    /// Cover image URL.
    #[serde(rename = "image", default)]
    pub image_url: String,
    /// Paths owned by this bundle, saved and loaded with it.
    #[serde(default)]
    pub paths: Vec<Path>,
}

impl Bundle {
    /// An unsaved bundle with no paths.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// An unloaded bundle carrying only its id, ready for [`super::load`].
    pub fn with_id(id: i64) -> Self {
        Self {
            id,
            ..Self::default()
        }
    }

    fn from_row(row: bundle::Model, paths: Vec<Path>) -> Self {
        Self {
            id: row.id,
            name: row.name,
            info: row.info,
            image_url: row.image_url,
            paths,
        }
    }

    fn to_active_model(&self) -> bundle::ActiveModel {
        bundle::ActiveModel {
            name: Set(self.name.clone()),
            info: Set(self.info.clone()),
            image_url: Set(self.image_url.clone()),
            ..Default::default()
        }
    }
}

#[async_trait]
impl Persistable for Bundle {
    const TABLE_NAME: &'static str = "bundles";
    const TYPE_NAME: &'static str = "bundle";
    const REQUIRES_TRANSACTION: bool = true;

    async fn save<C>(&mut self, db: &C) -> Result<()>
    where
        C: ConnectionTrait,
    {
        let inserted = Bundles::insert(self.to_active_model())
            .exec(db)
            .await
            .map_err(|e| StoreError::storage("Failed to create bundle", e))?;

        self.id = inserted.last_insert_id;
        debug!(bundle_id = self.id, paths = self.paths.len(), "inserted bundle");

        for path in &mut self.paths {
            path.bundle_id = self.id;
            path.save(db).await?;
        }

        Ok(())
    }

    async fn load<C>(&mut self, db: &C) -> Result<()>
    where
        C: ConnectionTrait,
    {
        let id = self.id;
        let row = Bundles::find_by_id(id)
            .one(db)
            .await
            .map_err(|e| StoreError::storage(format!("Failed to load bundle with id {id}"), e))?
            .ok_or_else(|| StoreError::no_such(Self::TYPE_NAME, id))?;

        let paths = load_paths(db, Some(id)).await?;
        *self = Self::from_row(row, paths);

        Ok(())
    }

    async fn update<C>(&self, db: &C) -> Result<()>
    where
        C: ConnectionTrait,
    {
        // Only the bundle's own row; its paths are left untouched.
        let result = Bundles::update_many()
            .set(self.to_active_model())
            .filter(bundle::Column::Id.eq(self.id))
            .exec(db)
            .await
            .map_err(|e| {
                StoreError::storage(format!("Failed to update bundle with id {}", self.id), e)
            })?;

        if result.rows_affected == 0 {
            return Err(StoreError::no_such(Self::TYPE_NAME, self.id));
        }

        Ok(())
    }
}

/// Loads every bundle with its full tree of paths and places, in the
/// store's iteration order.
pub async fn load_bundles<C>(db: &C) -> Result<Vec<Bundle>>
where
    C: ConnectionTrait,
{
    let rows = Bundles::find()
        .all(db)
        .await
        .map_err(|e| StoreError::storage("Failed to load bundles", e))?;

    let mut bundles = Vec::with_capacity(rows.len());
    for row in rows {
        let paths = load_paths(db, Some(row.id)).await?;
        bundles.push(Bundle::from_row(row, paths));
    }

    Ok(bundles)
}
