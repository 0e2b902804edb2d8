use async_trait::async_trait;
use sea_orm::{ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, Set};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{is_unset, load_places, Persistable, Place};
use crate::entity::path::{self, Entity as Paths};
use crate::error::{Result, StoreError};
use crate::geo::{decode_polyline, encode_polyline, GeoCoordinate};

/// A trail: its route polyline and the places along it.
///
/// `length` and `duration` are free text as entered ("12 km", "4-5 h").
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Path {
    /// Store-assigned id; `0` until the path is saved.
    #[serde(default)]
    pub id: i64,
    /// Display name.
    pub name: String,
    /// Free-text description.
    #[serde(default)]
    pub info: String,
    /// Distance as entered.
    #[serde(default)]
    pub length: String,
    /// Route in travel order. Stored as one blob.
    #[serde(default)]
    pub polyline: Vec<GeoCoordinate>,
    /// Walking time as entered.
    #[serde(default)]
    pub duration: String,
    /// Places along the route, saved and loaded with the path.
    #[serde(default)]
    pub places: Vec<Place>,
    /// Cover image URL.
    #[serde(rename = "image", default)]
    pub image_url: String,
    /// Owning bundle. Set by the bundle when it saves the path.
    #[serde(default, skip_serializing_if = "is_unset")]
    pub bundle_id: i64,
}

impl Path {
    /// An unsaved path with an empty route and no places.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// An unloaded path carrying only its id, ready for [`super::load`].
    pub fn with_id(id: i64) -> Self {
        Self {
            id,
            ..Self::default()
        }
    }

    /// Builds a path from its row. Places are left empty.
    fn from_row(row: path::Model) -> Result<Self> {
        let polyline = decode_polyline(&row.polyline).map_err(|e| {
            StoreError::storage(format!("Failed to load path with id {}", row.id), e)
        })?;

        Ok(Self {
            id: row.id,
            name: row.name,
            info: row.info,
            length: row.length,
            polyline,
            duration: row.duration,
            places: Vec::new(),
            image_url: row.image_url,
            bundle_id: row.bundle_id,
        })
    }

    fn to_active_model(&self) -> path::ActiveModel {
        path::ActiveModel {
            name: Set(self.name.clone()),
            info: Set(self.info.clone()),
            length: Set(self.length.clone()),
            duration: Set(self.duration.clone()),
            image_url: Set(self.image_url.clone()),
            polyline: Set(encode_polyline(&self.polyline)),
            bundle_id: Set(self.bundle_id),
            ..Default::default()
        }
    }
}

#[async_trait]
impl Persistable for Path {
    const TABLE_NAME: &'static str = "paths";
    const TYPE_NAME: &'static str = "path";
    const REQUIRES_TRANSACTION: bool = true;

    async fn save<C>(&mut self, db: &C) -> Result<()>
    where
        C: ConnectionTrait,
    {
        let inserted = Paths::insert(self.to_active_model())
            .exec(db)
            .await
            .map_err(|e| StoreError::storage("Failed to create path", e))?;

        self.id = inserted.last_insert_id;
        debug!(
            path_id = self.id,
            bundle_id = self.bundle_id,
            places = self.places.len(),
            "inserted path"
        );

        for place in &mut self.places {
            place.path_id = self.id;
            place.save(db).await?;
        }

        Ok(())
    }

    async fn load<C>(&mut self, db: &C) -> Result<()>
    where
        C: ConnectionTrait,
    {
        let id = self.id;
        let row = Paths::find_by_id(id)
            .one(db)
            .await
            .map_err(|e| StoreError::storage(format!("Failed to load path with id {id}"), e))?
            .ok_or_else(|| StoreError::no_such(Self::TYPE_NAME, id))?;

        let mut loaded = Self::from_row(row)?;
        loaded.places = load_places(db, Some(id)).await?;
        *self = loaded;

        Ok(())
    }

    async fn update<C>(&self, db: &C) -> Result<()>
    where
        C: ConnectionTrait,
    {
        // Places keep their rows; only the path itself is rewritten.
        let result = Paths::update_many()
            .set(self.to_active_model())
            .filter(path::Column::Id.eq(self.id))
            .exec(db)
            .await
            .map_err(|e| {
                StoreError::storage(format!("Failed to update path with id {}", self.id), e)
            })?;

        if result.rows_affected == 0 {
            return Err(StoreError::no_such(Self::TYPE_NAME, self.id));
        }

        Ok(())
    }
}

/// Loads paths with their places, all of them or only those of `bundle_id`.
pub async fn load_paths<C>(db: &C, bundle_id: Option<i64>) -> Result<Vec<Path>>
where
    C: ConnectionTrait,
{
    let mut query = Paths::find();
    if let Some(bundle_id) = bundle_id {
        query = query.filter(path::Column::BundleId.eq(bundle_id));
    }

    let rows = query
        .all(db)
        .await
        .map_err(|e| StoreError::storage("Failed to load paths from database", e))?;

    let mut paths = Vec::with_capacity(rows.len());
    for row in rows {
        let mut path = Path::from_row(row)?;
        path.places = load_places(db, Some(path.id)).await?;
        paths.push(path);
    }

    Ok(paths)
}
