use async_trait::async_trait;
use sea_orm::{ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, Set};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{is_unset, Media, Persistable};
use crate::entity::place::{self, Entity as Places};
use crate::error::{Result, StoreError};
use crate::geo::GeoCoordinate;

/// A point of interest along a path.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Place {
    /// Store-assigned id; `0` until the place is saved.
    #[serde(default)]
    pub id: i64,
    /// Display name.
    pub name: String,
    /// Free-text description.
    #[serde(default)]
    pub info: String,
    /// Radius around `position` that counts as being at the place.
    #[serde(default)]
    pub radius: i64,
    /// Location of the place.
    #[serde(default)]
    pub position: GeoCoordinate,
    /// Attached media. Not persisted.
    #[serde(default)]
    pub media: Vec<Media>,
    /// Owning path. Set by the path when it saves the place.
    #[serde(default, skip_serializing_if = "is_unset")]
    pub path_id: i64,
}

impl Place {
    /// An unsaved place at `position`.
    pub fn new(name: impl Into<String>, position: GeoCoordinate) -> Self {
        Self {
            name: name.into(),
            position,
            ..Self::default()
        }
    }

    /// An unloaded place carrying only its id.
    pub fn with_id(id: i64) -> Self {
        Self {
            id,
            ..Self::default()
        }
    }

    fn from_row(row: place::Model) -> Result<Self> {
        let position = GeoCoordinate::from_bytes(&row.position).map_err(|e| {
            StoreError::storage(format!("Failed to load place with id {}", row.id), e)
        })?;

        Ok(Self {
            id: row.id,
            name: row.name,
            info: row.info,
            radius: row.radius,
            position,
            media: Vec::new(),
            path_id: row.path_id,
        })
    }

    fn to_active_model(&self) -> place::ActiveModel {
        place::ActiveModel {
            name: Set(self.name.clone()),
            info: Set(self.info.clone()),
            radius: Set(self.radius),
            position: Set(self.position.to_bytes().to_vec()),
            path_id: Set(self.path_id),
            ..Default::default()
        }
    }
}

#[async_trait]
impl Persistable for Place {
    const TABLE_NAME: &'static str = "places";
    const TYPE_NAME: &'static str = "place";
    const REQUIRES_TRANSACTION: bool = false;

    async fn save<C>(&mut self, db: &C) -> Result<()>
    where
        C: ConnectionTrait,
    {
        let inserted = Places::insert(self.to_active_model())
            .exec(db)
            .await
            .map_err(|e| StoreError::storage("Failed to create place", e))?;

        self.id = inserted.last_insert_id;
        debug!(place_id = self.id, path_id = self.path_id, "inserted place");

        Ok(())
    }

    async fn load<C>(&mut self, db: &C) -> Result<()>
    where
        C: ConnectionTrait,
    {
        let id = self.id;
        let row = Places::find_by_id(id)
            .one(db)
            .await
            .map_err(|e| StoreError::storage(format!("Failed to load place with id {id}"), e))?
            .ok_or_else(|| StoreError::no_such(Self::TYPE_NAME, id))?;

        *self = Self::from_row(row)?;
        Ok(())
    }

    async fn update<C>(&self, db: &C) -> Result<()>
    where
        C: ConnectionTrait,
    {
        let result = Places::update_many()
            .set(self.to_active_model())
            .filter(place::Column::Id.eq(self.id))
            .exec(db)
            .await
            .map_err(|e| {
                StoreError::storage(format!("Failed to update place with id {}", self.id), e)
            })?;

        if result.rows_affected == 0 {
            return Err(StoreError::no_such(Self::TYPE_NAME, self.id));
        }

        Ok(())
    }
}

/// Loads places, all of them or only those on `path_id`.
pub async fn load_places<C>(db: &C, path_id: Option<i64>) -> Result<Vec<Place>>
where
    C: ConnectionTrait,
{
    let mut query = Places::find();
    if let Some(path_id) = path_id {
        query = query.filter(place::Column::PathId.eq(path_id));
    }

    query
        .all(db)
        .await
        .map_err(|e| StoreError::storage("Failed to load places", e))?
        .into_iter()
        .map(Place::from_row)
        .collect()
}
