//! Place entity model.

use sea_orm::entity::prelude::*;

/// Sea-ORM entity model for the `places` table.
///
/// `position` is a single coordinate encoded as 8 bytes.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "places")]
pub struct Model {
    /// Auto-incremented place id.
    #[sea_orm(primary_key)]
    pub id: i64,

    /// Display name of the place.
    pub name: String,

    /// Short description.
    pub info: String,

    /// Radius around the position.
    pub radius: i64,

    /// Exactly one encoded coordinate, see [`crate::geo`].
    pub position: Vec<u8>,

    /// Owning path. Deleting the path deletes the place.
    pub path_id: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::path::Entity",
        from = "Column::PathId",
        to = "super::path::Column::Id",
        on_update = "Cascade",
        on_delete = "Cascade"
    )]
    Path,
}

impl Related<super::path::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Path.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
