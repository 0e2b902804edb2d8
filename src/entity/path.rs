//! Path entity model.

use sea_orm::entity::prelude::*;

/// Sea-ORM entity model for the `paths` table.
///
/// `length` and `duration` are free text. `polyline` holds the route as a
/// blob in the layout of [`crate::geo::encode_polyline`].
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "paths")]
pub struct Model {
    /// Auto-incremented path id.
    #[sea_orm(primary_key)]
    pub id: i64,

    /// Display name of the path.
    pub name: String,

    /// Short description.
    pub info: String,

    /// Distance, free text.
    pub length: String,

    /// Walking time, free text.
    pub duration: String,

    /// URL of the path's cover image.
    pub image_url: String,

    /// Route as concatenated 8-byte coordinates, see [`crate::geo`].
    pub polyline: Vec<u8>,

    /// Owning bundle. Deleting the bundle deletes the path.
    pub bundle_id: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::bundle::Entity",
        from = "Column::BundleId",
        to = "super::bundle::Column::Id",
        on_update = "Cascade",
        on_delete = "Cascade"
    )]
    Bundle,
    #[sea_orm(has_many = "super::place::Entity")]
    Place,
}

impl Related<super::bundle::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Bundle.def()
    }
}

impl Related<super::place::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Place.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
