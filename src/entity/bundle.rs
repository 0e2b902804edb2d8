//! Bundle entity model.

use sea_orm::entity::prelude::*;

/// Sea-ORM entity model for the `bundles` table.
///
/// | Column    | Type                 | Description                    |
/// |-----------|----------------------|--------------------------------|
/// | id        | INTEGER (Primary Key)| Bundle id                      |
/// | name      | VARCHAR(255)         | Display name                   |
/// | info      | VARCHAR(255)         | Short description              |
/// | image_url | VARCHAR(255)         | URL of an image for the bundle |
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "bundles")]
pub struct Model {
    /// Auto-incremented bundle id.
    #[sea_orm(primary_key)]
    pub id: i64,

    /// Display name of the bundle.
    pub name: String,

    /// Short description.
    pub info: String,

    /// URL of the bundle's cover image.
    pub image_url: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::path::Entity")]
    Path,
}

impl Related<super::path::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Path.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
