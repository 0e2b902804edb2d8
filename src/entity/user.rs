//! User entity model.

use sea_orm::entity::prelude::*;

/// Sea-ORM entity model for the `users` table.
///
/// `username` is unique. `salt` and `hashed_password` are raw bytes and
/// never leave the crate through serialization.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "users")]
pub struct Model {
    /// Auto-incremented user id.
    #[sea_orm(primary_key)]
    pub id: i64,

    /// Login name, unique.
    #[sea_orm(unique)]
    pub username: String,

    /// Random per-password salt.
    pub salt: Vec<u8>,

    /// SHA-256 of the password followed by the salt.
    pub hashed_password: Vec<u8>,

    /// Administrator flag.
    pub is_administrator: bool,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
