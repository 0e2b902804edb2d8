use async_trait::async_trait;
use rand::rngs::OsRng;
use rand::RngCore;
use sea_orm::sea_query::OnConflict;
use sea_orm::{ActiveValue, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, Set};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tracing::{debug, info};

use super::Persistable;
use crate::entity::user::{self, Entity as Users};
use crate::error::{Result, StoreError};

/// Length of the random salt generated for every password.
pub const PASSWORD_SALT_BYTES: usize = 32;

const DEFAULT_ADMINISTRATOR: &str = "admin";

/// A login account. Independent of the trail graph.
///
/// Only `id`, `username` and `isAdministrator` serialize; the salt and the
/// password hash stay inside the crate.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Store-assigned id; `0` until the user is saved.
    #[serde(default)]
    pub id: i64,
    /// Login name, unique across the store.
    pub username: String,
    /// Grants access to administrative operations.
    #[serde(default)]
    pub is_administrator: bool,
    /// Random salt mixed into the password hash.
    #[serde(skip)]
    salt: Vec<u8>,
    /// SHA-256 of password and salt. Empty when not loaded from the store.
    #[serde(skip)]
    hashed_password: Vec<u8>,
}

impl User {
    /// Creates an unsaved user with a fresh salt.
    pub fn new(username: impl Into<String>, password: &str, is_administrator: bool) -> Self {
        let salt = generate_salt();
        let hashed_password = hash_password(password, &salt);

        Self {
            id: 0,
            username: username.into(),
            is_administrator,
            salt,
            hashed_password,
        }
    }

    /// An unloaded user carrying only its id, ready for [`super::load`].
    pub fn with_id(id: i64) -> Self {
        Self {
            id,
            ..Self::default()
        }
    }

    /// Replaces the salt and hash for a new password.
    pub fn set_password(&mut self, password: &str) {
        self.salt = generate_salt();
        self.hashed_password = hash_password(password, &self.salt);
    }

    /// Whether `password` matches the stored hash. Always false when no hash
    /// is present.
    pub fn is_correct_password(&self, password: &str) -> bool {
        !self.hashed_password.is_empty()
            && hash_password(password, &self.salt) == self.hashed_password
    }

    /// Loads the user registered under `username`.
    pub async fn load_by_username<C>(username: &str, db: &C) -> Result<Self>
    where
        C: ConnectionTrait,
    {
        let row = Users::find()
            .filter(user::Column::Username.eq(username))
            .one(db)
            .await
            .map_err(|e| StoreError::storage(format!("Failed to load user {username}"), e))?
            .ok_or_else(|| StoreError::not_found(format!("No user named {username} exist")))?;

        Ok(Self::from_row(row))
    }

    fn from_row(row: user::Model) -> Self {
        Self {
            id: row.id,
            username: row.username,
            is_administrator: row.is_administrator,
            salt: row.salt,
            hashed_password: row.hashed_password,
        }
    }

    fn to_active_model(&self) -> user::ActiveModel {
        user::ActiveModel {
            username: Set(self.username.clone()),
            salt: Set(self.salt.clone()),
            hashed_password: Set(self.hashed_password.clone()),
            is_administrator: Set(self.is_administrator),
            ..Default::default()
        }
    }

    /// Like [`to_active_model`](Self::to_active_model), but leaves the stored
    /// credentials alone unless this value carries a password hash. A user
    /// deserialized from JSON never does.
    fn to_update_model(&self) -> user::ActiveModel {
        let mut model = self.to_active_model();
        if self.hashed_password.is_empty() {
            model.salt = ActiveValue::NotSet;
            model.hashed_password = ActiveValue::NotSet;
        }
        model
    }
}

#[async_trait]
impl Persistable for User {
    const TABLE_NAME: &'static str = "users";
    const TYPE_NAME: &'static str = "user";
    const REQUIRES_TRANSACTION: bool = false;

    async fn save<C>(&mut self, db: &C) -> Result<()>
    where
        C: ConnectionTrait,
    {
        let inserted = Users::insert(self.to_active_model())
            .exec(db)
            .await
            .map_err(|e| StoreError::storage("Failed to create user", e))?;

        self.id = inserted.last_insert_id;
        debug!(user_id = self.id, "inserted user");

        Ok(())
    }

    async fn load<C>(&mut self, db: &C) -> Result<()>
    where
        C: ConnectionTrait,
    {
        let id = self.id;
        let row = Users::find_by_id(id)
            .one(db)
            .await
            .map_err(|e| StoreError::storage(format!("Failed to load user with id {id}"), e))?
            .ok_or_else(|| StoreError::no_such(Self::TYPE_NAME, id))?;

        *self = Self::from_row(row);
        Ok(())
    }

    async fn update<C>(&self, db: &C) -> Result<()>
    where
        C: ConnectionTrait,
    {
        let result = Users::update_many()
            .set(self.to_update_model())
            .filter(user::Column::Id.eq(self.id))
            .exec(db)
            .await
            .map_err(|e| {
                StoreError::storage(format!("Failed to update user with id {}", self.id), e)
            })?;

        if result.rows_affected == 0 {
            return Err(StoreError::no_such(Self::TYPE_NAME, self.id));
        }

        Ok(())
    }
}

/// Checks a login. Unknown users and wrong passwords both yield `None`.
pub async fn authenticate<C>(username: &str, password: &str, db: &C) -> Result<Option<User>>
where
    C: ConnectionTrait,
{
    match User::load_by_username(username, db).await {
        Ok(user) if user.is_correct_password(password) => Ok(Some(user)),
        Ok(_) => Ok(None),
        Err(err) if err.is_not_found() => Ok(None),
        Err(err) => Err(err),
    }
}

/// Makes sure an `admin`/`admin` administrator exists, resetting its
/// password and flag if the account is already there.
///
/// Development bootstrap only.
pub async fn ensure_default_administrator<C>(db: &C) -> Result<()>
where
    C: ConnectionTrait,
{
    let admin = User::new(DEFAULT_ADMINISTRATOR, DEFAULT_ADMINISTRATOR, true);

    Users::insert(admin.to_active_model())
        .on_conflict(
            OnConflict::column(user::Column::Username)
                .update_columns([
                    user::Column::Salt,
                    user::Column::HashedPassword,
                    user::Column::IsAdministrator,
                ])
                .to_owned(),
        )
        .exec(db)
        .await
        .map_err(|e| StoreError::storage("Failed to create default administrator", e))?;

    info!(username = DEFAULT_ADMINISTRATOR, "default administrator ensured");
    Ok(())
}

fn generate_salt() -> Vec<u8> {
    let mut salt = vec![0u8; PASSWORD_SALT_BYTES];
    OsRng.fill_bytes(&mut salt);
    salt
}

fn hash_password(password: &str, salt: &[u8]) -> Vec<u8> {
    let mut hasher = Sha256::new();
    hasher.update(password.as_bytes());
    hasher.update(salt);
    hasher.finalize().to_vec()
}
