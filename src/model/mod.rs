//! Domain types of the trail graph and the persistence contract they share.
//!
//! Every persistable type implements [`Persistable`]. The free functions
//! [`save`], [`load`], [`update`] and [`delete`] are written once against
//! that trait and decide whether the work runs inside a transaction.
//!
//! Composite types own the recursion into their children: a [`Bundle`]
//! saves and loads its [`Path`]s, which save and load their [`Place`]s.
//! Updates and deletes never recurse. Removing children on delete is left to
//! the foreign keys (`ON DELETE CASCADE`), and an update only rewrites the
//! row of the entity it is called on.

use async_trait::async_trait;
use sea_orm::sea_query::{Alias, Expr, Query};
use sea_orm::{ConnectionTrait, DatabaseTransaction, TransactionTrait};
use tracing::{debug, error, instrument, warn};

use crate::error::{Result, StoreError};

mod bundle;
mod media;
mod path;
mod place;
mod user;

pub use bundle::{load_bundles, Bundle};
pub use media::Media;
pub use path::{load_paths, Path};
pub use place::{load_places, Place};
pub use user::{authenticate, ensure_default_administrator, User, PASSWORD_SALT_BYTES};

/// Capability set of an entity that can be written to and read from the store.
///
/// `C` is any Sea-ORM connection: a [`sea_orm::DatabaseConnection`] or a
/// [`DatabaseTransaction`]. The same save/load code therefore runs directly
/// against the pool or inside a transaction opened by [`save`]/[`load`].
#[async_trait]
pub trait Persistable: Send + Sync {
    /// Table the entity's rows live in.
    const TABLE_NAME: &'static str;

    /// Human readable name used in messages.
    const TYPE_NAME: &'static str;

    /// Whether [`save`] and [`load`] must wrap the work in a transaction.
    const REQUIRES_TRANSACTION: bool;

    /// Inserts the entity, assigning its id.
    async fn save<C>(&mut self, db: &C) -> Result<()>
    where
        C: ConnectionTrait;

    /// Replaces every field from the row keyed by the entity's id.
    async fn load<C>(&mut self, db: &C) -> Result<()>
    where
        C: ConnectionTrait;

    /// Rewrites the entity's own row, keyed by id.
    async fn update<C>(&self, db: &C) -> Result<()>
    where
        C: ConnectionTrait;
}

/// Persists `model`, opening a transaction when the type requires one.
///
/// On success the model (and any children it cascades into) carries the
/// ids assigned by the store. If a transactional save fails anywhere in the
/// tree, nothing of it is committed.
#[instrument(skip_all, fields(entity = M::TYPE_NAME))]
pub async fn save<M, C>(model: &mut M, db: &C) -> Result<()>
where
    M: Persistable,
    C: ConnectionTrait + TransactionTrait,
{
    if !M::REQUIRES_TRANSACTION {
        return model.save(db).await;
    }

    let txn = begin(db).await?;
    let outcome = model.save(&txn).await;
    finish(txn, outcome).await
}

/// Loads `model` by its id, mirroring [`save`]'s choice of transaction.
#[instrument(skip_all, fields(entity = M::TYPE_NAME))]
pub async fn load<M, C>(model: &mut M, db: &C) -> Result<()>
where
    M: Persistable,
    C: ConnectionTrait + TransactionTrait,
{
    if !M::REQUIRES_TRANSACTION {
        return model.load(db).await;
    }

    let txn = begin(db).await?;
    let outcome = model.load(&txn).await;
    finish(txn, outcome).await
}

/// Rewrites `model`'s row. Always runs directly and never cascades.
#[instrument(skip_all, fields(entity = M::TYPE_NAME))]
pub async fn update<M, C>(model: &M, db: &C) -> Result<()>
where
    M: Persistable,
    C: ConnectionTrait,
{
    model.update(db).await
}

/// Deletes the row of type `M` with `id`.
///
/// Descendants are removed by the store's foreign-key cascade.
#[instrument(skip(db), fields(entity = M::TYPE_NAME))]
pub async fn delete<M, C>(id: i64, db: &C) -> Result<()>
where
    M: Persistable,
    C: ConnectionTrait,
{
    let statement = Query::delete()
        .from_table(Alias::new(M::TABLE_NAME))
        .and_where(Expr::col(Alias::new("id")).eq(id))
        .to_owned();

    let result = db
        .execute(db.get_database_backend().build(&statement))
        .await
        .map_err(|e| {
            StoreError::storage(format!("Failed to delete {} with id {id}", M::TYPE_NAME), e)
        })?;

    if result.rows_affected() == 0 {
        return Err(StoreError::no_such(M::TYPE_NAME, id));
    }

    debug!(id, "deleted");
    Ok(())
}

async fn begin<C>(db: &C) -> Result<DatabaseTransaction>
where
    C: TransactionTrait,
{
    db.begin()
        .await
        .map_err(|e| StoreError::storage("Failed to begin transaction", e))
}

/// Commits on success, rolls back and hands the error on otherwise.
async fn finish<T>(txn: DatabaseTransaction, outcome: Result<T>) -> Result<T> {
    match outcome {
        Ok(value) => {
            txn.commit()
                .await
                .map_err(|e| StoreError::storage("Failed to commit transaction", e))?;
            Ok(value)
        }
        Err(err) => {
            warn!(status = err.status(), "rolling back transaction");
            if let Err(rollback) = txn.rollback().await {
                error!(error = %rollback, cause = %err, "Failed to roll back transaction");
                return Err(StoreError::storage("Failed to roll back transaction", rollback));
            }
            Err(err)
        }
    }
}

/// Serde helper: ids and parent references are omitted while unset.
pub(crate) fn is_unset(id: &i64) -> bool {
    *id == 0
}
