#![allow(dead_code)]

use sea_orm::{ConnectionTrait, DatabaseConnection, EntityTrait, PaginatorTrait};
use trail_store::entity::{Bundles, Paths, Places};
use trail_store::{connect, GeoCoordinate, Place, StoreConfig};

/// A fresh in-memory database with the trail tables in place.
///
/// One pooled connection that is never recycled, so every query sees the
/// same in-memory database.
pub async fn setup() -> DatabaseConnection {
    let config = StoreConfig::new("sqlite::memory:")
        .with_max_connections(1)
        .with_idle_timeout(None)
        .with_max_lifetime(None);

    connect(&config).await.expect("in-memory database")
}

/// Makes every insert of a path named `name` fail inside the database.
pub async fn reject_paths_named(db: &DatabaseConnection, name: &str) {
    db.execute_unprepared(&format!(
        "CREATE TRIGGER reject_path BEFORE INSERT ON paths \
         WHEN NEW.name = '{name}' \
         BEGIN SELECT RAISE(ABORT, 'rejected by test trigger'); END;"
    ))
    .await
    .expect("create trigger");
}

/// Row counts of (bundles, paths, places).
pub async fn row_counts(db: &DatabaseConnection) -> (u64, u64, u64) {
    (
        Bundles::find().count(db).await.unwrap(),
        Paths::find().count(db).await.unwrap(),
        Places::find().count(db).await.unwrap(),
    )
}

pub fn place(name: &str, lat: f32, lng: f32) -> Place {
    let mut place = Place::new(name, GeoCoordinate::new(lat, lng));
    place.radius = 25;
    place
}
