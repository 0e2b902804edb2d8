#![cfg(all(feature = "sqlite", feature = "migration"))]

mod common;

use sea_orm::{ActiveModelTrait, Set};
use trail_store::entity::{path, place as place_row};
use trail_store::{
    delete, load, save, update, Bundle, GeoCoordinate, Path, Persistable, Place, StoreError,
    User,
};

use common::{place, setup};

async fn expect_not_found<M>(db: &sea_orm::DatabaseConnection, mut model: M)
where
    M: Persistable,
{
    let err = load(&mut model, db).await.unwrap_err();
    assert!(err.is_not_found(), "load {}: {err}", M::TYPE_NAME);

    let err = update(&model, db).await.unwrap_err();
    assert!(err.is_not_found(), "update {}: {err}", M::TYPE_NAME);

    let err = delete::<M, _>(999, db).await.unwrap_err();
    assert!(err.is_not_found(), "delete {}: {err}", M::TYPE_NAME);
    assert_eq!(
        err.public_message(),
        format!("No {} with id 999 exist", M::TYPE_NAME)
    );
}

#[tokio::test]
async fn unknown_ids_are_not_found_for_every_type() {
    let db = setup().await;

    expect_not_found(&db, Bundle::with_id(999)).await;
    expect_not_found(&db, Path::with_id(999)).await;
    expect_not_found(&db, Place::with_id(999)).await;
    expect_not_found(&db, User::with_id(999)).await;
}

#[test]
fn table_names_match_entities() {
    use sea_orm::EntityName;
    use trail_store::entity::{Bundles, Paths, Places, Users};

    assert_eq!(Bundle::TABLE_NAME, Bundles.table_name());
    assert_eq!(Path::TABLE_NAME, Paths.table_name());
    assert_eq!(Place::TABLE_NAME, Places.table_name());
    assert_eq!(User::TABLE_NAME, Users.table_name());

    assert!(Bundle::REQUIRES_TRANSACTION);
    assert!(Path::REQUIRES_TRANSACTION);
    assert!(!Place::REQUIRES_TRANSACTION);
    assert!(!User::REQUIRES_TRANSACTION);
}

#[tokio::test]
async fn standalone_place_round_trip() {
    let db = setup().await;

    let mut bundle = Bundle::new("Alps");
    bundle.paths.push(Path::new("Ridge"));
    save(&mut bundle, &db).await.unwrap();
    let path_id = bundle.paths[0].id;

    let mut hut = place("Hut", 46.55, 7.95);
    hut.info = "Open in summer".into();
    hut.path_id = path_id;
    save(&mut hut, &db).await.unwrap();
    assert_ne!(hut.id, 0);

    let mut loaded = Place::with_id(hut.id);
    load(&mut loaded, &db).await.unwrap();
    assert_eq!(loaded, hut);

    hut.radius = 100;
    hut.position = GeoCoordinate::new(46.56, 7.96);
    update(&hut, &db).await.unwrap();

    load(&mut loaded, &db).await.unwrap();
    assert_eq!(loaded.radius, 100);
    assert_eq!(loaded.position, GeoCoordinate::new(46.56, 7.96));

    delete::<Place, _>(hut.id, &db).await.unwrap();
    assert!(load(&mut loaded, &db).await.unwrap_err().is_not_found());
}

#[tokio::test]
async fn path_with_unknown_bundle_is_rejected_by_foreign_key() {
    let db = setup().await;

    let mut orphan = Path::new("Nowhere");
    orphan.bundle_id = 42;
    orphan.places = vec![place("Lost", 0.0, 0.0)];

    let err = save(&mut orphan, &db).await.unwrap_err();
    assert!(err.is_storage_failure());
    assert_eq!(common::row_counts(&db).await, (0, 0, 0));
}

#[tokio::test]
async fn ragged_polyline_is_a_storage_failure() {
    let db = setup().await;

    let mut bundle = Bundle::new("Alps");
    save(&mut bundle, &db).await.unwrap();

    let row = path::ActiveModel {
        name: Set("Corrupt".into()),
        info: Set(String::new()),
        length: Set(String::new()),
        duration: Set(String::new()),
        image_url: Set(String::new()),
        polyline: Set(vec![0u8; 7]),
        bundle_id: Set(bundle.id),
        ..Default::default()
    }
    .insert(&db)
    .await
    .unwrap();

    let mut corrupt = Path::with_id(row.id);
    let err = load(&mut corrupt, &db).await.unwrap_err();
    assert!(matches!(err, StoreError::StorageFailure { .. }));
    assert_eq!(err.to_api_error().message, "Internal Server Error");

    // The bundle that owns it cannot be hydrated either.
    let mut owner = Bundle::with_id(bundle.id);
    assert!(load(&mut owner, &db).await.unwrap_err().is_storage_failure());
}

#[tokio::test]
async fn bad_position_blob_is_a_storage_failure() {
    let db = setup().await;

    let mut bundle = Bundle::new("Alps");
    bundle.paths.push(Path::new("Ridge"));
    save(&mut bundle, &db).await.unwrap();

    let row = place_row::ActiveModel {
        name: Set("Double".into()),
        info: Set(String::new()),
        radius: Set(0),
        position: Set(vec![0u8; 16]),
        path_id: Set(bundle.paths[0].id),
        ..Default::default()
    }
    .insert(&db)
    .await
    .unwrap();

    let mut double = Place::with_id(row.id);
    assert!(load(&mut double, &db).await.unwrap_err().is_storage_failure());
}
