#![cfg(all(feature = "sqlite", feature = "migration"))]

mod common;

use sea_orm::{EntityTrait, PaginatorTrait};
use trail_store::entity::Users;
use trail_store::{authenticate, ensure_default_administrator, load, save, update, Session, User};

use common::setup;

#[tokio::test]
async fn saved_user_authenticates() {
    let db = setup().await;

    let mut user = User::new("hiker", "s3cret", false);
    save(&mut user, &db).await.unwrap();
    assert_ne!(user.id, 0);

    let found = authenticate("hiker", "s3cret", &db).await.unwrap().unwrap();
    assert_eq!(found, user);

    assert!(authenticate("hiker", "wrong", &db).await.unwrap().is_none());
    assert!(authenticate("nobody", "s3cret", &db).await.unwrap().is_none());
}

#[tokio::test]
async fn usernames_are_unique() {
    let db = setup().await;

    save(&mut User::new("hiker", "a", false), &db).await.unwrap();
    let err = save(&mut User::new("hiker", "b", false), &db)
        .await
        .unwrap_err();

    assert!(err.is_storage_failure());
}

#[tokio::test]
async fn load_and_update_by_id() {
    let db = setup().await;

    let mut user = User::new("hiker", "old", false);
    save(&mut user, &db).await.unwrap();

    user.is_administrator = true;
    user.set_password("new");
    update(&user, &db).await.unwrap();

    let mut loaded = User::with_id(user.id);
    load(&mut loaded, &db).await.unwrap();
    assert!(loaded.is_administrator);
    assert!(loaded.is_correct_password("new"));
    assert!(!loaded.is_correct_password("old"));
}

#[tokio::test]
async fn update_from_json_keeps_password() {
    let db = setup().await;

    let mut user = User::new("hiker", "pw", false);
    save(&mut user, &db).await.unwrap();

    let promoted: User = serde_json::from_value(serde_json::json!({
        "id": user.id,
        "username": "hiker",
        "isAdministrator": true,
    }))
    .unwrap();
    update(&promoted, &db).await.unwrap();

    let found = authenticate("hiker", "pw", &db).await.unwrap().unwrap();
    assert_eq!(found.id, user.id);
    assert!(found.is_administrator);
}

#[tokio::test]
async fn load_by_unknown_username_is_not_found() {
    let db = setup().await;

    let err = User::load_by_username("ghost", &db).await.unwrap_err();
    assert!(err.is_not_found());
}

#[tokio::test]
async fn default_administrator_is_upserted() {
    let db = setup().await;

    ensure_default_administrator(&db).await.unwrap();
    ensure_default_administrator(&db).await.unwrap();

    assert_eq!(Users::find().count(&db).await.unwrap(), 1);

    let admin = authenticate("admin", "admin", &db).await.unwrap().unwrap();
    assert!(admin.is_administrator);

    let mut session = Session::new();
    session.login(&admin);
    assert_eq!(session.user_id(), Some(admin.id));
    assert!(session.is_administrator());
}
