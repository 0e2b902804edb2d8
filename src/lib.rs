//! # Trail Store
//!
//! Persistence and session state for a hiking trail service, built on
//! [Sea-ORM](https://crates.io/crates/sea-orm).
//!
//! Trails are organised as a tree: a [`Bundle`] owns [`Path`]s, a path owns
//! [`Place`]s, and a place carries [`Media`]. The crate stores that tree in
//! the relational tables `bundles`, `paths` and `places`, alongside a `users`
//! table for login accounts.
//!
//! ## Features
//!
//! - One persistence contract, [`Persistable`], implemented by every entity
//! - Generic [`save`], [`load`], [`update`] and [`delete`] that pick a
//!   transaction when the entity asks for one
//! - Cascading save and load of whole bundles, committed or rolled back as one
//! - A compact little-endian codec for coordinates stored as blobs ([`geo`])
//! - A mutex-guarded in-memory [`SessionStore`] that hands out copies
//!
//! ## Quick Start
//!
//! ```no_run
//! use trail_store::{connect, load, save, Bundle, GeoCoordinate, Path, StoreConfig};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! // Connect and create the tables if needed
//! let db = connect(&StoreConfig::from_env()?).await?;
//!
//! // Save a bundle together with its paths
//! let mut ridge = Path::new("Ridge");
//! ridge.polyline = vec![GeoCoordinate::new(46.5, 7.9), GeoCoordinate::new(46.6, 8.0)];
//!
//! let mut alps = Bundle::new("Alps");
//! alps.paths.push(ridge);
//! save(&mut alps, &db).await?;
//!
//! // Load it back by id
//! let mut loaded = Bundle::with_id(alps.id);
//! load(&mut loaded, &db).await?;
//! assert_eq!(loaded.paths.len(), 1);
//! # Ok(())
//! # }
//! ```
//!
//! ## Session Management
//!
//! ```
//! use trail_store::{Session, SessionStore};
//!
//! let store = SessionStore::new();
//!
//! // Create a session at login
//! let mut session = Session::new();
//! session.set("userId", 7).unwrap();
//! store.create(session.clone());
//!
//! // Every request works on its own copy
//! let mut copy = store.get(session.id()).unwrap();
//! assert_eq!(copy.get::<i64>("userId"), Some(7));
//! copy.set("isAdministrator", true).unwrap();
//! store.save(copy).unwrap();
//!
//! // Remove it at logout
//! store.delete(session.id());
//! assert!(store.get(session.id()).is_none());
//! ```

mod config;
mod database;
pub mod entity;
pub mod error;
pub mod geo;
#[cfg(feature = "migration")]
pub mod migration;
pub mod model;
pub mod session;

/// Connection settings, read from the environment or built by hand.
pub use config::{StoreConfig, DEFAULT_DATABASE_URL};

/// Opens the database and prepares the schema.
pub use database::connect;

/// Error taxonomy shared by every storage operation.
pub use error::{ApiError, Result, StoreError};

/// Coordinate type and its blob codec.
pub use geo::{decode_polyline, encode_polyline, GeoCoordinate, GeoError};

/// Domain types and the persistence orchestrator.
pub use model::{
    authenticate, delete, ensure_default_administrator, load, load_bundles, load_paths,
    load_places, save, update, Bundle, Media, Path, Persistable, Place, User,
};

/// In-memory session state.
pub use session::{Session, SessionError, SessionStore};
