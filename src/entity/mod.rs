//! Database entity models for trail-store.
//!
//! This module contains the Sea-ORM entity definitions that map the trail
//! graph onto its relational tables. They are storage rows only: the domain
//! types in [`crate::model`] own the nested structure and the coordinate
//! blobs are decoded there.
//!
//! Ownership runs `bundles` → `paths` → `places`, each child holding a
//! foreign key to its parent with `ON UPDATE CASCADE ON DELETE CASCADE`.
//! `users` stands alone.

/// Bundle rows: a named collection of paths.
pub mod bundle;

/// Path rows: a route polyline owned by a bundle.
pub mod path;

/// Place rows: a point of interest owned by a path.
pub mod place;

/// User rows: login credentials and the administrator flag.
pub mod user;

pub use bundle::Entity as Bundles;
pub use path::Entity as Paths;
pub use place::Entity as Places;
pub use user::Entity as Users;
