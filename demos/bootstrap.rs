//! Bootstrap example for trail-store
//!
//! Connects to the configured database, creates the tables, makes sure the
//! default administrator exists, then saves and reloads a small bundle and
//! walks a session through login and logout.
//!
//! # Running the example
//!
//! 1. Optionally point `DATABASE_URL` at a database (defaults to a local
//!    SQLite file):
//!    ```bash
//!    export DATABASE_URL=sqlite://hiking_trails.sqlite3?mode=rwc
//!    ```
//! 2. Run the example:
//!    ```bash
//!    RUST_LOG=trail_store=debug cargo run --example bootstrap
//!    ```

use dotenvy::dotenv;
use tracing::{info, Level};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};
use trail_store::{
    authenticate, connect, ensure_default_administrator, load, save, Bundle, GeoCoordinate, Path,
    Place, Session, SessionStore, StoreConfig,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing for better logging
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::from_default_env().add_directive(Level::INFO.into()))
        .init();

    // Load environment variables from .env file if present
    dotenv().ok();

    let config = StoreConfig::from_env()?;
    info!("Connecting to database: {}", config.database_url);

    let db = connect(&config).await?;
    ensure_default_administrator(&db).await?;

    // Save a bundle with one path and two places in a single transaction
    let mut ridge = Path::new("Ridge");
    ridge.length = "12 km".to_string();
    ridge.duration = "4 h".to_string();
    ridge.polyline = vec![GeoCoordinate::new(46.5, 7.9), GeoCoordinate::new(46.6, 8.0)];
    ridge.places = vec![
        Place::new("Hut", GeoCoordinate::new(46.55, 7.95)),
        Place::new("Summit", GeoCoordinate::new(46.6, 8.0)),
    ];

    let mut alps = Bundle::new("Alps");
    alps.paths.push(ridge);
    save(&mut alps, &db).await?;
    info!(bundle_id = alps.id, "Saved bundle");

    let mut loaded = Bundle::with_id(alps.id);
    load(&mut loaded, &db).await?;
    println!("{}", serde_json::to_string_pretty(&loaded)?);

    // Log the administrator in and out again
    let sessions = SessionStore::new();
    if let Some(admin) = authenticate("admin", "admin", &db).await? {
        let mut session = Session::new();
        session.login(&admin);
        let session_id = session.id().to_string();
        sessions.create(session);

        let current = sessions.get_or_empty(&session_id);
        info!(
            user_id = ?current.user_id(),
            administrator = current.is_administrator(),
            "Logged in"
        );

        current.delete(&sessions);
        info!(active_sessions = sessions.len(), "Logged out");
    }

    Ok(())
}
