use std::net::SocketAddr;
use std::path::Path;

use tracing_subscriber::EnvFilter;

use crate::api;
use crate::error::{Result, SkilltrackError};
use crate::store::SqliteStore;

pub fn handle_init(db: &str) -> Result<()> {
    let _store = SqliteStore::open(Path::new(db))?;
    println!("Initialized database at {}", db);
    Ok(())
}

pub fn handle_user_add(db: &str, username: &str) -> Result<()> {
    let store = SqliteStore::open(Path::new(db))?;

    if username.trim().is_empty() {
        return Err(SkilltrackError::Validation(
            "username must not be empty".to_string(),
        ));
    }
    if store.username_exists(username)? {
        return Err(SkilltrackError::Validation(format!(
            "user '{}' already exists",
            username
        )));
    }

    let id = store.add_user(username)?;
    println!("Created user {} ({})", username, id);
    Ok(())
}

pub fn handle_serve(db: &str, bind: &str) -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("skilltrack=info")),
        )
        .init();

    let addr: SocketAddr = bind
        .parse()
        .map_err(|_| SkilltrackError::Validation(format!("invalid bind address '{}'", bind)))?;

    let store = SqliteStore::open(Path::new(db))?;

    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(api::serve(store, addr))
}
