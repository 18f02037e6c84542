//! SpatiaLite extension loading.

use std::path::Path;

use log::debug;
use rusqlite::Connection;

use crate::error::StoreError;

/// Module names `mod_spatialite` ships under on the supported platforms.
const EXT_NAMES: &[&str] = &[
    "mod_spatialite",       // linux
    "mod_spatialite.so",    // linux
    "mod_spatialite.dylib", // macOS
];

/// Opens (or creates) the database at `path` with the SpatiaLite extension
/// loaded.
///
/// When `extension` is given it is loaded from that exact path; otherwise
/// the well-known module names are tried in order. Extension loading is
/// re-disabled before the connection is handed out.
///
/// # Errors
///
/// Returns [`StoreError::ExtensionLoad`] when no candidate loads, or
/// [`StoreError::Sql`] when the database file itself cannot be opened.
pub fn open_spatialite(path: &Path, extension: Option<&Path>) -> Result<Connection, StoreError> {
    let conn = Connection::open(path)?;
    load_spatialite(&conn, extension)?;
    Ok(conn)
}

fn load_spatialite(conn: &Connection, extension: Option<&Path>) -> Result<(), StoreError> {
    unsafe { conn.load_extension_enable() }?;
    let loaded = try_load(conn, extension);
    conn.load_extension_disable()?;

    if loaded {
        Ok(())
    } else {
        let tried = match extension {
            Some(path) => path.display().to_string(),
            None => EXT_NAMES.join(", "),
        };
        Err(StoreError::ExtensionLoad { tried })
    }
}

fn try_load(conn: &Connection, extension: Option<&Path>) -> bool {
    match extension {
        Some(path) => unsafe { conn.load_extension(path, None) }.is_ok(),
        None => EXT_NAMES.iter().any(|name| {
            let ok = unsafe { conn.load_extension(name, None) }.is_ok();
            if ok {
                debug!("Loaded SpatiaLite extension module '{name}'");
            }
            ok
        }),
    }
}

/// Returns `true` when the SpatiaLite extension can be loaded on this
/// machine.
///
/// Used by tests and callers that want to degrade gracefully instead of
/// failing mid-import.
#[must_use]
pub fn spatialite_available() -> bool {
    let Ok(conn) = Connection::open_in_memory() else {
        return false;
    };
    load_spatialite(&conn, None).is_ok()
}
