pub mod errors;
pub mod models;

use log::{error, info};
use rusqlite::{params, Connection, OptionalExtension};
use crate::manager_db::errors::DBError;
use crate::manager_db::models::Location;

/// Persistent store for users' last known locations
pub struct DB {
    db_conn: Connection,
}

impl DB {

    /// Creates a new instance of DB
    ///
    /// # Arguments
    ///
    /// * 'db_path' - full path to db file, ":memory:" gives a transient store
    pub fn new(db_path: &str) -> Result<Self, DBError> {
        let db_conn = Connection::open(db_path)?;
        db_conn.execute(
           "CREATE TABLE IF NOT EXISTS user_locations (
                chat_id integer primary key,
                location_data text not null
           )",
           [],
        )?;

        info!("location store opened at {}", db_path);

        Ok(DB { db_conn })
    }

    /// Returns the stored location for a chat, if any.
    ///
    /// A stored document that can't be decoded is logged and treated as absent
    /// so that the user simply gets asked for a new location.
    ///
    /// # Arguments
    ///
    /// * 'chat_id' - chat (user) identifier
    pub fn get_location(&self, chat_id: i64) -> Result<Option<Location>, DBError> {
        let json: Option<String> = self.db_conn
            .query_row(
                "SELECT location_data FROM user_locations WHERE chat_id = ?1",
                params![chat_id],
                |row| row.get(0),
            )
            .optional()?;

        match json {
            Some(json) => match serde_json::from_str::<Location>(&json) {
                Ok(location) => Ok(Some(location)),
                Err(e) => {
                    error!("failed to decode stored location for {}: {}", chat_id, e);
                    Ok(None)
                }
            },
            None => Ok(None),
        }
    }

    /// Inserts or replaces the location for a chat
    ///
    /// # Arguments
    ///
    /// * 'chat_id' - chat (user) identifier
    /// * 'location' - location to store
    pub fn save_location(&self, chat_id: i64, location: &Location) -> Result<(), DBError> {
        let json = serde_json::to_string(location)?;

        self.db_conn.execute(
            "INSERT INTO user_locations (chat_id, location_data) VALUES (?1, ?2)
                ON CONFLICT (chat_id) DO UPDATE SET location_data = ?2",
            params![chat_id, json],
        )?;

        Ok(())
    }

    /// Deletes the location for a chat, deleting a missing location is not an error
    ///
    /// # Arguments
    ///
    /// * 'chat_id' - chat (user) identifier
    pub fn delete_location(&self, chat_id: i64) -> Result<(), DBError> {
        self.db_conn.execute(
            "DELETE FROM user_locations WHERE chat_id = ?1",
            params![chat_id],
        )?;

        Ok(())
    }
}
