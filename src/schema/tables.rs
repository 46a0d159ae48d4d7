//! Raw input schemas and the output star schema

use super::types::{ColumnDef, ColumnType, RawSchema, TableDef};

use ColumnType::{Bigint, Double, Integer, Varchar};

// ============================================================================
// Raw Inputs
// ============================================================================

/// One song metadata record (`song-data/**/*.json`)
pub const SONG_RECORD: RawSchema = RawSchema {
    dataset: "song_data",
    columns: &[
        ColumnDef::new("num_songs", Bigint),
        ColumnDef::new("artist_id", Varchar),
        ColumnDef::new("artist_latitude", Double),
        ColumnDef::new("artist_longitude", Double),
        ColumnDef::new("artist_location", Varchar),
        ColumnDef::new("artist_name", Varchar),
        ColumnDef::new("song_id", Varchar),
        ColumnDef::new("title", Varchar),
        ColumnDef::new("duration", Double),
        ColumnDef::new("year", Integer),
    ],
};

/// One user activity event (`log_data/**/*.json`)
pub const LOG_RECORD: RawSchema = RawSchema {
    dataset: "log_data",
    columns: &[
        ColumnDef::new("artist", Varchar),
        ColumnDef::new("auth", Varchar),
        ColumnDef::new("firstName", Varchar),
        ColumnDef::new("gender", Varchar),
        ColumnDef::new("itemInSession", Bigint),
        ColumnDef::new("lastName", Varchar),
        ColumnDef::new("length", Double),
        ColumnDef::new("level", Varchar),
        ColumnDef::new("location", Varchar),
        ColumnDef::new("method", Varchar),
        ColumnDef::new("page", Varchar),
        ColumnDef::new("registration", Double),
        ColumnDef::new("sessionId", Bigint),
        ColumnDef::new("song", Varchar),
        ColumnDef::new("status", Bigint),
        ColumnDef::new("ts", Bigint),
        ColumnDef::new("userAgent", Varchar),
        ColumnDef::new("userId", Varchar),
    ],
};

// ============================================================================
// Star Schema
// ============================================================================

/// `songs` dimension
pub const SONGS: TableDef = TableDef {
    name: "songs",
    columns: &["song_id", "title", "artist_id", "year", "duration"],
    key: "song_id",
    partition_by: &["year", "artist_id"],
};

/// `artists` dimension
pub const ARTISTS: TableDef = TableDef {
    name: "artists",
    columns: &[
        "artist_id",
        "artist_name",
        "artist_location",
        "artist_latitude",
        "artist_longitude",
    ],
    key: "artist_id",
    partition_by: &[],
};

/// `users` dimension
pub const USERS: TableDef = TableDef {
    name: "users",
    columns: &["userId", "firstName", "lastName", "gender", "level"],
    key: "userId",
    partition_by: &[],
};

/// `time` dimension
pub const TIME: TableDef = TableDef {
    name: "time",
    columns: &["start_time", "hour", "day", "week", "month", "year"],
    key: "start_time",
    partition_by: &["year", "month"],
};

/// `songplays` fact table
pub const SONGPLAYS: TableDef = TableDef {
    name: "songplays",
    columns: &[
        "songplay_id",
        "artist_id",
        "user_id",
        "level",
        "song_id",
        "start_time",
        "session_id",
        "location",
        "user_agent",
        "month",
        "year",
    ],
    key: "songplay_id",
    partition_by: &["year", "month"],
};

/// All output tables in write order
pub static STAR_SCHEMA: [TableDef; 5] = [SONGS, ARTISTS, USERS, TIME, SONGPLAYS];

/// Find an output table by name
pub fn table_by_name(name: &str) -> Option<&'static TableDef> {
    STAR_SCHEMA.iter().find(|t| t.name == name)
}
