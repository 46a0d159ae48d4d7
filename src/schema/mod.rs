//! Schema module
//!
//! Fixed schemas of the two raw JSON datasets and the definitions of the
//! five star-schema output tables (columns, unique key, partition columns).

mod tables;
mod types;

pub use tables::{
    table_by_name, ARTISTS, LOG_RECORD, SONGPLAYS, SONGS, SONG_RECORD, STAR_SCHEMA, TIME, USERS,
};
pub use types::{ColumnDef, ColumnType, RawSchema, TableDef};

#[cfg(test)]
mod tests;
