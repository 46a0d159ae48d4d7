//! Song catalog transformer: song metadata → `songs`, `artists`

use crate::engine::EtlContext;
use crate::error::Result;
use crate::schema::{ARTISTS, SONGS, SONG_RECORD};
use crate::storage::OutputStore;
use crate::transform::{write_output_table, TableSummary};

/// View over the raw song metadata records
pub const SONG_VIEW: &str = "song_records";

/// Derives the `songs` and `artists` dimensions
pub struct SongCatalogTransformer<'a> {
    context: &'a EtlContext,
    output: &'a OutputStore,
}

impl<'a> SongCatalogTransformer<'a> {
    /// Create a transformer over a shared context and output store
    pub fn new(context: &'a EtlContext, output: &'a OutputStore) -> Self {
        Self { context, output }
    }

    /// Load every record matching `song_pattern` and write both tables
    pub async fn run(&self, song_pattern: &str) -> Result<Vec<TableSummary>> {
        tracing::info!("Reading song data from {}", song_pattern);
        let files = self
            .context
            .register_json_source(SONG_VIEW, &SONG_RECORD, song_pattern)?;
        tracing::info!("Found {} song data file(s)", files);

        let songs = write_output_table(self.context, self.output, &SONGS, &songs_query()).await?;
        let artists =
            write_output_table(self.context, self.output, &ARTISTS, &artists_query()).await?;

        Ok(vec![songs, artists])
    }
}

/// One row per `song_id`; the first record by source file wins
pub fn songs_query() -> String {
    format!(
        "SELECT song_id, title, artist_id, year, duration FROM {SONG_VIEW} \
         QUALIFY row_number() OVER (\
         PARTITION BY song_id ORDER BY filename, title, artist_id, year, duration) = 1"
    )
}

/// One row per `artist_id`; the first record by source file wins
pub fn artists_query() -> String {
    format!(
        "SELECT artist_id, artist_name, artist_location, artist_latitude, artist_longitude \
         FROM {SONG_VIEW} \
         QUALIFY row_number() OVER (\
         PARTITION BY artist_id ORDER BY filename, artist_name, artist_location, \
         artist_latitude, artist_longitude) = 1"
    )
}
