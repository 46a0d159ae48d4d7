//! Activity log transformer: logs (+ song catalog) → `users`, `time`, `songplays`

use crate::config::TransformSettings;
use crate::engine::sql::quote_literal;
use crate::engine::EtlContext;
use crate::error::Result;
use crate::schema::{LOG_RECORD, SONGPLAYS, SONG_RECORD, TIME, USERS};
use crate::storage::OutputStore;
use crate::transform::{write_output_table, TableSummary, TimestampRule};
use crate::types::JoinKey;

/// View over the raw log records
pub const LOG_VIEW: &str = "log_records";

/// Log records with a derived `start_time`
pub const EVENTS_VIEW: &str = "log_events";

/// Independent re-load of the song catalog for the songplays join
pub const CATALOG_VIEW: &str = "catalog_songs";

/// Derives the `users` and `time` dimensions and the `songplays` fact table
pub struct ActivityLogTransformer<'a> {
    context: &'a EtlContext,
    output: &'a OutputStore,
    settings: &'a TransformSettings,
}

impl<'a> ActivityLogTransformer<'a> {
    /// Create a transformer over a shared context and output store
    pub fn new(
        context: &'a EtlContext,
        output: &'a OutputStore,
        settings: &'a TransformSettings,
    ) -> Self {
        Self {
            context,
            output,
            settings,
        }
    }

    /// Load the logs matching `log_pattern`, join them against the songs
    /// matching `song_pattern`, and write the three tables
    pub async fn run(&self, log_pattern: &str, song_pattern: &str) -> Result<Vec<TableSummary>> {
        tracing::info!("Reading log data from {}", log_pattern);
        let files = self
            .context
            .register_json_source(LOG_VIEW, &LOG_RECORD, log_pattern)?;
        tracing::info!("Found {} log data file(s)", files);

        let users = write_output_table(self.context, self.output, &USERS, &users_query()).await?;

        tracing::debug!("start_time rule: {}", self.settings.timezone);
        self.context
            .execute_batch(&events_view_sql(&self.settings.timezone))?;
        let time = write_output_table(self.context, self.output, &TIME, &time_query()).await?;

        tracing::info!("Re-reading song data from {} for songplays", song_pattern);
        self.context
            .register_json_source(CATALOG_VIEW, &SONG_RECORD, song_pattern)?;
        let songplays = write_output_table(
            self.context,
            self.output,
            &SONGPLAYS,
            &songplays_query(self.settings.join_key, self.settings.songplay_page.as_deref()),
        )
        .await?;

        if songplays.rows == 0 {
            tracing::debug!("songplays join matched no log records");
        }

        Ok(vec![users, time, songplays])
    }
}

/// One row per `userId`; the most recent record by `ts` wins
pub fn users_query() -> String {
    format!(
        "SELECT \"userId\", \"firstName\", \"lastName\", gender, level FROM {LOG_VIEW} \
         QUALIFY row_number() OVER (\
         PARTITION BY \"userId\" ORDER BY ts DESC NULLS LAST, filename DESC, level) = 1"
    )
}

/// View adding `start_time` to every log record that has a `ts`
///
/// `time` and `songplays` both read `start_time` from here, so the two
/// tables agree for every log record.
pub fn events_view_sql(rule: &TimestampRule) -> String {
    format!(
        "CREATE OR REPLACE TEMP VIEW {EVENTS_VIEW} AS \
         SELECT *, {} AS start_time FROM {LOG_VIEW} WHERE ts IS NOT NULL;",
        rule.sql_expr("ts")
    )
}

/// Calendar decomposition of every distinct `start_time`
///
/// `week` is the ISO week of the year.
pub fn time_query() -> String {
    format!(
        "SELECT DISTINCT start_time, \
         hour(start_time) AS hour, \
         day(start_time) AS day, \
         weekofyear(start_time) AS week, \
         month(start_time) AS month, \
         year(start_time) AS year \
         FROM {EVENTS_VIEW}"
    )
}

/// Log records joined to catalog songs
///
/// With [`JoinKey::Title`] a log record matches every song sharing its title,
/// producing one songplay per match. `songplay_id` numbers the joined rows
/// from 0 in `start_time` order.
pub fn songplays_query(join_key: JoinKey, page: Option<&str>) -> String {
    let mut on = "e.song = s.title".to_string();
    if join_key == JoinKey::TitleAndArtist {
        on.push_str(" AND e.artist = s.artist_name");
    }

    let filter = page
        .map(|p| format!(" WHERE e.page = {}", quote_literal(p)))
        .unwrap_or_default();

    format!(
        "SELECT \
         row_number() OVER (\
         ORDER BY e.start_time, e.\"sessionId\", e.\"userId\", s.song_id, s.artist_id\
         ) - 1 AS songplay_id, \
         s.artist_id AS artist_id, \
         e.\"userId\" AS user_id, \
         e.level AS level, \
         s.song_id AS song_id, \
         e.start_time AS start_time, \
         e.\"sessionId\" AS session_id, \
         e.location AS location, \
         e.\"userAgent\" AS user_agent, \
         month(e.start_time) AS month, \
         year(e.start_time) AS year \
         FROM {EVENTS_VIEW} AS e \
         JOIN {CATALOG_VIEW} AS s ON {on}{filter}"
    )
}
