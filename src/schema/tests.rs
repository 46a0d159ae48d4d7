//! Schema definition tests

use super::*;

#[test]
fn test_song_record_has_projected_columns() {
    for table in [&SONGS, &ARTISTS] {
        for column in table.columns {
            assert!(
                SONG_RECORD.column(column).is_some(),
                "{} column {column} missing from song record",
                table.name
            );
        }
    }
}

#[test]
fn test_log_record_has_user_columns() {
    for column in USERS.columns {
        assert!(LOG_RECORD.column(column).is_some(), "missing {column}");
    }
    assert_eq!(
        LOG_RECORD.column("ts").map(|c| c.column_type),
        Some(ColumnType::Bigint)
    );
    assert_eq!(
        LOG_RECORD.column("userId").map(|c| c.column_type),
        Some(ColumnType::Varchar)
    );
}

#[test]
fn test_json_columns_struct() {
    let rendered = SONG_RECORD.json_columns_struct();
    assert!(rendered.starts_with("{'num_songs': 'BIGINT', 'artist_id': 'VARCHAR'"));
    assert!(rendered.ends_with("'year': 'INTEGER'}"));
}

#[test]
fn test_empty_select_is_typed_and_has_filename() {
    let sql = LOG_RECORD.empty_select();
    assert!(sql.contains("CAST(NULL AS BIGINT) AS \"ts\""));
    assert!(sql.contains("CAST(NULL AS VARCHAR) AS filename"));
    assert!(sql.ends_with("WHERE false"));
}

#[test]
fn test_partition_columns_are_table_columns() {
    for table in &STAR_SCHEMA {
        for column in table.partition_by {
            assert!(table.columns.contains(column), "{}.{column}", table.name);
        }
        assert!(table.columns.contains(&table.key), "{} key", table.name);
    }
}

#[test]
fn test_file_columns_exclude_partitions() {
    assert_eq!(SONGS.file_columns(), vec!["song_id", "title", "duration"]);
    assert_eq!(TIME.file_columns(), vec!["start_time", "hour", "day", "week"]);
    assert_eq!(ARTISTS.file_columns().len(), ARTISTS.columns.len());
}

#[test]
fn test_table_lookup_and_dir_name() {
    let table = table_by_name("songplays").unwrap();
    assert_eq!(table.dir_name(), "songplays.parquet");
    assert!(table.is_partitioned());
    assert!(!USERS.is_partitioned());
    assert!(table_by_name("staging_events").is_none());
}

#[test]
fn test_select_list_quotes_columns() {
    assert_eq!(
        USERS.select_list(),
        "\"userId\", \"firstName\", \"lastName\", \"gender\", \"level\""
    );
}
