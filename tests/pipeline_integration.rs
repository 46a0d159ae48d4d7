//! End-to-end pipeline tests on local fixtures
//!
//! Each test lays out a miniature copy of the raw datasets in a temp
//! directory, runs the whole pipeline, and inspects the Parquet output with
//! an independent reader.

use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use parquet::file::reader::{FileReader, SerializedFileReader};
use pretty_assertions::assert_eq;
use serde_json::json;
use songplay_etl::schema::{SONGPLAYS, SONGS, STAR_SCHEMA, TIME};
use songplay_etl::{load_config_from_str, Pipeline, PipelineConfig, RunSummary};
use std::collections::BTreeMap;
use std::fs::File;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

// ============================================================================
// Fixtures
// ============================================================================

fn config_for(dir: &TempDir) -> PipelineConfig {
    let yaml = format!(
        "input_data: {}\noutput_data: {}\nengine:\n  threads: 1\n",
        dir.path().join("input").display(),
        dir.path().join("output").display()
    );
    load_config_from_str(&yaml).unwrap()
}

fn write_song(input: &Path, file: &str, song_id: &str, title: &str, artist_id: &str, year: i64) {
    let dir = input.join("song-data/A/A/A");
    std::fs::create_dir_all(&dir).unwrap();
    let record = json!({
        "num_songs": 1,
        "artist_id": artist_id,
        "artist_latitude": 35.14968,
        "artist_longitude": -90.04892,
        "artist_location": "Memphis, TN",
        "artist_name": format!("Artist {artist_id}"),
        "song_id": song_id,
        "title": title,
        "duration": 190.0,
        "year": year
    });
    std::fs::write(dir.join(file), record.to_string()).unwrap();
}

fn write_events(input: &Path, file: &str, events: &[(&str, &str, i64, &str)]) {
    let dir = input.join("log_data/2018/11");
    std::fs::create_dir_all(&dir).unwrap();
    let lines: Vec<String> = events
        .iter()
        .map(|(user_id, level, ts, song)| {
            json!({
                "artist": "Artist AR1",
                "auth": "Logged In",
                "firstName": "Lily",
                "gender": "F",
                "itemInSession": 3,
                "lastName": "Koch",
                "length": 190.0,
                "level": level,
                "location": "Chicago-Naperville-Elgin, IL-IN-WI",
                "method": "PUT",
                "page": "NextSong",
                "registration": 1_541_048_010_796.0_f64,
                "sessionId": 818,
                "song": song,
                "status": 200,
                "ts": ts,
                "userAgent": "Mozilla/5.0 (X11; Linux x86_64)",
                "userId": user_id
            })
            .to_string()
        })
        .collect();
    std::fs::write(dir.join(file), lines.join("\n")).unwrap();
}

fn standard_dataset(input: &Path) {
    let songs = [
        ("TRAAAAW128F429D538", "SOMZWCG12A8C13C480", "I Didn't Mean To", "AR1", 2004),
        ("TRAAABD128F429CF47", "SOCIWDW12AB018A1D1", "Soul Deep", "AR2", 1969),
        ("TRAAADZ128F9348C2E", "SOXVLOJ12AB0189215", "Soul Deep", "AR3", 0),
    ];
    for (track, song_id, title, artist_id, year) in songs {
        write_song(input, &format!("{track}.json"), song_id, title, artist_id, year);
    }
    write_events(
        input,
        "2018-11-12-events.json",
        &[
            ("15", "free", 1_541_990_258_796, "Soul Deep"),
            ("15", "paid", 1_542_000_000_000, "I Didn't Mean To"),
            ("29", "free", 1_543_622_400_000, "Unknown Song"),
        ],
    );
}

/// Every Parquet file under `dir`, relative, sorted
fn parquet_files(dir: &Path) -> Vec<PathBuf> {
    fn walk(root: &Path, dir: &Path, out: &mut Vec<PathBuf>) {
        for entry in std::fs::read_dir(dir).unwrap() {
            let path = entry.unwrap().path();
            if path.is_dir() {
                walk(root, &path, out);
            } else if path.extension().is_some_and(|e| e == "parquet") {
                out.push(path.strip_prefix(root).unwrap().to_path_buf());
            }
        }
    }
    let mut out = Vec::new();
    walk(dir, dir, &mut out);
    out.sort();
    out
}

fn row_count(path: &Path) -> usize {
    let reader = ParquetRecordBatchReaderBuilder::try_new(File::open(path).unwrap())
        .unwrap()
        .build()
        .unwrap();
    reader.map(|batch| batch.unwrap().num_rows()).sum()
}

fn column_names(path: &Path) -> Vec<String> {
    let reader = SerializedFileReader::new(File::open(path).unwrap()).unwrap();
    reader
        .metadata()
        .file_metadata()
        .schema_descr()
        .columns()
        .iter()
        .map(|c| c.name().to_string())
        .collect()
}

async fn run(config: &PipelineConfig) -> RunSummary {
    Pipeline::new(config.clone()).run().await.unwrap()
}

// ============================================================================
// Tests
// ============================================================================

#[tokio::test]
async fn test_full_run_writes_every_table() {
    let dir = tempfile::tempdir().unwrap();
    standard_dataset(&dir.path().join("input"));
    let config = config_for(&dir);

    let summary = run(&config).await;

    let tables: Vec<&str> = summary.tables.iter().map(|t| t.table.as_str()).collect();
    assert_eq!(tables, vec!["songs", "artists", "users", "time", "songplays"]);

    let rows: BTreeMap<&str, usize> = summary
        .tables
        .iter()
        .map(|t| (t.table.as_str(), t.rows))
        .collect();
    assert_eq!(rows["songs"], 3);
    assert_eq!(rows["artists"], 3);
    assert_eq!(rows["users"], 2);
    assert_eq!(rows["time"], 3);
    // "Soul Deep" matches two catalog songs, "I Didn't Mean To" one,
    // "Unknown Song" none
    assert_eq!(rows["songplays"], 3);

    for table in &STAR_SCHEMA {
        assert!(
            dir.path().join("output").join(table.dir_name()).is_dir(),
            "{} missing",
            table.name
        );
    }
}

#[tokio::test]
async fn test_partition_coverage() {
    let dir = tempfile::tempdir().unwrap();
    standard_dataset(&dir.path().join("input"));
    let config = config_for(&dir);
    let summary = run(&config).await;
    let output = dir.path().join("output");

    for table in [&SONGS, &TIME, &SONGPLAYS] {
        let root = output.join(table.dir_name());
        let files = parquet_files(&root);
        let mut total = 0;

        for file in &files {
            // Each file sits under one directory per partition column, in order
            let dirs: Vec<String> = file
                .parent()
                .unwrap()
                .components()
                .map(|c| c.as_os_str().to_string_lossy().into_owned())
                .collect();
            let keys: Vec<&str> = dirs
                .iter()
                .map(|d| d.split_once('=').unwrap().0)
                .collect();
            assert_eq!(keys, table.partition_by.to_vec(), "{}", file.display());

            // Partition values live in the path, not in the file
            let columns = column_names(&root.join(file));
            assert_eq!(columns, table.file_columns(), "{}", file.display());

            total += row_count(&root.join(file));
        }

        assert_eq!(total, summary.table(table.name).unwrap().rows, "{}", table.name);
    }

    assert!(output.join("time.parquet/year=2018/month=11").is_dir());
    assert!(output.join("time.parquet/year=2018/month=12").is_dir());
    assert!(output
        .join("songs.parquet/year=1969/artist_id=AR2")
        .is_dir());
}

#[tokio::test]
async fn test_songplay_id_persisted() {
    let dir = tempfile::tempdir().unwrap();
    standard_dataset(&dir.path().join("input"));
    let config = config_for(&dir);
    run(&config).await;

    let root = dir.path().join("output/songplays.parquet");
    for file in parquet_files(&root) {
        assert_eq!(column_names(&root.join(&file))[0], "songplay_id");
    }
}

#[tokio::test]
async fn test_rerun_is_byte_identical() {
    let dir = tempfile::tempdir().unwrap();
    standard_dataset(&dir.path().join("input"));
    let config = config_for(&dir);
    let output = dir.path().join("output");

    run(&config).await;
    let first: BTreeMap<PathBuf, Vec<u8>> = parquet_files(&output)
        .into_iter()
        .map(|f| {
            let bytes = std::fs::read(output.join(&f)).unwrap();
            (f, bytes)
        })
        .collect();

    run(&config).await;
    let second: BTreeMap<PathBuf, Vec<u8>> = parquet_files(&output)
        .into_iter()
        .map(|f| {
            let bytes = std::fs::read(output.join(&f)).unwrap();
            (f, bytes)
        })
        .collect();

    assert_eq!(
        first.keys().collect::<Vec<_>>(),
        second.keys().collect::<Vec<_>>()
    );
    assert!(first == second, "output changed between identical runs");
}

#[tokio::test]
async fn test_overwrite_drops_stale_partitions() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("input");
    standard_dataset(&input);
    let config = config_for(&dir);
    run(&config).await;

    // Second run without the December event
    write_events(
        &input,
        "2018-11-12-events.json",
        &[("15", "free", 1_541_990_258_796, "Soul Deep")],
    );
    let summary = run(&config).await;

    assert_eq!(summary.table("time").unwrap().rows, 1);
    assert!(!dir
        .path()
        .join("output/time.parquet/year=2018/month=12")
        .exists());
}

#[tokio::test]
async fn test_empty_input_produces_empty_tables() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("input");
    std::fs::create_dir_all(&input).unwrap();
    let config = config_for(&dir);

    let summary = run(&config).await;

    assert_eq!(summary.total_rows(), 0);
    for table in &STAR_SCHEMA {
        let file = dir
            .path()
            .join("output")
            .join(table.dir_name())
            .join("data_0.parquet");
        assert!(file.is_file(), "{} missing", file.display());
        assert_eq!(row_count(&file), 0);
        assert_eq!(
            column_names(&file),
            table.columns.iter().map(ToString::to_string).collect::<Vec<_>>()
        );
    }
}

#[tokio::test]
async fn test_empty_files_produce_empty_tables() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("input");
    std::fs::create_dir_all(input.join("song-data/A/A/A")).unwrap();
    std::fs::create_dir_all(input.join("log_data/2018/11")).unwrap();
    std::fs::write(input.join("song-data/A/A/A/empty.json"), "").unwrap();
    std::fs::write(input.join("log_data/2018/11/empty.json"), "").unwrap();
    let config = config_for(&dir);

    let summary = run(&config).await;
    assert_eq!(summary.total_rows(), 0);
    assert_eq!(summary.table("songplays").unwrap().files, vec!["data_0.parquet".to_string()]);
}

#[tokio::test]
async fn test_remote_output_without_credentials_fails_before_writing() {
    let dir = tempfile::tempdir().unwrap();
    standard_dataset(&dir.path().join("input"));
    let mut config = config_for(&dir);
    config.output_data = "s3a://june-dend/".to_string();
    config.credentials.access_key_id = None;
    config.credentials.secret_access_key = None;

    let err = Pipeline::new(config).run().await.unwrap_err();
    assert!(err.is_startup_failure(), "{err}");
}
