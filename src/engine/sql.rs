//! SQL text builders for the engine

use crate::schema::{RawSchema, TableDef};
use crate::types::Compression;

/// Quote a string literal, doubling embedded single quotes
pub fn quote_literal(value: &str) -> String {
    format!("'{}'", value.replace('\'', "''"))
}

/// Quote an identifier, doubling embedded double quotes
pub fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

/// `SELECT` over every JSON file matching `pattern` with a fixed schema
///
/// Adds a `filename` column naming the source file of each row.
pub fn read_json_sql(schema: &RawSchema, pattern: &str) -> String {
    format!(
        "SELECT * FROM read_json({}, format = 'auto', columns = {}, filename = true)",
        quote_literal(pattern),
        schema.json_columns_struct()
    )
}

/// `COPY` statement writing `query` to `target` as Parquet
///
/// With partition columns, `target` is a directory receiving a Hive layout;
/// without, `target` is the file path.
pub fn copy_to_parquet_sql(
    query: &str,
    target: &str,
    partition_by: &[&str],
    compression: Compression,
) -> String {
    let mut options = vec![
        "FORMAT PARQUET".to_string(),
        format!("COMPRESSION {}", quote_literal(compression.as_sql())),
    ];
    if !partition_by.is_empty() {
        let columns: Vec<String> = partition_by.iter().map(|c| quote_ident(c)).collect();
        options.push(format!("PARTITION_BY ({})", columns.join(", ")));
        options.push("OVERWRITE_OR_IGNORE true".to_string());
    }

    format!(
        "COPY ({query}) TO {} ({});",
        quote_literal(target),
        options.join(", ")
    )
}

/// Wrap `query` so it yields exactly the table's columns in write order
pub fn project_table_sql(table: &TableDef, query: &str) -> String {
    let order_by = table
        .partition_by
        .iter()
        .chain(std::iter::once(&table.key))
        .map(|c| quote_ident(c))
        .collect::<Vec<_>>()
        .join(", ");
    format!(
        "SELECT {} FROM ({query}) AS t ORDER BY {order_by}",
        table.select_list()
    )
}
