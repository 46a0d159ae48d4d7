//! Schema types

use serde::Serialize;

/// Engine type of a raw input column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ColumnType {
    Varchar,
    Bigint,
    Integer,
    Double,
}

impl ColumnType {
    /// SQL spelling of the type
    pub fn as_sql(&self) -> &'static str {
        match self {
            ColumnType::Varchar => "VARCHAR",
            ColumnType::Bigint => "BIGINT",
            ColumnType::Integer => "INTEGER",
            ColumnType::Double => "DOUBLE",
        }
    }
}

impl std::fmt::Display for ColumnType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_sql())
    }
}

/// A column of a raw JSON record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ColumnDef {
    /// JSON key
    pub name: &'static str,
    /// Type the key is read as
    #[serde(rename = "type")]
    pub column_type: ColumnType,
}

impl ColumnDef {
    /// Create a column definition
    pub const fn new(name: &'static str, column_type: ColumnType) -> Self {
        Self { name, column_type }
    }
}

/// Fixed schema of a raw input dataset
///
/// Records are read with this schema instead of an inferred one, so keys
/// missing from a record come back as NULL and an empty dataset still has
/// typed columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RawSchema {
    /// Dataset name used in logs and errors
    pub dataset: &'static str,
    /// Columns in declaration order
    pub columns: &'static [ColumnDef],
}

impl RawSchema {
    /// Look up a column by name
    pub fn column(&self, name: &str) -> Option<&ColumnDef> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Render the `columns = {...}` struct literal for `read_json`
    pub fn json_columns_struct(&self) -> String {
        let fields: Vec<String> = self
            .columns
            .iter()
            .map(|c| format!("'{}': '{}'", c.name, c.column_type))
            .collect();
        format!("{{{}}}", fields.join(", "))
    }

    /// A typed, zero-row `SELECT` with the same columns as a real load
    ///
    /// Includes the `filename` column that loads carry.
    pub fn empty_select(&self) -> String {
        let mut fields: Vec<String> = self
            .columns
            .iter()
            .map(|c| format!("CAST(NULL AS {}) AS \"{}\"", c.column_type, c.name))
            .collect();
        fields.push("CAST(NULL AS VARCHAR) AS filename".to_string());
        format!("SELECT {} WHERE false", fields.join(", "))
    }
}

/// Definition of an output table of the star schema
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TableDef {
    /// Table name (`songs`, `time`, ...)
    pub name: &'static str,
    /// Output columns in write order
    pub columns: &'static [&'static str],
    /// Column the table is unique by
    pub key: &'static str,
    /// Hive partition columns, outermost first
    pub partition_by: &'static [&'static str],
}

impl TableDef {
    /// Directory name under the output base (`songs.parquet`)
    pub fn dir_name(&self) -> String {
        format!("{}.parquet", self.name)
    }

    /// Whether the table is written with Hive partitioning
    pub fn is_partitioned(&self) -> bool {
        !self.partition_by.is_empty()
    }

    /// Columns stored inside the data files of a partitioned write
    pub fn file_columns(&self) -> Vec<&'static str> {
        self.columns
            .iter()
            .copied()
            .filter(|c| !self.partition_by.contains(c))
            .collect()
    }

    /// Quoted, comma-separated column list for `SELECT`
    pub fn select_list(&self) -> String {
        self.columns
            .iter()
            .map(|c| format!("\"{c}\""))
            .collect::<Vec<_>>()
            .join(", ")
    }
}
