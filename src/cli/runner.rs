//! CLI runner - executes commands

use crate::cli::commands::{Cli, Commands};
use crate::config::{resolve_config, PipelineConfig};
use crate::error::{Error, Result};
use crate::pipeline::Pipeline;
use crate::schema::{table_by_name, TableDef, STAR_SCHEMA};
use serde_json::{json, Value};

/// CLI runner
pub struct Runner {
    cli: Cli,
}

impl Runner {
    /// Create a new runner
    pub fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Run the CLI command
    pub async fn run(&self) -> Result<()> {
        match &self.cli.command {
            None | Some(Commands::Run) => self.run_pipeline().await,
            Some(Commands::Validate) => self.validate(),
            Some(Commands::Tables { table }) => self.tables(table.as_deref()),
        }
    }

    /// Resolve the configuration, applying command-line overrides
    pub fn load_config(&self) -> Result<PipelineConfig> {
        let mut config = resolve_config(self.cli.config.as_deref())?;
        if let Some(input) = &self.cli.input {
            config.input_data.clone_from(input);
        }
        if let Some(output) = &self.cli.output {
            config.output_data.clone_from(output);
        }
        config.validate()?;
        Ok(config)
    }

    async fn run_pipeline(&self) -> Result<()> {
        let pipeline = Pipeline::new(self.load_config()?);
        let summary = pipeline.run().await?;
        self.output_message(&serde_json::to_value(&summary)?);
        Ok(())
    }

    fn validate(&self) -> Result<()> {
        let config = self.load_config()?;
        let input = config.input_location()?;
        let output = config.output_location()?;

        self.output_message(&json!({
            "status": "VALID",
            "song_data": input.join(&config.song_data),
            "log_data": input.join(&config.log_data),
            "output": STAR_SCHEMA
                .iter()
                .map(|table| output.table_uri(table))
                .collect::<Vec<_>>(),
            "needs_credentials": config.needs_credentials()?,
            "timezone": config.transform.timezone.to_string(),
            "join_key": config.transform.join_key.to_string(),
        }));
        Ok(())
    }

    fn tables(&self, name: Option<&str>) -> Result<()> {
        for table in select_tables(name)? {
            self.output_message(&json!({
                "table": table.name,
                "columns": table.columns,
                "key": table.key,
                "partition_by": table.partition_by,
            }));
        }
        Ok(())
    }

    /// Print one JSON message per line
    fn output_message(&self, msg: &Value) {
        if let Ok(line) = serde_json::to_string(msg) {
            println!("{line}");
        }
    }
}

/// The named table, or the whole star schema
fn select_tables(name: Option<&str>) -> Result<Vec<&'static TableDef>> {
    match name {
        None => Ok(STAR_SCHEMA.iter().collect()),
        Some(name) => table_by_name(name).map(|table| vec![table]).ok_or_else(|| {
            let known: Vec<&str> = STAR_SCHEMA.iter().map(|t| t.name).collect();
            Error::invalid_value(
                "table",
                format!("unknown table '{name}', expected one of {}", known.join(", ")),
            )
        }),
    }
}
