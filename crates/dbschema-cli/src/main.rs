//! dbschema CLI - Inspect MySQL/MariaDB and SQLite schemas.

use clap::{Parser, Subcommand};
use dbschema::{
    connect, list_schemas, CatalogConnection, Config, SchemaError, SchemaManager, TableRef,
};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{info, Level};
use tracing_subscriber::fmt::format::FmtSpan;

/// Exit code when the requested schema or table does not exist.
const EXIT_NOT_FOUND: u8 = 3;

#[derive(Parser)]
#[command(name = "dbschema")]
#[command(about = "Inspect database schemas through their system catalogs")]
#[command(version)]
struct Cli {
    /// Path to YAML configuration file
    #[arg(short, long, default_value = "config.yaml")]
    config: PathBuf,

    /// Connection URL (mysql://... or sqlite:...); replaces the config file
    #[arg(long)]
    url: Option<String>,

    /// Output JSON result to stdout
    #[arg(long)]
    output_json: bool,

    /// Log format: text or json
    #[arg(long, default_value = "text")]
    log_format: String,

    /// Log verbosity: debug, info, warn, error
    #[arg(long, default_value = "info")]
    verbosity: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print a schema's tables and columns
    Inspect {
        /// Schema to inspect [default: connection.schema, the MySQL database, or SQLite's main]
        schema: Option<String>,

        /// Only print this table
        #[arg(long)]
        table: Option<String>,
    },

    /// List schemas visible through the connection
    Schemas,

    /// Test the database connection
    HealthCheck,
}

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{}", e.format_detailed());
            ExitCode::from(e.exit_code())
        }
    }
}

async fn run() -> Result<ExitCode, SchemaError> {
    let cli = Cli::parse();

    // Setup logging
    setup_logging(&cli.verbosity, &cli.log_format).map_err(SchemaError::Config)?;

    let config = match &cli.url {
        Some(url) => Config::from_url(url)?,
        None => {
            let config = Config::load(&cli.config)?;
            info!("Loaded configuration from {:?}", cli.config);
            config
        }
    };

    let mut conn = connect(&config.connection).await?;

    match cli.command {
        Commands::Inspect { schema, table } => {
            let schema_name = schema
                .or_else(|| config.connection.default_schema())
                .ok_or_else(|| {
                    SchemaError::Config(
                        "No schema given and connection.schema is not set".to_string(),
                    )
                })?;

            let manager = SchemaManager::with_config(config.introspection.clone());
            let Some(schema) = manager.get_schema(conn.as_mut(), &schema_name).await? else {
                eprintln!("Schema not found: {}", schema_name);
                return Ok(ExitCode::from(EXIT_NOT_FOUND));
            };

            match table {
                Some(table_name) => {
                    let Some(table) = schema.table(&table_name) else {
                        eprintln!("Table not found: {}.{}", schema.name(), table_name);
                        return Ok(ExitCode::from(EXIT_NOT_FOUND));
                    };
                    if cli.output_json {
                        println!("{}", serde_json::to_string_pretty(table.table())?);
                    } else {
                        print_table(table);
                    }
                }
                None => {
                    if cli.output_json {
                        println!("{}", schema.to_json_pretty()?);
                    } else {
                        println!(
                            "Schema: {} ({})",
                            schema.name(),
                            describe_charset(schema.character_set(), schema.collation())
                        );
                        if let Some(file) = schema.file() {
                            println!("  File: {}", file);
                        }
                        for table in schema.tables() {
                            print_table(table);
                        }
                        println!("\n  Tables: {}", schema.table_count());
                    }
                }
            }
        }

        Commands::Schemas => {
            let names = list_schemas(conn.as_mut(), &config.introspection).await?;
            if cli.output_json {
                println!("{}", serde_json::to_string_pretty(&names)?);
            } else {
                for name in &names {
                    println!("{}", name);
                }
            }
        }

        Commands::HealthCheck => {
            let version = conn.server_version().await?;
            let target = config.connection.display_target();

            if cli.output_json {
                let result = serde_json::json!({
                    "healthy": true,
                    "driver": conn.driver_name(),
                    "server_version": version,
                    "target": target,
                });
                println!("{}", serde_json::to_string_pretty(&result)?);
            } else {
                println!("Health Check Results:");
                println!("  Target: {}", target);
                println!("  Driver: {}", conn.driver_name());
                println!("  Server version: {}", version);
                println!("\n  Overall: HEALTHY");
            }
        }
    }

    Ok(ExitCode::SUCCESS)
}

fn print_table(table: TableRef<'_>) {
    let mut header = format!("\n  {}", table.name());
    if let Some(engine) = table.engine() {
        header.push_str(&format!(" [{}]", engine));
    }
    if let Some(comment) = table.comment() {
        header.push_str(&format!(" -- {}", comment));
    }
    println!("{}", header);

    for column in table.columns() {
        let mut line = format!("    {:<24} {}", column.name(), column.data_type());
        if let Some(width) = column.display_width() {
            line.push_str(&format!("({})", width));
        }
        if column.unsigned() {
            line.push_str(" unsigned");
        }
        if column.zerofill() {
            line.push_str(" zerofill");
        }
        line.push_str(if column.nullable() { " NULL" } else { " NOT NULL" });
        if column.auto_increment() {
            line.push_str(" auto_increment");
        }
        if let Some(default) = column.default_value() {
            line.push_str(&format!(" DEFAULT {}", default));
        }
        if let Some(options) = column.options() {
            line.push_str(&format!(" {{{}}}", options.join(", ")));
        }
        if column.has_value_bounds() {
            line.push_str(&format!(
                " [{} .. {}]",
                column.minimum_value().unwrap_or("?"),
                column.maximum_value().unwrap_or("?")
            ));
        }
        if let Some(length) = column.maximum_length() {
            line.push_str(&format!(" max_length={}", length));
        }
        println!("{}", line);
    }
}

fn describe_charset(character_set: Option<&str>, collation: Option<&str>) -> String {
    match (character_set, collation) {
        (Some(cs), Some(co)) => format!("{} / {}", cs, co),
        (Some(cs), None) => cs.to_string(),
        (None, Some(co)) => co.to_string(),
        (None, None) => "default charset".to_string(),
    }
}

fn setup_logging(verbosity: &str, format: &str) -> Result<(), String> {
    let level = match verbosity.to_lowercase().as_str() {
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        other => return Err(format!("Unknown verbosity '{}': use debug, info, warn or error", other)),
    };

    // Logs go to stderr so stdout stays machine-readable with --output-json.
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_span_events(FmtSpan::CLOSE)
        .with_target(false)
        .with_writer(std::io::stderr);

    match format {
        "json" => subscriber.json().init(),
        "text" => subscriber.init(),
        other => return Err(format!("Unknown log format '{}': use text or json", other)),
    }

    Ok(())
}
