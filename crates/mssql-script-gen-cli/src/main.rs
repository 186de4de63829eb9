//! mssql-script-gen CLI - script SQL Server objects and data to files.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use mssql_script_gen::{Config, Orchestrator, ScriptGenError, ScriptRunResult};
use tracing::{info, Level};
use tracing_subscriber::fmt::format::FmtSpan;

#[derive(Parser)]
#[command(name = "mssql-script-gen")]
#[command(about = "Script SQL Server schema objects and table data into re-runnable SQL files")]
#[command(version)]
struct Cli {
    /// XML options file
    config: PathBuf,

    /// Either <OUTPUT_DIR> or <SERVER> <DATABASE> <OUTPUT_DIR>
    #[arg(value_name = "ARGS")]
    args: Vec<String>,

    /// Print the run summary as JSON
    #[arg(long)]
    output_json: bool,

    /// Log format (text, json)
    #[arg(long, default_value = "text")]
    log_format: String,

    /// Log level (debug, info, warn, error)
    #[arg(long, default_value = "info")]
    verbosity: String,
}

/// Positional arguments after the options file.
#[derive(Debug, PartialEq, Eq)]
struct Positional {
    server: Option<String>,
    database: Option<String>,
    output_dir: PathBuf,
}

impl Positional {
    fn parse(args: &[String]) -> Result<Self, ScriptGenError> {
        match args {
            [] => Ok(Self {
                server: None,
                database: None,
                output_dir: PathBuf::from("."),
            }),
            [output_dir] => Ok(Self {
                server: None,
                database: None,
                output_dir: PathBuf::from(output_dir),
            }),
            [server, database, output_dir] => Ok(Self {
                server: Some(server.clone()),
                database: Some(database.clone()),
                output_dir: PathBuf::from(output_dir),
            }),
            other => Err(ScriptGenError::Config(format!(
                "expected <CONFIG> [<OUTPUT_DIR>] or <CONFIG> <SERVER> <DATABASE> <OUTPUT_DIR>, \
                 got {} extra arguments",
                other.len()
            ))),
        }
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}", e.format_detailed());
            ExitCode::from(e.exit_code())
        }
    }
}

async fn run() -> Result<(), ScriptGenError> {
    let cli = Cli::parse();

    setup_logging(&cli.verbosity, &cli.log_format);

    let positional = Positional::parse(&cli.args)?;

    let config = Config::load(&cli.config)?;
    info!("Loaded configuration from {:?}", cli.config);

    let settings = config.connection(positional.server.as_deref(), positional.database.as_deref())?;
    info!("Connecting to {:?}", settings);

    let orchestrator = Orchestrator::connect(config, &settings, positional.output_dir).await?;
    let result = orchestrator.run().await?;

    if cli.output_json {
        println!("{}", result.to_json()?);
    } else {
        print_summary(&result);
    }

    Ok(())
}

fn print_summary(result: &ScriptRunResult) {
    println!("\nScripting completed!");
    println!("  Duration: {:.2}s", result.duration_seconds);
    for file in &result.files {
        match file.rows {
            Some(rows) => println!(
                "  {}: {} tables, {} rows -> {}",
                file.category,
                file.objects,
                rows,
                file.path.display()
            ),
            None => println!(
                "  {}: {} -> {}",
                file.category,
                file.objects,
                file.path.display()
            ),
        }
    }
}

fn setup_logging(verbosity: &str, format: &str) {
    let level = match verbosity.to_lowercase().as_str() {
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    // Logs go to stderr so `--output-json` keeps stdout parseable.
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_span_events(FmtSpan::CLOSE)
        .with_target(false)
        .with_writer(std::io::stderr);

    if format == "json" {
        subscriber.json().init();
    } else {
        subscriber.init();
    }
}
