//! Command-line interface for xsdmsg

#[cfg(feature = "cli")]
use clap::{Parser, Subcommand};

#[cfg(feature = "cli")]
use std::fs;
#[cfg(feature = "cli")]
use std::path::{Path, PathBuf};

#[cfg(feature = "cli")]
use xsdmsg::limits::Limits;
#[cfg(feature = "cli")]
use xsdmsg::{messages, tree_view, Schema, TargetFormat};

#[cfg(feature = "cli")]
#[derive(Parser, Debug)]
#[command(name = "xsdmsg")]
#[command(author, version, about = "XSD schema to message flattening tool", long_about = None)]
struct Cli {
    /// Apply strict resource limits while decoding
    #[arg(long, global = true)]
    strict: bool,

    #[command(subcommand)]
    command: Commands,
}

#[cfg(feature = "cli")]
#[derive(Subcommand, Debug)]
enum Commands {
    /// Decode an XSD schema and display its tree
    Inspect {
        /// Path to the XSD schema file
        #[arg(value_name = "SCHEMA")]
        schema: PathBuf,

        /// Output the decoded model as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Flatten an XSD schema into messages
    Messages {
        /// Path to the XSD schema file
        #[arg(value_name = "SCHEMA")]
        schema: PathBuf,

        /// Type translation: protobuf, json or identity
        #[arg(short, long, default_value = "identity")]
        format: String,

        /// Output file (defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[cfg(feature = "cli")]
fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let limits = if cli.strict {
        Limits::strict()
    } else {
        Limits::default()
    };

    let result = match cli.command {
        Commands::Inspect { schema, json } => cmd_inspect(schema, &limits, json),
        Commands::Messages {
            schema,
            format,
            output,
        } => cmd_messages(schema, &limits, format, output),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

#[cfg(feature = "cli")]
fn load_schema(path: &Path, limits: &Limits) -> Result<Schema, Box<dyn std::error::Error>> {
    let bytes = fs::read(path)?;
    Ok(Schema::from_bytes_with_limits(&bytes, limits)?)
}

#[cfg(feature = "cli")]
fn cmd_inspect(
    schema_path: PathBuf,
    limits: &Limits,
    json_output: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let schema = load_schema(&schema_path, limits)?;

    if json_output {
        println!("{}", serde_json::to_string_pretty(&schema)?);
    } else {
        println!("{}", tree_view(&schema));
    }

    Ok(())
}

#[cfg(feature = "cli")]
fn cmd_messages(
    schema_path: PathBuf,
    limits: &Limits,
    format: String,
    output: Option<PathBuf>,
) -> Result<(), Box<dyn std::error::Error>> {
    let schema = load_schema(&schema_path, limits)?;
    let format: TargetFormat = format.parse()?;
    let flattened = schema.messages(format)?;
    let json = messages::to_json(&flattened)?;

    match output {
        Some(path) => {
            fs::write(&path, json)?;
            eprintln!("Wrote {} messages to {}", flattened.len(), path.display());
        }
        None => println!("{}", json),
    }

    Ok(())
}

#[cfg(not(feature = "cli"))]
fn main() {
    eprintln!("CLI feature not enabled. Rebuild with --features cli");
    std::process::exit(1);
}
