use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use ecl_provider::config::Config;
use ecl_provider::ecl;
use ecl_provider::ecl::http::format_api_error;
use ecl_provider::provider::{Provider, Schema};
use serde::Serialize;
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::Level;
use tracing_subscriber::fmt::writer::MakeWriterExt;

/// Enterprise Cloud provider
#[derive(Parser, Debug)]
#[command(name = "ecl-provider", version = ecl_provider::VERSION, about, long_about = None)]
struct Args {
    /// Tenant to operate in
    #[arg(long, global = true)]
    tenant_id: Option<String>,

    /// Region, e.g. jp1
    #[arg(short, long, global = true)]
    region: Option<String>,

    /// Auth token (prefer OS_TOKEN)
    #[arg(long, global = true)]
    token: Option<String>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json", global = true)]
    output: OutputFormat,

    /// Log level for debugging
    #[arg(long, value_enum, default_value = "off", global = true)]
    log_level: LogLevel,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List registered types, or print the schema of one
    Resources {
        type_name: Option<String>,
    },
    /// List every instance of a resource type
    List {
        type_name: String,
        /// Filter as key=value, repeatable
        #[arg(long = "filter", value_parser = parse_key_value)]
        filters: Vec<(String, String)>,
    },
    /// Read one resource
    Show {
        type_name: String,
        id: String,
        /// Parent ids of nested types, e.g. zone_id=...
        #[arg(long = "attr", value_parser = parse_key_value)]
        attrs: Vec<(String, String)>,
    },
    /// Create a resource from an attribute file (YAML or JSON)
    Create {
        type_name: String,
        #[arg(short, long)]
        file: PathBuf,
    },
    /// Change attributes of an existing resource
    Update {
        type_name: String,
        id: String,
        #[arg(short, long)]
        file: PathBuf,
    },
    /// Delete a resource
    Delete {
        type_name: String,
        id: String,
        #[arg(long = "attr", value_parser = parse_key_value)]
        attrs: Vec<(String, String)>,
    },
    /// Resolve a data source to a single object
    Lookup {
        type_name: String,
        #[arg(long = "filter", value_parser = parse_key_value)]
        filters: Vec<(String, String)>,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    Json,
    Yaml,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum LogLevel {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    fn to_tracing_level(self) -> Option<Level> {
        match self {
            LogLevel::Off => None,
            LogLevel::Error => Some(Level::ERROR),
            LogLevel::Warn => Some(Level::WARN),
            LogLevel::Info => Some(Level::INFO),
            LogLevel::Debug => Some(Level::DEBUG),
            LogLevel::Trace => Some(Level::TRACE),
        }
    }
}

fn setup_logging(level: LogLevel) -> Option<tracing_appender::non_blocking::WorkerGuard> {
    let tracing_level = level.to_tracing_level()?;

    let log_path = get_log_path();

    if let Some(parent) = log_path.parent() {
        let _ = std::fs::create_dir_all(parent);
    }

    let file = match std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
    {
        Ok(file) => file,
        Err(e) => {
            eprintln!("Logging disabled, cannot open {}: {}", log_path.display(), e);
            return None;
        },
    };

    let (non_blocking, guard) = tracing_appender::non_blocking(file);

    tracing_subscriber::fmt()
        .with_max_level(tracing_level)
        .with_writer(non_blocking.with_max_level(tracing_level))
        .with_ansi(false)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(true)
        .with_line_number(true)
        .init();

    tracing::info!("ecl-provider started with log level: {:?}", level);
    tracing::info!("Log file: {:?}", log_path);

    Some(guard)
}

fn get_log_path() -> PathBuf {
    if let Some(config_dir) = dirs::config_dir() {
        return config_dir.join("ecl-provider").join("ecl-provider.log");
    }
    if let Some(home) = dirs::home_dir() {
        return home.join(".ecl-provider").join("ecl-provider.log");
    }
    PathBuf::from("ecl-provider.log")
}

fn parse_key_value(s: &str) -> std::result::Result<(String, String), String> {
    match s.split_once('=') {
        Some((k, v)) if !k.is_empty() => Ok((k.to_string(), v.to_string())),
        _ => Err(format!("expected key=value, got '{}'", s)),
    }
}

/// Arguments typed after the schema of the target type
fn to_map(schema: &Schema, pairs: Vec<(String, String)>) -> Map<String, Value> {
    pairs
        .into_iter()
        .map(|(k, v)| {
            let value = schema.coerce(&k, &v);
            (k, value)
        })
        .collect()
}

/// Attribute map from a YAML or JSON file
fn load_attributes(path: &Path) -> Result<Map<String, Value>> {
    let content = std::fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?;
    let value: Value =
        serde_yaml::from_str(&content).with_context(|| format!("Failed to parse {}", path.display()))?;
    match value {
        Value::Object(map) => Ok(map),
        _ => bail!("{} must contain a mapping of attributes", path.display()),
    }
}

fn print_output<T: Serialize>(format: OutputFormat, value: &T) -> Result<()> {
    let rendered = match format {
        OutputFormat::Json => serde_json::to_string_pretty(value)?,
        OutputFormat::Yaml => serde_yaml::to_string(value)?,
    };
    println!("{}", rendered.trim_end());
    Ok(())
}

/// File, then environment, then flags
fn load_config(args: &Args) -> Config {
    let mut config = Config::load().with_env_overrides();
    if let Some(tenant) = &args.tenant_id {
        config.tenant_id = Some(tenant.clone());
    }
    if let Some(region) = &args.region {
        config.region = Some(region.clone());
    }
    if let Some(token) = &args.token {
        config.token = Some(token.clone());
    }
    config
}

async fn run(args: Args) -> Result<()> {
    let config = load_config(&args);
    let provider = Provider::configure(&config)?;
    let output = args.output;

    match args.command {
        Command::Resources { type_name: None } => {
            let listing = serde_json::json!({
                "resources": provider.resource_types().collect::<Vec<_>>(),
                "data_sources": provider.data_source_types().collect::<Vec<_>>(),
            });
            print_output(output, &listing)
        },
        Command::Resources {
            type_name: Some(type_name),
        } => {
            let schema = match provider.resource(&type_name) {
                Ok(handler) => handler.schema(),
                Err(_) => provider.data_source(&type_name)?.schema(),
            };
            print_output(output, &schema)
        },
        Command::List { type_name, filters } => {
            let filters = to_map(&provider.resource(&type_name)?.schema(), filters);
            let items = provider.list(&type_name, &filters).await?;
            tracing::info!("Listed {} {}", items.len(), type_name);
            print_output(output, &items)
        },
        Command::Show { type_name, id, attrs } => {
            let attrs = to_map(&provider.resource(&type_name)?.schema(), attrs);
            match provider.read(&type_name, &id, attrs).await? {
                Some(data) => print_output(output, &data),
                None => bail!("{} {} not found", type_name, id),
            }
        },
        Command::Create { type_name, file } => {
            let attributes = load_attributes(&file)?;
            let data = provider.create(&type_name, attributes).await?;
            print_output(output, &data)
        },
        Command::Update { type_name, id, file } => {
            let changes = load_attributes(&file)?;
            let data = provider.update(&type_name, &id, changes).await?;
            print_output(output, &data)
        },
        Command::Delete { type_name, id, attrs } => {
            let attrs = to_map(&provider.resource(&type_name)?.schema(), attrs);
            provider.delete(&type_name, &id, attrs).await?;
            eprintln!("Deleted {} {}", type_name, id);
            Ok(())
        },
        Command::Lookup { type_name, filters } => {
            let filters = to_map(&provider.data_source(&type_name)?.schema(), filters);
            let data = provider.read_data_source(&type_name, filters).await?;
            print_output(output, &data)
        },
    }
}

/// Context chain plus a readable hint for API errors
fn describe_error(err: &anyhow::Error) -> String {
    match err.chain().find_map(|e| e.downcast_ref::<ecl::Error>()) {
        Some(api) if api.status().is_some() => format!("{}: {}", err, format_api_error(api)),
        _ => format!("{:#}", err),
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    let _log_guard = setup_logging(args.log_level);

    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!("{:#}", err);
            eprintln!("Error: {}", describe_error(&err));
            ExitCode::FAILURE
        },
    }
}
