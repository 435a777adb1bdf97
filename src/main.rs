//! Command-line interface for xsd-instance

#[cfg(feature = "cli")]
use clap::{Parser, Subcommand, ValueEnum};

#[cfg(feature = "cli")]
use std::fs;
#[cfg(feature = "cli")]
use std::io::Write;
#[cfg(feature = "cli")]
use std::path::PathBuf;

#[cfg(feature = "cli")]
use tracing_subscriber::EnvFilter;

#[cfg(feature = "cli")]
use xsd_instance::loaders::load_schema;
#[cfg(feature = "cli")]
use xsd_instance::names::parse_clark_name;
#[cfg(feature = "cli")]
use xsd_instance::{EventRecorder, GenerationPolicy, RandomSource, XmlWriter, XsInstance};

#[cfg(feature = "cli")]
#[derive(Parser, Debug)]
#[command(name = "xsd-instance")]
#[command(author, version, about = "Generate sample XML documents from an XSD schema", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[cfg(feature = "cli")]
#[derive(Clone, Copy, Debug, ValueEnum)]
enum OutputFormat {
    /// XML text
    Xml,
    /// Recorded document events as JSON
    Events,
}

#[cfg(feature = "cli")]
#[derive(Subcommand, Debug)]
enum Commands {
    /// Generate sample documents for a root element
    Generate {
        /// Path to the XSD schema file
        #[arg(value_name = "SCHEMA")]
        schema: PathBuf,

        /// Root element, as `name` or `{namespace}name`
        #[arg(short, long)]
        root: String,

        /// Seed of the first document
        #[arg(short, long, default_value_t = 0)]
        seed: u64,

        /// Number of documents; document i uses seed + i
        #[arg(short = 'n', long, default_value_t = 1)]
        count: u64,

        /// JSON file with generation policy settings
        #[arg(short, long, value_name = "POLICY")]
        config: Option<PathBuf>,

        /// Output format
        #[arg(short, long, value_enum, default_value = "xml")]
        format: OutputFormat,

        /// Indentation width for XML output (0 for compact)
        #[arg(short, long, default_value_t = 0)]
        indent: usize,

        /// Output file (defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// List the global elements usable as root
    Roots {
        /// Path to the XSD schema file
        #[arg(value_name = "SCHEMA")]
        schema: PathBuf,
    },
}

#[cfg(feature = "cli")]
fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Generate {
            schema,
            root,
            seed,
            count,
            config,
            format,
            indent,
            output,
        } => cmd_generate(schema, root, seed, count, config, format, indent, output),
        Commands::Roots { schema } => cmd_roots(schema),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

#[cfg(feature = "cli")]
#[allow(clippy::too_many_arguments)]
fn cmd_generate(
    schema_path: PathBuf,
    root: String,
    seed: u64,
    count: u64,
    config: Option<PathBuf>,
    format: OutputFormat,
    indent: usize,
    output: Option<PathBuf>,
) -> Result<(), Box<dyn std::error::Error>> {
    let schema = load_schema(&schema_path)?;
    let root = parse_clark_name(&root, schema.target_namespace.as_deref())?;
    let policy = match config {
        Some(path) => GenerationPolicy::from_json_file(path)?,
        None => GenerationPolicy::default(),
    };
    let generator = XsInstance::new(&schema, policy);

    let mut documents = Vec::new();
    for offset in 0..count {
        let mut random = RandomSource::seeded(seed.wrapping_add(offset));
        let document = match format {
            OutputFormat::Xml => {
                let mut writer = XmlWriter::with_indent(Vec::new(), indent);
                generator.generate(&root, &mut random, &mut writer)?;
                writer.into_string()?
            }
            OutputFormat::Events => {
                let mut recorder = EventRecorder::new();
                generator.generate(&root, &mut random, &mut recorder)?;
                let mut json = recorder.to_json()?;
                json.push('\n');
                json
            }
        };
        documents.push(document);
    }

    if let Some(output_path) = output {
        fs::write(output_path, documents.concat())?;
    } else {
        let stdout = std::io::stdout();
        let mut handle = stdout.lock();
        for document in &documents {
            handle.write_all(document.as_bytes())?;
        }
    }

    Ok(())
}

#[cfg(feature = "cli")]
fn cmd_roots(schema_path: PathBuf) -> Result<(), Box<dyn std::error::Error>> {
    let schema = load_schema(&schema_path)?;
    for name in schema.root_elements() {
        println!("{}", name);
    }
    Ok(())
}

#[cfg(not(feature = "cli"))]
fn main() {
    eprintln!("CLI feature not enabled. Rebuild with --features cli");
    std::process::exit(1);
}
