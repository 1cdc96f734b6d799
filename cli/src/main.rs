use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use jsonschema_deref_core::{
    bundle_all, BundleOptions, InternalRefPolicy, ResolverOptions, SchemaResolver,
};
use std::fs::File;
use std::io::{self, BufReader, BufWriter, Write};
use std::path::PathBuf;
use tracing::level_filters::LevelFilter;

#[derive(Parser)]
#[command(name = "jsonschema-deref")]
#[command(about = "Inline $ref pointers to produce self-contained JSON Schema and OpenAPI documents")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging (sets log level to debug)
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve every $ref in a single schema document
    Resolve {
        /// Input JSON Schema / OpenAPI file
        input: PathBuf,

        /// Directory holding the external schema files
        #[arg(short, long)]
        schema_dir: PathBuf,

        /// Output resolved document (defaults to stdout if not specified)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Keep internal `#/...` references instead of inlining them
        #[arg(long)]
        preserve_internal: bool,

        /// Write unresolved-reference diagnostics to this file as JSON
        #[arg(long)]
        report: Option<PathBuf>,

        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Pretty)]
        format: OutputFormat,

        /// Maximum nesting depth before a `$ref` is left unresolved
        #[arg(long, default_value_t = 256)]
        max_depth: usize,
    },

    /// Bundle the OpenAPI document of every specification version
    Bundle {
        /// Directory containing one sub-directory per specification version
        specifications: PathBuf,

        /// OpenAPI file name inside each version directory
        #[arg(long, default_value = "openapi.json")]
        openapi_file: String,

        /// Schema directory name inside each version directory
        #[arg(long, default_value = "schema")]
        schema_dir_name: String,

        /// Output file name inside each version directory
        #[arg(long, default_value = "openapi.bundled.json")]
        output_file: String,

        /// Inline internal `#/...` references as well
        #[arg(long)]
        inline_internal: bool,

        /// Maximum nesting depth before a `$ref` is left unresolved
        #[arg(long, default_value_t = 256)]
        max_depth: usize,
    },
}

#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, ValueEnum)]
enum OutputFormat {
    Pretty,
    Compact,
}

fn internal_policy(inline: bool) -> InternalRefPolicy {
    if inline {
        InternalRefPolicy::Inline
    } else {
        InternalRefPolicy::Preserve
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing — logs go to stderr so stdout stays clean for JSON
    let log_level = if cli.verbose {
        LevelFilter::DEBUG
    } else {
        LevelFilter::WARN
    };
    tracing_subscriber::fmt()
        .with_max_level(log_level)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Resolve {
            input,
            schema_dir,
            output,
            preserve_internal,
            report,
            format,
            max_depth,
        } => {
            let file = File::open(&input)
                .with_context(|| format!("Failed to open input file: {}", input.display()))?;
            let reader = BufReader::new(file);
            let document: serde_json::Value = serde_json::from_reader(reader)
                .with_context(|| format!("Failed to parse schema from: {}", input.display()))?;

            if !schema_dir.is_dir() {
                // External refs will fail open to placeholders.
                tracing::warn!(
                    schema_dir = %schema_dir.display(),
                    "schema directory not found"
                );
            }

            let options = ResolverOptions {
                internal_refs: internal_policy(!preserve_internal),
                max_depth,
            };
            let resolver = SchemaResolver::with_options(schema_dir, options);
            tracing::debug!(
                schema_dir = %resolver.schema_dir().display(),
                internal_refs = ?resolver.options().internal_refs,
                max_depth = resolver.options().max_depth,
                "resolving {}",
                input.display()
            );
            let resolution = resolver.resolve_with_report(&document);

            if !resolution.diagnostics.is_empty() {
                eprintln!(
                    "Warning: {} reference(s) left unresolved.",
                    resolution.diagnostics.len()
                );
            }

            write_json(&resolution.document, output.as_ref(), format)?;

            if let Some(path) = report {
                write_json(&resolution.diagnostics, Some(&path), format)?;
            }
        }
        Commands::Bundle {
            specifications,
            openapi_file,
            schema_dir_name,
            output_file,
            inline_internal,
            max_depth,
        } => {
            let options = BundleOptions {
                openapi_file,
                schema_dir: schema_dir_name,
                output_file,
                resolver: ResolverOptions {
                    internal_refs: internal_policy(inline_internal),
                    max_depth,
                },
            };

            let reports = bundle_all(&specifications, &options).with_context(|| {
                format!("Bundling failed for: {}", specifications.display())
            })?;

            for report in &reports {
                eprintln!(
                    "Bundled {} -> {} ({} unique references resolved, {} unresolved)",
                    report.version.as_deref().unwrap_or("?"),
                    report.output.display(),
                    report.resolved_refs,
                    report.diagnostics.len()
                );
            }
            eprintln!("Successfully bundled {} version(s).", reports.len());
        }
    }

    Ok(())
}

fn write_json<T: serde::Serialize>(
    val: &T,
    path: Option<&PathBuf>,
    format: OutputFormat,
) -> Result<()> {
    let mut writer: Box<dyn Write> = if let Some(p) = path {
        let file = File::create(p)
            .with_context(|| format!("Failed to create output file: {}", p.display()))?;
        Box::new(BufWriter::new(file))
    } else {
        Box::new(BufWriter::new(io::stdout()))
    };

    match format {
        OutputFormat::Pretty => {
            serde_json::to_writer_pretty(&mut writer, val).context("Failed to write JSON")?;
        }
        OutputFormat::Compact => {
            serde_json::to_writer(&mut writer, val).context("Failed to write JSON")?;
        }
    }

    // Ensure trailing newline
    writeln!(writer).context("Failed to write trailing newline")?;
    writer.flush().context("Failed to flush output")?;

    Ok(())
}
