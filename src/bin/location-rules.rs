//! Location Rules CLI
//!
//! Command-line interface for resolving and checking field group location rules.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use location_rules::{
    assign_types, format_field_name, format_type_name, load_catalog, load_field_groups,
    load_json_auto, validate_catalog, validate_field_groups, CoreObjectHook, Resolver, Severity,
    StaticCatalog, ValidateError,
};
use serde::Serialize;

#[derive(Parser)]
#[command(name = "location-rules")]
#[command(about = "Resolve field group location rules into schema types")]
#[command(version)]
struct Cli {
    /// Log resolution decisions to stderr
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve the schema types each field group attaches to
    Resolve {
        /// Field group export: file path or URL (http:// or https://)
        field_groups: String,

        /// Catalog of schema types, templates and content items
        #[arg(long, short)]
        catalog: String,

        /// Include field groups with explicit types (full attachment plan)
        #[arg(long)]
        all: bool,

        /// Map attachment, comment and menu params to their core types
        #[arg(long)]
        hook_core_objects: bool,

        /// Output file (stdout if not specified)
        #[arg(long)]
        output: Option<PathBuf>,

        /// Pretty-print JSON output
        #[arg(long)]
        pretty: bool,
    },

    /// Report conditions that have no effect on the resolved types
    Lint {
        /// Field group export: file path or URL
        field_groups: String,

        /// Catalog of schema types, templates and content items
        #[arg(long, short)]
        catalog: String,

        /// Map attachment, comment and menu params to their core types
        #[arg(long)]
        hook_core_objects: bool,

        /// Output format: text (default) or json
        #[arg(long, default_value = "text")]
        format: String,

        /// Treat warnings as errors
        #[arg(long)]
        strict: bool,

        /// Only show warnings
        #[arg(long, short)]
        quiet: bool,
    },

    /// Validate the structure of a field group export or catalog
    Validate {
        /// Document to validate: file path or URL
        document: String,

        /// Validate as a catalog instead of a field group export
        #[arg(long)]
        catalog: bool,

        /// Output results as JSON (for automation)
        #[arg(long)]
        json: bool,
    },

    /// Print the canonical identifier for a name
    Format {
        /// Name to format
        name: String,

        /// Format as a type name instead of a field name
        #[arg(long = "type")]
        type_name: bool,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match cli.command {
        Commands::Resolve {
            field_groups,
            catalog,
            all,
            hook_core_objects,
            output,
            pretty,
        } => run_resolve(ResolveArgs {
            field_groups,
            catalog,
            all,
            hook_core_objects,
            output,
            pretty,
        }),

        Commands::Lint {
            field_groups,
            catalog,
            hook_core_objects,
            format,
            strict,
            quiet,
        } => run_lint(
            &field_groups,
            &catalog,
            hook_core_objects,
            &format,
            strict,
            quiet,
        ),

        Commands::Validate {
            document,
            catalog,
            json,
        } => run_validate(&document, catalog, json),

        Commands::Format { name, type_name } => {
            if type_name {
                println!("{}", format_type_name(&name));
            } else {
                println!("{}", format_field_name(&name));
            }
            Ok(())
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(code) => ExitCode::from(code),
    }
}

fn init_tracing(verbose: bool) {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let filter = if verbose {
        EnvFilter::new("location_rules=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("location_rules=warn"))
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

/// Load both inputs, reporting failures on stderr.
fn load_inputs(
    field_groups: &str,
    catalog: &str,
) -> Result<(Vec<location_rules::FieldGroup>, StaticCatalog), u8> {
    let groups = load_field_groups(field_groups).map_err(|e| {
        eprintln!("Error loading field groups: {}", e);
        e.exit_code() as u8
    })?;
    let catalog = load_catalog(catalog).map_err(|e| {
        eprintln!("Error loading catalog: {}", e);
        e.exit_code() as u8
    })?;
    Ok((groups, catalog))
}

fn build_resolver(catalog: &StaticCatalog, hook_core_objects: bool) -> Resolver<'_> {
    let resolver = Resolver::with_catalog(catalog);
    if hook_core_objects {
        resolver.hook(CoreObjectHook)
    } else {
        resolver
    }
}

struct ResolveArgs {
    field_groups: String,
    catalog: String,
    all: bool,
    hook_core_objects: bool,
    output: Option<PathBuf>,
    pretty: bool,
}

fn run_resolve(args: ResolveArgs) -> Result<(), u8> {
    let (groups, catalog) = load_inputs(&args.field_groups, &args.catalog)?;
    let resolver = build_resolver(&catalog, args.hook_core_objects);

    let json_output = if args.all {
        to_json(&assign_types(&groups, &resolver), args.pretty)
    } else {
        to_json(&resolver.resolve_from(&groups).get_rules(), args.pretty)
    }?;

    match args.output {
        Some(path) => {
            std::fs::write(&path, &json_output).map_err(|e| {
                eprintln!("Error writing to {}: {}", path.display(), e);
                3u8
            })?;
        }
        None => {
            println!("{}", json_output);
        }
    }

    Ok(())
}

fn to_json<T: Serialize>(value: &T, pretty: bool) -> Result<String, u8> {
    if pretty {
        serde_json::to_string_pretty(value)
    } else {
        serde_json::to_string(value)
    }
    .map_err(|e| {
        eprintln!("Error serializing output: {}", e);
        2u8
    })
}

fn run_lint(
    field_groups: &str,
    catalog: &str,
    hook_core_objects: bool,
    format: &str,
    strict: bool,
    quiet: bool,
) -> Result<(), u8> {
    let (groups, catalog) = load_inputs(field_groups, catalog)?;
    let resolver = build_resolver(&catalog, hook_core_objects);
    let (_, report) = resolver.resolve_with_report(&groups);

    if format == "json" {
        println!("{}", to_json(&report, true)?);
    } else {
        if !quiet {
            println!("Linting {} ...\n", field_groups);
        }

        for diag in &report.diagnostics {
            if quiet && diag.severity != Severity::Warning {
                continue;
            }
            let (color, label) = match diag.severity {
                Severity::Warning => ("\x1b[33m", "warning"),
                Severity::Info => ("\x1b[36m", "info"),
            };
            println!(
                "  {}{}[{}]\x1b[0m: {}{} - {}",
                color,
                label,
                diag.code.as_str(),
                diag.field_group,
                diag.path,
                diag.message
            );
        }

        println!();
        if report.is_ok() {
            println!(
                "\x1b[32m✓ {} field groups, {} conditions checked, no warnings\x1b[0m",
                report.field_groups, report.conditions
            );
        } else {
            println!(
                "\x1b[33m⚠ {} field groups, {} conditions checked ({} warnings, {} info)\x1b[0m",
                report.field_groups,
                report.conditions,
                report.warnings(),
                report.infos()
            );
        }
    }

    if !strict || report.is_ok() {
        Ok(())
    } else {
        Err(1)
    }
}

fn run_validate(source: &str, as_catalog: bool, json_output: bool) -> Result<(), u8> {
    let document = load_json_auto(source).map_err(|e| {
        report_error(json_output, &e.to_string());
        e.exit_code() as u8
    })?;

    let result = if as_catalog {
        validate_catalog(&document)
    } else {
        validate_field_groups(&document)
    };

    match result {
        Ok(()) => {
            if json_output {
                println!(r#"{{"valid":true}}"#);
            } else {
                println!("Valid");
            }
            Ok(())
        }
        Err(ValidateError::Invalid { errors }) => {
            if json_output {
                let output = serde_json::json!({
                    "valid": false,
                    "errors": errors
                });
                println!("{}", output);
            } else {
                eprintln!("Validation failed:");
                for error in errors {
                    eprintln!("  {}", error);
                }
            }
            Err(1)
        }
        Err(e @ ValidateError::Load(_)) => {
            report_error(json_output, &e.to_string());
            Err(e.exit_code() as u8)
        }
    }
}

/// Output an error message in plain text or JSON format.
fn report_error(json_output: bool, msg: &str) {
    if json_output {
        println!(
            "{}",
            serde_json::json!({ "valid": false, "error": msg })
        );
    } else {
        eprintln!("Error: {}", msg);
    }
}
