//! CLI binary for rawdog: generate Go mocks, services, repository queries and
//! test scaffolds from declaration files.

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use rawdog_core::config::RawdogConfig;
use rawdog_core::model::FileModel;
use rawdog_core::output;
use rawdog_core::relations::infer_relations;
use rawdog_gen::{QueryOptions, ScaffoldOptions};
use rawdog_parser::{BuildOptions, parse_model};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "rawdog", about = "Declaration-driven Go code generator", version)]
struct Cli {
    /// Project root holding `.rawdog/config.toml` (defaults to current directory)
    #[arg(short, long, global = true)]
    project: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Make mocks from every interface in a file
    Mock {
        /// Declaration file containing interfaces
        input: PathBuf,
        /// File to generate
        output: PathBuf,
    },

    /// Make service and repo interfaces from `*Service` receiver methods
    Service {
        /// File with methods on a `*<Name>Service` receiver
        input: PathBuf,
        /// File to generate
        output: PathBuf,
    },

    /// Make CRUD repository queries from a model file or directory
    Queries {
        /// Model file, or a directory of model files
        input: PathBuf,
        /// File to generate, or output directory when input is a directory
        output: PathBuf,

        #[command(flatten)]
        filter: FileFilter,
    },

    /// Make repository test scaffolds from a model file or directory
    Tests {
        /// Model file, or a directory of model files
        input: PathBuf,
        /// File to generate, or output directory when input is a directory
        output: PathBuf,

        #[command(flatten)]
        filter: FileFilter,
    },

    /// Create a controller stub with the standard routes
    Controller {
        /// Controller name in CamelCase (e.g. ResourceRole)
        name: String,
        /// Directory to write `<route>.go` into
        output_dir: PathBuf,
    },

    /// Print the parsed model of a file as JSON
    Inspect {
        /// Declaration file
        input: PathBuf,
    },
}

#[derive(Args, Default)]
struct FileFilter {
    /// Glob patterns to include files in directory mode (repeatable)
    #[arg(long)]
    include: Vec<String>,

    /// Glob patterns to exclude files in directory mode (repeatable)
    #[arg(long)]
    exclude: Vec<String>,
}

/// Artifacts generated per model file, in single-file or directory mode.
#[derive(Clone, Copy)]
enum Artifact {
    Queries,
    Tests,
}

impl Artifact {
    fn render(self, model: &FileModel, table: &str, config: &RawdogConfig) -> Result<String> {
        let text = match self {
            Artifact::Queries => {
                rawdog_gen::synthesize_queries(model, &QueryOptions::new(table, config))?
            }
            Artifact::Tests => {
                rawdog_gen::synthesize_scaffold(model, &ScaffoldOptions::new(table, config))?
            }
        };
        Ok(text)
    }

    fn destination(self, out_dir: &Path, input: &Path, config: &RawdogConfig) -> Option<PathBuf> {
        match self {
            Artifact::Queries => output::queries_path(out_dir, input, &config.output),
            Artifact::Tests => output::tests_path(out_dir, input, &config.output),
        }
    }
}

fn get_project_root(cli: &Cli) -> Result<PathBuf> {
    match &cli.project {
        Some(p) => Ok(p.clone()),
        None => std::env::current_dir().context("failed to get current directory"),
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let project_root = get_project_root(&cli)?;
    let config = RawdogConfig::load(&project_root)?;

    match cli.command {
        Commands::Mock { input, output } => cmd_mock(&input, &output, &config),
        Commands::Service { input, output } => cmd_service(&input, &output, &config),
        Commands::Queries {
            input,
            output,
            filter,
        } => cmd_generate(Artifact::Queries, &input, &output, &filter, &config),
        Commands::Tests {
            input,
            output,
            filter,
        } => cmd_generate(Artifact::Tests, &input, &output, &filter, &config),
        Commands::Controller { name, output_dir } => cmd_controller(&name, &output_dir, &config),
        Commands::Inspect { input } => cmd_inspect(&input, &config),
    }
}

fn load_model(path: &Path, options: &BuildOptions) -> Result<FileModel> {
    let source = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    parse_model(&source, options).with_context(|| format!("failed to parse {}", path.display()))
}

fn cmd_mock(input: &Path, out: &Path, config: &RawdogConfig) -> Result<()> {
    let model = load_model(input, &BuildOptions::from_config(config))?;
    let text = rawdog_gen::synthesize_mocks(&model);
    output::write_atomic(out, &text)?;
    eprintln!("Wrote mocks to {}", out.display());
    Ok(())
}

fn cmd_service(input: &Path, out: &Path, config: &RawdogConfig) -> Result<()> {
    let model = load_model(input, &BuildOptions::from_config(config))?;
    let text = rawdog_gen::synthesize_services(&model, &config.naming.domain_package)
        .with_context(|| format!("cannot build a service from {}", input.display()))?;
    output::write_atomic(out, &text)?;
    eprintln!("Wrote service to {}", out.display());
    Ok(())
}

fn table_name(input: &Path) -> Result<&str> {
    output::base_name(input)
        .with_context(|| format!("cannot derive a table name from {}", input.display()))
}

/// Generate one artifact from `input` into the file `out`.
fn generate_file(
    artifact: Artifact,
    input: &Path,
    out: &Path,
    config: &RawdogConfig,
) -> Result<()> {
    let model = load_model(input, &BuildOptions::from_config(config))?;
    let text = artifact
        .render(&model, table_name(input)?, config)
        .with_context(|| format!("cannot generate from {}", input.display()))?;
    output::write_atomic(out, &text)
}

fn cmd_generate(
    artifact: Artifact,
    input: &Path,
    out: &Path,
    filter: &FileFilter,
    config: &RawdogConfig,
) -> Result<()> {
    if !input.is_dir() {
        generate_file(artifact, input, out, config)?;
        eprintln!("Wrote {}", out.display());
        return Ok(());
    }

    let files = collect_declaration_files(input, &filter.include, &filter.exclude, config)?;
    if files.is_empty() {
        eprintln!("No declaration files found under {}", input.display());
        return Ok(());
    }

    let mut failed = 0usize;
    for file in &files {
        let result = artifact
            .destination(out, file, config)
            .with_context(|| format!("cannot name output for {}", file.display()))
            .and_then(|dest| generate_file(artifact, file, &dest, config).map(|()| dest));
        match result {
            Ok(dest) => eprintln!("  {} -> {}", file.display(), dest.display()),
            Err(e) => {
                tracing::error!("{e:#}");
                failed += 1;
            }
        }
    }

    eprintln!("Generated {}/{} files", files.len() - failed, files.len());
    if failed > 0 {
        anyhow::bail!("{failed} of {} files failed", files.len());
    }
    Ok(())
}

fn build_glob_set(patterns: &[String], flag: &str) -> Result<Option<globset::GlobSet>> {
    if patterns.is_empty() {
        return Ok(None);
    }
    let mut builder = globset::GlobSetBuilder::new();
    for p in patterns {
        builder.add(globset::Glob::new(p).with_context(|| format!("invalid {flag} glob: {p}"))?);
    }
    Ok(Some(
        builder
            .build()
            .with_context(|| format!("invalid {flag} glob set"))?,
    ))
}

/// Declaration files under `root`, sorted, skipping tests and generated output.
fn collect_declaration_files(
    root: &Path,
    include: &[String],
    exclude: &[String],
    config: &RawdogConfig,
) -> Result<Vec<PathBuf>> {
    let include_set = build_glob_set(include, "--include")?;
    let exclude_set = build_glob_set(exclude, "--exclude")?;

    let walker = ignore::WalkBuilder::new(root)
        .hidden(true)
        .git_ignore(true)
        .build();

    let mut files = Vec::new();
    for entry in walker.flatten() {
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        if path.extension().and_then(|e| e.to_str()) != Some("go") {
            continue;
        }
        if output::base_name(path).is_some_and(|stem| stem.ends_with("_test"))
            || output::is_generated(path, &config.output)
        {
            continue;
        }
        let rel_path_for_glob = path.strip_prefix(root).unwrap_or(path);
        if let Some(ref inc) = include_set
            && !inc.is_match(rel_path_for_glob)
        {
            continue;
        }
        if let Some(ref exc) = exclude_set
            && exc.is_match(rel_path_for_glob)
        {
            continue;
        }
        files.push(path.to_path_buf());
    }
    files.sort();
    Ok(files)
}

fn cmd_controller(name: &str, out_dir: &Path, config: &RawdogConfig) -> Result<()> {
    if !rawdog_core::config::is_identifier(name) {
        anyhow::bail!("controller name must be an identifier, got {name:?}");
    }
    let route = rawdog_gen::controller::route(name);
    let path = out_dir.join(format!("{route}.{}", config.output.extension));
    output::write_atomic(&path, &rawdog_gen::synthesize_controller(name))?;
    eprintln!("Wrote controller to {}", path.display());
    Ok(())
}

fn cmd_inspect(input: &Path, config: &RawdogConfig) -> Result<()> {
    let model = load_model(input, &BuildOptions::from_config(config))?;
    let table = table_name(input)?;
    let entities: Vec<serde_json::Value> = model
        .entities
        .iter()
        .map(|entity| {
            serde_json::json!({
                "entity": entity,
                "relations": infer_relations(entity, table),
            })
        })
        .collect();
    let report = serde_json::json!({
        "namespace": model.namespace,
        "table": table,
        "entities": entities,
        "interfaces": model.interfaces,
        "services": model.services,
    });
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
