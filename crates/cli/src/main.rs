mod cmd;
mod output;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use recipe_lib::{ConfigurationError, DescriptorError};

use crate::cmd::ProfileArgs;
use crate::output::{OutputFormat, print_error};

/// recipe - package build descriptors for C/C++ projects
#[derive(Parser)]
#[command(name = "recipe")]
#[command(author, version, about, long_about = None)]
struct Cli {
  /// Enable debug logging (RUST_LOG takes precedence)
  #[arg(short, long, global = true)]
  verbose: bool,

  #[command(subcommand)]
  command: Commands,
}

#[derive(Subcommand)]
enum Commands {
  /// Show the host platform and detected compiler
  Info {
    #[arg(long, value_enum, default_value_t)]
    format: OutputFormat,
  },

  /// Scaffold a recipe.lua in a directory
  Init {
    /// Directory to create the recipe in
    #[arg(default_value = ".")]
    dir: PathBuf,

    /// Project name (defaults to the directory name)
    #[arg(long)]
    name: Option<String>,
  },

  /// Configure a recipe and print its options and requirements
  Inspect {
    /// Path to the recipe file or its directory
    #[arg(default_value = "recipe.lua")]
    recipe: PathBuf,

    #[command(flatten)]
    profile: ProfileArgs,

    #[arg(long, value_enum, default_value_t)]
    format: OutputFormat,
  },

  /// Configure a recipe and resolve its dependency graph
  Plan {
    /// Path to the recipe file or its directory
    #[arg(default_value = "recipe.lua")]
    recipe: PathBuf,

    /// Directory of dependency manifests (defaults to $RECIPE_CATALOG)
    #[arg(long)]
    catalog: Option<PathBuf>,

    #[command(flatten)]
    profile: ProfileArgs,

    #[arg(long, value_enum, default_value_t)]
    format: OutputFormat,
  },

  /// Run the full lifecycle: configure, layout, build, package
  Create {
    /// Path to the recipe file or its directory
    #[arg(default_value = "recipe.lua")]
    recipe: PathBuf,

    /// Resolve against this catalog before building
    #[arg(long)]
    catalog: Option<PathBuf>,

    /// Record toolchain calls instead of running cmake
    #[arg(long)]
    dry_run: bool,

    /// Install destination (defaults to <source>/package)
    #[arg(long)]
    prefix: Option<PathBuf>,

    /// Source directory (defaults to the recipe's directory)
    #[arg(long)]
    source: Option<PathBuf>,

    #[command(flatten)]
    profile: ProfileArgs,

    #[arg(long, value_enum, default_value_t)]
    format: OutputFormat,
  },
}

fn init_tracing(verbose: bool) {
  let default_level = if verbose { "debug" } else { "warn" };
  let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

  tracing_subscriber::fmt()
    .with_env_filter(filter)
    .with_writer(std::io::stderr)
    .without_time()
    .init();
}

/// Name of the failure kind, when the error came from the descriptor.
fn error_kind(err: &anyhow::Error) -> Option<&'static str> {
  err.chain().find_map(|cause| {
    if let Some(err) = cause.downcast_ref::<DescriptorError>() {
      Some(err.kind())
    } else if cause.downcast_ref::<ConfigurationError>().is_some() {
      Some("ConfigurationError")
    } else {
      None
    }
  })
}

fn main() -> ExitCode {
  let cli = Cli::parse();
  init_tracing(cli.verbose);

  let result = match cli.command {
    Commands::Info { format } => cmd::cmd_info(format),
    Commands::Init { dir, name } => cmd::cmd_init(&dir, name),
    Commands::Inspect {
      recipe,
      profile,
      format,
    } => cmd::cmd_inspect(&recipe, &profile, format),
    Commands::Plan {
      recipe,
      catalog,
      profile,
      format,
    } => cmd::cmd_plan(&recipe, catalog, &profile, format),
    Commands::Create {
      recipe,
      catalog,
      dry_run,
      prefix,
      source,
      profile,
      format,
    } => cmd::cmd_create(
      &recipe,
      &cmd::CreateOptions {
        catalog,
        dry_run,
        prefix,
        source,
      },
      &profile,
      format,
    ),
  };

  match result {
    Ok(()) => ExitCode::SUCCESS,
    Err(err) => {
      match error_kind(&err) {
        Some(kind) => print_error(&format!("{kind}: {err:#}")),
        None => print_error(&format!("{err:#}")),
      }
      ExitCode::FAILURE
    }
  }
}
