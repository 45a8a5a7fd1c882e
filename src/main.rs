use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use confxform_cli::config::variables::{
	ADDITIONAL_TRANSFORMS, AUTO_RUN_TRANSFORMS, ENVIRONMENT_NAME, IGNORE_TRANSFORM_ERRORS,
};
use confxform_cli::config::{
	CONFIG_FILE_NAME, MergedConfig, Variables, discover_configs, generate_init_template,
	load_merged_config, merge_configs, user_config_path,
};
use confxform_cli::convention::{
	ConfigurationTransformsConvention, ConventionSettings, TransformApplier,
};
use confxform_cli::fs::LocalFileSystem;
use confxform_cli::logging::init_logging;
use confxform_cli::rules::{RuleExpression, resolve_transform_paths};
use confxform_cli::transformer::{CommandTransformer, DryRunTransformer};

#[derive(Parser)]
#[command(name = "confxform")]
#[command(
	author,
	version,
	about = "Resolve and apply configuration transform files for deployment packages"
)]
#[command(arg_required_else_help = true)]
struct Cli {
	#[command(subcommand)]
	command: Option<Commands>,

	/// Create a template .confxform.toml in the current directory
	#[arg(long)]
	init: bool,

	/// Overwrite existing .confxform.toml when using --init
	#[arg(long, requires = "init")]
	force: bool,

	/// Increase log output (-v for info, -vv for debug)
	#[arg(short, long, action = clap::ArgAction::Count, global = true)]
	verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
	/// Apply configuration transforms in a package directory
	Apply(ApplyArgs),

	/// Print the transform files the given rules expect for a source file
	Resolve {
		/// Source configuration file, e.g. C:\app\web.config
		source_file: PathBuf,

		/// Rules such as "Release" or "*.Foo.config => *.Bar.config"
		#[arg(required = true)]
		rules: Vec<String>,
	},

	/// Configuration management commands
	Config {
		#[command(subcommand)]
		action: ConfigAction,
	},
}

#[derive(Args)]
struct ApplyArgs {
	/// Package directory (defaults to the current directory)
	package_dir: Option<PathBuf>,

	/// Environment name; enables <name>.<environment>.<ext> transforms
	#[arg(short, long)]
	environment: Option<String>,

	/// Apply Release and environment transforms automatically
	#[arg(long)]
	auto_transforms: bool,

	/// Additional transform rule (repeatable)
	#[arg(short = 't', long = "transform", value_name = "RULE")]
	transforms: Vec<String>,

	/// Set a deployment variable (repeatable)
	#[arg(long = "var", value_name = "KEY=VALUE")]
	vars: Vec<String>,

	/// Report transform failures as warnings and keep going
	#[arg(long)]
	ignore_errors: bool,

	/// Command that applies a transform: <command> <source> <transform> <destination>
	#[arg(long, value_name = "COMMAND")]
	transformer: Option<String>,

	/// Only report which transforms would run
	#[arg(long)]
	dry_run: bool,
}

#[derive(Subcommand)]
enum ConfigAction {
	/// Display config files and the effective variables
	Show {
		/// Package directory (defaults to the current directory)
		package_dir: Option<PathBuf>,
	},
	/// Check all config files for errors without transforming anything
	Validate {
		/// Package directory (defaults to the current directory)
		package_dir: Option<PathBuf>,
	},
}

fn main() -> ExitCode {
	match run() {
		Ok(code) => code,
		Err(e) => {
			eprintln!("error: {e:?}");
			ExitCode::FAILURE
		}
	}
}

fn run() -> Result<ExitCode> {
	let cli = Cli::parse();
	init_logging(cli.verbose);

	// Handle --init
	if cli.init {
		return handle_init(cli.force);
	}

	match cli.command {
		Some(Commands::Apply(args)) => handle_apply(args),
		Some(Commands::Resolve { source_file, rules }) => handle_resolve(&source_file, &rules),
		Some(Commands::Config { action }) => match action {
			ConfigAction::Show { package_dir } => handle_config_show(package_dir),
			ConfigAction::Validate { package_dir } => handle_config_validate(package_dir),
		},
		// No command specified - this shouldn't happen due to arg_required_else_help
		None => Ok(ExitCode::SUCCESS),
	}
}

fn handle_init(force: bool) -> Result<ExitCode> {
	let config_path = PathBuf::from(CONFIG_FILE_NAME);

	if config_path.exists() && !force {
		anyhow::bail!("{} already exists. Use --force to overwrite.", CONFIG_FILE_NAME);
	}

	std::fs::write(&config_path, generate_init_template())
		.with_context(|| format!("Failed to write {}", config_path.display()))?;

	println!("Created {}", CONFIG_FILE_NAME);
	Ok(ExitCode::SUCCESS)
}

fn package_dir_or_cwd(package_dir: Option<PathBuf>) -> Result<PathBuf> {
	let dir = match package_dir {
		Some(dir) => dir,
		None => std::env::current_dir().context("Failed to get current directory")?,
	};
	dir.canonicalize()
		.with_context(|| format!("Package directory not found: {}", dir.display()))
}

fn handle_apply(args: ApplyArgs) -> Result<ExitCode> {
	let package_dir = package_dir_or_cwd(args.package_dir.clone())?;
	let merged = load_merged_config(&package_dir).context("Failed to load configuration")?;
	let variables = effective_variables(&merged, &args)?;

	let transformer: Box<dyn TransformApplier> = if args.dry_run {
		Box::new(DryRunTransformer)
	} else {
		Box::new(build_transformer(&args, &merged, &package_dir)?)
	};

	let fs = LocalFileSystem;
	let convention = ConfigurationTransformsConvention::new(&fs, &fs, transformer.as_ref());
	let report = convention
		.install(&package_dir, &variables)
		.with_context(|| format!("Configuration transforms failed in {}", package_dir.display()))?;

	let verb = if args.dry_run { "Would apply" } else { "Applied" };
	for applied in &report.applied {
		println!(
			"{} {} -> {}",
			verb,
			display_relative(&applied.transform_file, &package_dir),
			display_relative(&applied.source_file, &package_dir)
		);
	}

	for failure in &report.ignored_failures {
		eprintln!(
			"Warning: ignored failed transform {} -> {}: {}",
			display_relative(&failure.application.transform_file, &package_dir),
			display_relative(&failure.application.source_file, &package_dir),
			failure.error
		);
	}

	if report.applied.is_empty() && report.ignored_failures.is_empty() {
		println!("No configuration transforms applied.");
	}

	Ok(ExitCode::SUCCESS)
}

/// Merge CLI flags over the variables from the config cascade.
fn effective_variables(merged: &MergedConfig, args: &ApplyArgs) -> Result<Variables> {
	let mut variables = merged.variables.clone();

	for assignment in &args.vars {
		variables.set_assignment(assignment)?;
	}
	if let Some(ref environment) = args.environment {
		variables.set(ENVIRONMENT_NAME, environment.as_str());
	}
	if args.auto_transforms {
		variables.set(AUTO_RUN_TRANSFORMS, "True");
	}
	if args.ignore_errors {
		variables.set(IGNORE_TRANSFORM_ERRORS, "True");
	}
	for rule in &args.transforms {
		variables.append_line(ADDITIONAL_TRANSFORMS, rule);
	}

	Ok(variables)
}

fn build_transformer(
	args: &ApplyArgs,
	merged: &MergedConfig,
	package_dir: &Path,
) -> Result<CommandTransformer> {
	let transformer = match (&args.transformer, &merged.transformer) {
		(Some(command), _) => CommandTransformer::from_command(command, Vec::new())?,
		(None, Some(spec)) => CommandTransformer::from_command(&spec.program, spec.args.clone())
			.with_context(|| format!("Transformer configured in {}", spec.source.display()))?,
		(None, None) => anyhow::bail!(
			"No transformer configured. Use --transformer, set `transformer` in {}, or pass --dry-run.",
			CONFIG_FILE_NAME
		),
	};

	Ok(transformer.with_working_dir(package_dir))
}

fn display_relative(path: &Path, base: &Path) -> String {
	path.strip_prefix(base)
		.unwrap_or(path)
		.display()
		.to_string()
}

fn handle_resolve(source_file: &Path, rules: &[String]) -> Result<ExitCode> {
	let rules = rules
		.iter()
		.map(|rule| RuleExpression::parse(rule))
		.collect::<std::result::Result<Vec<_>, _>>()
		.context("Invalid transform rule")?;

	for path in resolve_transform_paths(source_file, &rules) {
		println!("{}", path.display());
	}

	Ok(ExitCode::SUCCESS)
}

fn handle_config_show(package_dir: Option<PathBuf>) -> Result<ExitCode> {
	let package_dir = package_dir_or_cwd(package_dir)?;
	let configs = discover_configs(&package_dir).context("Failed to discover config files")?;

	if configs.is_empty() {
		println!("No configuration files found.");
	} else {
		println!("Configuration files (in cascade order):\n");

		for loaded in &configs {
			println!("# Source: {}", loaded.path.display());
			println!("# root: {}", loaded.config.root);
			if let Some(ref transformer) = loaded.config.transformer {
				println!("# transformer: {}", transformer);
			}
			if !loaded.config.transformer_args.is_empty() {
				println!("# transformer-args: {:?}", loaded.config.transformer_args);
			}
			println!("# variables: {}", loaded.config.variables.len());
			println!();
		}
	}

	let merged = merge_configs(&configs);
	if !merged.variables.is_empty() {
		println!("Effective variables:");
		for (name, value) in merged.variables.iter() {
			println!("  {} = {:?}", name, value);
		}
		println!();
	}

	let settings = ConventionSettings::from_variables(&merged.variables)
		.context("Invalid transform rules in configuration")?;
	println!("Transform rules:");
	for rule in settings.implicit_rules() {
		println!("  {} (automatic)", rule);
	}
	for rule in &settings.explicit_rules {
		println!("  {}", rule);
	}
	println!("Search patterns: {}", settings.search_patterns().join(", "));
	println!();

	// Show user config path
	if let Ok(user_path) = user_config_path() {
		println!("User config path: {}", user_path.display());
		if user_path.exists() {
			println!("  (exists)");
		} else {
			println!("  (not found)");
		}
	}

	Ok(ExitCode::SUCCESS)
}

fn handle_config_validate(package_dir: Option<PathBuf>) -> Result<ExitCode> {
	let package_dir = package_dir_or_cwd(package_dir)?;

	match discover_configs(&package_dir) {
		Ok(configs) => {
			if configs.is_empty() {
				println!("No configuration files found.");
			} else {
				println!("All configuration files are valid:");
				for loaded in &configs {
					println!(
						"  {} ({} variables)",
						loaded.path.display(),
						loaded.config.variables.len()
					);
				}
			}
			Ok(ExitCode::SUCCESS)
		}
		Err(e) => {
			eprintln!("Configuration error: {}", e);
			Ok(ExitCode::FAILURE)
		}
	}
}
