//! Dynamic registry driver.
//!
//! Applies each content pack as its own reload cycle, in command-line order. A pack
//! that fails to apply is rolled back and the registries keep the contents of the
//! last pack that succeeded.

use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::Parser;
use dynreg_registry::{ContentPack, RegistryId, ReloadConfig, ReloadController};
use tracing::{error, info};

/// Driver command line arguments.
#[derive(Parser, Debug)]
#[command(name = "dynreg")]
#[command(about = "Apply content packs to dynamic registries with rollback")]
struct Args {
	/// Reload configuration (TOML)
	#[arg(short, long, value_name = "PATH")]
	config: Option<PathBuf>,

	/// Verbose logging
	#[arg(short, long)]
	verbose: bool,

	/// Continue with the next pack when one fails
	#[arg(long)]
	keep_going: bool,

	/// Content packs (JSON), applied in order
	#[arg(required = true, value_name = "PACK")]
	packs: Vec<PathBuf>,
}

fn main() -> Result<()> {
	let args = Args::parse();

	let subscriber = tracing_subscriber::fmt()
		.with_max_level(if args.verbose {
			tracing::Level::DEBUG
		} else {
			tracing::Level::INFO
		})
		.with_writer(std::io::stderr)
		.finish();
	tracing::subscriber::set_global_default(subscriber)?;

	let config = match &args.config {
		Some(path) => ReloadConfig::load(path).with_context(|| format!("loading config {}", path.display()))?,
		None => ReloadConfig::default(),
	};
	let mut controller = ReloadController::new(&config);

	let mut failed = 0;
	for path in &args.packs {
		let pack = ContentPack::from_path(path).with_context(|| format!("reading pack {}", path.display()))?;
		match controller.reload(|set| pack.apply(set).map(drop)) {
			Ok(report) => info!(pack = %path.display(), entries = pack.len(), ?report, "pack applied"),
			Err(e) if args.keep_going => {
				error!(pack = %path.display(), error = %e, "pack rolled back");
				failed += 1;
			}
			Err(e) => return Err(e).with_context(|| format!("applying pack {}", path.display())),
		}
	}

	print_summary(&controller);

	if failed > 0 {
		bail!("{failed} of {} packs rolled back", args.packs.len());
	}
	Ok(())
}

fn print_summary(controller: &ReloadController) {
	let view = controller.registries();
	for id in RegistryId::ALL {
		let Some(store) = view.registry(id) else {
			continue;
		};
		println!("{:<20} {:>6}  {}", id.name(), store.len(), store.lifecycle());
	}
}

#[cfg(test)]
mod tests {
	use clap::CommandFactory;

	use super::*;

	#[test]
	fn args_are_well_formed() {
		Args::command().debug_assert();
	}

	#[test]
	fn packs_are_required() {
		assert!(Args::try_parse_from(["dynreg"]).is_err());

		let args = Args::try_parse_from(["dynreg", "-v", "--config", "reload.toml", "a.json", "b.json"]).unwrap();
		assert!(args.verbose);
		assert!(!args.keep_going);
		assert_eq!(args.config, Some(PathBuf::from("reload.toml")));
		assert_eq!(args.packs, [PathBuf::from("a.json"), PathBuf::from("b.json")]);
	}
}
