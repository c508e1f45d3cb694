//! h2kit CLI - The `h2kit` command.
//!
//! Packages a YAML drum kit description and its samples into a `.h2drumkit`
//! archive for the Hydrogen drum machine.
//!
//! # Example
//!
//! ```text
//! h2kit -i kit.yaml -o MyKit -s ~/samples/drums ~/samples/extra --info "Dry acoustic kit"
//! ```

use anyhow::{Context, Result};
use clap::Parser;
use h2kit_core::{default_kit_name, load_description, package_kit, Kit, SampleResolver};
use std::path::PathBuf;

/// h2kit - Hydrogen drum kit packager
#[derive(Parser, Debug)]
#[command(name = "h2kit")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Build a .h2drumkit archive from a YAML kit description", long_about = None)]
struct Args {
    /// Input file (drum kit description, YAML)
    #[arg(short = 'i', long = "input", value_name = "FILE")]
    input: PathBuf,

    /// Output archive; ".h2drumkit" is appended when missing
    #[arg(short = 'o', long = "output", value_name = "FILE")]
    output: PathBuf,

    /// Sample search directories, searched in the given order
    #[arg(short = 's', long = "search-dir", value_name = "DIR", num_args = 1.., required = true)]
    search_dirs: Vec<PathBuf>,

    /// Kit name (by default the output file name)
    #[arg(short = 'n', long = "name", value_name = "NAME")]
    name: Option<String>,

    /// Info text stored in the kit manifest
    #[arg(long = "info", value_name = "TEXT")]
    info: Option<String>,
}

fn main() -> Result<()> {
    let args = Args::parse();

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp(None)
        .init();

    build_kit(args)
}

fn build_kit(args: Args) -> Result<()> {
    let name = args
        .name
        .unwrap_or_else(|| default_kit_name(&args.output));

    let specs = load_description(&args.input)
        .with_context(|| format!("Failed to load kit description: {}", args.input.display()))?;
    let kit = Kit::from_specs(name, &specs)?.with_info(args.info);
    log::info!("Kit '{}' has {} instruments", kit.name(), kit.instruments().len());

    let resolver = SampleResolver::new(args.search_dirs);
    let archive = package_kit(&kit, &resolver, &args.output)?;

    log::info!("Done: {}", archive.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_args_definition() {
        Args::command().debug_assert();
    }

    #[test]
    fn test_parse_args() {
        let args = Args::try_parse_from([
            "h2kit", "-i", "kit.yaml", "-o", "MyKit", "-s", "a", "b", "--info", "dry",
        ])
        .unwrap();
        assert_eq!(args.input, PathBuf::from("kit.yaml"));
        assert_eq!(args.output, PathBuf::from("MyKit"));
        assert_eq!(args.search_dirs, vec![PathBuf::from("a"), PathBuf::from("b")]);
        assert_eq!(args.name, None);
        assert_eq!(args.info.as_deref(), Some("dry"));

        assert!(Args::try_parse_from(["h2kit", "-i", "kit.yaml", "-o", "MyKit"]).is_err());
    }

    #[test]
    fn test_build_kit() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("kick.wav"), b"KICK").unwrap();
        std::fs::write(dir.path().join("kit.yaml"), "- kick.wav\n").unwrap();

        let args = Args {
            input: dir.path().join("kit.yaml"),
            output: dir.path().join("Rock"),
            search_dirs: vec![dir.path().to_path_buf()],
            name: None,
            info: Some("dry".to_string()),
        };
        build_kit(args).unwrap();
        assert!(dir.path().join("Rock.h2drumkit").is_file());
    }

    #[test]
    fn test_build_kit_missing_input() {
        let dir = tempfile::tempdir().unwrap();
        let args = Args {
            input: dir.path().join("missing.yaml"),
            output: dir.path().join("Rock"),
            search_dirs: vec![dir.path().to_path_buf()],
            name: Some("Rock".to_string()),
            info: None,
        };
        let err = build_kit(args).unwrap_err();
        assert!(err.to_string().contains("missing.yaml"));
        assert!(!dir.path().join("Rock.h2drumkit").exists());
    }
}
