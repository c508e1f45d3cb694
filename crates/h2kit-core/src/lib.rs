//! Drum kit packaging for the Hydrogen drum machine.
//!
//! This crate turns a YAML kit description into a `.h2drumkit` archive:
//! - Kit description decoding into instruments and layers
//! - `drumkit.xml` manifest generation
//! - Sample lookup across search directories
//! - Staging and archiving of manifest plus samples
//!
//! # Example
//!
//! ```ignore
//! use h2kit_core::{package_kit, Kit, SampleResolver};
//!
//! let description = std::fs::read_to_string("kit.yaml")?;
//! let kit = Kit::from_description("MyKit", &description)?;
//! let resolver = SampleResolver::new(["samples/"]);
//! let archive = package_kit(&kit, &resolver, "MyKit".as_ref())?;
//! ```

pub mod attributes;
pub mod defaults;
pub mod description;
mod error;
pub mod kit;
pub mod manifest;
pub mod package;
pub mod resolver;

pub use attributes::{merge, AttrValue, Attributes};
pub use defaults::{Defaults, INSTRUMENT_DEFAULTS, LAYER_DEFAULTS};
pub use description::{load_description, parse_description, InstrumentSpec, LayerEntry, LayerSpec};
pub use error::Error;
pub use kit::{Instrument, Kit, Layer};
pub use manifest::{manifest_to_string, write_manifest, MANIFEST_NAME};
pub use package::{default_kit_name, normalize_output_path, package_kit, KIT_SUFFIX};
pub use resolver::{find_filepath, SampleResolver};

pub type Result<T> = std::result::Result<T, Error>;
