//! Kit, instrument and layer types.

use crate::attributes::{merge, Attributes};
use crate::defaults::{Defaults, INSTRUMENT_DEFAULTS, LAYER_DEFAULTS};
use crate::description::{parse_description, InstrumentSpec, LayerSpec};
use crate::error::Error;
use crate::Result;
use std::collections::HashSet;

/// One sample assigned to a velocity/pitch range within an instrument.
#[derive(Clone, Debug, PartialEq)]
pub struct Layer {
    filename: String,
    attributes: Attributes,
}

impl Layer {
    /// Build a layer with [`LAYER_DEFAULTS`].
    pub fn new(filename: &str, overrides: &Attributes) -> Self {
        Self::with_defaults(filename, overrides, &LAYER_DEFAULTS)
    }

    pub fn with_defaults(filename: &str, overrides: &Attributes, defaults: &Defaults) -> Self {
        let base = defaults.attributes().with("filename", filename);
        Self {
            filename: filename.to_string(),
            attributes: merge(&base, overrides),
        }
    }

    /// Sample file name referenced by the manifest.
    pub fn filename(&self) -> &str {
        &self.filename
    }

    pub fn attributes(&self) -> &Attributes {
        &self.attributes
    }
}

/// A named sound source with one or more layers.
#[derive(Clone, Debug, PartialEq)]
pub struct Instrument {
    id: usize,
    name: String,
    attributes: Attributes,
    layers: Vec<Layer>,
}

impl Instrument {
    /// Build an instrument from an already decoded description entry.
    pub fn from_spec(id: usize, spec: &InstrumentSpec) -> Self {
        Self::from_spec_with_defaults(id, spec, &INSTRUMENT_DEFAULTS, &LAYER_DEFAULTS)
    }

    pub fn from_spec_with_defaults(
        id: usize,
        spec: &InstrumentSpec,
        defaults: &Defaults,
        layer_defaults: &Defaults,
    ) -> Self {
        let base = defaults.attributes().with("id", id);
        let no_overrides = Attributes::new();

        let (attributes, layers) = match spec {
            InstrumentSpec::Shorthand(name) => (
                base.with("name", name.as_str()),
                vec![Layer::with_defaults(name, &no_overrides, layer_defaults)],
            ),
            InstrumentSpec::Explicit {
                attributes,
                layers,
                ..
            } => {
                let layers = match layers {
                    LayerSpec::SingleFile(filename) => {
                        vec![Layer::with_defaults(filename, &no_overrides, layer_defaults)]
                    }
                    LayerSpec::LayerList(entries) => entries
                        .iter()
                        .map(|entry| {
                            Layer::with_defaults(&entry.filename, &entry.attributes, layer_defaults)
                        })
                        .collect(),
                };
                (merge(&base, attributes), layers)
            }
        };

        Self {
            id,
            name: spec.name().to_string(),
            attributes,
            layers,
        }
    }

    /// Position of the instrument in the description.
    pub fn id(&self) -> usize {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn attributes(&self) -> &Attributes {
        &self.attributes
    }

    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }
}

/// The unit being packaged: a display name plus ordered instruments.
#[derive(Clone, Debug, PartialEq)]
pub struct Kit {
    name: String,
    info: Option<String>,
    instruments: Vec<Instrument>,
}

impl Kit {
    /// Create a kit. The name becomes the top-level folder of the archive.
    pub fn new(name: impl Into<String>, instruments: Vec<Instrument>) -> Result<Self> {
        let name = name.into();
        if name.is_empty() || name.contains(|c| c == '/' || c == '\\') || name == "." || name == ".." {
            return Err(Error::InvalidKitName(name));
        }
        Ok(Self {
            name,
            info: None,
            instruments,
        })
    }

    /// Decode a YAML kit description and build the kit from it.
    pub fn from_description(name: impl Into<String>, content: &str) -> Result<Self> {
        Self::from_specs(name, &parse_description(content)?)
    }

    /// Build the kit from decoded description entries, numbering them in order.
    pub fn from_specs(name: impl Into<String>, specs: &[InstrumentSpec]) -> Result<Self> {
        let instruments = specs
            .iter()
            .enumerate()
            .map(|(id, spec)| Instrument::from_spec(id, spec))
            .collect();
        Self::new(name, instruments)
    }

    /// Attach a free-text description written to the manifest.
    pub fn with_info(mut self, info: Option<String>) -> Self {
        self.info = info;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn info(&self) -> Option<&str> {
        self.info.as_deref()
    }

    pub fn instruments(&self) -> &[Instrument] {
        &self.instruments
    }

    /// Every distinct sample file name referenced by the kit, in first-use order.
    pub fn sample_filenames(&self) -> Vec<&str> {
        let mut seen = HashSet::new();
        self.instruments
            .iter()
            .flat_map(|instrument| instrument.layers())
            .map(Layer::filename)
            .filter(|filename| seen.insert(*filename))
            .collect()
    }
}
