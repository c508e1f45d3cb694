//! Kit description decoding.
//!
//! A kit description is a YAML sequence. Each entry is either a plain string
//! (an instrument named after the single sample it plays) or a mapping:
//!
//! ```yaml
//! - kick.wav
//! - name: snare
//!   filename: snare.wav
//!   volume: 0.8
//! - name: hihat
//!   layers:
//!     - filename: hh_soft.wav
//!       max: 0.5
//!     - filename: hh_hard.wav
//!       min: 0.5
//! ```
//!
//! Decoding looks at all keys of a mapping before deciding anything, so the
//! outcome never depends on key order in the document.

use crate::attributes::{describe_value, is_valid_key, AttrValue, Attributes};
use crate::error::Error;
use crate::Result;
use serde_yaml::{Mapping, Value};
use std::fs;
use std::path::Path;

/// How an instrument was written in the description.
#[derive(Clone, Debug, PartialEq)]
pub enum InstrumentSpec {
    /// `- kick.wav`: name and sole sample share the same string.
    Shorthand(String),
    /// A mapping with a `name`, optional extra attributes and its samples.
    Explicit {
        name: String,
        /// All scalar keys of the mapping in source order, `name` included.
        attributes: Attributes,
        layers: LayerSpec,
    },
}

/// The samples of a mapping-form instrument.
#[derive(Clone, Debug, PartialEq)]
pub enum LayerSpec {
    /// `filename: snare.wav`
    SingleFile(String),
    /// `layers: [...]`
    LayerList(Vec<LayerEntry>),
}

/// One entry of a `layers` list.
#[derive(Clone, Debug, PartialEq)]
pub struct LayerEntry {
    pub filename: String,
    /// Per-layer overrides, without `filename`.
    pub attributes: Attributes,
}

impl InstrumentSpec {
    /// Decode the sequence entry at `index`.
    pub fn decode(index: usize, value: &Value) -> Result<Self> {
        let ident = format!("instrument #{}", index);
        match value {
            Value::String(name) if name.is_empty() => Err(Error::InvalidFilename {
                ident,
                value: describe_value(value),
            }),
            Value::String(name) => Ok(InstrumentSpec::Shorthand(name.clone())),
            Value::Mapping(mapping) => decode_mapping(ident, mapping),
            _ => Err(Error::InvalidEntry(ident)),
        }
    }

    pub fn name(&self) -> &str {
        match self {
            InstrumentSpec::Shorthand(name) => name,
            InstrumentSpec::Explicit { name, .. } => name,
        }
    }
}

/// Parse a kit description from a string.
pub fn parse_description(content: &str) -> Result<Vec<InstrumentSpec>> {
    let document: Value = serde_yaml::from_str(content)?;

    let entries = match &document {
        Value::Sequence(entries) => entries,
        other => return Err(Error::NotASequence(describe_value(other))),
    };

    if entries.is_empty() {
        log::warn!("Kit description contains no instruments");
    }

    entries
        .iter()
        .enumerate()
        .map(|(index, entry)| InstrumentSpec::decode(index, entry))
        .collect()
}

/// Parse a kit description from a file.
pub fn load_description<P: AsRef<Path>>(path: P) -> Result<Vec<InstrumentSpec>> {
    let path = path.as_ref();
    log::info!("Loading kit description from {}", path.display());

    let content = fs::read_to_string(path)?;
    parse_description(&content)
}

fn decode_mapping(ident: String, mapping: &Mapping) -> Result<InstrumentSpec> {
    let name = match mapping.get("name") {
        Some(value) => AttrValue::from_yaml("name", value, &ident)?.to_string(),
        None => return Err(Error::MissingName(ident)),
    };
    let ident = format!("{} ({})", ident, name);

    let mut filename = None;
    let mut layers = None;
    let mut attributes = Vec::with_capacity(mapping.len());

    for (key, value) in mapping {
        let key = key_str(key, &ident)?;
        match key {
            "filename" => filename = Some(value),
            "layers" => layers = Some(value),
            _ => attributes.push((key.to_string(), AttrValue::from_yaml(key, value, &ident)?)),
        }
    }

    let layers = match (filename, layers) {
        (Some(_), Some(_)) => return Err(Error::AmbiguousLayers(ident)),
        (Some(filename), None) => LayerSpec::SingleFile(decode_filename(filename, &ident)?),
        (None, Some(layers)) => LayerSpec::LayerList(decode_layer_list(layers, &ident)?),
        (None, None) => return Err(Error::MissingLayers(ident)),
    };

    Ok(InstrumentSpec::Explicit {
        name,
        attributes: attributes.into_iter().collect(),
        layers,
    })
}

fn decode_layer_list(value: &Value, ident: &str) -> Result<Vec<LayerEntry>> {
    let entries = value
        .as_sequence()
        .ok_or_else(|| Error::LayersNotSequence(ident.to_string()))?;

    if entries.is_empty() {
        return Err(Error::MissingLayers(ident.to_string()));
    }

    entries
        .iter()
        .enumerate()
        .map(|(index, entry)| decode_layer(index, entry, ident))
        .collect()
}

fn decode_layer(index: usize, value: &Value, ident: &str) -> Result<LayerEntry> {
    let mapping = value.as_mapping().ok_or_else(|| Error::LayerNotMapping {
        ident: ident.to_string(),
        index,
    })?;

    let filename = match mapping.get("filename") {
        Some(filename) => decode_filename(filename, ident)?,
        None => {
            return Err(Error::MissingFilename {
                ident: ident.to_string(),
                index,
            })
        }
    };
    let layer_ident = format!("layer ({})", filename);

    let mut attributes = Vec::with_capacity(mapping.len());
    for (key, value) in mapping {
        let key = key_str(key, &layer_ident)?;
        if key != "filename" {
            attributes.push((key.to_string(), AttrValue::from_yaml(key, value, &layer_ident)?));
        }
    }

    Ok(LayerEntry {
        filename,
        attributes: attributes.into_iter().collect(),
    })
}

fn decode_filename(value: &Value, ident: &str) -> Result<String> {
    match value {
        Value::String(filename) if !filename.is_empty() => Ok(filename.clone()),
        other => Err(Error::InvalidFilename {
            ident: ident.to_string(),
            value: describe_value(other),
        }),
    }
}

fn key_str<'a>(key: &'a Value, ident: &str) -> Result<&'a str> {
    match key {
        Value::String(key) if is_valid_key(key) => Ok(key),
        other => Err(Error::InvalidKey {
            key: describe_value(other),
            ident: ident.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decode(yaml: &str) -> Result<InstrumentSpec> {
        let value: Value = serde_yaml::from_str(yaml).unwrap();
        InstrumentSpec::decode(3, &value)
    }

    #[test]
    fn test_shorthand() {
        let spec = decode("kick.wav").unwrap();
        assert_eq!(spec, InstrumentSpec::Shorthand("kick.wav".to_string()));
        assert_eq!(spec.name(), "kick.wav");
    }

    #[test]
    fn test_single_file_mapping() {
        let spec = decode("{name: snare, filename: snare.wav, volume: 0.8}").unwrap();
        match spec {
            InstrumentSpec::Explicit { name, attributes, layers } => {
                assert_eq!(name, "snare");
                let keys: Vec<_> = attributes.keys().collect();
                assert_eq!(keys, vec!["name", "volume"]);
                assert_eq!(layers, LayerSpec::SingleFile("snare.wav".to_string()));
            }
            other => panic!("unexpected spec: {:?}", other),
        }
    }

    #[test]
    fn test_layer_list() {
        let yaml = r#"
name: hihat
layers:
  - filename: hh_soft.wav
    max: 0.5
  - {min: 0.5, filename: hh_hard.wav}
"#;
        let spec = decode(yaml).unwrap();
        let InstrumentSpec::Explicit { layers: LayerSpec::LayerList(entries), .. } = spec else {
            panic!("expected a layer list");
        };
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].filename, "hh_soft.wav");
        assert_eq!(entries[0].attributes.get("max").unwrap().to_string(), "0.5");
        assert_eq!(entries[1].filename, "hh_hard.wav");
        assert!(!entries[1].attributes.contains_key("filename"));
    }

    #[test]
    fn test_key_order_does_not_matter() {
        let a = decode("{filename: a.wav, name: x}").unwrap();
        let b = decode("{name: x, filename: a.wav}").unwrap();
        assert_eq!(a.name(), b.name());
        assert!(matches!(a, InstrumentSpec::Explicit { layers: LayerSpec::SingleFile(_), .. }));
    }

    #[test]
    fn test_missing_name() {
        let err = decode("{filename: snare.wav}").unwrap_err();
        assert!(matches!(err, Error::MissingName(_)));
        assert!(err.to_string().contains("instrument #3"));
    }

    #[test]
    fn test_missing_layers() {
        let err = decode("{name: snare, volume: 1}").unwrap_err();
        assert!(matches!(err, Error::MissingLayers(ref ident) if ident == "instrument #3 (snare)"));

        let err = decode("{name: snare, layers: []}").unwrap_err();
        assert!(matches!(err, Error::MissingLayers(_)));
    }

    #[test]
    fn test_filename_and_layers_is_ambiguous() {
        let err = decode("{name: snare, filename: a.wav, layers: [{filename: b.wav}]}").unwrap_err();
        assert!(matches!(err, Error::AmbiguousLayers(_)));
        // Each alone is fine
        assert!(decode("{name: snare, filename: a.wav}").is_ok());
        assert!(decode("{name: snare, layers: [{filename: b.wav}]}").is_ok());
    }

    #[test]
    fn test_layers_not_a_sequence() {
        let err = decode("{name: snare, layers: snare.wav}").unwrap_err();
        assert!(matches!(err, Error::LayersNotSequence(_)));
    }

    #[test]
    fn test_layer_errors() {
        let err = decode("{name: snare, layers: [{filename: a.wav}, {gain: 2}]}").unwrap_err();
        assert!(matches!(err, Error::MissingFilename { index: 1, .. }));

        let err = decode("{name: snare, layers: [a.wav]}").unwrap_err();
        assert!(matches!(err, Error::LayerNotMapping { index: 0, .. }));
    }

    #[test]
    fn test_illegal_values() {
        let err = decode("{name: snare, filename: a.wav, volume: [1, 2]}").unwrap_err();
        match err {
            Error::IllegalValue { key, ident, .. } => {
                assert_eq!(key, "volume");
                assert_eq!(ident, "instrument #3 (snare)");
            }
            other => panic!("unexpected error: {}", other),
        }

        let err = decode("{name: snare, layers: [{filename: a.wav, gain: ~}]}").unwrap_err();
        match err {
            Error::IllegalValue { key, ident, .. } => {
                assert_eq!(key, "gain");
                assert_eq!(ident, "layer (a.wav)");
            }
            other => panic!("unexpected error: {}", other),
        }

        assert!(matches!(
            decode("{name: {first: a}, filename: a.wav}").unwrap_err(),
            Error::IllegalValue { .. }
        ));
    }

    #[test]
    fn test_invalid_filename_and_keys() {
        assert!(matches!(
            decode("{name: snare, filename: 12}").unwrap_err(),
            Error::InvalidFilename { .. }
        ));
        assert!(matches!(decode("''").unwrap_err(), Error::InvalidFilename { .. }));
        assert!(matches!(
            decode("{name: snare, filename: a.wav, 'bad key': 1}").unwrap_err(),
            Error::InvalidKey { .. }
        ));
    }

    #[test]
    fn test_invalid_entry() {
        let err = decode("[kick.wav]").unwrap_err();
        assert!(matches!(err, Error::InvalidEntry(ref ident) if ident == "instrument #3"));
        assert!(matches!(decode("42").unwrap_err(), Error::InvalidEntry(_)));
    }

    #[test]
    fn test_parse_description() {
        let specs = parse_description("- kick.wav\n- {name: snare, filename: snare.wav}\n").unwrap();
        assert_eq!(specs.len(), 2);
        assert_eq!(specs[1].name(), "snare");

        assert!(parse_description("[]").unwrap().is_empty());
        assert!(matches!(
            parse_description("name: kick").unwrap_err(),
            Error::NotASequence(_)
        ));
        assert!(matches!(parse_description("- [unclosed").unwrap_err(), Error::Yaml(_)));
    }
}
