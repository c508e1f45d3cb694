use std::io;
use thiserror::Error;

/// Errors that can occur while turning a kit description into a drum kit
///
/// Kit errors fall into a few categories:
///
/// - Structural errors: the YAML document does not follow the kit schema
/// - Value errors: an attribute carries something that cannot become element text
/// - Resolution errors: a referenced sample could not be found in any search directory
/// - Output errors: writing the manifest or touching the filesystem failed
///
/// Every variant that concerns a single instrument or layer carries an
/// identifier such as `instrument #2 (snare)` or `layer (snare_hard.wav)` so the
/// offending entry can be located in the description.
#[derive(Error, Debug)]
pub enum Error {
    /// Input/Output error when reading descriptions or writing output
    #[error("IO error: {0}")]
    IO(#[from] io::Error),

    /// The description is not valid YAML
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// The document root is something other than a sequence
    ///
    /// A kit description is always a list of instruments, even if it holds a
    /// single entry.
    #[error("drumkit description should contain a YAML sequence, found {0}")]
    NotASequence(String),

    /// A sequence entry is neither a plain string nor a mapping
    #[error("{0} is neither a mapping nor a string")]
    InvalidEntry(String),

    /// A mapping-form instrument has no `name` key
    #[error("{0} is missing a name")]
    MissingName(String),

    /// A mapping-form instrument has neither `filename` nor `layers`
    #[error("no filename/layers for {0}")]
    MissingLayers(String),

    /// A mapping-form instrument has both `filename` and `layers`
    ///
    /// Only one way of naming the samples is accepted so the intent of the
    /// description is never guessed.
    #[error("{0} has both filename and layers, use one of them")]
    AmbiguousLayers(String),

    /// The `layers` value is not a sequence
    #[error("layers of {0} is not a list")]
    LayersNotSequence(String),

    /// An entry inside `layers` is not a mapping
    #[error("layer #{index} in {ident} is not a mapping")]
    LayerNotMapping {
        /// Owning instrument
        ident: String,
        /// Position of the entry in the `layers` list (0-based)
        index: usize,
    },

    /// An entry inside `layers` has no `filename` key
    #[error("layer #{index} in {ident} is missing filename")]
    MissingFilename {
        /// Owning instrument
        ident: String,
        /// Position of the entry in the `layers` list (0-based)
        index: usize,
    },

    /// A `filename` is empty or not a string
    #[error("invalid filename {value} in {ident}")]
    InvalidFilename {
        /// Owning instrument or layer
        ident: String,
        /// Description of the rejected value
        value: String,
    },

    /// An attribute value that cannot be written as element text
    ///
    /// Only strings, integers, finite floats and booleans are accepted.
    /// Nested sequences and mappings, null and tagged values are rejected.
    #[error("Illegal value: {value} for '{key}' tag in {ident}")]
    IllegalValue {
        /// Attribute name
        key: String,
        /// Description of the rejected value
        value: String,
        /// Owning instrument or layer
        ident: String,
    },

    /// An attribute key that is not usable as an XML element name
    #[error("invalid key {key} in {ident}")]
    InvalidKey {
        /// The rejected key, rendered for display
        key: String,
        /// Owning instrument or layer
        ident: String,
    },

    /// The kit display name cannot be used as the archive's top-level folder
    #[error("invalid kit name '{0}'")]
    InvalidKitName(String),

    /// A sample file was not found in any search directory
    ///
    /// Both the case-sensitive and the case-insensitive pass came up empty.
    #[error("Could not find {0}")]
    SampleNotFound(String),

    /// Writing the XML manifest failed
    #[error("XML error: {0}")]
    Xml(String),
}
