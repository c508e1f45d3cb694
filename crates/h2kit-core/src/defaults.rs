//! Built-in attribute defaults for layers and instruments.

use crate::attributes::{AttrValue, Attributes};

/// A compile-time default value.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum DefaultValue {
    Int(i64),
    Text(&'static str),
}

impl From<DefaultValue> for AttrValue {
    fn from(value: DefaultValue) -> Self {
        match value {
            DefaultValue::Int(n) => AttrValue::from(n),
            DefaultValue::Text(s) => AttrValue::from(s),
        }
    }
}

/// An ordered table of defaults.
///
/// Tables are plain constants; constructors turn them into a fresh
/// [`Attributes`] each time, so no two instruments ever share state.
#[derive(Clone, Copy, Debug)]
pub struct Defaults {
    entries: &'static [(&'static str, DefaultValue)],
}

impl Defaults {
    pub const fn new(entries: &'static [(&'static str, DefaultValue)]) -> Self {
        Self { entries }
    }

    pub fn attributes(&self) -> Attributes {
        self.entries
            .iter()
            .map(|(key, value)| (key.to_string(), AttrValue::from(*value)))
            .collect()
    }
}

/// Velocity range, gain and pitch of a layer.
pub const LAYER_DEFAULTS: Defaults = Defaults::new(&[
    ("min", DefaultValue::Int(0)),
    ("max", DefaultValue::Int(1)),
    ("gain", DefaultValue::Int(1)),
    ("pitch", DefaultValue::Int(0)),
]);

/// Mixer, filter and ADSR envelope settings of an instrument.
pub const INSTRUMENT_DEFAULTS: Defaults = Defaults::new(&[
    ("volume", DefaultValue::Int(1)),
    ("isMuted", DefaultValue::Text("false")),
    ("pan_L", DefaultValue::Int(1)),
    ("pan_R", DefaultValue::Int(1)),
    ("randomPitchFactor", DefaultValue::Int(0)),
    ("filterActive", DefaultValue::Text("false")),
    ("filterCutoff", DefaultValue::Int(1)),
    ("filterResonance", DefaultValue::Int(0)),
    ("Attack", DefaultValue::Int(0)),
    ("Decay", DefaultValue::Int(0)),
    ("Sustain", DefaultValue::Int(1)),
    ("Release", DefaultValue::Int(1000)),
]);
