//! Measurement model shared by the resolver and the bundlers
//!
//! Configuration data is a three-level hierarchy:
//! - [`Measurement`]: one per domain ([`MeasurementType`]), e.g. `K8s` or `GPU`
//! - [`Subtype`]: a named group of readings inside a measurement, e.g. `control-plane`
//! - [`Reading`]: a single typed value
//!
//! All data is owned (`String`, `BTreeMap`, `Vec`), so `Clone` is a full
//! structural copy. The resolver relies on this to hand out recipes that
//! never alias the shared overlay store.

pub mod reading;

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

pub use reading::Reading;

use crate::error::{Result, recipe::invalid_request};

/// Domain a measurement belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum MeasurementType {
    K8s,
    #[serde(rename = "GPU")]
    Gpu,
    #[serde(rename = "OS")]
    Os,
    SystemD,
}

impl MeasurementType {
    pub const ALL: [MeasurementType; 4] = [
        MeasurementType::K8s,
        MeasurementType::Gpu,
        MeasurementType::Os,
        MeasurementType::SystemD,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            MeasurementType::K8s => "K8s",
            MeasurementType::Gpu => "GPU",
            MeasurementType::Os => "OS",
            MeasurementType::SystemD => "SystemD",
        }
    }
}

impl fmt::Display for MeasurementType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MeasurementType {
    type Err = crate::error::StackError;

    fn from_str(s: &str) -> Result<Self> {
        MeasurementType::ALL
            .into_iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| invalid_request(format!("unknown measurement type '{s}'")))
    }
}

/// Named group of readings
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Subtype {
    #[serde(rename = "subtype")]
    pub name: String,

    #[serde(default)]
    pub data: BTreeMap<String, Reading>,

    /// Optional provenance notes keyed like `data`
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub context: BTreeMap<String, String>,
}

impl Subtype {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            data: BTreeMap::new(),
            context: BTreeMap::new(),
        }
    }

    pub fn with_reading(mut self, key: impl Into<String>, value: impl Into<Reading>) -> Self {
        self.data.insert(key.into(), value.into());
        self
    }

    pub fn with_context(mut self, key: impl Into<String>, note: impl Into<String>) -> Self {
        self.context.insert(key.into(), note.into());
        self
    }

    pub fn get(&self, key: &str) -> Option<&Reading> {
        self.data.get(key)
    }
}

/// All readings gathered for one domain
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Measurement {
    #[serde(rename = "type")]
    pub measurement_type: MeasurementType,

    #[serde(default)]
    pub subtypes: Vec<Subtype>,
}

impl Measurement {
    pub fn new(measurement_type: MeasurementType) -> Self {
        Self {
            measurement_type,
            subtypes: Vec::new(),
        }
    }

    pub fn with_subtype(mut self, subtype: Subtype) -> Self {
        self.subtypes.push(subtype);
        self
    }

    pub fn subtype(&self, name: &str) -> Option<&Subtype> {
        self.subtypes.iter().find(|s| s.name == name)
    }

    pub fn subtype_mut(&mut self, name: &str) -> Option<&mut Subtype> {
        self.subtypes.iter_mut().find(|s| s.name == name)
    }

    /// Fold an overlay measurement of the same type into this one.
    ///
    /// Overlay readings overwrite colliding keys, other keys survive, unknown
    /// subtypes are appended, and overlay subtypes with no data are skipped.
    pub fn merge(&mut self, overlay: &Measurement) {
        debug_assert_eq!(self.measurement_type, overlay.measurement_type);

        let mut by_name: HashMap<String, usize> = self
            .subtypes
            .iter()
            .enumerate()
            .map(|(idx, s)| (s.name.clone(), idx))
            .collect();

        for incoming in &overlay.subtypes {
            if incoming.data.is_empty() {
                continue;
            }
            match by_name.get(&incoming.name) {
                Some(&idx) => {
                    let target = &mut self.subtypes[idx];
                    for (key, value) in &incoming.data {
                        target.data.insert(key.clone(), value.clone());
                    }
                    for (key, note) in &incoming.context {
                        target.context.insert(key.clone(), note.clone());
                    }
                }
                None => {
                    by_name.insert(incoming.name.clone(), self.subtypes.len());
                    self.subtypes.push(incoming.clone());
                }
            }
        }
    }
}
