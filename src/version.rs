//! Precision-aware dotted versions used by query fields
//!
//! A version remembers how many numeric components were given, so `1.29`
//! (precision 2) can stand for "any 1.29.x" when used on the rule side of a
//! match. An unset version has precision 0 and acts as the wildcard.
//! Anything after the first `-` or `+` is kept verbatim as a suffix
//! (kernel builds such as `5.15.0-1040-aws`).

use std::fmt;
use std::str::FromStr;

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{Result, StackError, recipe::invalid_request};

/// Token accepted in place of any concrete value
pub const WILDCARD: &str = "any";

const MAX_COMPONENTS: usize = 3;

#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Version {
    components: [u64; MAX_COMPONENTS],
    precision: u8,
    suffix: Option<String>,
}

impl Version {
    /// The unconstrained version
    pub const ANY: Version = Version {
        components: [0; MAX_COMPONENTS],
        precision: 0,
        suffix: None,
    };

    pub fn new(major: u64, minor: u64, patch: u64) -> Self {
        Self {
            components: [major, minor, patch],
            precision: 3,
            suffix: None,
        }
    }

    pub fn precision(&self) -> u8 {
        self.precision
    }

    pub fn major(&self) -> u64 {
        self.components[0]
    }

    pub fn minor(&self) -> u64 {
        self.components[1]
    }

    pub fn patch(&self) -> u64 {
        self.components[2]
    }

    pub fn suffix(&self) -> Option<&str> {
        self.suffix.as_deref()
    }

    pub fn is_any(&self) -> bool {
        self.precision == 0
    }

    /// Rule-side comparison against a concrete candidate.
    ///
    /// A zero-precision rule matches everything. Otherwise the candidate must
    /// be concrete, at least as precise as the rule, agree on every component
    /// the rule names, and carry the same suffix if the rule has one.
    pub fn matches(&self, candidate: &Version) -> bool {
        if self.is_any() {
            return true;
        }
        if candidate.is_any() || candidate.precision < self.precision {
            return false;
        }
        let n = usize::from(self.precision);
        if self.components[..n] != candidate.components[..n] {
            return false;
        }
        match (&self.suffix, &candidate.suffix) {
            (None, _) => true,
            (Some(want), Some(have)) => want.eq_ignore_ascii_case(have),
            (Some(_), None) => false,
        }
    }
}

impl FromStr for Version {
    type Err = StackError;

    fn from_str(input: &str) -> Result<Self> {
        let trimmed = input.trim();
        if trimmed.is_empty() || trimmed.eq_ignore_ascii_case(WILDCARD) {
            return Ok(Version::ANY);
        }

        let unprefixed = trimmed
            .strip_prefix('v')
            .or_else(|| trimmed.strip_prefix('V'))
            .unwrap_or(trimmed);

        let (numeric, suffix) = match unprefixed.find(['-', '+']) {
            Some(idx) => (&unprefixed[..idx], Some(&unprefixed[idx + 1..])),
            None => (unprefixed, None),
        };

        let parts: Vec<&str> = numeric.split('.').collect();
        if parts.len() > MAX_COMPONENTS {
            return Err(invalid_request(format!(
                "version '{input}' has more than {MAX_COMPONENTS} components"
            )));
        }

        let mut components = [0; MAX_COMPONENTS];
        for (slot, part) in components.iter_mut().zip(&parts) {
            *slot = part
                .parse::<u64>()
                .map_err(|_| invalid_request(format!("invalid version '{input}'")))?;
        }

        #[allow(clippy::cast_possible_truncation)]
        let precision = parts.len() as u8;

        Ok(Version {
            components,
            precision,
            suffix: suffix.filter(|s| !s.is_empty()).map(str::to_string),
        })
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_any() {
            return f.write_str(WILDCARD);
        }
        let n = usize::from(self.precision);
        let joined: Vec<String> = self.components[..n].iter().map(u64::to_string).collect();
        f.write_str(&joined.join("."))?;
        if let Some(suffix) = &self.suffix {
            write!(f, "-{suffix}")?;
        }
        Ok(())
    }
}

impl Serialize for Version {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

struct VersionVisitor;

impl Visitor<'_> for VersionVisitor {
    type Value = Version;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a quoted dotted version such as \"1.29\" or \"5.15.0-1040-aws\"")
    }

    fn visit_str<E>(self, value: &str) -> std::result::Result<Version, E>
    where
        E: de::Error,
    {
        value.parse().map_err(|e: StackError| E::custom(e))
    }

    fn visit_u64<E>(self, value: u64) -> std::result::Result<Version, E>
    where
        E: de::Error,
    {
        Ok(Version {
            components: [value, 0, 0],
            precision: 1,
            suffix: None,
        })
    }

    fn visit_f64<E>(self, value: f64) -> std::result::Result<Version, E>
    where
        E: de::Error,
    {
        Err(E::custom(format!(
            "version {value} was parsed as a number; quote it to keep trailing zeros"
        )))
    }
}

impl<'de> Deserialize<'de> for Version {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(VersionVisitor)
    }
}
