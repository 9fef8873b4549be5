//! Platform queries and overlay match keys
//!
//! The same [`Query`] shape is used for an incoming request (the candidate)
//! and for an overlay's match key (the rule). Empty fields and the `any`
//! token mean "unconstrained".

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{Result, recipe::invalid_request};
use crate::version::{Version, WILDCARD};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Query {
    #[serde(default, skip_serializing_if = "is_unset")]
    pub os: String,

    #[serde(default, skip_serializing_if = "Version::is_any")]
    pub os_version: Version,

    #[serde(default, skip_serializing_if = "Version::is_any")]
    pub kernel: Version,

    #[serde(default, skip_serializing_if = "is_unset")]
    pub service: String,

    #[serde(default, skip_serializing_if = "Version::is_any")]
    pub k8s_version: Version,

    #[serde(default, skip_serializing_if = "is_unset")]
    pub gpu: String,

    #[serde(default, skip_serializing_if = "is_unset")]
    pub intent: String,
}

/// True for empty, blank, or wildcard string fields
pub fn is_unset(value: &str) -> bool {
    let trimmed = value.trim();
    trimmed.is_empty() || trimmed.eq_ignore_ascii_case(WILDCARD)
}

fn normalize(value: &str) -> String {
    value.trim().to_ascii_lowercase()
}

impl Query {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_os(mut self, os: &str) -> Self {
        self.os = normalize(os);
        self
    }

    pub fn with_os_version(mut self, version: &str) -> Result<Self> {
        self.os_version = version.parse()?;
        Ok(self)
    }

    pub fn with_kernel(mut self, version: &str) -> Result<Self> {
        self.kernel = version.parse()?;
        Ok(self)
    }

    pub fn with_service(mut self, service: &str) -> Self {
        self.service = normalize(service);
        self
    }

    pub fn with_k8s_version(mut self, version: &str) -> Result<Self> {
        self.k8s_version = version.parse()?;
        Ok(self)
    }

    pub fn with_gpu(mut self, gpu: &str) -> Self {
        self.gpu = normalize(gpu);
        self
    }

    pub fn with_intent(mut self, intent: &str) -> Self {
        self.intent = normalize(intent);
        self
    }

    /// Build a query from `field=value` pairs, e.g. `service=eks`.
    ///
    /// Field names accept both the wire spelling (`k8sVersion`) and the
    /// dashed spelling (`k8s-version`); `k8s` is an alias of the latter.
    pub fn from_pairs<'a>(pairs: impl IntoIterator<Item = &'a str>) -> Result<Self> {
        let mut query = Query::new();
        for pair in pairs {
            let (field, value) = pair
                .split_once('=')
                .ok_or_else(|| invalid_request(format!("expected field=value, got '{pair}'")))?;
            query = query.with_field(field, value)?;
        }
        Ok(query)
    }

    fn with_field(self, field: &str, value: &str) -> Result<Self> {
        match field.trim().to_ascii_lowercase().replace('_', "-").as_str() {
            "os" => Ok(self.with_os(value)),
            "os-version" | "osversion" => self.with_os_version(value),
            "kernel" => self.with_kernel(value),
            "service" => Ok(self.with_service(value)),
            "k8s" | "k8s-version" | "k8sversion" => self.with_k8s_version(value),
            "gpu" => Ok(self.with_gpu(value)),
            "intent" => Ok(self.with_intent(value)),
            other => Err(invalid_request(format!("unknown query field '{other}'"))),
        }
    }

    /// True when no field constrains anything
    pub fn is_unconstrained(&self) -> bool {
        is_unset(&self.os)
            && self.os_version.is_any()
            && self.kernel.is_any()
            && is_unset(&self.service)
            && self.k8s_version.is_any()
            && is_unset(&self.gpu)
            && is_unset(&self.intent)
    }
}

fn display_field(value: &str) -> &str {
    if is_unset(value) {
        WILDCARD
    } else {
        value.trim()
    }
}

impl fmt::Display for Query {
    /// Stable rule identifier, e.g.
    /// `os=any os-version=any kernel=any service=eks k8s=any gpu=any intent=any`
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "os={} os-version={} kernel={} service={} k8s={} gpu={} intent={}",
            display_field(&self.os),
            self.os_version,
            self.kernel,
            display_field(&self.service),
            self.k8s_version,
            display_field(&self.gpu),
            display_field(&self.intent),
        )
    }
}
