use std::path::Path;

use async_trait::async_trait;
use serde_yaml::{Mapping, Value};

use super::{Settings, reading, set_path, write_bundle};
use crate::bundler::{
    BundlePlugin, BundleResult, BundleType, BundlerConfig, Configurable, Context, Validatable,
};
use crate::error::{Result, recipe::invalid_request};
use crate::measurement::MeasurementType;
use crate::recipe::Recipe;

const DEFAULT_NAMESPACE: &str = "nvidia-network-operator";

const VALUE_SOURCES: &[(&str, MeasurementType, &str, &str)] = &[
    ("operator.version", MeasurementType::K8s, "image", "network-operator"),
    ("rdmaSharedDevicePlugin.enabled", MeasurementType::K8s, "config", "rdma"),
    ("secondaryNetwork.efa.enabled", MeasurementType::K8s, "config", "efa"),
    ("nvPeerMem.enabled", MeasurementType::Os, "modules", "nvidia-peermem"),
];

/// NVIDIA Network Operator bundle (RDMA, EFA, GPUDirect)
#[derive(Debug, Default)]
pub struct NetworkOperatorBundler {
    settings: Settings,
}

impl NetworkOperatorBundler {
    fn namespace(&self) -> String {
        self.settings
            .namespace
            .clone()
            .unwrap_or_else(|| DEFAULT_NAMESPACE.to_string())
    }

    fn values(&self, recipe: &Recipe, namespace: &str) -> Mapping {
        let mut values = Mapping::new();
        set_path(&mut values, "namespace", Value::from(namespace));
        for (path, _, _, _) in VALUE_SOURCES.iter().skip(1) {
            set_path(&mut values, path, Value::from(false));
        }
        for (path, measurement_type, subtype, key) in VALUE_SOURCES {
            if let Some(value) = reading(recipe, *measurement_type, subtype, key) {
                set_path(&mut values, path, value);
            }
        }
        values
    }
}

impl Configurable for NetworkOperatorBundler {
    fn configure(&mut self, config: &BundlerConfig) -> Result<()> {
        self.settings = Settings::from_config(config, &self.bundle_type());
        Ok(())
    }
}

#[async_trait]
impl Validatable for NetworkOperatorBundler {
    async fn validate(&self, ctx: &Context, recipe: &Recipe) -> Result<()> {
        ctx.check("network-operator validation")?;
        recipe.require(&[MeasurementType::K8s])?;
        if recipe
            .reading(MeasurementType::K8s, "image", "network-operator")
            .is_none()
        {
            return Err(invalid_request(
                "recipe has no K8s image reading for network-operator",
            ));
        }
        Ok(())
    }
}

#[async_trait]
impl BundlePlugin for NetworkOperatorBundler {
    fn bundle_type(&self) -> BundleType {
        BundleType::new(BundleType::NETWORK_OPERATOR)
    }

    async fn make(
        &self,
        ctx: &Context,
        recipe: &Recipe,
        output_dir: &Path,
    ) -> Result<BundleResult> {
        let namespace = self.namespace();
        let values = self.values(recipe, &namespace);
        write_bundle(
            ctx,
            &self.bundle_type(),
            &self.settings,
            &namespace,
            recipe,
            output_dir,
            values,
        )
        .await
    }

    fn as_configurable(&mut self) -> Option<&mut dyn Configurable> {
        Some(self)
    }

    fn as_validatable(&self) -> Option<&dyn Validatable> {
        Some(self)
    }
}
