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

const DEFAULT_NAMESPACE: &str = "gpu-operator";

/// values.yaml path ← recipe reading
const VALUE_SOURCES: &[(&str, MeasurementType, &str, &str)] = &[
    ("operator.version", MeasurementType::K8s, "image", "gpu-operator"),
    ("driver.version", MeasurementType::Gpu, "drivers", "version"),
    ("driver.useOpenKernelModules", MeasurementType::Gpu, "drivers", "open-kernel-modules"),
    ("toolkit.cudaVersion", MeasurementType::Gpu, "drivers", "cuda"),
    ("mig.strategy", MeasurementType::K8s, "config", "mig-strategy"),
    ("cdi.enabled", MeasurementType::K8s, "config", "cdi"),
    ("devicePlugin.timeSlicing.replicas", MeasurementType::K8s, "config", "time-slicing"),
    ("fabricManager.enabled", MeasurementType::Gpu, "drivers", "fabric-manager"),
];

/// NVIDIA GPU Operator bundle
#[derive(Debug, Default)]
pub struct GpuOperatorBundler {
    settings: Settings,
}

impl GpuOperatorBundler {
    fn namespace(&self, recipe: &Recipe) -> String {
        if let Some(namespace) = &self.settings.namespace {
            return namespace.clone();
        }
        recipe
            .reading(MeasurementType::K8s, "config", "namespace")
            .and_then(|r| r.as_str())
            .unwrap_or(DEFAULT_NAMESPACE)
            .to_string()
    }

    fn values(&self, recipe: &Recipe, namespace: &str) -> Mapping {
        let mut values = Mapping::new();
        set_path(&mut values, "namespace", Value::from(namespace));
        set_path(&mut values, "driver.enabled", Value::from(true));
        set_path(&mut values, "driver.useOpenKernelModules", Value::from(false));
        set_path(&mut values, "cdi.enabled", Value::from(false));
        for (path, measurement_type, subtype, key) in VALUE_SOURCES {
            if let Some(value) = reading(recipe, *measurement_type, subtype, key) {
                set_path(&mut values, path, value);
            }
        }
        values
    }
}

impl Configurable for GpuOperatorBundler {
    fn configure(&mut self, config: &BundlerConfig) -> Result<()> {
        self.settings = Settings::from_config(config, &self.bundle_type());
        Ok(())
    }
}

#[async_trait]
impl Validatable for GpuOperatorBundler {
    async fn validate(&self, ctx: &Context, recipe: &Recipe) -> Result<()> {
        ctx.check("gpu-operator validation")?;
        recipe.require(&[MeasurementType::K8s, MeasurementType::Gpu])?;
        if recipe
            .reading(MeasurementType::K8s, "image", "gpu-operator")
            .is_none()
        {
            return Err(invalid_request(
                "recipe has no K8s image reading for gpu-operator",
            ));
        }
        Ok(())
    }
}

#[async_trait]
impl BundlePlugin for GpuOperatorBundler {
    fn bundle_type(&self) -> BundleType {
        BundleType::new(BundleType::GPU_OPERATOR)
    }

    async fn make(
        &self,
        ctx: &Context,
        recipe: &Recipe,
        output_dir: &Path,
    ) -> Result<BundleResult> {
        let namespace = self.namespace(recipe);
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
