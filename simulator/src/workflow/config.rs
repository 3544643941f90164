use crate::generator::profile::GeneratorConfig;
use anyhow::Context;
use serde::{Deserialize, Serialize};
use simsensorcore::util::load_config_as;
use simsensorcore::{serialize_to_json, SerializableValue};
use std::path::Path;

fn default_frames() -> usize {
    1
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct WorkflowConfig {
    #[serde(default = "default_frames")]
    pub frames: usize,
    #[serde(default)]
    pub generator: GeneratorConfig,
}

impl WorkflowConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path_ref = path.as_ref();
        load_config_as(path_ref)
            .with_context(|| format!("loading workflow config {}", path_ref.display()))
    }

    pub fn from_args(object_count: usize, frames: usize, seed: u64) -> Self {
        Self {
            frames,
            generator: GeneratorConfig {
                object_count,
                seed,
                ..Default::default()
            },
        }
    }

    /// The resolved config, defaults included, as JSON text.
    pub fn to_json(&self) -> anyhow::Result<String> {
        let raw = serde_yaml::to_value(self).context("converting workflow config")?;
        let value = SerializableValue::try_from(raw).context("converting workflow config")?;
        Ok(serialize_to_json(&value)?)
    }
}
