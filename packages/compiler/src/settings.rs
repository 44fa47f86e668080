use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::xaml::platform::BindingXamlPlatformInfo;

/// Settings for the binding optimizer, read from a camelCase JSON file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BindingsOptimizerSettings {
    /// Only documents whose root sets `sx:Bindings.OptimizeBindings="True"`
    /// are compiled.
    pub opt_in_to_optimizations: bool,
    pub assembly_name: String,
    /// Namespace of generated containers. Empty uses the namespace of each
    /// view's class, or the assembly name for template roots.
    pub namespace: String,
    /// `None` uses the rayon default, `Some(1)` compiles sequentially.
    pub parallelism: Option<usize>,
    pub platform: BindingXamlPlatformInfo,
}

impl Default for BindingsOptimizerSettings {
    fn default() -> Self {
        BindingsOptimizerSettings {
            opt_in_to_optimizations: false,
            assembly_name: String::new(),
            namespace: String::new(),
            parallelism: None,
            platform: BindingXamlPlatformInfo::default(),
        }
    }
}

impl BindingsOptimizerSettings {
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = fs::read_to_string(path)?;
        let settings: BindingsOptimizerSettings = serde_json::from_str(&content)?;
        Ok(settings)
    }

    pub fn from_json(json: &str) -> anyhow::Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}
