//! Constructor options accepted from JavaScript.

use serde::{Deserialize, Serialize};
use wasm_bindgen::JsValue;

use super::{BackdropConfig, Preset};
use crate::error::{BackdropError, Result};

/// The object passed to `new DrylandBackdrop(canvasId, options)`.
///
/// Every field is optional. `config` replaces the preset entirely; the
/// remaining fields are applied on top of whichever base was chosen.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BackdropOptions {
    pub preset: Preset,
    pub config: Option<BackdropConfig>,
    pub seed: Option<u64>,
    pub particle_count: Option<usize>,
    pub node_count: Option<usize>,
}

impl BackdropOptions {
    /// Read options from a JS value. `undefined` and `null` mean defaults.
    pub fn from_js(value: JsValue) -> Result<Self> {
        if value.is_undefined() || value.is_null() {
            return Ok(Self::default());
        }
        serde_wasm_bindgen::from_value(value).map_err(|e| BackdropError::Options(e.to_string()))
    }

    /// Resolve to a complete, validated config.
    pub fn into_config(self) -> Result<BackdropConfig> {
        let mut config = self.config.unwrap_or_else(|| self.preset.config());
        if let Some(seed) = self.seed {
            config.seed = Some(seed);
        }
        if let Some(count) = self.particle_count {
            config.particles.count = count;
        }
        if let Some(count) = self.node_count {
            config.network.count = count;
        }
        config.validate()?;
        Ok(config)
    }
}
