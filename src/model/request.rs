use anyhow::{Result, bail};
use serde::Serialize;

/// Body of a generate call: grid dimensions and number of layers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct GenerateRequest {
    pub height: u32,
    pub width: u32,
    pub levels: u32,
}

impl GenerateRequest {
    pub fn new(height: u32, width: u32, levels: u32) -> Result<Self> {
        if height == 0 || width == 0 || levels == 0 {
            bail!("grid request needs height, width and levels ≥ 1 (got {height}×{width}×{levels})");
        }
        Ok(Self {
            height,
            width,
            levels,
        })
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}
