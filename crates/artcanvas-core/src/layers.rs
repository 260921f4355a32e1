//! Layer registry.
//!
//! Layers are kept in paint order: the first layer is painted first and so
//! appears behind everything after it. The registry always holds at least one
//! layer and the active layer id always names one of them.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Unique, stable identifier for a layer.
pub type LayerId = Uuid;

/// A paint surface that strokes and shapes attach to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Layer {
    pub(crate) id: LayerId,
    /// Display name (free-form).
    pub name: String,
    pub(crate) is_visible: bool,
    pub(crate) opacity: f64,
}

impl Layer {
    fn new(name: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            name,
            is_visible: true,
            opacity: 1.0,
        }
    }

    pub fn id(&self) -> LayerId {
        self.id
    }

    pub fn is_visible(&self) -> bool {
        self.is_visible
    }

    /// Opacity in `[0, 1]`, applied as a uniform alpha multiplier.
    pub fn opacity(&self) -> f64 {
        self.opacity
    }
}

/// Ordered set of layers plus the active layer selection.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "LayerRegistryData")]
pub struct LayerRegistry {
    layers: Vec<Layer>,
    active: LayerId,
}

/// Registry contents as read from disk, before validation.
#[derive(Deserialize)]
struct LayerRegistryData {
    layers: Vec<Layer>,
    active: LayerId,
}

/// Why a deserialized registry was rejected.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum LayerRegistryError {
    #[error("Layer registry has no layers")]
    Empty,
    #[error("Active layer {0} is not in the registry")]
    UnknownActive(LayerId),
}

impl TryFrom<LayerRegistryData> for LayerRegistry {
    type Error = LayerRegistryError;

    fn try_from(data: LayerRegistryData) -> Result<Self, Self::Error> {
        if data.layers.is_empty() {
            return Err(LayerRegistryError::Empty);
        }
        if !data.layers.iter().any(|layer| layer.id == data.active) {
            return Err(LayerRegistryError::UnknownActive(data.active));
        }
        let mut layers = data.layers;
        for layer in &mut layers {
            layer.opacity = if layer.opacity.is_nan() {
                1.0
            } else {
                layer.opacity.clamp(0.0, 1.0)
            };
        }
        Ok(Self {
            layers,
            active: data.active,
        })
    }
}

impl Default for LayerRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl LayerRegistry {
    /// Create a registry holding a single visible layer.
    pub fn new() -> Self {
        let first = Layer::new("Layer 1".to_string());
        let active = first.id;
        Self {
            layers: vec![first],
            active,
        }
    }

    /// Append a new layer and make it active.
    pub fn add_layer(&mut self) -> LayerId {
        let layer = Layer::new(format!("Layer {}", self.layers.len() + 1));
        let id = layer.id;
        log::debug!("Adding layer {} ({})", layer.name, id);
        self.layers.push(layer);
        self.active = id;
        id
    }

    /// Remove a layer. The last remaining layer cannot be removed.
    /// Returns true if the layer was removed.
    pub fn delete_layer(&mut self, id: LayerId) -> bool {
        if self.layers.len() <= 1 {
            return false;
        }
        let Some(index) = self.position(id) else {
            return false;
        };
        self.layers.remove(index);
        if self.active == id {
            self.active = self.layers[0].id;
        }
        log::debug!("Deleted layer {}", id);
        true
    }

    /// Flip a layer's visibility. Returns true if the layer exists.
    pub fn toggle_visibility(&mut self, id: LayerId) -> bool {
        match self.get_mut(id) {
            Some(layer) => {
                layer.is_visible = !layer.is_visible;
                true
            }
            None => false,
        }
    }

    /// Set a layer's opacity, clamped to `[0, 1]`. Returns true if the layer exists.
    pub fn set_opacity(&mut self, id: LayerId, opacity: f64) -> bool {
        let opacity = if opacity.is_nan() { 1.0 } else { opacity.clamp(0.0, 1.0) };
        match self.get_mut(id) {
            Some(layer) => {
                layer.opacity = opacity;
                true
            }
            None => false,
        }
    }

    /// Rename a layer. Returns true if the layer exists.
    pub fn rename(&mut self, id: LayerId, name: impl Into<String>) -> bool {
        match self.get_mut(id) {
            Some(layer) => {
                layer.name = name.into();
                true
            }
            None => false,
        }
    }

    /// Make an existing layer the target for new strokes and shapes.
    pub fn set_active(&mut self, id: LayerId) -> bool {
        if self.position(id).is_none() {
            return false;
        }
        self.active = id;
        true
    }

    /// Id of the active layer.
    pub fn active_id(&self) -> LayerId {
        self.active
    }

    /// The active layer.
    pub fn active(&self) -> Option<&Layer> {
        self.get(self.active)
    }

    /// Paint-order index of a layer.
    pub fn position(&self, id: LayerId) -> Option<usize> {
        self.layers.iter().position(|layer| layer.id == id)
    }

    pub fn get(&self, id: LayerId) -> Option<&Layer> {
        self.layers.iter().find(|layer| layer.id == id)
    }

    fn get_mut(&mut self, id: LayerId) -> Option<&mut Layer> {
        self.layers.iter_mut().find(|layer| layer.id == id)
    }

    /// Layers in paint order (back to front).
    pub fn iter(&self) -> impl Iterator<Item = &Layer> {
        self.layers.iter()
    }

    pub fn as_slice(&self) -> &[Layer] {
        &self.layers
    }

    pub fn len(&self) -> usize {
        self.layers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }
}
