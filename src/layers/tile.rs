use crate::{
    core::config::TileSource,
    layers::base::{LayerProperties, LayerTrait, LayerType},
};

/// Background imagery layer.
///
/// The picker never fetches tiles itself; rendering belongs to the map
/// widget. The layer records the source a renderer would draw from.
pub struct TileLayer {
    properties: LayerProperties,
    source: TileSource,
}

impl TileLayer {
    pub fn new(id: String, source: TileSource) -> Self {
        Self {
            properties: LayerProperties::new(id, LayerType::Tile),
            source,
        }
    }

    pub fn source(&self) -> &TileSource {
        &self.source
    }
}

impl LayerTrait for TileLayer {
    crate::impl_layer_trait!(TileLayer, properties);
}
