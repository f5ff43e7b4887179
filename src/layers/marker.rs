use crate::{
    core::geo::LatLng,
    layers::base::{LayerProperties, LayerTrait, LayerType},
};

/// A selection marker pinned to a coordinate
pub struct Marker {
    properties: LayerProperties,
    position: LatLng,
}

impl Marker {
    pub fn new(id: String, position: LatLng) -> Self {
        Self {
            properties: LayerProperties::new(id, LayerType::Marker),
            position,
        }
    }

    pub fn position(&self) -> LatLng {
        self.position
    }
}

impl LayerTrait for Marker {
    crate::impl_layer_trait!(Marker, properties);
}
