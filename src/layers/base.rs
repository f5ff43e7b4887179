#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LayerType {
    Tile,
    Marker,
}

impl std::fmt::Display for LayerType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LayerType::Tile => write!(f, "tile"),
            LayerType::Marker => write!(f, "marker"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct LayerProperties {
    pub id: String,
    pub layer_type: LayerType,
    pub z_index: i32,
}

impl LayerProperties {
    pub fn new(id: String, layer_type: LayerType) -> Self {
        let z_index = match layer_type {
            LayerType::Tile => 0,
            LayerType::Marker => 600,
        };
        Self {
            id,
            layer_type,
            z_index,
        }
    }
}

/// Anything that can be added to a map widget
pub trait LayerTrait {
    fn id(&self) -> &str;

    fn layer_type(&self) -> LayerType;

    /// Get layer z-index for ordering
    fn z_index(&self) -> i32;

    /// Dynamic casting support
    fn as_any(&self) -> &dyn std::any::Any;
}
