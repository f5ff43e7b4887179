//! Map widget collaborator
//!
//! The picker drives any widget through [`MapWidget`]: mount into a container
//! with an initial view, add a background layer, turn input into click events,
//! and add or remove markers. [`PickerMap`] is the headless implementation
//! built on the crate's viewport and layer manager.

use crate::{
    core::{
        config::{InitialView, TileSource},
        geo::{LatLng, Point},
        viewport::Viewport,
    },
    dom::DomHost,
    input::events::{InputEvent, MapEvent, MouseButton},
    layers::{LayerManager, LayerTrait, LayerType, Marker, TileLayer},
    PickerError, Result,
};
use std::collections::VecDeque;

pub trait MapWidget {
    /// Element the widget is mounted into
    fn container_id(&self) -> &str;

    fn viewport(&self) -> &Viewport;

    /// Adds the background tile layer, returning its layer id
    fn add_tile_layer(&mut self, source: &TileSource) -> Result<String>;

    /// Adds a marker, returning its layer id
    fn add_marker(&mut self, position: LatLng) -> Result<String>;

    /// Removes a marker; `false` if it was not on the map
    fn remove_marker(&mut self, marker_id: &str) -> bool;

    fn marker_count(&self) -> usize;

    fn marker_position(&self, marker_id: &str) -> Option<LatLng>;

    /// Feeds raw input to the widget, which may queue map events
    fn handle_input(&mut self, input: &InputEvent);

    /// Takes the map events queued since the last call
    fn drain_events(&mut self) -> Vec<MapEvent>;

    fn container_point_to_lat_lng(&self, pixel: &Point) -> LatLng {
        self.viewport().pixel_to_lat_lng(pixel)
    }
}

/// Constructs widgets in a document container
pub trait MapWidgetFactory {
    fn create(
        &self,
        host: &dyn DomHost,
        container_id: &str,
        view: &InitialView,
    ) -> Result<Box<dyn MapWidget>>;
}

/// Headless map widget
pub struct PickerMap {
    container_id: String,
    viewport: Viewport,
    layers: LayerManager,
    events: VecDeque<MapEvent>,
    next_layer: u64,
}

impl PickerMap {
    pub fn new(container_id: &str, view: &InitialView, size: Point) -> Self {
        Self {
            container_id: container_id.to_string(),
            viewport: Viewport::new(view.center, view.zoom, size),
            layers: LayerManager::new(),
            events: VecDeque::new(),
            next_layer: 0,
        }
    }

    fn next_id(&mut self, prefix: &str) -> String {
        self.next_layer += 1;
        format!("{}-{}", prefix, self.next_layer)
    }

    fn add(&mut self, layer: Box<dyn LayerTrait>) -> Result<String> {
        let id = layer.id().to_string();
        self.layers.add_layer(layer)?;
        log::trace!("layer '{}' added to '{}'", id, self.container_id);
        Ok(id)
    }
}

impl MapWidget for PickerMap {
    fn container_id(&self) -> &str {
        &self.container_id
    }

    fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    fn add_tile_layer(&mut self, source: &TileSource) -> Result<String> {
        let layer = TileLayer::new(self.next_id("tiles"), source.clone());
        self.viewport
            .set_zoom_limits(0.0, f64::from(layer.source().max_zoom));
        self.add(Box::new(layer))
    }

    fn add_marker(&mut self, position: LatLng) -> Result<String> {
        let id = self.next_id("marker");
        self.add(Box::new(Marker::new(id, position)))
    }

    fn remove_marker(&mut self, marker_id: &str) -> bool {
        let is_marker = self
            .layers
            .get_layer(marker_id)
            .map(|layer| layer.layer_type() == LayerType::Marker)
            .unwrap_or(false);
        if !is_marker {
            return false;
        }

        self.layers.remove_layer(marker_id).is_some()
    }

    fn marker_count(&self) -> usize {
        self.layers.count_of_type(LayerType::Marker)
    }

    fn marker_position(&self, marker_id: &str) -> Option<LatLng> {
        self.layers.get_as::<Marker>(marker_id).map(Marker::position)
    }

    fn handle_input(&mut self, input: &InputEvent) {
        match input {
            InputEvent::Click {
                position,
                button: MouseButton::Left,
            } => {
                let lat_lng = self.container_point_to_lat_lng(position);
                self.events.push_back(MapEvent::Click {
                    lat_lng,
                    pixel: *position,
                });
            }
            InputEvent::Resize { size } => self.viewport.set_size(*size),
            _ => {}
        }
    }

    fn drain_events(&mut self) -> Vec<MapEvent> {
        self.events.drain(..).collect()
    }
}

/// Builds [`PickerMap`]s of a fixed container size
#[derive(Debug, Clone)]
pub struct PickerMapFactory {
    size: Point,
}

impl PickerMapFactory {
    pub fn new(size: Point) -> Self {
        Self { size }
    }
}

impl Default for PickerMapFactory {
    fn default() -> Self {
        Self::new(Point::new(800.0, 500.0))
    }
}

impl MapWidgetFactory for PickerMapFactory {
    fn create(
        &self,
        host: &dyn DomHost,
        container_id: &str,
        view: &InitialView,
    ) -> Result<Box<dyn MapWidget>> {
        if !host.contains(container_id) {
            return Err(PickerError::MissingElement(container_id.to_string()));
        }
        log::debug!(
            "creating map in '{}' at {:?}, zoom {}",
            container_id,
            view.center,
            view.zoom
        );
        Ok(Box::new(PickerMap::new(container_id, view, self.size)))
    }
}
