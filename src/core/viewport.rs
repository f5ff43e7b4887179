use crate::core::{
    constants::TILE_SIZE,
    geo::{LatLng, Point},
};
use serde::{Deserialize, Serialize};

/// Current view of a map widget: center, zoom, and container dimensions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    /// The center of the map view in geographical coordinates
    pub center: LatLng,
    /// The current zoom level
    pub zoom: f64,
    /// The size of the container in pixels
    pub size: Point,
    pub min_zoom: f64,
    pub max_zoom: f64,
}

impl Viewport {
    pub fn new(center: LatLng, zoom: f64, size: Point) -> Self {
        Self {
            center,
            zoom: zoom.clamp(0.0, 18.0),
            size,
            min_zoom: 0.0,
            max_zoom: 18.0,
        }
    }

    /// Sets the zoom limits, clamping the current zoom into them
    pub fn set_zoom_limits(&mut self, min_zoom: f64, max_zoom: f64) {
        self.min_zoom = min_zoom;
        self.max_zoom = max_zoom;
        self.zoom = self.zoom.clamp(min_zoom, max_zoom);
    }

    pub fn set_size(&mut self, size: Point) {
        self.size = size;
    }

    /// Projects a LatLng to world pixel coordinates at the current zoom
    pub fn project(&self, lat_lng: &LatLng) -> Point {
        let world = f64::from(TILE_SIZE) * 2_f64.powf(self.zoom);
        let mercator = lat_lng.to_mercator();
        let half_circumference = std::f64::consts::PI * 6378137.0;

        Point::new(
            (mercator.x + half_circumference) / (2.0 * half_circumference) * world,
            (half_circumference - mercator.y) / (2.0 * half_circumference) * world,
        )
    }

    /// Unprojects world pixel coordinates back to LatLng at the current zoom
    pub fn unproject(&self, pixel: &Point) -> LatLng {
        let world = f64::from(TILE_SIZE) * 2_f64.powf(self.zoom);
        let half_circumference = std::f64::consts::PI * 6378137.0;

        let x = pixel.x / world * (2.0 * half_circumference) - half_circumference;
        let y = half_circumference - pixel.y / world * (2.0 * half_circumference);
        LatLng::from_mercator(Point::new(x, y))
    }

    /// World pixel at the top-left corner of the container
    fn top_left(&self) -> Point {
        let center = self.project(&self.center);
        center.subtract(&Point::new(self.size.x / 2.0, self.size.y / 2.0))
    }

    /// Converts a container pixel (e.g. a click) to geographical coordinates
    pub fn pixel_to_lat_lng(&self, pixel: &Point) -> LatLng {
        self.unproject(&pixel.add(&self.top_left()))
    }
}
