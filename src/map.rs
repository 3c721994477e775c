//! Map view model.
//!
//! Describes what a map panel shows; drawing is left to the OpenStreetMap
//! embed, which takes a bounding box and a single marker.

use crate::config::{FACILITY_ZOOM, LOCATED_ZOOM, OVERVIEW_ZOOM};
use crate::route::AppRoute;
use easypark_shared::pricing::format_money;
use easypark_shared::{Coordinates, Facility};

const EMBED_BASE: &str = "https://www.openstreetmap.org/export/embed.html";
const VIEW_BASE: &str = "https://www.openstreetmap.org/";

#[derive(Debug, Clone, PartialEq)]
pub struct MapMarker {
    pub coordinates: Coordinates,
    pub label: String,
    /// Secondary text, e.g. the address and rate.
    pub detail: String,
    /// Reserve link, absent for the "you are here" marker.
    pub link: Option<String>,
}

impl MapMarker {
    pub fn for_facility(facility: &Facility) -> Self {
        Self {
            coordinates: facility.coordinates,
            label: facility.name.clone(),
            detail: format!(
                "{} · {} per hour",
                facility.address,
                format_money(facility.hourly_rate)
            ),
            link: Some(AppRoute::Reserve(facility.id.clone()).to_path()),
        }
    }

    pub fn user(position: Coordinates) -> Self {
        Self {
            coordinates: position,
            label: "You are here".to_string(),
            detail: String::new(),
            link: None,
        }
    }

    /// Link to the marker's spot on openstreetmap.org.
    pub fn external_url(&self, zoom: u8) -> String {
        format!(
            "{VIEW_BASE}?mlat={lat:.6}&mlon={lon:.6}#map={zoom}/{lat:.6}/{lon:.6}",
            lat = self.coordinates.latitude,
            lon = self.coordinates.longitude,
        )
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MapView {
    pub center: Coordinates,
    pub zoom: u8,
    pub markers: Vec<MapMarker>,
}

impl MapView {
    /// Browser map: every facility, plus the user when located.
    pub fn overview(
        center: Coordinates,
        user_location: Option<Coordinates>,
        facilities: &[Facility],
    ) -> Self {
        let mut markers: Vec<MapMarker> = facilities.iter().map(MapMarker::for_facility).collect();
        if let Some(position) = user_location {
            markers.push(MapMarker::user(position));
        }
        Self {
            center,
            zoom: if user_location.is_some() {
                LOCATED_ZOOM
            } else {
                OVERVIEW_ZOOM
            },
            markers,
        }
    }

    /// Map of a single facility.
    pub fn single(facility: &Facility) -> Self {
        Self {
            center: facility.coordinates,
            zoom: FACILITY_ZOOM,
            markers: vec![MapMarker::for_facility(facility)],
        }
    }

    /// Picker map of the registration form.
    pub fn picker(position: Coordinates) -> Self {
        Self {
            center: position,
            zoom: LOCATED_ZOOM,
            markers: Vec::new(),
        }
    }

    /// Bounding box `(west, south, east, north)` around the centre. Spans
    /// halve with each zoom level; latitudes are clamped to the Mercator
    /// limit.
    pub fn bounding_box(&self) -> (f64, f64, f64, f64) {
        let lon_span = 360.0 / 2f64.powi(i32::from(self.zoom));
        let lat_span = lon_span / 2.0;
        let west = (self.center.longitude - lon_span / 2.0).max(-180.0);
        let east = (self.center.longitude + lon_span / 2.0).min(180.0);
        let south = (self.center.latitude - lat_span / 2.0).max(-85.0);
        let north = (self.center.latitude + lat_span / 2.0).min(85.0);
        (west, south, east, north)
    }

    /// Embed URL with a marker on the centre.
    pub fn embed_url(&self) -> String {
        let (west, south, east, north) = self.bounding_box();
        format!(
            "{EMBED_BASE}?bbox={west:.6}%2C{south:.6}%2C{east:.6}%2C{north:.6}&layer=mapnik&marker={:.6}%2C{:.6}",
            self.center.latitude, self.center.longitude
        )
    }
}
