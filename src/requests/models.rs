use serde::Deserialize;
use std::{collections::BTreeMap, path::PathBuf};

use crate::render::svg::Color;

/// The top-level document fed to either entry point.
///
/// A build run carries `base_requests` plus the routing and render
/// settings; a serve run carries `stat_requests`. Both carry
/// `serialization_settings` naming the artifact file.
#[derive(Deserialize, Debug, Clone)]
pub struct InputDocument {
    #[serde(default)]
    pub base_requests: Vec<BaseRequest>,
    #[serde(default)]
    pub stat_requests: Vec<StatRequest>,
    pub routing_settings: Option<RoutingSettings>,
    pub render_settings: Option<RenderSettings>,
    pub serialization_settings: SerializationSettings,
}

/// One record of the network description.
#[derive(Deserialize, Debug, Clone)]
#[serde(tag = "type")]
pub enum BaseRequest {
    Stop(StopRequest),
    Bus(BusRequest),
}

#[derive(Deserialize, Debug, Clone)]
pub struct StopRequest {
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    /// Road metres to neighbouring stops; one direction is enough, the
    /// catalog symmetrises.
    #[serde(default)]
    pub road_distances: BTreeMap<String, i32>,
}

#[derive(Deserialize, Debug, Clone)]
pub struct BusRequest {
    pub name: String,
    pub stops: Vec<String>,
    pub is_roundtrip: bool,
}

/// One query against a frozen artifact.
#[derive(Deserialize, Debug, Clone)]
#[serde(tag = "type")]
pub enum StatRequest {
    Bus { id: i32, name: String },
    Stop { id: i32, name: String },
    Route { id: i32, from: String, to: String },
    Map { id: i32 },
}

#[derive(Deserialize, Debug, Clone)]
pub struct RoutingSettings {
    /// Minutes a passenger waits at any stop before boarding.
    pub bus_wait_time: u32,
    /// Cruising velocity in km/h.
    pub bus_velocity: f64,
}

#[derive(Deserialize, Debug, Clone)]
pub struct SerializationSettings {
    pub file: PathBuf,
}

#[derive(Deserialize, Debug, Clone)]
pub struct RenderSettings {
    pub width: f64,
    pub height: f64,
    pub padding: f64,
    pub outer_margin: f64,
    pub color_palette: Vec<Color>,
    pub line_width: f64,
    pub underlayer_color: Color,
    pub underlayer_width: f64,
    pub stop_radius: f64,
    pub bus_label_offset: (f64, f64),
    pub bus_label_font_size: u32,
    pub stop_label_offset: (f64, f64),
    pub stop_label_font_size: u32,
    pub layers: Vec<String>,
}
