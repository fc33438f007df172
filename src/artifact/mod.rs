use std::{
    collections::BTreeMap,
    fs::File,
    io::{self, BufReader, BufWriter},
    path::Path,
    time::Instant,
};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::{
    catalog::Catalog,
    render::Layout,
    requests::RenderSettings,
    shared::graph::EdgeId,
    transit::{
        TransitEdge, TransitGraph,
        paths::{PathEntry, PathTable},
    },
};

#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    #[error("artifact encode error: {0}")]
    Encode(#[from] ciborium::ser::Error<io::Error>),
    #[error("artifact decode error: {0}")]
    Decode(#[from] ciborium::de::Error<io::Error>),
}

/// Per-bus record as frozen to disk.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct BusRecord {
    pub name: String,
    pub route_length: i32,
    pub curvature: f64,
    pub stops_cnt: u32,
    pub unique_stops_cnt: u32,
    /// Wire tag spelled the way the schema fixed it long ago.
    #[serde(rename = "is_rouded")]
    pub is_rounded: bool,
    pub end_points: (u32, u32),
    /// The full forward route as stop names.
    pub route: Vec<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct StopRecord {
    pub name: String,
    /// Buses calling at this stop, alphabetical.
    pub buses: Vec<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct VertexRecord {
    pub wait: usize,
    pub ride: usize,
}

/// One typed transit-graph edge on the wire.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub enum EdgeRecord {
    Wait {
        from: usize,
        to: usize,
        time: f64,
        stop: String,
    },
    Bus {
        from: usize,
        to: usize,
        time: f64,
        bus: String,
        span_cnt: u32,
        end_points: (u32, u32),
    },
}

impl EdgeRecord {
    pub fn source(&self) -> usize {
        match self {
            EdgeRecord::Wait { from, .. } | EdgeRecord::Bus { from, .. } => *from,
        }
    }

    pub fn time(&self) -> f64 {
        match self {
            EdgeRecord::Wait { time, .. } | EdgeRecord::Bus { time, .. } => *time,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct GraphRecord {
    /// Stop name to its wait/ride vertex pair.
    pub vertices: BTreeMap<String, VertexRecord>,
    /// The flat typed edge table, indexed by edge id.
    pub edges: Vec<EdgeRecord>,
}

/// One cell of the frozen path table.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq)]
pub struct PathCell {
    pub has_value: bool,
    pub has_prev: bool,
    pub prev_edge: usize,
    pub weight: f64,
}

impl PathCell {
    pub fn entry(&self) -> Option<PathEntry> {
        self.has_value.then(|| PathEntry {
            weight: self.weight,
            prev_edge: self.has_prev.then_some(self.prev_edge),
        })
    }
}

impl From<Option<PathEntry>> for PathCell {
    fn from(value: Option<PathEntry>) -> Self {
        match value {
            None => PathCell::default(),
            Some(entry) => PathCell {
                has_value: true,
                has_prev: entry.prev_edge.is_some(),
                prev_edge: entry.prev_edge.unwrap_or_default(),
                weight: entry.weight,
            },
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq)]
pub struct PointRecord {
    pub x: f64,
    pub y: f64,
}

/// Render settings plus the precomputed layout. Colours are stored in
/// their final textual form; the serve side never re-derives them.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct RenderRecord {
    pub width: f64,
    pub height: f64,
    pub padding: f64,
    pub outer_margin: f64,
    pub color_palette: Vec<String>,
    pub line_width: f64,
    pub underlayer_color: String,
    pub underlayer_width: f64,
    pub stop_radius: f64,
    pub bus_label_offset: PointRecord,
    pub bus_label_font_size: u32,
    pub stop_label_offset: PointRecord,
    pub stop_label_font_size: u32,
    pub layers: Vec<String>,
    pub stops_points: BTreeMap<String, PointRecord>,
    pub buses_colors: BTreeMap<String, String>,
}

/// Everything the serving binary needs, in one blob.
///
/// Packed once at build time and treated as immutable after loading; the
/// serve side never rebuilds the graph or recomputes a shortest path.
/// Field order and the `BTreeMap` keys make the encoding deterministic:
/// re-serialising a loaded artifact reproduces the bytes exactly.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Artifact {
    pub buses: BTreeMap<String, BusRecord>,
    pub stops: BTreeMap<String, StopRecord>,
    pub graph: GraphRecord,
    /// Row-major `V x V` path table.
    pub paths: Vec<Vec<PathCell>>,
    pub render: RenderRecord,
}

impl Artifact {
    /// Freezes the four build products into their wire records.
    pub fn pack(
        catalog: &Catalog,
        graph: &TransitGraph,
        table: &PathTable,
        layout: &Layout,
        settings: &RenderSettings,
    ) -> Self {
        let buses = catalog
            .buses()
            .iter()
            .map(|bus| {
                let record = BusRecord {
                    name: bus.name.to_string(),
                    route_length: bus.route_length,
                    curvature: bus.curvature(),
                    stops_cnt: bus.stops_count,
                    unique_stops_cnt: bus.unique_stops_count,
                    is_rounded: bus.is_rounded,
                    end_points: bus.end_points,
                    route: bus
                        .route
                        .iter()
                        .map(|stop| catalog.stops()[*stop as usize].name.to_string())
                        .collect(),
                };
                (record.name.clone(), record)
            })
            .collect();

        let stops = catalog
            .stops()
            .iter()
            .map(|stop| {
                let record = StopRecord {
                    name: stop.name.to_string(),
                    buses: stop.buses().map(|bus| bus.to_string()).collect(),
                };
                (record.name.clone(), record)
            })
            .collect();

        let vertices = catalog
            .stops()
            .iter()
            .map(|stop| {
                let pair = graph.vertices[stop.index as usize];
                (
                    stop.name.to_string(),
                    VertexRecord {
                        wait: pair.wait,
                        ride: pair.ride,
                    },
                )
            })
            .collect();
        let edges = (0..graph.graph().edge_count())
            .map(|id| {
                let edge = graph.graph().edge(id);
                match &graph.edges[id] {
                    TransitEdge::Wait { stop, time } => EdgeRecord::Wait {
                        from: edge.from,
                        to: edge.to,
                        time: *time,
                        stop: catalog.stops()[*stop as usize].name.to_string(),
                    },
                    TransitEdge::Bus {
                        bus,
                        span_count,
                        time,
                        end_points,
                    } => EdgeRecord::Bus {
                        from: edge.from,
                        to: edge.to,
                        time: *time,
                        bus: catalog.buses()[*bus as usize].name.to_string(),
                        span_cnt: *span_count,
                        end_points: *end_points,
                    },
                }
            })
            .collect();

        let paths = (0..table.vertex_count())
            .map(|from| {
                (0..table.vertex_count())
                    .map(|to| PathCell::from(table.entry(from, to)))
                    .collect()
            })
            .collect();

        let render = RenderRecord {
            width: settings.width,
            height: settings.height,
            padding: settings.padding,
            outer_margin: settings.outer_margin,
            color_palette: settings
                .color_palette
                .iter()
                .map(|color| color.to_string())
                .collect(),
            line_width: settings.line_width,
            underlayer_color: settings.underlayer_color.to_string(),
            underlayer_width: settings.underlayer_width,
            stop_radius: settings.stop_radius,
            bus_label_offset: PointRecord {
                x: settings.bus_label_offset.0,
                y: settings.bus_label_offset.1,
            },
            bus_label_font_size: settings.bus_label_font_size,
            stop_label_offset: PointRecord {
                x: settings.stop_label_offset.0,
                y: settings.stop_label_offset.1,
            },
            stop_label_font_size: settings.stop_label_font_size,
            layers: settings.layers.clone(),
            stops_points: layout
                .stop_points
                .iter()
                .map(|(name, (x, y))| (name.to_string(), PointRecord { x: *x, y: *y }))
                .collect(),
            buses_colors: layout
                .bus_colors
                .iter()
                .map(|(name, color)| (name.to_string(), color.to_string()))
                .collect(),
        };

        Artifact {
            buses,
            stops,
            graph: GraphRecord { vertices, edges },
            paths,
            render,
        }
    }

    pub fn save(&self, path: &Path) -> Result<(), Error> {
        debug!("Writing the artifact to {path:?}...");
        let now = Instant::now();
        let file = BufWriter::new(File::create(path)?);
        ciborium::ser::into_writer(self, file)?;
        debug!("Writing the artifact took {:?}", now.elapsed());
        Ok(())
    }

    pub fn load(path: &Path) -> Result<Self, Error> {
        debug!("Loading the artifact from {path:?}...");
        let now = Instant::now();
        let file = BufReader::new(File::open(path)?);
        let artifact = ciborium::de::from_reader(file)?;
        debug!("Loading the artifact took {:?}", now.elapsed());
        Ok(artifact)
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>, Error> {
        let mut bytes = Vec::new();
        ciborium::ser::into_writer(self, &mut bytes)?;
        Ok(bytes)
    }

    /// The frozen path-table entry for a vertex pair, if any.
    pub fn path_entry(&self, from: usize, to: usize) -> Option<PathEntry> {
        self.paths.get(from)?.get(to)?.entry()
    }

    /// Source vertex of an edge, for walking routes backwards.
    pub fn edge_source(&self, edge: EdgeId) -> usize {
        self.graph.edges[edge].source()
    }
}
