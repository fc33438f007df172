pub mod paths;
pub mod router;

use std::time::Instant;
use tracing::debug;

use crate::{
    catalog::{Bus, Catalog, Error},
    shared::graph::DirectedWeightedGraph,
};

/// The two vertices every stop owns in the time-weighted graph.
///
/// A passenger standing at a stop is at `wait`; a passenger sitting in a
/// bus at that stop is at `ride`. The only way from `wait` to `ride` is
/// the boarding-wait edge, which is what lets shortest paths price in
/// "wait before boarding".
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StopVertices {
    pub wait: usize,
    pub ride: usize,
}

/// Metadata for one graph edge, indexed by the same edge id.
#[derive(Debug, Clone, PartialEq)]
pub enum TransitEdge {
    /// Boarding delay at a stop, `wait -> ride`. Time in minutes.
    Wait { stop: u32, time: f64 },
    /// Riding one bus between two stops of its route, `ride -> wait`.
    /// `end_points` are forward-route positions `(low, high)` so the
    /// stored route can be sliced for rendering; `span_count` is how many
    /// route positions the ride covers. Time in minutes.
    Bus {
        bus: u32,
        span_count: u32,
        time: f64,
        end_points: (u32, u32),
    },
}

impl TransitEdge {
    pub fn time(&self) -> f64 {
        match self {
            TransitEdge::Wait { time, .. } | TransitEdge::Bus { time, .. } => *time,
        }
    }
}

/// The time-weighted double-vertex graph over the catalog.
///
/// Stop `k` in catalog order owns vertices `2k` (wait) and `2k + 1`
/// (ride). The typed edge table grows in lock-step with the graph, so an
/// edge id indexes both.
#[derive(Debug, Clone, Default)]
pub struct TransitGraph {
    /// Vertex pair of every stop, indexed by catalog stop index.
    pub vertices: Vec<StopVertices>,
    /// Typed metadata parallel to the graph's flat edge table.
    pub edges: Vec<TransitEdge>,
    graph: DirectedWeightedGraph<f64>,
}

impl TransitGraph {
    pub fn build(catalog: &Catalog) -> Result<Self, Error> {
        debug!("Building the transit graph...");
        let now = Instant::now();
        let mut this = TransitGraph {
            vertices: Vec::with_capacity(catalog.stops().len()),
            edges: Vec::new(),
            graph: DirectedWeightedGraph::new(catalog.stops().len() * 2),
        };
        for index in 0..catalog.stops().len() {
            let wait = index * 2;
            let ride = wait + 1;
            this.vertices.push(StopVertices { wait, ride });
            this.graph.add_edge(wait, ride, catalog.wait_time);
            this.edges.push(TransitEdge::Wait {
                stop: index as u32,
                time: catalog.wait_time,
            });
        }
        for bus in catalog.buses() {
            this.register_bus_edges(catalog, bus, false)?;
            if !bus.is_rounded {
                this.register_bus_edges(catalog, bus, true)?;
            }
        }
        debug!(
            "Building {} vertices and {} edges took {:?}",
            this.graph.vertex_count(),
            this.graph.edge_count(),
            now.elapsed()
        );
        Ok(this)
    }

    pub fn graph(&self) -> &DirectedWeightedGraph<f64> {
        &self.graph
    }

    /// Adds one family of Bus edges: every ordered stop pair of one
    /// traversal, weighted by the cumulative road time between them.
    fn register_bus_edges(
        &mut self,
        catalog: &Catalog,
        bus: &Bus,
        reversed: bool,
    ) -> Result<(), Error> {
        let len = bus.route.len();
        let stop_at = |position: usize| {
            if reversed {
                bus.route[len - 1 - position]
            } else {
                bus.route[position]
            }
        };
        let forward_index = |position: usize| {
            if reversed {
                (len - 1 - position) as u32
            } else {
                position as u32
            }
        };
        for i in 0..len {
            let mut distance = 0;
            for j in (i + 1)..len {
                distance += catalog.road_distance(stop_at(j - 1), stop_at(j))?;
                let time = (f64::from(distance) / catalog.bus_velocity) / 60.0;
                self.graph.add_edge(
                    self.vertices[stop_at(i) as usize].ride,
                    self.vertices[stop_at(j) as usize].wait,
                    time,
                );
                let (a, b) = (forward_index(i), forward_index(j));
                self.edges.push(TransitEdge::Bus {
                    bus: bus.index,
                    span_count: (j - i) as u32,
                    time,
                    end_points: if a <= b { (a, b) } else { (b, a) },
                });
            }
        }
        Ok(())
    }
}
