use std::time::Instant;
use tracing::debug;

use crate::shared::graph::{DirectedWeightedGraph, EdgeId, VertexId};

/// One cell of the all-pairs table: the best known total weight and the
/// last edge of some optimal path ending at the column vertex.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PathEntry {
    pub weight: f64,
    pub prev_edge: Option<EdgeId>,
}

/// All-pairs shortest paths over the transit graph.
///
/// A row-major `V x V` matrix of optional entries; an absent entry means
/// the column vertex is unreachable from the row vertex. Computed once at
/// build time with a Floyd-Warshall relaxation, frozen to the artifact,
/// and never recomputed while serving.
#[derive(Debug, Clone, Default)]
pub struct PathTable {
    vertex_count: usize,
    entries: Vec<Option<PathEntry>>,
}

impl PathTable {
    pub fn build(graph: &DirectedWeightedGraph<f64>) -> Self {
        debug!("Computing shortest paths...");
        let now = Instant::now();
        let n = graph.vertex_count();
        let mut table = PathTable {
            vertex_count: n,
            entries: vec![None; n * n],
        };
        for vertex in 0..n {
            table.entries[vertex * n + vertex] = Some(PathEntry {
                weight: 0.0,
                prev_edge: None,
            });
            for &edge_id in graph.incident(vertex) {
                let edge = graph.edge(edge_id);
                let cell = &mut table.entries[vertex * n + edge.to];
                // Ties keep the earliest edge seen.
                if cell.is_none_or(|entry| entry.weight > edge.weight) {
                    *cell = Some(PathEntry {
                        weight: edge.weight,
                        prev_edge: Some(edge_id),
                    });
                }
            }
        }
        // Relaxation order is fixed (through-major, from, to) so that
        // prev_edge tie-breaks are deterministic.
        for through in 0..n {
            for from in 0..n {
                let Some(head) = table.entries[from * n + through] else {
                    continue;
                };
                for to in 0..n {
                    let Some(tail) = table.entries[through * n + to] else {
                        continue;
                    };
                    let candidate = head.weight + tail.weight;
                    let cell = &mut table.entries[from * n + to];
                    if cell.is_none_or(|entry| entry.weight > candidate) {
                        *cell = Some(PathEntry {
                            weight: candidate,
                            prev_edge: tail.prev_edge.or(head.prev_edge),
                        });
                    }
                }
            }
        }
        debug!(
            "Shortest paths over {n} vertices took {:?}",
            now.elapsed()
        );
        table
    }

    pub fn vertex_count(&self) -> usize {
        self.vertex_count
    }

    pub fn entry(&self, from: VertexId, to: VertexId) -> Option<PathEntry> {
        self.entries[from * self.vertex_count + to]
    }
}
