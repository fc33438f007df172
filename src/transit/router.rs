use std::collections::HashMap;

use crate::{artifact::Artifact, shared::graph::EdgeId};

pub type RouteId = u64;

/// Summary of one reconstructed itinerary, addressed by its cache id.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RouteInfo {
    pub id: RouteId,
    pub weight: f64,
    pub edge_count: usize,
}

/// Serve-time route reconstruction over the frozen path table.
///
/// [`Router::build_route`] expands a `(from, to)` pair into the ordered
/// edge list of an optimal path and parks it in a cache keyed by a
/// monotonically increasing [`RouteId`]; a well-behaved caller fetches
/// the edges and then releases the entry. Single-threaded by design.
pub struct Router<'a> {
    data: &'a Artifact,
    next_route_id: RouteId,
    expanded_routes: HashMap<RouteId, Box<[EdgeId]>>,
}

impl<'a> Router<'a> {
    pub fn new(data: &'a Artifact) -> Self {
        Self {
            data,
            next_route_id: 0,
            expanded_routes: HashMap::new(),
        }
    }

    /// Walks the predecessor chain backwards from `to`, reverses it, and
    /// caches the result. Returns `None` when `to` is unreachable. The
    /// weight is read from the table, never recomputed.
    pub fn build_route(&mut self, from: usize, to: usize) -> Option<RouteInfo> {
        let target = self.data.path_entry(from, to)?;
        let mut edges = Vec::new();
        let mut prev_edge = target.prev_edge;
        while let Some(edge_id) = prev_edge {
            edges.push(edge_id);
            let via = self.data.edge_source(edge_id);
            prev_edge = self
                .data
                .path_entry(from, via)
                .and_then(|entry| entry.prev_edge);
        }
        edges.reverse();

        let id = self.next_route_id;
        self.next_route_id += 1;
        let info = RouteInfo {
            id,
            weight: target.weight,
            edge_count: edges.len(),
        };
        self.expanded_routes.insert(id, edges.into());
        Some(info)
    }

    /// The edge at `index` of a cached route.
    pub fn route_edge(&self, route_id: RouteId, index: usize) -> Option<EdgeId> {
        self.expanded_routes
            .get(&route_id)
            .and_then(|edges| edges.get(index))
            .copied()
    }

    /// Drops a cached route; its id is never reused.
    pub fn release_route(&mut self, route_id: RouteId) {
        self.expanded_routes.remove(&route_id);
    }
}
