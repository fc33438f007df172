use std::{
    collections::{BTreeMap, BTreeSet, HashMap},
    sync::Arc,
};

use crate::shared::geo::Point;

/// A named point of the road network where buses call.
#[derive(Debug, Clone, Default)]
pub struct Stop {
    /// The internal index used for O(1) arena lookups in the catalog.
    pub index: u32,
    /// Unique display name; stops are addressed by name everywhere.
    pub name: Arc<str>,
    pub position: Point,
    /// Declared road metres to neighbouring stops, symmetrised on load.
    /// Always contains a zero entry for the stop itself.
    pub distances: HashMap<Arc<str>, i32>,
    /// For every bus calling here, the set of forward-route positions at
    /// which this stop appears.
    pub pos_in_routes: BTreeMap<Arc<str>, BTreeSet<usize>>,
}

impl Stop {
    /// Names of the buses serving this stop, alphabetical.
    pub fn buses(&self) -> impl Iterator<Item = &Arc<str>> {
        self.pos_in_routes.keys()
    }
}

/// A named line visiting stops in a declared order.
#[derive(Debug, Clone, Default)]
pub struct Bus {
    pub index: u32,
    pub name: Arc<str>,
    /// A rounded bus starts and ends at the same stop and is traversed
    /// once per trip; any other bus rides the route there and back.
    pub is_rounded: bool,
    /// The authoritative forward route as stop indices into the catalog
    /// arena.
    pub route: Box<[u32]>,
    pub unique_stops_count: u32,
    /// Stops passed in one trip, counting the return leg when not rounded.
    pub stops_count: u32,
    /// Positions of the route terminals in `route`.
    pub end_points: (u32, u32),
    /// Road metres along one trip.
    pub route_length: i32,
    /// Great-circle metres along one trip.
    pub geo_route_length: f64,
}

impl Bus {
    /// How much longer the roads are than the straight lines.
    pub fn curvature(&self) -> f64 {
        f64::from(self.route_length) / self.geo_route_length
    }
}
