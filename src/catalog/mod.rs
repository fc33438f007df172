mod entities;

pub use entities::*;

use std::{
    collections::{BTreeMap, HashMap, HashSet},
    sync::Arc,
    time::Instant,
};
use thiserror::Error;
use tracing::debug;

use crate::{
    requests::{BaseRequest, BusRequest, RoutingSettings},
    shared::geo::Point,
};

#[derive(Error, Debug)]
pub enum Error {
    #[error("no road distance between adjacent stops {from} and {to}")]
    MissingRoadDistance { from: Arc<str>, to: Arc<str> },
    #[error("bus {bus} names unknown stop {stop}")]
    UnknownStop { bus: String, stop: String },
}

/// The frozen transit database: stops, buses and their cross-references.
///
/// Built once from the decoded input document and immutable afterwards.
/// Stops and buses live in arenas ordered alphabetically by name (the
/// catalog iteration order every downstream consumer relies on); all
/// cross-references are indices into those arenas, resolved through the
/// name lookups.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    /// Boarding wait at every stop, minutes.
    pub wait_time: f64,
    /// Bus velocity, metres per second.
    pub bus_velocity: f64,
    stops: Vec<Stop>,
    buses: Vec<Bus>,
    stop_lookup: HashMap<Arc<str>, u32>,
    bus_lookup: HashMap<Arc<str>, u32>,
}

#[derive(Debug, Default)]
struct StopDraft {
    position: Point,
    distances: BTreeMap<String, i32>,
}

impl Catalog {
    /// Builds the catalog in two passes over the network description:
    /// stops first (positions and symmetrised road distances), buses
    /// second (routes, backreferences, aggregate statistics).
    pub fn build(requests: &[BaseRequest], routing: &RoutingSettings) -> Result<Self, Error> {
        let mut catalog = Catalog {
            wait_time: f64::from(routing.bus_wait_time),
            bus_velocity: routing.bus_velocity / 3.6,
            ..Default::default()
        };
        catalog.load_stops(requests);
        catalog.load_buses(requests)?;
        Ok(catalog)
    }

    pub fn stops(&self) -> &[Stop] {
        &self.stops
    }

    pub fn buses(&self) -> &[Bus] {
        &self.buses
    }

    pub fn stop(&self, name: &str) -> Option<&Stop> {
        let index = self.stop_lookup.get(name)?;
        Some(&self.stops[*index as usize])
    }

    pub fn bus(&self, name: &str) -> Option<&Bus> {
        let index = self.bus_lookup.get(name)?;
        Some(&self.buses[*index as usize])
    }

    /// Road metres from one stop to another, by arena index. The two
    /// stops must be adjacent on some route for the entry to exist.
    pub fn road_distance(&self, from: u32, to: u32) -> Result<i32, Error> {
        let from = &self.stops[from as usize];
        let to = &self.stops[to as usize];
        from.distances
            .get(&to.name)
            .copied()
            .ok_or_else(|| Error::MissingRoadDistance {
                from: from.name.clone(),
                to: to.name.clone(),
            })
    }

    fn load_stops(&mut self, requests: &[BaseRequest]) {
        debug!("Loading stops...");
        let now = Instant::now();
        let mut drafts: BTreeMap<String, StopDraft> = BTreeMap::new();
        for request in requests {
            let BaseRequest::Stop(stop) = request else {
                continue;
            };
            {
                let draft = drafts.entry(stop.name.clone()).or_default();
                draft.position = Point {
                    latitude: stop.latitude,
                    longitude: stop.longitude,
                };
                draft.distances.insert(stop.name.clone(), 0);
                for (neighbour, distance) in &stop.road_distances {
                    draft.distances.insert(neighbour.clone(), *distance);
                }
            }
            // Symmetric default: the reverse distance is synthesized
            // unless the neighbour declared (or later declares) its own.
            for (neighbour, distance) in &stop.road_distances {
                let back = drafts.entry(neighbour.clone()).or_default();
                back.distances.entry(stop.name.clone()).or_insert(*distance);
            }
        }

        let names: HashMap<&str, Arc<str>> = drafts
            .keys()
            .map(|name| (name.as_str(), Arc::from(name.as_str())))
            .collect();
        for (index, (name, draft)) in drafts.iter().enumerate() {
            let name = names[name.as_str()].clone();
            self.stop_lookup.insert(name.clone(), index as u32);
            self.stops.push(Stop {
                index: index as u32,
                name,
                position: draft.position,
                distances: draft
                    .distances
                    .iter()
                    .map(|(to, distance)| (names[to.as_str()].clone(), *distance))
                    .collect(),
                pos_in_routes: BTreeMap::new(),
            });
        }
        debug!(
            "Loading {} stops took {:?}",
            self.stops.len(),
            now.elapsed()
        );
    }

    fn load_buses(&mut self, requests: &[BaseRequest]) -> Result<(), Error> {
        debug!("Loading buses...");
        let now = Instant::now();
        let mut declared: BTreeMap<&str, &BusRequest> = BTreeMap::new();
        for request in requests {
            if let BaseRequest::Bus(bus) = request {
                // Later records replace earlier ones wholesale.
                declared.insert(bus.name.as_str(), bus);
            }
        }
        for (index, request) in declared.into_values().enumerate() {
            let bus = self.load_bus(index as u32, request)?;
            self.bus_lookup.insert(bus.name.clone(), index as u32);
            self.buses.push(bus);
        }
        debug!(
            "Loading {} buses took {:?}",
            self.buses.len(),
            now.elapsed()
        );
        Ok(())
    }

    fn load_bus(&mut self, index: u32, request: &BusRequest) -> Result<Bus, Error> {
        let name: Arc<str> = Arc::from(request.name.as_str());
        let mut route = Vec::with_capacity(request.stops.len());
        for stop_name in &request.stops {
            let stop_index =
                *self
                    .stop_lookup
                    .get(stop_name.as_str())
                    .ok_or_else(|| Error::UnknownStop {
                        bus: request.name.clone(),
                        stop: stop_name.clone(),
                    })?;
            self.stops[stop_index as usize]
                .pos_in_routes
                .entry(name.clone())
                .or_default()
                .insert(route.len());
            route.push(stop_index);
        }

        let (mut route_length, mut geo_route_length) = self.trip_lengths(route.iter().copied())?;
        if !request.is_roundtrip {
            let (back_road, back_geo) = self.trip_lengths(route.iter().rev().copied())?;
            route_length += back_road;
            geo_route_length += back_geo;
        }

        let unique: HashSet<u32> = route.iter().copied().collect();
        let len = route.len();
        let stops_count = match (len, request.is_roundtrip) {
            (0, _) => 0,
            (len, true) => len,
            (len, false) => len * 2 - 1,
        };
        Ok(Bus {
            index,
            name,
            is_rounded: request.is_roundtrip,
            route: route.into(),
            unique_stops_count: unique.len() as u32,
            stops_count: stops_count as u32,
            end_points: (0, len.saturating_sub(1) as u32),
            route_length,
            geo_route_length,
        })
    }

    /// Accumulates road and great-circle metres over one traversal.
    fn trip_lengths(&self, stops: impl Iterator<Item = u32>) -> Result<(i32, f64), Error> {
        let mut road = 0;
        let mut geo = 0.0;
        let mut stops = stops.peekable();
        while let Some(from) = stops.next() {
            let Some(&to) = stops.peek() else {
                break;
            };
            road += self.road_distance(from, to)?;
            geo += self.stops[from as usize]
                .position
                .distance(&self.stops[to as usize].position);
        }
        Ok((road, geo))
    }
}
