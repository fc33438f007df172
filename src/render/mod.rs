pub mod canvas;
pub mod svg;

use std::{
    collections::{BTreeMap, HashMap},
    sync::Arc,
    time::Instant,
};
use tracing::debug;

use crate::{
    catalog::{Bus, Catalog, Stop},
    requests::RenderSettings,
    shared::geo::Point,
};
use svg::Color;

/// Drawing-plane placement for every stop plus the bus colour table.
///
/// Stops are not rescaled linearly from their coordinates; they are
/// compressed onto a discrete grid, with neighbouring stops glued into
/// the same column or row (see [`Layout::build`]). Frozen to the artifact
/// next to the render settings.
#[derive(Debug, Clone, Default)]
pub struct Layout {
    pub stop_points: BTreeMap<Arc<str>, (f64, f64)>,
    pub bus_colors: BTreeMap<Arc<str>, Color>,
}

impl Layout {
    pub fn build(catalog: &Catalog, settings: &RenderSettings) -> Self {
        debug!("Laying out the map...");
        let now = Instant::now();
        let layout = Layout {
            stop_points: construct_stop_points(catalog, settings),
            bus_colors: construct_bus_colors(catalog, &settings.color_palette),
        };
        debug!(
            "Laying out {} stops took {:?}",
            layout.stop_points.len(),
            now.elapsed()
        );
        layout
    }
}

/// Buses take palette colours round-robin, in alphabetical order.
fn construct_bus_colors(catalog: &Catalog, palette: &[Color]) -> BTreeMap<Arc<str>, Color> {
    let mut colors = BTreeMap::new();
    if palette.is_empty() {
        return colors;
    }
    for (index, bus) in catalog.buses().iter().enumerate() {
        colors.insert(bus.name.clone(), palette[index % palette.len()].clone());
    }
    colors
}

fn construct_stop_points(
    catalog: &Catalog,
    settings: &RenderSettings,
) -> BTreeMap<Arc<str>, (f64, f64)> {
    if catalog.stops().is_empty() {
        return BTreeMap::new();
    }
    let smoothed = compute_uniform_arrangement(catalog);
    // A stop the smoothing pass never reached keeps its real position;
    // this also covers stops served by no bus.
    let position =
        |stop: &Stop| -> Point { smoothed.get(&stop.index).copied().unwrap_or(stop.position) };

    let mut lon_sorted: Vec<(f64, u32)> = catalog
        .stops()
        .iter()
        .map(|stop| (position(stop).longitude, stop.index))
        .collect();
    lon_sorted.sort_by(|a, b| a.0.total_cmp(&b.0));
    let mut lat_sorted: Vec<(f64, u32)> = catalog
        .stops()
        .iter()
        .map(|stop| (position(stop).latitude, stop.index))
        .collect();
    lat_sorted.sort_by(|a, b| a.0.total_cmp(&b.0));

    let x_indices = glue(catalog, &lon_sorted);
    let y_indices = glue(catalog, &lat_sorted);
    let x_max = x_indices.iter().copied().max().unwrap_or(0);
    let y_max = y_indices.iter().copied().max().unwrap_or(0);
    let x_step = if x_max > 0 {
        (settings.width - 2.0 * settings.padding) / f64::from(x_max)
    } else {
        0.0
    };
    let y_step = if y_max > 0 {
        (settings.height - 2.0 * settings.padding) / f64::from(y_max)
    } else {
        0.0
    };

    catalog
        .stops()
        .iter()
        .map(|stop| {
            let x = f64::from(x_indices[stop.index as usize]) * x_step + settings.padding;
            let y = settings.height
                - settings.padding
                - f64::from(y_indices[stop.index as usize]) * y_step;
            (stop.name.clone(), (x, y))
        })
        .collect()
}

/// Repositions the stops between route anchors onto straight lines.
///
/// Anchors are route terminals, stops shared between buses, and stops a
/// bus passes more than twice per trip; they keep their real coordinates,
/// and everything in between is interpolated between them.
fn compute_uniform_arrangement(catalog: &Catalog) -> HashMap<u32, Point> {
    let mut smoothed: HashMap<u32, Point> = HashMap::new();
    for bus in catalog.buses() {
        let route = &bus.route;
        if route.is_empty() {
            continue;
        }
        let mut anchor = 0;
        for j in 1..route.len() {
            let stop = &catalog.stops()[route[j] as usize];
            if !is_anchor(j, route.len(), stop, bus) {
                continue;
            }
            let from = &catalog.stops()[route[anchor] as usize];
            let steps = (j - anchor) as f64;
            let lat_step = (stop.position.latitude - from.position.latitude) / steps;
            let lon_step = (stop.position.longitude - from.position.longitude) / steps;
            for k in anchor..j {
                let offset = (k - anchor) as f64;
                smoothed.insert(
                    route[k],
                    Point {
                        latitude: from.position.latitude + lat_step * offset,
                        longitude: from.position.longitude + lon_step * offset,
                    },
                );
            }
            smoothed.insert(route[j], stop.position);
            anchor = j;
        }
    }
    smoothed
}

fn is_anchor(position: usize, route_len: usize, stop: &Stop, bus: &Bus) -> bool {
    if position == route_len - 1 || stop.pos_in_routes.len() > 1 {
        return true;
    }
    let visits = stop
        .pos_in_routes
        .get(&bus.name)
        .map_or(0, |positions| positions.len());
    visits * if bus.is_rounded { 1 } else { 2 } > 2
}

/// Assigns each stop a discrete axis index: one past the largest index
/// held by any already-placed neighbour, or zero when it has none.
fn glue(catalog: &Catalog, sorted: &[(f64, u32)]) -> Vec<i32> {
    let mut assigned = vec![0; catalog.stops().len()];
    for (walked, &(_, stop_index)) in sorted.iter().enumerate() {
        let stop = &catalog.stops()[stop_index as usize];
        let mut candidate = -1;
        for &(_, placed_index) in &sorted[..walked] {
            if are_neighbours(stop, &catalog.stops()[placed_index as usize]) {
                candidate = candidate.max(assigned[placed_index as usize]);
            }
        }
        assigned[stop_index as usize] = candidate + 1;
    }
    assigned
}

/// Two stops are neighbours when some bus visits them at adjacent route
/// positions.
fn are_neighbours(first: &Stop, second: &Stop) -> bool {
    for (bus, positions) in &first.pos_in_routes {
        let Some(other_positions) = second.pos_in_routes.get(bus) else {
            continue;
        };
        for &p1 in positions {
            for &p2 in other_positions {
                if p1.abs_diff(p2) == 1 {
                    return true;
                }
            }
        }
    }
    false
}
