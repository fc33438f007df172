use crate::artifact::Artifact;

use super::svg::{Circle, Color, Document, Polyline, Rect, Text};

/// Serve-time renderer over the frozen layout.
///
/// The full map is laid out once at construction, walking the configured
/// layer list in order; route overlays are drawn on demand over a copy of
/// it, dimmed by the outer frame rectangle and restricted to the stops
/// and bus segments of one itinerary.
pub struct Canvas<'a> {
    data: &'a Artifact,
    base_map: Document,
    drawn_map: String,
}

impl<'a> Canvas<'a> {
    pub fn new(data: &'a Artifact) -> Self {
        let mut base_map = Document::new();
        for layer in &data.render.layers {
            match layer.as_str() {
                "bus_lines" => bus_lines(data, &mut base_map),
                "bus_labels" => bus_labels(data, &mut base_map),
                "stop_points" => stop_points(data, &mut base_map),
                "stop_labels" => stop_labels(data, &mut base_map),
                _ => {}
            }
        }
        let drawn_map = base_map.render();
        Self {
            data,
            base_map,
            drawn_map,
        }
    }

    /// The prerendered full map.
    pub fn drawn_map(&self) -> &str {
        &self.drawn_map
    }

    /// Renders one itinerary: `wait_stops` are the stops the passenger
    /// waits at (plus the destination), `bus_slices` the ridden stretch
    /// of each bus's forward route.
    pub fn draw_route(&self, wait_stops: &[&str], bus_slices: &[(&str, &[String])]) -> String {
        let render = &self.data.render;
        let mut svg = self.base_map.clone();
        svg.add(
            Rect::new()
                .position((-render.outer_margin, -render.outer_margin))
                .dimensions(
                    render.width + 2.0 * render.outer_margin,
                    render.height + 2.0 * render.outer_margin,
                )
                .fill(Color::from(render.underlayer_color.clone())),
        );
        for layer in &render.layers {
            match layer.as_str() {
                "bus_lines" => route_bus_lines(self.data, &mut svg, bus_slices),
                "bus_labels" => route_bus_labels(self.data, &mut svg, bus_slices),
                "stop_points" => route_stop_points(self.data, &mut svg, bus_slices),
                "stop_labels" => route_stop_labels(self.data, &mut svg, wait_stops),
                _ => {}
            }
        }
        svg.render()
    }
}

fn stop_point(data: &Artifact, name: &str) -> Option<(f64, f64)> {
    data.render
        .stops_points
        .get(name)
        .map(|point| (point.x, point.y))
}

fn bus_color(data: &Artifact, name: &str) -> Color {
    data.render
        .buses_colors
        .get(name)
        .cloned()
        .map(Color::Named)
        .unwrap_or_default()
}

fn underlayer_color(data: &Artifact) -> Color {
    Color::from(data.render.underlayer_color.clone())
}

fn bus_polyline<'n>(
    data: &Artifact,
    bus: &str,
    stops: impl Iterator<Item = &'n String>,
) -> Polyline {
    let mut line = Polyline::new()
        .stroke(bus_color(data, bus))
        .stroke_width(data.render.line_width)
        .line_cap("round")
        .line_join("round");
    for stop in stops {
        if let Some(point) = stop_point(data, stop) {
            line = line.point(point);
        }
    }
    line
}

fn bus_lines(data: &Artifact, svg: &mut Document) {
    for (name, bus) in &data.buses {
        // A non-rounded bus rides the route there and back.
        let forward = bus.route.iter();
        let line = if bus.is_rounded {
            bus_polyline(data, name, forward)
        } else {
            bus_polyline(data, name, forward.chain(bus.route.iter().rev().skip(1)))
        };
        svg.add(line);
    }
}

fn add_bus_label(data: &Artifact, svg: &mut Document, bus: &str, stop: &str) {
    let Some(point) = stop_point(data, stop) else {
        return;
    };
    let label = Text::new()
        .position(point)
        .offset((
            data.render.bus_label_offset.x,
            data.render.bus_label_offset.y,
        ))
        .font_size(data.render.bus_label_font_size)
        .font_family("Verdana")
        .font_weight("bold")
        .data(bus);
    svg.add(
        label
            .clone()
            .fill(underlayer_color(data))
            .stroke(underlayer_color(data))
            .stroke_width(data.render.underlayer_width)
            .line_cap("round")
            .line_join("round"),
    );
    svg.add(label.fill(bus_color(data, bus)));
}

fn bus_labels(data: &Artifact, svg: &mut Document) {
    for (name, bus) in &data.buses {
        let Some(first) = bus.route.first() else {
            continue;
        };
        add_bus_label(data, svg, name, first);
        if let Some(last) = bus.route.last()
            && !bus.is_rounded
            && last != first
        {
            add_bus_label(data, svg, name, last);
        }
    }
}

fn add_stop_point(data: &Artifact, svg: &mut Document, stop: &str) {
    let Some(point) = stop_point(data, stop) else {
        return;
    };
    svg.add(
        Circle::new()
            .center(point)
            .radius(data.render.stop_radius)
            .fill(Color::from("white")),
    );
}

fn stop_points(data: &Artifact, svg: &mut Document) {
    for name in data.stops.keys() {
        add_stop_point(data, svg, name);
    }
}

fn add_stop_label(data: &Artifact, svg: &mut Document, stop: &str) {
    let Some(point) = stop_point(data, stop) else {
        return;
    };
    let label = Text::new()
        .position(point)
        .offset((
            data.render.stop_label_offset.x,
            data.render.stop_label_offset.y,
        ))
        .font_size(data.render.stop_label_font_size)
        .font_family("Verdana")
        .data(stop);
    svg.add(
        label
            .clone()
            .fill(underlayer_color(data))
            .stroke(underlayer_color(data))
            .stroke_width(data.render.underlayer_width)
            .line_cap("round")
            .line_join("round"),
    );
    svg.add(label.fill(Color::from("black")));
}

fn stop_labels(data: &Artifact, svg: &mut Document) {
    for name in data.stops.keys() {
        add_stop_label(data, svg, name);
    }
}

fn route_bus_lines(data: &Artifact, svg: &mut Document, bus_slices: &[(&str, &[String])]) {
    for (bus, slice) in bus_slices {
        svg.add(bus_polyline(data, bus, slice.iter()));
    }
}

fn route_bus_labels(data: &Artifact, svg: &mut Document, bus_slices: &[(&str, &[String])]) {
    for (bus, slice) in bus_slices {
        let Some(record) = data.buses.get(*bus) else {
            continue;
        };
        // Labels appear only where the ridden stretch touches a terminal.
        let terminals = [record.route.first(), record.route.last()];
        let mut ends = vec![slice.first()];
        if slice.last() != slice.first() {
            ends.push(slice.last());
        }
        for end in ends.into_iter().flatten() {
            if terminals.iter().flatten().any(|terminal| *terminal == end) {
                add_bus_label(data, svg, bus, end);
            }
        }
    }
}

fn route_stop_points(data: &Artifact, svg: &mut Document, bus_slices: &[(&str, &[String])]) {
    for (_, slice) in bus_slices {
        for stop in *slice {
            add_stop_point(data, svg, stop);
        }
    }
}

fn route_stop_labels(data: &Artifact, svg: &mut Document, wait_stops: &[&str]) {
    for stop in wait_stops {
        add_stop_label(data, svg, stop);
    }
}
