use serde_json::{Value, json};

use crate::{
    artifact::{Artifact, EdgeRecord},
    render::canvas::Canvas,
    requests::StatRequest,
    transit::router::Router,
};

/// Answers stat requests against a loaded artifact.
///
/// Pure dispatch: every lookup goes to the frozen records, routes go to
/// the [`Router`], drawings to the [`Canvas`]. Results come back in
/// request order, each carrying the echoed `request_id`.
pub struct Executor<'a> {
    data: &'a Artifact,
    router: Router<'a>,
    canvas: Canvas<'a>,
}

impl<'a> Executor<'a> {
    pub fn new(data: &'a Artifact) -> Self {
        Self {
            data,
            router: Router::new(data),
            canvas: Canvas::new(data),
        }
    }

    pub fn execute_all(&mut self, requests: &[StatRequest]) -> Vec<Value> {
        requests
            .iter()
            .map(|request| self.execute(request))
            .collect()
    }

    pub fn execute(&mut self, request: &StatRequest) -> Value {
        let (id, mut result) = match request {
            StatRequest::Bus { id, name } => (*id, self.bus_stats(name)),
            StatRequest::Stop { id, name } => (*id, self.stop_stats(name)),
            StatRequest::Route { id, from, to } => (*id, self.route(from, to)),
            StatRequest::Map { id } => (*id, self.map()),
        };
        result["request_id"] = json!(id);
        result
    }

    fn bus_stats(&self, name: &str) -> Value {
        let Some(bus) = self.data.buses.get(name) else {
            return not_found();
        };
        json!({
            "route_length": bus.route_length,
            "curvature": bus.curvature,
            "stop_count": bus.stops_cnt,
            "unique_stop_count": bus.unique_stops_cnt,
        })
    }

    fn stop_stats(&self, name: &str) -> Value {
        let Some(stop) = self.data.stops.get(name) else {
            return not_found();
        };
        json!({ "buses": stop.buses })
    }

    fn map(&self) -> Value {
        json!({ "map": self.canvas.drawn_map() })
    }

    fn route(&mut self, from: &str, to: &str) -> Value {
        let vertices = &self.data.graph.vertices;
        let (Some(from_vertex), Some(to_vertex)) = (vertices.get(from), vertices.get(to)) else {
            return not_found();
        };
        let Some(info) = self.router.build_route(from_vertex.wait, to_vertex.wait) else {
            return not_found();
        };

        let mut items = Vec::with_capacity(info.edge_count);
        let mut wait_stops: Vec<&str> = Vec::new();
        let mut bus_slices: Vec<(&str, &[String])> = Vec::new();
        for index in 0..info.edge_count {
            let Some(edge_id) = self.router.route_edge(info.id, index) else {
                continue;
            };
            match &self.data.graph.edges[edge_id] {
                EdgeRecord::Wait { time, stop, .. } => {
                    items.push(json!({
                        "type": "Wait",
                        "stop_name": stop,
                        "time": time,
                    }));
                    wait_stops.push(stop);
                }
                EdgeRecord::Bus {
                    time,
                    bus,
                    span_cnt,
                    end_points,
                    ..
                } => {
                    items.push(json!({
                        "type": "Bus",
                        "bus": bus,
                        "span_count": span_cnt,
                        "time": time,
                    }));
                    if let Some(record) = self.data.buses.get(bus) {
                        let (low, high) = *end_points;
                        bus_slices.push((bus, &record.route[low as usize..=high as usize]));
                    }
                }
            }
        }
        if from != to {
            wait_stops.push(to);
        }
        let map = self.canvas.draw_route(&wait_stops, &bus_slices);
        self.router.release_route(info.id);
        json!({
            "total_time": info.weight,
            "items": items,
            "map": map,
        })
    }
}

fn not_found() -> Value {
    json!({ "error_message": "not found" })
}
