use omnibus::catalog::Catalog;
use omnibus::render::Layout;
use omnibus::render::svg::Color;
use omnibus::requests::{BaseRequest, RenderSettings, RoutingSettings};

fn routing() -> RoutingSettings {
    RoutingSettings {
        bus_wait_time: 2,
        bus_velocity: 30.0,
    }
}

fn settings(palette: &str) -> RenderSettings {
    serde_json::from_str(&format!(
        r#"{{
        "width": 600, "height": 400, "padding": 50, "outer_margin": 100,
        "color_palette": {palette},
        "line_width": 14, "underlayer_color": "white",
        "underlayer_width": 3, "stop_radius": 5,
        "bus_label_offset": [7, 15], "bus_label_font_size": 20,
        "stop_label_offset": [7, -3], "stop_label_font_size": 18,
        "layers": ["bus_lines", "bus_labels", "stop_points", "stop_labels"]
    }}"#
    ))
    .unwrap()
}

fn catalog(raw: &str) -> Catalog {
    let requests: Vec<BaseRequest> = serde_json::from_str(raw).unwrap();
    Catalog::build(&requests, &routing()).unwrap()
}

#[test]
fn chained_stops_spread_over_the_grid_test() {
    // Three stops on one line; every adjacent pair must land in its own
    // column and row.
    let catalog = catalog(
        r#"[
        {"type": "Stop", "name": "A", "latitude": 55.0, "longitude": 37.0,
         "road_distances": {"B": 1000}},
        {"type": "Stop", "name": "B", "latitude": 55.0, "longitude": 37.1,
         "road_distances": {"C": 1000}},
        {"type": "Stop", "name": "C", "latitude": 55.0, "longitude": 37.2},
        {"type": "Bus", "name": "1", "stops": ["A", "B", "C"], "is_roundtrip": false}
    ]"#,
    );
    let layout = Layout::build(&catalog, &settings(r#"["green"]"#));

    // width 600, padding 50, two columns of gap: step (600 - 100) / 2.
    let x_step: f64 = 250.0;
    assert_eq!(layout.stop_points["A"].0, 50.0);
    assert_eq!(layout.stop_points["B"].0, 50.0 + x_step);
    assert_eq!(layout.stop_points["C"].0, 50.0 + 2.0 * x_step);

    // Equal latitudes still split rows: neighbours are never glued.
    let y_step: f64 = 150.0;
    assert_eq!(layout.stop_points["A"].1, 400.0 - 50.0);
    assert_eq!(layout.stop_points["B"].1, 400.0 - 50.0 - y_step);
    assert_eq!(layout.stop_points["C"].1, 400.0 - 50.0 - 2.0 * y_step);
}

#[test]
fn unrelated_stops_compress_to_one_cell_test() {
    let catalog = catalog(
        r#"[
        {"type": "Stop", "name": "A", "latitude": 55.0, "longitude": 37.0},
        {"type": "Stop", "name": "B", "latitude": 56.0, "longitude": 37.5}
    ]"#,
    );
    let layout = Layout::build(&catalog, &settings(r#"["green"]"#));
    // Gluing only separates neighbours; stops no bus relates collapse to
    // index 0 on both axes and the steps degenerate to zero.
    assert_eq!(layout.stop_points["A"], (50.0, 350.0));
    assert_eq!(layout.stop_points["B"], (50.0, 350.0));
}

#[test]
fn interior_stops_are_smoothed_between_anchors_test() {
    // B's declared longitude (37.9) would sort it past C; smoothing pulls
    // it onto the straight line between the terminals A and C.
    let catalog = catalog(
        r#"[
        {"type": "Stop", "name": "A", "latitude": 55.0, "longitude": 37.0,
         "road_distances": {"B": 1000}},
        {"type": "Stop", "name": "B", "latitude": 55.0, "longitude": 37.9,
         "road_distances": {"C": 1000}},
        {"type": "Stop", "name": "C", "latitude": 55.0, "longitude": 37.2},
        {"type": "Bus", "name": "1", "stops": ["A", "B", "C"], "is_roundtrip": false}
    ]"#,
    );
    let layout = Layout::build(&catalog, &settings(r#"["green"]"#));
    assert!(layout.stop_points["A"].0 < layout.stop_points["B"].0);
    assert!(layout.stop_points["B"].0 < layout.stop_points["C"].0);
}

#[test]
fn colors_follow_alphabetical_round_robin_test() {
    let catalog = catalog(
        r#"[
        {"type": "Stop", "name": "A", "latitude": 55.0, "longitude": 37.0},
        {"type": "Bus", "name": "b", "stops": ["A"], "is_roundtrip": true},
        {"type": "Bus", "name": "a", "stops": ["A"], "is_roundtrip": true},
        {"type": "Bus", "name": "c", "stops": ["A"], "is_roundtrip": true}
    ]"#,
    );
    let layout = Layout::build(&catalog, &settings(r#"["green", "red"]"#));
    assert_eq!(layout.bus_colors["a"], Color::from("green"));
    assert_eq!(layout.bus_colors["b"], Color::from("red"));
    assert_eq!(layout.bus_colors["c"], Color::from("green"));
}

#[test]
fn swapping_palette_entries_swaps_bus_colors_test() {
    let catalog = catalog(
        r#"[
        {"type": "Stop", "name": "A", "latitude": 55.0, "longitude": 37.0},
        {"type": "Bus", "name": "a", "stops": ["A"], "is_roundtrip": true},
        {"type": "Bus", "name": "b", "stops": ["A"], "is_roundtrip": true}
    ]"#,
    );
    let straight = Layout::build(&catalog, &settings(r#"["green", "red"]"#));
    let swapped = Layout::build(&catalog, &settings(r#"["red", "green"]"#));
    assert_eq!(straight.bus_colors["a"], swapped.bus_colors["b"]);
    assert_eq!(straight.bus_colors["b"], swapped.bus_colors["a"]);
}

#[test]
fn empty_palette_leaves_buses_uncolored_test() {
    let catalog = catalog(
        r#"[
        {"type": "Stop", "name": "A", "latitude": 55.0, "longitude": 37.0},
        {"type": "Bus", "name": "a", "stops": ["A"], "is_roundtrip": true}
    ]"#,
    );
    let layout = Layout::build(&catalog, &settings("[]"));
    assert!(layout.bus_colors.is_empty());
}

#[test]
fn empty_catalog_has_an_empty_layout_test() {
    let catalog = Catalog::build(&[], &routing()).unwrap();
    let layout = Layout::build(&catalog, &settings(r#"["green"]"#));
    assert!(layout.stop_points.is_empty());
    assert!(layout.bus_colors.is_empty());
}
