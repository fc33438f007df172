use omnibus::catalog::Catalog;
use omnibus::requests::{BaseRequest, RoutingSettings};
use omnibus::shared::geo::Point;

fn routing() -> RoutingSettings {
    RoutingSettings {
        bus_wait_time: 2,
        bus_velocity: 30.0,
    }
}

fn base_requests(raw: &str) -> Vec<BaseRequest> {
    serde_json::from_str(raw).unwrap()
}

fn two_stop_network() -> Vec<BaseRequest> {
    base_requests(
        r#"[
        {"type": "Stop", "name": "A", "latitude": 55.61, "longitude": 37.20,
         "road_distances": {"B": 3900}},
        {"type": "Stop", "name": "B", "latitude": 55.58, "longitude": 37.25,
         "road_distances": {"A": 3900}},
        {"type": "Bus", "name": "1", "stops": ["A", "B"], "is_roundtrip": false}
    ]"#,
    )
}

#[test]
fn bus_aggregates_test() {
    let catalog = Catalog::build(&two_stop_network(), &routing()).unwrap();
    let bus = catalog.bus("1").unwrap();
    assert_eq!(bus.route_length, 7800);
    assert_eq!(bus.stops_count, 3);
    assert_eq!(bus.unique_stops_count, 2);
    assert_eq!(bus.end_points, (0, 1));

    let a = Point {
        latitude: 55.61,
        longitude: 37.20,
    };
    let b = Point {
        latitude: 55.58,
        longitude: 37.25,
    };
    let expected = 7800.0 / (2.0 * a.distance(&b));
    assert!((bus.curvature() - expected).abs() < 1e-9);
}

#[test]
fn rounded_bus_aggregates_test() {
    let catalog = Catalog::build(
        &base_requests(
            r#"[
            {"type": "Stop", "name": "X", "latitude": 55.0, "longitude": 37.0,
             "road_distances": {"Y": 1000}},
            {"type": "Stop", "name": "Y", "latitude": 55.1, "longitude": 37.1,
             "road_distances": {"Z": 2000}},
            {"type": "Stop", "name": "Z", "latitude": 55.2, "longitude": 37.2,
             "road_distances": {"X": 3000}},
            {"type": "Bus", "name": "2", "stops": ["X", "Y", "Z", "X"], "is_roundtrip": true}
        ]"#,
        ),
        &routing(),
    )
    .unwrap();
    let bus = catalog.bus("2").unwrap();
    assert_eq!(bus.route_length, 6000);
    assert_eq!(bus.stops_count, 4);
    assert_eq!(bus.unique_stops_count, 3);
    assert_eq!(bus.end_points, (0, 3));
}

#[test]
fn road_distances_are_symmetrised_test() {
    let catalog = Catalog::build(
        &base_requests(
            r#"[
            {"type": "Stop", "name": "A", "latitude": 55.0, "longitude": 37.0,
             "road_distances": {"B": 100}},
            {"type": "Stop", "name": "B", "latitude": 55.1, "longitude": 37.1}
        ]"#,
        ),
        &routing(),
    )
    .unwrap();
    let a = catalog.stop("A").unwrap().index;
    let b = catalog.stop("B").unwrap().index;
    assert_eq!(catalog.road_distance(a, b).unwrap(), 100);
    assert_eq!(catalog.road_distance(b, a).unwrap(), 100);
}

#[test]
fn explicit_reverse_distance_wins_test() {
    // Declared in both directions with different values: keep both.
    let catalog = Catalog::build(
        &base_requests(
            r#"[
            {"type": "Stop", "name": "A", "latitude": 55.0, "longitude": 37.0,
             "road_distances": {"B": 100}},
            {"type": "Stop", "name": "B", "latitude": 55.1, "longitude": 37.1,
             "road_distances": {"A": 70}}
        ]"#,
        ),
        &routing(),
    )
    .unwrap();
    let a = catalog.stop("A").unwrap().index;
    let b = catalog.stop("B").unwrap().index;
    assert_eq!(catalog.road_distance(a, b).unwrap(), 100);
    assert_eq!(catalog.road_distance(b, a).unwrap(), 70);
}

#[test]
fn distance_to_self_is_zero_test() {
    let catalog = Catalog::build(&two_stop_network(), &routing()).unwrap();
    let a = catalog.stop("A").unwrap().index;
    assert_eq!(catalog.road_distance(a, a).unwrap(), 0);
}

#[test]
fn bus_position_index_points_back_test() {
    let requests = base_requests(
        r#"[
        {"type": "Stop", "name": "A", "latitude": 55.0, "longitude": 37.0,
         "road_distances": {"B": 500}},
        {"type": "Stop", "name": "B", "latitude": 55.1, "longitude": 37.1,
         "road_distances": {"A": 500}},
        {"type": "Bus", "name": "7", "stops": ["A", "B", "A"], "is_roundtrip": true},
        {"type": "Bus", "name": "8", "stops": ["B", "A"], "is_roundtrip": false}
    ]"#,
    );
    let catalog = Catalog::build(&requests, &routing()).unwrap();
    for stop in catalog.stops() {
        for (bus_name, positions) in &stop.pos_in_routes {
            let bus = catalog.bus(bus_name).unwrap();
            for &position in positions {
                assert_eq!(
                    bus.route[position], stop.index,
                    "bus {bus_name} position {position} should be {}",
                    stop.name
                );
            }
        }
    }
    let a = catalog.stop("A").unwrap();
    let positions: Vec<usize> = a.pos_in_routes["7"].iter().copied().collect();
    assert_eq!(positions, [0, 2]);
}

#[test]
fn missing_road_distance_aborts_the_build_test() {
    let requests = base_requests(
        r#"[
        {"type": "Stop", "name": "A", "latitude": 55.0, "longitude": 37.0},
        {"type": "Stop", "name": "B", "latitude": 55.1, "longitude": 37.1},
        {"type": "Bus", "name": "1", "stops": ["A", "B"], "is_roundtrip": false}
    ]"#,
    );
    assert!(Catalog::build(&requests, &routing()).is_err());
}

#[test]
fn later_stop_record_updates_the_earlier_test() {
    let catalog = Catalog::build(
        &base_requests(
            r#"[
            {"type": "Stop", "name": "A", "latitude": 10.0, "longitude": 10.0},
            {"type": "Stop", "name": "A", "latitude": 55.0, "longitude": 37.0}
        ]"#,
        ),
        &routing(),
    )
    .unwrap();
    assert_eq!(catalog.stops().len(), 1);
    let a = catalog.stop("A").unwrap();
    assert_eq!(a.position.latitude, 55.0);
    assert_eq!(a.position.longitude, 37.0);
}

#[test]
fn stop_buses_are_alphabetical_test() {
    let catalog = Catalog::build(
        &base_requests(
            r#"[
            {"type": "Stop", "name": "A", "latitude": 55.0, "longitude": 37.0,
             "road_distances": {"A": 0}},
            {"type": "Bus", "name": "9", "stops": ["A"], "is_roundtrip": true},
            {"type": "Bus", "name": "14", "stops": ["A"], "is_roundtrip": true},
            {"type": "Bus", "name": "2", "stops": ["A"], "is_roundtrip": true}
        ]"#,
        ),
        &routing(),
    )
    .unwrap();
    let names: Vec<&str> = catalog
        .stop("A")
        .unwrap()
        .buses()
        .map(|name| name.as_ref())
        .collect();
    assert_eq!(names, ["14", "2", "9"]);
}

#[test]
fn velocity_is_converted_to_metres_per_second_test() {
    let catalog = Catalog::build(&[], &routing()).unwrap();
    assert!((catalog.bus_velocity - 30.0 / 3.6).abs() < 1e-12);
    assert_eq!(catalog.wait_time, 2.0);
}
