use chart_pages::core::Point;
use chart_pages::data::topology::{FeatureGeometry, GeometryId, Topology};

const COUNTIES: &str = include_str!("fixtures/counties.json");

fn counties() -> Topology {
    serde_json::from_str(COUNTIES).expect("fixture topology")
}

#[test]
fn features_follow_collection_order() {
    let topology = counties();
    let features = topology.features("counties").expect("features");

    let ids: Vec<Option<i64>> = features
        .iter()
        .map(|feature| feature.id.as_ref().and_then(GeometryId::as_number))
        .collect();
    assert_eq!(ids, vec![Some(1001), Some(1003), Some(9999)]);
}

#[test]
fn polygon_rings_stitch_shared_arcs() {
    let features = counties().features("counties").expect("features");

    assert_eq!(features[0].path_data(), "M0,0L0,10L-10,10L-10,0Z");
    // Arc 0 is walked backwards by the second county.
    assert_eq!(features[1].path_data(), "M0,10L0,0L10,0L10,10Z");
    assert_eq!(features[2].path_data(), "M20,0L30,0L30,10Z");
}

#[test]
fn text_ids_parse_as_numbers() {
    let features = counties().features("states").expect("features");
    assert_eq!(features[0].id, Some(GeometryId::Text("01".to_owned())));
    assert_eq!(features[0].id.as_ref().and_then(GeometryId::as_number), Some(1));
    assert!(matches!(
        features[1].geometry,
        FeatureGeometry::MultiPolygon(ref polygons) if polygons.len() == 2
    ));
    assert_eq!(GeometryId::Text("abc".to_owned()).as_number(), None);
}

#[test]
fn interior_mesh_keeps_only_shared_borders() {
    let topology = counties();
    let mesh = topology.interior_mesh("states").expect("mesh");
    assert_eq!(mesh, vec![vec![Point::new(0.0, 0.0), Point::new(0.0, 10.0)]]);

    let county_mesh = topology.interior_mesh("counties").expect("mesh");
    assert_eq!(county_mesh.len(), 1);
}

#[test]
fn full_mesh_emits_each_used_arc_once() {
    let mesh = counties().mesh("counties").expect("mesh");
    assert_eq!(mesh.len(), 4);
}

#[test]
fn unknown_object_is_rejected() {
    assert!(counties().features("nation").is_err());
    assert!(counties().interior_mesh("nation").is_err());
}

#[test]
fn quantized_arcs_are_delta_decoded() {
    let topology: Topology = serde_json::from_str(
        r#"{
            "type": "Topology",
            "transform": { "scale": [0.5, 2.0], "translate": [100.0, -10.0] },
            "arcs": [[[0, 0], [4, 0], [0, 3], [-4, -3]]],
            "objects": {
                "land": { "type": "Polygon", "arcs": [[0]] },
                "capital": { "type": "Point", "coordinates": [2, 5] }
            }
        }"#,
    )
    .expect("topology");

    let land = topology.features("land").expect("land");
    match &land[0].geometry {
        FeatureGeometry::Polygon(rings) => assert_eq!(
            rings[0],
            vec![
                Point::new(100.0, -10.0),
                Point::new(102.0, -10.0),
                Point::new(102.0, -4.0),
                Point::new(100.0, -10.0),
            ]
        ),
        other => panic!("unexpected geometry {other:?}"),
    }

    // Point coordinates are absolute, not delta-encoded.
    let capital = topology.features("capital").expect("capital");
    assert_eq!(capital[0].geometry, FeatureGeometry::Point(Point::new(101.0, 0.0)));
    assert_eq!(capital[0].path_data(), "");
}

#[test]
fn out_of_range_arc_reference_is_an_error() {
    let topology: Topology = serde_json::from_str(
        r#"{
            "arcs": [[[0, 0], [1, 1]]],
            "objects": { "bad": { "type": "LineString", "arcs": [0, 1] } }
        }"#,
    )
    .expect("topology");

    assert!(topology.features("bad").is_err());
    assert!(topology.mesh("bad").is_err());
}

#[test]
fn malformed_positions_are_rejected() {
    let topology: Topology = serde_json::from_str(
        r#"{
            "arcs": [[[0]]],
            "objects": { "bad": { "type": "LineString", "arcs": [0] } }
        }"#,
    )
    .expect("topology");
    assert!(topology.features("bad").is_err());
}
