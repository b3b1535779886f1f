//! Tests for clip polygon resolution and point tests.

use grid::{Grid, GridDescriptor};
use renderer::clip::{
    split_ring_at_dateline, unwrap_longitudes, ClipTester, ClippingOptions, GeoJson, Ring,
};
use renderer::contour::{generate_contours, ContourOptions, Thresholds};
use renderer::RenderError;
use test_utils::{create_cone_grid, descriptors};
use tile_common::TileCoord;

fn ring(points: &[[f64; 2]]) -> Ring {
    points.to_vec()
}

fn rings(list: &[&[[f64; 2]]]) -> ClippingOptions {
    ClippingOptions {
        polygons: Some(list.iter().map(|r| ring(r)).collect()),
        ..Default::default()
    }
}

const DATELINE_RING: &[[f64; 2]] = &[
    [170.0, 50.0],
    [175.0, 50.0],
    [-175.0, 50.0],
    [-170.0, 50.0],
    [170.0, 50.0],
];

// ============================================================================
// Longitude unwrapping
// ============================================================================

#[test]
fn test_unwrap_leaves_regular_ring() {
    let r = [[10.0, 50.0], [20.0, 50.0], [20.0, 60.0], [10.0, 60.0]];
    assert_eq!(unwrap_longitudes(&r), r.to_vec());
}

#[test]
fn test_unwrap_eastward_crossing() {
    let r = [[170.0, 50.0], [175.0, 50.0], [-175.0, 50.0], [-170.0, 50.0]];
    assert_eq!(
        unwrap_longitudes(&r),
        vec![[170.0, 50.0], [175.0, 50.0], [185.0, 50.0], [190.0, 50.0]]
    );
}

#[test]
fn test_unwrap_westward_crossing() {
    let r = [[-170.0, 50.0], [-175.0, 50.0], [175.0, 50.0], [170.0, 50.0]];
    assert_eq!(
        unwrap_longitudes(&r),
        vec![[-170.0, 50.0], [-175.0, 50.0], [-185.0, 50.0], [-190.0, 50.0]]
    );
}

#[test]
fn test_unwrap_trivial_rings() {
    assert!(unwrap_longitudes(&[]).is_empty());
    assert_eq!(unwrap_longitudes(&[[10.0, 50.0]]), vec![[10.0, 50.0]]);
}

// ============================================================================
// Bounds
// ============================================================================

#[test]
fn test_regular_polygon_bounds() {
    let options = rings(&[&[
        [10.0, 50.0],
        [20.0, 50.0],
        [20.0, 60.0],
        [10.0, 60.0],
        [10.0, 50.0],
    ]]);
    let resolved = options.resolve().unwrap().unwrap();
    assert_eq!(resolved.bounds, Some([10.0, 50.0, 20.0, 60.0]));
}

#[test]
fn test_dateline_polygon_bounds_wrap() {
    let resolved = rings(&[DATELINE_RING]).resolve().unwrap().unwrap();
    let [min_lon, min_lat, max_lon, max_lat] = resolved.bounds.unwrap();
    assert_eq!(min_lon, 170.0);
    assert_eq!(max_lon, -170.0);
    assert!(min_lon > max_lon);
    assert_eq!(min_lat, 50.0);
    assert_eq!(max_lat, 50.0);
}

#[test]
fn test_dateline_geojson_feature_bounds_wrap() {
    let options = ClippingOptions::from_geojson(
        r#"{
            "type": "Feature",
            "properties": {"name": "pacific"},
            "geometry": {
                "type": "Polygon",
                "coordinates": [[[170, 50], [175, 50], [-175, 50], [-170, 50], [170, 50]]]
            }
        }"#,
    )
    .unwrap();
    let resolved = options.resolve().unwrap().unwrap();
    let [min_lon, _, max_lon, _] = resolved.bounds.unwrap();
    assert_eq!(min_lon, 170.0);
    assert_eq!(max_lon, -170.0);
}

#[test]
fn test_multipolygon_on_both_sides_of_dateline() {
    let options = ClippingOptions::from_geojson(
        r#"{
            "type": "Feature",
            "geometry": {
                "type": "MultiPolygon",
                "coordinates": [
                    [[[170, 40], [180, 40], [180, 50], [170, 50], [170, 40]]],
                    [[[-180, 40], [-170, 40], [-170, 50], [-180, 50], [-180, 40]]]
                ]
            }
        }"#,
    )
    .unwrap();
    let resolved = options.resolve().unwrap().unwrap();
    assert_eq!(resolved.bounds, Some([170.0, 40.0, -170.0, 50.0]));
    assert_eq!(resolved.shapes.len(), 1);
    assert_eq!(resolved.shapes[0].polygons.len(), 2);
}

#[test]
fn test_explicit_bounds_win() {
    let mut options = rings(&[DATELINE_RING]);
    options.bounds = Some([0.0, 0.0, 10.0, 10.0]);
    let resolved = options.resolve().unwrap().unwrap();
    assert_eq!(resolved.bounds, Some([0.0, 0.0, 10.0, 10.0]));
}

#[test]
fn test_globe_spanning_polygon() {
    let options = rings(&[&[
        [-180.0, -60.0],
        [-90.0, -60.0],
        [0.0, -60.0],
        [90.0, -60.0],
        [180.0, -60.0],
        [180.0, 60.0],
        [90.0, 60.0],
        [0.0, 60.0],
        [-90.0, 60.0],
        [-180.0, 60.0],
        [-180.0, -60.0],
    ]]);
    let resolved = options.resolve().unwrap().unwrap();
    assert_eq!(resolved.bounds, Some([-180.0, -60.0, 180.0, 60.0]));
}

#[test]
fn test_empty_options_resolve_to_none() {
    assert!(ClippingOptions::default().resolve().unwrap().is_none());
    assert!(ClipTester::from_options(&ClippingOptions::default())
        .unwrap()
        .is_none());
}

#[test]
fn test_non_polygonal_geojson_is_ignored() {
    let options = ClippingOptions::from_geojson(
        r#"{"type": "FeatureCollection", "features": [
            {"type": "Feature", "geometry": {"type": "Point", "coordinates": [10, 50]}},
            {"type": "Feature", "geometry": null}
        ]}"#,
    )
    .unwrap();
    assert!(options.resolve().unwrap().is_none());
}

#[test]
fn test_invalid_input_is_rejected() {
    let degenerate = rings(&[&[[0.0, 0.0], [1.0, 1.0]]]);
    assert!(matches!(degenerate.resolve(), Err(RenderError::Clipping(_))));

    let inverted = ClippingOptions {
        bounds: Some([0.0, 10.0, 10.0, 0.0]),
        ..Default::default()
    };
    assert!(matches!(inverted.resolve(), Err(RenderError::Clipping(_))));

    assert!(matches!(
        ClippingOptions::from_geojson("{not json"),
        Err(RenderError::Json(_))
    ));
}

// ============================================================================
// Dateline splitting
// ============================================================================

#[test]
fn test_split_ring_crossing_dateline() {
    let square = [
        [170.0, 40.0],
        [-170.0, 40.0],
        [-170.0, 50.0],
        [170.0, 50.0],
        [170.0, 40.0],
    ];
    let parts = split_ring_at_dateline(&square);
    assert_eq!(parts.len(), 2);
    for part in &parts {
        assert_eq!(part.first(), part.last());
        assert!(part.iter().all(|p| (-180.0..=180.0).contains(&p[0])));
    }
    let east = &parts[0];
    assert!(east.iter().all(|p| p[0] >= 170.0));
    let west = &parts[1];
    assert!(west.iter().all(|p| p[0] <= -170.0));
}

#[test]
fn test_split_leaves_regular_ring_closed() {
    let parts = split_ring_at_dateline(&[[0.0, 0.0], [10.0, 0.0], [10.0, 10.0]]);
    assert_eq!(parts.len(), 1);
    assert_eq!(parts[0].len(), 4);
    assert_eq!(parts[0][0], parts[0][3]);
}

#[test]
fn test_geojson_types_parse() {
    let geo = GeoJson::from_json(
        r#"{"type":"GeometryCollection","geometries":[
            {"type":"LineString","coordinates":[[0,0],[1,1]]},
            {"type":"Polygon","coordinates":[[[0,0],[1,0],[1,1],[0,0]]]}
        ]}"#,
    )
    .unwrap();
    let GeoJson::GeometryCollection { geometries } = geo else {
        panic!("expected a geometry collection");
    };
    assert_eq!(geometries[0], GeoJson::Other);
    assert!(matches!(geometries[1], GeoJson::Polygon { .. }));
}

// ============================================================================
// Point tests
// ============================================================================

#[test]
fn test_tester_bounds_and_ring() {
    let options = rings(&[&[[0.0, 0.0], [10.0, 0.0], [10.0, 10.0], [0.0, 10.0]]]);
    let tester = ClipTester::from_options(&options).unwrap().unwrap();
    assert!(tester.contains(5.0, 5.0));
    assert!(!tester.contains(15.0, 5.0));
    assert!(!tester.contains(5.0, -5.0));
}

#[test]
fn test_tester_wrapped_bounds() {
    let options = ClippingOptions {
        bounds: Some([170.0, -10.0, -170.0, 10.0]),
        ..Default::default()
    };
    let tester = ClipTester::from_options(&options).unwrap().unwrap();
    assert!(tester.contains(175.0, 0.0));
    assert!(tester.contains(-175.0, 0.0));
    assert!(!tester.contains(0.0, 0.0));
    assert!(!tester.contains(175.0, 20.0));
}

#[test]
fn test_overlapping_polygons_keep_only_intersection() {
    let options = rings(&[
        &[[0.0, 0.0], [10.0, 0.0], [10.0, 10.0], [0.0, 10.0]],
        &[[5.0, 0.0], [15.0, 0.0], [15.0, 10.0], [5.0, 10.0]],
    ]);
    let tester = ClipTester::from_options(&options).unwrap().unwrap();
    assert!(tester.contains(7.0, 5.0));
    assert!(!tester.contains(2.0, 5.0));
    assert!(!tester.contains(12.0, 5.0));
}

#[test]
fn test_geojson_polygon_across_dateline_keeps_both_sides() {
    let options = ClippingOptions::from_geojson(
        r#"{
            "type": "Polygon",
            "coordinates": [[[170, 40], [-170, 40], [-170, 50], [170, 50], [170, 40]]]
        }"#,
    )
    .unwrap();
    let resolved = options.resolve().unwrap().unwrap();
    assert_eq!(resolved.shapes.len(), 1);
    assert_eq!(resolved.shapes[0].polygons[0].outer.len(), 2);

    let tester = ClipTester::new(resolved).unwrap();
    assert!(tester.contains(175.0, 45.0));
    assert!(tester.contains(-175.0, 45.0));
    assert!(!tester.contains(0.0, 45.0));
    assert!(!tester.contains(175.0, 55.0));
}

#[test]
fn test_direct_ring_across_dateline_keeps_both_sides() {
    let options = rings(&[&[[170.0, 40.0], [-170.0, 40.0], [-170.0, 50.0], [170.0, 50.0]]]);
    let tester = ClipTester::from_options(&options).unwrap().unwrap();
    assert_eq!(tester.bounds(), Some([170.0, 40.0, -170.0, 50.0]));
    assert!(tester.contains(175.0, 45.0));
    assert!(tester.contains(-175.0, 45.0));
    assert!(!tester.contains(160.0, 45.0));
}

#[test]
fn test_polygon_hole_is_excluded() {
    let options = ClippingOptions::from_geojson(
        r#"{
            "type": "Polygon",
            "coordinates": [
                [[0, 0], [10, 0], [10, 10], [0, 10], [0, 0]],
                [[4, 4], [6, 4], [6, 6], [4, 6], [4, 4]]
            ]
        }"#,
    )
    .unwrap();
    let tester = ClipTester::from_options(&options).unwrap().unwrap();
    assert!(tester.contains(2.0, 2.0));
    assert!(tester.contains(8.0, 5.0));
    assert!(!tester.contains(5.0, 5.0));
    assert!(!tester.contains(12.0, 5.0));
}

#[test]
fn test_multipolygon_island_inside_hole() {
    let options = ClippingOptions::from_geojson(
        r#"{
            "type": "MultiPolygon",
            "coordinates": [
                [
                    [[0, 0], [10, 0], [10, 10], [0, 10], [0, 0]],
                    [[3, 3], [7, 3], [7, 7], [3, 7], [3, 3]]
                ],
                [[[4, 4], [6, 4], [6, 6], [4, 6], [4, 4]]]
            ]
        }"#,
    )
    .unwrap();
    let tester = ClipTester::from_options(&options).unwrap().unwrap();
    assert!(tester.contains(1.0, 1.0));
    assert!(!tester.contains(3.5, 5.0));
    assert!(tester.contains(5.0, 5.0));
}

#[test]
fn test_polygons_intersect_across_geojson_features() {
    let options = ClippingOptions::from_geojson(
        r#"{"type": "FeatureCollection", "features": [
            {"type": "Feature", "geometry": {"type": "Polygon",
                "coordinates": [[[0, 0], [10, 0], [10, 10], [0, 10], [0, 0]]]}},
            {"type": "Feature", "geometry": {"type": "Polygon",
                "coordinates": [[[5, 0], [15, 0], [15, 10], [5, 10], [5, 0]]]}}
        ]}"#,
    )
    .unwrap();
    let tester = ClipTester::from_options(&options).unwrap().unwrap();
    assert!(tester.contains(7.0, 5.0));
    assert!(!tester.contains(2.0, 5.0));
}

#[test]
#[ignore = "multiple clip polygons intersect instead of forming a union"]
fn test_disjoint_polygons_form_union() {
    let options = rings(&[
        &[[0.0, 0.0], [10.0, 0.0], [10.0, 10.0], [0.0, 10.0]],
        &[[20.0, 0.0], [30.0, 0.0], [30.0, 10.0], [20.0, 10.0]],
    ]);
    let tester = ClipTester::from_options(&options).unwrap().unwrap();
    assert!(tester.contains(5.0, 5.0));
    assert!(tester.contains(25.0, 5.0));
}

#[test]
fn test_clip_restricts_contours() {
    let descriptor = GridDescriptor::from_json(descriptors::REGULAR_EUROPE_1DEG).unwrap();
    let grid = Grid::from_descriptor(&descriptor, None).unwrap();
    let values = create_cone_grid(40, 30, 100.0);
    let tile = TileCoord::new(4, 8, 5);
    let thresholds = Thresholds::Levels(vec![80.0]);
    let options = ContourOptions::default();

    let unclipped = generate_contours(&grid, &values, tile, &thresholds, &options, None);
    assert_eq!(unclipped[0].lines.len(), 1);

    // Keep only the western half of the ring around 9.5E.
    let clip = rings(&[&[[0.0, 40.0], [9.5, 40.0], [9.5, 56.0], [0.0, 56.0]]]);
    let tester = ClipTester::from_options(&clip).unwrap().unwrap();
    let clipped = generate_contours(&grid, &values, tile, &thresholds, &options, Some(&tester));

    assert_eq!(clipped.len(), 1);
    let x_limit = (189.5 / 360.0 * 16.0 - 8.0) * 4096.0;
    for line in &clipped[0].lines {
        assert_ne!(line.first(), line.last());
        for &(x, _) in line {
            assert!((x as f64) < x_limit + 64.0, "x {} beyond clip", x);
        }
    }
}
