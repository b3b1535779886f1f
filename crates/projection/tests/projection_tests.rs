//! Round-trip and reference-value tests for the projection factory.

use projection::{Project, Projection, ProjectionError, ProjectionKind, ProjectionParams};

fn lcc_params() -> ProjectionParams {
    ProjectionParams {
        lambda0: Some(352.0),
        phi0: Some(55.5),
        phi1: Some(55.5),
        phi2: Some(55.5),
        radius: Some(6371229.0),
        ..ProjectionParams::named("LambertConformalConicProjection")
    }
}

fn assert_roundtrip(projection: &Projection, points: &[(f64, f64)]) {
    for &(lat, lon) in points {
        let (x, y) = projection.forward(lat, lon);
        let (lat2, lon2) = projection.reverse(x, y);
        assert!(
            (lat - lat2).abs() < 1e-6 && (lon - lon2).abs() < 1e-6,
            "{:?}: ({}, {}) came back as ({}, {})",
            projection.kind(),
            lat,
            lon,
            lat2,
            lon2
        );
    }
}

// ============================================================================
// Factory
// ============================================================================

#[test]
fn test_factory_selects_variant() {
    let projection = Projection::from_params(&lcc_params()).unwrap();
    assert_eq!(projection.kind(), ProjectionKind::LambertConformalConic);

    let mercator = Projection::from_params(&ProjectionParams::named("MercatorProjection")).unwrap();
    assert_eq!(mercator.kind(), ProjectionKind::Mercator);
}

#[test]
fn test_factory_unknown_name() {
    let err = Projection::from_params(&ProjectionParams::named("Robinson")).unwrap_err();
    assert_eq!(err, ProjectionError::UnknownProjection("Robinson".to_string()));
}

#[test]
fn test_factory_missing_parameter() {
    let mut params = lcc_params();
    params.phi2 = None;
    let err = Projection::try_from(&params).unwrap_err();
    assert_eq!(
        err,
        ProjectionError::MissingParameter {
            projection: "LambertConformalConicProjection",
            parameter: "ϕ2",
        }
    );
}

#[test]
fn test_factory_from_json() {
    let json = r#"{"name":"StereograpicProjection","latitude":90,"longitude":249,"radius":6371229}"#;
    let params: ProjectionParams = serde_json::from_str(json).unwrap();
    let projection = Projection::from_params(&params).unwrap();
    assert_eq!(projection.kind(), ProjectionKind::Stereographic);
}

// ============================================================================
// Reference values
// ============================================================================

#[test]
fn test_lambert_conformal_reference_point() {
    let projection = Projection::from_params(&lcc_params()).unwrap();

    let (x, y) = projection.forward(39.671, -25.421997);
    assert!((x - -1527524.6244234492).abs() < 1e-6, "x = {}", x);
    assert!((y - -1588681.0428292789).abs() < 1e-6, "y = {}", y);

    let (lat, lon) = projection.reverse(-1527524.6244234492, -1588681.0428292789);
    assert!((lat - 39.671000000000014).abs() < 1e-9, "lat = {}", lat);
    assert!((lon - -25.421996999999998).abs() < 1e-9, "lon = {}", lon);
}

#[test]
fn test_rotated_reference_point() {
    let params = ProjectionParams {
        rotation: Some([-35.0, -8.0]),
        ..ProjectionParams::named("RotatedLatLonProjection")
    };
    let projection = Projection::from_params(&params).unwrap();
    let (x, y) = projection.forward(39.671, -25.421997);
    assert!((x - 13.716985366241445).abs() < 1e-9);
    assert!((y - 13.617348599940314).abs() < 1e-9);
}

// ============================================================================
// Round trips
// ============================================================================

#[test]
fn test_roundtrip_all_projections() {
    let europe = [(39.671, -25.421997), (47.3, 8.5), (60.1, 24.9), (52.4, 4.9)];

    assert_roundtrip(
        &Projection::from_params(&ProjectionParams::named("MercatorProjection")).unwrap(),
        &[(0.0, 0.0), (47.3, 8.5), (-33.9, 151.2), (70.0, -170.0)],
    );

    assert_roundtrip(&Projection::from_params(&lcc_params()).unwrap(), &europe);

    let rotated = ProjectionParams {
        rotated_lat: Some(-35.0),
        rotated_lon: Some(-8.0),
        ..ProjectionParams::named("RotatedLatLonProjection")
    };
    assert_roundtrip(&Projection::from_params(&rotated).unwrap(), &europe);

    let laea = ProjectionParams {
        lambda0: Some(10.0),
        phi1: Some(52.0),
        ..ProjectionParams::named("LambertAzimuthalEqualAreaProjection")
    };
    assert_roundtrip(&Projection::from_params(&laea).unwrap(), &europe[1..]);

    let stereo = ProjectionParams {
        latitude: Some(90.0),
        longitude: Some(-105.0),
        ..ProjectionParams::named("StereographicProjection")
    };
    assert_roundtrip(
        &Projection::from_params(&stereo).unwrap(),
        &[(60.0, -105.0), (45.0, -150.0), (70.0, -30.0), (50.0, -80.0)],
    );
}

#[test]
fn test_secant_lambert_roundtrip() {
    let params = ProjectionParams {
        lambda0: Some(-97.5),
        phi0: Some(38.5),
        phi1: Some(33.0),
        phi2: Some(45.0),
        radius: Some(6371229.0),
        ..ProjectionParams::named("LambertConformalConicProjection")
    };
    let projection = Projection::from_params(&params).unwrap();
    assert_roundtrip(
        &projection,
        &[(38.5, -97.5), (21.1, -122.7), (47.8, -60.9), (30.0, -90.0)],
    );
}
