//! Common test fixtures for the weather tile tests.
//!
//! Grid descriptors are kept as JSON in the domain metadata shape so that
//! every test also exercises descriptor parsing.

/// Grid descriptor JSON for real and synthetic domains.
pub mod descriptors {
    /// Small regular grid: 10 x 3 cells from (50N, 10E), 1 x 2 degrees.
    pub const REGULAR_10X3: &str =
        r#"{"type":"regular","nx":10,"ny":3,"lonMin":10,"latMin":50,"dx":1,"dy":2}"#;

    /// Global 0.25 degree regular grid (GFS/ICON-like).
    pub const REGULAR_GLOBAL_025: &str =
        r#"{"type":"regular","nx":1440,"ny":721,"lonMin":-180,"latMin":-90,"dx":0.25,"dy":0.25}"#;

    /// Regular grid around central Europe, 1 degree cells.
    pub const REGULAR_EUROPE_1DEG: &str =
        r#"{"type":"regular","nx":40,"ny":30,"lonMin":-10,"latMin":35,"dx":1,"dy":1}"#;

    /// 10 x 10 Lambert conformal grid of 10 km cells anchored at (50N, 10E).
    pub const LCC_10X10: &str = r#"{
        "type": "projectedFromGeographicOrigin",
        "nx": 10, "ny": 10,
        "latitude": 50, "longitude": 10,
        "dx": 10000, "dy": 10000,
        "projection": {
            "name": "LambertConformalConicProjection",
            "λ0": 10, "ϕ0": 50, "ϕ1": 50, "ϕ2": 50, "radius": 6371229
        }
    }"#;

    /// DMI HARMONIE Europe (Lambert conformal, 2 km).
    pub const DMI_HARMONIE: &str = r#"{
        "type": "projectedFromGeographicOrigin",
        "nx": 1906, "ny": 1606,
        "latitude": 39.671, "longitude": -25.421997,
        "dx": 2000, "dy": 2000,
        "zoom": 4,
        "projection": {
            "name": "LambertConformalConicProjection",
            "λ0": 352, "ϕ0": 55.5, "ϕ1": 55.5, "ϕ2": 55.5, "radius": 6371229
        }
    }"#;

    /// KNMI HARMONIE Europe (rotated pole, bounds given geographically).
    pub const KNMI_HARMONIE: &str = r#"{
        "type": "projectedFromBounds",
        "nx": 676, "ny": 564,
        "latitudeBounds": [39.740627, 62.619324],
        "longitudeBounds": [-25.162262, 38.75702],
        "zoom": 3.5,
        "projection": {"name": "RotatedLatLonProjection", "rotatedLat": -35, "rotatedLon": -8}
    }"#;

    /// Polar stereographic grid with a pre-projected origin.
    pub const POLAR_STEREOGRAPHIC: &str = r#"{
        "type": "projectedFromProjectedOrigin",
        "nx": 100, "ny": 100,
        "dx": 20000, "dy": 20000,
        "projectedLatitudeOrigin": -1000000,
        "projectedLongitudeOrigin": -1000000,
        "projection": {"name": "StereographicProjection", "latitude": 90, "longitude": 0}
    }"#;

    /// Small octahedral reduced Gaussian grid (O16).
    pub const GAUSSIAN_O16: &str = r#"{"type":"gaussian","gaussianGridLatitudeLines":16}"#;

    /// ECMWF IFS HRES (O1280).
    pub const GAUSSIAN_O1280: &str =
        r#"{"type":"gaussian","nx":6599680,"ny":1,"gaussianGridLatitudeLines":1280}"#;
}

/// Common `(south, west, north, east)` bboxes for covering-range tests.
pub mod bbox {
    /// Central Europe
    pub const CENTRAL_EUROPE: (f64, f64, f64, f64) = (45.0, 5.0, 55.0, 15.0);

    /// A small box around (50N, 10E)
    pub const AROUND_50N_10E: (f64, f64, f64, f64) = (49.9, 9.9, 50.1, 10.1);
}

/// Tile addresses used across renderer tests, as `(z, x, y)`.
pub mod tiles {
    /// Zoom 5 tile over Germany.
    pub const GERMANY_Z5: (u32, u32, u32) = (5, 16, 10);
}
