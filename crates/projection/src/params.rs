//! Projection parameter record as it appears in domain metadata.

use crate::error::{ProjectionError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Loosely typed projection parameters.
///
/// The set of fields that must be present depends on `name`; the typed
/// projection constructors check for them and report the first one missing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectionParams {
    /// Projection tag, e.g. `LambertConformalConicProjection`.
    pub name: String,

    /// Reference (central) longitude in degrees.
    #[serde(rename = "λ0", default, skip_serializing_if = "Option::is_none")]
    pub lambda0: Option<f64>,

    /// Reference latitude in degrees.
    #[serde(rename = "ϕ0", default, skip_serializing_if = "Option::is_none")]
    pub phi0: Option<f64>,

    /// First standard parallel (or center latitude) in degrees.
    #[serde(rename = "ϕ1", default, skip_serializing_if = "Option::is_none")]
    pub phi1: Option<f64>,

    /// Second standard parallel in degrees.
    #[serde(rename = "ϕ2", default, skip_serializing_if = "Option::is_none")]
    pub phi2: Option<f64>,

    /// Sphere radius.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub radius: Option<f64>,

    /// Center latitude (stereographic).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub latitude: Option<f64>,

    /// Center longitude (stereographic).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub longitude: Option<f64>,

    /// Latitude offset of the rotated pole.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rotated_lat: Option<f64>,

    /// Longitude offset of the rotated pole.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rotated_lon: Option<f64>,

    /// `[rotatedLat, rotatedLon]` in a single pair.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rotation: Option<[f64; 2]>,
}

impl ProjectionParams {
    /// Empty parameter record for the given projection name.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// The rotation pair, preferring `rotation` over the split fields.
    pub fn rotation_pair(&self) -> Option<[f64; 2]> {
        self.rotation
            .or_else(|| Some([self.rotated_lat?, self.rotated_lon?]))
    }
}

/// Unwrap an optional parameter or report it as missing.
pub(crate) fn require(
    value: Option<f64>,
    projection: &'static str,
    parameter: &'static str,
) -> Result<f64> {
    value.ok_or(ProjectionError::missing(projection, parameter))
}

/// The closed set of supported projections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProjectionKind {
    Mercator,
    RotatedLatLon,
    LambertConformalConic,
    LambertAzimuthalEqualArea,
    Stereographic,
}

impl ProjectionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProjectionKind::Mercator => "MercatorProjection",
            ProjectionKind::RotatedLatLon => "RotatedLatLonProjection",
            ProjectionKind::LambertConformalConic => "LambertConformalConicProjection",
            ProjectionKind::LambertAzimuthalEqualArea => "LambertAzimuthalEqualAreaProjection",
            ProjectionKind::Stereographic => "StereographicProjection",
        }
    }
}

impl FromStr for ProjectionKind {
    type Err = ProjectionError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "MercatorProjection" => Ok(ProjectionKind::Mercator),
            "RotatedLatLonProjection" => Ok(ProjectionKind::RotatedLatLon),
            "LambertConformalConicProjection" => Ok(ProjectionKind::LambertConformalConic),
            "LambertAzimuthalEqualAreaProjection" => {
                Ok(ProjectionKind::LambertAzimuthalEqualArea)
            }
            // Older domain metadata spells it without the 'h'.
            "StereographicProjection" | "StereograpicProjection" => {
                Ok(ProjectionKind::Stereographic)
            }
            other => Err(ProjectionError::UnknownProjection(other.to_string())),
        }
    }
}

impl fmt::Display for ProjectionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_roundtrip() {
        for kind in [
            ProjectionKind::Mercator,
            ProjectionKind::RotatedLatLon,
            ProjectionKind::LambertConformalConic,
            ProjectionKind::LambertAzimuthalEqualArea,
            ProjectionKind::Stereographic,
        ] {
            assert_eq!(kind.as_str().parse::<ProjectionKind>().unwrap(), kind);
        }
    }

    #[test]
    fn test_unknown_kind() {
        let err = "AlbersProjection".parse::<ProjectionKind>().unwrap_err();
        assert_eq!(err, ProjectionError::UnknownProjection("AlbersProjection".into()));
    }

    #[test]
    fn test_deserialize_greek_keys() {
        let json = r#"{"name":"LambertConformalConicProjection","λ0":352,"ϕ0":55.5,"ϕ1":55.5,"ϕ2":55.5,"radius":6371229}"#;
        let params: ProjectionParams = serde_json::from_str(json).unwrap();
        assert_eq!(params.lambda0, Some(352.0));
        assert_eq!(params.phi2, Some(55.5));
        assert_eq!(params.radius, Some(6371229.0));
        assert_eq!(params.latitude, None);
    }

    #[test]
    fn test_rotation_pair() {
        let json = r#"{"name":"RotatedLatLonProjection","rotatedLat":-35,"rotatedLon":-8}"#;
        let params: ProjectionParams = serde_json::from_str(json).unwrap();
        assert_eq!(params.rotation_pair(), Some([-35.0, -8.0]));

        let mut params = ProjectionParams::named("RotatedLatLonProjection");
        assert_eq!(params.rotation_pair(), None);
        params.rotation = Some([1.0, 2.0]);
        assert_eq!(params.rotation_pair(), Some([1.0, 2.0]));
    }
}
