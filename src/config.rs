//! Lesson configuration
//!
//! Every field has a default matching the classic lesson, so an empty JSON object (or no
//! configuration at all) reproduces it exactly.

use serde::*;

use crate::animation::*;
use crate::error::*;

/// Perspective projection parameters.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectionConfig {
    /// Vertical field of view in degrees
    pub fov: f32,
    /// Near clipping plane
    pub near: f32,
    /// Far clipping plane
    pub far: f32,
}

impl Default for ProjectionConfig {
    fn default() -> Self {
        Self { fov: 45.0, near: 0.1, far: 500.0 }
    }
}

/// Configuration of the movement lesson
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LessonConfig {
    /// Colour the frame is cleared to, RGBA
    pub clear_color: [f32; 4],
    /// Depth the frame is cleared to
    pub clear_depth: f32,
    pub projection: ProjectionConfig,
    pub triangle: Animation,
    pub square: Animation,
}

impl Default for LessonConfig {
    fn default() -> Self {
        Self {
            clear_color: [0.0, 0.0, 0.0, 1.0],
            clear_depth: 1.0,
            projection: ProjectionConfig::default(),
            triangle: Animation::new([-1.5, 0.0, -7.0], Spin::new(Axis::Y, 0.01)),
            square: Animation::new([1.5, 0.0, -7.0], Spin::new(Axis::X, 0.1)),
        }
    }
}

impl LessonConfig {
    /// Parses and validates a JSON configuration. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, Error> {
        let config: LessonConfig =
            serde_json::from_str(json).map_err(|err| Error::Config(err.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String, Error> {
        serde_json::to_string_pretty(self).map_err(|err| Error::Config(err.to_string()))
    }

    pub fn validate(&self) -> Result<(), Error> {
        check_finite("clear_color", &self.clear_color)?;
        check_finite("clear_depth", &[self.clear_depth])?;
        check_finite("projection", &[self.projection.fov, self.projection.near, self.projection.far])?;
        check_finite("triangle", &self.triangle.position)?;
        check_finite("triangle", &[self.triangle.spin.rate])?;
        check_finite("square", &self.square.position)?;
        check_finite("square", &[self.square.spin.rate])?;

        let projection = &self.projection;
        if projection.fov <= 0.0 || projection.fov >= 180.0 {
            return Err(Error::Config(format!(
                "field of view must be between 0 and 180 degrees, got {}",
                projection.fov
            )));
        }
        if projection.near <= 0.0 {
            return Err(Error::Config(format!("near plane must be positive, got {}", projection.near)));
        }
        if projection.far <= projection.near {
            return Err(Error::Config(format!(
                "far plane ({}) must be beyond the near plane ({})",
                projection.far, projection.near
            )));
        }
        Ok(())
    }
}

fn check_finite(name: &str, values: &[f32]) -> Result<(), Error> {
    if values.iter().all(|v| v.is_finite()) {
        Ok(())
    } else {
        Err(Error::Config(format!("{} must be finite", name)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_json_is_the_default() {
        assert_eq!(LessonConfig::from_json("{}").unwrap(), LessonConfig::default());
    }

    #[test]
    fn test_partial_override() {
        let config = LessonConfig::from_json(
            r#"{
                "clear_color": [0.1, 0.2, 0.3, 1.0],
                "projection": { "fov": 60.0 },
                "square": { "position": [0.0, 0.0, -5.0], "spin": { "axis": "Z", "rate": 0.2 } }
            }"#,
        )
        .unwrap();
        assert_eq!(config.clear_color, [0.1, 0.2, 0.3, 1.0]);
        assert_eq!(config.projection, ProjectionConfig { fov: 60.0, ..ProjectionConfig::default() });
        assert_eq!(config.square.spin, Spin::new(Axis::Z, 0.2));
        assert!(!config.square.wrap_angles);
        assert_eq!(config.triangle, LessonConfig::default().triangle);
    }

    #[test]
    fn test_round_trip() {
        let mut config = LessonConfig::default();
        config.square.wrap_angles = true;
        let json = config.to_json().unwrap();
        assert_eq!(LessonConfig::from_json(&json).unwrap(), config);
    }

    #[test]
    fn test_invalid_projection_rejected() {
        for json in [
            r#"{ "projection": { "fov": 0.0 } }"#,
            r#"{ "projection": { "fov": 180.0 } }"#,
            r#"{ "projection": { "near": 0.0 } }"#,
            r#"{ "projection": { "near": 10.0, "far": 10.0 } }"#,
        ]
        .iter()
        {
            assert!(matches!(LessonConfig::from_json(json), Err(Error::Config(_))), "{}", json);
        }
    }

    #[test]
    fn test_malformed_json_rejected() {
        assert!(matches!(LessonConfig::from_json("{ \"clear_depth\": "), Err(Error::Config(_))));
        assert!(matches!(
            LessonConfig::from_json(r#"{ "triangle": { "spin": { "axis": "W", "rate": 1.0 } } }"#),
            Err(Error::Config(_))
        ));
    }

    #[test]
    fn test_non_finite_values_rejected() {
        let mut config = LessonConfig::default();
        config.triangle.spin.rate = f32::NAN;
        assert!(matches!(config.validate(), Err(Error::Config(_))));
    }
}
