//! Camera pose capture and replay for mesh renders.
//!
//! A figure series keeps its views consistent by framing the camera once
//! and replaying the same [`CameraPose`] for every render. The pose is a
//! plain value (position, focal point, view-up), so capture/replay is
//! passing it to the next render call unchanged.

use nalgebra::{Point3, Unit, Vector3};

use crate::error::{Result, TufteError};

/// Projection mode for a render.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Projection {
    /// Perspective projection for 3D views
    Perspective,
    /// Parallel (orthographic) projection for 2D section views
    Parallel,
}

/// Coordinate axes, used for axis-aligned section views.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    fn direction(&self) -> Vector3<f64> {
        match self {
            Axis::X => Vector3::x(),
            Axis::Y => Vector3::y(),
            Axis::Z => Vector3::z(),
        }
    }
}

/// A camera position, focal point, and view-up vector.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraPose {
    pub position: Point3<f64>,
    pub focal_point: Point3<f64>,
    pub view_up: Vector3<f64>,
}

/// Distance factor between the scene radius and the fitted camera.
const FIT_DISTANCE_FACTOR: f64 = 2.5;

impl CameraPose {
    pub fn new(position: Point3<f64>, focal_point: Point3<f64>, view_up: Vector3<f64>) -> Self {
        Self {
            position,
            focal_point,
            view_up,
        }
    }

    /// Frame a bounding box, looking along `direction` toward its center.
    ///
    /// The camera sits at a fixed multiple of the scene radius so the
    /// whole box is visible under the default field of view.
    pub fn fit(
        bounds: (Point3<f64>, Point3<f64>),
        direction: Vector3<f64>,
    ) -> Result<Self> {
        let direction = Unit::try_new(direction, 1e-12).ok_or_else(|| TufteError::Mesh {
            message: "view direction must be non-zero".to_string(),
        })?;

        let (min, max) = bounds;
        let center = Point3::from((min.coords + max.coords) / 2.0);
        let radius = ((max - min).norm() / 2.0).max(1e-9);
        let position = center - direction.into_inner() * radius * FIT_DISTANCE_FACTOR;

        Ok(Self {
            position,
            focal_point: center,
            view_up: stable_up(&direction),
        })
    }

    /// Axis-aligned view of a bounding box, looking down `axis`.
    ///
    /// `Axis::Y` gives the xz section view used for slice figures.
    pub fn along_axis(axis: Axis, bounds: (Point3<f64>, Point3<f64>)) -> Self {
        // The direction is never zero here, so fit cannot fail
        Self::fit(bounds, -axis.direction()).expect("axis directions are non-zero")
    }

    /// Unit vector from the camera toward the focal point.
    pub fn view_direction(&self) -> Result<Vector3<f64>> {
        Unit::try_new(self.focal_point - self.position, 1e-12)
            .map(Unit::into_inner)
            .ok_or_else(|| TufteError::Mesh {
                message: "camera position and focal point coincide".to_string(),
            })
    }

    /// Distance from the camera to the focal point.
    pub fn distance(&self) -> f64 {
        (self.focal_point - self.position).norm()
    }
}

/// Pick a view-up vector that is not parallel to the view direction.
fn stable_up(direction: &Unit<Vector3<f64>>) -> Vector3<f64> {
    if direction.dot(&Vector3::z()).abs() > 0.99 {
        Vector3::y()
    } else {
        Vector3::z()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn unit_bounds() -> (Point3<f64>, Point3<f64>) {
        (Point3::new(-1.0, -1.0, -1.0), Point3::new(1.0, 1.0, 1.0))
    }

    #[test]
    fn test_fit_looks_at_center() {
        let pose = CameraPose::fit(unit_bounds(), Vector3::new(-1.0, -1.0, -1.0)).unwrap();
        assert_relative_eq!(pose.focal_point.x, 0.0);
        assert_relative_eq!(pose.focal_point.y, 0.0);
        assert_relative_eq!(pose.focal_point.z, 0.0);

        let radius = 3.0f64.sqrt();
        assert_relative_eq!(pose.distance(), radius * 2.5, epsilon = 1e-9);
    }

    #[test]
    fn test_fit_rejects_zero_direction() {
        assert!(CameraPose::fit(unit_bounds(), Vector3::zeros()).is_err());
    }

    #[test]
    fn test_along_axis_section_view() {
        let pose = CameraPose::along_axis(Axis::Y, unit_bounds());
        // Looking along -y from the +y side
        assert!(pose.position.y > 1.0);
        let dir = pose.view_direction().unwrap();
        assert_relative_eq!(dir.y, -1.0, epsilon = 1e-12);
        // Up stays out of the view direction
        assert_relative_eq!(pose.view_up.dot(&dir), 0.0, epsilon = 1e-12);
    }

    #[test]
    fn test_up_flips_for_vertical_views() {
        let pose = CameraPose::along_axis(Axis::Z, unit_bounds());
        assert_relative_eq!(pose.view_up.y, 1.0);
    }

    #[test]
    fn test_pose_replays_verbatim() {
        // Capture once, replay twice: the value does not drift
        let pose = CameraPose::fit(unit_bounds(), Vector3::x()).unwrap();
        let replayed = pose;
        assert_eq!(pose, replayed);
    }
}
