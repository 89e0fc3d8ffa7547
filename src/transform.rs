use cgmath::*;

use crate::error::*;

/// Position, per-axis rotation (radians) and scale of a drawable, plus the model matrix
/// derived from them.
///
/// The matrix is only recomputed by `update_matrix`. Setting a component without calling it
/// leaves the old matrix in place.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Transform {
    position: Vector3<f32>,
    rotation: Vector3<f32>,
    scale: Vector3<f32>,
    matrix: Matrix4<f32>,
}

impl Default for Transform {
    fn default() -> Self {
        Transform {
            position: Vector3::zero(),
            rotation: Vector3::zero(),
            scale: vec3(1.0, 1.0, 1.0),
            matrix: Matrix4::identity(),
        }
    }
}

fn check_finite(field: &'static str, value: [f32; 3]) -> Result<Vector3<f32>, Error> {
    if value.iter().all(|v| v.is_finite()) {
        Ok(value.into())
    } else {
        Err(Error::InvalidTransform { field, value })
    }
}

impl Transform {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_position(&mut self, position: [f32; 3]) -> Result<&mut Self, Error> {
        self.position = check_finite("position", position)?;
        Ok(self)
    }

    pub fn set_rotation(&mut self, rotation: [f32; 3]) -> Result<&mut Self, Error> {
        self.rotation = check_finite("rotation", rotation)?;
        Ok(self)
    }

    pub fn set_scale(&mut self, scale: [f32; 3]) -> Result<&mut Self, Error> {
        self.scale = check_finite("scale", scale)?;
        Ok(self)
    }

    /// Recomputes the model matrix as `T * Rx * Ry * Rz * S`: vertices are scaled, rotated
    /// about Z, Y and then X, and finally translated.
    pub fn update_matrix(&mut self) -> &mut Self {
        self.matrix = Matrix4::from_translation(self.position)
            * Matrix4::from_angle_x(Rad(self.rotation.x))
            * Matrix4::from_angle_y(Rad(self.rotation.y))
            * Matrix4::from_angle_z(Rad(self.rotation.z))
            * Matrix4::from_nonuniform_scale(self.scale.x, self.scale.y, self.scale.z);
        self
    }

    pub fn position(&self) -> Vector3<f32> {
        self.position
    }

    pub fn rotation(&self) -> Vector3<f32> {
        self.rotation
    }

    pub fn scale(&self) -> Vector3<f32> {
        self.scale
    }

    /// The model matrix as of the last `update_matrix` call.
    pub fn matrix(&self) -> Matrix4<f32> {
        self.matrix
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f32 = 1e-6;

    fn approx_eq(a: f32, b: f32) -> bool {
        (a - b).abs() < EPSILON
    }

    fn mat_approx_eq(a: &Matrix4<f32>, b: &Matrix4<f32>) -> bool {
        let a: &[f32; 16] = a.as_ref();
        let b: &[f32; 16] = b.as_ref();
        a.iter().zip(b.iter()).all(|(x, y)| approx_eq(*x, *y))
    }

    // Row-major products written out by hand, transposed into cgmath's column-major layout.
    #[rustfmt::skip]
    fn expected_matrix(position: [f32; 3], rotation: [f32; 3]) -> Matrix4<f32> {
        let (sx, cx) = rotation[0].sin_cos();
        let (sy, cy) = rotation[1].sin_cos();
        let (sz, cz) = rotation[2].sin_cos();
        let rx = [[1.0, 0.0, 0.0], [0.0, cx, -sx], [0.0, sx, cx]];
        let ry = [[cy, 0.0, sy], [0.0, 1.0, 0.0], [-sy, 0.0, cy]];
        let rz = [[cz, -sz, 0.0], [sz, cz, 0.0], [0.0, 0.0, 1.0]];

        let mul = |a: [[f32; 3]; 3], b: [[f32; 3]; 3]| {
            let mut out = [[0.0_f32; 3]; 3];
            for i in 0..3 {
                for j in 0..3 {
                    out[i][j] = (0..3).map(|k| a[i][k] * b[k][j]).sum();
                }
            }
            out
        };
        let r = mul(mul(rx, ry), rz);

        Matrix4::new(
            r[0][0], r[1][0], r[2][0], 0.0,
            r[0][1], r[1][1], r[2][1], 0.0,
            r[0][2], r[1][2], r[2][2], 0.0,
            position[0], position[1], position[2], 1.0,
        )
    }

    #[test]
    fn test_matrix_matches_independent_composition() {
        let cases = [
            ([0.0, 0.0, 0.0], [0.0, 0.0, 0.0]),
            ([-1.5, 0.0, -7.0], [0.0, 0.3, 0.0]),
            ([1.5, 0.0, -7.0], [10.0, 0.0, 0.0]),
            ([2.0, -3.0, 4.5], [0.4, -1.2, 2.5]),
        ];
        for (position, rotation) in cases.iter() {
            let mut transform = Transform::new();
            transform.set_position(*position).unwrap().set_rotation(*rotation).unwrap();
            transform.update_matrix();
            let expected = expected_matrix(*position, *rotation);
            assert!(
                mat_approx_eq(&transform.matrix(), &expected),
                "position {:?} rotation {:?}: got {:?}, expected {:?}",
                position,
                rotation,
                transform.matrix(),
                expected
            );
        }
    }

    #[test]
    fn test_translation_column() {
        let mut transform = Transform::new();
        transform.set_position([-1.5, 0.0, -7.0]).unwrap();
        transform.update_matrix();
        let column = transform.matrix().w;
        assert!(approx_eq(column.x, -1.5));
        assert!(approx_eq(column.y, 0.0));
        assert!(approx_eq(column.z, -7.0));
        assert!(approx_eq(column.w, 1.0));
    }

    #[test]
    fn test_rotation_applied_before_translation() {
        let mut transform = Transform::new();
        transform
            .set_position([10.0, 0.0, 0.0])
            .unwrap()
            .set_rotation([0.0, 0.0, std::f32::consts::FRAC_PI_2])
            .unwrap()
            .set_scale([2.0, 2.0, 2.0])
            .unwrap()
            .update_matrix();
        let p = transform.matrix() * vec4(1.0, 0.0, 0.0, 1.0);
        assert!(approx_eq(p.x, 10.0), "got {:?}", p);
        assert!(approx_eq(p.y, 2.0), "got {:?}", p);
    }

    #[test]
    fn test_matrix_is_stale_until_updated() {
        let mut transform = Transform::new();
        transform.set_position([1.0, 2.0, 3.0]).unwrap();
        assert_eq!(transform.matrix(), Matrix4::identity());
        transform.update_matrix();
        assert_eq!(transform.matrix().w, vec4(1.0, 2.0, 3.0, 1.0));
    }

    #[test]
    fn test_non_finite_input_is_rejected() {
        let mut transform = Transform::new();
        transform.set_position([1.0, 1.0, 1.0]).unwrap();

        let err = transform.set_position([f32::NAN, 0.0, 0.0]).unwrap_err();
        assert!(matches!(err, Error::InvalidTransform { field: "position", .. }));
        assert!(matches!(
            transform.set_rotation([0.0, f32::INFINITY, 0.0]),
            Err(Error::InvalidTransform { field: "rotation", .. })
        ));
        assert!(transform.set_scale([0.0, 0.0, f32::NEG_INFINITY]).is_err());
        assert_eq!(transform.position(), vec3(1.0, 1.0, 1.0));
        assert_eq!(transform.rotation(), Vector3::zero());
        assert_eq!(transform.scale(), vec3(1.0, 1.0, 1.0));
    }
}
