use cgmath::*;
use log::*;

use crate::device::*;
use crate::error::*;
use crate::geometry::*;
use crate::transform::Transform;
use crate::uniforms::*;

/// Default name of the model matrix uniform.
pub const MODEL_MATRIX_UNIFORM: &str = "uMVMatrix";
/// Default name of the projection matrix uniform.
pub const PROJECTION_MATRIX_UNIFORM: &str = "uPMatrix";

/// A geometry uploaded to the runtime, paired with a program and a transform.
pub struct Drawable<D: Device> {
    name: String,
    geometry: Geometry,
    buffers: Vec<VertexBuffer<D::Buffer>>,
    program: D::Program,
    transform: Transform,
    model_uniform: String,
    projection_uniform: String,
}

impl<D: Device> Drawable<D> {
    /// Uploads every attribute of `geometry` and creates a drawable at the origin.
    pub fn new(device: &D, name: &str, geometry: Geometry, program: &D::Program) -> Result<Self, Error> {
        let buffers = geometry
            .attributes()
            .iter()
            .map(|attr| {
                let buffer = device.upload_buffer(attr.name(), attr.components(), attr.data())?;
                Ok(VertexBuffer {
                    name: attr.name().to_string(),
                    components: attr.components(),
                    buffer,
                })
            })
            .collect::<Result<Vec<_>, Error>>()?;
        debug!("Created drawable `{}` with {} vertices", name, geometry.vertex_count());

        Ok(Drawable {
            name: name.to_string(),
            geometry,
            buffers,
            program: program.clone(),
            transform: Transform::new(),
            model_uniform: MODEL_MATRIX_UNIFORM.to_string(),
            projection_uniform: PROJECTION_MATRIX_UNIFORM.to_string(),
        })
    }

    /// Changes the uniform names that `render` requires to be bound to matrices.
    pub fn with_matrix_uniforms(mut self, model: &str, projection: &str) -> Self {
        self.model_uniform = model.to_string();
        self.projection_uniform = projection.to_string();
        self
    }

    pub fn set_position(&mut self, position: [f32; 3]) -> Result<&mut Self, Error> {
        self.transform.set_position(position)?;
        Ok(self)
    }

    pub fn set_rotation(&mut self, rotation: [f32; 3]) -> Result<&mut Self, Error> {
        self.transform.set_rotation(rotation)?;
        Ok(self)
    }

    pub fn set_scale(&mut self, scale: [f32; 3]) -> Result<&mut Self, Error> {
        self.transform.set_scale(scale)?;
        Ok(self)
    }

    pub fn update_matrix(&mut self) -> &mut Self {
        self.transform.update_matrix();
        self
    }

    /// Draws the drawable with the given uniforms. The uniforms must bind the model and
    /// projection matrices; the model matrix is *not* taken from the transform implicitly.
    pub fn render(&self, device: &D, uniforms: &Uniforms) -> Result<(), Error> {
        for required in [&self.model_uniform, &self.projection_uniform].iter() {
            if uniforms.matrix(required).is_none() {
                return Err(Error::render(
                    &self.name,
                    format!("uniform `{}` is not bound to a 4x4 matrix", required),
                ));
            }
        }

        trace!("Drawing `{}`", self.name);
        device.draw(&DrawCall {
            label: &self.name,
            program: &self.program,
            attributes: &self.buffers,
            uniforms,
            mode: self.geometry.draw_mode(),
            vertex_count: self.geometry.vertex_count() as u32,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn geometry(&self) -> &Geometry {
        &self.geometry
    }

    pub fn program(&self) -> &D::Program {
        &self.program
    }

    pub fn transform(&self) -> &Transform {
        &self.transform
    }

    /// The model matrix as of the last `update_matrix` call.
    pub fn matrix(&self) -> Matrix4<f32> {
        self.transform.matrix()
    }

    pub fn model_uniform(&self) -> &str {
        &self.model_uniform
    }

    pub fn projection_uniform(&self) -> &str {
        &self.projection_uniform
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::headless::*;

    fn triangle(device: &HeadlessDevice) -> Drawable<HeadlessDevice> {
        let program = device.compile_program("void main() {}", "void main() {}").unwrap();
        let geometry = Geometry::new(
            DrawMode::Triangles,
            vec![
                Attribute::from_vertices("positions", &[[0.0_f32, 1.0, 0.0], [-1.0, -1.0, 0.0], [1.0, -1.0, 0.0]]),
                Attribute::from_vertices("colors", &[[1.0_f32, 0.0, 0.0, 1.0]; 3]),
            ],
        )
        .unwrap();
        Drawable::new(device, "triangle", geometry, &program).unwrap()
    }

    fn matrices(drawable: &Drawable<HeadlessDevice>) -> Uniforms {
        Uniforms::new()
            .with(MODEL_MATRIX_UNIFORM, drawable.matrix())
            .with(PROJECTION_MATRIX_UNIFORM, Matrix4::<f32>::identity())
    }

    #[test]
    fn test_new_uploads_every_attribute() {
        let device = HeadlessDevice::new();
        let drawable = triangle(&device);
        let uploads: Vec<_> = device
            .calls()
            .into_iter()
            .filter_map(|call| match call {
                DeviceCall::UploadBuffer { name, components, len } => Some((name, components, len)),
                _ => None,
            })
            .collect();
        assert_eq!(uploads, vec![("positions".to_string(), 3, 9), ("colors".to_string(), 4, 12)]);
        assert_eq!(drawable.geometry().vertex_count(), 3);
    }

    #[test]
    fn test_chained_render_issues_one_draw() {
        let device = HeadlessDevice::new();
        let mut drawable = triangle(&device);
        drawable.set_position([-1.5, 0.0, -7.0]).unwrap().set_rotation([0.0, 0.5, 0.0]).unwrap();
        let uniforms = matrices(drawable.update_matrix());
        drawable.render(&device, &uniforms).unwrap();

        let draws = device.draws();
        assert_eq!(draws.len(), 1);
        assert_eq!(draws[0].label, "triangle");
        assert_eq!(draws[0].mode, DrawMode::Triangles);
        assert_eq!(draws[0].vertex_count, 3);
        assert_eq!(draws[0].attributes, vec!["positions".to_string(), "colors".to_string()]);
        assert_eq!(draws[0].uniforms.matrix(MODEL_MATRIX_UNIFORM), Some(&drawable.matrix()));
    }

    #[test]
    fn test_missing_matrix_is_a_render_error() {
        let device = HeadlessDevice::new();
        let drawable = triangle(&device);
        let uniforms = Uniforms::new().with(MODEL_MATRIX_UNIFORM, drawable.matrix());
        let err = drawable.render(&device, &uniforms).unwrap_err();
        assert!(matches!(err, Error::Render { ref drawable, .. } if drawable == "triangle"));
        assert!(device.draws().is_empty());
    }

    #[test]
    fn test_custom_matrix_uniform_names() {
        let device = HeadlessDevice::new();
        let drawable = triangle(&device).with_matrix_uniforms("model", "projection");
        assert!(drawable.render(&device, &matrices(&drawable)).is_err());

        let uniforms = Uniforms::new()
            .with("model", drawable.matrix())
            .with("projection", Matrix4::<f32>::identity());
        drawable.render(&device, &uniforms).unwrap();
        assert_eq!(device.draws().len(), 1);
    }

    #[test]
    fn test_runtime_draw_failure_propagates() {
        let device = HeadlessDevice::new();
        let drawable = triangle(&device);
        device.fail_draws_of("triangle");
        let err = drawable.render(&device, &matrices(&drawable)).unwrap_err();
        assert_eq!(err, Error::render("triangle", "injected draw failure"));
    }

    #[test]
    fn test_invalid_transform_keeps_previous_value() {
        let device = HeadlessDevice::new();
        let mut drawable = triangle(&device);
        drawable.set_position([1.0, 2.0, 3.0]).unwrap();
        assert!(drawable.set_position([f32::NAN, 0.0, 0.0]).is_err());
        assert_eq!(drawable.transform().position(), vec3(1.0, 2.0, 3.0));
    }
}
