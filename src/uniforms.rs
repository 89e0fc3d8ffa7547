use cgmath::*;

/// The value of a single uniform.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum UniformValue {
    Float(f32),
    Vec2([f32; 2]),
    Vec3([f32; 3]),
    Vec4([f32; 4]),
    Mat4(Matrix4<f32>),
}

impl From<f32> for UniformValue {
    fn from(val: f32) -> Self {
        UniformValue::Float(val)
    }
}

impl From<[f32; 2]> for UniformValue {
    fn from(val: [f32; 2]) -> Self {
        UniformValue::Vec2(val)
    }
}

impl From<[f32; 3]> for UniformValue {
    fn from(val: [f32; 3]) -> Self {
        UniformValue::Vec3(val)
    }
}

impl From<[f32; 4]> for UniformValue {
    fn from(val: [f32; 4]) -> Self {
        UniformValue::Vec4(val)
    }
}

impl From<Vector3<f32>> for UniformValue {
    fn from(val: Vector3<f32>) -> Self {
        UniformValue::Vec3(val.into())
    }
}

impl From<Vector4<f32>> for UniformValue {
    fn from(val: Vector4<f32>) -> Self {
        UniformValue::Vec4(val.into())
    }
}

impl From<Matrix4<f32>> for UniformValue {
    fn from(val: Matrix4<f32>) -> Self {
        UniformValue::Mat4(val)
    }
}

/// Uniform bindings for one draw call, in insertion order.
///
/// ```
/// # use webgl_lessons::*;
/// # use cgmath::*;
/// let uniforms = Uniforms::new()
///     .with("uMVMatrix", Matrix4::from_translation(vec3(-1.5_f32, 0.0, -7.0)))
///     .with("uPMatrix", perspective(Deg(45.0_f32), 1.5, 0.1, 500.0));
/// assert!(uniforms.matrix("uPMatrix").is_some());
/// ```
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Uniforms {
    bindings: Vec<(String, UniformValue)>,
}

impl Uniforms {
    pub fn new() -> Self {
        Uniforms { bindings: vec![] }
    }

    /// Binds `name`, replacing any earlier value.
    pub fn set(&mut self, name: &str, value: impl Into<UniformValue>) {
        let value = value.into();
        match self.bindings.iter_mut().find(|(n, _)| n == name) {
            Some(binding) => binding.1 = value,
            None => self.bindings.push((name.to_string(), value)),
        }
    }

    pub fn with(mut self, name: &str, value: impl Into<UniformValue>) -> Self {
        self.set(name, value);
        self
    }

    pub fn get(&self, name: &str) -> Option<&UniformValue> {
        self.bindings.iter().find(|(n, _)| n == name).map(|(_, value)| value)
    }

    /// Returns the binding for `name` if it's a 4x4 matrix.
    pub fn matrix(&self, name: &str) -> Option<&Matrix4<f32>> {
        match self.get(name) {
            Some(UniformValue::Mat4(mat)) => Some(mat),
            _ => None,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &UniformValue)> {
        self.bindings.iter().map(|(name, value)| (name.as_str(), value))
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}
