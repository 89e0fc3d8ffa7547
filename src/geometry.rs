use cgmath::*;
use serde::*;
use std::collections::HashSet;

use crate::error::*;

/// How the vertices of a geometry are assembled into primitives.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub enum DrawMode {
    Points,
    Lines,
    LineLoop,
    LineStrip,
    Triangles,
    TriangleStrip,
    TriangleFan,
}

impl Default for DrawMode {
    fn default() -> Self {
        DrawMode::Triangles
    }
}

/// A single named vertex attribute: a flat buffer of `f32`s, `components` per vertex.
#[derive(Clone, Debug, PartialEq)]
pub struct Attribute {
    name: String,
    components: u32,
    data: Vec<f32>,
}

impl Attribute {
    /// Creates an attribute from a flat buffer. The layout is checked when the attribute is
    /// added to a `Geometry`.
    pub fn new(name: &str, components: u32, data: Vec<f32>) -> Self {
        Attribute { name: name.to_string(), components, data }
    }

    /// Creates an attribute from typed vertices, taking the component count from the vertex type.
    ///
    /// ```
    /// # use webgl_lessons::Attribute;
    /// let positions = Attribute::from_vertices("positions", &[[0.0_f32, 1.0, 0.0], [-1.0, -1.0, 0.0]]);
    /// assert_eq!(positions.components(), 3);
    /// ```
    pub fn from_vertices<V: VertexComponent>(name: &str, vertices: &[V]) -> Self {
        let mut data = Vec::with_capacity(vertices.len() * V::COMPONENTS as usize);
        for vert in vertices {
            vert.add_to_attribute(&mut |value| data.push(value));
        }
        Attribute::new(name, V::COMPONENTS, data)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn components(&self) -> u32 {
        self.components
    }

    pub fn data(&self) -> &[f32] {
        &self.data
    }

    /// The number of vertices in this attribute, rounded down.
    pub fn vertex_count(&self) -> usize {
        if self.components == 0 {
            0
        } else {
            self.data.len() / self.components as usize
        }
    }

    fn check_layout(&self) -> Result<usize, Error> {
        if self.components == 0 || self.components > 4 {
            return Err(Error::attribute(&self.name, AttributeFault::ComponentCount(self.components)));
        }
        if self.data.is_empty() {
            return Err(Error::attribute(&self.name, AttributeFault::Empty));
        }
        if self.data.len() % self.components as usize != 0 {
            return Err(Error::attribute(
                &self.name,
                AttributeFault::Misaligned { len: self.data.len(), components: self.components },
            ));
        }
        Ok(self.vertex_count())
    }
}

/// An immutable description of a mesh: its draw mode and its vertex attributes.
///
/// Every attribute describes the same number of vertices; this is checked once in
/// `Geometry::new` and can't change afterwards.
#[derive(Clone, Debug, PartialEq)]
pub struct Geometry {
    draw_mode: DrawMode,
    attributes: Vec<Attribute>,
    vertex_count: usize,
}

impl Geometry {
    pub fn new(draw_mode: DrawMode, attributes: Vec<Attribute>) -> Result<Self, Error> {
        let first = attributes
            .first()
            .ok_or_else(|| Error::attribute("", AttributeFault::NoAttributes))?;
        let vertex_count = first.check_layout()?;

        let mut names = HashSet::new();
        for attr in &attributes {
            let found = attr.check_layout()?;
            if found != vertex_count {
                return Err(Error::attribute(
                    &attr.name,
                    AttributeFault::VertexCountMismatch { expected: vertex_count, found },
                ));
            }
            if !names.insert(attr.name.as_str()) {
                return Err(Error::attribute(&attr.name, AttributeFault::Duplicate));
            }
        }

        Ok(Geometry { draw_mode, attributes, vertex_count })
    }

    pub fn draw_mode(&self) -> DrawMode {
        self.draw_mode
    }

    pub fn vertex_count(&self) -> usize {
        self.vertex_count
    }

    pub fn attributes(&self) -> &[Attribute] {
        &self.attributes
    }

    pub fn attribute(&self, name: &str) -> Option<&Attribute> {
        self.attributes.iter().find(|attr| attr.name == name)
    }
}

/// A value that can be written into a vertex attribute.
pub trait VertexComponent {
    /// The number of `f32`s written per vertex.
    const COMPONENTS: u32;

    /// Calls the closure once for each `f32` component, in order.
    fn add_to_attribute(&self, f: &mut dyn FnMut(f32));
}

impl VertexComponent for f32 {
    const COMPONENTS: u32 = 1;

    fn add_to_attribute(&self, f: &mut dyn FnMut(f32)) {
        f(*self);
    }
}

impl VertexComponent for Vector2<f32> {
    const COMPONENTS: u32 = 2;

    fn add_to_attribute(&self, f: &mut dyn FnMut(f32)) {
        f(self.x);
        f(self.y);
    }
}

impl VertexComponent for Vector3<f32> {
    const COMPONENTS: u32 = 3;

    fn add_to_attribute(&self, f: &mut dyn FnMut(f32)) {
        f(self.x);
        f(self.y);
        f(self.z);
    }
}

impl VertexComponent for Vector4<f32> {
    const COMPONENTS: u32 = 4;

    fn add_to_attribute(&self, f: &mut dyn FnMut(f32)) {
        f(self.x);
        f(self.y);
        f(self.z);
        f(self.w);
    }
}

impl VertexComponent for Point3<f32> {
    const COMPONENTS: u32 = 3;

    fn add_to_attribute(&self, f: &mut dyn FnMut(f32)) {
        f(self.x);
        f(self.y);
        f(self.z);
    }
}

impl VertexComponent for [f32; 2] {
    const COMPONENTS: u32 = 2;

    fn add_to_attribute(&self, f: &mut dyn FnMut(f32)) {
        f(self[0]);
        f(self[1]);
    }
}

impl VertexComponent for [f32; 3] {
    const COMPONENTS: u32 = 3;

    fn add_to_attribute(&self, f: &mut dyn FnMut(f32)) {
        f(self[0]);
        f(self[1]);
        f(self[2]);
    }
}

impl VertexComponent for [f32; 4] {
    const COMPONENTS: u32 = 4;

    fn add_to_attribute(&self, f: &mut dyn FnMut(f32)) {
        f(self[0]);
        f(self[1]);
        f(self[2]);
        f(self[3]);
    }
}
