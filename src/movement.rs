//! "A Bit of Movement": a triangle spinning about Y next to a square spinning about X.

use log::*;

use crate::config::*;
use crate::device::*;
use crate::drawable::*;
use crate::error::*;
use crate::geometry::*;
use crate::lesson::*;
use crate::scene::*;

pub const VERTEX_SHADER: &str = r#"
attribute vec3 positions;
attribute vec4 colors;

uniform mat4 uMVMatrix;
uniform mat4 uPMatrix;

varying vec4 vColor;

void main(void) {
  gl_Position = uPMatrix * uMVMatrix * vec4(positions, 1.0);
  vColor = colors;
}
"#;

pub const FRAGMENT_SHADER: &str = r#"
precision highp float;

varying vec4 vColor;

void main(void) {
  gl_FragColor = vColor;
}
"#;

const INFO: &str = "A Bit of Movement: a triangle and a square, each spinning about its own axis. \
                    Based on http://learningwebgl.com/blog/?p=239";

pub fn triangle_geometry() -> Result<Geometry, Error> {
    Geometry::new(
        DrawMode::Triangles,
        vec![
            Attribute::from_vertices(
                "positions",
                &[[0.0_f32, 1.0, 0.0], [-1.0, -1.0, 0.0], [1.0, -1.0, 0.0]],
            ),
            Attribute::from_vertices(
                "colors",
                &[[1.0_f32, 0.0, 0.0, 1.0], [0.0, 1.0, 0.0, 1.0], [0.0, 0.0, 1.0, 1.0]],
            ),
        ],
    )
}

pub fn square_geometry() -> Result<Geometry, Error> {
    Geometry::new(
        DrawMode::TriangleStrip,
        vec![
            Attribute::from_vertices(
                "positions",
                &[[1.0_f32, 1.0, 0.0], [-1.0, 1.0, 0.0], [1.0, -1.0, 0.0], [-1.0, -1.0, 0.0]],
            ),
            Attribute::from_vertices("colors", &[[0.5_f32, 0.5, 1.0, 1.0]; 4]),
        ],
    )
}

/// The movement lesson. Its state is the scene holding the triangle and the square.
#[derive(Clone, Debug, Default)]
pub struct MovementLesson {
    config: LessonConfig,
}

impl MovementLesson {
    pub fn new(config: LessonConfig) -> Self {
        MovementLesson { config }
    }

    pub fn config(&self) -> &LessonConfig {
        &self.config
    }
}

impl<D: Device> Lesson<D> for MovementLesson {
    type State = Scene<D>;

    fn info(&self) -> &str {
        INFO
    }

    fn on_initialize(&mut self, device: &D) -> Result<Scene<D>, Error> {
        self.config.validate()?;
        device.set_parameters(&RenderParameters {
            depth_test: Some(DepthFunc::LessOrEqual),
            cull_face: false,
            blend: false,
        });

        let program = device.compile_program(VERTEX_SHADER, FRAGMENT_SHADER)?;
        let triangle = Drawable::new(device, "triangle", triangle_geometry()?, &program)?;
        let square = Drawable::new(device, "square", square_geometry()?, &program)?;

        let mut scene =
            Scene::new(self.config.projection, self.config.clear_color, self.config.clear_depth);
        scene.push(triangle, self.config.triangle);
        scene.push(square, self.config.square);
        debug!("Movement lesson created {} drawables", scene.len());
        Ok(scene)
    }

    fn on_render(&mut self, scene: &mut Scene<D>, frame: &FrameContext<'_, D>) -> Result<(), Error> {
        scene.render_frame(frame)
    }
}
