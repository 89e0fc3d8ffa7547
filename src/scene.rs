use cgmath::*;
use log::*;

use crate::animation::*;
use crate::config::*;
use crate::device::*;
use crate::drawable::*;
use crate::error::*;
use crate::uniforms::*;

/// Per-frame input from the frame driver. Never stored past the frame it describes.
pub struct FrameContext<'a, D: Device> {
    /// Frames since the loop started rendering.
    pub tick: u64,
    /// Viewport width divided by height.
    pub aspect: f32,
    pub device: &'a D,
}

impl<'a, D: Device> FrameContext<'a, D> {
    pub fn new(device: &'a D, tick: u64, aspect: f32) -> Self {
        FrameContext { tick, aspect, device }
    }
}

/// Builds the projection matrix for an aspect ratio. A non-finite or non-positive aspect
/// (e.g. from a zero-height canvas) is replaced by 1.
pub fn projection_matrix(config: &ProjectionConfig, aspect: f32) -> Matrix4<f32> {
    let aspect = if aspect.is_finite() && aspect > 0.0 {
        aspect
    } else {
        warn!("Invalid aspect ratio {}, using 1.0", aspect);
        1.0
    };
    perspective(Deg(config.fov), aspect, config.near, config.far)
}

struct Entry<D: Device> {
    drawable: Drawable<D>,
    animation: Animation,
}

/// The drawables of a lesson, each with its animation, drawn in insertion order.
pub struct Scene<D: Device> {
    entries: Vec<Entry<D>>,
    projection: ProjectionConfig,
    clear: [ClearBuffer; 2],
}

impl<D: Device> Scene<D> {
    pub fn new(projection: ProjectionConfig, clear_color: [f32; 4], clear_depth: f32) -> Self {
        Scene {
            entries: vec![],
            projection,
            clear: [ClearBuffer::Color(clear_color), ClearBuffer::Depth(clear_depth)],
        }
    }

    pub fn push(&mut self, drawable: Drawable<D>, animation: Animation) {
        self.entries.push(Entry { drawable, animation });
    }

    /// Clears the frame, then poses and draws every drawable in order. The first error
    /// aborts the rest of the frame.
    pub fn render_frame(&mut self, frame: &FrameContext<'_, D>) -> Result<(), Error> {
        frame.device.clear(&self.clear);
        let projection = projection_matrix(&self.projection, frame.aspect);

        for entry in &mut self.entries {
            let pose = entry.animation.pose_at(frame.tick);
            let drawable = &mut entry.drawable;
            drawable.set_position(pose.position)?.set_rotation(pose.rotation)?.update_matrix();

            let uniforms = Uniforms::new()
                .with(drawable.model_uniform(), drawable.matrix())
                .with(drawable.projection_uniform(), projection);
            drawable.render(frame.device, &uniforms)?;
        }
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn drawable(&self, name: &str) -> Option<&Drawable<D>> {
        self.drawables().find(|drawable| drawable.name() == name)
    }

    pub fn drawables(&self) -> impl Iterator<Item = &Drawable<D>> {
        self.entries.iter().map(|entry| &entry.drawable)
    }

    pub fn animation(&self, name: &str) -> Option<&Animation> {
        self.entries.iter().find(|entry| entry.drawable.name() == name).map(|entry| &entry.animation)
    }
}
