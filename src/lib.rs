//! "A Bit of Movement": a triangle and a square spinning in front of a perspective camera,
//! rendered every frame through a small, typed layer over the graphics runtime.
//!
//! The runtime is the `Device` trait. `GlContext` implements it on WebGL 2 (wasm32 only) and
//! `HeadlessDevice` implements it by recording calls, which is what the tests use.

#![deny(bare_trait_objects)]

mod animation;
mod config;
mod device;
mod drawable;
mod error;
mod geometry;
pub mod headless;
mod lesson;
mod movement;
mod rect;
mod scene;
mod schedule;
mod transform;
pub mod uniforms;

#[cfg(target_arch = "wasm32")]
mod buffer;
#[cfg(target_arch = "wasm32")]
mod context;
#[cfg(target_arch = "wasm32")]
pub mod driver;
#[cfg(target_arch = "wasm32")]
mod program;
#[cfg(target_arch = "wasm32")]
mod surface;

pub use crate::animation::*;
pub use crate::config::*;
pub use crate::device::*;
pub use crate::drawable::*;
pub use crate::error::*;
pub use crate::geometry::*;
pub use crate::headless::HeadlessDevice;
pub use crate::lesson::*;
pub use crate::movement::*;
pub use crate::rect::*;
pub use crate::scene::*;
pub use crate::schedule::*;
pub use crate::transform::*;
pub use uniforms::{UniformValue, Uniforms};

#[cfg(target_arch = "wasm32")]
pub use crate::buffer::*;
#[cfg(target_arch = "wasm32")]
pub use crate::context::*;
#[cfg(target_arch = "wasm32")]
pub use crate::program::*;
#[cfg(target_arch = "wasm32")]
pub use crate::surface::*;
