//! # Scene
//!
//! This module contains everything the ger viewer knows about its scene, independent of the window.
//!
//! ## Modules
//!
//! - `door`: The two state door animation that crossfades the closed and the open door model.
//! - `camera`: The orbiting camera, its projection and the mouse controller driving it.
//! - `picking`: Turns a cursor position into a ray and tests it against the hotspot.
//! - `geometry`: Procedural meshes for the hotspot sphere and the ground.
//! - `models`: Loads glTF models and images into plain data ready for upload.
//! - `loader`: Runs the model and image loading on background threads.
//! - `config`: Loads the configuration file with all scene constants.
//! - `structs`: The gpu compatible vertex and uniform structs.
//! - `texture`: Related functions for creating textures on the gpu.
//!
//! ## Usage
//!
//! ```no_run
//! use scene::{Config, DoorAnimationState};
//!
//! let config = Config::load_or_default("res/config.toml");
//! let mut door = DoorAnimationState::new();
//! door.open();
//! door = door.advance(config.door.speed);
//! let opacity = door.opacity();
//! assert!(opacity.open > 0.0);
//! ```
pub mod door;
pub mod camera;
pub mod picking;
pub mod geometry;
pub mod models;
pub mod loader;
pub mod config;
pub mod structs;
pub mod texture;

pub use door::{DoorAnimationState, DoorDirection, DoorOpacity, DoorPosition};
pub use camera::{CameraController, OrbitCamera, Projection};
pub use picking::{cursor_to_ndc, Ray};
pub use geometry::{generate_ground_plane, generate_uv_sphere, SphereOptions};
pub use models::{load_gltf, load_image, Bounds, ImageData, MeshData, ModelData};
pub use loader::{AssetData, AssetKind, AssetLoader, LoadedAsset};
pub use config::Config;
pub use structs::{srgb_hex_to_linear, CameraUniform, LightUniform, ObjectUniform, Vertex};
pub use texture::{create_depth_texture, create_sampler, texture_from_image, COLOR_FORMAT, DEPTH_FORMAT};
