//! A dynamic AABB tree broad-phase for 2D collision detection, inspired by
//! (the venerable) Box2D physics engine. Clients register fattened proxy
//! boxes, move them around, and ask the broad-phase for candidate overlap
//! pairs, region queries and ray casts; exact shape tests are left to a
//! narrow phase.

pub mod broad_phase;
pub mod collision;
pub mod common;
pub mod dynamic_tree;
pub mod flat_tree;

pub use broad_phase::*;
pub use collision::*;
pub use common::*;
pub use dynamic_tree::*;
pub use flat_tree::*;

pub use glam::Vec2;
