//! Procedural generation for the endless city: seeded building masses and
//! lit-window facades.
//!
//! **Seed-based determinism:** every tile draws all of its randomness from a
//! stream reseeded with `tile_seed(col, row)`, so the same city block always
//! regenerates byte-identical geometry regardless of how often it leaves and
//! re-enters the streaming window.

pub mod building;
pub mod facade;
pub mod mesh;
pub mod rng;

pub use building::*;
pub use facade::*;
pub use mesh::*;
pub use rng::*;
