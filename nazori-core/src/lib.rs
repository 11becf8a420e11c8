//! # Nazori core
//!
//! Stroke rendering, bitmap history and persistence for a freehand drawing surface.
//! Everything here is single-threaded in spirit: the host feeds pointer events and frame ticks in order,
//! and awaits each persistence call before issuing the next one.

pub mod canvas;
pub mod color;
pub mod drawing_store;
pub mod geometry;
pub mod history;
pub mod id;
pub mod io;
pub mod lifecycle;
pub mod renderer;
pub mod repositories;
pub mod session;
pub mod state;
pub mod store;
pub mod style;
pub mod surface;

pub use id::Id;
