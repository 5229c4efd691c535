//! Step-by-step shortest-path search on a 2D grid.
//!
//! [`algorithms::search`] runs breadth-first, uniform-cost or A* search and
//! returns both the path and the order in which cells were closed, so the
//! search can be replayed with [`playback`].

pub mod algorithms;
pub mod backend;
pub mod comparison;
pub mod config;
pub mod error;
pub mod grid;
pub mod playback;
pub mod statistics;

pub use algorithms::{search, Algorithm, SearchResult};
pub use error::{Error, Result};
pub use grid::{Cell, Grid, Layout, Position};
