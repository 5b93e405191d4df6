//! ra_star
//! =======
//!
//! A parallel, speculation-augmented weighted A* path planner for a
//! rectangular robot moving on a grid of axis-aligned rectangular
//! obstacles ("Real-time / Rectangular A*", RA*).
//!
//! The [`Search`] engine runs a sequential best-first search on the
//! main thread, but offloads every neighbor collision check
//! ([`MapStore::free`]) to a [`WorkerPool`]. When speculation is
//! enabled, idle workers are also used to prefetch collision checks for
//! cells the engine predicts it will expand soon, without changing the
//! cost of the path the search returns.

mod cell_tables;
pub mod cli;
mod direction;
mod error;
mod handle;
mod map;
mod map_file;
mod pool;
mod rectangle;
mod search;

pub use self::{
    direction::{is_cardinal, movement_cost, outer_dirs, step, DIRECTION_VECTORS, NUM_DIRECTIONS},
    error::MapError,
    handle::Handle,
    map::MapStore,
    map_file::load_map,
    pool::WorkerPool,
    rectangle::Rectangle,
    search::{PlanOutcome, PlanResult, Search},
};
