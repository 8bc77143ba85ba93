//! # kdthree
//!
//! `kdthree` is a Rust library for nearest-neighbor lookups over a fixed set
//! of 3D points, designed to be used in Rust as well as compiled to
//! WebAssembly (WASM). It provides two k-d tree variants behind one
//! interface, both supporting logical deletion so points can disappear from
//! query results without rebuilding the structure.
//!
//! ## Features
//!
//! - **WASM-first**: Built with `wasm-bindgen` for seamless integration with
//!   JavaScript and TypeScript via the `ProximityBalanced` / `ProximityLazy`
//!   wrappers.
//! - **Eager balanced tree**: One up-front median build over the whole point
//!   set, perfectly size-balanced, with branch-and-bound nearest search.
//! - **Lazy splitting**: An O(1) build that partitions a region (via
//!   quickselect) only once a query touches it and it is large enough to be
//!   worth splitting.
//! - **Tombstone deletion**: `delete` marks points dead in place; `nearest`
//!   never returns them again.
//!
//! ## Main Interface
//!
//! Both variants implement the [`SpatialIndex`] trait: `build` an index from
//! index-aligned position and identifier arrays, `delete` identifiers as
//! items go away, and call `nearest` per frame or per event. Queries return
//! [`NO_POINT`] once nothing live remains.

mod index;
mod kd_balanced;
mod kd_lazy;
mod partition;
mod proximity_balanced;
mod proximity_lazy;
mod store;

pub use index::NO_POINT;
pub use index::SpatialIndex;
pub use kd_balanced::BalancedKdTree;
pub use kd_lazy::DEFAULT_SPLIT_THRESHOLD;
pub use kd_lazy::LazyKdTree;
pub use partition::Axis;
pub use proximity_balanced::ProximityBalanced;
pub use proximity_lazy::ProximityLazy;
pub use store::PointStore;
