//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Table construction (at startup):
//!     ControllerDescriptor[]
//!     → normalize controller and action segments
//!     → controller segment → action segment → Action
//!     → freeze as immutable RoutingTable
//!
//! Lookup (per request):
//!     request path
//!     → pattern.rs (split into controller / action segments)
//!     → table.rs (two map lookups)
//!     → ActionInfo or MalformedUrl / ControllerNotFound / ActionNotFound
//! ```

mod pattern;
mod table;

pub use pattern::*;
pub use table::*;
