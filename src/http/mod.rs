//! HTTP subsystem.
//!
//! # Data Flow
//! ```text
//! inbound request
//!     → server.rs (router, trace / request-id / timeout layers)
//!     → middleware.rs (exempt? blocked? allowed?)
//!         blocked → bomb.rs (precompressed payload response)
//!         else    → server.rs forward_handler (upstream hand-off)
//! ```
//!
//! # Design Decisions
//! - The trap decision runs before forwarding; a blocked request never
//!   reaches the upstream, and a failed payload resolution never falls
//!   through to forwarding
//! - Forwarding is a thin single-upstream hand-off; everything beyond the
//!   trap decision belongs to the next pipeline stage

pub mod bomb;
pub mod middleware;
pub mod request_id;
pub mod server;

pub use server::{AppState, HttpServer};
