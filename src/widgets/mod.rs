//! Widget state (rendering-agnostic)
//!
//! The widget holds configuration, animation handles and the current radii,
//! and draws through the [`Surface`](crate::surface::Surface) trait. The
//! ratatui frontend supplies a surface backed by a terminal buffer.

pub mod loading_dots;
pub mod schedule;

pub use loading_dots::{LoadingDots, RedrawFn, RenderState};
pub use schedule::{DotPhase, DotSchedule};
