//! Loading Dots - a row of pulsing dots used as a loading indicator
//!
//! Each dot pulses between a rest and a peak radius, started with a
//! staggered delay so the pulse chases along the row. The widget is driven
//! by an [`Animator`](animation::Animator), answers layout negotiation via
//! [`LoadingDots::measure`](widgets::LoadingDots::measure) and draws onto any
//! [`Surface`](surface::Surface).

pub mod animation;
pub mod config;
pub mod frontend;
pub mod layout;
pub mod surface;
pub mod widgets;

pub use animation::{AnimationHandle, Animator, ManualAnimator, TokioAnimator};
pub use config::{AppConfig, DotAttributes, DotsConfig, Rgba};
pub use layout::{MeasureMode, MeasureSpec, Size};
pub use surface::{Paint, Surface};
pub use widgets::{LoadingDots, RenderState};
