//! Drawing surface the widget renders onto.

use crate::config::Rgba;
use anyhow::Result;

/// Fill paint shared by every dot
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Paint {
    pub color: Rgba,
    pub anti_alias: bool,
}

impl Paint {
    /// Anti-aliased fill in `color`
    pub fn fill(color: Rgba) -> Self {
        Self {
            color,
            anti_alias: true,
        }
    }
}

impl Default for Paint {
    fn default() -> Self {
        Self::fill(Rgba::WHITE)
    }
}

/// Host drawing target
pub trait Surface {
    /// Draw a filled circle centered at (`cx`, `cy`) in widget units
    fn draw_circle(&mut self, cx: f32, cy: f32, radius: f32, paint: &Paint) -> Result<()>;
}
