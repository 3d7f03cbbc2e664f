//! Size negotiation with the host layout.
//!
//! Each axis comes with a [`MeasureSpec`]: the host either dictates the size,
//! caps it, or leaves it open.

/// How a measured dimension may be resolved
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MeasureMode {
    /// Use the given size
    Exactly,
    /// Use the desired size, capped at the given size
    AtMost,
    /// Use the desired size
    Unspecified,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MeasureSpec {
    pub mode: MeasureMode,
    pub size: u32,
}

impl MeasureSpec {
    pub fn exactly(size: u32) -> Self {
        Self { mode: MeasureMode::Exactly, size }
    }

    pub fn at_most(size: u32) -> Self {
        Self { mode: MeasureMode::AtMost, size }
    }

    pub fn unspecified() -> Self {
        Self { mode: MeasureMode::Unspecified, size: 0 }
    }

    /// Resolve one axis against the widget's desired size
    pub fn resolve(&self, desired: u32) -> u32 {
        match self.mode {
            MeasureMode::Exactly => self.size,
            MeasureMode::AtMost => desired.min(self.size),
            MeasureMode::Unspecified => desired,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Size {
    pub width: u32,
    pub height: u32,
}

impl Size {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

/// Resolve both axes
pub fn resolve_size(desired: Size, width: MeasureSpec, height: MeasureSpec) -> Size {
    Size {
        width: width.resolve(desired.width),
        height: height.resolve(desired.height),
    }
}
