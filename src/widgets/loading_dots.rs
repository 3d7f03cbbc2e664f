//! Loading indicator: a horizontal row of dots pulsing in a staggered chase.
//!
//! The widget owns one [`AnimationHandle`] per dot. Each handle's tick writes
//! only its own slot of the shared radius list and asks the host to redraw;
//! rendering copies the whole list under the lock, so a frame never mixes
//! half-updated state. Handles are stopped on reconfiguration, on
//! [`LoadingDots::teardown`] and on drop.

use crate::animation::{AnimationHandle, Animator, TickFn};
use crate::config::{DotAttributes, DotsConfig};
use crate::layout::{resolve_size, MeasureSpec, Size};
use crate::surface::{Paint, Surface};
use crate::widgets::schedule::{DotPhase, DotSchedule};
use anyhow::Result;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

/// Host callback asking for a new frame. Called from animation ticks, so it
/// must be quick and must not call back into the widget.
pub type RedrawFn = Arc<dyn Fn() + Send + Sync>;

fn lock_radii(radii: &Mutex<Vec<f32>>) -> MutexGuard<'_, Vec<f32>> {
    radii.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Snapshot consumed by a single draw
#[derive(Debug, Clone, PartialEq)]
pub struct RenderState {
    pub radii: Vec<f32>,
    pub paint: Paint,
}

/// Pulsing dots widget
pub struct LoadingDots {
    config: DotsConfig,
    paint: Paint,
    radii: Arc<Mutex<Vec<f32>>>,
    animations: Vec<AnimationHandle>,
    animator: Arc<dyn Animator>,
    redraw: RedrawFn,
    measured: Size,
}

impl LoadingDots {
    /// Create the widget and start its animations.
    ///
    /// `attrs` overrides the defaults (3 dots, 500ms, white); invalid values
    /// fall back to the defaults.
    pub fn new(
        animator: Arc<dyn Animator>,
        redraw: RedrawFn,
        attrs: Option<&DotAttributes>,
    ) -> Result<Self> {
        let defaults = DotsConfig::default();
        let mut dots = Self {
            paint: Paint::fill(defaults.dot_color()),
            radii: Arc::new(Mutex::new(Vec::new())),
            config: defaults,
            animations: Vec::new(),
            animator,
            redraw,
            measured: Size::default(),
        };
        dots.measured = dots.desired_size();
        dots.apply_configuration(attrs.unwrap_or(&DotAttributes::default()))?;
        Ok(dots)
    }

    /// Layer `attrs` over the current configuration and restart the animations.
    pub fn apply_configuration(&mut self, attrs: &DotAttributes) -> Result<()> {
        let next = self.config.with_attributes(attrs);
        self.set_config(next)
    }

    /// Replace the configuration and restart the animations.
    ///
    /// All previous animations are stopped before any new one starts. If any
    /// dot fails to start, the ones already started are stopped again and the
    /// widget is left with no running animations.
    pub fn set_config(&mut self, config: DotsConfig) -> Result<()> {
        self.teardown();

        self.paint = Paint::fill(config.dot_color());
        let radii = Arc::new(Mutex::new(vec![config.rest_radius(); config.dot_count()]));
        self.radii = Arc::clone(&radii);
        self.config = config;

        let mut animations = Vec::with_capacity(self.config.dot_count());
        for schedule in DotSchedule::for_config(&self.config) {
            let index = schedule.index;
            let slots = Arc::clone(&radii);
            let redraw = Arc::clone(&self.redraw);
            let on_tick: TickFn = Box::new(move |radius| {
                if let Some(slot) = lock_radii(&slots).get_mut(index) {
                    *slot = radius;
                }
                redraw();
            });

            // On error, dropping `animations` stops every handle started so far
            let handle = self
                .animator
                .start(schedule, on_tick)
                .map_err(|e| e.context(format!("Failed to start animation for dot {}", index)))?;
            animations.push(handle);
        }
        self.animations = animations;

        tracing::debug!(
            "LoadingDots configured: {} dots, {}ms cycle, color {}",
            self.config.dot_count(),
            self.config.cycle_duration_ms(),
            self.config.dot_color().to_hex()
        );
        Ok(())
    }

    /// Stop and release every dot animation. No tick runs after this returns.
    pub fn teardown(&mut self) {
        if self.animations.is_empty() {
            return;
        }
        let count = self.animations.len();
        for mut handle in self.animations.drain(..) {
            handle.stop();
        }
        tracing::debug!("LoadingDots stopped {} animations", count);
    }

    /// Size the widget would like: one `2 * peak` cell per dot
    pub fn desired_size(&self) -> Size {
        let peak = self.config.peak_radius();
        Size::new(
            (2.0 * self.config.dot_count() as f32 * peak) as u32,
            (2.0 * peak) as u32,
        )
    }

    /// Answer the host's layout negotiation and remember the result
    pub fn measure(&mut self, width: MeasureSpec, height: MeasureSpec) -> Size {
        self.measured = resolve_size(self.desired_size(), width, height);
        self.measured
    }

    pub fn measured_size(&self) -> Size {
        self.measured
    }

    /// Consistent copy of everything a draw needs
    pub fn render_state(&self) -> RenderState {
        RenderState {
            radii: lock_radii(&self.radii).clone(),
            paint: self.paint,
        }
    }

    /// Draw every dot, left to right, vertically centered in the measured height
    pub fn render<S: Surface + ?Sized>(&self, surface: &mut S) -> Result<()> {
        let state = self.render_state();
        let peak = self.config.peak_radius();
        let cy = self.measured.height as f32 / 2.0;

        for (index, radius) in state.radii.iter().enumerate() {
            let cx = (2 * index + 1) as f32 * peak;
            surface.draw_circle(cx, cy, *radius, &state.paint)?;
        }
        Ok(())
    }

    pub fn config(&self) -> &DotsConfig {
        &self.config
    }

    pub fn paint(&self) -> Paint {
        self.paint
    }

    pub fn radius(&self, index: usize) -> Option<f32> {
        lock_radii(&self.radii).get(index).copied()
    }

    /// Number of dot animations currently running
    pub fn running_count(&self) -> usize {
        self.animations
            .iter()
            .filter(|handle| handle.is_running())
            .count()
    }

    pub fn is_animating(&self) -> bool {
        self.running_count() > 0
    }

    /// Start delay of every configured dot, whether or not it is running
    pub fn start_delays(&self) -> Vec<Duration> {
        DotSchedule::for_config(&self.config)
            .iter()
            .map(|schedule| schedule.start_delay)
            .collect()
    }

    /// Phase of each configured dot `elapsed` after the animations started
    pub fn phases_at(&self, elapsed: Duration) -> Vec<DotPhase> {
        DotSchedule::for_config(&self.config)
            .iter()
            .map(|schedule| schedule.phase_at(elapsed))
            .collect()
    }
}

impl Drop for LoadingDots {
    fn drop(&mut self) {
        self.teardown();
    }
}
