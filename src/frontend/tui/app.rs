use super::render_dots;
use crate::config::{DotAttributes, TuiConfig};
use crate::frontend::{DemoAction, FrontendEvent};
use crate::widgets::LoadingDots;
use anyhow::{Context, Result};
use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::Rect,
    style::{Color, Style},
    widgets::Paragraph,
    Terminal,
};
use std::io;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

const DOT_STEP: i64 = 1;
const DURATION_STEP_MS: i64 = 100;

/// Terminal host for the loading dots demo
///
/// Redraws whenever an animation tick flags the frame dirty, or when input
/// changes something.
pub struct TuiFrontend {
    terminal: Terminal<CrosstermBackend<io::Stdout>>,
    config: TuiConfig,
}

impl TuiFrontend {
    /// Enter raw mode and the alternate screen
    pub fn new(config: TuiConfig) -> Result<Self> {
        enable_raw_mode().context("Failed to enable raw mode")?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen).context("Failed to setup terminal")?;

        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend).context("Failed to create terminal")?;
        terminal.hide_cursor()?;

        Ok(Self { terminal, config })
    }

    fn convert_event(event: Event) -> Option<FrontendEvent> {
        match event {
            Event::Key(key_event) => {
                // Only process key press events (ignore repeats and releases)
                if key_event.kind != KeyEventKind::Press {
                    return None;
                }
                Some(FrontendEvent::key(key_event.code, key_event.modifiers))
            }
            Event::Resize(w, h) => Some(FrontendEvent::resize(w, h)),
            _ => None,
        }
    }

    /// Wait up to the poll timeout for input, then drain whatever else is queued
    pub fn poll_events(&mut self) -> Result<Vec<FrontendEvent>> {
        let mut events = Vec::new();
        let mut timeout = self.config.poll_timeout();

        while event::poll(timeout)? {
            if let Some(frontend_event) = Self::convert_event(event::read()?) {
                events.push(frontend_event);
            }
            timeout = Duration::ZERO;
        }

        Ok(events)
    }

    fn draw(&mut self, dots: &mut LoadingDots) -> Result<()> {
        let tui = &self.config;
        let mut rendered = Ok(Rect::default());

        self.terminal.draw(|f| {
            let area = f.area();
            let footer_height = area.height.min(1);
            let body = Rect::new(area.x, area.y, area.width, area.height - footer_height);
            let footer = Rect::new(area.x, area.y + body.height, area.width, footer_height);

            rendered = render_dots(dots, body, f.buffer_mut(), tui);

            let help = format!(
                " q quit | +/- dots ({}) | [/] cycle ({}ms)",
                dots.config().dot_count(),
                dots.config().cycle_duration_ms()
            );
            f.render_widget(
                Paragraph::new(help).style(Style::default().fg(Color::DarkGray)),
                footer,
            );
        })?;

        rendered.map(|_| ())
    }

    /// Run until the user quits
    pub fn run(&mut self, dots: &mut LoadingDots, dirty: &AtomicBool) -> Result<()> {
        let mut needs_render = true;

        loop {
            if dirty.swap(false, Ordering::AcqRel) || needs_render {
                self.draw(dots)?;
                needs_render = false;
            }

            for event in self.poll_events()? {
                match event.action() {
                    Some(DemoAction::Quit) => return Ok(()),
                    Some(action) => {
                        apply_action(dots, action)?;
                        needs_render = true;
                    }
                    None => {
                        if let FrontendEvent::Resize { width, height } = event {
                            tracing::debug!("Terminal resized to {}x{}", width, height);
                            needs_render = true;
                        }
                    }
                }
            }
        }
    }

    pub fn cleanup(&mut self) -> Result<()> {
        disable_raw_mode()?;
        execute!(self.terminal.backend_mut(), LeaveAlternateScreen)?;
        self.terminal.show_cursor()?;
        Ok(())
    }
}

impl Drop for TuiFrontend {
    fn drop(&mut self) {
        // Ensure terminal is restored even if cleanup() wasn't called
        let _ = self.cleanup();
    }
}

/// Attribute change a demo control asks for. Out-of-range results are left
/// for configuration validation to reject.
pub fn action_attributes(dots: &LoadingDots, action: DemoAction) -> Option<DotAttributes> {
    let count = dots.config().dot_count() as i64;
    let duration = dots.config().cycle_duration_ms() as i64;

    let attrs = match action {
        DemoAction::Quit => return None,
        DemoAction::MoreDots => DotAttributes {
            num_circles: Some(count + DOT_STEP),
            ..Default::default()
        },
        DemoAction::FewerDots => DotAttributes {
            num_circles: Some(count - DOT_STEP),
            ..Default::default()
        },
        DemoAction::Faster => DotAttributes {
            animation_duration: Some(duration - DURATION_STEP_MS),
            ..Default::default()
        },
        DemoAction::Slower => DotAttributes {
            animation_duration: Some(duration + DURATION_STEP_MS),
            ..Default::default()
        },
    };
    Some(attrs)
}

fn apply_action(dots: &mut LoadingDots, action: DemoAction) -> Result<()> {
    if let Some(attrs) = action_attributes(dots, action) {
        tracing::info!("Demo action {:?}", action);
        dots.apply_configuration(&attrs)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::animation::ManualAnimator;
    use std::sync::Arc;

    fn dots(attrs: &DotAttributes) -> (LoadingDots, ManualAnimator) {
        let animator = ManualAnimator::new();
        let dots =
            LoadingDots::new(Arc::new(animator.clone()), Arc::new(|| {}), Some(attrs)).unwrap();
        (dots, animator)
    }

    #[test]
    fn test_more_and_fewer_dots() {
        let (mut dots, animator) = dots(&DotAttributes::default());

        apply_action(&mut dots, DemoAction::MoreDots).unwrap();
        assert_eq!(dots.config().dot_count(), 4);
        assert_eq!(animator.live_count(), 4);

        apply_action(&mut dots, DemoAction::FewerDots).unwrap();
        apply_action(&mut dots, DemoAction::FewerDots).unwrap();
        assert_eq!(dots.config().dot_count(), 2);
        assert_eq!(animator.live_count(), 2);
    }

    #[test]
    fn test_cannot_go_below_one_dot() {
        let (mut dots, _) = dots(&DotAttributes {
            num_circles: Some(1),
            ..Default::default()
        });
        apply_action(&mut dots, DemoAction::FewerDots).unwrap();
        assert_eq!(dots.config().dot_count(), 1);
        assert_eq!(dots.running_count(), 1);
    }

    #[test]
    fn test_speed_changes_keep_duration_positive() {
        let (mut dots, _) = dots(&DotAttributes {
            animation_duration: Some(100),
            ..Default::default()
        });
        apply_action(&mut dots, DemoAction::Faster).unwrap();
        assert_eq!(dots.config().cycle_duration_ms(), 100);

        apply_action(&mut dots, DemoAction::Slower).unwrap();
        assert_eq!(dots.config().cycle_duration_ms(), 200);
    }

    #[test]
    fn test_quit_changes_nothing() {
        let (dots, _) = dots(&DotAttributes::default());
        assert!(action_attributes(&dots, DemoAction::Quit).is_none());
    }
}
