//! ratatui rendering for [`LoadingDots`].
//!
//! The widget works in abstract units; a terminal cell covers
//! `units_per_column` by `units_per_row` of them. A cell is painted when its
//! center falls inside a dot.

pub mod app;

pub use app::TuiFrontend;

use crate::config::{Rgba, TuiConfig};
use crate::layout::MeasureSpec;
use crate::surface::{Paint, Surface};
use crate::widgets::LoadingDots;
use anyhow::Result;
use ratatui::{buffer::Buffer, layout::Rect, style::Color};

const FULL: char = '█';
const EDGE: char = '░';

fn to_color(rgba: Rgba) -> Color {
    Color::Rgb(rgba.r, rgba.g, rgba.b)
}

/// [`Surface`] over a region of a ratatui [`Buffer`]
pub struct BufferSurface<'a> {
    buf: &'a mut Buffer,
    area: Rect,
    units_per_column: f32,
    units_per_row: f32,
}

impl<'a> BufferSurface<'a> {
    pub fn new(buf: &'a mut Buffer, area: Rect, tui: &TuiConfig) -> Self {
        // Never draw outside the buffer
        let area = area.intersection(buf.area);
        Self {
            buf,
            area,
            units_per_column: tui.units_per_column,
            units_per_row: tui.units_per_row,
        }
    }

    fn cell_center(&self, col: u16, row: u16) -> (f32, f32) {
        (
            (col as f32 + 0.5) * self.units_per_column,
            (row as f32 + 0.5) * self.units_per_row,
        )
    }
}

impl Surface for BufferSurface<'_> {
    fn draw_circle(&mut self, cx: f32, cy: f32, radius: f32, paint: &Paint) -> Result<()> {
        if paint.color.is_transparent() || radius <= 0.0 {
            return Ok(());
        }

        let fg = to_color(paint.color);
        let edge = 0.5 * self.units_per_column.min(self.units_per_row);

        for row in 0..self.area.height {
            for col in 0..self.area.width {
                let (x, y) = self.cell_center(col, row);
                let distance = ((x - cx).powi(2) + (y - cy).powi(2)).sqrt();

                let glyph = if distance <= radius {
                    FULL
                } else if paint.anti_alias && distance <= radius + edge {
                    EDGE
                } else {
                    continue;
                };

                let cell = &mut self.buf[(self.area.x + col, self.area.y + row)];
                // Don't let a soft edge overwrite a neighbor's solid fill
                if glyph == EDGE && cell.symbol() == "█" {
                    continue;
                }
                cell.set_char(glyph);
                cell.set_fg(fg);
            }
        }
        Ok(())
    }
}

/// Measure `dots` against `area`, center it there, and draw it.
///
/// Returns the cells the widget occupies.
pub fn render_dots(
    dots: &mut LoadingDots,
    area: Rect,
    buf: &mut Buffer,
    tui: &TuiConfig,
) -> Result<Rect> {
    let available_width = (area.width as f32 * tui.units_per_column) as u32;
    let available_height = (area.height as f32 * tui.units_per_row) as u32;
    let size = dots.measure(
        MeasureSpec::at_most(available_width),
        MeasureSpec::at_most(available_height),
    );

    let cols = ((size.width as f32 / tui.units_per_column).ceil() as u16).min(area.width);
    let rows = ((size.height as f32 / tui.units_per_row).ceil() as u16).min(area.height);
    let target = Rect::new(
        area.x + (area.width - cols) / 2,
        area.y + (area.height - rows) / 2,
        cols,
        rows,
    );

    dots.render(&mut BufferSurface::new(buf, target, tui))?;
    Ok(target)
}
