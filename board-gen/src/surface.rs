use crate::error::{BoardError, Result};
use tagboard_common::Color;

/// Axis-aligned rectangle in pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

impl Rect {
    pub const fn new(x: i32, y: i32, width: u32, height: u32) -> Self {
        Self { x, y, width, height }
    }

    pub const fn square(x: i32, y: i32, side: u32) -> Self {
        Self::new(x, y, side, side)
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Shifted by `(dx, dy)`, clamped at the `i32` range
    pub fn translated(&self, dx: i32, dy: i32) -> Self {
        Self::new(self.x.saturating_add(dx), self.y.saturating_add(dy), self.width, self.height)
    }
}

/// 2D drawing capability the board is painted onto
///
/// Coordinates passed to the drawing calls are relative to the current
/// origin, which `translate` moves and `save`/`restore` push and pop.
pub trait Surface {
    fn save(&mut self);

    fn restore(&mut self);

    fn translate(&mut self, dx: i32, dy: i32);

    fn fill_rect(&mut self, rect: Rect, color: Color);

    /// Outline of the ellipse inscribed in `bounds`
    fn draw_ellipse(&mut self, _bounds: Rect, _color: Color) -> Result<()> {
        Err(BoardError::Unsupported("ellipses"))
    }

    /// Text with its baseline-left corner at `(x, y)`
    fn draw_text(&mut self, _x: i32, _y: i32, _size: f32, _text: &str, _color: Color) -> Result<()> {
        Err(BoardError::Unsupported("text"))
    }
}

/// Run `f` between `save` and `restore`, restoring on the error path too
pub fn with_saved<S, T, F>(surface: &mut S, f: F) -> Result<T>
where
    S: Surface + ?Sized,
    F: FnOnce(&mut S) -> Result<T>,
{
    surface.save();
    let result = f(surface);
    surface.restore();
    result
}

/// A surface call as seen in absolute pixel coordinates
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Fill { rect: Rect, color: Color },
    Ellipse { bounds: Rect, color: Color },
    Text { x: i32, y: i32, size: f32, text: String, color: Color },
}

/// Surface that records draw calls instead of rendering them
#[derive(Debug, Default)]
pub struct RecordingSurface {
    origin: (i32, i32),
    saved: Vec<(i32, i32)>,
    commands: Vec<DrawCommand>,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    pub fn into_commands(self) -> Vec<DrawCommand> {
        self.commands
    }

    /// Only the rectangle fills, in paint order
    pub fn fills(&self) -> Vec<(Rect, Color)> {
        self.commands
            .iter()
            .filter_map(|command| match command {
                DrawCommand::Fill { rect, color } => Some((*rect, *color)),
                _ => None,
            })
            .collect()
    }

    pub fn origin(&self) -> (i32, i32) {
        self.origin
    }

    /// Number of `save` calls not yet matched by a `restore`
    pub fn depth(&self) -> usize {
        self.saved.len()
    }
}

impl Surface for RecordingSurface {
    fn save(&mut self) {
        self.saved.push(self.origin);
    }

    fn restore(&mut self) {
        if let Some(origin) = self.saved.pop() {
            self.origin = origin;
        }
    }

    fn translate(&mut self, dx: i32, dy: i32) {
        self.origin = (self.origin.0.saturating_add(dx), self.origin.1.saturating_add(dy));
    }

    fn fill_rect(&mut self, rect: Rect, color: Color) {
        self.commands.push(DrawCommand::Fill {
            rect: rect.translated(self.origin.0, self.origin.1),
            color,
        });
    }

    fn draw_ellipse(&mut self, bounds: Rect, color: Color) -> Result<()> {
        self.commands.push(DrawCommand::Ellipse {
            bounds: bounds.translated(self.origin.0, self.origin.1),
            color,
        });
        Ok(())
    }

    fn draw_text(&mut self, x: i32, y: i32, size: f32, text: &str, color: Color) -> Result<()> {
        self.commands.push(DrawCommand::Text {
            x: x.saturating_add(self.origin.0),
            y: y.saturating_add(self.origin.1),
            size,
            text: text.to_string(),
            color,
        });
        Ok(())
    }
}
