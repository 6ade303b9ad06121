use crate::error::{BoardError, Result};
use crate::surface::{with_saved, Rect, Surface};
use crate::tag_codes::{CodeTable, TagCode};
use tagboard_common::{BoardConfig, Palette};

/// Sizes derived from a board config and code width
///
/// All sizes except `bits` are in cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoardGeometry {
    pub bits: u32,
    /// Side of the data area
    pub codes_size: u32,
    /// Side of a tag including its border
    pub tag_size: u32,
    pub total_width: u32,
    pub total_height: u32,
}

impl BoardGeometry {
    pub fn new(config: &BoardConfig, bits: u32) -> Result<Self> {
        if bits == 0 || bits > 64 {
            return Err(BoardError::InvalidConfig(format!(
                "code width must be 1-64 bits, got {}",
                bits
            )));
        }
        let codes_size = f64::from(bits).sqrt() as u32;
        if codes_size * codes_size != bits {
            return Err(BoardError::InvalidConfig(format!(
                "{} bits per code is not a perfect square",
                bits
            )));
        }

        let tag_size = u64::from(config.border) * 2 + u64::from(codes_size);
        let span = |count: u32| {
            tag_size * u64::from(count) + u64::from(config.corner_box) * (u64::from(count) + 1)
        };
        let tag_size = cells(tag_size)?;
        let total_width = cells(span(config.cols))?;
        let total_height = cells(span(config.rows))?;

        Ok(Self {
            bits,
            codes_size,
            tag_size,
            total_width,
            total_height,
        })
    }
}

fn cells(value: u64) -> Result<u32> {
    u32::try_from(value)
        .map_err(|_| BoardError::InvalidConfig(format!("board is too large ({} cells)", value)))
}

/// Where one tag of the grid goes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TagPlacement {
    pub id: u32,
    pub col: u32,
    /// Internal row index; row `rows - 1` is painted first
    pub row: u32,
    pub x: i32,
    pub y: i32,
}

/// Pixel layout of a calibration board: a grid of tags with corner boxes
/// on the lattice points between them
///
/// Geometry is fixed at construction. Painting never mutates the layout, so
/// the same layout painted twice emits the same draw calls.
#[derive(Debug, Clone)]
pub struct TagBoardLayout<C: CodeTable> {
    config: BoardConfig,
    palette: Palette,
    codes: C,
    geometry: BoardGeometry,
}

impl<C: CodeTable> TagBoardLayout<C> {
    /// Build a layout and derive its geometry
    ///
    /// # Arguments
    /// * `config` - Board parameters
    /// * `palette` - Foreground and background colors
    /// * `codes` - Code table; its `bits()` must be a perfect square of at most 64
    ///
    /// # Returns
    /// The layout, or `InvalidConfig` if the code width is not a perfect
    /// square, the grid or unit size is zero, the canvas does not fit in
    /// `i32` pixels, or the table lacks any of the board's tag IDs
    pub fn new(config: BoardConfig, palette: Palette, codes: C) -> Result<Self> {
        let geometry = BoardGeometry::new(&config, codes.bits())?;

        if config.cols == 0 || config.rows == 0 {
            return Err(BoardError::InvalidConfig(format!(
                "grid must have at least one tag, got {}x{}",
                config.cols, config.rows
            )));
        }
        if config.unit_pixels == 0 {
            return Err(BoardError::InvalidConfig("unit size must be at least 1 pixel".to_string()));
        }

        // Every pixel coordinate painted must fit in i32
        let unit = u64::from(config.unit_pixels);
        let padding = u64::from(config.padding) * 2;
        let width = u64::from(geometry.total_width) * unit + padding;
        let height = u64::from(geometry.total_height) * unit + padding;
        if width > i32::MAX as u64 || height > i32::MAX as u64 {
            return Err(BoardError::InvalidConfig(format!(
                "canvas of {}x{} pixels is too large",
                width, height
            )));
        }

        if !codes.contains_range(config.start_id, config.tag_count()) {
            return Err(BoardError::InvalidConfig(format!(
                "{} tags from ID {} exceed the {} table ({} codes)",
                config.tag_count(),
                config.start_id,
                codes.name(),
                codes.len()
            )));
        }

        Ok(Self {
            config,
            palette,
            codes,
            geometry,
        })
    }

    pub fn config(&self) -> &BoardConfig {
        &self.config
    }

    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    pub fn geometry(&self) -> &BoardGeometry {
        &self.geometry
    }

    pub fn codes(&self) -> &C {
        &self.codes
    }

    /// Output image size in pixels, padding included
    pub fn canvas_size(&self) -> (u32, u32) {
        let unit = self.config.unit_pixels;
        let padding = self.config.padding * 2;
        (
            self.geometry.total_width * unit + padding,
            self.geometry.total_height * unit + padding,
        )
    }

    /// ID of the last tag on the board
    pub fn last_id(&self) -> u32 {
        self.config.start_id + (self.config.cols * self.config.rows - 1)
    }

    /// Tag positions in paint order
    ///
    /// IDs count up left to right, starting from the last internal row and
    /// working towards row 0, so the tag at row `j`, column `i` gets
    /// `start_id + (rows - 1 - j) * cols + i`.
    pub fn placements(&self) -> Vec<TagPlacement> {
        let BoardConfig {
            start_id,
            corner_box,
            padding,
            cols,
            rows,
            unit_pixels: unit,
            ..
        } = self.config;
        let tag_size = self.geometry.tag_size;

        let mut placements = Vec::with_capacity((cols * rows) as usize);
        let mut id = start_id;
        for row in (0..rows).rev() {
            for col in 0..cols {
                let x = padding + unit * ((col + 1) * corner_box + col * tag_size);
                let y = padding + unit * ((row + 1) * corner_box + row * tag_size);
                placements.push(TagPlacement {
                    id,
                    col,
                    row,
                    x: px(x),
                    y: px(y),
                });
                id += 1;
            }
        }
        placements
    }

    fn lookup(&self, id: u32) -> Result<TagCode> {
        let code = self.codes.code(id).ok_or(BoardError::Lookup { id })?;
        let expected = self.geometry.bits;
        if code.bits != expected {
            return Err(BoardError::ConfigMismatch {
                id,
                expected,
                actual: code.bits,
            });
        }
        if expected < 64 && code.value >> expected != 0 {
            return Err(BoardError::ConfigMismatch {
                id,
                expected,
                actual: 64 - code.value.leading_zeros(),
            });
        }
        Ok(code)
    }

    /// Paint one tag with its top-left corner at `(x, y)`
    ///
    /// The code is pushed onto a stack LSB first and popped once per cell,
    /// columns outer and rows inner, with cell `(col, row)` drawn at
    /// `x = row`, `y = col`. The net effect is a row-major, MSB-first read
    /// of the code. The lookup happens before anything is drawn, so a
    /// failing tag leaves the surface untouched.
    ///
    /// # Arguments
    /// * `surface` - Surface to paint on; its transform is restored on return
    /// * `id` - Tag ID to look up in the code table
    /// * `x`, `y` - Pixel origin of the tag's outer border
    ///
    /// # Returns
    /// `Lookup` if the table has no code for `id`, `ConfigMismatch` if the
    /// code is not `bits` wide
    pub fn paint_tag<S: Surface + ?Sized>(&self, surface: &mut S, id: u32, x: i32, y: i32) -> Result<()> {
        let code = self.lookup(id)?;
        let Palette {
            foreground,
            background,
        } = self.palette;
        let unit = self.config.unit_pixels;
        let codes_size = self.geometry.codes_size;

        with_saved(surface, |s| {
            s.translate(x, y);
            s.fill_rect(Rect::square(0, 0, self.geometry.tag_size * unit), background);

            let offset = px(self.config.border * unit);
            s.translate(offset, offset);
            s.fill_rect(Rect::square(0, 0, codes_size * unit), foreground);

            let mut value = code.value;
            let mut stack = Vec::with_capacity(code.bits as usize);
            for _ in 0..code.bits {
                stack.push(value & 1 == 1);
                value >>= 1;
            }

            for col in 0..codes_size {
                for row in 0..codes_size {
                    // bits == codes_size^2, so the stack never runs dry
                    let set = stack.pop().unwrap_or(false);
                    let cell = Rect::square(px(row * unit), px(col * unit), unit);
                    s.fill_rect(cell, if set { foreground } else { background });
                }
            }
            Ok(())
        })
    }

    /// Fill the canvas and paint every tag, stopping at the first failure
    pub fn paint_grid<S: Surface + ?Sized>(&self, surface: &mut S) -> Result<()> {
        let (width, height) = self.canvas_size();
        with_saved(surface, |s| {
            s.fill_rect(Rect::new(0, 0, width, height), self.palette.foreground);
            for placement in self.placements() {
                self.paint_tag(s, placement.id, placement.x, placement.y)?;
            }
            Ok(())
        })
    }

    /// Paint the `(cols + 1) x (rows + 1)` lattice of corner boxes
    pub fn paint_corners<S: Surface + ?Sized>(&self, surface: &mut S) -> Result<()> {
        let BoardConfig {
            corner_box,
            padding,
            cols,
            rows,
            unit_pixels: unit,
            ..
        } = self.config;
        let pitch = corner_box + self.geometry.tag_size;
        let side = corner_box * unit;

        with_saved(surface, |s| {
            for i in 0..=cols {
                for j in 0..=rows {
                    let x = padding + unit * (i * pitch);
                    let y = padding + unit * (j * pitch);
                    s.fill_rect(Rect::square(px(x), px(y), side), self.palette.background);
                }
            }
            Ok(())
        })
    }

    /// Grid first, then corners on top of it
    pub fn paint_board<S: Surface + ?Sized>(&self, surface: &mut S) -> Result<()> {
        self.paint_grid(surface)?;
        self.paint_corners(surface)
    }
}

// Callers only pass values bounded by the canvas size checked in `new`
fn px(value: u32) -> i32 {
    value as i32
}
