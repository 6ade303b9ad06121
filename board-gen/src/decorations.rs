//! Optional artwork layered on top of a painted board
//!
//! Both decorations use fixed pixel coordinates meant for a square board
//! of `extent` pixels, as sent out for acrylic printing.

use crate::error::Result;
use crate::layout::TagBoardLayout;
use crate::surface::{with_saved, Rect, Surface};
use crate::tag_codes::CodeTable;
use tagboard_common::Color;

/// Placement of the ID range label
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LabelStyle {
    pub extent: i32,
    /// Font size in pixels
    pub size: f32,
    pub color: Color,
}

impl Default for LabelStyle {
    fn default() -> Self {
        Self {
            extent: 1000,
            size: 16.0,
            color: Color::BLACK,
        }
    }
}

/// Draw `ID: <first> - <last>` near the bottom-left corner
pub fn paint_label<S, C>(surface: &mut S, layout: &TagBoardLayout<C>, style: &LabelStyle) -> Result<()>
where
    S: Surface + ?Sized,
    C: CodeTable,
{
    let text = format!("ID: {} - {}", layout.config().start_id, layout.last_id());
    with_saved(surface, |s| {
        s.draw_text(30, style.extent - 30, style.size, &text, style.color)
    })
}

/// Drill hole guide marks for boards mounted with screws
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrillHoleGuide {
    pub extent: i32,
    pub radius: i32,
    pub color: Color,
}

impl Default for DrillHoleGuide {
    fn default() -> Self {
        Self {
            extent: 1000,
            radius: 1,
            color: Color::RED,
        }
    }
}

impl DrillHoleGuide {
    /// Hole centers: four per edge on a 200px pitch 25px in, then three per
    /// edge offset by 100px and 50px in
    pub fn centers(&self) -> Vec<(i32, i32)> {
        let far = |inset: i32| self.extent - inset;
        let mut centers = Vec::with_capacity(28);
        for i in 0..4 {
            let along = 200 + i * 200;
            centers.push((along, 25));
            centers.push((along, far(25)));
            centers.push((25, along));
            centers.push((far(25), along));
        }
        for i in 0..3 {
            let along = 300 + i * 200;
            centers.push((along, 50));
            centers.push((along, far(50)));
            centers.push((50, along));
            centers.push((far(50), along));
        }
        centers
    }
}

pub fn paint_drill_holes<S: Surface + ?Sized>(surface: &mut S, guide: &DrillHoleGuide) -> Result<()> {
    let diameter = (guide.radius * 2).max(0) as u32;
    with_saved(surface, |s| {
        for (x, y) in guide.centers() {
            let bounds = Rect::square(x - guide.radius, y - guide.radius, diameter);
            s.draw_ellipse(bounds, guide.color)?;
        }
        Ok(())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::BoardError;
    use crate::surface::{DrawCommand, RecordingSurface};
    use crate::tag_codes::Tag36h11;
    use tagboard_common::{BoardConfig, Palette};

    struct FillOnly {
        depth: usize,
    }

    impl Surface for FillOnly {
        fn save(&mut self) {
            self.depth += 1;
        }

        fn restore(&mut self) {
            self.depth -= 1;
        }

        fn translate(&mut self, _dx: i32, _dy: i32) {}

        fn fill_rect(&mut self, _rect: Rect, _color: Color) {}
    }

    #[test]
    fn test_label_text() {
        let config = BoardConfig {
            start_id: 2,
            cols: 3,
            rows: 3,
            ..BoardConfig::default()
        };
        let layout = TagBoardLayout::new(config, Palette::default(), Tag36h11::new()).unwrap();
        let mut surface = RecordingSurface::new();
        paint_label(&mut surface, &layout, &LabelStyle::default()).unwrap();

        assert_eq!(
            surface.commands(),
            &[DrawCommand::Text {
                x: 30,
                y: 970,
                size: 16.0,
                text: "ID: 2 - 10".to_string(),
                color: Color::BLACK,
            }]
        );
    }

    #[test]
    fn test_drill_hole_centers() {
        let centers = DrillHoleGuide::default().centers();
        assert_eq!(centers.len(), 28);
        assert_eq!(centers[0], (200, 25));
        assert_eq!(centers[1], (200, 975));
        assert!(centers.contains(&(975, 800)));
        assert!(centers.contains(&(700, 950)));
        assert!(centers.contains(&(50, 300)));
    }

    #[test]
    fn test_drill_holes_recorded() {
        let mut surface = RecordingSurface::new();
        paint_drill_holes(&mut surface, &DrillHoleGuide::default()).unwrap();
        assert_eq!(surface.commands().len(), 28);
        assert_eq!(
            surface.commands()[0],
            DrawCommand::Ellipse {
                bounds: Rect::square(199, 24, 2),
                color: Color::RED,
            }
        );
    }

    #[test]
    fn test_unsupported_surface() {
        let mut surface = FillOnly { depth: 0 };
        let result = paint_drill_holes(&mut surface, &DrillHoleGuide::default());
        assert!(matches!(result, Err(BoardError::Unsupported(_))));
        assert_eq!(surface.depth, 0);
    }
}
