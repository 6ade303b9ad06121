use anyhow::{Context, Result};
use board_gen::decorations::{paint_drill_holes, paint_label, DrillHoleGuide, LabelStyle};
use board_gen::{BoardConfig, CodeTable, Color, ImageSurface, Palette, StaticCodeTable, Tag36h11, TagBoardLayout};
use clap::Parser;
use std::path::PathBuf;

mod pdf_generator;

use pdf_generator::PdfGenerator;

/// Generate printable calibration boards covered in AprilTag markers
#[derive(Parser, Debug)]
#[command(name = "board-gen")]
#[command(about = "Generate printable AprilTag calibration boards", long_about = None)]
struct Args {
    /// Output file path (.pdf for PDF, otherwise an image format by extension)
    #[arg(short, long, default_value = "tag_board.png")]
    output: String,

    /// TOML file with board parameters; flags below override it
    #[arg(long)]
    config: Option<PathBuf>,

    /// First tag ID on the board
    #[arg(long)]
    start_id: Option<u32>,

    /// Tag border thickness in cells
    #[arg(long)]
    border: Option<u32>,

    /// Corner box size in cells
    #[arg(long)]
    corner_box: Option<u32>,

    /// Blank margin around the board in pixels
    #[arg(long)]
    padding: Option<u32>,

    /// Number of tag columns
    #[arg(long)]
    cols: Option<u32>,

    /// Number of tag rows
    #[arg(long)]
    rows: Option<u32>,

    /// Pixels per cell
    #[arg(short, long)]
    unit_pixels: Option<u32>,

    /// JSON code table to use instead of the built-in 36h11 codes
    #[arg(long)]
    codes: Option<PathBuf>,

    /// Page and code-area color
    #[arg(long, default_value = "#ffffff")]
    foreground: Color,

    /// Border, zero-bit and corner box color
    #[arg(long, default_value = "#000000")]
    background: Color,

    /// Print the ID range on the board (requires --font)
    #[arg(long)]
    label: bool,

    /// Font file used for the label
    #[arg(long)]
    font: Option<PathBuf>,

    /// Add drill hole guide marks
    #[arg(long)]
    drill_holes: bool,

    /// Print resolution for PDF output
    #[arg(long, default_value = "300.0")]
    dpi: f32,
}

impl Args {
    fn board_config(&self) -> Result<BoardConfig> {
        let mut config = match &self.config {
            Some(path) => BoardConfig::from_toml_file(path)
                .with_context(|| format!("Failed to load board config {}", path.display()))?,
            None => BoardConfig::default(),
        };

        let overrides = [
            (self.start_id, &mut config.start_id),
            (self.border, &mut config.border),
            (self.corner_box, &mut config.corner_box),
            (self.padding, &mut config.padding),
            (self.cols, &mut config.cols),
            (self.rows, &mut config.rows),
            (self.unit_pixels, &mut config.unit_pixels),
        ];
        for (value, field) in overrides {
            if let Some(value) = value {
                *field = value;
            }
        }
        Ok(config)
    }
}

fn render<C: CodeTable>(args: &Args, config: BoardConfig, palette: Palette, codes: C) -> Result<()> {
    let layout = TagBoardLayout::new(config, palette, codes)?;
    let (width, height) = layout.canvas_size();
    println!("  Canvas: {}x{} px", width, height);
    println!("  Tag IDs: {} - {}", config.start_id, layout.last_id());

    let mut surface = ImageSurface::for_layout(&layout);
    if let Some(font) = &args.font {
        surface = surface.with_font(ImageSurface::load_font(font)?);
    }

    layout.paint_board(&mut surface)?;

    if args.label {
        if args.font.is_none() {
            anyhow::bail!("--label needs a font, pass one with --font");
        }
        paint_label(&mut surface, &layout, &LabelStyle::default())?;
    }
    if args.drill_holes {
        let guide = DrillHoleGuide::default();
        if width < guide.extent as u32 || height < guide.extent as u32 {
            eprintln!(
                "Warning: drill hole guides assume a {}px board, canvas is {}x{}",
                guide.extent, width, height
            );
        }
        paint_drill_holes(&mut surface, &guide)?;
    }

    let image = surface.into_image();
    if args.output.to_ascii_lowercase().ends_with(".pdf") {
        PdfGenerator::new("Tag Board", args.dpi).generate(&image, &args.output)?;
    } else {
        image
            .save(&args.output)
            .with_context(|| format!("Failed to write {}", args.output))?;
    }
    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();
    let config = args.board_config()?;
    let palette = Palette {
        foreground: args.foreground,
        background: args.background,
    };

    println!("Generating tag board:");
    println!("  Board: {}", config);
    println!("  Colors: {} on {}", palette.background, palette.foreground);
    println!("  Output: {}", args.output);

    match &args.codes {
        Some(path) => {
            let codes = StaticCodeTable::from_json_file(path)
                .with_context(|| format!("Failed to load code table {}", path.display()))?;
            println!("  Codes: {} ({} bits, {} tags)", codes.name(), codes.bits(), codes.len());
            render(&args, config, palette, codes)?;
        }
        None => render(&args, config, palette, Tag36h11::new())?,
    }

    println!("✓ Board generated successfully: {}", args.output);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flags_override_defaults() {
        let args = Args::parse_from(["board-gen", "--cols", "2", "--rows", "3", "--start-id", "4"]);
        let config = args.board_config().unwrap();
        assert_eq!(config.cols, 2);
        assert_eq!(config.rows, 3);
        assert_eq!(config.start_id, 4);
        assert_eq!(config.border, BoardConfig::default().border);
        assert_eq!(args.foreground, Color::WHITE);
    }

    #[test]
    fn test_flags_override_config_file() {
        let path = std::env::temp_dir().join("board_gen_args_test.toml");
        std::fs::write(&path, "cols = 5\nrows = 5\nunit_pixels = 4\n").unwrap();
        let args = Args::parse_from([
            "board-gen",
            "--config",
            path.to_str().unwrap(),
            "--rows",
            "1",
        ]);
        let config = args.board_config().unwrap();
        assert_eq!((config.cols, config.rows, config.unit_pixels), (5, 1, 4));
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_bad_color_rejected() {
        let result = Args::try_parse_from(["board-gen", "--foreground", "white"]);
        assert!(result.is_err());
    }
}
