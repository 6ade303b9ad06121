// Print one tag as text, using the same fill calls the board renderer makes
use anyhow::{Context, Result};
use board_gen::{BoardConfig, CodeTable, Palette, RecordingSurface, StaticCodeTable, Tag36h11, TagBoardLayout};
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "preview-tag")]
#[command(about = "Print the cell grid of a single tag", long_about = None)]
struct Args {
    /// Tag ID
    id: u32,

    /// Tag border thickness in cells
    #[arg(long, default_value = "1")]
    border: u32,

    /// JSON code table to use instead of the built-in 36h11 codes
    #[arg(long)]
    codes: Option<PathBuf>,
}

/// Cells of one painted tag, `true` where the foreground shows
fn cell_grid<C: CodeTable>(layout: &TagBoardLayout<C>, id: u32) -> Result<Vec<Vec<bool>>> {
    let side = layout.geometry().tag_size as usize;
    let foreground = layout.palette().foreground;

    let mut surface = RecordingSurface::new();
    layout.paint_tag(&mut surface, id, 0, 0)?;

    let mut grid = vec![vec![false; side]; side];
    for (rect, color) in surface.fills() {
        for y in rect.y..rect.y + rect.height as i32 {
            for x in rect.x..rect.x + rect.width as i32 {
                grid[y as usize][x as usize] = color == foreground;
            }
        }
    }
    Ok(grid)
}

fn preview<C: CodeTable>(args: &Args, codes: C) -> Result<()> {
    let config = BoardConfig {
        start_id: args.id,
        border: args.border,
        corner_box: 0,
        padding: 0,
        cols: 1,
        rows: 1,
        unit_pixels: 1,
    };
    let code = codes
        .code(args.id)
        .with_context(|| format!("Tag ID {} not found in {} table", args.id, codes.name()))?;
    let layout = TagBoardLayout::new(config, Palette::default(), codes)?;
    let grid = cell_grid(&layout, args.id)?;

    println!("Tag ID: {}", args.id);
    println!("Codeword: 0x{:016x} ({} bits)", code.value, code.bits);
    println!();
    for line in grid {
        let text: String = line.iter().map(|&white| if white { '░' } else { '█' }).collect();
        println!("{}", text);
    }
    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();
    match &args.codes {
        Some(path) => {
            let codes = StaticCodeTable::from_json_file(path)
                .with_context(|| format!("Failed to load code table {}", path.display()))?;
            preview(&args, codes)
        }
        None => preview(&args, Tag36h11::new()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use board_gen::Color;

    #[test]
    fn test_grid_follows_palette() {
        let config = BoardConfig {
            start_id: 0,
            border: 1,
            corner_box: 0,
            padding: 0,
            cols: 1,
            rows: 1,
            unit_pixels: 1,
        };
        let palette = Palette {
            foreground: Color::rgb(240, 230, 200),
            background: Color::rgb(10, 10, 40),
        };
        let codes = StaticCodeTable::new("test", 36, vec![(1 << 35) | 1]).unwrap();
        let layout = TagBoardLayout::new(config, palette, codes).unwrap();
        let grid = cell_grid(&layout, 0).unwrap();

        assert_eq!(grid.len(), 8);
        assert!(!grid[0][0]);
        assert!(grid[1][1]);
        assert!(!grid[1][2]);
        assert!(grid[6][6]);
        let lit: usize = grid.iter().map(|line| line.iter().filter(|&&c| c).count()).sum();
        assert_eq!(lit, 2);
    }
}
