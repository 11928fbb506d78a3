use std::collections::BTreeSet;

use crate::types::{PalletType, PlanItem, PlanRecord};

const MAX_WIDTH: f64 = 80.0;
const MAX_HEIGHT: f64 = 20.0;

/// Top-down view of a finalized pallet, one panel per distinct item base
/// height. Items with overage stretch the frame past the pallet's width.
pub fn render_pallet(kind: &PalletType, record: &PlanRecord) -> String {
    let layers: BTreeSet<u32> = record.items.iter().map(|i| i.position.z).collect();
    let mut result = String::new();
    if layers.is_empty() {
        result.push_str(&render_layer(kind, &[]));
        return result;
    }
    for z in layers {
        let items: Vec<&PlanItem> = record.items.iter().filter(|i| i.position.z == z).collect();
        result.push_str(&format!("z={z}\n"));
        result.push_str(&render_layer(kind, &items));
    }
    result
}

fn render_layer(kind: &PalletType, items: &[&PlanItem]) -> String {
    let extent_x = items
        .iter()
        .map(|i| i.position.x + i.dimensions.width)
        .max()
        .unwrap_or(0)
        .max(kind.width);
    let scale = f64::min(
        MAX_WIDTH / extent_x as f64,
        MAX_HEIGHT / kind.depth as f64,
    );
    let grid_w = (extent_x as f64 * scale).round() as usize;
    let grid_h = (kind.depth as f64 * scale).round() as usize;

    if grid_w == 0 || grid_h == 0 {
        return String::new();
    }

    let mut grid = vec![vec![' '; grid_w + 1]; grid_h + 1];

    // Pallet border first
    let pallet_w = (kind.width as f64 * scale).round() as usize;
    draw_rect(&mut grid, 0, 0, pallet_w, grid_h);

    for item in items {
        let sx = (item.position.x as f64 * scale).round() as usize;
        let sy = (item.position.y as f64 * scale).round() as usize;
        let sw = (item.dimensions.width as f64 * scale).round() as usize;
        let sh = (item.dimensions.depth as f64 * scale).round() as usize;

        if sw == 0 || sh == 0 {
            continue;
        }

        draw_rect(&mut grid, sx, sy, sw, sh);

        let label = item.box_id.to_string();
        let label_chars: Vec<char> = label.chars().collect();

        if sw > 2 && sh > 0 {
            let cx = sx + sw / 2;
            let cy = sy + sh / 2;
            let start_x = cx.saturating_sub(label_chars.len() / 2);

            for (i, &ch) in label_chars.iter().enumerate() {
                let x = start_x + i;
                if x > sx && x < sx + sw && cy > sy && cy < sy + sh {
                    grid[cy][x] = ch;
                }
            }
        }
    }

    let mut result = String::new();
    for row in &grid {
        let line: String = row.iter().collect();
        result.push_str(line.trim_end());
        result.push('\n');
    }
    result
}

fn edge(existing: char, line: char, crossing: char) -> char {
    if existing == crossing || existing == '+' {
        '+'
    } else {
        line
    }
}

#[allow(clippy::needless_range_loop)]
fn draw_rect(grid: &mut [Vec<char>], x: usize, y: usize, w: usize, h: usize) {
    let rows = grid.len();
    let cols = if rows > 0 { grid[0].len() } else { return };

    for i in x..=x + w {
        if i >= cols {
            break;
        }
        if y < rows {
            grid[y][i] = edge(grid[y][i], '-', '|');
        }
        if y + h < rows {
            grid[y + h][i] = edge(grid[y + h][i], '-', '|');
        }
    }

    for j in y..=y + h {
        if j >= rows {
            break;
        }
        if x < cols {
            grid[j][x] = edge(grid[j][x], '|', '-');
        }
        if x + w < cols {
            grid[j][x + w] = edge(grid[j][x + w], '|', '-');
        }
    }

    for &cx in &[x, x + w] {
        for &cy in &[y, y + h] {
            if cy < rows && cx < cols {
                grid[cy][cx] = '+';
            }
        }
    }
}
