use itertools::Itertools;

use crate::grid::{Grid, Node};
use crate::pipe::{Direction, PipeShape};
use crate::tracer::PipeLoop;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tile {
    Loop,
    Inside,
    Outside,
}

/// Sweeps one row of a loop-only grid from west to east.
///
/// Only loop pipes with a northern opening cross the sweep line; runs of
/// horizontal pipe between them do not change sides.
fn sweep_row(row: &[Node]) -> impl Iterator<Item = Tile> + '_ {
    row.iter().scan(false, |inside, node| {
        let tile = match node.shape {
            PipeShape::Empty if *inside => Tile::Inside,
            PipeShape::Empty => Tile::Outside,
            shape => {
                if shape.is_open(Direction::North) {
                    *inside = !*inside;
                }
                Tile::Loop
            }
        };
        Some(tile)
    })
}

/// Tells for every cell, row-major, whether it is on the loop or on which side of it.
///
/// Cells off the loop count as ground whatever they are drawn as.
#[tracing::instrument(skip_all)]
pub fn classify(grid: &Grid, pipe_loop: &PipeLoop) -> Vec<Tile> {
    let outline = grid.loop_only(pipe_loop);
    outline.rows().flat_map(sweep_row).collect()
}

/// Number of cells strictly enclosed by the loop.
#[tracing::instrument(skip_all)]
pub fn enclosed_tiles(grid: &Grid, pipe_loop: &PipeLoop) -> usize {
    let enclosed = classify(grid, pipe_loop)
        .into_iter()
        .filter(|tile| *tile == Tile::Inside)
        .count();
    tracing::debug!(enclosed, "swept grid");
    enclosed
}

/// Draws the loop with `I` on enclosed cells and `O` on every other cell.
pub fn render_classified(grid: &Grid, pipe_loop: &PipeLoop) -> String {
    let outline = grid.loop_only(pipe_loop);
    let tiles = classify(grid, pipe_loop);

    let rendered = outline
        .rows()
        .zip(tiles.chunks(outline.width()))
        .map(|(row, tiles)| {
            row.iter()
                .zip(tiles)
                .map(|(node, tile)| match tile {
                    Tile::Loop => node.symbol,
                    Tile::Inside => 'I',
                    Tile::Outside => 'O',
                })
                .collect::<String>()
        })
        .join("\n");
    rendered
}
