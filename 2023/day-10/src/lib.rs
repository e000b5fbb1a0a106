pub mod enclosure;
pub mod error;
pub mod grid;
pub mod part1;
pub mod part2;
pub mod pipe;
pub mod tracer;

use crate::error::AnalysisError;
use crate::grid::Grid;
use crate::tracer::PipeLoop;

/// Both answers for one grid, only ever produced together.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Analysis {
    /// Steps from the start to the farthest point of the loop.
    pub farthest_distance: usize,
    /// Cells strictly enclosed by the loop.
    pub enclosed_tiles: usize,
}

impl Analysis {
    pub fn of(grid: &Grid) -> Result<Self, AnalysisError> {
        let pipe_loop = PipeLoop::trace(grid)?;
        let farthest_distance = tracer::farthest_distance(grid, &pipe_loop)?;
        let enclosed_tiles = enclosure::enclosed_tiles(grid, &pipe_loop);

        Ok(Self {
            farthest_distance,
            enclosed_tiles,
        })
    }
}

#[tracing::instrument(skip(input))]
pub fn analyze(input: &str) -> Result<Analysis, AnalysisError> {
    Analysis::of(&Grid::parse(input)?)
}

pub fn analyze_lines<I, S>(lines: I) -> Result<Analysis, AnalysisError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    Analysis::of(&Grid::from_lines(lines)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::error::{IncompleteLoop, MalformedInput};

    #[test]
    fn it_reports_both_answers() -> miette::Result<()> {
        let input = "..F7.
.FJ|.
SJ.L7
|F--J
LJ...";
        let expected = Analysis {
            farthest_distance: 8,
            enclosed_tiles: 1,
        };
        assert_eq!(expected, analyze(input)?);
        assert_eq!(expected, analyze_lines(input.lines())?);
        Ok(())
    }

    #[test]
    fn the_smallest_loop_encloses_nothing() -> miette::Result<()> {
        let expected = Analysis {
            farthest_distance: 2,
            enclosed_tiles: 0,
        };
        assert_eq!(expected, analyze_lines(["S7", "LJ"])?);
        Ok(())
    }

    #[test]
    fn it_needs_a_start() {
        let input = "F-7.F7
L-J.LJ";
        assert!(matches!(
            analyze(input),
            Err(AnalysisError::MalformedInput(MalformedInput::MissingStart))
        ));
    }

    #[test]
    fn it_needs_a_closed_loop() {
        let input = ".....
.S-7.
...|.
.L-J.
.....";
        assert!(matches!(
            analyze(input),
            Err(AnalysisError::IncompleteLoop(
                IncompleteLoop::UnresolvedStart { links: 1, .. }
            ))
        ));
    }
}
