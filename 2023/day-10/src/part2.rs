use miette::*;

use crate::enclosure;
use crate::grid::Grid;
use crate::tracer::PipeLoop;

#[tracing::instrument]
pub fn process(input: &str) -> Result<String> {
    let grid = Grid::parse(input)?;
    let pipe_loop = PipeLoop::trace(&grid)?;

    tracing::debug!("loop and its sides:\n{}", enclosure::render_classified(&grid, &pipe_loop));

    let enclosed = enclosure::enclosed_tiles(&grid, &pipe_loop);
    Ok(enclosed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn it_works() -> Result<()> {
        let input = "FF7FSF7F7F7F7F7F---7
L|LJ||||||||||||F--J
FL-7LJLJ||||||LJL-77
F--JF--7||LJLJ7F7FJ-
L---JF-JLJ.||-FJLJJ7
|F|F-JF---7F7-L7L|7|
|FFJF7L7F-JF7|JL---7
7-L-JL7||F7|L7F-7F7|
L.L7LFJ|||||FJL7||LJ
L7JLJL-JLJLJL--JLJ.L";
        assert_eq!("10", process(input)?);
        Ok(())
    }
}
