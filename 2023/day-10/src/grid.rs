use std::fmt;

use chumsky::prelude::*;
use glam::IVec2;

use crate::error::MalformedInput;
use crate::pipe::{connects, Direction, PipeShape};
use crate::tracer::PipeLoop;

/// Cell coordinates, `x` is the column and `y` the row.
pub type Point = IVec2;

/// Linear index of a node inside its [`Grid`], row-major.
pub type NodeId = usize;

/// One cell of the grid and the links it formed with its neighbours.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    pub position: Point,
    pub shape: PipeShape,
    /// The symbol as drawn in the input.
    pub symbol: char,
    links: [Option<NodeId>; 4],
}

impl Node {
    fn new(position: Point, shape: PipeShape) -> Self {
        Self {
            position,
            shape,
            symbol: shape.symbol(),
            links: [None; 4],
        }
    }

    fn ground(position: Point) -> Self {
        Self::new(position, PipeShape::Empty)
    }

    pub fn neighbor(&self, direction: Direction) -> Option<NodeId> {
        self.links[direction.index()]
    }

    /// Established links in canonical direction order.
    pub fn links(&self) -> impl Iterator<Item = (Direction, NodeId)> + '_ {
        Direction::ALL
            .into_iter()
            .filter_map(|direction| self.neighbor(direction).map(|id| (direction, id)))
    }

    pub fn degree(&self) -> usize {
        self.links.iter().flatten().count()
    }
}

/// Sets both halves of a link at once, so no half-formed link is ever observable.
fn link(
    node: &mut Node,
    node_id: NodeId,
    direction: Direction,
    other: &mut Node,
    other_id: NodeId,
) {
    node.links[direction.index()] = Some(other_id);
    other.links[direction.opposite().index()] = Some(node_id);
}

/// The full arrangement of nodes, owned in a single row-major arena.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    width: usize,
    height: usize,
    nodes: Vec<Node>,
    start: NodeId,
}

fn row_parser<'a>() -> impl Parser<'a, &'a str, Vec<PipeShape>, extra::Err<Rich<'a, char>>> {
    let cell = any().try_map(|symbol: char, span| {
        PipeShape::from_symbol(symbol)
            .ok_or_else(|| Rich::custom(span, format!("unexpected pipe symbol {symbol:?}")))
    });

    cell.repeated().collect()
}

/// Points at the first cell the row parser choked on.
fn invalid_symbol(row: usize, line: &str, errors: &[Rich<'_, char>]) -> MalformedInput {
    let offset = errors.first().map_or(0, |error| error.span().start);
    let column = line
        .get(..offset)
        .map_or(offset, |prefix| prefix.chars().count());
    let found = line
        .get(offset..)
        .and_then(|rest| rest.chars().next())
        .unwrap_or(char::REPLACEMENT_CHARACTER);

    MalformedInput::InvalidSymbol { row, column, found }
}

impl Grid {
    /// Parses a newline separated grid. Trailing newlines are ignored, a
    /// blank line inside the grid is a zero-width row.
    pub fn parse(input: &str) -> Result<Self, MalformedInput> {
        Self::from_lines(input.trim_end_matches(['\n', '\r']).lines())
    }

    /// Builds the linked grid from rows of pipe symbols.
    ///
    /// Rows are consumed top to bottom while only the previous row and the
    /// row in progress are open for linking. A cell links north or west as
    /// soon as it is created, provided both it and that neighbour open onto
    /// the shared side; its south and east links are written later by the
    /// cells that come after it.
    #[tracing::instrument(skip(lines))]
    pub fn from_lines<I, S>(lines: I) -> Result<Self, MalformedInput>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut nodes: Vec<Node> = Vec::new();
        let mut above: Vec<Node> = Vec::new();
        let mut start: Option<NodeId> = None;
        let mut width = 0;
        let mut height = 0;

        for (y, line) in lines.into_iter().enumerate() {
            let line = line.as_ref();
            let shapes = row_parser()
                .parse(line)
                .into_result()
                .map_err(|errors| invalid_symbol(y, line, &errors))?;

            if y == 0 {
                if shapes.is_empty() {
                    return Err(MalformedInput::EmptyGrid);
                }
                width = shapes.len();
            } else if shapes.len() != width {
                return Err(MalformedInput::RaggedRow {
                    row: y,
                    expected: width,
                    found: shapes.len(),
                });
            }

            let mut current: Vec<Node> = Vec::with_capacity(width);
            for (x, shape) in shapes.into_iter().enumerate() {
                let id = y * width + x;
                let mut node = Node::new(Point::new(x as i32, y as i32), shape);

                if shape == PipeShape::Start {
                    if let Some(first) = start {
                        return Err(MalformedInput::MultipleStarts {
                            first: Point::new((first % width) as i32, (first / width) as i32),
                            second: node.position,
                        });
                    }
                    start = Some(id);
                }

                if let Some(up) = above.get_mut(x) {
                    if connects(shape, Direction::North, up.shape) {
                        link(&mut node, id, Direction::North, up, id - width);
                    }
                }
                if let Some(left) = current.last_mut() {
                    if connects(shape, Direction::West, left.shape) {
                        link(&mut node, id, Direction::West, left, id - 1);
                    }
                }

                current.push(node);
            }

            nodes.append(&mut above);
            above = current;
            height += 1;
        }
        nodes.append(&mut above);

        if height == 0 {
            return Err(MalformedInput::EmptyGrid);
        }
        let start = start.ok_or(MalformedInput::MissingStart)?;

        tracing::debug!(width, height, start = %nodes[start].position, "parsed grid");

        Ok(Self {
            width,
            height,
            nodes,
            start,
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// A parsed grid always holds at least the start cell.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn start(&self) -> NodeId {
        self.start
    }

    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id]
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn rows(&self) -> impl Iterator<Item = &[Node]> + '_ {
        self.nodes.chunks(self.width)
    }

    pub fn id_at(&self, point: Point) -> Option<NodeId> {
        let x = usize::try_from(point.x).ok()?;
        let y = usize::try_from(point.y).ok()?;
        (x < self.width && y < self.height).then(|| y * self.width + x)
    }

    /// A copy of this grid holding nothing but the loop.
    ///
    /// Cells off the loop become ground with no links whatever they were drawn
    /// as, and the start takes the shape of the two sides the loop uses.
    pub fn loop_only(&self, pipe_loop: &PipeLoop) -> Self {
        let [first, second] = pipe_loop.start_sides();

        let nodes = self
            .nodes
            .iter()
            .enumerate()
            .map(|(id, node)| {
                if !pipe_loop.contains(id) {
                    return Node::ground(node.position);
                }
                let mut kept = node.clone();
                if id == self.start {
                    kept.shape = pipe_loop.start_shape();
                    kept.links = [None; 4];
                    kept.links[first.index()] = node.neighbor(first);
                    kept.links[second.index()] = node.neighbor(second);
                }
                kept
            })
            .collect();

        Self {
            width: self.width,
            height: self.height,
            nodes,
            start: self.start,
        }
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (y, row) in self.rows().enumerate() {
            if y > 0 {
                f.write_str("\n")?;
            }
            for node in row {
                write!(f, "{}", node.symbol)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use rstest::rstest;

    const SQUARE: &str = ".....
.S-7.
.|.|.
.L-J.
.....";

    const SQUARE_WITH_JUNK: &str = "-L|F7
7S-7|
L|7||
-L-J|
L|-JF";

    fn assert_links_symmetric(grid: &Grid) {
        for (id, node) in grid.nodes().iter().enumerate() {
            for (direction, other) in node.links() {
                assert_eq!(
                    Some(id),
                    grid.node(other).neighbor(direction.opposite()),
                    "{} links {direction} without a way back",
                    node.position
                );
                assert_eq!(
                    node.position + direction.offset(),
                    grid.node(other).position
                );
            }
        }
    }

    #[test]
    fn it_parses_dimensions_and_start() -> miette::Result<()> {
        let grid = Grid::parse(SQUARE)?;
        assert_eq!(5, grid.width());
        assert_eq!(5, grid.height());
        assert_eq!(25, grid.len());
        assert_eq!(Point::new(1, 1), grid.node(grid.start()).position);
        assert_eq!(PipeShape::Start, grid.node(grid.start()).shape);
        Ok(())
    }

    #[test]
    fn it_links_mutually_open_sides() -> miette::Result<()> {
        let grid = Grid::parse(SQUARE)?;
        let at = |x, y| grid.node(grid.id_at(Point::new(x, y)).unwrap());

        let start = at(1, 1);
        assert_eq!(grid.id_at(Point::new(2, 1)), start.neighbor(Direction::East));
        assert_eq!(grid.id_at(Point::new(1, 2)), start.neighbor(Direction::South));
        assert_eq!(None, start.neighbor(Direction::North));
        assert_eq!(None, start.neighbor(Direction::West));
        assert_eq!(2, at(3, 3).degree());
        assert_eq!(0, at(2, 2).degree());
        assert_links_symmetric(&grid);
        Ok(())
    }

    #[test]
    fn it_ignores_one_sided_openings() -> miette::Result<()> {
        // '-' above '|' and '|' beside '|' never link.
        let grid = Grid::parse("S-\n||")?;
        let below = grid.node(grid.id_at(Point::new(1, 1)).unwrap());
        assert_eq!(None, below.neighbor(Direction::North));
        assert_eq!(None, below.neighbor(Direction::West));
        assert_links_symmetric(&grid);
        Ok(())
    }

    #[test]
    fn it_keeps_links_symmetric_amongst_junk() -> miette::Result<()> {
        let grid = Grid::parse(SQUARE_WITH_JUNK)?;
        assert_links_symmetric(&grid);
        Ok(())
    }

    #[test]
    fn it_parses_deterministically() -> miette::Result<()> {
        assert_eq!(Grid::parse(SQUARE_WITH_JUNK)?, Grid::parse(SQUARE_WITH_JUNK)?);
        Ok(())
    }

    #[test]
    fn it_accepts_lines_directly() -> miette::Result<()> {
        let lines = SQUARE.lines().map(String::from).collect::<Vec<_>>();
        assert_eq!(Grid::parse(SQUARE)?, Grid::from_lines(&lines)?);
        Ok(())
    }

    #[test]
    fn it_renders_the_drawn_symbols() -> miette::Result<()> {
        let grid = Grid::parse(&format!("{SQUARE_WITH_JUNK}\n\n"))?;
        assert_eq!(SQUARE_WITH_JUNK, grid.to_string());
        Ok(())
    }

    #[rstest]
    #[case("", MalformedInput::EmptyGrid)]
    #[case("F-7\n|.|\nL-J", MalformedInput::MissingStart)]
    #[case("S-7\n|.\nL-J", MalformedInput::RaggedRow { row: 1, expected: 3, found: 2 })]
    #[case("S-7\n|x|\nL-J", MalformedInput::InvalidSymbol { row: 1, column: 1, found: 'x' })]
    #[case("S7\n\nLJ", MalformedInput::RaggedRow { row: 1, expected: 2, found: 0 })]
    #[case(
        "S-7\n|.|\nL-S",
        MalformedInput::MultipleStarts { first: Point::new(0, 0), second: Point::new(2, 2) }
    )]
    fn it_rejects_malformed_grids(#[case] input: &str, #[case] expected: MalformedInput) {
        assert_eq!(Err(expected), Grid::parse(input));
    }

    #[test]
    fn it_rejects_an_empty_first_line() {
        assert_eq!(
            Err(MalformedInput::EmptyGrid),
            Grid::from_lines(["", "S"])
        );
    }
}
