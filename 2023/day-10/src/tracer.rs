use bitvec::prelude::*;

use crate::error::IncompleteLoop;
use crate::grid::{Grid, NodeId};
use crate::pipe::{Direction, PipeShape};

/// Takes one step away from `at`, which was reached by moving towards `heading`.
///
/// Links are scanned in canonical order and the first one that does not
/// lead straight back is taken.
pub fn advance(
    grid: &Grid,
    at: NodeId,
    heading: Direction,
) -> Result<(NodeId, Direction), IncompleteLoop> {
    let node = grid.node(at);
    node.links()
        .find(|(direction, _)| *direction != heading.opposite())
        .map(|(direction, next)| (next, direction))
        .ok_or(IncompleteLoop::DeadEnd {
            position: node.position,
            heading,
        })
}

/// The hop off the start towards `heading`.
fn leave_start(grid: &Grid, heading: Direction) -> Result<(NodeId, Direction), IncompleteLoop> {
    let start = grid.node(grid.start());
    start
        .neighbor(heading)
        .map(|next| (next, heading))
        .ok_or(IncompleteLoop::DeadEnd {
            position: start.position,
            heading,
        })
}

/// Single cursor walk leaving the start in a given direction.
///
/// Yields every node reached together with the heading used to reach it and
/// stops after yielding the start again, or after the first error.
pub struct LoopWalk<'g> {
    grid: &'g Grid,
    cursor: Option<(NodeId, Direction)>,
    initial: Direction,
    steps: usize,
    finished: bool,
}

impl<'g> LoopWalk<'g> {
    pub fn new(grid: &'g Grid, heading: Direction) -> Self {
        Self {
            grid,
            cursor: None,
            initial: heading,
            steps: 0,
            finished: false,
        }
    }
}

impl Iterator for LoopWalk<'_> {
    type Item = Result<(NodeId, Direction), IncompleteLoop>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }

        let step = match self.cursor {
            None => leave_start(self.grid, self.initial),
            Some((at, _)) if self.steps > self.grid.len() => Err(IncompleteLoop::Unclosed {
                position: self.grid.node(at).position,
            }),
            Some((at, heading)) => advance(self.grid, at, heading),
        };
        self.steps += 1;

        match step {
            Ok((next, heading)) => {
                self.finished = next == self.grid.start();
                self.cursor = Some((next, heading));
            }
            Err(_) => self.finished = true,
        }
        Some(step)
    }
}

/// Walks the loop from the start towards `heading` and reports the side of
/// the start it comes back in through.
fn return_side(grid: &Grid, heading: Direction) -> Result<Direction, IncompleteLoop> {
    let mut last = heading;
    for step in LoopWalk::new(grid, heading) {
        (_, last) = step?;
    }
    Ok(last.opposite())
}

/// Finds the two sides of the start the loop actually runs through.
///
/// The start links on every side a neighbour opens towards it, so stray pipes
/// may hang off it. The first side in canonical order whose walk comes back
/// around is kept, together with the side that walk re-enters through.
pub fn resolve_start(grid: &Grid) -> Result<[Direction; 2], IncompleteLoop> {
    let start = grid.node(grid.start());
    let unresolved = IncompleteLoop::UnresolvedStart {
        position: start.position,
        links: start.degree(),
    };
    if start.degree() < 2 {
        return Err(unresolved);
    }

    let mut failure = None;
    for (heading, _) in start.links() {
        match return_side(grid, heading) {
            Ok(back) if back != heading => return Ok([heading, back]),
            Ok(_) => {}
            Err(error) => {
                tracing::trace!(%heading, %error, "start side does not close");
                failure.get_or_insert(error);
            }
        }
    }
    Err(failure.unwrap_or(unresolved))
}

/// The closed cycle through the start.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipeLoop {
    /// Loop members in walk order, beginning with the start.
    order: Vec<NodeId>,
    members: BitVec<usize, Lsb0>,
    start_sides: [Direction; 2],
    start_shape: PipeShape,
}

impl PipeLoop {
    #[tracing::instrument(skip(grid))]
    pub fn trace(grid: &Grid) -> Result<Self, IncompleteLoop> {
        let start_sides = resolve_start(grid)?;
        let start_shape = PipeShape::from_open_sides(start_sides[0], start_sides[1]).ok_or(
            IncompleteLoop::UnresolvedStart {
                position: grid.node(grid.start()).position,
                links: grid.node(grid.start()).degree(),
            },
        )?;

        let mut order = vec![grid.start()];
        let mut members = bitvec![usize, Lsb0; 0; grid.len()];
        members.set(grid.start(), true);

        for step in LoopWalk::new(grid, start_sides[0]) {
            let (id, _) = step?;
            if id == grid.start() {
                break;
            }
            order.push(id);
            members.set(id, true);
        }

        tracing::debug!(length = order.len(), start = ?start_shape, "traced loop");

        Ok(Self {
            order,
            members,
            start_sides,
            start_shape,
        })
    }

    /// Number of nodes on the loop.
    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn contains(&self, id: NodeId) -> bool {
        id < self.members.len() && self.members[id]
    }

    pub fn nodes(&self) -> &[NodeId] {
        &self.order
    }

    pub fn start_sides(&self) -> [Direction; 2] {
        self.start_sides
    }

    /// The pipe the start stands in for.
    pub fn start_shape(&self) -> PipeShape {
        self.start_shape
    }
}

/// Steps from the start to the point of the loop farthest away from it.
///
/// Two cursors leave the start through the two sides `pipe_loop` resolved
/// for it and advance in lock-step until they land on the same node.
#[tracing::instrument(skip_all)]
pub fn farthest_distance(grid: &Grid, pipe_loop: &PipeLoop) -> Result<usize, IncompleteLoop> {
    let [side_a, side_b] = pipe_loop.start_sides();
    let mut cursor_a = leave_start(grid, side_a)?;
    let mut cursor_b = leave_start(grid, side_b)?;
    let mut steps = 1;

    while cursor_a.0 != cursor_b.0 {
        if steps > grid.len() {
            return Err(IncompleteLoop::Unclosed {
                position: grid.node(cursor_a.0).position,
            });
        }
        cursor_a = advance(grid, cursor_a.0, cursor_a.1)?;
        cursor_b = advance(grid, cursor_b.0, cursor_b.1)?;
        steps += 1;
    }

    tracing::debug!(steps, meeting = %grid.node(cursor_a.0).position, "cursors met");
    Ok(steps)
}
