use std::fmt;

use glam::IVec2;

/// A compass side of a cell.
///
/// The declaration order is the canonical order every traversal scans links in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Direction {
    North,
    East,
    South,
    West,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::North,
        Direction::East,
        Direction::South,
        Direction::West,
    ];

    pub fn opposite(self) -> Self {
        match self {
            Direction::North => Direction::South,
            Direction::East => Direction::West,
            Direction::South => Direction::North,
            Direction::West => Direction::East,
        }
    }

    /// Grid offset of one step in this direction, with rows growing southwards.
    pub fn offset(self) -> IVec2 {
        match self {
            Direction::North => IVec2::NEG_Y,
            Direction::East => IVec2::X,
            Direction::South => IVec2::Y,
            Direction::West => IVec2::NEG_X,
        }
    }

    /// Slot of this direction in a node's link table.
    pub(crate) fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Direction::North => "North",
            Direction::East => "East",
            Direction::South => "South",
            Direction::West => "West",
        };
        f.write_str(name)
    }
}

/// Classification of a single grid cell by the sides its pipe opens onto.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PipeShape {
    /// Ground, `.`
    #[default]
    Empty,
    /// `|`
    Vertical,
    /// `-`
    Horizontal,
    /// `L`
    NorthEast,
    /// `J`
    NorthWest,
    /// `7`
    SouthWest,
    /// `F`
    SouthEast,
    /// `S`, open on every side until the loop through it is resolved.
    Start,
}

impl PipeShape {
    /// Every drawable shape, in the order the symbol table lists them.
    pub const ALL: [PipeShape; 8] = [
        PipeShape::Empty,
        PipeShape::Vertical,
        PipeShape::Horizontal,
        PipeShape::NorthEast,
        PipeShape::NorthWest,
        PipeShape::SouthWest,
        PipeShape::SouthEast,
        PipeShape::Start,
    ];

    pub fn from_symbol(symbol: char) -> Option<Self> {
        match symbol {
            '.' => Some(PipeShape::Empty),
            '|' => Some(PipeShape::Vertical),
            '-' => Some(PipeShape::Horizontal),
            'L' => Some(PipeShape::NorthEast),
            'J' => Some(PipeShape::NorthWest),
            '7' => Some(PipeShape::SouthWest),
            'F' => Some(PipeShape::SouthEast),
            'S' => Some(PipeShape::Start),
            _ => None,
        }
    }

    pub fn symbol(self) -> char {
        match self {
            PipeShape::Empty => '.',
            PipeShape::Vertical => '|',
            PipeShape::Horizontal => '-',
            PipeShape::NorthEast => 'L',
            PipeShape::NorthWest => 'J',
            PipeShape::SouthWest => '7',
            PipeShape::SouthEast => 'F',
            PipeShape::Start => 'S',
        }
    }

    /// Sides this shape presents an opening on.
    ///
    /// `Start` reports all four sides: its real pair is only known once the
    /// loop through it has been traced.
    pub fn open_sides(self) -> &'static [Direction] {
        use Direction::*;

        match self {
            PipeShape::Empty => &[],
            PipeShape::Vertical => &[North, South],
            PipeShape::Horizontal => &[East, West],
            PipeShape::NorthEast => &[North, East],
            PipeShape::NorthWest => &[North, West],
            PipeShape::SouthWest => &[South, West],
            PipeShape::SouthEast => &[South, East],
            PipeShape::Start => &Direction::ALL,
        }
    }

    pub fn is_open(self, side: Direction) -> bool {
        self.open_sides().contains(&side)
    }

    /// The concrete pipe whose openings are exactly `a` and `b`, in either order.
    pub fn from_open_sides(a: Direction, b: Direction) -> Option<Self> {
        use Direction::*;

        let (a, b) = if a <= b { (a, b) } else { (b, a) };
        match (a, b) {
            (North, South) => Some(PipeShape::Vertical),
            (East, West) => Some(PipeShape::Horizontal),
            (North, East) => Some(PipeShape::NorthEast),
            (North, West) => Some(PipeShape::NorthWest),
            (South, West) => Some(PipeShape::SouthWest),
            (East, South) => Some(PipeShape::SouthEast),
            _ => None,
        }
    }
}

/// Whether a cell shaped `from` links to its neighbour shaped `to` lying in `direction`.
///
/// Both cells must open onto the shared boundary on their own; a one-sided
/// opening never links.
pub fn connects(from: PipeShape, direction: Direction, to: PipeShape) -> bool {
    from.is_open(direction) && to.is_open(direction.opposite())
}
