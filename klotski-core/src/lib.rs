//! Hua Rong Dao (Klotski) board model with a bit-packed grid fingerprint.
//!
//! The board is a fixed 4-wide, 5-tall grid populated by one 2x2 goal
//! piece, 1x2 pieces in horizontal or vertical orientation, and 1x1
//! singles. Exactly two cells are empty at all times. The puzzle is
//! solved when the goal piece's top-left anchor reaches the target cell
//! `(1, 3)`, i.e. its footprint covers the bottom-centre 2x2 region.
//!
//! # Text format
//!
//! ```text
//! Marker  Cell
//! '.'     empty
//! '1'     goal piece (2x2 block of '1')
//! '2'     single 1x1 piece
//! '<' '>' left/right halves of a horizontal 1x2 piece
//! '^' 'v' top/bottom halves of a vertical 1x2 piece
//! ```
//!
//! Five lines of four markers each. Parsing and `Display` round-trip
//! exactly.
//!
//! # Fingerprint encoding (64-bit)
//!
//! ```text
//! 20 cells x 3 bits per cell, row-major, most significant first.
//! Cell codes: empty=0, goal=1, single=2, left=3, right=4, top=5,
//! bottom=6. Bits 60-63 are always zero.
//! ```
//!
//! The fingerprint is a pure function of the grid and is injective over
//! the seven-symbol cell alphabet, so it serves as the canonical
//! deduplication key for search.

use std::fmt::{self, Write as _};
use std::str::FromStr;

/// Board width in cells.
pub const WIDTH: usize = 4;
/// Board height in cells.
pub const HEIGHT: usize = 5;
/// Target anchor for the goal piece (column, row).
pub const TARGET: (u8, u8) = (1, 3);

/// Orientation of a 1x2 piece.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash)]
pub enum Orientation {
    Horizontal,
    Vertical,
}

/// Shape of a piece. The footprint is implied: `Goal` is 2x2, `Single`
/// is 1x1, and `Pair` is 1x2 along its orientation.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash)]
pub enum PieceKind {
    Goal,
    Single,
    Pair(Orientation),
}

/// A movable piece, identified by its kind and top-left anchor.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash)]
pub struct Piece {
    pub kind: PieceKind,
    /// Column of the top-left anchor (0-based).
    pub x: u8,
    /// Row of the top-left anchor (0-based).
    pub y: u8,
}

impl Piece {
    /// Create the 2x2 goal piece.
    #[inline]
    pub fn goal(x: u8, y: u8) -> Piece {
        Piece { kind: PieceKind::Goal, x, y }
    }

    /// Create a 1x1 single piece.
    #[inline]
    pub fn single(x: u8, y: u8) -> Piece {
        Piece { kind: PieceKind::Single, x, y }
    }

    /// Create a 1x2 piece with the given orientation.
    #[inline]
    pub fn pair(orientation: Orientation, x: u8, y: u8) -> Piece {
        Piece { kind: PieceKind::Pair(orientation), x, y }
    }

    #[inline]
    pub fn is_goal(&self) -> bool {
        self.kind == PieceKind::Goal
    }

    #[inline]
    pub fn is_single(&self) -> bool {
        self.kind == PieceKind::Single
    }

    /// Footprint width in cells.
    #[inline]
    pub fn width(&self) -> u8 {
        match self.kind {
            PieceKind::Goal | PieceKind::Pair(Orientation::Horizontal) => 2,
            PieceKind::Single | PieceKind::Pair(Orientation::Vertical) => 1,
        }
    }

    /// Footprint height in cells.
    #[inline]
    pub fn height(&self) -> u8 {
        match self.kind {
            PieceKind::Goal | PieceKind::Pair(Orientation::Vertical) => 2,
            PieceKind::Single | PieceKind::Pair(Orientation::Horizontal) => 1,
        }
    }

    /// Iterate over the cells covered by this piece, anchor first.
    pub fn cells(&self) -> impl Iterator<Item = (u8, u8)> {
        let (x, y) = (self.x, self.y);
        let (cells, len): ([(u8, u8); 4], usize) = match self.kind {
            PieceKind::Goal => ([(x, y), (x + 1, y), (x, y + 1), (x + 1, y + 1)], 4),
            PieceKind::Single => ([(x, y); 4], 1),
            PieceKind::Pair(Orientation::Horizontal) => ([(x, y), (x + 1, y), (x, y), (x, y)], 2),
            PieceKind::Pair(Orientation::Vertical) => ([(x, y), (x, y + 1), (x, y), (x, y)], 2),
        };
        cells.into_iter().take(len)
    }
}

/// One cell of the derived occupancy grid.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash)]
#[repr(u8)]
pub enum Cell {
    Empty = 0,
    Goal = 1,
    Single = 2,
    /// Left half of a horizontal 1x2 piece (the anchor cell).
    Left = 3,
    /// Right half of a horizontal 1x2 piece.
    Right = 4,
    /// Top half of a vertical 1x2 piece (the anchor cell).
    Top = 5,
    /// Bottom half of a vertical 1x2 piece.
    Bottom = 6,
}

impl Cell {
    /// The text marker for this cell.
    pub fn marker(self) -> char {
        match self {
            Cell::Empty => '.',
            Cell::Goal => '1',
            Cell::Single => '2',
            Cell::Left => '<',
            Cell::Right => '>',
            Cell::Top => '^',
            Cell::Bottom => 'v',
        }
    }

    /// 3-bit fingerprint code.
    #[inline]
    pub fn code(self) -> u64 {
        self as u64
    }

    #[inline]
    pub fn is_empty(self) -> bool {
        self == Cell::Empty
    }
}

/// A piece list that does not form a valid board.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum BoardError {
    /// A piece footprint extends past the board edge; the anchor is reported.
    OutOfBounds { x: u8, y: u8 },
    /// Two piece footprints claim the same cell.
    Overlap { x: u8, y: u8 },
    /// No 2x2 goal piece on the board.
    MissingGoal,
    /// More than one goal piece on the board.
    MultipleGoals,
    /// The pieces leave a number of empty cells other than two.
    BadEmptyCount { found: usize },
}

impl fmt::Display for BoardError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            BoardError::OutOfBounds { x, y } => {
                write!(f, "piece anchored at ({}, {}) extends past the board edge", x, y)
            }
            BoardError::Overlap { x, y } => {
                write!(f, "two pieces overlap at cell ({}, {})", x, y)
            }
            BoardError::MissingGoal => write!(f, "board has no 2x2 goal piece"),
            BoardError::MultipleGoals => write!(f, "board has more than one goal piece"),
            BoardError::BadEmptyCount { found } => {
                write!(f, "board has {} empty cells, expected exactly 2", found)
            }
        }
    }
}

impl std::error::Error for BoardError {}

/// Malformed text input. All variants name the offending cell or line.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum ParseError {
    /// Wrong number of lines.
    BadLineCount { found: usize },
    /// A line with a width other than four markers.
    BadLineWidth { line: usize, found: usize },
    /// A marker outside the recognized alphabet.
    UnknownMarker { marker: char, x: u8, y: u8 },
    /// A `<`/`>`/`^`/`v` half with no matching other half.
    StrayHalf { marker: char, x: u8, y: u8 },
    /// A `1` cell that does not start a full 2x2 block.
    MalformedGoal { x: u8, y: u8 },
    /// A `1` cell outside the footprint of the first goal block.
    DuplicateGoal { x: u8, y: u8 },
    /// The parsed pieces fail board validation.
    Board(BoardError),
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            ParseError::BadLineCount { found } => {
                write!(f, "expected {} lines, found {}", HEIGHT, found)
            }
            ParseError::BadLineWidth { line, found } => {
                write!(f, "line {} has {} markers, expected {}", line, found, WIDTH)
            }
            ParseError::UnknownMarker { marker, x, y } => {
                write!(f, "unknown marker '{}' at cell ({}, {})", marker, x, y)
            }
            ParseError::StrayHalf { marker, x, y } => {
                write!(f, "unmatched piece half '{}' at cell ({}, {})", marker, x, y)
            }
            ParseError::MalformedGoal { x, y } => {
                write!(f, "goal marker at ({}, {}) does not form a 2x2 block", x, y)
            }
            ParseError::DuplicateGoal { x, y } => {
                write!(f, "second goal piece at cell ({}, {})", x, y)
            }
            ParseError::Board(err) => err.fmt(f),
        }
    }
}

impl std::error::Error for ParseError {}

impl From<BoardError> for ParseError {
    fn from(err: BoardError) -> ParseError {
        ParseError::Board(err)
    }
}

/// An immutable board: a piece list plus the occupancy grid derived
/// from it.
///
/// The grid is rebuilt from the pieces on every construction and never
/// patched in place, so it can never go stale. A slide is performed by
/// editing a copy of the piece list and constructing a fresh board.
#[derive(Clone, Debug)]
pub struct Board {
    pieces: Vec<Piece>,
    grid: [[Cell; WIDTH]; HEIGHT],
    goal: usize,
}

impl Board {
    /// Build a board from a piece list, validating every invariant:
    /// footprints in bounds and pairwise disjoint, exactly one goal
    /// piece, exactly two empty cells.
    pub fn new(pieces: Vec<Piece>) -> Result<Board, BoardError> {
        let mut grid = [[Cell::Empty; WIDTH]; HEIGHT];
        let mut goal = None;

        for (idx, piece) in pieces.iter().enumerate() {
            if piece.x as usize + piece.width() as usize > WIDTH
                || piece.y as usize + piece.height() as usize > HEIGHT
            {
                return Err(BoardError::OutOfBounds { x: piece.x, y: piece.y });
            }
            if piece.is_goal() && goal.replace(idx).is_some() {
                return Err(BoardError::MultipleGoals);
            }
            for (cx, cy) in piece.cells() {
                let slot = &mut grid[cy as usize][cx as usize];
                if !slot.is_empty() {
                    return Err(BoardError::Overlap { x: cx, y: cy });
                }
                *slot = Self::footprint_cell(piece, cx, cy);
            }
        }

        let goal = goal.ok_or(BoardError::MissingGoal)?;

        let empty = grid.iter().flatten().filter(|c| c.is_empty()).count();
        if empty != 2 {
            return Err(BoardError::BadEmptyCount { found: empty });
        }

        Ok(Board { pieces, grid, goal })
    }

    /// The grid cell a piece contributes at `(cx, cy)` of its footprint.
    fn footprint_cell(piece: &Piece, cx: u8, cy: u8) -> Cell {
        match piece.kind {
            PieceKind::Goal => Cell::Goal,
            PieceKind::Single => Cell::Single,
            PieceKind::Pair(Orientation::Horizontal) => {
                if cx == piece.x {
                    Cell::Left
                } else {
                    Cell::Right
                }
            }
            PieceKind::Pair(Orientation::Vertical) => {
                if cy == piece.y {
                    Cell::Top
                } else {
                    Cell::Bottom
                }
            }
        }
    }

    #[inline]
    pub fn pieces(&self) -> &[Piece] {
        &self.pieces
    }

    /// The cell at column `x`, row `y`.
    #[inline]
    pub fn cell(&self, x: usize, y: usize) -> Cell {
        self.grid[y][x]
    }

    /// The goal piece. Validation guarantees exactly one exists.
    #[inline]
    pub fn goal(&self) -> &Piece {
        &self.pieces[self.goal]
    }

    /// The two empty cells, in row-major scan order.
    pub fn empties(&self) -> [(u8, u8); 2] {
        let mut out = [(0u8, 0u8); 2];
        let mut found = 0;
        for y in 0..HEIGHT {
            for x in 0..WIDTH {
                if self.grid[y][x].is_empty() {
                    out[found] = (x as u8, y as u8);
                    found += 1;
                    if found == 2 {
                        return out;
                    }
                }
            }
        }
        debug_assert_eq!(found, 2, "validated board must have two empty cells");
        out
    }

    /// Canonical 60-bit encoding of the grid, the search dedup key.
    pub fn fingerprint(&self) -> u64 {
        self.grid
            .iter()
            .flatten()
            .fold(0u64, |fp, cell| (fp << 3) | cell.code())
    }

    /// Whether the goal piece sits at the target anchor.
    #[inline]
    pub fn is_solved(&self) -> bool {
        let goal = self.goal();
        (goal.x, goal.y) == TARGET
    }
}

impl FromStr for Board {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Board, ParseError> {
        let rows: Vec<Vec<char>> = s
            .lines()
            .map(|line| line.trim_end_matches('\r').chars().collect())
            .collect();
        if rows.len() != HEIGHT {
            return Err(ParseError::BadLineCount { found: rows.len() });
        }
        for (y, row) in rows.iter().enumerate() {
            if row.len() != WIDTH {
                return Err(ParseError::BadLineWidth { line: y, found: row.len() });
            }
        }

        let mut pieces = Vec::new();
        let mut goal_anchor: Option<(u8, u8)> = None;

        for y in 0..HEIGHT {
            for x in 0..WIDTH {
                let marker = rows[y][x];
                let (xs, ys) = (x as u8, y as u8);
                match marker {
                    '.' => {}
                    '2' => pieces.push(Piece::single(xs, ys)),
                    '1' => match goal_anchor {
                        None => {
                            // Row-major scan, so the first '1' is the anchor.
                            let block = x + 1 < WIDTH
                                && y + 1 < HEIGHT
                                && rows[y][x + 1] == '1'
                                && rows[y + 1][x] == '1'
                                && rows[y + 1][x + 1] == '1';
                            if !block {
                                return Err(ParseError::MalformedGoal { x: xs, y: ys });
                            }
                            goal_anchor = Some((xs, ys));
                            pieces.push(Piece::goal(xs, ys));
                        }
                        Some((gx, gy)) => {
                            let inside = xs >= gx && xs <= gx + 1 && ys >= gy && ys <= gy + 1;
                            if !inside {
                                return Err(ParseError::DuplicateGoal { x: xs, y: ys });
                            }
                        }
                    },
                    '<' => {
                        if x + 1 >= WIDTH || rows[y][x + 1] != '>' {
                            return Err(ParseError::StrayHalf { marker, x: xs, y: ys });
                        }
                        pieces.push(Piece::pair(Orientation::Horizontal, xs, ys));
                    }
                    '>' => {
                        if x == 0 || rows[y][x - 1] != '<' {
                            return Err(ParseError::StrayHalf { marker, x: xs, y: ys });
                        }
                    }
                    '^' => {
                        if y + 1 >= HEIGHT || rows[y + 1][x] != 'v' {
                            return Err(ParseError::StrayHalf { marker, x: xs, y: ys });
                        }
                        pieces.push(Piece::pair(Orientation::Vertical, xs, ys));
                    }
                    'v' => {
                        if y == 0 || rows[y - 1][x] != '^' {
                            return Err(ParseError::StrayHalf { marker, x: xs, y: ys });
                        }
                    }
                    _ => return Err(ParseError::UnknownMarker { marker, x: xs, y: ys }),
                }
            }
        }

        Ok(Board::new(pieces)?)
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in &self.grid {
            for cell in row {
                f.write_char(cell.marker())?;
            }
            f.write_char('\n')?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// The classic opening configuration.
    const CLASSIC: &str = "^11^\nv11v\n^<>^\nv22v\n2..2\n";

    fn board(s: &str) -> Board {
        s.parse().expect("fixture must parse")
    }

    #[test]
    fn parse_classic_piece_census() {
        let b = board(CLASSIC);
        assert_eq!(b.pieces().len(), 10);
        assert_eq!(b.pieces().iter().filter(|p| p.is_goal()).count(), 1);
        assert_eq!(b.pieces().iter().filter(|p| p.is_single()).count(), 4);
        assert_eq!(
            b.pieces()
                .iter()
                .filter(|p| p.kind == PieceKind::Pair(Orientation::Vertical))
                .count(),
            4
        );
        assert_eq!(
            b.pieces()
                .iter()
                .filter(|p| p.kind == PieceKind::Pair(Orientation::Horizontal))
                .count(),
            1
        );
        assert_eq!(b.empties(), [(1, 4), (2, 4)]);
        assert_eq!((b.goal().x, b.goal().y), (1, 0));
    }

    #[test]
    fn display_round_trips_exactly() {
        let b = board(CLASSIC);
        assert_eq!(b.to_string(), CLASSIC);
        let again: Board = b.to_string().parse().unwrap();
        assert_eq!(again.fingerprint(), b.fingerprint());
    }

    #[test]
    fn round_trip_preserves_piece_set() {
        let b = board(CLASSIC);
        let again: Board = b.to_string().parse().unwrap();
        let mut lhs: Vec<Piece> = b.pieces().to_vec();
        let mut rhs: Vec<Piece> = again.pieces().to_vec();
        lhs.sort_by_key(|p| (p.y, p.x));
        rhs.sort_by_key(|p| (p.y, p.x));
        assert_eq!(lhs, rhs);
    }

    #[test]
    fn fingerprint_ignores_piece_order() {
        let b = board(CLASSIC);
        let mut reversed = b.pieces().to_vec();
        reversed.reverse();
        let other = Board::new(reversed).unwrap();
        assert_eq!(other.fingerprint(), b.fingerprint());
    }

    #[test]
    fn fingerprint_distinguishes_layouts() {
        let a = board(CLASSIC);
        // Slide the bottom-left single right by one.
        let mut pieces = a.pieces().to_vec();
        let single = pieces
            .iter_mut()
            .find(|p| p.is_single() && (p.x, p.y) == (0, 4))
            .unwrap();
        single.x = 1;
        let b = Board::new(pieces).unwrap();
        assert_ne!(a.fingerprint(), b.fingerprint());
    }

    #[test]
    fn fingerprint_fits_in_sixty_bits() {
        assert_eq!(board(CLASSIC).fingerprint() >> 60, 0);
    }

    #[test]
    fn solved_predicate_matches_target_anchor() {
        let solved = board("2222\n2222\n22..\n2112\n2112\n");
        assert!(solved.is_solved());
        assert!(!board(CLASSIC).is_solved());
    }

    #[test]
    fn rejects_unknown_marker() {
        let err = "x11^\nv11v\n^<>^\nv22v\n2..2\n".parse::<Board>().unwrap_err();
        assert_eq!(err, ParseError::UnknownMarker { marker: 'x', x: 0, y: 0 });
    }

    #[test]
    fn rejects_bad_line_count() {
        let err = "^11^\nv11v\n".parse::<Board>().unwrap_err();
        assert_eq!(err, ParseError::BadLineCount { found: 2 });
    }

    #[test]
    fn rejects_bad_line_width() {
        let err = "^11^\nv11v2\n^<>^\nv22v\n2..2\n".parse::<Board>().unwrap_err();
        assert_eq!(err, ParseError::BadLineWidth { line: 1, found: 5 });
    }

    #[test]
    fn rejects_stray_halves() {
        // 'v' in the top row has no '^' above it.
        let err = "v11^\n211v\n^<>^\nv22v\n2..2\n".parse::<Board>().unwrap_err();
        assert_eq!(err, ParseError::StrayHalf { marker: 'v', x: 0, y: 0 });

        // '<' at the right edge has no room for its '>'.
        let err = "211<\n2112\n2112\n2<>2\n2..2\n".parse::<Board>().unwrap_err();
        assert_eq!(err, ParseError::StrayHalf { marker: '<', x: 3, y: 0 });
    }

    #[test]
    fn rejects_malformed_goal() {
        let err = "1222\n2222\n2222\n2<>2\n2..2\n".parse::<Board>().unwrap_err();
        assert_eq!(err, ParseError::MalformedGoal { x: 0, y: 0 });
    }

    #[test]
    fn rejects_second_goal_block() {
        let err = "1122\n1122\n2211\n2211\n2..2\n".parse::<Board>().unwrap_err();
        assert_eq!(err, ParseError::DuplicateGoal { x: 2, y: 2 });
    }

    #[test]
    fn rejects_missing_goal() {
        let err = "2222\n2222\n2222\n2<>2\n2..2\n".parse::<Board>().unwrap_err();
        assert_eq!(err, ParseError::Board(BoardError::MissingGoal));
    }

    #[test]
    fn rejects_wrong_empty_count() {
        let err = "2222\n2222\n2..2\n211.\n2112\n".parse::<Board>().unwrap_err();
        assert_eq!(err, ParseError::Board(BoardError::BadEmptyCount { found: 3 }));
    }

    #[test]
    fn new_rejects_overlap_with_cell() {
        let pieces = vec![
            Piece::goal(0, 0),
            Piece::single(1, 1), // inside the goal footprint
        ];
        assert_eq!(Board::new(pieces).unwrap_err(), BoardError::Overlap { x: 1, y: 1 });
    }

    #[test]
    fn new_rejects_out_of_bounds_anchor() {
        assert_eq!(
            Board::new(vec![Piece::goal(3, 0)]).unwrap_err(),
            BoardError::OutOfBounds { x: 3, y: 0 }
        );
    }

    #[test]
    fn new_rejects_multiple_goals() {
        assert_eq!(
            Board::new(vec![Piece::goal(0, 0), Piece::goal(2, 2)]).unwrap_err(),
            BoardError::MultipleGoals
        );
    }

    #[test]
    fn piece_footprints() {
        let goal = Piece::goal(1, 2);
        assert_eq!(goal.cells().collect::<Vec<_>>(), vec![(1, 2), (2, 2), (1, 3), (2, 3)]);

        let single = Piece::single(3, 4);
        assert_eq!(single.cells().collect::<Vec<_>>(), vec![(3, 4)]);

        let h = Piece::pair(Orientation::Horizontal, 0, 1);
        assert_eq!(h.cells().collect::<Vec<_>>(), vec![(0, 1), (1, 1)]);

        let v = Piece::pair(Orientation::Vertical, 2, 0);
        assert_eq!(v.cells().collect::<Vec<_>>(), vec![(2, 0), (2, 1)]);
    }

    #[test]
    fn grid_markers_match_orientation() {
        let b = board(CLASSIC);
        assert_eq!(b.cell(0, 0), Cell::Top);
        assert_eq!(b.cell(0, 1), Cell::Bottom);
        assert_eq!(b.cell(1, 2), Cell::Left);
        assert_eq!(b.cell(2, 2), Cell::Right);
        assert_eq!(b.cell(1, 0), Cell::Goal);
        assert_eq!(b.cell(1, 4), Cell::Empty);
    }
}
