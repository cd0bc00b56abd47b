//! Legal slide enumeration.
//!
//! Slides are found in two passes over the empty cells:
//!
//! 1. For each empty cell, probe its four neighbours in up, down,
//!    left, right order. A single adjacent to the empty slides into
//!    it; a 1x2 pair whose long axis points at the empty slides one
//!    cell along that axis.
//! 2. If the two empties are adjacent they form a 2x1 (or 1x2) slot:
//!    a perpendicular pair or the goal piece flanking the slot slides
//!    sideways into it, provided the mover's footprint lines up with
//!    the slot exactly. Alignment is checked against the mover's
//!    anchor, not just the flanking marker.
//!
//! The order is fixed, so successor lists are deterministic for a
//! given board.

use klotski_core::{Board, Cell, HEIGHT, WIDTH};

/// One legal move: the anchor of the moving piece before and after.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Slide {
    pub from: (u8, u8),
    pub to: (u8, u8),
}

/// Enumerate every legal slide on `board`, in the canonical order.
pub fn legal_slides(board: &Board) -> Vec<Slide> {
    let mut slides = Vec::with_capacity(8);
    let [a, b] = board.empties();

    for &(x, y) in &[a, b] {
        scan_around_empty(board, x, y, &mut slides);
    }
    scan_empty_pair(board, a, b, &mut slides);

    slides
}

/// Pass 1: singles and long-axis pair slides into one empty cell.
fn scan_around_empty(board: &Board, x: u8, y: u8, out: &mut Vec<Slide>) {
    let (xi, yi) = (x as usize, y as usize);

    // Above: a single drops down, or a vertical pair (its bottom half
    // directly above the empty) slides down one.
    if yi >= 1 {
        match board.cell(xi, yi - 1) {
            Cell::Single => out.push(Slide { from: (x, y - 1), to: (x, y) }),
            Cell::Bottom => out.push(Slide { from: (x, y - 2), to: (x, y - 1) }),
            _ => {}
        }
    }
    // Below: a single rises, or a vertical pair (its top half directly
    // below the empty) slides up one. Both movers are anchored at the
    // cell below the empty.
    if yi + 1 < HEIGHT {
        match board.cell(xi, yi + 1) {
            Cell::Single | Cell::Top => out.push(Slide { from: (x, y + 1), to: (x, y) }),
            _ => {}
        }
    }
    // Left: a single or a horizontal pair slides right.
    if xi >= 1 {
        match board.cell(xi - 1, yi) {
            Cell::Single => out.push(Slide { from: (x - 1, y), to: (x, y) }),
            Cell::Right => out.push(Slide { from: (x - 2, y), to: (x - 1, y) }),
            _ => {}
        }
    }
    // Right: a single or a horizontal pair slides left. Both movers
    // are anchored at the cell right of the empty.
    if xi + 1 < WIDTH {
        match board.cell(xi + 1, yi) {
            Cell::Single | Cell::Left => out.push(Slide { from: (x + 1, y), to: (x, y) }),
            _ => {}
        }
    }
}

/// Pass 2: perpendicular pair and goal slides into an adjacent empty
/// pair. `a` precedes `b` in row-major order.
fn scan_empty_pair(board: &Board, a: (u8, u8), b: (u8, u8), out: &mut Vec<Slide>) {
    let goal = *board.goal();
    let (x, y) = a;

    if b == (x, y + 1) {
        // Vertical 1x2 slot. A vertical pair or the goal to either
        // side slides horizontally into it.
        if x >= 1 && board.cell(x as usize - 1, y as usize) == Cell::Top {
            out.push(Slide { from: (x - 1, y), to: (x, y) });
        }
        if x >= 2 && (goal.x, goal.y) == (x - 2, y) {
            out.push(Slide { from: (x - 2, y), to: (x - 1, y) });
        }
        if (x as usize) + 1 < WIDTH && board.cell(x as usize + 1, y as usize) == Cell::Top {
            out.push(Slide { from: (x + 1, y), to: (x, y) });
        }
        if (goal.x, goal.y) == (x + 1, y) {
            out.push(Slide { from: (x + 1, y), to: (x, y) });
        }
    } else if b == (x + 1, y) {
        // Horizontal 2x1 slot. A horizontal pair or the goal above or
        // below slides vertically into it.
        if y >= 1 && board.cell(x as usize, y as usize - 1) == Cell::Left {
            out.push(Slide { from: (x, y - 1), to: (x, y) });
        }
        if y >= 2 && (goal.x, goal.y) == (x, y - 2) {
            out.push(Slide { from: (x, y - 2), to: (x, y - 1) });
        }
        if (y as usize) + 1 < HEIGHT && board.cell(x as usize, y as usize + 1) == Cell::Left {
            out.push(Slide { from: (x, y + 1), to: (x, y) });
        }
        if (goal.x, goal.y) == (x, y + 1) {
            out.push(Slide { from: (x, y + 1), to: (x, y) });
        }
    }
}

/// Apply `slide` to `board`, producing the successor position.
///
/// The slide must come from [`legal_slides`] on the same board; a
/// rejected rebuild means the generator and the rules disagree, which
/// is a bug, not an input error.
pub fn apply_slide(board: &Board, slide: Slide) -> Board {
    let mut pieces = board.pieces().to_vec();
    let piece = pieces
        .iter_mut()
        .find(|p| (p.x, p.y) == slide.from)
        .expect("slide names a piece anchor present on the board");
    piece.x = slide.to.0;
    piece.y = slide.to.1;
    let next = Board::new(pieces).expect("legal slide must produce a valid board");
    debug_assert_eq!(next.pieces().len(), board.pieces().len());
    next
}

/// All successor boards of `board`, in the canonical slide order.
pub fn successors(board: &Board) -> Vec<Board> {
    legal_slides(board)
        .into_iter()
        .map(|slide| apply_slide(board, slide))
        .collect()
}
