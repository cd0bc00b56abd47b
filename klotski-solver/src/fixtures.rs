//! Shared board fixtures for solver unit tests. Every layout is
//! hand-checked against the slide rules.

/// The classic opening ("heng dao li ma"). Goal at (1, 0), empties at
/// the bottom centre.
pub const CLASSIC: &str = "^11^\nv11v\n^<>^\nv22v\n2..2\n";

/// Already solved: goal anchored at the target (1, 3).
pub const SOLVED: &str = "2222\n2222\n22..\n2112\n2112\n";

/// One slide from solved: the empty pair sits under the goal at (1, 2).
pub const ONE_SLIDE: &str = "2222\n2222\n2112\n2112\n2..2\n";

/// Three slides from solved: the two empties must first be assembled
/// under the goal, then the goal drops.
pub const THREE_SLIDE: &str = "2222\n2222\n2112\n2112\n.22.\n";

/// A two-state component: the single at (3, 3) shuttles into the empty
/// at (3, 4) and back, and nothing else can move. Unsolvable.
pub const SHUTTLE: &str = "^<>2\nv.11\n<>11\n<>^2\n<>v.\n";

/// A vertical pair at (0, 0) can slide sideways into the vertically
/// adjacent empty pair at column 1.
pub const VPAIR_FLANK: &str = "^.22\nv.22\n1122\n1122\n2222\n";

/// The goal at (2, 0) can slide sideways into the vertically adjacent
/// empty pair at column 1.
pub const GOAL_FLANK: &str = "2.11\n2.11\n2222\n^222\nv222\n";
