//! DFS and A* drivers over the slide graph.
//!
//! Both drivers share the same shape: pop a node, discard it if its
//! fingerprint was already expanded, test for the goal, otherwise push
//! every unvisited successor. They differ only in the frontier
//! discipline. Dedup happens at both push and pop time so a
//! fingerprint is expanded at most once regardless of how many paths
//! reach it.

use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashSet};
use std::rc::Rc;
use std::sync::atomic::{AtomicBool, Ordering as AtomicOrdering};

use klotski_core::{Board, TARGET};
use xxhash_rust::xxh64::Xxh64Builder;

use crate::movegen::successors;
use crate::stats::SearchStats;

/// How many pops between interrupt-flag checks.
const INTERRUPT_MASK: u64 = 0xFFF;

/// One search node. Immutable once created; parents are shared through
/// `Rc` so sibling subtrees can hang off the same prefix.
pub struct Node {
    pub board: Board,
    /// Frontier priority: 0 for DFS, `g + h` for A*.
    pub cost: u32,
    /// Slides from the root.
    pub depth: u32,
    pub parent: Option<Rc<Node>>,
}

/// Terminal result of a search run.
pub enum Outcome {
    /// The goal node; walk its parents for the path.
    Solved(Rc<Node>),
    /// The reachable component holds no solved position.
    Exhausted,
    /// The interrupt flag was raised mid-search.
    Interrupted,
}

impl Outcome {
    pub fn label(&self) -> &'static str {
        match self {
            Outcome::Solved(_) => "solved",
            Outcome::Exhausted => "exhausted",
            Outcome::Interrupted => "interrupted",
        }
    }
}

/// Manhattan distance from the goal piece's anchor to the target
/// anchor. Admissible: every slide moves the goal at most one cell.
pub fn manhattan(board: &Board) -> u32 {
    let goal = board.goal();
    (goal.x.abs_diff(TARGET.0) + goal.y.abs_diff(TARGET.1)) as u32
}

/// Heap entry ordered as a min-heap on cost, FIFO among equal costs
/// via a monotone insertion sequence number.
struct QueueEntry {
    cost: u32,
    seq: u64,
    node: Rc<Node>,
}

impl PartialEq for QueueEntry {
    fn eq(&self, other: &Self) -> bool {
        self.cost == other.cost && self.seq == other.seq
    }
}

impl Eq for QueueEntry {}

impl PartialOrd for QueueEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for QueueEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reversed: BinaryHeap is a max-heap, we want the cheapest
        // (and among ties, the earliest-pushed) entry on top.
        other
            .cost
            .cmp(&self.cost)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

/// Search state shared by both drivers: the visited set and counters.
pub struct Searcher {
    pub stats: SearchStats,
    visited: HashSet<u64, Xxh64Builder>,
}

impl Searcher {
    pub fn new(log_interval_secs: u64) -> Searcher {
        Searcher {
            stats: SearchStats::new(log_interval_secs),
            visited: HashSet::with_hasher(Xxh64Builder::new(0)),
        }
    }

    /// Depth-first search. Finds a solution, not necessarily the
    /// shortest one.
    pub fn dfs(&mut self, start: Board, running: &AtomicBool) -> Outcome {
        let root = Rc::new(Node { board: start, cost: 0, depth: 0, parent: None });
        let mut stack = vec![root];
        let mut pops: u64 = 0;

        while let Some(node) = stack.pop() {
            pops += 1;
            if pops & INTERRUPT_MASK == 0 {
                if !running.load(AtomicOrdering::SeqCst) {
                    return Outcome::Interrupted;
                }
                self.stats.maybe_log_progress(stack.len());
            }

            if !self.visited.insert(node.board.fingerprint()) {
                self.stats.duplicate_pops += 1;
                continue;
            }
            self.stats.expanded += 1;
            self.stats.max_depth = self.stats.max_depth.max(node.depth);

            if node.board.is_solved() {
                return Outcome::Solved(node);
            }

            for board in successors(&node.board) {
                if self.visited.contains(&board.fingerprint()) {
                    continue;
                }
                stack.push(Rc::new(Node {
                    board,
                    cost: 0,
                    depth: node.depth + 1,
                    parent: Some(Rc::clone(&node)),
                }));
                self.stats.generated += 1;
            }
            self.stats.max_frontier = self.stats.max_frontier.max(stack.len());
        }

        Outcome::Exhausted
    }

    /// A* with the Manhattan heuristic. The heuristic is consistent
    /// (unit edge costs, the goal anchor moves at most one cell per
    /// slide), so the first pop of the solved position is optimal.
    pub fn astar(&mut self, start: Board, running: &AtomicBool) -> Outcome {
        let h = manhattan(&start);
        let root = Rc::new(Node { board: start, cost: h, depth: 0, parent: None });
        let mut heap = BinaryHeap::new();
        let mut seq: u64 = 0;
        heap.push(QueueEntry { cost: root.cost, seq, node: root });
        let mut pops: u64 = 0;

        while let Some(entry) = heap.pop() {
            let node = entry.node;
            pops += 1;
            if pops & INTERRUPT_MASK == 0 {
                if !running.load(AtomicOrdering::SeqCst) {
                    return Outcome::Interrupted;
                }
                self.stats.maybe_log_progress(heap.len());
            }

            if !self.visited.insert(node.board.fingerprint()) {
                self.stats.duplicate_pops += 1;
                continue;
            }
            self.stats.expanded += 1;
            self.stats.max_depth = self.stats.max_depth.max(node.depth);

            if node.board.is_solved() {
                return Outcome::Solved(node);
            }

            for board in successors(&node.board) {
                if self.visited.contains(&board.fingerprint()) {
                    continue;
                }
                let depth = node.depth + 1;
                let cost = depth + manhattan(&board);
                seq += 1;
                let child = Rc::new(Node {
                    board,
                    cost,
                    depth,
                    parent: Some(Rc::clone(&node)),
                });
                heap.push(QueueEntry { cost, seq, node: child });
                self.stats.generated += 1;
            }
            self.stats.max_frontier = self.stats.max_frontier.max(heap.len());
        }

        Outcome::Exhausted
    }
}

/// Boards along the root-to-goal path, root first.
pub fn solution_path(goal: &Rc<Node>) -> Vec<Board> {
    let mut boards = Vec::with_capacity(goal.depth as usize + 1);
    let mut cursor = Some(goal);
    while let Some(node) = cursor {
        boards.push(node.board.clone());
        cursor = node.parent.as_ref();
    }
    boards.reverse();
    boards
}
