// The expansion engine and priority frontier. Adapted in spirit from
// the min-heap tie-breaking of `pathfinding::SmallestCostHolder`
// (src/pathfinding.rs), extended with an insertion counter so equal
// (f, g) pairs still resolve deterministically.

use crate::cell_tables::CellTables;
use crate::direction::{movement_cost, outer_dirs, step, NUM_DIRECTIONS};
use crate::map::MapStore;
use crate::pool::WorkerPool;
use bevy_math::IVec2;
use std::cmp::Ordering;
use std::collections::BinaryHeap;
use std::sync::Arc;

type NodeIndex = u32;

struct Node {
    x: i32,
    y: i32,
    g: f64,
    parent: Option<NodeIndex>,
    incoming_dir: Option<usize>,
}

/// A min-heap entry ordered by `f`, breaking ties first on `g` (prefer
/// the less heuristic-inflated node) and finally on insertion order
/// (FIFO), pinning the tie-breaking the spec leaves open for
/// deterministic testing.
struct OpenEntry {
    f: f64,
    g: f64,
    insertion: u64,
    node: NodeIndex,
}

impl PartialEq for OpenEntry {
    fn eq(&self, other: &Self) -> bool {
        self.f == other.f && self.g == other.g && self.insertion == other.insertion
    }
}
impl Eq for OpenEntry {}

impl PartialOrd for OpenEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for OpenEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        // BinaryHeap is a max-heap; invert so the smallest (f, g,
        // insertion) tuple is popped first.
        match other.f.partial_cmp(&self.f).unwrap() {
            Ordering::Equal => match other.g.partial_cmp(&self.g).unwrap() {
                Ordering::Equal => other.insertion.cmp(&self.insertion),
                ord => ord,
            },
            ord => ord,
        }
    }
}

/// How a [`Search::plan`] call terminated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlanOutcome {
    /// The goal cell was popped and expanded.
    Reached,
    /// The open list emptied, or the expansion cap was hit, before the
    /// goal was reached. `path` is a reconstruction to whichever node
    /// was last popped — useful for debugging, not a meaningful plan.
    Exhausted,
}

/// The result of a [`Search::plan`] call.
#[derive(Debug, Clone)]
pub struct PlanResult {
    /// Direction indices (`0..8`) that, applied in order from the
    /// start, trace the planned trajectory.
    pub path: Vec<usize>,
    pub outcome: PlanOutcome,
    /// Cost of the path to the terminal (goal or last-popped) node.
    pub cost: f64,
    /// Number of nodes popped and expanded.
    pub expansions: u64,
}

/// The weighted A* expansion engine: owns the per-plan node arena, the
/// open list, the per-cell search state, and the worker pool that
/// evaluates [`MapStore::free`] collision checks on its behalf.
///
/// A `Search` is built once per [`MapStore`]/thread-count pair and can
/// run many [`Search::plan`] calls against it; per-cell buffers and the
/// worker pool are reused across calls.
pub struct Search {
    map: Arc<MapStore>,
    pool: WorkerPool,
    tables: CellTables,
    nodes: Vec<Node>,
}

impl Search {
    #[must_use]
    pub fn new(map: MapStore, threads: usize) -> Self {
        let tables = CellTables::new(map.width(), map.height());
        Self {
            map: Arc::new(map),
            pool: WorkerPool::new(threads),
            tables,
            nodes: Vec::new(),
        }
    }

    #[must_use]
    pub fn map(&self) -> &MapStore {
        &self.map
    }

    /// Plan a weighted-A* path from `start` to `goal`.
    ///
    /// # Panics
    ///
    /// Panics if `start` or `goal` is infeasible or occupied — a
    /// programmer error from the caller, not a plan-time outcome (§7).
    pub fn plan(
        &mut self,
        start: (i32, i32),
        goal: (i32, i32),
        weight: f64,
        speculation: bool,
        max_expansions: u64,
    ) -> PlanResult {
        assert!(weight >= 1.0, "heuristic weight must be >= 1, got {weight}");
        assert!(
            self.map.feasible(start.0, start.1) && self.map.free(start.0, start.1),
            "start point {start:?} is infeasible or occupied"
        );
        assert!(
            self.map.feasible(goal.0, goal.1) && self.map.free(goal.0, goal.1),
            "goal point {goal:?} is infeasible or occupied"
        );

        self.tables.begin_plan();
        self.nodes.clear();

        let goal_v = IVec2::new(goal.0, goal.1);
        let mut heap = BinaryHeap::with_capacity(512);
        let mut insertion: u64 = 0;

        let start_h = euclidean(IVec2::new(start.0, start.1), goal_v);
        self.nodes.push(Node {
            x: start.0,
            y: start.1,
            g: 0.0,
            parent: None,
            incoming_dir: None,
        });
        self.tables.set_g(start.0, start.1, 0.0);
        heap.push(OpenEntry {
            f: weight * start_h,
            g: 0.0,
            insertion,
            node: 0,
        });
        insertion += 1;

        let mut expansions: u64 = 0;
        let mut last_popped: NodeIndex = 0;
        let mut outcome = PlanOutcome::Exhausted;

        'main: loop {
            let Some(entry) = heap.pop() else {
                break 'main;
            };
            let node_index = entry.node;
            let (nx, ny) = (self.nodes[node_index as usize].x, self.nodes[node_index as usize].y);

            if self.tables.visited(nx, ny) {
                continue;
            }
            self.tables.set_visited(nx, ny);
            expansions += 1;
            last_popped = node_index;

            if expansions >= max_expansions {
                break 'main;
            }

            if (nx, ny) == goal {
                outcome = PlanOutcome::Reached;
                break 'main;
            }

            // Schedule neighbor checks.
            let mut local_handles: [Option<crate::handle::Handle>; NUM_DIRECTIONS] =
                Default::default();
            let mut outstanding = 0usize;
            for d in 0..NUM_DIRECTIONS {
                let p = step(IVec2::new(nx, ny), d);
                if !self.map.feasible(p.x, p.y) || self.tables.visited(p.x, p.y) {
                    continue;
                }
                if !self.tables.scoreboarded(p.x, p.y) {
                    let map = self.map.clone();
                    local_handles[d] = Some(self.pool.submit(move || map.free(p.x, p.y)));
                    outstanding += 1;
                }
            }

            // Speculate ahead of the frontier along the incoming direction.
            if speculation && outstanding > 0 {
                if let Some(a) = self.nodes[node_index as usize].incoming_dir {
                    let mut budget = self.pool.max_count() as i64 - outstanding as i64;
                    let mut cursor = IVec2::new(nx, ny);
                    while budget > 0 {
                        cursor = step(cursor, a);
                        if !self.map.feasible(cursor.x, cursor.y) {
                            break;
                        }
                        for &d in outer_dirs(a) {
                            let np = step(cursor, d);
                            if !self.map.feasible(np.x, np.y)
                                || self.tables.visited(np.x, np.y)
                                || self.tables.scoreboarded(np.x, np.y)
                            {
                                continue;
                            }
                            let map = self.map.clone();
                            let handle = self.pool.submit(move || map.free(np.x, np.y));
                            self.tables.set_scoreboard(np.x, np.y, handle);
                            budget -= 1;
                            if budget == 0 {
                                break;
                            }
                        }
                    }
                }
            }

            // Collect results and relax surviving neighbors.
            let current_g = self.nodes[node_index as usize].g;
            for d in 0..NUM_DIRECTIONS {
                let p = step(IVec2::new(nx, ny), d);
                if !self.map.feasible(p.x, p.y) || self.tables.visited(p.x, p.y) {
                    continue;
                }
                let free = match local_handles[d].take() {
                    Some(handle) => handle.get(),
                    None => self.tables.handle(p.x, p.y).get(),
                };
                if !free {
                    continue;
                }

                let g_new = current_g + movement_cost(d);
                if g_new < self.tables.g(p.x, p.y) {
                    self.tables.set_g(p.x, p.y, g_new);
                    let h = euclidean(p, goal_v);
                    let f_new = g_new + weight * h;
                    let new_index = self.nodes.len() as NodeIndex;
                    self.nodes.push(Node {
                        x: p.x,
                        y: p.y,
                        g: g_new,
                        parent: Some(node_index),
                        incoming_dir: Some(d),
                    });
                    heap.push(OpenEntry {
                        f: f_new,
                        g: g_new,
                        insertion,
                        node: new_index,
                    });
                    insertion += 1;
                }
            }
        }

        let cost = self.nodes[last_popped as usize].g;
        let path = self.reconstruct(last_popped);

        PlanResult {
            path,
            outcome,
            cost,
            expansions,
        }
    }

    fn reconstruct(&self, mut node_index: NodeIndex) -> Vec<usize> {
        let mut dirs = Vec::new();
        loop {
            let node = &self.nodes[node_index as usize];
            let Some(dir) = node.incoming_dir else {
                break;
            };
            dirs.push(dir);
            node_index = node.parent.expect("non-start node always has a parent");
        }
        dirs.reverse();
        dirs
    }
}

#[inline]
fn euclidean(a: IVec2, b: IVec2) -> f64 {
    let dx = (a.x - b.x) as f64;
    let dy = (a.y - b.y) as f64;
    (dx * dx + dy * dy).sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Rectangle;

    fn open_map(height: u32, width: u32) -> MapStore {
        MapStore::new(height, width, 0, 0, Vec::new())
    }

    #[test]
    fn trivial_diagonal_path() {
        let map = open_map(10, 10);
        let mut search = Search::new(map, 1);
        let result = search.plan((0, 0), (5, 5), 1.0, false, 10_000);
        assert_eq!(result.outcome, PlanOutcome::Reached);
        assert_eq!(result.path, vec![7; 5]);
        assert!((result.cost - 5.0 * std::f64::consts::SQRT_2).abs() < 1e-9);
    }

    #[test]
    fn start_equals_goal_returns_empty_path_after_one_expansion() {
        let map = open_map(10, 10);
        let mut search = Search::new(map, 1);
        let result = search.plan((3, 3), (3, 3), 1.0, false, 10_000);
        assert_eq!(result.outcome, PlanOutcome::Reached);
        assert!(result.path.is_empty());
        assert_eq!(result.expansions, 1);
    }

    #[test]
    fn unreachable_goal_terminates_by_exhaustion() {
        // A robot footprint of 1x1 is enough for a single-cell-thick
        // obstacle to register as a collision at exactly its own cells.
        let map = MapStore::new(10, 10, 1, 1, vec![Rectangle::new(0, 4, 10, 2)]);
        let mut search = Search::new(map, 1);
        let result = search.plan((0, 0), (0, 8), 1.0, false, 10_000);
        assert_eq!(result.outcome, PlanOutcome::Exhausted);
        assert!(result.expansions <= 10_000);
    }

    #[test]
    fn wall_detour_costs_more_than_direct_euclidean() {
        let map = MapStore::new(20, 20, 1, 1, vec![Rectangle::new(5, 0, 1, 15)]);
        let mut search = Search::new(map, 1);
        let result = search.plan((0, 10), (15, 10), 1.0, false, 10_000);
        assert_eq!(result.outcome, PlanOutcome::Reached);
        let direct = euclidean(IVec2::new(0, 10), IVec2::new(15, 10));
        assert!(result.cost > direct);
        assert!(result.cost > 15.0);
    }

    #[test]
    fn determinism_across_repeated_plans() {
        let map = open_map(10, 10);
        let mut search = Search::new(map, 1);
        let first = search.plan((0, 0), (5, 5), 1.0, false, 10_000).path;
        for _ in 0..9 {
            let again = search.plan((0, 0), (5, 5), 1.0, false, 10_000).path;
            assert_eq!(first, again);
        }
    }

    #[test]
    fn speculation_does_not_change_path_cost() {
        let map_for = || MapStore::new(20, 20, 1, 1, vec![Rectangle::new(5, 0, 1, 15)]);

        let mut seq = Search::new(map_for(), 1);
        let baseline = seq.plan((0, 10), (15, 10), 1.0, false, 10_000);

        let mut parallel_no_spec = Search::new(map_for(), 4);
        let r2 = parallel_no_spec.plan((0, 10), (15, 10), 1.0, false, 10_000);

        let mut parallel_spec = Search::new(map_for(), 4);
        let r3 = parallel_spec.plan((0, 10), (15, 10), 1.0, true, 10_000);

        assert_eq!(baseline.cost, r2.cost);
        assert_eq!(baseline.cost, r3.cost);
    }

    #[test]
    #[should_panic(expected = "infeasible or occupied")]
    fn occupied_start_is_a_precondition_violation() {
        let map = MapStore::new(10, 10, 1, 1, vec![Rectangle::new(0, 0, 1, 1)]);
        let mut search = Search::new(map, 1);
        search.plan((0, 0), (5, 5), 1.0, false, 10_000);
    }
}
