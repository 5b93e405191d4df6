use bevy_math::IVec2;

/// The number of grid moves available to the robot at each expansion.
pub const NUM_DIRECTIONS: usize = 8;

/// `(dx, dy)` for each direction index, in the fixed order the output
/// contract requires. A planned path is returned as a sequence of these
/// indices, so this ordering must never change.
pub const DIRECTION_VECTORS: [IVec2; NUM_DIRECTIONS] = [
    IVec2::new(-1, -1),
    IVec2::new(-1, 0),
    IVec2::new(-1, 1),
    IVec2::new(0, -1),
    IVec2::new(0, 1),
    IVec2::new(1, -1),
    IVec2::new(1, 0),
    IVec2::new(1, 1),
];

/// Movement cost for direction `dir`: `1` for a cardinal move, `sqrt(2)`
/// for a diagonal one.
#[inline]
#[must_use]
pub fn movement_cost(dir: usize) -> f64 {
    let v = DIRECTION_VECTORS[dir];
    ((v.x * v.x + v.y * v.y) as f64).sqrt()
}

/// Apply direction `dir` to `point`.
#[inline]
#[must_use]
pub fn step(point: IVec2, dir: usize) -> IVec2 {
    point + DIRECTION_VECTORS[dir]
}

/// Returns true if direction `dir` is a cardinal move (cost `1`).
#[inline]
#[must_use]
pub fn is_cardinal(dir: usize) -> bool {
    matches!(dir, 1 | 3 | 4 | 6)
}

/// The speculation fanout for an incoming direction `a`: the set of
/// direction indices describing the "forward cone" explored while
/// running ahead along `a`. A diagonal incoming direction gets a 5-cell
/// cone; a cardinal incoming direction gets a 3-cell cone. The union
/// always contains `a` itself, so motion along the predicted direction
/// is itself prefetched.
#[inline]
#[must_use]
pub fn outer_dirs(a: usize) -> &'static [usize] {
    match a {
        0 => &[0, 1, 2, 3, 5],
        1 => &[0, 1, 2],
        2 => &[0, 1, 2, 4, 7],
        3 => &[0, 3, 5],
        4 => &[2, 4, 7],
        5 => &[0, 3, 5, 6, 7],
        6 => &[5, 6, 7],
        7 => &[2, 4, 5, 6, 7],
        _ => panic!("direction index out of range: {a}"),
    }
}
