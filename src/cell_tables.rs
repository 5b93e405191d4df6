use crate::handle::Handle;

/// Per-cell search state, sized to a map's actual `(height, width)`
/// rather than a fixed global maximum.
///
/// Every field is tagged with the plan "generation" that last wrote it.
/// [`CellTables::begin_plan`] just bumps a counter instead of
/// re-zeroing `O(height * width)` entries; each accessor lazily resets
/// a cell to its default (`g = +inf`, unvisited, unscoreboarded, no
/// handle) the first time that cell is touched in the new generation.
/// This keeps repeated planning against the same map (as the CLI's
/// `--num-tests` loop does) from paying for cells the search never
/// actually reaches.
pub(crate) struct CellTables {
    width: usize,
    generation: Vec<u32>,
    current_generation: u32,
    g: Vec<f64>,
    visited: Vec<bool>,
    scoreboard: Vec<bool>,
    handle: Vec<Option<Handle>>,
}

impl CellTables {
    pub(crate) fn new(width: u32, height: u32) -> Self {
        let len = width as usize * height as usize;
        Self {
            width: width as usize,
            generation: vec![0; len],
            current_generation: 0,
            g: vec![f64::INFINITY; len],
            visited: vec![false; len],
            scoreboard: vec![false; len],
            handle: vec![None; len],
        }
    }

    pub(crate) fn begin_plan(&mut self) {
        self.current_generation += 1;
    }

    #[inline]
    fn index(&self, x: i32, y: i32) -> usize {
        y as usize * self.width + x as usize
    }

    /// Reset a cell to its generation's defaults the first time it is
    /// touched this plan.
    #[inline]
    fn touch(&mut self, idx: usize) {
        if self.generation[idx] != self.current_generation {
            self.generation[idx] = self.current_generation;
            self.g[idx] = f64::INFINITY;
            self.visited[idx] = false;
            self.scoreboard[idx] = false;
            self.handle[idx] = None;
        }
    }

    pub(crate) fn g(&mut self, x: i32, y: i32) -> f64 {
        let idx = self.index(x, y);
        self.touch(idx);
        self.g[idx]
    }

    pub(crate) fn set_g(&mut self, x: i32, y: i32, value: f64) {
        let idx = self.index(x, y);
        self.touch(idx);
        self.g[idx] = value;
    }

    pub(crate) fn visited(&mut self, x: i32, y: i32) -> bool {
        let idx = self.index(x, y);
        self.touch(idx);
        self.visited[idx]
    }

    pub(crate) fn set_visited(&mut self, x: i32, y: i32) {
        let idx = self.index(x, y);
        self.touch(idx);
        self.visited[idx] = true;
    }

    pub(crate) fn scoreboarded(&mut self, x: i32, y: i32) -> bool {
        let idx = self.index(x, y);
        self.touch(idx);
        self.scoreboard[idx]
    }

    pub(crate) fn set_scoreboard(&mut self, x: i32, y: i32, handle: Handle) {
        let idx = self.index(x, y);
        self.touch(idx);
        self.scoreboard[idx] = true;
        self.handle[idx] = Some(handle);
    }

    pub(crate) fn handle(&mut self, x: i32, y: i32) -> Handle {
        let idx = self.index(x, y);
        self.touch(idx);
        self.handle[idx]
            .clone()
            .expect("scoreboard implies a stored handle")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_cell_defaults_to_unvisited_with_infinite_g() {
        let mut tables = CellTables::new(4, 4);
        tables.begin_plan();
        assert_eq!(tables.g(1, 1), f64::INFINITY);
        assert!(!tables.visited(1, 1));
        assert!(!tables.scoreboarded(1, 1));
    }

    #[test]
    fn generation_bump_resets_previously_written_cell() {
        let mut tables = CellTables::new(4, 4);
        tables.begin_plan();
        tables.set_g(2, 2, 3.5);
        tables.set_visited(2, 2);
        assert_eq!(tables.g(2, 2), 3.5);
        assert!(tables.visited(2, 2));

        tables.begin_plan();
        assert_eq!(tables.g(2, 2), f64::INFINITY);
        assert!(!tables.visited(2, 2));
    }

    #[test]
    fn scoreboard_carries_its_handle() {
        let mut tables = CellTables::new(4, 4);
        tables.begin_plan();
        let (handle, setter) = Handle::new();
        setter.set(true);
        tables.set_scoreboard(0, 0, handle);
        assert!(tables.scoreboarded(0, 0));
        assert!(tables.handle(0, 0).get());
    }
}
