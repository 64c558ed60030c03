/// Random placement of food and powerups on free cells.
///
/// Uniform rejection sampling while the board is sparse. Once half the
/// board is taken, or after `MAX_REJECTIONS` misses, switch to an explicit
/// scan of free cells so a nearly full board never spins.

use std::collections::HashSet;

use rand::Rng;

use super::grid::{Cell, Grid};

const MAX_REJECTIONS: usize = 64;

/// Pick a uniformly random cell not in `excluded`.
/// Returns `None` only when every cell is excluded.
pub fn place_random_cell<R: Rng + ?Sized>(
    grid: &Grid,
    excluded: &HashSet<Cell>,
    rng: &mut R,
) -> Option<Cell> {
    let area = grid.area();
    let occupied = excluded.iter().filter(|c| grid.contains(**c)).count();
    if occupied >= area {
        return None;
    }

    if occupied * 2 < area {
        for _ in 0..MAX_REJECTIONS {
            let c = Cell::new(
                rng.random_range(0..grid.width),
                rng.random_range(0..grid.height),
            );
            if !excluded.contains(&c) {
                return Some(c);
            }
        }
    }

    scan_free(grid, excluded, rng)
}

fn scan_free<R: Rng + ?Sized>(grid: &Grid, excluded: &HashSet<Cell>, rng: &mut R) -> Option<Cell> {
    let free: Vec<Cell> = grid.cells().filter(|c| !excluded.contains(c)).collect();
    if free.is_empty() {
        return None;
    }
    Some(free[rng.random_range(0..free.len())])
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn rng() -> StdRng {
        StdRng::seed_from_u64(7)
    }

    #[test]
    fn avoids_excluded_cells() {
        let g = Grid::new(4, 4);
        let excluded: HashSet<Cell> = (0..4).map(|x| Cell::new(x, 0)).collect();
        let mut r = rng();
        for _ in 0..200 {
            let c = place_random_cell(&g, &excluded, &mut r).expect("free cell");
            assert!(g.contains(c));
            assert!(!excluded.contains(&c));
        }
    }

    #[test]
    fn finds_last_free_cell() {
        let g = Grid::new(5, 5);
        let hole = Cell::new(3, 2);
        let excluded: HashSet<Cell> = g.cells().filter(|&c| c != hole).collect();
        assert_eq!(place_random_cell(&g, &excluded, &mut rng()), Some(hole));
    }

    #[test]
    fn full_board_returns_none() {
        let g = Grid::new(3, 3);
        let excluded: HashSet<Cell> = g.cells().collect();
        assert_eq!(place_random_cell(&g, &excluded, &mut rng()), None);
    }

    #[test]
    fn off_board_exclusions_do_not_count_as_occupancy() {
        let g = Grid::new(1, 1);
        let excluded: HashSet<Cell> = [Cell::new(5, 5), Cell::new(-1, 0)].into_iter().collect();
        assert_eq!(place_random_cell(&g, &excluded, &mut rng()), Some(Cell::new(0, 0)));
    }
}
