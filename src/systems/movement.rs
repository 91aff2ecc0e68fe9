use rand::Rng;

use crate::components::{EntityId, Position};
use crate::error::{EcologyError, Result};
use crate::grid::Grid;

/// Moves `id` to a random neighbouring cell, then asks `found` whether the
/// new cell holds what the entity is looking for. The move always happens;
/// the target check only ever sees the destination.
pub fn wander_and_seek<R, F>(grid: &mut Grid, id: EntityId, rng: &mut R, found: F) -> Result<bool>
where
    R: Rng + ?Sized,
    F: Fn(&Grid, Position) -> bool,
{
    let from = position_of(grid, id)?;
    let at = match grid.random_adjacent(from, rng) {
        Some(to) => {
            grid.relocate(id, to)?;
            to
        }
        None => from,
    };
    Ok(found(grid, at))
}

/// Repeats `wander_and_seek` up to `steps` times, stopping at the first hit.
/// Returns where the entity ended up.
pub(crate) fn search<R, F>(
    grid: &mut Grid,
    id: EntityId,
    rng: &mut R,
    steps: usize,
    found: F,
) -> Result<Position>
where
    R: Rng + ?Sized,
    F: Fn(&Grid, Position) -> bool,
{
    for _ in 0..steps {
        if wander_and_seek(grid, id, rng, &found)? {
            break;
        }
    }
    position_of(grid, id)
}

fn position_of(grid: &Grid, id: EntityId) -> Result<Position> {
    grid.get(id)
        .map(|entity| entity.pos)
        .ok_or_else(|| EcologyError::InvariantViolation(format!("entity {} is not registered", id.raw())))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::{EntityKind, Species};
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn wander_always_moves_one_step() {
        let mut grid = Grid::new(6).unwrap();
        let start = Position::new(3, 3);
        let bear = grid.spawn(Species::Bear, start).unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(17);
        for _ in 0..50 {
            let before = grid.get(bear).unwrap().pos;
            wander_and_seek(&mut grid, bear, &mut rng, |_, _| false).unwrap();
            let after = grid.get(bear).unwrap().pos;
            assert_ne!(before, after);
            assert!(before.x.abs_diff(after.x) <= 1 && before.y.abs_diff(after.y) <= 1);
        }
        grid.check_invariants().unwrap();
    }

    #[test]
    fn target_under_the_starting_cell_does_not_count() {
        let mut grid = Grid::new(2).unwrap();
        grid.spawn(Species::Lumberjack, Position::new(0, 0)).unwrap();
        let bear = grid.spawn(Species::Bear, Position::new(0, 0)).unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(4);
        let hit = wander_and_seek(&mut grid, bear, &mut rng, |grid, pos| {
            grid.has_kind_at(pos, EntityKind::Lumberjack)
        })
        .unwrap();
        assert!(!hit);
        assert_ne!(grid.get(bear).unwrap().pos, Position::new(0, 0));
    }

    #[test]
    fn search_stops_at_first_hit() {
        let mut grid = Grid::new(2).unwrap();
        let bear = grid.spawn(Species::Bear, Position::new(0, 0)).unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(8);
        let calls = std::cell::Cell::new(0);
        search(&mut grid, bear, &mut rng, 5, |_, _| {
            calls.set(calls.get() + 1);
            true
        })
        .unwrap();
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn single_cell_grid_stays_put() {
        let mut grid = Grid::new(1).unwrap();
        let bear = grid.spawn(Species::Bear, Position::new(0, 0)).unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(2);
        let end = search(&mut grid, bear, &mut rng, 5, |_, _| false).unwrap();
        assert_eq!(end, Position::new(0, 0));
    }
}
