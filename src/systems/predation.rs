use rand::Rng;
use tracing::trace;

use crate::components::{EntityId, EntityKind, Species};
use crate::error::Result;
use crate::grid::Grid;

use super::movement::search;
use super::TickContext;

pub const BEAR_SEARCH_STEPS: usize = 5;

/// Bears roam until they stumble onto a lumberjack, then maul everyone
/// standing in that cell.
pub(super) fn tick<R: Rng + ?Sized>(
    id: EntityId,
    ctx: &mut TickContext<'_>,
    grid: &mut Grid,
    rng: &mut R,
) -> Result<()> {
    let pos = search(grid, id, rng, BEAR_SEARCH_STEPS, |grid, pos| {
        grid.has_kind_at(pos, EntityKind::Lumberjack)
    })?;
    for victim in grid.ids_at(pos, EntityKind::Lumberjack) {
        maul(victim, ctx, grid, rng)?;
    }
    Ok(())
}

/// Removes a lumberjack after a bear attack. The last lumberjack is always
/// replaced by a newcomer somewhere on the grid.
pub fn maul<R: Rng + ?Sized>(
    victim: EntityId,
    ctx: &mut TickContext<'_>,
    grid: &mut Grid,
    rng: &mut R,
) -> Result<()> {
    let mauled = grid.remove(victim)?;
    ctx.ledger.record_mauling();
    trace!(x = mauled.pos.x, y = mauled.pos.y, "lumberjack mauled");

    if grid.count(EntityKind::Lumberjack) == 0 {
        let pos = grid.random_position(rng);
        grid.spawn(Species::Lumberjack, pos)?;
        trace!(x = pos.x, y = pos.y, "replacement lumberjack arrives");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::Position;
    use crate::systems::Ledger;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn last_lumberjack_is_replaced() {
        let mut grid = Grid::new(4).unwrap();
        let jack = grid.spawn(Species::Lumberjack, Position::new(1, 1)).unwrap();
        let mut ledger = Ledger::new();
        let mut rng = ChaCha8Rng::seed_from_u64(12);
        let mut ctx = TickContext {
            month: 1,
            ledger: &mut ledger,
        };
        maul(jack, &mut ctx, &mut grid, &mut rng).unwrap();

        assert!(grid.get(jack).is_none());
        assert_eq!(grid.count(EntityKind::Lumberjack), 1);
        assert_eq!(ledger.monthly().maulings, 1);
        assert_eq!(ledger.annual_maulings(), 1);
        grid.check_invariants().unwrap();
    }

    #[test]
    fn no_replacement_while_others_remain() {
        let mut grid = Grid::new(4).unwrap();
        let jack = grid.spawn(Species::Lumberjack, Position::new(1, 1)).unwrap();
        let other = grid.spawn(Species::Lumberjack, Position::new(3, 3)).unwrap();
        let mut ledger = Ledger::new();
        let mut rng = ChaCha8Rng::seed_from_u64(12);
        let mut ctx = TickContext {
            month: 1,
            ledger: &mut ledger,
        };
        maul(jack, &mut ctx, &mut grid, &mut rng).unwrap();
        assert_eq!(grid.ids(), vec![other]);
    }

    #[test]
    fn bear_mauls_every_lumberjack_it_lands_on() {
        // On a 2x2 grid every neighbour of (0,0) holds two lumberjacks, so
        // the first step always succeeds.
        let mut grid = Grid::new(2).unwrap();
        let bear = grid.spawn(Species::Bear, Position::new(0, 0)).unwrap();
        for pos in [Position::new(0, 1), Position::new(1, 0), Position::new(1, 1)] {
            grid.spawn(Species::Lumberjack, pos).unwrap();
            grid.spawn(Species::Lumberjack, pos).unwrap();
        }
        let mut ledger = Ledger::new();
        let mut rng = ChaCha8Rng::seed_from_u64(30);
        let mut ctx = TickContext {
            month: 1,
            ledger: &mut ledger,
        };
        tick(bear, &mut ctx, &mut grid, &mut rng).unwrap();

        let at = grid.get(bear).unwrap().pos;
        assert_ne!(at, Position::new(0, 0));
        assert!(!grid.has_kind_at(at, EntityKind::Lumberjack));
        assert_eq!(grid.count(EntityKind::Lumberjack), 4);
        assert_eq!(ledger.monthly().maulings, 2);
        grid.check_invariants().unwrap();
    }
}
