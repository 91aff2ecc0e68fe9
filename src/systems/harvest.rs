use rand::Rng;
use tracing::trace;

use crate::components::{EntityId, EntityKind, LifeStage, Position};
use crate::error::Result;
use crate::grid::Grid;

use super::movement::search;
use super::predation::maul;
use super::TickContext;

pub const LUMBERJACK_SEARCH_STEPS: usize = 3;

/// Lumberjacks wander until they find timber or a bear. Walking into a bear
/// gets them mauled; whatever grown trees stand in the final cell are felled
/// either way.
pub(super) fn tick<R: Rng + ?Sized>(
    id: EntityId,
    ctx: &mut TickContext<'_>,
    grid: &mut Grid,
    rng: &mut R,
) -> Result<()> {
    let month = ctx.month;
    let pos = search(grid, id, rng, LUMBERJACK_SEARCH_STEPS, |grid, pos| {
        stops_lumberjack(grid, pos, month)
    })?;

    if grid.has_kind_at(pos, EntityKind::Bear) {
        maul(id, ctx, grid, rng)?;
    }
    fell_trees(pos, ctx, grid)?;
    Ok(())
}

/// A lumberjack stops at a bear or at timber worth felling. Saplings alone
/// do not count.
fn stops_lumberjack(grid: &Grid, pos: Position, month: u64) -> bool {
    grid.has_kind_at(pos, EntityKind::Bear)
        || grid.occupants(pos).any(|entity| entity.is_harvestable(month))
}

/// Fells every non-sapling tree at `pos`, crediting one point per tree and
/// two per elder. Returns the lumber gained.
pub fn fell_trees(pos: Position, ctx: &mut TickContext<'_>, grid: &mut Grid) -> Result<u64> {
    let month = ctx.month;
    let felled: Vec<(EntityId, LifeStage)> = grid
        .occupants(pos)
        .filter_map(|entity| match entity.stage(month) {
            Some(stage @ (LifeStage::Tree | LifeStage::Elder)) => Some((entity.id, stage)),
            _ => None,
        })
        .collect();

    let mut lumber = 0;
    for (tree, stage) in felled {
        grid.remove(tree)?;
        ctx.ledger.record_lumber(stage.lumber());
        lumber += stage.lumber();
    }
    if lumber > 0 {
        trace!(x = pos.x, y = pos.y, lumber, "trees felled");
    }
    Ok(lumber)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::Species;
    use crate::systems::Ledger;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    const CORNER_NEIGHBOURS: [Position; 3] =
        [Position { x: 0, y: 1 }, Position { x: 1, y: 0 }, Position { x: 1, y: 1 }];

    #[test]
    fn felling_credits_by_stage_and_spares_saplings() {
        let mut grid = Grid::new(3).unwrap();
        let spot = Position::new(1, 1);
        let month = 200;
        let grown = grid.spawn(Species::Tree { born_month: 150 }, spot).unwrap();
        let elder = grid.spawn(Species::Tree { born_month: 0 }, spot).unwrap();
        let sapling = grid.spawn(Species::Tree { born_month: 195 }, spot).unwrap();

        let mut ledger = Ledger::new();
        let mut ctx = TickContext {
            month,
            ledger: &mut ledger,
        };
        let lumber = fell_trees(spot, &mut ctx, &mut grid).unwrap();

        assert_eq!(lumber, 3);
        assert!(grid.get(grown).is_none());
        assert!(grid.get(elder).is_none());
        assert!(grid.get(sapling).is_some());
        assert_eq!(ledger.monthly().lumber, 3);
        assert_eq!(ledger.annual_lumber(), 3);
        grid.check_invariants().unwrap();
    }

    #[test]
    fn lumberjack_harvests_where_it_finds_timber() {
        // Every neighbour of (0,0) holds a grown tree, so the first step hits.
        let mut grid = Grid::new(2).unwrap();
        let jack = grid.spawn(Species::Lumberjack, Position::new(0, 0)).unwrap();
        for pos in CORNER_NEIGHBOURS {
            grid.spawn(Species::Tree { born_month: -24 }, pos).unwrap();
        }
        let mut ledger = Ledger::new();
        let mut rng = ChaCha8Rng::seed_from_u64(77);
        let mut ctx = TickContext {
            month: 1,
            ledger: &mut ledger,
        };
        tick(jack, &mut ctx, &mut grid, &mut rng).unwrap();

        let at = grid.get(jack).unwrap().pos;
        assert!(!grid.has_kind_at(at, EntityKind::Tree));
        assert_eq!(grid.count(EntityKind::Tree), 2);
        assert_eq!(ledger.monthly().lumber, 1);
    }

    #[test]
    fn lumberjack_meeting_a_bear_is_mauled_and_replaced() {
        let mut grid = Grid::new(2).unwrap();
        let jack = grid.spawn(Species::Lumberjack, Position::new(0, 0)).unwrap();
        for pos in CORNER_NEIGHBOURS {
            grid.spawn(Species::Bear, pos).unwrap();
            grid.spawn(Species::Tree { born_month: -24 }, pos).unwrap();
        }
        let mut ledger = Ledger::new();
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let mut ctx = TickContext {
            month: 1,
            ledger: &mut ledger,
        };
        tick(jack, &mut ctx, &mut grid, &mut rng).unwrap();

        assert!(grid.get(jack).is_none());
        assert_eq!(grid.count(EntityKind::Lumberjack), 1);
        assert_eq!(ledger.annual_maulings(), 1);
        // The tree in the cell where the mauling happened is still felled.
        assert_eq!(ledger.monthly().lumber, 1);
        assert_eq!(grid.count(EntityKind::Tree), 2);
        grid.check_invariants().unwrap();
    }

    #[test]
    fn saplings_do_not_end_the_search() {
        let month = 1;
        let mut grid = Grid::new(2).unwrap();
        let jack = grid.spawn(Species::Lumberjack, Position::new(0, 0)).unwrap();
        for pos in CORNER_NEIGHBOURS {
            grid.spawn(Species::Tree { born_month: 0 }, pos).unwrap();
        }
        let mut rng = ChaCha8Rng::seed_from_u64(12);

        let steps = std::cell::Cell::new(0);
        let hits = std::cell::Cell::new(0);
        search(&mut grid, jack, &mut rng, LUMBERJACK_SEARCH_STEPS, |grid, pos| {
            steps.set(steps.get() + 1);
            let hit = stops_lumberjack(grid, pos, month);
            if hit {
                hits.set(hits.get() + 1);
            }
            hit
        })
        .unwrap();
        assert_eq!(steps.get(), LUMBERJACK_SEARCH_STEPS);
        assert_eq!(hits.get(), 0);

        let mut ledger = Ledger::new();
        let mut ctx = TickContext {
            month,
            ledger: &mut ledger,
        };
        tick(jack, &mut ctx, &mut grid, &mut rng).unwrap();
        assert_eq!(ledger.monthly().lumber, 0);
        assert_eq!(grid.count(EntityKind::Tree), 3);
        grid.check_invariants().unwrap();
    }
}
