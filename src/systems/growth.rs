use rand::seq::SliceRandom;
use rand::Rng;
use tracing::trace;

use crate::components::{EntityId, Position, Species};
use crate::error::Result;
use crate::grid::Grid;

use super::TickContext;

/// Grown trees occasionally seed an empty neighbouring cell; elders twice as
/// often. Saplings never roll.
pub(super) fn tick<R: Rng + ?Sized>(
    id: EntityId,
    ctx: &mut TickContext<'_>,
    grid: &mut Grid,
    rng: &mut R,
) -> Result<()> {
    let Some(tree) = grid.get(id).copied() else {
        return Ok(());
    };
    let Some(stage) = tree.stage(ctx.month) else {
        return Ok(());
    };
    let chance = stage.spawn_chance();
    if chance <= 0.0 || rng.gen::<f64>() >= chance {
        return Ok(());
    }

    let open: Vec<Position> = grid
        .adjacent(tree.pos)
        .filter(|pos| grid.is_vacant(*pos))
        .collect();
    if let Some(&pos) = open.choose(rng) {
        grid.spawn(
            Species::Tree {
                born_month: ctx.month as i64,
            },
            pos,
        )?;
        ctx.ledger.record_sapling();
        trace!(x = pos.x, y = pos.y, "sapling sprouted");
    }
    Ok(())
}
