//! Per-entity monthly behaviors and the annual population controller.

pub mod annual;
mod bookkeeping;
mod growth;
mod harvest;
mod movement;
mod predation;

use rand::Rng;

use crate::components::{EntityId, EntityKind};
use crate::error::Result;
use crate::grid::Grid;

pub use bookkeeping::Ledger;
pub use harvest::fell_trees;
pub use movement::wander_and_seek;
pub use predation::maul;

/// State a behavior may read or bump while the month is being played out.
pub struct TickContext<'a> {
    pub month: u64,
    pub ledger: &'a mut Ledger,
}

/// Plays out one month for a single entity. Ids that are no longer
/// registered (felled or mauled earlier in the same pass) are skipped.
pub fn tick_entity<R: Rng + ?Sized>(
    id: EntityId,
    ctx: &mut TickContext<'_>,
    grid: &mut Grid,
    rng: &mut R,
) -> Result<()> {
    let Some(kind) = grid.get(id).map(|entity| entity.kind()) else {
        return Ok(());
    };
    match kind {
        EntityKind::Tree => growth::tick(id, ctx, grid, rng),
        EntityKind::Lumberjack => harvest::tick(id, ctx, grid, rng),
        EntityKind::Bear => predation::tick(id, ctx, grid, rng),
    }
}
