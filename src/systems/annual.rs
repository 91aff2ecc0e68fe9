//! Year-end accounting: hire or fire lumberjacks by productivity, grow or
//! cull bears by their kill count, then count heads.

use rand::Rng;

use crate::components::{EntityKind, Species};
use crate::error::Result;
use crate::grid::Grid;
use crate::report::{density_bar, AnnualReport, BearAdjustment, Census, LumberjackAdjustment};

use super::Ledger;

pub fn close_year<R: Rng + ?Sized>(
    year: u64,
    month: u64,
    grid: &mut Grid,
    ledger: &mut Ledger,
    rng: &mut R,
) -> Result<AnnualReport> {
    let lumberjacks = regulate_lumberjacks(grid, ledger.take_annual_lumber(), rng)?;
    let bears = regulate_bears(grid, ledger.take_annual_maulings(), rng)?;
    let census = Census::take(grid, month);
    let bar = density_bar(
        census.bears,
        census.all_trees(),
        census.lumberjacks,
        grid.area(),
    );
    Ok(AnnualReport {
        year,
        census,
        lumberjacks,
        bears,
        bar,
    })
}

/// Fires one lumberjack after a lean year (never the last one); otherwise
/// hires one newcomer per whole unit of lumber each lumberjack brought in.
pub fn regulate_lumberjacks<R: Rng + ?Sized>(
    grid: &mut Grid,
    lumber: u64,
    rng: &mut R,
) -> Result<LumberjackAdjustment> {
    let staff = grid.count(EntityKind::Lumberjack);
    let productivity = if staff == 0 {
        0.0
    } else {
        lumber as f64 / staff as f64
    };

    let delta = if productivity < 1.0 && staff > 1 {
        let fired = grid.random_of_kind(EntityKind::Lumberjack, rng)?;
        grid.remove(fired)?;
        -1
    } else {
        let hires = productivity.floor() as i64;
        for _ in 0..hires {
            let pos = grid.random_position(rng);
            grid.spawn(Species::Lumberjack, pos)?;
        }
        hires
    };
    Ok(LumberjackAdjustment {
        productivity,
        delta,
    })
}

/// A bloodless year lets one cub mature; otherwise one bear is culled per
/// mauling, as long as bears remain.
pub fn regulate_bears<R: Rng + ?Sized>(
    grid: &mut Grid,
    maulings: u64,
    rng: &mut R,
) -> Result<BearAdjustment> {
    if maulings == 0 {
        let pos = grid.random_position(rng);
        grid.spawn(Species::Bear, pos)?;
        return Ok(BearAdjustment { maulings, delta: 1 });
    }

    let mut culled = 0;
    for _ in 0..maulings {
        if grid.count(EntityKind::Bear) == 0 {
            break;
        }
        let bear = grid.random_of_kind(EntityKind::Bear, rng)?;
        grid.remove(bear)?;
        culled += 1;
    }
    Ok(BearAdjustment {
        maulings,
        delta: -culled,
    })
}
