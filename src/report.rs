use std::fmt;

use serde::Serialize;

use crate::components::{EntityKind, LifeStage};
use crate::grid::Grid;

pub const BAR_WIDTH: usize = 50;
const BAR_FILL: char = '_';

const MONTH_NAMES: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// Calendar position derived from the absolute month counter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SimDate {
    pub year: u64,
    /// Zero-based month within the year.
    pub month: u64,
}

impl SimDate {
    pub fn from_month(month: u64) -> Self {
        Self {
            year: month / 12,
            month: month % 12,
        }
    }
}

impl fmt::Display for SimDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {:04}", MONTH_NAMES[(self.month % 12) as usize], self.year)
    }
}

/// What happened during a single month.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MonthlyActivity {
    pub lumber: u64,
    pub saplings: u64,
    pub maulings: u64,
}

impl MonthlyActivity {
    pub fn is_quiet(&self) -> bool {
        self.lumber == 0 && self.saplings == 0 && self.maulings == 0
    }

    pub fn log_lines(&self, date: SimDate) -> Vec<String> {
        let mut lines = Vec::new();
        if self.lumber > 0 {
            lines.push(format!("{date}: {} pieces of lumber harvested", self.lumber));
        }
        if self.saplings > 0 {
            lines.push(format!("{date}: {} new saplings sprouted", self.saplings));
        }
        if self.maulings > 0 {
            lines.push(format!("{date}: {} lumberjacks mauled by bears", self.maulings));
        }
        lines
    }
}

/// Live headcount per kind, without the tree stage breakdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Population {
    pub trees: usize,
    pub lumberjacks: usize,
    pub bears: usize,
}

impl Population {
    pub fn of(grid: &Grid) -> Self {
        Self {
            trees: grid.count(EntityKind::Tree),
            lumberjacks: grid.count(EntityKind::Lumberjack),
            bears: grid.count(EntityKind::Bear),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Census {
    pub saplings: usize,
    pub trees: usize,
    pub elders: usize,
    pub lumberjacks: usize,
    pub bears: usize,
}

impl Census {
    pub fn take(grid: &Grid, month: u64) -> Self {
        let mut census = Census::default();
        for entity in grid.entities() {
            match (entity.kind(), entity.stage(month)) {
                (EntityKind::Tree, Some(LifeStage::Sapling)) => census.saplings += 1,
                (EntityKind::Tree, Some(LifeStage::Tree)) => census.trees += 1,
                (EntityKind::Tree, Some(LifeStage::Elder)) => census.elders += 1,
                (EntityKind::Lumberjack, _) => census.lumberjacks += 1,
                (EntityKind::Bear, _) => census.bears += 1,
                (EntityKind::Tree, None) => {}
            }
        }
        census
    }

    /// Trees of every stage.
    pub fn all_trees(&self) -> usize {
        self.saplings + self.trees + self.elders
    }
}

/// Outcome of the yearly productivity review.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LumberjackAdjustment {
    pub productivity: f64,
    pub delta: i64,
}

/// Outcome of the yearly mauling review.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BearAdjustment {
    pub maulings: u64,
    pub delta: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnnualReport {
    pub year: u64,
    pub census: Census,
    pub lumberjacks: LumberjackAdjustment,
    pub bears: BearAdjustment,
    pub bar: String,
}

impl AnnualReport {
    /// The density bar with its year label, e.g. `0003: [BTTT___...]`.
    pub fn labelled_bar(&self) -> String {
        format!("{:04}: [{}]", self.year, self.bar)
    }

    pub fn log_lines(&self) -> Vec<String> {
        let year = self.year;
        let c = &self.census;
        let mut lines = vec![format!(
            "{year:04}: Forest has {} saplings, {} trees, {} elder trees, {} lumberjacks and {} bears",
            c.saplings, c.trees, c.elders, c.lumberjacks, c.bears
        )];

        if self.bears.maulings > 0 {
            lines.push(format!(
                "{year:04}: For {} maulings this year {} bear killed",
                self.bears.maulings, -self.bears.delta
            ));
        } else {
            lines.push(format!("{year:04}: 1 bear cub matures"));
        }

        let productivity = self.lumberjacks.productivity;
        if productivity < 1.0 {
            if self.lumberjacks.delta < 0 {
                lines.push(format!(
                    "{year:04}: Given low productivity of {productivity:.1} lumber per jack, 1 was fired"
                ));
            } else if c.lumberjacks == 0 {
                lines.push(format!("{year:04}: No lumberjacks worked the forest this year"));
            } else {
                lines.push(format!(
                    "{year:04}: The lone lumberjack harvested no trees this year"
                ));
            }
        } else {
            lines.push(format!(
                "{year:04}: Given productivity of {productivity:.1} lumber per jack, {} were hired",
                self.lumberjacks.delta
            ));
        }
        lines
    }
}

/// Fixed-width bar showing bears, trees and lumberjacks as shares of the grid.
pub fn density_bar(bears: usize, trees: usize, lumberjacks: usize, area: usize) -> String {
    let share = |count: usize| BAR_WIDTH * count / area.max(1);
    let mut bar: String = std::iter::repeat('B')
        .take(share(bears))
        .chain(std::iter::repeat('T').take(share(trees)))
        .chain(std::iter::repeat('L').take(share(lumberjacks)))
        .take(BAR_WIDTH)
        .collect();
    while bar.len() < BAR_WIDTH {
        bar.push(BAR_FILL);
    }
    bar
}
