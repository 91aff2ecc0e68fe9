use tracing::{debug, info};

use crate::components::EntityKind;
use crate::error::{EcologyError, Result};
use crate::grid::Grid;
use crate::report::{AnnualReport, MonthlyActivity, Population, SimDate};
use crate::rng::RngManager;
use crate::scenario::{Scenario, SeedingConfig};
use crate::systems::{self, annual, Ledger, TickContext};

const MONTHS_PER_YEAR: u64 = 12;

/// Everything a driver needs to log or render after one month.
#[derive(Clone, Debug)]
pub struct TickSummary {
    pub month: u64,
    pub date: SimDate,
    pub activity: MonthlyActivity,
    pub population: Population,
    /// Set when this tick closed a year or ended the simulation.
    pub annual: Option<AnnualReport>,
    pub terminated: bool,
}

/// Owns the forest, the calendar and the report history.
pub struct Simulation {
    month: u64,
    grid: Grid,
    ledger: Ledger,
    rng: RngManager,
    reports: Vec<AnnualReport>,
    terminated: bool,
}

impl Simulation {
    pub fn new(edge: usize, seed: u64) -> Result<Self> {
        Self::seeded(edge, &SeedingConfig::default(), RngManager::new(seed))
    }

    pub fn from_scenario(scenario: &Scenario) -> Result<Self> {
        Self::seeded(
            scenario.edge,
            &scenario.seeding,
            RngManager::new(scenario.seed),
        )
    }

    pub fn seeded(edge: usize, seeding: &SeedingConfig, mut rng: RngManager) -> Result<Self> {
        let grid = Grid::seeded(edge, seeding, 0, &mut rng.stream("seeding"))?;
        info!(
            edge,
            seed = rng.seed(),
            trees = grid.count(EntityKind::Tree),
            lumberjacks = grid.count(EntityKind::Lumberjack),
            bears = grid.count(EntityKind::Bear),
            "forest seeded"
        );
        Ok(Self::with_grid(grid, rng))
    }

    /// Starts from a hand-built grid at month 0.
    pub fn with_grid(grid: Grid, rng: RngManager) -> Self {
        Self {
            month: 0,
            grid,
            ledger: Ledger::new(),
            rng,
            reports: Vec::new(),
            terminated: false,
        }
    }

    pub fn month(&self) -> u64 {
        self.month
    }

    pub fn date(&self) -> SimDate {
        SimDate::from_month(self.month)
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    pub fn population(&self) -> Population {
        Population::of(&self.grid)
    }

    /// True once every tree is gone.
    pub fn is_terminated(&self) -> bool {
        self.terminated
    }

    pub fn reports(&self) -> &[AnnualReport] {
        &self.reports
    }

    /// One labelled density bar per completed year, oldest first.
    pub fn density_bars(&self) -> Vec<String> {
        self.reports.iter().map(AnnualReport::labelled_bar).collect()
    }

    /// Advances one month. Closes the year on every twelfth month, and one
    /// last time if the forest has been cut down.
    pub fn tick(&mut self) -> Result<TickSummary> {
        if self.terminated {
            return Err(EcologyError::SimulationEnded);
        }
        self.ledger.begin_month();
        self.month += 1;

        {
            let mut rng = self.rng.stream("monthly");
            let mut ctx = TickContext {
                month: self.month,
                ledger: &mut self.ledger,
            };
            for id in self.grid.ids() {
                systems::tick_entity(id, &mut ctx, &mut self.grid, &mut rng)?;
            }
        }
        debug_assert!(self.grid.check_invariants().is_ok());

        let activity = self.ledger.monthly();
        let date = self.date();
        debug!(
            month = self.month,
            lumber = activity.lumber,
            saplings = activity.saplings,
            maulings = activity.maulings,
            "month closed"
        );

        let annual = if self.grid.count(EntityKind::Tree) == 0 {
            self.terminated = true;
            info!(month = self.month, "the last tree has fallen");
            Some(self.annual()?)
        } else if self.month % MONTHS_PER_YEAR == 0 {
            Some(self.annual()?)
        } else {
            None
        };

        Ok(TickSummary {
            month: self.month,
            date,
            activity,
            population: self.population(),
            annual,
            terminated: self.terminated,
        })
    }

    /// Runs the annual controller now and records its report.
    pub fn annual(&mut self) -> Result<AnnualReport> {
        let year = self.date().year;
        let report = {
            let mut rng = self.rng.stream("annual");
            annual::close_year(year, self.month, &mut self.grid, &mut self.ledger, &mut rng)?
        };
        info!(
            year,
            saplings = report.census.saplings,
            trees = report.census.trees,
            elders = report.census.elders,
            lumberjacks = report.census.lumberjacks,
            bears = report.census.bears,
            "year closed"
        );
        self.reports.push(report.clone());
        Ok(report)
    }

    /// Ticks until the next year boundary or until the forest is gone.
    pub fn advance_year(&mut self) -> Result<Vec<TickSummary>> {
        let mut ticks = Vec::with_capacity(MONTHS_PER_YEAR as usize);
        loop {
            let summary = self.tick()?;
            let closed = summary.annual.is_some();
            ticks.push(summary);
            if closed {
                return Ok(ticks);
            }
        }
    }

    pub fn run(&mut self, years: u64) -> Result<()> {
        self.run_with_hook(years, |_| {})
    }

    /// Runs until `years` full years have elapsed since month 0, or the
    /// forest is gone. The opening census is taken first if no year has been
    /// recorded yet.
    pub fn run_with_hook<F>(&mut self, years: u64, mut hook: F) -> Result<()>
    where
        F: FnMut(&TickSummary),
    {
        if self.reports.is_empty() {
            self.annual()?;
        }
        while self.month < years * MONTHS_PER_YEAR && !self.terminated {
            let summary = self.tick()?;
            hook(&summary);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::{Position, Species};

    fn barren(edge: usize) -> Simulation {
        let mut grid = Grid::new(edge).unwrap();
        grid.spawn(Species::Lumberjack, Position::new(0, 0)).unwrap();
        Simulation::with_grid(grid, RngManager::new(1))
    }

    #[test]
    fn month_counter_and_date_advance_together() {
        let mut sim = Simulation::new(8, 3).unwrap();
        for _ in 0..14 {
            if sim.tick().unwrap().terminated {
                return;
            }
        }
        assert_eq!(sim.month(), 14);
        assert_eq!(sim.date(), SimDate { year: 1, month: 2 });
    }

    #[test]
    fn treeless_forest_ends_on_first_tick() {
        let mut sim = barren(5);
        let summary = sim.tick().unwrap();
        assert!(summary.terminated);
        assert!(sim.is_terminated());
        assert_eq!(sim.reports().len(), 1);
        assert_eq!(sim.tick().unwrap_err(), EcologyError::SimulationEnded);
    }

    #[test]
    fn year_boundary_appends_one_report() {
        let mut grid = Grid::new(6).unwrap();
        // Saplings planted far in the future never grow, never spread and
        // are never felled, so the forest cannot die out.
        for x in 0..6 {
            grid.spawn(Species::Tree { born_month: 10_000 }, Position::new(x, 0))
                .unwrap();
        }
        grid.spawn(Species::Lumberjack, Position::new(3, 3)).unwrap();
        let mut sim = Simulation::with_grid(grid, RngManager::new(9));

        let ticks = sim.advance_year().unwrap();
        assert_eq!(ticks.len(), 12);
        assert!(ticks[..11].iter().all(|t| t.annual.is_none()));
        assert_eq!(ticks[11].annual.as_ref().map(|r| r.year), Some(1));
        assert_eq!(sim.reports().len(), 1);
        assert_eq!(sim.ledger().annual_lumber(), 0);
        assert_eq!(sim.ledger().annual_maulings(), 0);
    }

    #[test]
    fn run_takes_the_opening_census_once() {
        let mut sim = Simulation::new(10, 2014).unwrap();
        sim.run(2).unwrap();
        if !sim.is_terminated() {
            assert_eq!(sim.month(), 24);
            assert_eq!(sim.reports().len(), 3);
        }
        assert_eq!(sim.reports()[0].year, 0);
        assert_eq!(sim.density_bars().len(), sim.reports().len());
    }
}
