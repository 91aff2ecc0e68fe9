use crate::report::MonthlyActivity;

/// Activity counters shared by every behavior during a tick.
///
/// Monthly counters are cleared at the start of each tick; annual counters
/// are drained by the annual controller.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Ledger {
    monthly_lumber: u64,
    annual_lumber: u64,
    monthly_saplings: u64,
    monthly_maulings: u64,
    annual_maulings: u64,
}

impl Ledger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn begin_month(&mut self) {
        self.monthly_lumber = 0;
        self.monthly_saplings = 0;
        self.monthly_maulings = 0;
    }

    pub fn record_lumber(&mut self, points: u64) {
        self.monthly_lumber += points;
        self.annual_lumber += points;
    }

    pub fn record_sapling(&mut self) {
        self.monthly_saplings += 1;
    }

    pub fn record_mauling(&mut self) {
        self.monthly_maulings += 1;
        self.annual_maulings += 1;
    }

    pub fn monthly(&self) -> MonthlyActivity {
        MonthlyActivity {
            lumber: self.monthly_lumber,
            saplings: self.monthly_saplings,
            maulings: self.monthly_maulings,
        }
    }

    pub fn annual_lumber(&self) -> u64 {
        self.annual_lumber
    }

    pub fn annual_maulings(&self) -> u64 {
        self.annual_maulings
    }

    pub fn take_annual_lumber(&mut self) -> u64 {
        std::mem::take(&mut self.annual_lumber)
    }

    pub fn take_annual_maulings(&mut self) -> u64 {
        std::mem::take(&mut self.annual_maulings)
    }
}
