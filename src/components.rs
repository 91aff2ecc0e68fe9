use std::fmt;

/// Months before a sapling counts as a grown tree.
pub const SAPLING_MONTHS: i64 = 12;
/// Months before a tree counts as an elder.
pub const ELDER_MONTHS: i64 = 120;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EntityId(u64);

impl EntityId {
    pub(crate) fn new(raw: u64) -> Self {
        Self(raw)
    }

    pub fn raw(self) -> u64 {
        self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Position {
    pub x: usize,
    pub y: usize,
}

impl Position {
    pub fn new(x: usize, y: usize) -> Self {
        Self { x, y }
    }
}

/// Discriminator for the three kinds of inhabitant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Tree,
    Lumberjack,
    Bear,
}

impl EntityKind {
    pub const ALL: [EntityKind; 3] = [EntityKind::Tree, EntityKind::Lumberjack, EntityKind::Bear];

    pub(crate) fn index(self) -> usize {
        match self {
            EntityKind::Tree => 0,
            EntityKind::Lumberjack => 1,
            EntityKind::Bear => 2,
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntityKind::Tree => write!(f, "tree"),
            EntityKind::Lumberjack => write!(f, "lumberjack"),
            EntityKind::Bear => write!(f, "bear"),
        }
    }
}

/// Kind-specific state carried by an entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Species {
    /// `born_month` may be negative for trees older than the simulation.
    Tree { born_month: i64 },
    Lumberjack,
    Bear,
}

impl Species {
    pub fn kind(self) -> EntityKind {
        match self {
            Species::Tree { .. } => EntityKind::Tree,
            Species::Lumberjack => EntityKind::Lumberjack,
            Species::Bear => EntityKind::Bear,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum LifeStage {
    Sapling,
    Tree,
    Elder,
}

impl LifeStage {
    pub fn from_age(age_months: i64) -> Self {
        if age_months < SAPLING_MONTHS {
            LifeStage::Sapling
        } else if age_months >= ELDER_MONTHS {
            LifeStage::Elder
        } else {
            LifeStage::Tree
        }
    }

    /// Lumber awarded for felling a tree at this stage.
    pub fn lumber(self) -> u64 {
        match self {
            LifeStage::Sapling => 0,
            LifeStage::Tree => 1,
            LifeStage::Elder => 2,
        }
    }

    /// Chance per month that a tree at this stage seeds a neighbouring cell.
    pub fn spawn_chance(self) -> f64 {
        match self {
            LifeStage::Sapling => 0.0,
            LifeStage::Tree => 0.10,
            LifeStage::Elder => 0.20,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Entity {
    pub id: EntityId,
    pub pos: Position,
    pub species: Species,
}

impl Entity {
    pub fn kind(&self) -> EntityKind {
        self.species.kind()
    }

    pub fn is(&self, kind: EntityKind) -> bool {
        self.kind() == kind
    }

    /// Age in months, for trees only.
    pub fn age(&self, month: u64) -> Option<i64> {
        match self.species {
            Species::Tree { born_month } => Some(month as i64 - born_month),
            _ => None,
        }
    }

    /// Life stage at `month`, for trees only.
    pub fn stage(&self, month: u64) -> Option<LifeStage> {
        self.age(month).map(LifeStage::from_age)
    }

    /// True for trees that are no longer saplings.
    pub fn is_harvestable(&self, month: u64) -> bool {
        matches!(self.stage(month), Some(LifeStage::Tree | LifeStage::Elder))
    }
}
