//! Square lattice holding every inhabitant of the forest.
//!
//! Entities are indexed twice: once in the registry (ordered by
//! registration) and once in the cell they stand in. Every mutation goes
//! through `spawn`, `remove` or `relocate` so both indexes move together.

use std::collections::{BTreeMap, HashMap};

use rand::seq::{IteratorRandom, SliceRandom};
use rand::Rng;

use crate::components::{Entity, EntityId, EntityKind, Position, Species};
use crate::error::{EcologyError, Result};
use crate::scenario::SeedingConfig;

const NEIGHBOUR_OFFSETS: [(isize, isize); 8] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, -1),
    (0, 1),
    (1, -1),
    (1, 0),
    (1, 1),
];

pub struct Grid {
    edge: usize,
    next_entity: u64,
    cells: Vec<Vec<EntityId>>,
    /// Index of each entity inside its cell's list.
    slots: HashMap<EntityId, usize>,
    entities: BTreeMap<EntityId, Entity>,
    counts: [usize; 3],
}

impl Grid {
    pub fn new(edge: usize) -> Result<Self> {
        if edge == 0 {
            return Err(EcologyError::InvalidEdge);
        }
        Ok(Self {
            edge,
            next_entity: 0,
            cells: vec![Vec::new(); edge * edge],
            slots: HashMap::new(),
            entities: BTreeMap::new(),
            counts: [0; 3],
        })
    }

    /// Builds a grid and populates it cell by cell with independent rolls for
    /// a lumberjack, a tree and a bear, in that order.
    pub fn seeded<R: Rng + ?Sized>(
        edge: usize,
        seeding: &SeedingConfig,
        month: u64,
        rng: &mut R,
    ) -> Result<Self> {
        let mut grid = Self::new(edge)?;
        for x in 0..edge {
            for y in 0..edge {
                let pos = Position::new(x, y);
                if rng.gen::<f64>() < seeding.lumberjack {
                    grid.spawn(Species::Lumberjack, pos)?;
                }
                if rng.gen::<f64>() < seeding.tree {
                    let age = initial_tree_age(rng);
                    grid.spawn(
                        Species::Tree {
                            born_month: month as i64 - age,
                        },
                        pos,
                    )?;
                }
                if rng.gen::<f64>() < seeding.bear {
                    grid.spawn(Species::Bear, pos)?;
                }
            }
        }
        Ok(grid)
    }

    pub fn edge(&self) -> usize {
        self.edge
    }

    pub fn area(&self) -> usize {
        self.edge * self.edge
    }

    pub fn contains(&self, pos: Position) -> bool {
        pos.x < self.edge && pos.y < self.edge
    }

    fn cell_index(&self, pos: Position) -> Result<usize> {
        if self.contains(pos) {
            Ok(pos.x * self.edge + pos.y)
        } else {
            Err(EcologyError::OutOfBounds {
                x: pos.x,
                y: pos.y,
                edge: self.edge,
            })
        }
    }

    /// In-bounds neighbours of `pos`, corners and edges clipped.
    pub fn adjacent(&self, pos: Position) -> Adjacent {
        Adjacent {
            center: pos,
            edge: self.edge,
            next: 0,
        }
    }

    /// Entities standing at `pos`. Empty for coordinates off the grid.
    pub fn occupants(&self, pos: Position) -> impl Iterator<Item = &Entity> + '_ {
        self.cell_index(pos)
            .ok()
            .and_then(|index| self.cells.get(index))
            .into_iter()
            .flatten()
            .filter_map(move |id| self.entities.get(id))
    }

    pub fn is_vacant(&self, pos: Position) -> bool {
        self.occupants(pos).next().is_none()
    }

    pub fn has_kind_at(&self, pos: Position, kind: EntityKind) -> bool {
        self.occupants(pos).any(|entity| entity.is(kind))
    }

    pub fn ids_at(&self, pos: Position, kind: EntityKind) -> Vec<EntityId> {
        self.occupants(pos)
            .filter(|entity| entity.is(kind))
            .map(|entity| entity.id)
            .collect()
    }

    pub fn count(&self, kind: EntityKind) -> usize {
        self.counts[kind.index()]
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    pub fn get(&self, id: EntityId) -> Option<&Entity> {
        self.entities.get(&id)
    }

    /// Live ids in registration order.
    pub fn ids(&self) -> Vec<EntityId> {
        self.entities.keys().copied().collect()
    }

    pub fn entities(&self) -> impl Iterator<Item = &Entity> + '_ {
        self.entities.values()
    }

    pub fn random_position<R: Rng + ?Sized>(&self, rng: &mut R) -> Position {
        Position::new(rng.gen_range(0..self.edge), rng.gen_range(0..self.edge))
    }

    /// Uniformly random neighbour of `pos`, or `None` on a 1x1 grid.
    pub fn random_adjacent<R: Rng + ?Sized>(&self, pos: Position, rng: &mut R) -> Option<Position> {
        let neighbours: Vec<Position> = self.adjacent(pos).collect();
        neighbours.choose(rng).copied()
    }

    pub fn random_of_kind<R: Rng + ?Sized>(&self, kind: EntityKind, rng: &mut R) -> Result<EntityId> {
        self.entities
            .values()
            .filter(|entity| entity.is(kind))
            .map(|entity| entity.id)
            .choose(rng)
            .ok_or(EcologyError::EmptyPopulation(kind))
    }

    pub fn spawn(&mut self, species: Species, pos: Position) -> Result<EntityId> {
        let index = self.cell_index(pos)?;
        let id = EntityId::new(self.next_entity);
        self.next_entity += 1;
        self.attach(index, id);
        self.entities.insert(id, Entity { id, pos, species });
        self.counts[species.kind().index()] += 1;
        Ok(id)
    }

    pub fn remove(&mut self, id: EntityId) -> Result<Entity> {
        let entity = self
            .entities
            .get(&id)
            .copied()
            .ok_or_else(|| EcologyError::InvariantViolation(format!("entity {} is not registered", id.raw())))?;
        let index = self.cell_index(entity.pos)?;
        self.detach(index, id)?;
        self.entities.remove(&id);
        self.counts[entity.kind().index()] -= 1;
        Ok(entity)
    }

    pub fn relocate(&mut self, id: EntityId, to: Position) -> Result<()> {
        let target = self.cell_index(to)?;
        let from = self
            .entities
            .get(&id)
            .map(|entity| entity.pos)
            .ok_or_else(|| EcologyError::InvariantViolation(format!("entity {} is not registered", id.raw())))?;
        let source = self.cell_index(from)?;
        self.detach(source, id)?;
        self.attach(target, id);
        if let Some(entity) = self.entities.get_mut(&id) {
            entity.pos = to;
        }
        Ok(())
    }

    fn attach(&mut self, index: usize, id: EntityId) {
        let cell = &mut self.cells[index];
        self.slots.insert(id, cell.len());
        cell.push(id);
    }

    /// Swap-removes `id` from its cell in constant time, moving the cell's
    /// last occupant into the freed slot.
    fn detach(&mut self, index: usize, id: EntityId) -> Result<()> {
        let cell = &mut self.cells[index];
        let slot = match self.slots.get(&id) {
            Some(&slot) if cell.get(slot) == Some(&id) => slot,
            _ => {
                return Err(EcologyError::InvariantViolation(format!(
                    "entity {} registered but missing from its cell",
                    id.raw()
                )))
            }
        };
        cell.swap_remove(slot);
        self.slots.remove(&id);
        if let Some(&moved) = cell.get(slot) {
            self.slots.insert(moved, slot);
        }
        Ok(())
    }

    /// Recounts both indexes and reports the first disagreement.
    pub fn check_invariants(&self) -> Result<()> {
        let mut indexed = 0;
        for (index, cell) in self.cells.iter().enumerate() {
            let pos = Position::new(index / self.edge, index % self.edge);
            for (slot, id) in cell.iter().enumerate() {
                if self.slots.get(id) != Some(&slot) {
                    return Err(EcologyError::InvariantViolation(format!(
                        "entity {} sits in slot {slot} but its slot index disagrees",
                        id.raw()
                    )));
                }
                let entity = self.entities.get(id).ok_or_else(|| {
                    EcologyError::InvariantViolation(format!(
                        "entity {} indexed at ({}, {}) but not registered",
                        id.raw(),
                        pos.x,
                        pos.y
                    ))
                })?;
                if entity.pos != pos {
                    return Err(EcologyError::InvariantViolation(format!(
                        "entity {} stored at ({}, {}) but indexed at ({}, {})",
                        id.raw(),
                        entity.pos.x,
                        entity.pos.y,
                        pos.x,
                        pos.y
                    )));
                }
                indexed += 1;
            }
        }
        if indexed != self.entities.len() || self.slots.len() != indexed {
            return Err(EcologyError::InvariantViolation(format!(
                "{} entities registered, {} indexed in cells, {} slot entries",
                self.entities.len(),
                indexed,
                self.slots.len()
            )));
        }
        for kind in EntityKind::ALL {
            let recount = self.entities.values().filter(|entity| entity.is(kind)).count();
            if recount != self.count(kind) {
                return Err(EcologyError::InvariantViolation(format!(
                    "{kind} count is {} but {recount} are registered",
                    self.count(kind)
                )));
            }
        }
        Ok(())
    }
}

/// Age in months of a tree present before the simulation starts. Young trees
/// dominate: `100 / k^2` years for `k` in 1..=10, spread over the year.
fn initial_tree_age<R: Rng + ?Sized>(rng: &mut R) -> i64 {
    let k: i64 = rng.gen_range(1..=10);
    let years = 100 / (k * k);
    years * 12 - rng.gen_range(0..=11)
}

/// Iterator over the in-bounds neighbours of a cell.
#[derive(Debug, Clone)]
pub struct Adjacent {
    center: Position,
    edge: usize,
    next: usize,
}

impl Iterator for Adjacent {
    type Item = Position;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(&(dx, dy)) = NEIGHBOUR_OFFSETS.get(self.next) {
            self.next += 1;
            let x = match self.center.x.checked_add_signed(dx) {
                Some(x) if x < self.edge => x,
                _ => continue,
            };
            let y = match self.center.y.checked_add_signed(dy) {
                Some(y) if y < self.edge => y,
                _ => continue,
            };
            return Some(Position::new(x, y));
        }
        None
    }
}
