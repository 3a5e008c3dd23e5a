//! Ordered, densely numbered store of route legs.
//!
//! Positions are 1-based and, between public operations, always exactly
//! `1..=N`. Moves are built from a single primitive, `swap_adjacent`,
//! which parks one leg outside the map while the other slides over, so no
//! two legs ever share a key even midway through a shift.

use std::collections::BTreeMap;

use tracing::debug;

use crate::error::RouteError;
use crate::models::{Leg, NewLeg, ShiftDirection};

/// The legs of a route keyed by position.
///
/// Mutating operations validate everything before touching the map, so a
/// failed call leaves the store exactly as it was. Callers sharing a store
/// across threads must put it behind a single lock; the shift algorithm is
/// not meant to interleave.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SequenceStore {
    legs: BTreeMap<usize, Leg>,
}

impl SequenceStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of legs, `N`.
    pub fn count(&self) -> usize {
        self.legs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.legs.is_empty()
    }

    /// Append a leg at position `N + 1` and return that position.
    pub fn append(&mut self, new: NewLeg) -> Result<usize, RouteError> {
        new.validate()?;

        let position = self.count() + 1;
        debug!(
            position,
            name = %new.name,
            source = ?new.source,
            "appending leg"
        );
        self.legs.insert(position, Leg::from_new(position, new));
        debug_assert!(self.is_dense());
        Ok(position)
    }

    /// Look up the leg at `position`.
    pub fn get(&self, position: usize) -> Result<&Leg, RouteError> {
        self.legs
            .get(&position)
            .ok_or(RouteError::PositionOutOfRange {
                position,
                count: self.count(),
            })
    }

    /// The leg with the highest position, if any.
    pub fn last(&self) -> Option<&Leg> {
        self.legs.last_key_value().map(|(_, leg)| leg)
    }

    /// Legs in route order.
    pub fn iter(&self) -> impl Iterator<Item = &Leg> + '_ {
        self.legs.values()
    }

    /// Snapshot of every leg in route order.
    pub fn all(&self) -> Vec<Leg> {
        self.iter().cloned().collect()
    }

    /// Move the leg at `source` by `steps` slots in `direction`.
    ///
    /// Every leg strictly between the source and the destination moves one
    /// slot the other way. Returns the destination position. A destination
    /// outside `1..=N` fails with [`RouteError::ShiftOutOfRange`] and changes
    /// nothing; `steps == 0` is validated and then leaves the store as is.
    pub fn reposition(
        &mut self,
        source: usize,
        steps: usize,
        direction: ShiftDirection,
    ) -> Result<usize, RouteError> {
        let count = self.count();
        self.check_position(source)?;

        let destination = match direction {
            ShiftDirection::Up => source.checked_sub(steps).filter(|&dest| dest >= 1),
            ShiftDirection::Down => source.checked_add(steps).filter(|&dest| dest <= count),
        }
        .ok_or(RouteError::ShiftOutOfRange {
            from: source,
            steps,
            direction,
            count,
        })?;

        if steps == 0 {
            return Ok(source);
        }

        debug!(source, steps, %direction, destination, "shifting leg");
        let mut current = source;
        while current != destination {
            let next = match direction {
                ShiftDirection::Up => current - 1,
                ShiftDirection::Down => current + 1,
            };
            self.swap_adjacent(current, next);
            current = next;
        }
        self.renumber();

        debug_assert!(self.is_dense());
        Ok(destination)
    }

    /// Remove the leg at `position`, closing the gap it leaves.
    pub fn delete(&mut self, position: usize) -> Result<Leg, RouteError> {
        self.check_position(position)?;

        // Walk the doomed leg to the tail so every later leg drops one slot.
        let last = self.count();
        for current in position..last {
            self.swap_adjacent(current, current + 1);
        }
        let (_, mut removed) = self
            .legs
            .pop_last()
            .ok_or(RouteError::PositionOutOfRange { position, count: 0 })?;
        removed.position = position;
        self.renumber();

        debug!(position, name = %removed.name, remaining = self.count(), "deleted leg");
        debug_assert!(self.is_dense());
        Ok(removed)
    }

    /// True when keys are exactly `1..=N` and every leg agrees with its key.
    pub fn is_dense(&self) -> bool {
        self.legs.keys().copied().eq(1..=self.count())
            && self.legs.iter().all(|(key, leg)| *key == leg.position)
    }

    fn check_position(&self, position: usize) -> Result<(), RouteError> {
        if self.legs.contains_key(&position) {
            Ok(())
        } else {
            Err(RouteError::PositionOutOfRange {
                position,
                count: self.count(),
            })
        }
    }

    /// Swap the legs at two neighbouring positions in three moves.
    ///
    /// 1. park the leg at `to` outside the map,
    /// 2. move the leg at `from` into the vacated `to`,
    /// 3. drop the parked leg into `from`.
    fn swap_adjacent(&mut self, from: usize, to: usize) {
        debug_assert_eq!(from.abs_diff(to), 1);

        let Some(parked) = self.legs.remove(&to) else {
            return;
        };
        match self.legs.remove(&from) {
            Some(mover) => {
                self.place(to, mover);
                self.place(from, parked);
            }
            None => self.place(to, parked),
        }
    }

    fn place(&mut self, position: usize, mut leg: Leg) {
        leg.position = position;
        let previous = self.legs.insert(position, leg);
        debug_assert!(previous.is_none(), "position {position} was occupied");
    }

    /// Reassign positions `1..=N` in key order, closing any gaps.
    fn renumber(&mut self) {
        if self.is_dense() {
            return;
        }
        let legs = std::mem::take(&mut self.legs);
        self.legs = legs
            .into_values()
            .enumerate()
            .map(|(idx, mut leg)| {
                leg.position = idx + 1;
                (idx + 1, leg)
            })
            .collect();
    }
}

impl<'a> IntoIterator for &'a SequenceStore {
    type Item = &'a Leg;
    type IntoIter = std::collections::btree_map::Values<'a, usize, Leg>;

    fn into_iter(self) -> Self::IntoIter {
        self.legs.values()
    }
}
