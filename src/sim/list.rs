//! Arena-backed mob list with cursor traversal
//!
//! Nodes live in a `Vec` of slots linked head-first; freed slots are chained
//! for reuse. A [`Cursor`] carries the slot generation, so a cursor to a
//! removed node never aliases whatever is later stored in the same slot.
//!
//! Removing while walking the list goes through [`MobList::remove`], which
//! hands back the successor:
//!
//! ```ignore
//! let mut cursor = list.first();
//! while let Some(c) = cursor {
//!     cursor = if doomed(&list, c) { list.remove(c) } else { list.next(c) };
//! }
//! ```

use super::mob::Mob;
use crate::error::MobError;

/// Generation-checked handle to a list node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Cursor {
    index: usize,
    generation: u32,
}

#[derive(Debug, Clone)]
enum Entry {
    Occupied {
        mob: Mob,
        prev: Option<usize>,
        next: Option<usize>,
    },
    Vacant {
        next_free: Option<usize>,
    },
}

#[derive(Debug, Clone)]
struct Slot {
    generation: u32,
    entry: Entry,
}

/// Unordered collection of mobs of one category
#[derive(Debug, Clone)]
pub struct MobList {
    slots: Vec<Slot>,
    head: Option<usize>,
    free: Option<usize>,
    len: usize,
    limit: usize,
}

impl Default for MobList {
    fn default() -> Self {
        Self::new()
    }
}

impl MobList {
    /// Create a list bounded only by available memory
    pub fn new() -> Self {
        Self::with_limit(usize::MAX)
    }

    /// Create a list that refuses to hold more than `limit` live mobs
    pub fn with_limit(limit: usize) -> Self {
        Self {
            slots: Vec::new(),
            head: None,
            free: None,
            len: 0,
            limit,
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Insert at the head of the list. O(1).
    ///
    /// On failure the list is left untouched.
    pub fn prepend(&mut self, mob: Mob) -> Result<Cursor, MobError> {
        if self.len >= self.limit {
            return Err(MobError::Allocation { live: self.len });
        }

        let index = match self.free {
            Some(index) => {
                self.free = match self.slots[index].entry {
                    Entry::Vacant { next_free } => next_free,
                    Entry::Occupied { .. } => None,
                };
                index
            }
            None => {
                self.slots
                    .try_reserve(1)
                    .map_err(|_| MobError::Allocation { live: self.len })?;
                self.slots.push(Slot {
                    generation: 0,
                    entry: Entry::Vacant { next_free: None },
                });
                self.slots.len() - 1
            }
        };

        let old_head = self.head;
        let slot = &mut self.slots[index];
        slot.entry = Entry::Occupied {
            mob,
            prev: None,
            next: old_head,
        };
        let generation = slot.generation;

        if let Some(old_head) = old_head {
            self.set_prev(old_head, Some(index));
        }
        self.head = Some(index);
        self.len += 1;

        Ok(Cursor { index, generation })
    }

    /// Prepend every mob, stopping at the first allocation failure
    pub fn extend_from<I>(&mut self, mobs: I) -> Result<(), MobError>
    where
        I: IntoIterator<Item = Mob>,
    {
        for mob in mobs {
            self.prepend(mob)?;
        }
        Ok(())
    }

    /// Unlink and drop the node under `cursor`, returning its successor.
    ///
    /// A stale cursor is ignored and yields `None`.
    pub fn remove(&mut self, cursor: Cursor) -> Option<Cursor> {
        if !self.is_live(cursor) {
            return None;
        }

        let slot = &mut self.slots[cursor.index];
        let entry = std::mem::replace(
            &mut slot.entry,
            Entry::Vacant {
                next_free: self.free,
            },
        );
        slot.generation = slot.generation.wrapping_add(1);
        self.free = Some(cursor.index);
        self.len -= 1;

        let Entry::Occupied { prev, next, .. } = entry else {
            return None;
        };
        match prev {
            Some(prev) => self.set_next(prev, next),
            None => self.head = next,
        }
        if let Some(next) = next {
            self.set_prev(next, prev);
        }

        next.map(|index| self.cursor_at(index))
    }

    /// Drop every node. Outstanding cursors become stale.
    pub fn clear(&mut self) {
        self.free = None;
        for (index, slot) in self.slots.iter_mut().enumerate().rev() {
            slot.generation = slot.generation.wrapping_add(1);
            slot.entry = Entry::Vacant {
                next_free: self.free,
            };
            self.free = Some(index);
        }
        self.head = None;
        self.len = 0;
    }

    pub fn first(&self) -> Option<Cursor> {
        self.head.map(|index| self.cursor_at(index))
    }

    pub fn next(&self, cursor: Cursor) -> Option<Cursor> {
        match self.occupied(cursor)? {
            Entry::Occupied { next, .. } => next.map(|index| self.cursor_at(index)),
            Entry::Vacant { .. } => None,
        }
    }

    pub fn get(&self, cursor: Cursor) -> Option<&Mob> {
        match self.occupied(cursor)? {
            Entry::Occupied { mob, .. } => Some(mob),
            Entry::Vacant { .. } => None,
        }
    }

    pub fn get_mut(&mut self, cursor: Cursor) -> Option<&mut Mob> {
        let slot = self.slots.get_mut(cursor.index)?;
        if slot.generation != cursor.generation {
            return None;
        }
        match &mut slot.entry {
            Entry::Occupied { mob, .. } => Some(mob),
            Entry::Vacant { .. } => None,
        }
    }

    /// Walk the list head-first, yielding each node's cursor with its mob
    pub fn entries(&self) -> Entries<'_> {
        Entries {
            list: self,
            next: self.head,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Mob> {
        self.entries().map(|(_, mob)| mob)
    }

    fn is_live(&self, cursor: Cursor) -> bool {
        self.occupied(cursor).is_some()
    }

    fn occupied(&self, cursor: Cursor) -> Option<&Entry> {
        let slot = self.slots.get(cursor.index)?;
        match &slot.entry {
            entry @ Entry::Occupied { .. } if slot.generation == cursor.generation => Some(entry),
            _ => None,
        }
    }

    fn cursor_at(&self, index: usize) -> Cursor {
        Cursor {
            index,
            generation: self.slots[index].generation,
        }
    }

    fn set_prev(&mut self, index: usize, to: Option<usize>) {
        if let Entry::Occupied { prev, .. } = &mut self.slots[index].entry {
            *prev = to;
        }
    }

    fn set_next(&mut self, index: usize, to: Option<usize>) {
        if let Entry::Occupied { next, .. } = &mut self.slots[index].entry {
            *next = to;
        }
    }
}

/// Iterator returned by [`MobList::entries`]
pub struct Entries<'a> {
    list: &'a MobList,
    next: Option<usize>,
}

impl<'a> Iterator for Entries<'a> {
    type Item = (Cursor, &'a Mob);

    fn next(&mut self) -> Option<Self::Item> {
        let list = self.list;
        let index = self.next?;
        let slot = &list.slots[index];
        match &slot.entry {
            Entry::Occupied { mob, next, .. } => {
                self.next = *next;
                let cursor = Cursor {
                    index,
                    generation: slot.generation,
                };
                Some((cursor, mob))
            }
            Entry::Vacant { .. } => {
                self.next = None;
                None
            }
        }
    }
}
