//! A single in-memory table with store-assigned ids.

use std::collections::BTreeMap;

use welfare_core::assistance::{FinancialAssistance, RecurringInvoiceLog};
use welfare_core::files::{Folder, PersonalFile};
use welfare_core::lookup::LookupRow;
use welfare_core::messaging::{Conversation, ConversationParticipant, Message};
use welfare_core::outreach::{Borehole, Ticket};
use welfare_core::people::{Applicant, Employee};
use welfare_core::storage::{is_visible_to, CenterFilter, RepositoryError, Result};

/// A row with a store-assigned id.
pub trait Row: Clone {
    const ENTITY: &'static str;

    fn id(&self) -> i64;

    fn set_id(&mut self, id: i64);

    /// Center the row belongs to. Rows without one are unscoped.
    fn center_id(&self) -> Option<i64> {
        None
    }
}

macro_rules! row {
    ($ty:ty, $entity:literal) => {
        impl Row for $ty {
            const ENTITY: &'static str = $entity;

            fn id(&self) -> i64 {
                self.id
            }

            fn set_id(&mut self, id: i64) {
                self.id = id;
            }
        }
    };
    ($ty:ty, $entity:literal, centered) => {
        impl Row for $ty {
            const ENTITY: &'static str = $entity;

            fn id(&self) -> i64 {
                self.id
            }

            fn set_id(&mut self, id: i64) {
                self.id = id;
            }

            fn center_id(&self) -> Option<i64> {
                self.center_id
            }
        }
    };
}

row!(Employee, "Employee", centered);
row!(Applicant, "Applicant", centered);
row!(FinancialAssistance, "FinancialAssistance", centered);
row!(RecurringInvoiceLog, "RecurringInvoiceLog", centered);
row!(Borehole, "Borehole", centered);
row!(Ticket, "Ticket", centered);
row!(Conversation, "Conversation");
row!(ConversationParticipant, "ConversationParticipant");
row!(Message, "Message");
row!(LookupRow, "Lookup");
// Owner-scoped, not center-scoped.
row!(Folder, "Folder");
row!(PersonalFile, "PersonalFile");

/// Rows ordered by id, with an auto-increment counter.
#[derive(Debug)]
pub struct Table<T> {
    rows: BTreeMap<i64, T>,
    last_id: i64,
}

impl<T> Default for Table<T> {
    fn default() -> Self {
        Self {
            rows: BTreeMap::new(),
            last_id: 0,
        }
    }
}

pub fn not_found(entity_type: &'static str, id: i64) -> RepositoryError {
    RepositoryError::NotFound {
        entity_type,
        id: id.to_string(),
    }
}

impl<T: Row> Table<T> {
    /// Inserts a copy of `row` under the next id and returns it.
    pub fn insert(&mut self, row: &T) -> T {
        self.last_id += 1;
        let mut stored = row.clone();
        stored.set_id(self.last_id);
        self.rows.insert(self.last_id, stored.clone());
        stored
    }

    pub fn get(&self, id: i64) -> Option<&T> {
        self.rows.get(&id)
    }

    pub fn get_mut(&mut self, id: i64) -> Option<&mut T> {
        self.rows.get_mut(&id)
    }

    /// The row with `id` if it is visible under `center`.
    pub fn get_scoped(&self, id: i64, center: CenterFilter) -> Option<&T> {
        self.rows
            .get(&id)
            .filter(|row| is_visible_to(center, row.center_id()))
    }

    /// Rows visible under `center`, in id order.
    pub fn scoped(&self, center: CenterFilter) -> impl DoubleEndedIterator<Item = &T> + '_ {
        self.rows
            .values()
            .filter(move |row| is_visible_to(center, row.center_id()))
    }

    pub fn values(&self) -> impl DoubleEndedIterator<Item = &T> + '_ {
        self.rows.values()
    }

    /// Replaces an existing row.
    pub fn replace(&mut self, row: &T) -> Result<()> {
        let slot = self
            .rows
            .get_mut(&row.id())
            .ok_or_else(|| not_found(T::ENTITY, row.id()))?;
        *slot = row.clone();
        Ok(())
    }

    /// Removes a row visible under `center`.
    pub fn remove_scoped(&mut self, id: i64, center: CenterFilter) -> Result<T> {
        if self.get_scoped(id, center).is_none() {
            return Err(not_found(T::ENTITY, id));
        }
        self.rows.remove(&id).ok_or_else(|| not_found(T::ENTITY, id))
    }

    pub fn retain(&mut self, keep: impl FnMut(&i64, &mut T) -> bool) {
        self.rows.retain(keep);
    }
}
