use common::errors::AppError;
use common::models::Timezone;

/// A client's ordered timezone list. The first entry is home.
///
/// Never empty, and never holds two records with the same (id, city) pair.
#[derive(Debug, Clone, PartialEq)]
pub struct ActiveTimezones {
    entries: Vec<Timezone>,
}

impl ActiveTimezones {
    pub fn new(home: Timezone) -> Self {
        Self {
            entries: vec![home],
        }
    }

    /// Build from persisted records, dropping later duplicates; `None` when empty
    pub fn from_records(records: Vec<Timezone>) -> Option<Self> {
        let mut entries: Vec<Timezone> = Vec::with_capacity(records.len());
        for record in records {
            if !entries.iter().any(|e| e.same_city(&record)) {
                entries.push(record);
            }
        }
        (!entries.is_empty()).then_some(Self { entries })
    }

    pub fn home(&self) -> &Timezone {
        &self.entries[0]
    }

    pub fn as_slice(&self) -> &[Timezone] {
        &self.entries
    }

    pub fn into_vec(self) -> Vec<Timezone> {
        self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn contains(&self, id: &str, city_name: &str) -> bool {
        self.position(id, city_name).is_some()
    }

    fn position(&self, id: &str, city_name: &str) -> Option<usize> {
        self.entries.iter().position(|e| e.key() == (id, city_name))
    }

    /// Append a record; returns false and leaves the list untouched for a duplicate
    pub fn add(&mut self, record: Timezone) -> bool {
        if self.contains(&record.id, &record.city_name) {
            return false;
        }
        self.entries.push(record);
        true
    }

    /// Remove a record; the next entry becomes home when home is removed
    pub fn remove(&mut self, id: &str, city_name: &str) -> Result<Timezone, AppError> {
        let index = self
            .position(id, city_name)
            .ok_or_else(|| AppError::not_found(format!("{} ({}) is not in the list", city_name, id)))?;

        if self.entries.len() == 1 {
            return Err(AppError::validation("Cannot remove the last timezone"));
        }

        Ok(self.entries.remove(index))
    }

    /// Make `record` home. If it is already listed, it trades places with the
    /// current home; otherwise it is inserted in front and the old home moves
    /// to second place.
    pub fn set_home(&mut self, record: Timezone) {
        match self.position(&record.id, &record.city_name) {
            Some(index) => self.entries.swap(0, index),
            None => self.entries.insert(0, record),
        }
    }

    /// Move the entry at `from` to `to`; whatever lands first is home
    pub fn reorder(&mut self, from: usize, to: usize) -> Result<(), AppError> {
        let len = self.entries.len();
        if from >= len || to >= len {
            return Err(AppError::validation(format!(
                "Positions {} -> {} out of range for {} entries",
                from, to, len
            )));
        }
        let entry = self.entries.remove(from);
        self.entries.insert(to, entry);
        Ok(())
    }
}
