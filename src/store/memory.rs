// Copyright (C) 2026  Caprica Software Limited
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with this program.  If not, see <https://www.gnu.org/licenses/>.

//! In-memory storage backend.
//!
//! Used in tests in place of a real database or file. Clones share the same
//! records, so a test can keep a handle while the store owns another, and
//! failures can be switched on to exercise the fallback paths.

use std::{cell::RefCell, collections::HashMap, rc::Rc};

use crate::{
    model::Collection,
    store::{BackendError, StorageBackend},
};

#[derive(Debug, Default)]
struct Inner {
    records: HashMap<String, Collection>,
    failing: bool,
    stores: usize,
    closes: usize,
}

#[derive(Debug, Clone, Default)]
pub struct MemoryBackend {
    inner: Rc<RefCell<Inner>>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// A backend whose every operation fails until told otherwise.
    pub fn failing() -> Self {
        let backend = Self::new();
        backend.set_failing(true);
        backend
    }

    pub fn set_failing(&self, failing: bool) {
        self.inner.borrow_mut().failing = failing;
    }

    pub fn insert(&self, username: &str, collection: Collection) {
        self.inner
            .borrow_mut()
            .records
            .insert(username.to_string(), collection);
    }

    pub fn record(&self, username: &str) -> Option<Collection> {
        self.inner.borrow().records.get(username).cloned()
    }

    /// Number of successful writes.
    pub fn store_count(&self) -> usize {
        self.inner.borrow().stores
    }

    pub fn close_count(&self) -> usize {
        self.inner.borrow().closes
    }

    fn check(&self, operation: &str) -> Result<(), BackendError> {
        if self.inner.borrow().failing {
            Err(BackendError::Simulated(format!("simulated {operation} failure")))
        } else {
            Ok(())
        }
    }
}

impl StorageBackend for MemoryBackend {
    fn name(&self) -> &'static str {
        "memory"
    }

    fn fetch(&mut self, username: &str) -> Result<Option<Collection>, BackendError> {
        self.check("read")?;
        Ok(self.record(username))
    }

    fn store(&mut self, username: &str, collection: &Collection) -> Result<(), BackendError> {
        self.check("write")?;
        self.insert(username, collection.clone());
        self.inner.borrow_mut().stores += 1;
        Ok(())
    }

    fn close(&mut self) -> Result<(), BackendError> {
        self.check("close")?;
        self.inner.borrow_mut().closes += 1;
        Ok(())
    }
}
