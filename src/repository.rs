//! Resource repositories.
//!
//! The engine never talks to a backend itself. Screens load records through
//! a `ResourceRepository` and hand the results to the `ViewComposer`
//! (see `ViewComposer::load`, `create`, `update`, `delete`), which only
//! touches its base collection once the repository has confirmed.

use crate::value::RecordId;
use std::cell::{Cell, RefCell};
use std::fmt;
use thiserror::Error;

/// CRUD access to one kind of resource.
pub trait ResourceRepository<T> {
    /// What `create` takes: usually the record without its server-assigned
    /// fields.
    type Draft;
    type Error: std::error::Error + Send + Sync + 'static;

    fn list(&self) -> Result<Vec<T>, Self::Error>;
    fn create(&self, draft: Self::Draft) -> Result<T, Self::Error>;
    fn update(&self, record: T) -> Result<T, Self::Error>;
    fn delete(&self, id: &RecordId) -> Result<(), Self::Error>;
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RepositoryError {
    #[error("record {0} not found")]
    NotFound(RecordId),
    #[error("record {0} already exists")]
    Conflict(RecordId),
    #[error("repository is read-only")]
    ReadOnly,
}

/// Vec-backed repository that assigns integer ids on create.
///
/// Used by the demos and tests; `set_read_only(true)` makes every write
/// fail, which is handy for exercising rollback paths.
pub struct InMemoryRepository<T, D> {
    records: RefCell<Vec<T>>,
    next_id: Cell<i64>,
    id_fn: Box<dyn Fn(&T) -> RecordId>,
    make: Box<dyn Fn(i64, D) -> T>,
    read_only: Cell<bool>,
}

impl<T: Clone, D> InMemoryRepository<T, D> {
    /// `id_fn` reads a record's id; `make` builds a record from a freshly
    /// assigned id and a draft.
    pub fn new<I, M>(id_fn: I, make: M) -> Self
    where
        I: Fn(&T) -> RecordId + 'static,
        M: Fn(i64, D) -> T + 'static,
    {
        InMemoryRepository {
            records: RefCell::new(Vec::new()),
            next_id: Cell::new(1),
            id_fn: Box::new(id_fn),
            make: Box::new(make),
            read_only: Cell::new(false),
        }
    }

    /// Seed the store. Integer ids bump the id counter past the largest one.
    pub fn with_records(self, records: Vec<T>) -> Self {
        let max = records
            .iter()
            .filter_map(|r| (self.id_fn)(r).as_i64())
            .max()
            .unwrap_or(0);
        self.next_id.set(self.next_id.get().max(max + 1));
        *self.records.borrow_mut() = records;
        self
    }

    pub fn set_read_only(&self, read_only: bool) {
        self.read_only.set(read_only);
    }

    pub fn len(&self) -> usize {
        self.records.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.borrow().is_empty()
    }

    fn position(&self, id: &RecordId) -> Option<usize> {
        self.records.borrow().iter().position(|r| &(self.id_fn)(r) == id)
    }

    fn check_writable(&self) -> Result<(), RepositoryError> {
        if self.read_only.get() {
            Err(RepositoryError::ReadOnly)
        } else {
            Ok(())
        }
    }
}

impl<T: Clone, D> ResourceRepository<T> for InMemoryRepository<T, D> {
    type Draft = D;
    type Error = RepositoryError;

    fn list(&self) -> Result<Vec<T>, RepositoryError> {
        Ok(self.records.borrow().clone())
    }

    fn create(&self, draft: D) -> Result<T, RepositoryError> {
        self.check_writable()?;
        let id = self.next_id.get();
        let record = (self.make)(id, draft);
        let record_id = (self.id_fn)(&record);
        if self.position(&record_id).is_some() {
            return Err(RepositoryError::Conflict(record_id));
        }
        self.next_id.set(id + 1);
        self.records.borrow_mut().push(record.clone());
        Ok(record)
    }

    fn update(&self, record: T) -> Result<T, RepositoryError> {
        self.check_writable()?;
        let id = (self.id_fn)(&record);
        let pos = self.position(&id).ok_or(RepositoryError::NotFound(id))?;
        self.records.borrow_mut()[pos] = record.clone();
        Ok(record)
    }

    fn delete(&self, id: &RecordId) -> Result<(), RepositoryError> {
        self.check_writable()?;
        let pos = self
            .position(id)
            .ok_or_else(|| RepositoryError::NotFound(id.clone()))?;
        self.records.borrow_mut().remove(pos);
        Ok(())
    }
}

impl<T, D> fmt::Debug for InMemoryRepository<T, D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InMemoryRepository")
            .field("len", &self.records.borrow().len())
            .field("next_id", &self.next_id.get())
            .field("read_only", &self.read_only.get())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    struct Rating {
        id: i64,
        stars: u8,
    }

    fn repo() -> InMemoryRepository<Rating, u8> {
        InMemoryRepository::new(|r: &Rating| RecordId::Int(r.id), |id, stars| Rating { id, stars })
    }

    #[test]
    fn test_create_assigns_ids() {
        let repo = repo();
        let a = repo.create(5).unwrap();
        let b = repo.create(3).unwrap();
        assert_eq!(a, Rating { id: 1, stars: 5 });
        assert_eq!(b.id, 2);
        assert_eq!(repo.list().unwrap().len(), 2);
    }

    #[test]
    fn test_seeded_ids_continue() {
        let repo = repo().with_records(vec![Rating { id: 10, stars: 1 }]);
        assert_eq!(repo.create(4).unwrap().id, 11);
    }

    #[test]
    fn test_update_and_delete() {
        let repo = repo();
        let mut r = repo.create(2).unwrap();
        r.stars = 4;
        assert_eq!(repo.update(r.clone()).unwrap(), r);
        assert_eq!(repo.list().unwrap()[0].stars, 4);

        repo.delete(&RecordId::Int(r.id)).unwrap();
        assert!(repo.is_empty());
        assert_eq!(
            repo.delete(&RecordId::Int(r.id)),
            Err(RepositoryError::NotFound(RecordId::Int(1)))
        );
    }

    #[test]
    fn test_read_only_rejects_writes() {
        let repo = repo().with_records(vec![Rating { id: 1, stars: 1 }]);
        repo.set_read_only(true);
        assert_eq!(repo.create(5), Err(RepositoryError::ReadOnly));
        assert_eq!(repo.update(Rating { id: 1, stars: 2 }), Err(RepositoryError::ReadOnly));
        assert_eq!(repo.delete(&RecordId::Int(1)), Err(RepositoryError::ReadOnly));
        assert_eq!(repo.list().unwrap(), vec![Rating { id: 1, stars: 1 }]);
    }
}
