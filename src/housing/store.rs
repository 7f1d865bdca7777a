use serde::de::DeserializeOwned;

use super::domain::{Employee, Entity, MaintenanceRequest, Residence, Student};
use super::persistence::{
    JsonPersistence, KeyValueStore, PersistenceError, EMPLOYEES_KEY, MAINTENANCE_REQUESTS_KEY,
    RESIDENCES_KEY, STUDENTS_KEY,
};

/// Append-only sequence of entities. Ids are handed out by the collection and
/// never reused; entries are never removed or reordered.
#[derive(Debug, Clone)]
pub struct Collection<T> {
    items: Vec<T>,
    next_id: u64,
}

impl<T> Default for Collection<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            next_id: 0,
        }
    }
}

impl<T: Entity> Collection<T> {
    /// Adopts previously persisted entries, resuming id allocation after the highest id seen.
    pub fn from_loaded(items: Vec<T>) -> Self {
        let next_id = items
            .iter()
            .map(|item| item.raw_id() + 1)
            .max()
            .unwrap_or(0);
        Self { items, next_id }
    }

    pub fn next_id(&self) -> T::Id {
        T::Id::from(self.next_id)
    }

    /// Allocates the next id, builds the entity with it, and appends it.
    pub fn append_with(&mut self, build: impl FnOnce(T::Id) -> T) -> &T {
        let id = self.next_id();
        self.next_id += 1;
        let index = self.items.len();
        self.items.push(build(id));
        &self.items[index]
    }

    pub fn get(&self, id: T::Id) -> Option<&T> {
        self.items.iter().find(|item| item.id() == id)
    }

    pub fn get_mut(&mut self, id: T::Id) -> Option<&mut T> {
        self.items.iter_mut().find(|item| item.id() == id)
    }

    pub fn as_slice(&self) -> &[T] {
        &self.items
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Every collection the desk owns.
#[derive(Debug, Clone, Default)]
pub struct CollectionStore {
    pub(crate) residences: Collection<Residence>,
    pub(crate) students: Collection<Student>,
    pub(crate) maintenance_requests: Collection<MaintenanceRequest>,
    pub(crate) employees: Collection<Employee>,
}

impl CollectionStore {
    pub fn load<S: KeyValueStore>(
        persistence: &JsonPersistence<S>,
    ) -> Result<Self, PersistenceError> {
        Ok(Self {
            residences: load_collection(persistence, RESIDENCES_KEY)?,
            students: load_collection(persistence, STUDENTS_KEY)?,
            maintenance_requests: load_collection(persistence, MAINTENANCE_REQUESTS_KEY)?,
            employees: load_collection(persistence, EMPLOYEES_KEY)?,
        })
    }

    pub fn residences(&self) -> &Collection<Residence> {
        &self.residences
    }

    pub fn students(&self) -> &Collection<Student> {
        &self.students
    }

    pub fn maintenance_requests(&self) -> &Collection<MaintenanceRequest> {
        &self.maintenance_requests
    }

    pub fn employees(&self) -> &Collection<Employee> {
        &self.employees
    }
}

fn load_collection<S, T>(
    persistence: &JsonPersistence<S>,
    key: &str,
) -> Result<Collection<T>, PersistenceError>
where
    S: KeyValueStore,
    T: Entity + DeserializeOwned,
{
    persistence.load(key).map(Collection::from_loaded)
}
