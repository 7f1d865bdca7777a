//! Residence desk: dorm rooms, apartments, students, employees and
//! maintenance requests, persisted through a key-value store.

pub mod activity;
pub mod desk;
pub mod domain;
pub mod forms;
pub mod persistence;
pub mod report;
pub mod store;

#[cfg(test)]
mod tests;

pub use activity::{ActivityEntry, ActivityLog};
pub use desk::{DeskError, DeskOutcome, RentLine, ResidenceDesk, SelectOption, SkipReason};
pub use domain::{
    Employee, EmployeeId, Entity, MaintenanceRequest, RequestId, RequestStatus, Residence,
    ResidenceId, ResidenceKind, Student, StudentId,
};
pub use forms::{
    AssignmentForm, CompletionForm, EmployeeForm, MaintenanceForm, RequestAssignmentForm,
    ResidenceForm, StudentForm,
};
pub use persistence::{
    FileKeyValueStore, InMemoryKeyValueStore, JsonPersistence, KeyValueStore, PersistenceError,
    StorageError, EMPLOYEES_KEY, MAINTENANCE_REQUESTS_KEY, RESIDENCES_KEY, STUDENTS_KEY,
};
pub use report::write_rent_roll;
pub use store::{Collection, CollectionStore};
