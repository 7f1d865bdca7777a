use crate::housing::desk::ResidenceDesk;
use crate::housing::forms::{EmployeeForm, ResidenceForm, StudentForm};
use crate::housing::persistence::InMemoryKeyValueStore;

pub(super) fn empty_desk() -> (ResidenceDesk<InMemoryKeyValueStore>, InMemoryKeyValueStore) {
    let store = InMemoryKeyValueStore::default();
    let desk = ResidenceDesk::open(store.clone()).expect("empty store opens");
    (desk, store)
}

pub(super) fn dorm_form(name: &str, square_footage: &str) -> ResidenceForm {
    ResidenceForm {
        name: name.to_string(),
        address: "12 College Walk".to_string(),
        size: square_footage.to_string(),
        kind: "dorm".to_string(),
    }
}

pub(super) fn apartment_form(name: &str, bedrooms: &str) -> ResidenceForm {
    ResidenceForm {
        name: name.to_string(),
        address: "400 Maple Court".to_string(),
        size: bedrooms.to_string(),
        kind: "apartment".to_string(),
    }
}

pub(super) fn student_form(name: &str, student_number: &str) -> StudentForm {
    StudentForm {
        name: name.to_string(),
        student_number: student_number.to_string(),
        gender: "female".to_string(),
    }
}

pub(super) fn employee_form(name: &str, employee_number: &str) -> EmployeeForm {
    EmployeeForm {
        name: name.to_string(),
        employee_number: employee_number.to_string(),
    }
}

/// Desk holding two dorms, one apartment, and two students.
pub(super) fn seeded_desk() -> (ResidenceDesk<InMemoryKeyValueStore>, InMemoryKeyValueStore) {
    let (mut desk, store) = empty_desk();
    desk.add_residence(dorm_form("North Hall 101", "1200"))
        .expect("dorm added");
    desk.add_residence(dorm_form("North Hall 102", "425"))
        .expect("dorm added");
    desk.add_residence(apartment_form("Maple Court 3B", "3"))
        .expect("apartment added");
    desk.add_student(student_form("Ada Lovelace", "S-1001"))
        .expect("student added");
    desk.add_student(student_form("Grace Hopper", "S-1002"))
        .expect("student added");
    (desk, store)
}
