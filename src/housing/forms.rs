//! Raw field values as a front end collects them. Every field is free text;
//! missing fields deserialize as empty strings, same as an untouched input.

use serde::Deserialize;

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ResidenceForm {
    pub name: String,
    pub address: String,
    /// Square footage for dorm rooms, bedroom count for apartments.
    pub size: String,
    #[serde(rename = "type")]
    pub kind: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct StudentForm {
    pub name: String,
    #[serde(rename = "studentId")]
    pub student_number: String,
    pub gender: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct EmployeeForm {
    pub name: String,
    #[serde(rename = "employeeId")]
    pub employee_number: String,
}

/// Selection values are the ids published through the desk's option lists.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct AssignmentForm {
    pub student: String,
    pub residence: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct MaintenanceForm {
    pub student: String,
    pub description: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct RequestAssignmentForm {
    pub request: String,
    pub employee: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct CompletionForm {
    pub request: String,
}
