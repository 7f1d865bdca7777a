use std::fmt;

use serde::{Deserialize, Serialize};

pub const DORM_RATE_PER_SQUARE_FOOT: f64 = 0.5;
pub const APARTMENT_BASE_RENT: f64 = 500.0;
pub const APARTMENT_RENT_PER_BEDROOM: f64 = 200.0;

macro_rules! entity_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub u64);

        impl $name {
            pub const fn get(self) -> u64 {
                self.0
            }
        }

        impl From<u64> for $name {
            fn from(value: u64) -> Self {
                Self(value)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

entity_id!(
    /// Stable identifier of a residence inside the residence collection.
    ResidenceId
);
entity_id!(
    /// Stable identifier of a student record (not the campus student number).
    StudentId
);
entity_id!(
    /// Stable identifier of a maintenance request.
    RequestId
);
entity_id!(
    /// Stable identifier of an employee record (not the staff number).
    EmployeeId
);

/// Anything kept in a collection: carries its own id and a display label for selection lists.
pub trait Entity {
    type Id: Copy + Eq + fmt::Display + From<u64>;

    fn id(&self) -> Self::Id;
    fn raw_id(&self) -> u64;
    fn label(&self) -> &str;
}

/// Variant payload for a residence. The `type` tag is persisted so reloaded
/// residences keep their rent rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ResidenceKind {
    Dorm {
        #[serde(rename = "squareFootage")]
        square_footage: u32,
    },
    Apartment {
        #[serde(rename = "numberOfBedrooms")]
        number_of_bedrooms: u32,
    },
}

impl ResidenceKind {
    /// `"dorm"` selects a dorm room; every other type value falls back to an apartment.
    pub fn from_form(kind: &str, size: u32) -> Self {
        if kind == "dorm" {
            Self::Dorm {
                square_footage: size,
            }
        } else {
            Self::Apartment {
                number_of_bedrooms: size,
            }
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            ResidenceKind::Dorm { .. } => "dorm",
            ResidenceKind::Apartment { .. } => "apartment",
        }
    }

    pub fn calculate_rent(self) -> f64 {
        match self {
            ResidenceKind::Dorm { square_footage } => {
                f64::from(square_footage) * DORM_RATE_PER_SQUARE_FOOT
            }
            ResidenceKind::Apartment { number_of_bedrooms } => {
                APARTMENT_BASE_RENT + f64::from(number_of_bedrooms) * APARTMENT_RENT_PER_BEDROOM
            }
        }
    }
}

/// A rentable unit. Occupancy is only ever switched on through a student assignment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Residence {
    pub id: ResidenceId,
    pub name: String,
    pub address: String,
    #[serde(rename = "isOccupied", default)]
    pub occupied: bool,
    #[serde(flatten)]
    pub kind: ResidenceKind,
}

impl Residence {
    pub fn new(id: ResidenceId, name: String, address: String, kind: ResidenceKind) -> Self {
        Self {
            id,
            name,
            address,
            occupied: false,
            kind,
        }
    }

    pub fn dorm(id: ResidenceId, name: &str, address: &str, square_footage: u32) -> Self {
        Self::new(
            id,
            name.to_string(),
            address.to_string(),
            ResidenceKind::Dorm { square_footage },
        )
    }

    pub fn apartment(id: ResidenceId, name: &str, address: &str, number_of_bedrooms: u32) -> Self {
        Self::new(
            id,
            name.to_string(),
            address.to_string(),
            ResidenceKind::Apartment { number_of_bedrooms },
        )
    }

    pub fn occupy(&mut self) {
        self.occupied = true;
    }

    pub fn vacate(&mut self) {
        self.occupied = false;
    }

    /// Monthly rent, unrounded.
    pub fn calculate_rent(&self) -> f64 {
        self.kind.calculate_rent()
    }

    pub fn is_dorm(&self) -> bool {
        matches!(self.kind, ResidenceKind::Dorm { .. })
    }
}

impl Entity for Residence {
    type Id = ResidenceId;

    fn id(&self) -> ResidenceId {
        self.id
    }

    fn raw_id(&self) -> u64 {
        self.id.get()
    }

    fn label(&self) -> &str {
        &self.name
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Student {
    pub id: StudentId,
    pub name: String,
    #[serde(rename = "studentId")]
    pub student_number: String,
    pub gender: String,
    #[serde(default)]
    pub assigned_residence: Option<ResidenceId>,
}

impl Student {
    pub fn new(id: StudentId, name: String, student_number: String, gender: String) -> Self {
        Self {
            id,
            name,
            student_number,
            gender,
            assigned_residence: None,
        }
    }

    /// Points the student at `residence` and marks it occupied. A previously
    /// assigned residence keeps its occupied flag.
    pub fn assign_residence(&mut self, residence: &mut Residence) {
        self.assigned_residence = Some(residence.id);
        residence.occupy();
    }

    /// Builds a request issued by this student. Storing it is up to the caller.
    pub fn submit_maintenance_request(
        &self,
        id: RequestId,
        description: impl Into<String>,
    ) -> MaintenanceRequest {
        MaintenanceRequest {
            id,
            description: description.into(),
            student: self.id,
            status: RequestStatus::Submitted,
            assigned_employee: None,
        }
    }
}

impl Entity for Student {
    type Id = StudentId;

    fn id(&self) -> StudentId {
        self.id
    }

    fn raw_id(&self) -> u64 {
        self.id.get()
    }

    fn label(&self) -> &str {
        &self.name
    }
}

/// Lifecycle of a maintenance request. Transitions are not guarded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestStatus {
    Submitted,
    InProgress,
    Completed,
}

impl RequestStatus {
    pub const fn label(self) -> &'static str {
        match self {
            RequestStatus::Submitted => "submitted",
            RequestStatus::InProgress => "in_progress",
            RequestStatus::Completed => "completed",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MaintenanceRequest {
    pub id: RequestId,
    pub description: String,
    pub student: StudentId,
    pub status: RequestStatus,
    #[serde(default)]
    pub assigned_employee: Option<EmployeeId>,
}

impl MaintenanceRequest {
    pub fn assign_employee(&mut self, employee: &Employee) {
        self.assigned_employee = Some(employee.id);
        self.status = RequestStatus::InProgress;
    }

    pub fn complete_request(&mut self) {
        self.status = RequestStatus::Completed;
    }
}

impl Entity for MaintenanceRequest {
    type Id = RequestId;

    fn id(&self) -> RequestId {
        self.id
    }

    fn raw_id(&self) -> u64 {
        self.id.get()
    }

    fn label(&self) -> &str {
        &self.description
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Employee {
    pub id: EmployeeId,
    pub name: String,
    #[serde(rename = "employeeId")]
    pub employee_number: String,
}

impl Employee {
    pub fn new(id: EmployeeId, name: String, employee_number: String) -> Self {
        Self {
            id,
            name,
            employee_number,
        }
    }
}

impl Entity for Employee {
    type Id = EmployeeId;

    fn id(&self) -> EmployeeId {
        self.id
    }

    fn raw_id(&self) -> u64 {
        self.id.get()
    }

    fn label(&self) -> &str {
        &self.name
    }
}
