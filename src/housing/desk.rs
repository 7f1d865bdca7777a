use serde::Serialize;
use tracing::{debug, info};

use super::activity::ActivityLog;
use super::domain::{
    Employee, EmployeeId, Entity, MaintenanceRequest, RequestId, Residence, ResidenceId,
    ResidenceKind, Student, StudentId,
};
use super::forms::{
    AssignmentForm, CompletionForm, EmployeeForm, MaintenanceForm, RequestAssignmentForm,
    ResidenceForm, StudentForm,
};
use super::persistence::{
    JsonPersistence, KeyValueStore, PersistenceError, EMPLOYEES_KEY, MAINTENANCE_REQUESTS_KEY,
    RESIDENCES_KEY, STUDENTS_KEY,
};
use super::store::{Collection, CollectionStore};

/// Operation layer over the collection store. Every mutating operation
/// persists the collections it touched and records one activity line.
pub struct ResidenceDesk<S> {
    persistence: JsonPersistence<S>,
    store: CollectionStore,
    activity: ActivityLog,
}

/// Result of a desk operation. Unresolvable selections are not errors; they
/// leave every collection and the store untouched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum DeskOutcome {
    Applied { message: String },
    Skipped { reason: SkipReason },
}

impl DeskOutcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, DeskOutcome::Applied { .. })
    }

    pub fn message(&self) -> Option<&str> {
        match self {
            DeskOutcome::Applied { message } => Some(message.as_str()),
            DeskOutcome::Skipped { .. } => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    MissingSelection,
    UnknownSelection,
    MissingDescription,
}

impl SkipReason {
    pub const fn label(self) -> &'static str {
        match self {
            SkipReason::MissingSelection => "missing_selection",
            SkipReason::UnknownSelection => "unknown_selection",
            SkipReason::MissingDescription => "missing_description",
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum DeskError {
    #[error(transparent)]
    Persistence(#[from] PersistenceError),
    #[error("{field} must be a whole number, got '{value}'")]
    InvalidNumber { field: &'static str, value: String },
}

/// Rent computed for one residence.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RentLine {
    pub residence_id: ResidenceId,
    pub name: String,
    pub kind: &'static str,
    pub occupied: bool,
    pub rent: f64,
}

/// Entry of a selection list: `value` is what the front end sends back.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SelectOption {
    pub value: String,
    pub label: String,
}

impl<S: KeyValueStore> ResidenceDesk<S> {
    /// Loads every collection from `store`; absent keys start empty.
    pub fn open(store: S) -> Result<Self, DeskError> {
        let persistence = JsonPersistence::new(store);
        let store = CollectionStore::load(&persistence)?;
        info!(
            residences = store.residences().len(),
            students = store.students().len(),
            maintenance_requests = store.maintenance_requests().len(),
            employees = store.employees().len(),
            "residence desk opened"
        );

        Ok(Self {
            persistence,
            store,
            activity: ActivityLog::default(),
        })
    }

    pub fn add_residence(&mut self, form: ResidenceForm) -> Result<DeskOutcome, DeskError> {
        let size = parse_whole_number("size", &form.size)?;
        let kind = ResidenceKind::from_form(&form.kind, size);
        let ResidenceForm {
            name,
            address,
            kind: requested_kind,
            ..
        } = form;

        let residence = self
            .store
            .residences
            .append_with(|id| Residence::new(id, name, address, kind));
        let message = format!("Added {}: {}", requested_kind, residence.name);
        info!(residence_id = %residence.id, kind = kind.label(), "residence added");

        self.persist_residences()?;
        Ok(self.applied(message))
    }

    pub fn add_student(&mut self, form: StudentForm) -> Result<DeskOutcome, DeskError> {
        let StudentForm {
            name,
            student_number,
            gender,
        } = form;

        let student = self
            .store
            .students
            .append_with(|id| Student::new(id, name, student_number, gender));
        let message = format!("Added student: {}", student.name);
        info!(student_id = %student.id, "student added");

        self.persist_students()?;
        Ok(self.applied(message))
    }

    pub fn add_employee(&mut self, form: EmployeeForm) -> Result<DeskOutcome, DeskError> {
        let EmployeeForm {
            name,
            employee_number,
        } = form;

        let employee = self
            .store
            .employees
            .append_with(|id| Employee::new(id, name, employee_number));
        let message = format!("Added employee: {}", employee.name);
        info!(employee_id = %employee.id, "employee added");

        self.persist_employees()?;
        Ok(self.applied(message))
    }

    /// Assigns a residence to a student. The student's previous residence, if
    /// any, stays occupied.
    pub fn assign_residence(&mut self, form: AssignmentForm) -> Result<DeskOutcome, DeskError> {
        const OPERATION: &str = "assign_residence";

        let (student_id, residence_id) = match parse_pair::<StudentId, ResidenceId>(
            &form.student,
            &form.residence,
        ) {
            Ok(ids) => ids,
            Err(reason) => return Ok(skipped(OPERATION, reason)),
        };

        let (student, residence) = match (
            self.store.students.get_mut(student_id),
            self.store.residences.get_mut(residence_id),
        ) {
            (Some(student), Some(residence)) => (student, residence),
            _ => return Ok(skipped(OPERATION, SkipReason::UnknownSelection)),
        };

        student.assign_residence(residence);
        let message = format!("Assigned {} to {}", student.name, residence.name);
        info!(%student_id, %residence_id, "residence assigned");

        self.persist_students()?;
        self.persist_residences()?;
        Ok(self.applied(message))
    }

    /// Logs the rent of every residence in insertion order. Nothing is persisted.
    pub fn calculate_all_rents(&mut self) -> Vec<RentLine> {
        let lines: Vec<RentLine> = self
            .store
            .residences
            .iter()
            .map(|residence| RentLine {
                residence_id: residence.id,
                name: residence.name.clone(),
                kind: residence.kind.label(),
                occupied: residence.occupied,
                rent: residence.calculate_rent(),
            })
            .collect();

        for line in &lines {
            self.activity
                .record(format!("Rent for {}: ${}", line.name, line.rent));
        }
        lines
    }

    pub fn submit_maintenance_request(
        &mut self,
        form: MaintenanceForm,
    ) -> Result<DeskOutcome, DeskError> {
        const OPERATION: &str = "submit_maintenance_request";

        let student_id = match parse_selection::<StudentId>(&form.student) {
            Ok(id) => id,
            Err(reason) => return Ok(skipped(OPERATION, reason)),
        };
        if form.description.is_empty() {
            return Ok(skipped(OPERATION, SkipReason::MissingDescription));
        }
        let Some(student) = self.store.students.get(student_id) else {
            return Ok(skipped(OPERATION, SkipReason::UnknownSelection));
        };

        let description = form.description;
        let request = self
            .store
            .maintenance_requests
            .append_with(|id| student.submit_maintenance_request(id, description));
        let message = format!(
            "Maintenance request submitted by {}: {}",
            student.name, request.description
        );
        info!(request_id = %request.id, %student_id, "maintenance request submitted");

        self.persist_requests()?;
        Ok(self.applied(message))
    }

    pub fn assign_maintenance_employee(
        &mut self,
        form: RequestAssignmentForm,
    ) -> Result<DeskOutcome, DeskError> {
        const OPERATION: &str = "assign_maintenance_employee";

        let (request_id, employee_id) =
            match parse_pair::<RequestId, EmployeeId>(&form.request, &form.employee) {
                Ok(ids) => ids,
                Err(reason) => return Ok(skipped(OPERATION, reason)),
            };

        let (request, employee) = match (
            self.store.maintenance_requests.get_mut(request_id),
            self.store.employees.get(employee_id),
        ) {
            (Some(request), Some(employee)) => (request, employee),
            _ => return Ok(skipped(OPERATION, SkipReason::UnknownSelection)),
        };

        request.assign_employee(employee);
        let message = format!(
            "Assigned {} to maintenance request: {}",
            employee.name, request.description
        );
        info!(%request_id, %employee_id, status = request.status.label(), "employee assigned");

        self.persist_requests()?;
        Ok(self.applied(message))
    }

    pub fn complete_maintenance_request(
        &mut self,
        form: CompletionForm,
    ) -> Result<DeskOutcome, DeskError> {
        const OPERATION: &str = "complete_maintenance_request";

        let request_id = match parse_selection::<RequestId>(&form.request) {
            Ok(id) => id,
            Err(reason) => return Ok(skipped(OPERATION, reason)),
        };
        let Some(request) = self.store.maintenance_requests.get_mut(request_id) else {
            return Ok(skipped(OPERATION, SkipReason::UnknownSelection));
        };

        request.complete_request();
        let message = format!("Completed maintenance request: {}", request.description);
        info!(%request_id, "maintenance request completed");

        self.persist_requests()?;
        Ok(self.applied(message))
    }

    pub fn residence_options(&self) -> Vec<SelectOption> {
        options(&self.store.residences)
    }

    pub fn student_options(&self) -> Vec<SelectOption> {
        options(&self.store.students)
    }

    pub fn employee_options(&self) -> Vec<SelectOption> {
        options(&self.store.employees)
    }

    /// Requests are labelled with the issuing student so identical
    /// descriptions stay distinguishable.
    pub fn request_options(&self) -> Vec<SelectOption> {
        self.store
            .maintenance_requests
            .iter()
            .map(|request| {
                let issuer = self
                    .store
                    .students
                    .get(request.student)
                    .map_or("unknown student", |student| student.name.as_str());
                SelectOption {
                    value: request.id.to_string(),
                    label: format!("{issuer}: {}", request.description),
                }
            })
            .collect()
    }

    pub fn residences(&self) -> &[Residence] {
        self.store.residences.as_slice()
    }

    pub fn students(&self) -> &[Student] {
        self.store.students.as_slice()
    }

    pub fn maintenance_requests(&self) -> &[MaintenanceRequest] {
        self.store.maintenance_requests.as_slice()
    }

    pub fn employees(&self) -> &[Employee] {
        self.store.employees.as_slice()
    }

    pub fn activity(&self) -> &ActivityLog {
        &self.activity
    }

    pub fn storage(&self) -> &S {
        self.persistence.store()
    }

    fn applied(&mut self, message: String) -> DeskOutcome {
        self.activity.record(message.clone());
        DeskOutcome::Applied { message }
    }

    fn persist_residences(&self) -> Result<(), PersistenceError> {
        self.persistence
            .save(RESIDENCES_KEY, self.store.residences.as_slice())
    }

    fn persist_students(&self) -> Result<(), PersistenceError> {
        self.persistence
            .save(STUDENTS_KEY, self.store.students.as_slice())
    }

    fn persist_requests(&self) -> Result<(), PersistenceError> {
        self.persistence.save(
            MAINTENANCE_REQUESTS_KEY,
            self.store.maintenance_requests.as_slice(),
        )
    }

    fn persist_employees(&self) -> Result<(), PersistenceError> {
        self.persistence
            .save(EMPLOYEES_KEY, self.store.employees.as_slice())
    }
}

fn skipped(operation: &'static str, reason: SkipReason) -> DeskOutcome {
    debug!(operation, reason = reason.label(), "operation skipped");
    DeskOutcome::Skipped { reason }
}

fn parse_selection<I: From<u64>>(raw: &str) -> Result<I, SkipReason> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(SkipReason::MissingSelection);
    }
    trimmed
        .parse::<u64>()
        .map(I::from)
        .map_err(|_| SkipReason::UnknownSelection)
}

fn parse_pair<A, B>(first: &str, second: &str) -> Result<(A, B), SkipReason>
where
    A: From<u64>,
    B: From<u64>,
{
    Ok((parse_selection(first)?, parse_selection(second)?))
}

fn parse_whole_number(field: &'static str, raw: &str) -> Result<u32, DeskError> {
    raw.trim()
        .parse::<u32>()
        .map_err(|_| DeskError::InvalidNumber {
            field,
            value: raw.to_string(),
        })
}

fn options<T: Entity>(collection: &Collection<T>) -> Vec<SelectOption> {
    collection
        .iter()
        .map(|item| SelectOption {
            value: item.id().to_string(),
            label: item.label().to_string(),
        })
        .collect()
}
