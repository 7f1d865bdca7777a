use crate::config::AppConfig;
use crate::error::AppError;
use crate::housing::{
    write_rent_roll, AssignmentForm, CompletionForm, DeskOutcome, EmployeeForm, FileKeyValueStore,
    MaintenanceForm, RequestAssignmentForm, ResidenceDesk, ResidenceForm, StudentForm,
};
use clap::{Args, Subcommand};
use std::io;
use tracing::warn;

type Desk = ResidenceDesk<FileKeyValueStore>;

#[derive(Subcommand, Debug)]
pub(crate) enum ResidenceCommand {
    /// Add a dorm room or an apartment
    Add(AddResidenceArgs),
    /// List residences with their ids, occupancy, and rent
    List,
}

#[derive(Args, Debug)]
pub(crate) struct AddResidenceArgs {
    #[arg(long)]
    name: String,
    #[arg(long, default_value = "")]
    address: String,
    /// Square footage for a dorm room, bedroom count for an apartment
    #[arg(long)]
    size: String,
    /// `dorm` adds a dorm room; any other value adds an apartment
    #[arg(long = "type", default_value = "apartment")]
    kind: String,
}

#[derive(Subcommand, Debug)]
pub(crate) enum StudentCommand {
    /// Register a student
    Add(AddStudentArgs),
    /// List students and their assigned residence
    List,
}

#[derive(Args, Debug)]
pub(crate) struct AddStudentArgs {
    #[arg(long)]
    name: String,
    /// Campus student number
    #[arg(long = "student-id", default_value = "")]
    student_number: String,
    #[arg(long, default_value = "")]
    gender: String,
}

#[derive(Subcommand, Debug)]
pub(crate) enum EmployeeCommand {
    /// Register a maintenance employee
    Add(AddEmployeeArgs),
    /// List employees
    List,
}

#[derive(Args, Debug)]
pub(crate) struct AddEmployeeArgs {
    #[arg(long)]
    name: String,
    /// Staff number
    #[arg(long = "employee-id", default_value = "")]
    employee_number: String,
}

#[derive(Subcommand, Debug)]
pub(crate) enum MaintenanceCommand {
    /// Submit a request on behalf of a student
    Submit {
        #[arg(long, default_value = "")]
        student: String,
        #[arg(long, default_value = "")]
        description: String,
    },
    /// Put an employee on a request
    Assign {
        #[arg(long, default_value = "")]
        request: String,
        #[arg(long, default_value = "")]
        employee: String,
    },
    /// Mark a request completed
    Complete {
        #[arg(long, default_value = "")]
        request: String,
    },
    /// List requests with their status
    List,
}

#[derive(Args, Debug)]
pub(crate) struct RentsArgs {
    /// Write the rent roll as CSV to stdout instead of log lines
    #[arg(long)]
    csv: bool,
}

fn open_desk(config: &AppConfig) -> Result<Desk, AppError> {
    let store = FileKeyValueStore::open(&config.storage.data_dir)?;
    Ok(ResidenceDesk::open(store)?)
}

fn print_activity(desk: &Desk) {
    for message in desk.activity().messages() {
        println!("{message}");
    }
}

fn report(desk: &Desk, outcome: &DeskOutcome) {
    match outcome {
        DeskOutcome::Applied { .. } => print_activity(desk),
        DeskOutcome::Skipped { reason } => {
            warn!(reason = reason.label(), "selection did not resolve; nothing changed")
        }
    }
}

pub(crate) fn run_residence(config: &AppConfig, command: ResidenceCommand) -> Result<(), AppError> {
    let mut desk = open_desk(config)?;
    match command {
        ResidenceCommand::Add(args) => {
            let outcome = desk.add_residence(ResidenceForm {
                name: args.name,
                address: args.address,
                size: args.size,
                kind: args.kind,
            })?;
            report(&desk, &outcome);
        }
        ResidenceCommand::List => {
            for residence in desk.residences() {
                println!(
                    "{}  {}  {}  {}  {}  ${}",
                    residence.id,
                    residence.name,
                    residence.address,
                    residence.kind.label(),
                    if residence.occupied { "occupied" } else { "vacant" },
                    residence.calculate_rent()
                );
            }
        }
    }
    Ok(())
}

pub(crate) fn run_student(config: &AppConfig, command: StudentCommand) -> Result<(), AppError> {
    let mut desk = open_desk(config)?;
    match command {
        StudentCommand::Add(args) => {
            let outcome = desk.add_student(StudentForm {
                name: args.name,
                student_number: args.student_number,
                gender: args.gender,
            })?;
            report(&desk, &outcome);
        }
        StudentCommand::List => {
            for student in desk.students() {
                let residence = student
                    .assigned_residence
                    .and_then(|id| desk.residences().iter().find(|r| r.id == id))
                    .map_or("-", |residence| residence.name.as_str());
                println!(
                    "{}  {} ({}, {})  residence: {}",
                    student.id, student.name, student.student_number, student.gender, residence
                );
            }
        }
    }
    Ok(())
}

pub(crate) fn run_assign(config: &AppConfig, form: AssignmentForm) -> Result<(), AppError> {
    let mut desk = open_desk(config)?;
    let outcome = desk.assign_residence(form)?;
    report(&desk, &outcome);
    Ok(())
}

pub(crate) fn run_rents(config: &AppConfig, args: RentsArgs) -> Result<(), AppError> {
    let mut desk = open_desk(config)?;
    let lines = desk.calculate_all_rents();
    if args.csv {
        write_rent_roll(io::stdout().lock(), &lines)?;
    } else {
        print_activity(&desk);
    }
    Ok(())
}

pub(crate) fn run_employee(config: &AppConfig, command: EmployeeCommand) -> Result<(), AppError> {
    let mut desk = open_desk(config)?;
    match command {
        EmployeeCommand::Add(args) => {
            let outcome = desk.add_employee(EmployeeForm {
                name: args.name,
                employee_number: args.employee_number,
            })?;
            report(&desk, &outcome);
        }
        EmployeeCommand::List => {
            for employee in desk.employees() {
                println!(
                    "{}  {} ({})",
                    employee.id, employee.name, employee.employee_number
                );
            }
        }
    }
    Ok(())
}

pub(crate) fn run_maintenance(
    config: &AppConfig,
    command: MaintenanceCommand,
) -> Result<(), AppError> {
    let mut desk = open_desk(config)?;
    let outcome = match command {
        MaintenanceCommand::Submit {
            student,
            description,
        } => desk.submit_maintenance_request(MaintenanceForm {
            student,
            description,
        })?,
        MaintenanceCommand::Assign { request, employee } => {
            desk.assign_maintenance_employee(RequestAssignmentForm { request, employee })?
        }
        MaintenanceCommand::Complete { request } => {
            desk.complete_maintenance_request(CompletionForm { request })?
        }
        MaintenanceCommand::List => {
            let labels = desk.request_options();
            for (request, option) in desk.maintenance_requests().iter().zip(labels) {
                let employee = request
                    .assigned_employee
                    .and_then(|id| desk.employees().iter().find(|e| e.id == id))
                    .map_or("-", |employee| employee.name.as_str());
                println!(
                    "{}  [{}]  {}  employee: {}",
                    request.id,
                    request.status.label(),
                    option.label,
                    employee
                );
            }
            return Ok(());
        }
    };
    report(&desk, &outcome);
    Ok(())
}
