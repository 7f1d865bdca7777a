use crate::commands::{
    run_assign, run_employee, run_maintenance, run_rents, run_residence, run_student,
    EmployeeCommand, MaintenanceCommand, RentsArgs, ResidenceCommand, StudentCommand,
};
use crate::config::AppConfig;
use crate::error::AppError;
use crate::housing::AssignmentForm;
use crate::server;
use crate::telemetry;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "Residence Desk",
    about = "Manage dorm rooms, apartments, students, and maintenance requests",
    version
)]
struct Cli {
    /// Directory holding the stored collections (overrides APP_DATA_DIR)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Add or list residences
    Residence {
        #[command(subcommand)]
        command: ResidenceCommand,
    },
    /// Add or list students
    Student {
        #[command(subcommand)]
        command: StudentCommand,
    },
    /// Assign a residence to a student
    Assign(AssignArgs),
    /// Calculate the rent of every residence
    Rents(RentsArgs),
    /// Add or list maintenance staff
    Employee {
        #[command(subcommand)]
        command: EmployeeCommand,
    },
    /// Submit, assign, complete, or list maintenance requests
    Maintenance {
        #[command(subcommand)]
        command: MaintenanceCommand,
    },
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
}

#[derive(Args, Debug)]
struct AssignArgs {
    /// Student id as shown by `student list`
    #[arg(long, default_value = "")]
    student: String,
    /// Residence id as shown by `residence list`
    #[arg(long, default_value = "")]
    residence: String,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let mut config = AppConfig::load()?;
    if let Some(data_dir) = cli.data_dir {
        config.storage.data_dir = data_dir;
    }

    telemetry::init(&config.telemetry)?;

    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(config, args).await,
        Command::Residence { command } => run_residence(&config, command),
        Command::Student { command } => run_student(&config, command),
        Command::Assign(args) => run_assign(
            &config,
            AssignmentForm {
                student: args.student,
                residence: args.residence,
            },
        ),
        Command::Rents(args) => run_rents(&config, args),
        Command::Employee { command } => run_employee(&config, command),
        Command::Maintenance { command } => run_maintenance(&config, command),
    }
}
