//! # Degree Ledger CLI
//!
//! Command line front end for the ledger service. Every command prints one
//! JSON document on stdout; failures print an `ErrorReport` and exit with
//! status 1.
//!
//! ## Environment
//!
//! See `LedgerConfig::from_env` and `TelemetryConfig::from_env`. Logs go to
//! stderr. Metrics are per process and are not carried across invocations.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde_json::{json, Value};

use ledger_runtime::{FileLedgerService, LedgerConfig, LedgerResult, NewRecord};
use ledger_telemetry::{gather_metrics, init_telemetry, TelemetryConfig, TelemetryError};
use shared_types::{BlockId, Owner, OwnerId, RecordId, ReportableError};

/// Hash-linked degree ledger with quorum approval.
#[derive(Parser, Debug)]
#[command(name = "degree-ledger")]
#[command(about = "Tamper-evident ledger of academic degrees", long_about = None)]
struct Cli {
    /// Ledger file (overrides DL_LEDGER_PATH).
    #[arg(long, global = true)]
    ledger: Option<PathBuf>,

    /// Registry document (overrides DL_REGISTRY_PATH).
    #[arg(long, global = true)]
    registry: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Write genesis to the ledger and registry if missing.
    Init,

    /// Register a student.
    AddStudent {
        student_id: String,
        full_name: String,
        email: String,
    },

    /// Register a degree for a student.
    AddDegree {
        student_id: String,
        #[arg(long)]
        degree: String,
        #[arg(long)]
        institution: String,
        #[arg(long)]
        field: String,
        #[arg(long)]
        year: i32,
    },

    /// Register an approver.
    AddApprover { username: String },

    /// Submit a degree for approval.
    Submit { student_id: String, degree_id: u64 },

    /// Cast a vote on a pending block.
    Approve {
        block_id: u64,
        /// Approver username.
        #[arg(long)]
        approver: String,
        /// Record a negative (advisory) vote.
        #[arg(long)]
        reject: bool,
        #[arg(long)]
        comment: Option<String>,
    },

    /// Verify a block by hash or degree id.
    Verify { identifier: String },

    /// Print the committed ledger.
    Chain,

    /// Check every block of the ledger.
    Audit,

    /// Show where a degree stands.
    Status { degree_id: u64 },

    /// List blocks awaiting approval.
    Pending,

    /// Discard the ledger and start over from genesis.
    Reinit {
        /// Required: confirms the ledger may be discarded.
        #[arg(long)]
        yes: bool,
    },

    /// Mark rows committed to the ledger but still pending in the registry.
    Reconcile,

    /// Print the Prometheus text exposition of this process's counters.
    ///
    /// Counters live in process memory and every invocation is a new
    /// process, so nothing recorded by earlier commands is included.
    Metrics,
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    match init_telemetry(&TelemetryConfig::from_env()) {
        Ok(()) | Err(TelemetryError::AlreadyInitialized) => {}
        Err(e) => return Err(e).context("Failed to initialize telemetry"),
    }

    if let Commands::Metrics = cli.command {
        print!("{}", gather_metrics().context("Failed to gather metrics")?);
        return Ok(ExitCode::SUCCESS);
    }
    if let Commands::Reinit { yes: false } = cli.command {
        eprintln!("Refusing to discard the ledger without --yes");
        return Ok(ExitCode::from(2));
    }

    let mut config = LedgerConfig::from_env().context("Invalid configuration")?;
    if let Some(path) = cli.ledger {
        config = config.with_ledger_path(path);
    }
    if let Some(path) = cli.registry {
        config = config.with_registry_path(path);
    }

    let result = match FileLedgerService::open(config) {
        Ok(service) => run(&service, cli.command).await,
        Err(e) => Err(e),
    };

    match result {
        Ok(output) => {
            println!("{}", serde_json::to_string_pretty(&output)?);
            Ok(ExitCode::SUCCESS)
        }
        Err(e) => {
            tracing::error!("[runtime] ❌ {}", e);
            println!("{}", serde_json::to_string_pretty(&e.report())?);
            Ok(ExitCode::FAILURE)
        }
    }
}

async fn run(service: &FileLedgerService, command: Commands) -> LedgerResult<Value> {
    let output = match command {
        Commands::Init => json!(service.initialize_genesis().await?),

        Commands::AddStudent {
            student_id,
            full_name,
            email,
        } => json!(
            service
                .register_owner(Owner {
                    id: OwnerId::new(student_id),
                    full_name,
                    email,
                })
                .await?
        ),

        Commands::AddDegree {
            student_id,
            degree,
            institution,
            field,
            year,
        } => json!(
            service
                .add_record(NewRecord {
                    owner_id: OwnerId::new(student_id),
                    degree_name: degree,
                    institution,
                    field_of_study: field,
                    year_awarded: year,
                })
                .await?
        ),

        Commands::AddApprover { username } => json!(service.register_approver(&username).await?),

        Commands::Submit {
            student_id,
            degree_id,
        } => json!(
            service
                .submit(&OwnerId::new(student_id), RecordId(degree_id))
                .await?
        ),

        Commands::Approve {
            block_id,
            approver,
            reject,
            comment,
        } => {
            let approver = service.find_approver(&approver).await?;
            json!(
                service
                    .cast_approval(BlockId(block_id), approver.id, !reject, comment)
                    .await?
            )
        }

        Commands::Verify { identifier } => json!(service.verify(&identifier).await?),
        Commands::Chain => json!(service.get_chain().await?),
        Commands::Audit => json!(service.audit_chain().await?),
        Commands::Status { degree_id } => json!(service.record_status(RecordId(degree_id)).await?),
        Commands::Pending => json!(service.pending_blocks().await?),

        Commands::Reinit { .. } => {
            service.reinitialize_ledger().await?;
            json!({ "reinitialized": true })
        }

        Commands::Reconcile => json!({ "reconciled": service.reconcile().await? }),

        Commands::Metrics => Value::Null,
    };
    Ok(output)
}
