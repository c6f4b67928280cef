//! Structured audit logging for an embedded SQL database engine.
//!
//! Records every database-level operation (schema changes, DML, index
//! maintenance, system lifecycle events) as structured entries, classifies
//! them by severity and operation kind, and persists them to one or two
//! append-only log streams: a general log receiving everything, and a
//! dedicated error log receiving entries at Error severity and above. Lines
//! can additionally be mirrored to the console.
//!
//! # Design Principles
//!
//! - **Write-once entries**: a [`LogEntry`] is built, serialized, and never
//!   touched again.
//! - **One guard, whole path**: filter check, formatting, both file writes
//!   and the console mirror happen under a single exclusive lock, so each
//!   stream carries complete lines in a strict total order.
//! - **Invisible on failure**: the logger may silently fail; the database
//!   operation it describes must not. No write-path error ever reaches the
//!   caller.
//! - **Explicit ownership**: there is no global singleton. The host process
//!   constructs one [`AuditLogger`] and passes it to whatever needs to log.
//!
//! # Modules
//!
//! - `entry`: severity levels, the operation taxonomy, and [`LogEntry`]
//! - `command`: pure pseudo-SQL command synthesis for audit display
//! - `logger`: the dual-stream logger, its configuration surface, and the
//!   convenience API
//!
//! # Example
//!
//! ```ignore
//! use sqltrail::{AuditConfig, AuditLogger, Operation, Severity, command};
//!
//! let logger = AuditLogger::with_paths("general.log", "error.log");
//! logger.set_current_database("school");
//!
//! // Typed wrappers at operation boundaries
//! logger.log_table_op(Operation::CreateTable, "students", true, "");
//! logger.log_data_op(Operation::Insert, "students", "", true, 3, "");
//!
//! // Synthesized command text for ALTER sub-kinds
//! logger.info(
//!     Operation::AddColumn,
//!     command::add_column("students", "email"),
//!     true,
//! );
//!
//! // Caught errors
//! logger.log_exception("executor::insert", "constraint violation");
//! ```

mod entry;
mod logger;

pub mod command;

pub use entry::{LogEntry, Operation, OperationFamily, Severity, DEFAULT_USER};
pub use logger::{AuditConfig, AuditLogger, RecordFormat};

// =============================================================================
// Macros for Call-Site Brevity
// =============================================================================

/// Debug-severity note with `format!` arguments.
///
/// ```ignore
/// audit_debug!(logger, "scanned {} pages", pages);
/// ```
#[macro_export]
macro_rules! audit_debug {
    ($logger:expr, $($arg:tt)*) => {
        $logger.debug(format!($($arg)*))
    };
}

/// Warning-severity note with `format!` arguments.
#[macro_export]
macro_rules! audit_warning {
    ($logger:expr, $($arg:tt)*) => {
        $logger.warning(format!($($arg)*))
    };
}

/// Fatal-severity note with `format!` arguments.
#[macro_export]
macro_rules! audit_fatal {
    ($logger:expr, $($arg:tt)*) => {
        $logger.fatal(format!($($arg)*))
    };
}

/// Error-severity record of a failed operation.
///
/// ```ignore
/// audit_error!(logger, Operation::Insert, "INSERT INTO orders", "constraint violation");
/// ```
#[macro_export]
macro_rules! audit_error {
    ($logger:expr, $op:expr, $command:expr, $message:expr) => {
        $logger.error($op, $command, $message)
    };
}

/// Record a caught error with its location tag.
///
/// ```ignore
/// audit_exception!(logger, "parser::parse_stmt", err);
/// ```
#[macro_export]
macro_rules! audit_exception {
    ($logger:expr, $location:expr, $error:expr) => {
        $logger.log_exception($location, $error)
    };
}

/// Info-severity record of an operation, with an optional message.
///
/// ```ignore
/// audit_info!(logger, Operation::Select, "SELECT ... FROM t", true);
/// audit_info!(logger, Operation::Select, "SELECT ... FROM t", true, "cache hit");
/// ```
#[macro_export]
macro_rules! audit_info {
    ($logger:expr, $op:expr, $command:expr, $success:expr) => {
        $logger.info($op, $command, $success)
    };
    ($logger:expr, $op:expr, $command:expr, $success:expr, $message:expr) => {
        $logger.info_with_message($op, $command, $success, $message)
    };
}

/// Record a database-lifecycle operation, with an optional message.
#[macro_export]
macro_rules! audit_db_op {
    ($logger:expr, $op:expr, $db:expr, $success:expr) => {
        $logger.log_database_op($op, $db, $success, "")
    };
    ($logger:expr, $op:expr, $db:expr, $success:expr, $message:expr) => {
        $logger.log_database_op($op, $db, $success, $message)
    };
}

/// Record a table-lifecycle operation, with an optional message.
#[macro_export]
macro_rules! audit_table_op {
    ($logger:expr, $op:expr, $table:expr, $success:expr) => {
        $logger.log_table_op($op, $table, $success, "")
    };
    ($logger:expr, $op:expr, $table:expr, $success:expr, $message:expr) => {
        $logger.log_table_op($op, $table, $success, $message)
    };
}

/// Record a DML operation with its affected-row count, with an optional
/// message.
#[macro_export]
macro_rules! audit_data_op {
    ($logger:expr, $op:expr, $table:expr, $command:expr, $success:expr, $rows:expr) => {
        $logger.log_data_op($op, $table, $command, $success, $rows, "")
    };
    ($logger:expr, $op:expr, $table:expr, $command:expr, $success:expr, $rows:expr, $message:expr) => {
        $logger.log_data_op($op, $table, $command, $success, $rows, $message)
    };
}
