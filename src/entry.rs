//! Audit entry types: severity levels, the operation taxonomy, and the
//! write-once [`LogEntry`] record.

use std::sync::atomic::{AtomicI64, Ordering};

use chrono::{DateTime, Local, TimeZone, Utc};
use serde::Serialize;

/// Placeholder identity used until a real user/session system exists.
///
/// The `user` field is a passive tag carried on every entry; nothing in this
/// crate enforces permissions based on it.
pub const DEFAULT_USER: &str = "admin";

/// Display format for entry timestamps.
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

// =============================================================================
// Severity
// =============================================================================

/// Severity level of an audit entry.
///
/// The `repr(u8)` discriminants define the total order used for filtering:
/// an entry is emitted only if its severity is at or above the logger's
/// configured minimum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[repr(u8)]
pub enum Severity {
    /// Diagnostic detail, off by default in production.
    Debug = 0,
    /// Normal operation.
    Info = 1,
    /// Potential issue, operation continued.
    Warning = 2,
    /// Operation failed (caught error).
    Error = 3,
    /// Unrecoverable system-level failure.
    Fatal = 4,
}

impl Severity {
    /// Every severity, in ascending order.
    pub const ALL: [Severity; 5] = [
        Severity::Debug,
        Severity::Info,
        Severity::Warning,
        Severity::Error,
        Severity::Fatal,
    ];

    /// Stable display label. Exhaustive: a new variant without a label is a
    /// compile error.
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Debug => "DEBUG",
            Severity::Info => "INFO",
            Severity::Warning => "WARNING",
            Severity::Error => "ERROR",
            Severity::Fatal => "FATAL",
        }
    }

    /// Parse from a display label (case-insensitive, common aliases accepted).
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_uppercase().as_str() {
            "DEBUG" => Some(Severity::Debug),
            "INFO" | "INFORMATION" => Some(Severity::Info),
            "WARNING" | "WARN" => Some(Severity::Warning),
            "ERROR" | "ERR" => Some(Severity::Error),
            "FATAL" | "CRITICAL" => Some(Severity::Fatal),
            _ => None,
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// =============================================================================
// Operation Taxonomy
// =============================================================================

/// Kind of database action an entry describes.
///
/// A closed tag set, purely descriptive: it drives no branching in the
/// logger besides display formatting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Operation {
    // Database lifecycle
    CreateDatabase,
    DropDatabase,
    UseDatabase,
    ShowDatabases,

    // Table lifecycle
    CreateTable,
    DropTable,
    ShowTables,
    RenameTable,
    AddColumn,
    DropColumn,
    ModifyColumn,
    RenameColumn,

    // Index lifecycle
    CreateIndex,
    DropIndex,

    // Data manipulation
    Insert,
    Delete,
    Update,
    Select,

    // System lifecycle
    SystemStart,
    SystemQuit,
    SystemError,

    // Catch-all
    Unknown,
}

/// Family an operation belongs to. Descriptive grouping only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperationFamily {
    Database,
    Table,
    Index,
    Data,
    System,
    Unknown,
}

impl Operation {
    /// Every operation tag.
    pub const ALL: [Operation; 22] = [
        Operation::CreateDatabase,
        Operation::DropDatabase,
        Operation::UseDatabase,
        Operation::ShowDatabases,
        Operation::CreateTable,
        Operation::DropTable,
        Operation::ShowTables,
        Operation::RenameTable,
        Operation::AddColumn,
        Operation::DropColumn,
        Operation::ModifyColumn,
        Operation::RenameColumn,
        Operation::CreateIndex,
        Operation::DropIndex,
        Operation::Insert,
        Operation::Delete,
        Operation::Update,
        Operation::Select,
        Operation::SystemStart,
        Operation::SystemQuit,
        Operation::SystemError,
        Operation::Unknown,
    ];

    /// Stable display label. Exhaustive on purpose.
    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::CreateDatabase => "CREATE_DATABASE",
            Operation::DropDatabase => "DROP_DATABASE",
            Operation::UseDatabase => "USE_DATABASE",
            Operation::ShowDatabases => "SHOW_DATABASES",
            Operation::CreateTable => "CREATE_TABLE",
            Operation::DropTable => "DROP_TABLE",
            Operation::ShowTables => "SHOW_TABLES",
            Operation::RenameTable => "RENAME_TABLE",
            Operation::AddColumn => "ADD_COLUMN",
            Operation::DropColumn => "DROP_COLUMN",
            Operation::ModifyColumn => "MODIFY_COLUMN",
            Operation::RenameColumn => "RENAME_COLUMN",
            Operation::CreateIndex => "CREATE_INDEX",
            Operation::DropIndex => "DROP_INDEX",
            Operation::Insert => "INSERT",
            Operation::Delete => "DELETE",
            Operation::Update => "UPDATE",
            Operation::Select => "SELECT",
            Operation::SystemStart => "SYSTEM_START",
            Operation::SystemQuit => "SYSTEM_QUIT",
            Operation::SystemError => "SYSTEM_ERROR",
            Operation::Unknown => "UNKNOWN",
        }
    }

    /// Parse from a display label (case-insensitive).
    pub fn from_str(s: &str) -> Option<Self> {
        let upper = s.to_uppercase();
        Operation::ALL
            .iter()
            .copied()
            .find(|op| op.as_str() == upper)
    }

    /// The descriptive family this operation belongs to.
    pub fn family(&self) -> OperationFamily {
        match self {
            Operation::CreateDatabase
            | Operation::DropDatabase
            | Operation::UseDatabase
            | Operation::ShowDatabases => OperationFamily::Database,
            Operation::CreateTable
            | Operation::DropTable
            | Operation::ShowTables
            | Operation::RenameTable
            | Operation::AddColumn
            | Operation::DropColumn
            | Operation::ModifyColumn
            | Operation::RenameColumn => OperationFamily::Table,
            Operation::CreateIndex | Operation::DropIndex => OperationFamily::Index,
            Operation::Insert | Operation::Delete | Operation::Update | Operation::Select => {
                OperationFamily::Data
            }
            Operation::SystemStart | Operation::SystemQuit | Operation::SystemError => {
                OperationFamily::System
            }
            Operation::Unknown => OperationFamily::Unknown,
        }
    }
}

impl std::fmt::Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// =============================================================================
// Timestamping
// =============================================================================

/// High-water mark of emitted timestamps, in unix seconds.
///
/// Wall clocks can step backwards (NTP adjustment); clamping against this
/// keeps entry timestamps non-decreasing within the process.
static LAST_UNIX_SECS: AtomicI64 = AtomicI64::new(0);

pub(crate) fn current_timestamp() -> String {
    let now = Local::now().timestamp();
    let prev = LAST_UNIX_SECS.fetch_max(now, Ordering::SeqCst);
    let secs = prev.max(now);

    Local
        .timestamp_opt(secs, 0)
        .single()
        .map(|dt| dt.format(TIMESTAMP_FORMAT).to_string())
        .unwrap_or_else(|| {
            // Ambiguous local time (DST transition): fall back to UTC.
            DateTime::<Utc>::from_timestamp(secs, 0)
                .map(|dt| dt.format(TIMESTAMP_FORMAT).to_string())
                .unwrap_or_default()
        })
}

// =============================================================================
// Log Entry
// =============================================================================

/// One immutable record of a single logged database event.
///
/// Entries are write-once: built with [`LogEntry::new`] and the `with_*`
/// methods, then handed to the logger, which serializes them and never
/// mutates or re-reads them afterwards. The `database` and `user` fields are
/// filled from the logger's current context at emit time when left empty.
#[derive(Debug, Clone, Serialize)]
pub struct LogEntry {
    /// Wall-clock timestamp, stamped at construction.
    pub timestamp: String,
    /// Acting user. Reserved tag; defaults to [`DEFAULT_USER`] via logger
    /// context when left empty.
    pub user: String,
    /// Severity level.
    pub severity: Severity,
    /// Operation classification.
    pub operation: Operation,
    /// Database the operation ran against. Empty means not applicable.
    pub database: String,
    /// Table the operation touched. Empty means not applicable.
    pub table: String,
    /// Best-effort textual reconstruction of the command. Not replay input.
    pub command: String,
    /// Whether the operation succeeded.
    pub success: bool,
    /// Auxiliary detail or error description. Empty means none.
    pub message: String,
    /// Rows affected by DML. `-1` means not applicable/unknown.
    pub affected_rows: i64,
}

impl LogEntry {
    /// Create an entry with the required fields, stamping the current time.
    pub fn new(
        severity: Severity,
        operation: Operation,
        command: impl Into<String>,
        success: bool,
    ) -> Self {
        Self {
            timestamp: current_timestamp(),
            user: String::new(),
            severity,
            operation,
            database: String::new(),
            table: String::new(),
            command: command.into(),
            success,
            message: String::new(),
            affected_rows: -1,
        }
    }

    /// Override the database context instead of inheriting the logger's.
    pub fn with_database(mut self, database: impl Into<String>) -> Self {
        self.database = database.into();
        self
    }

    /// Set the table the operation touched.
    pub fn with_table(mut self, table: impl Into<String>) -> Self {
        self.table = table.into();
        self
    }

    /// Attach an auxiliary message.
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    /// Set the affected row count.
    pub fn with_affected_rows(mut self, rows: i64) -> Self {
        self.affected_rows = rows;
        self
    }

    /// Override the acting user instead of inheriting the logger's.
    pub fn with_user(mut self, user: impl Into<String>) -> Self {
        self.user = user.into();
        self
    }

    /// Render the fixed-order text line:
    ///
    /// `timestamp | SEVERITY | OPERATION | database | table | command |
    /// SUCCESS/FAILED | affected_rows | message`
    ///
    /// The `affected_rows` field renders empty for the `-1` sentinel;
    /// consumers must tolerate trailing empty fields.
    pub fn format_line(&self) -> String {
        let rows = if self.affected_rows >= 0 {
            self.affected_rows.to_string()
        } else {
            String::new()
        };

        format!(
            "{} | {} | {} | {} | {} | {} | {} | {} | {}",
            self.timestamp,
            self.severity.as_str(),
            self.operation.as_str(),
            sanitize(&self.database),
            sanitize(&self.table),
            sanitize(&self.command),
            if self.success { "SUCCESS" } else { "FAILED" },
            rows,
            sanitize(&self.message),
        )
    }

    /// Serialize as one JSON object (for the JSON Lines record format).
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_default()
    }
}

/// Embedded line breaks would break the one-line-per-entry stream contract.
fn sanitize(field: &str) -> String {
    if field.contains(['\n', '\r']) {
        field.replace(['\n', '\r'], " ")
    } else {
        field.to_string()
    }
}

// =============================================================================
// Tests
// =============================================================================
