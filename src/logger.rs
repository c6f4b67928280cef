//! The audit logger: dual append-only sinks, severity filtering, console
//! mirroring, and the convenience API used at engine call sites.
//!
//! # Write-path contract
//!
//! Every entry travels through [`AuditLogger::log`] while one exclusive
//! guard is held over the whole path: the filter decision, context fill,
//! rendering, both file appends, and the console mirror. Lines therefore
//! appear in each stream complete and in guard-acquisition order.
//!
//! # Failure contract
//!
//! Logging is invisible on failure. A sink that cannot be opened or written
//! degrades to a no-op; `log` and every setter return `()`. The outcome of
//! the database operation being described is never altered by the logger's
//! inability to record it.

use std::fmt;
use std::fs::{File, OpenOptions};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use crate::command;
use crate::entry::{LogEntry, Operation, Severity, DEFAULT_USER};

// =============================================================================
// Configuration
// =============================================================================

/// On-disk rendering of entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordFormat {
    /// Fixed-order ` | `-separated text lines (default).
    Text,
    /// One JSON object per line.
    JsonLines,
}

/// Startup configuration for an [`AuditLogger`].
///
/// Everything here can also be changed later through the setter surface;
/// changes apply to subsequent entries only.
#[derive(Debug, Clone)]
pub struct AuditConfig {
    /// Path of the general log. `None` disables file output on that stream.
    pub general_log_path: Option<PathBuf>,
    /// Path of the dedicated error log (entries at Error and above).
    pub error_log_path: Option<PathBuf>,
    /// Minimum severity an entry needs to be emitted at all.
    pub min_severity: Severity,
    /// Mirror emitted lines to stdout/stderr.
    pub console_mirror: bool,
    /// Rendering of entries on every stream.
    pub format: RecordFormat,
    /// Initial user context.
    pub user: String,
    /// Initial current-database context.
    pub database: String,
}

impl Default for AuditConfig {
    fn default() -> Self {
        Self {
            general_log_path: None,
            error_log_path: None,
            min_severity: Severity::Info,
            console_mirror: false,
            format: RecordFormat::Text,
            user: DEFAULT_USER.to_string(),
            database: String::new(),
        }
    }
}

// =============================================================================
// Sink
// =============================================================================

/// One append-only output stream.
///
/// The file handle opens lazily on first write, in append mode, creating the
/// file if absent. An unopenable path leaves the sink a no-op; the open is
/// retried on the next write so a path that becomes valid starts receiving
/// entries.
struct Sink {
    path: Option<PathBuf>,
    writer: Option<BufWriter<File>>,
}

impl Sink {
    fn new(path: Option<PathBuf>) -> Self {
        Self { path, writer: None }
    }

    /// Adopt a new path, closing the previous handle first.
    fn set_path(&mut self, path: Option<PathBuf>) {
        self.writer = None;
        self.path = path;
    }

    /// Append one line and flush it to the OS before returning.
    fn write_line(&mut self, line: &str) -> io::Result<()> {
        let Some(path) = self.path.as_ref() else {
            return Ok(());
        };

        if self.writer.is_none() {
            let file = OpenOptions::new().create(true).append(true).open(path)?;
            self.writer = Some(BufWriter::new(file));
        }

        if let Some(w) = self.writer.as_mut() {
            w.write_all(line.as_bytes())?;
            w.write_all(b"\n")?;
            w.flush()?;
        }
        Ok(())
    }
}

// =============================================================================
// Audit Logger
// =============================================================================

/// Mutable state behind the single exclusive guard.
struct LoggerInner {
    general: Sink,
    errors: Sink,
    min_severity: Severity,
    console_mirror: bool,
    format: RecordFormat,
    database: String,
    user: String,
}

/// Thread-safe audit logger with a general and a dedicated error stream.
///
/// One logger per process is a deployment convention, not an enforced
/// guarantee: construct it during host setup and hand it (by reference or
/// `Arc`) to every component that logs.
pub struct AuditLogger {
    inner: Mutex<LoggerInner>,
}

impl AuditLogger {
    /// Create a logger from a configuration. Never fails: sinks open lazily
    /// and invalid paths degrade to no-ops.
    pub fn new(config: AuditConfig) -> Self {
        Self {
            inner: Mutex::new(LoggerInner {
                general: Sink::new(config.general_log_path),
                errors: Sink::new(config.error_log_path),
                min_severity: config.min_severity,
                console_mirror: config.console_mirror,
                format: config.format,
                database: config.database,
                user: config.user,
            }),
        }
    }

    /// Logger writing to the given general and error log paths.
    pub fn with_paths(general: impl AsRef<Path>, errors: impl AsRef<Path>) -> Self {
        Self::new(AuditConfig {
            general_log_path: Some(general.as_ref().to_path_buf()),
            error_log_path: Some(errors.as_ref().to_path_buf()),
            ..AuditConfig::default()
        })
    }

    /// Logger that only mirrors to the console (no files). Useful for CLI
    /// sessions and tests.
    pub fn console_only() -> Self {
        Self::new(AuditConfig {
            console_mirror: true,
            ..AuditConfig::default()
        })
    }

    // -------------------------------------------------------------------------
    // Write path
    // -------------------------------------------------------------------------

    /// Emit one entry.
    ///
    /// Filtered entries (below the configured minimum) produce no I/O at
    /// all, not even console output. Entries at `Error` and above are
    /// additionally appended to the error stream, so the error log is always
    /// a subset of the general log. All I/O failures are swallowed.
    pub fn log(&self, mut entry: LogEntry) {
        let Ok(mut inner) = self.inner.lock() else {
            // A poisoned guard means a writer panicked; logging must not
            // propagate that into the host operation.
            return;
        };

        if entry.severity < inner.min_severity {
            return;
        }

        if entry.database.is_empty() {
            entry.database = inner.database.clone();
        }
        if entry.user.is_empty() {
            // The user field is never empty on an emitted entry, even if the
            // configured context was cleared.
            entry.user = if inner.user.is_empty() {
                DEFAULT_USER.to_string()
            } else {
                inner.user.clone()
            };
        }

        let line = match inner.format {
            RecordFormat::Text => entry.format_line(),
            RecordFormat::JsonLines => entry.to_json(),
        };

        let _ = inner.general.write_line(&line);
        if entry.severity >= Severity::Error {
            let _ = inner.errors.write_line(&line);
        }

        if inner.console_mirror {
            if entry.severity >= Severity::Error {
                let _ = writeln!(io::stderr(), "{}", line);
            } else {
                let _ = writeln!(io::stdout(), "{}", line);
            }
        }
    }

    // -------------------------------------------------------------------------
    // Configuration surface
    // -------------------------------------------------------------------------

    /// Redirect the general log. The previous handle is closed first; no
    /// further entries land in the old file and nothing already written is
    /// touched.
    pub fn set_general_log_path(&self, path: impl AsRef<Path>) {
        if let Ok(mut inner) = self.inner.lock() {
            inner.general.set_path(Some(path.as_ref().to_path_buf()));
        }
    }

    /// Redirect the error log. Same close-then-reopen semantics as
    /// [`set_general_log_path`](Self::set_general_log_path).
    pub fn set_error_log_path(&self, path: impl AsRef<Path>) {
        if let Ok(mut inner) = self.inner.lock() {
            inner.errors.set_path(Some(path.as_ref().to_path_buf()));
        }
    }

    /// Change the minimum severity for subsequent entries.
    pub fn set_min_severity(&self, severity: Severity) {
        if let Ok(mut inner) = self.inner.lock() {
            inner.min_severity = severity;
        }
    }

    /// Enable or disable the console mirror.
    pub fn set_console_mirror(&self, enabled: bool) {
        if let Ok(mut inner) = self.inner.lock() {
            inner.console_mirror = enabled;
        }
    }

    /// Switch between text and JSON Lines rendering.
    pub fn set_format(&self, format: RecordFormat) {
        if let Ok(mut inner) = self.inner.lock() {
            inner.format = format;
        }
    }

    /// Set the current-database context stamped on subsequent entries.
    pub fn set_current_database(&self, database: impl Into<String>) {
        if let Ok(mut inner) = self.inner.lock() {
            inner.database = database.into();
        }
    }

    /// Set the user context stamped on subsequent entries. Reserved for a
    /// future authentication layer; carries no permission semantics.
    pub fn set_current_user(&self, user: impl Into<String>) {
        if let Ok(mut inner) = self.inner.lock() {
            inner.user = user.into();
        }
    }

    /// Current-database context.
    pub fn current_database(&self) -> String {
        self.inner
            .lock()
            .map(|inner| inner.database.clone())
            .unwrap_or_default()
    }

    /// Current user context.
    pub fn current_user(&self) -> String {
        self.inner
            .lock()
            .map(|inner| inner.user.clone())
            .unwrap_or_default()
    }

    // -------------------------------------------------------------------------
    // Convenience API
    // -------------------------------------------------------------------------

    /// Debug-severity note with no operation classification.
    pub fn debug(&self, message: impl Into<String>) {
        self.log(
            LogEntry::new(Severity::Debug, Operation::Unknown, "", true).with_message(message),
        );
    }

    /// Info-severity record of an operation.
    pub fn info(&self, operation: Operation, command: impl Into<String>, success: bool) {
        self.log(LogEntry::new(Severity::Info, operation, command, success));
    }

    /// Info-severity record of an operation with an auxiliary message.
    pub fn info_with_message(
        &self,
        operation: Operation,
        command: impl Into<String>,
        success: bool,
        message: impl Into<String>,
    ) {
        self.log(
            LogEntry::new(Severity::Info, operation, command, success).with_message(message),
        );
    }

    /// Warning-severity note with no operation classification.
    pub fn warning(&self, message: impl Into<String>) {
        self.log(
            LogEntry::new(Severity::Warning, Operation::Unknown, "", true).with_message(message),
        );
    }

    /// Error-severity record of a failed operation.
    pub fn error(
        &self,
        operation: Operation,
        command: impl Into<String>,
        error_message: impl Into<String>,
    ) {
        self.log(
            LogEntry::new(Severity::Error, operation, command, false)
                .with_message(error_message),
        );
    }

    /// Fatal-severity record of an unrecoverable system failure.
    pub fn fatal(&self, message: impl Into<String>) {
        self.log(
            LogEntry::new(Severity::Fatal, Operation::SystemError, "", false)
                .with_message(message),
        );
    }

    /// Record a database-lifecycle operation, synthesizing the command text
    /// from the database name. Severity is Info on success, Error on failure.
    pub fn log_database_op(&self, operation: Operation, db_name: &str, success: bool, message: &str) {
        let command = match operation {
            Operation::CreateDatabase => command::create_database(db_name),
            Operation::DropDatabase => command::drop_database(db_name),
            Operation::UseDatabase => command::use_database(db_name),
            Operation::ShowDatabases => command::show_databases(),
            other => format!("{} {}", other.as_str(), db_name),
        };

        self.log(
            LogEntry::new(severity_for(success), operation, command, success)
                .with_database(db_name)
                .with_message(message),
        );
    }

    /// Record a table-lifecycle operation, synthesizing the command text
    /// from the table name. For the ALTER sub-kinds and index operations,
    /// which need column names, build the command with the [`command`]
    /// helpers and go through [`info`](Self::info)/[`error`](Self::error)
    /// instead.
    pub fn log_table_op(&self, operation: Operation, table_name: &str, success: bool, message: &str) {
        let command = match operation {
            Operation::CreateTable => command::create_table(table_name),
            Operation::DropTable => command::drop_table(table_name),
            Operation::ShowTables => command::show_tables(),
            other => format!("{} {}", other.as_str(), table_name),
        };

        self.log(
            LogEntry::new(severity_for(success), operation, command, success)
                .with_table(table_name)
                .with_message(message),
        );
    }

    /// Record a DML operation with its affected-row count. An empty
    /// `command_preview` is replaced by a synthesized summary.
    pub fn log_data_op(
        &self,
        operation: Operation,
        table_name: &str,
        command_preview: &str,
        success: bool,
        affected_rows: i64,
        message: &str,
    ) {
        let command = if command_preview.is_empty() {
            match operation {
                Operation::Insert => command::insert(table_name, affected_rows),
                Operation::Delete => command::delete(table_name),
                Operation::Select => command::select(table_name),
                other => format!("{} {}", other.as_str(), table_name),
            }
        } else {
            command_preview.to_string()
        };

        self.log(
            LogEntry::new(severity_for(success), operation, command, success)
                .with_table(table_name)
                .with_affected_rows(affected_rows)
                .with_message(message),
        );
    }

    /// Record a caught error with the location it surfaced at. The
    /// description lands in the message field at Error severity.
    pub fn log_exception(&self, location: &str, error: impl fmt::Display) {
        self.log(
            LogEntry::new(Severity::Error, Operation::SystemError, "", false)
                .with_message(format!("{}: {}", location, error)),
        );
    }
}

/// Convenience wrappers record failures at Error severity, successes at Info.
fn severity_for(success: bool) -> Severity {
    if success {
        Severity::Info
    } else {
        Severity::Error
    }
}

// =============================================================================
// Tests
// =============================================================================
