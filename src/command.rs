//! Pseudo-SQL command synthesis for audit display.
//!
//! Pure helpers that reconstruct a human-readable command summary from the
//! pieces a call site has at hand (table name, column name, row count).
//! The output is best-effort audit text: it is never executed, never
//! validated, and must not be relied upon as exact replay input.

/// `CREATE DATABASE <name>`
pub fn create_database(name: &str) -> String {
    format!("CREATE DATABASE {}", name)
}

/// `DROP DATABASE <name>`
pub fn drop_database(name: &str) -> String {
    format!("DROP DATABASE {}", name)
}

/// `USE <name>`
pub fn use_database(name: &str) -> String {
    format!("USE {}", name)
}

/// `SHOW DATABASES`
pub fn show_databases() -> String {
    "SHOW DATABASES".to_string()
}

/// `CREATE TABLE <name>`
pub fn create_table(name: &str) -> String {
    format!("CREATE TABLE {}", name)
}

/// `DROP TABLE <name>`
pub fn drop_table(name: &str) -> String {
    format!("DROP TABLE {}", name)
}

/// `SHOW TABLES`
pub fn show_tables() -> String {
    "SHOW TABLES".to_string()
}

/// `RENAME TABLE <old> TO <new>`
pub fn rename_table(old_name: &str, new_name: &str) -> String {
    format!("RENAME TABLE {} TO {}", old_name, new_name)
}

/// `ALTER TABLE <table> ADD COLUMN <column>`
pub fn add_column(table: &str, column: &str) -> String {
    format!("ALTER TABLE {} ADD COLUMN {}", table, column)
}

/// `ALTER TABLE <table> DROP COLUMN <column>`
pub fn drop_column(table: &str, column: &str) -> String {
    format!("ALTER TABLE {} DROP COLUMN {}", table, column)
}

/// `ALTER TABLE <table> MODIFY COLUMN <column>`
pub fn modify_column(table: &str, column: &str) -> String {
    format!("ALTER TABLE {} MODIFY COLUMN {}", table, column)
}

/// `ALTER TABLE <table> RENAME COLUMN <old> TO <new>`
pub fn rename_column(table: &str, old_column: &str, new_column: &str) -> String {
    format!("ALTER TABLE {} RENAME COLUMN {} TO {}", table, old_column, new_column)
}

/// `CREATE INDEX ON <table> (<column>)`
pub fn create_index(table: &str, column: &str) -> String {
    format!("CREATE INDEX ON {} ({})", table, column)
}

/// `DROP INDEX ON <table> (<column>)`
pub fn drop_index(table: &str, column: &str) -> String {
    format!("DROP INDEX ON {} ({})", table, column)
}

/// `INSERT INTO <table> (<n> rows)`
pub fn insert(table: &str, row_count: i64) -> String {
    format!("INSERT INTO {} ({} rows)", table, row_count.max(0))
}

/// `DELETE FROM <table>`
pub fn delete(table: &str) -> String {
    format!("DELETE FROM {}", table)
}

/// `UPDATE <table> SET <column> = ...`
pub fn update(table: &str, column: &str) -> String {
    format!("UPDATE {} SET {} = ...", table, column)
}

/// `SELECT ... FROM <table>`
pub fn select(table: &str) -> String {
    format!("SELECT ... FROM {}", table)
}
