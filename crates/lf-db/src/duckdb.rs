//! DuckDB attendance store implementation

use crate::error::{DbError, DbResult};
use crate::migration::{current_version, run_migrations};
use crate::traits::{AttendanceStore, HistoryRange};
use async_trait::async_trait;
use chrono::NaiveDate;
use duckdb::Connection;
use lf_core::{
    AttendanceRecord, AttendanceStatus, DerivedFields, DerivedUpdate, EmployeeId, HalfDayType,
    PenaltyAction, PolicyConfig, PolicySettings, RecordId,
};
use std::collections::HashSet;
use std::path::Path;
use std::sync::{Mutex, MutexGuard};

const RECORD_COLUMNS: &str = "id, employee_id, CAST(attendance_date AS VARCHAR), is_late, status, \
     half_day_type, is_genuine_half_day, strike_count, penalty_remark, penalty_action";

const CSV_STAGING_TABLE: &str = "lateflow_csv_import";
const CSV_REQUIRED_COLUMNS: [&str; 4] = ["id", "employee_id", "attendance_date", "is_late"];
const CSV_OPTIONAL_COLUMNS: [&str; 3] = ["status", "half_day_type", "is_genuine_half_day"];

/// DuckDB-backed attendance store
pub struct DuckDbStore {
    conn: Mutex<Connection>,
}

impl DuckDbStore {
    /// Create a new in-memory store with the schema applied
    pub fn in_memory() -> DbResult<Self> {
        let conn =
            Connection::open_in_memory().map_err(|e| DbError::ConnectionError(e.to_string()))?;
        Self::from_connection(conn)
    }

    /// Open (or create) a store at `path` and run pending migrations
    pub fn from_path(path: &Path) -> DbResult<Self> {
        let conn = Connection::open(path)
            .map_err(|e| DbError::ConnectionError(format!("{e}: {}", path.display())))?;
        Self::from_connection(conn)
    }

    /// Create from path string (handles :memory: special case)
    pub fn new(path: &str) -> DbResult<Self> {
        if path == ":memory:" {
            Self::in_memory()
        } else {
            Self::from_path(Path::new(path))
        }
    }

    fn from_connection(conn: Connection) -> DbResult<Self> {
        run_migrations(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn lock(&self) -> DbResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| DbError::MutexPoisoned(e.to_string()))
    }

    /// Highest applied schema migration
    pub fn schema_version(&self) -> DbResult<i32> {
        let conn = self.lock()?;
        current_version(&conn)
    }

    /// Parse an attendance CSV into records without storing them.
    ///
    /// The file needs a header with `id`, `employee_id`, `attendance_date`
    /// and `is_late`; `status`, `half_day_type` and `is_genuine_half_day` are
    /// optional. Derived columns are never imported.
    pub fn read_csv(&self, path: &Path) -> DbResult<Vec<AttendanceRecord>> {
        let conn = self.lock()?;
        let escaped = path.display().to_string().replace('\'', "''");
        conn.execute_batch(&format!(
            "CREATE OR REPLACE TEMP TABLE {CSV_STAGING_TABLE} AS \
             SELECT * FROM read_csv_auto('{escaped}', header = true, all_varchar = true)"
        ))
        .map_err(|e| DbError::CsvError(format!("{}: {e}", path.display())))?;

        let result = read_staged_csv(&conn);
        let _ = conn.execute_batch(&format!("DROP TABLE IF EXISTS {CSV_STAGING_TABLE}"));
        result
    }
}

/// Run `body` inside `BEGIN` / `COMMIT`, rolling back on error
fn with_transaction<F, T>(conn: &Connection, body: F) -> DbResult<T>
where
    F: FnOnce(&Connection) -> DbResult<T>,
{
    conn.execute_batch("BEGIN TRANSACTION")
        .map_err(|e| DbError::TransactionError(format!("BEGIN failed: {e}")))?;

    let result = body(conn);

    match &result {
        Ok(_) => {
            if let Err(commit_err) = conn.execute_batch("COMMIT") {
                let _ = conn.execute_batch("ROLLBACK");
                return Err(DbError::TransactionError(format!(
                    "COMMIT failed: {commit_err}"
                )));
            }
        }
        Err(_) => {
            let _ = conn.execute_batch("ROLLBACK");
        }
    }
    result
}

/// Column values of one `attendance` row, before validation
struct RawRecord {
    id: String,
    employee_id: String,
    date: String,
    is_late: bool,
    status: String,
    half_day_type: Option<String>,
    is_genuine_half_day: bool,
    strike_count: i64,
    penalty_remark: Option<String>,
    penalty_action: Option<String>,
}

impl RawRecord {
    fn from_row(row: &duckdb::Row<'_>) -> duckdb::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            employee_id: row.get(1)?,
            date: row.get(2)?,
            is_late: row.get(3)?,
            status: row.get(4)?,
            half_day_type: row.get(5)?,
            is_genuine_half_day: row.get(6)?,
            strike_count: row.get(7)?,
            penalty_remark: row.get(8)?,
            penalty_action: row.get(9)?,
        })
    }

    fn into_record(self) -> DbResult<AttendanceRecord> {
        let invalid = |what: &str, e: &dyn std::fmt::Display| {
            DbError::InvalidRow(format!("attendance '{}': {}: {}", self.id, what, e))
        };
        let id = RecordId::try_new(self.id.clone())
            .ok_or_else(|| DbError::InvalidRow("attendance row with blank id".to_string()))?;
        let employee_id = EmployeeId::try_new(self.employee_id.clone())
            .ok_or_else(|| invalid("employee_id", &"blank"))?;
        let date = parse_date(&self.date).map_err(|e| invalid("attendance_date", &e))?;
        let status: AttendanceStatus = self.status.parse().map_err(|e| invalid("status", &e))?;
        let half_day_type = self
            .half_day_type
            .as_deref()
            .map(str::parse::<HalfDayType>)
            .transpose()
            .map_err(|e| invalid("half_day_type", &e))?;
        let strike_count =
            u32::try_from(self.strike_count).map_err(|e| invalid("strike_count", &e))?;
        let penalty_action = self
            .penalty_action
            .as_deref()
            .map(str::parse::<PenaltyAction>)
            .transpose()
            .map_err(|e| invalid("penalty_action", &e))?;

        Ok(AttendanceRecord {
            id,
            employee_id,
            date,
            is_late: self.is_late,
            status,
            half_day_type,
            is_genuine_half_day: self.is_genuine_half_day,
            derived: DerivedFields {
                strike_count,
                penalty_remark: self.penalty_remark,
                penalty_action,
            },
        })
    }
}

fn parse_date(s: &str) -> Result<NaiveDate, chrono::ParseError> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
}

fn query_records(
    conn: &Connection,
    sql: &str,
    params: &[String],
) -> DbResult<Vec<AttendanceRecord>> {
    let mut stmt = conn.prepare(sql)?;
    let raw = stmt
        .query_map(duckdb::params_from_iter(params.iter()), RawRecord::from_row)?
        .collect::<Result<Vec<_>, _>>()?;
    raw.into_iter().map(RawRecord::into_record).collect()
}

fn insert_record(conn: &Connection, record: &AttendanceRecord) -> DbResult<()> {
    conn.execute(
        "INSERT INTO attendance (id, employee_id, attendance_date, is_late, status, \
         half_day_type, is_genuine_half_day, strike_count, penalty_remark, penalty_action) \
         VALUES (?, ?, CAST(? AS DATE), ?, ?, ?, ?, ?, ?, ?)",
        duckdb::params![
            record.id.as_str(),
            record.employee_id.as_str(),
            record.date.to_string(),
            record.is_late,
            record.status.as_label(),
            record.half_day_type.map(|t| t.as_label()),
            record.is_genuine_half_day,
            i64::from(record.derived.strike_count),
            record.derived.penalty_remark.as_deref(),
            record.derived.penalty_action.map(|a| a.as_label()),
        ],
    )?;
    Ok(())
}

fn id_exists(conn: &Connection, id: &RecordId) -> DbResult<bool> {
    let count: i64 = conn.query_row(
        "SELECT COUNT(*) FROM attendance WHERE id = ?",
        duckdb::params![id.as_str()],
        |row| row.get(0),
    )?;
    Ok(count > 0)
}

/// Id of another record holding the same employee and date, if any
fn date_holder(conn: &Connection, record: &AttendanceRecord) -> DbResult<Option<String>> {
    let mut stmt = conn.prepare(
        "SELECT id FROM attendance \
         WHERE employee_id = ? AND attendance_date = CAST(? AS DATE) AND id <> ? LIMIT 1",
    )?;
    let ids = stmt
        .query_map(
            duckdb::params![
                record.employee_id.as_str(),
                record.date.to_string(),
                record.id.as_str()
            ],
            |row| row.get::<_, String>(0),
        )?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(ids.into_iter().next())
}

fn date_conflict(record: &AttendanceRecord, holder: &str) -> DbError {
    DbError::Conflict(format!(
        "employee '{}' already has record '{}' on {}",
        record.employee_id, holder, record.date
    ))
}

fn read_staged_csv(conn: &Connection) -> DbResult<Vec<AttendanceRecord>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT name FROM pragma_table_info('{CSV_STAGING_TABLE}')"
    ))?;
    let columns: Vec<String> = stmt
        .query_map([], |row| row.get::<_, String>(0))?
        .collect::<Result<Vec<_>, _>>()?;
    let find = |wanted: &str| columns.iter().find(|c| c.trim().eq_ignore_ascii_case(wanted));

    let missing: Vec<&str> = CSV_REQUIRED_COLUMNS
        .iter()
        .copied()
        .filter(|c| find(c).is_none())
        .collect();
    if !missing.is_empty() {
        return Err(DbError::CsvError(format!(
            "missing required column(s): {}",
            missing.join(", ")
        )));
    }

    let select: Vec<String> = CSV_REQUIRED_COLUMNS
        .iter()
        .chain(CSV_OPTIONAL_COLUMNS.iter())
        .map(|c| match find(c) {
            Some(actual) => format!("\"{}\"", actual.replace('"', "\"\"")),
            None => "NULL".to_string(),
        })
        .collect();
    let mut stmt = conn.prepare(&format!(
        "SELECT {} FROM {CSV_STAGING_TABLE}",
        select.join(", ")
    ))?;
    let rows: Vec<[Option<String>; 7]> = stmt
        .query_map([], |row| {
            Ok([
                row.get(0)?,
                row.get(1)?,
                row.get(2)?,
                row.get(3)?,
                row.get(4)?,
                row.get(5)?,
                row.get(6)?,
            ])
        })?
        .collect::<Result<Vec<_>, _>>()?;

    rows.into_iter()
        .enumerate()
        .map(|(i, row)| {
            csv_row_to_record(&row)
                .map_err(|e| DbError::CsvError(format!("row {}: {e}", i + 1)))
        })
        .collect()
}

fn csv_row_to_record(row: &[Option<String>; 7]) -> Result<AttendanceRecord, String> {
    let text = |i: usize| row[i].as_deref().map(str::trim).filter(|s| !s.is_empty());

    let id = text(0).and_then(RecordId::try_new).ok_or("id is blank")?;
    let employee_id = text(1)
        .and_then(EmployeeId::try_new)
        .ok_or("employee_id is blank")?;
    let date = text(2)
        .ok_or_else(|| "attendance_date is blank".to_string())
        .and_then(|s| parse_date(s).map_err(|e| format!("attendance_date '{}': {}", s, e)))?;
    let is_late = parse_flag(text(3)).ok_or("is_late is not a boolean")?;

    let mut record = AttendanceRecord::new(id, employee_id, date, is_late);
    if let Some(status) = text(4) {
        record.status = status.parse().map_err(|e| format!("{e}"))?;
    }
    if let Some(kind) = text(5) {
        record.half_day_type = Some(kind.parse().map_err(|e| format!("{e}"))?);
    }
    record.is_genuine_half_day =
        parse_flag(text(6)).ok_or("is_genuine_half_day is not a boolean")?;
    Ok(record)
}

/// Lenient boolean: blank reads as false
fn parse_flag(value: Option<&str>) -> Option<bool> {
    match value.map(str::to_ascii_lowercase).as_deref() {
        None => Some(false),
        Some("true" | "t" | "1" | "yes" | "y") => Some(true),
        Some("false" | "f" | "0" | "no" | "n") => Some(false),
        Some(_) => None,
    }
}

#[async_trait]
impl AttendanceStore for DuckDbStore {
    async fn load_policy(&self) -> DbResult<PolicyConfig> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(
            "SELECT enabled, strike_threshold, counting_mode, penalty_action, \
             CAST(apply_from_date AS VARCHAR), strike_window \
             FROM policy_settings WHERE id = 1",
        )?;
        let rows = stmt
            .query_map([], |row| {
                Ok((
                    row.get::<_, bool>(0)?,
                    row.get::<_, i64>(1)?,
                    row.get::<_, String>(2)?,
                    row.get::<_, String>(3)?,
                    row.get::<_, Option<String>>(4)?,
                    row.get::<_, String>(5)?,
                ))
            })?
            .collect::<Result<Vec<_>, _>>()?;

        let Some((enabled, threshold, mode, action, from, window)) = rows.into_iter().next()
        else {
            return Ok(PolicyConfig::disabled());
        };
        let apply_from_date = from
            .as_deref()
            .map(parse_date)
            .transpose()
            .map_err(|e| DbError::InvalidRow(format!("policy apply_from_date: {e}")))?;
        let settings = PolicySettings {
            enabled,
            strike_threshold: Some(threshold),
            counting_mode: Some(mode),
            penalty_action: Some(action),
            apply_from_date,
            window: Some(window),
        };
        settings
            .validate()
            .map_err(|e| DbError::InvalidRow(format!("stored policy: {e}")))
    }

    async fn save_policy(&self, policy: &PolicyConfig) -> DbResult<()> {
        let conn = self.lock()?;
        with_transaction(&conn, |conn| {
            conn.execute("DELETE FROM policy_settings", [])?;
            conn.execute(
                "INSERT INTO policy_settings (id, enabled, strike_threshold, counting_mode, \
                 penalty_action, apply_from_date, strike_window) \
                 VALUES (1, ?, ?, ?, ?, CAST(? AS DATE), ?)",
                duckdb::params![
                    policy.enabled(),
                    i64::from(policy.threshold()),
                    policy.counting_mode().as_label(),
                    policy.penalty_action().as_label(),
                    policy.effective_from().map(|d| d.to_string()),
                    policy.window().as_label(),
                ],
            )?;
            Ok(())
        })
    }

    async fn list_employees(&self) -> DbResult<Vec<EmployeeId>> {
        let conn = self.lock()?;
        let mut stmt =
            conn.prepare("SELECT DISTINCT employee_id FROM attendance ORDER BY employee_id")?;
        let ids = stmt
            .query_map([], |row| row.get::<_, String>(0))?
            .collect::<Result<Vec<_>, _>>()?;
        ids.into_iter()
            .map(|id| {
                EmployeeId::try_new(id)
                    .ok_or_else(|| DbError::InvalidRow("blank employee_id".to_string()))
            })
            .collect()
    }

    async fn load_history(
        &self,
        employee: &EmployeeId,
        range: HistoryRange,
    ) -> DbResult<Vec<AttendanceRecord>> {
        let mut sql = format!("SELECT {RECORD_COLUMNS} FROM attendance WHERE employee_id = ?");
        let mut params = vec![employee.as_str().to_string()];
        if let Some(from) = range.from {
            sql.push_str(" AND attendance_date >= CAST(? AS DATE)");
            params.push(from.to_string());
        }
        if let Some(to) = range.to {
            sql.push_str(" AND attendance_date <= CAST(? AS DATE)");
            params.push(to.to_string());
        }
        sql.push_str(" ORDER BY attendance_date");

        let conn = self.lock()?;
        query_records(&conn, &sql, &params)
    }

    async fn get_record(&self, id: &RecordId) -> DbResult<Option<AttendanceRecord>> {
        let conn = self.lock()?;
        let records = query_records(
            &conn,
            &format!("SELECT {RECORD_COLUMNS} FROM attendance WHERE id = ?"),
            &[id.as_str().to_string()],
        )?;
        Ok(records.into_iter().next())
    }

    async fn upsert_record(&self, record: &AttendanceRecord) -> DbResult<()> {
        let conn = self.lock()?;
        with_transaction(&conn, |conn| {
            if let Some(holder) = date_holder(conn, record)? {
                return Err(date_conflict(record, &holder));
            }
            conn.execute(
                "DELETE FROM attendance WHERE id = ?",
                duckdb::params![record.id.as_str()],
            )?;
            insert_record(conn, record)
        })
    }

    async fn insert_records(&self, records: &[AttendanceRecord]) -> DbResult<usize> {
        let mut ids = HashSet::new();
        let mut days = HashSet::new();
        for record in records {
            if !ids.insert(&record.id) {
                return Err(DbError::Conflict(format!(
                    "record id '{}' appears more than once",
                    record.id
                )));
            }
            if !days.insert((&record.employee_id, record.date)) {
                return Err(DbError::Conflict(format!(
                    "employee '{}' has more than one record on {}",
                    record.employee_id, record.date
                )));
            }
        }

        let conn = self.lock()?;
        with_transaction(&conn, |conn| {
            for record in records {
                if id_exists(conn, &record.id)? {
                    return Err(DbError::Conflict(format!(
                        "record id '{}' already exists",
                        record.id
                    )));
                }
                if let Some(holder) = date_holder(conn, record)? {
                    return Err(date_conflict(record, &holder));
                }
                insert_record(conn, record)?;
            }
            Ok(records.len())
        })
    }

    async fn apply_updates(
        &self,
        employee: &EmployeeId,
        updates: &[DerivedUpdate],
    ) -> DbResult<usize> {
        if updates.is_empty() {
            return Ok(0);
        }
        let conn = self.lock()?;
        with_transaction(&conn, |conn| {
            let mut written = 0;
            for update in updates {
                let changed = conn.execute(
                    "UPDATE attendance SET strike_count = ?, penalty_remark = ?, penalty_action = ? \
                     WHERE id = ? AND employee_id = ? AND is_late = ?",
                    duckdb::params![
                        i64::from(update.fields.strike_count),
                        update.fields.penalty_remark.as_deref(),
                        update.fields.penalty_action.map(|a| a.as_label()),
                        update.record_id.as_str(),
                        employee.as_str(),
                        update.is_late,
                    ],
                )?;
                if changed == 0 {
                    return Err(DbError::Conflict(format!(
                        "record '{}' for employee '{}' is missing or has changed",
                        update.record_id, employee
                    )));
                }
                written += changed;
            }
            Ok(written)
        })
    }

    fn store_type(&self) -> &'static str {
        "duckdb"
    }
}

#[cfg(test)]
#[path = "duckdb_test.rs"]
mod tests;
