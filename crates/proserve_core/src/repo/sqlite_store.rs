//! Durable record store backed by SQLite.
//!
//! # Responsibility
//! - Persist the four submission collections across process restarts.
//! - Keep SQL details inside the persistence boundary.
//!
//! # Invariants
//! - Ids come from `INTEGER PRIMARY KEY AUTOINCREMENT`, so they stay
//!   monotonic across restarts and are never handed out twice.
//! - `created_at` is stored as epoch milliseconds.
//! - Read paths reject invalid persisted state instead of masking it.
//! - The connection is only accepted once migrations are fully applied.

use super::{RecordStore, RepoError, RepoResult};
use crate::db::migrations::{current_user_version, latest_version};
use crate::model::inquiry::{Inquiry, NewInquiry};
use crate::model::registration::{NewRegistrationAssistance, RegistrationAssistance};
use crate::model::service_request::{NewServiceRequest, ServiceRequest};
use crate::model::user::{NewUser, User};
use crate::model::{created_now, from_epoch_ms, to_epoch_ms, RecordId, RecordStatus, Urgency};
use chrono::{DateTime, Utc};
use log::error;
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::sync::{Mutex, MutexGuard};

const USER_SELECT_SQL: &str = "SELECT id, username, password, status, created_at FROM users";

const INQUIRY_SELECT_SQL: &str = "SELECT
    id,
    first_name,
    last_name,
    email,
    phone,
    service,
    message,
    status,
    created_at
FROM inquiries";

const SERVICE_REQUEST_SELECT_SQL: &str = "SELECT
    id,
    name,
    email,
    phone,
    service_type,
    details,
    urgency,
    status,
    created_at
FROM service_requests";

const REGISTRATION_SELECT_SQL: &str = "SELECT
    id,
    student_name,
    email,
    phone,
    university,
    program,
    assistance_type,
    documents,
    status,
    created_at
FROM registration_assistance";

const NEWEST_FIRST: &str = "ORDER BY created_at DESC, id DESC";

const REQUIRED_COLUMNS: &[(&str, &[&str])] = &[
    (
        "users",
        &["id", "username", "password", "status", "created_at"],
    ),
    (
        "inquiries",
        &[
            "id",
            "first_name",
            "last_name",
            "email",
            "phone",
            "service",
            "message",
            "status",
            "created_at",
        ],
    ),
    (
        "service_requests",
        &[
            "id",
            "name",
            "email",
            "phone",
            "service_type",
            "details",
            "urgency",
            "status",
            "created_at",
        ],
    ),
    (
        "registration_assistance",
        &[
            "id",
            "student_name",
            "email",
            "phone",
            "university",
            "program",
            "assistance_type",
            "documents",
            "status",
            "created_at",
        ],
    ),
];

/// SQLite-backed record store.
pub struct SqliteRecordStore {
    conn: Mutex<Connection>,
}

impl SqliteRecordStore {
    /// Wraps a connection returned by `open_db`/`open_db_in_memory`.
    ///
    /// # Errors
    /// - `UninitializedConnection` when migrations have not been applied.
    /// - `MissingRequiredTable`/`MissingRequiredColumn` when the schema was
    ///   tampered with.
    pub fn try_new(conn: Connection) -> RepoResult<Self> {
        ensure_connection_ready(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn conn(&self) -> RepoResult<MutexGuard<'_, Connection>> {
        self.conn.lock().map_err(|_| {
            error!("event=store_lock module=repo status=error error_code=lock_poisoned");
            RepoError::Unavailable("sqlite connection lock poisoned".to_string())
        })
    }
}

impl RecordStore for SqliteRecordStore {
    fn create_user(&self, input: &NewUser) -> RepoResult<User> {
        let conn = self.conn()?;
        let created_at = created_now();
        let inserted = conn.execute(
            "INSERT INTO users (username, password, status, created_at)
             VALUES (?1, ?2, ?3, ?4);",
            params![
                input.username.as_str(),
                input.password.as_str(),
                RecordStatus::Pending.as_str(),
                to_epoch_ms(created_at),
            ],
        );
        match inserted {
            Ok(_) => Ok(User::from_input(conn.last_insert_rowid(), input, created_at)),
            Err(err) if is_unique_violation(&err) => {
                Err(RepoError::DuplicateUsername(input.username.clone()))
            }
            Err(err) => Err(err.into()),
        }
    }

    fn get_user(&self, id: RecordId) -> RepoResult<Option<User>> {
        let conn = self.conn()?;
        query_one(
            &conn,
            &format!("{USER_SELECT_SQL} WHERE id = ?1;"),
            id,
            parse_user_row,
        )
    }

    fn get_user_by_username(&self, username: &str) -> RepoResult<Option<User>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(&format!(
            "{USER_SELECT_SQL} WHERE username = ?1 ORDER BY id ASC LIMIT 1;"
        ))?;
        let mut rows = stmt.query([username])?;
        match rows.next()? {
            Some(row) => Ok(Some(parse_user_row(row)?)),
            None => Ok(None),
        }
    }

    fn list_users(&self) -> RepoResult<Vec<User>> {
        let conn = self.conn()?;
        query_all(&conn, USER_SELECT_SQL, parse_user_row)
    }

    fn create_inquiry(&self, input: &NewInquiry) -> RepoResult<Inquiry> {
        let conn = self.conn()?;
        let created_at = created_now();
        conn.execute(
            "INSERT INTO inquiries (
                first_name,
                last_name,
                email,
                phone,
                service,
                message,
                status,
                created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8);",
            params![
                input.first_name.as_str(),
                input.last_name.as_str(),
                input.email.as_str(),
                input.phone.as_deref(),
                input.service.as_str(),
                input.message.as_str(),
                RecordStatus::Pending.as_str(),
                to_epoch_ms(created_at),
            ],
        )?;
        Ok(Inquiry::from_input(
            conn.last_insert_rowid(),
            input,
            created_at,
        ))
    }

    fn get_inquiry(&self, id: RecordId) -> RepoResult<Option<Inquiry>> {
        let conn = self.conn()?;
        query_one(
            &conn,
            &format!("{INQUIRY_SELECT_SQL} WHERE id = ?1;"),
            id,
            parse_inquiry_row,
        )
    }

    fn list_inquiries(&self) -> RepoResult<Vec<Inquiry>> {
        let conn = self.conn()?;
        query_all(&conn, INQUIRY_SELECT_SQL, parse_inquiry_row)
    }

    fn create_service_request(&self, input: &NewServiceRequest) -> RepoResult<ServiceRequest> {
        let conn = self.conn()?;
        let created_at = created_now();
        conn.execute(
            "INSERT INTO service_requests (
                name,
                email,
                phone,
                service_type,
                details,
                urgency,
                status,
                created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8);",
            params![
                input.name.as_str(),
                input.email.as_str(),
                input.phone.as_deref(),
                input.service_type.as_str(),
                input.details.as_str(),
                input.urgency.as_str(),
                RecordStatus::Pending.as_str(),
                to_epoch_ms(created_at),
            ],
        )?;
        Ok(ServiceRequest::from_input(
            conn.last_insert_rowid(),
            input,
            created_at,
        ))
    }

    fn get_service_request(&self, id: RecordId) -> RepoResult<Option<ServiceRequest>> {
        let conn = self.conn()?;
        query_one(
            &conn,
            &format!("{SERVICE_REQUEST_SELECT_SQL} WHERE id = ?1;"),
            id,
            parse_service_request_row,
        )
    }

    fn list_service_requests(&self) -> RepoResult<Vec<ServiceRequest>> {
        let conn = self.conn()?;
        query_all(&conn, SERVICE_REQUEST_SELECT_SQL, parse_service_request_row)
    }

    fn create_registration_assistance(
        &self,
        input: &NewRegistrationAssistance,
    ) -> RepoResult<RegistrationAssistance> {
        let conn = self.conn()?;
        let created_at = created_now();
        conn.execute(
            "INSERT INTO registration_assistance (
                student_name,
                email,
                phone,
                university,
                program,
                assistance_type,
                documents,
                status,
                created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9);",
            params![
                input.student_name.as_str(),
                input.email.as_str(),
                input.phone.as_str(),
                input.university.as_str(),
                input.program.as_str(),
                input.assistance_type.as_str(),
                input.documents.as_deref(),
                RecordStatus::Pending.as_str(),
                to_epoch_ms(created_at),
            ],
        )?;
        Ok(RegistrationAssistance::from_input(
            conn.last_insert_rowid(),
            input,
            created_at,
        ))
    }

    fn get_registration_assistance(
        &self,
        id: RecordId,
    ) -> RepoResult<Option<RegistrationAssistance>> {
        let conn = self.conn()?;
        query_one(
            &conn,
            &format!("{REGISTRATION_SELECT_SQL} WHERE id = ?1;"),
            id,
            parse_registration_row,
        )
    }

    fn list_registration_assistance(&self) -> RepoResult<Vec<RegistrationAssistance>> {
        let conn = self.conn()?;
        query_all(&conn, REGISTRATION_SELECT_SQL, parse_registration_row)
    }
}

fn query_one<T>(
    conn: &Connection,
    sql: &str,
    id: RecordId,
    parse: fn(&Row<'_>) -> RepoResult<T>,
) -> RepoResult<Option<T>> {
    let mut stmt = conn.prepare(sql)?;
    let mut rows = stmt.query([id])?;
    match rows.next()? {
        Some(row) => Ok(Some(parse(row)?)),
        None => Ok(None),
    }
}

fn query_all<T>(
    conn: &Connection,
    select_sql: &str,
    parse: fn(&Row<'_>) -> RepoResult<T>,
) -> RepoResult<Vec<T>> {
    let mut stmt = conn.prepare(&format!("{select_sql} {NEWEST_FIRST};"))?;
    let mut rows = stmt.query([])?;
    let mut records = Vec::new();
    while let Some(row) = rows.next()? {
        records.push(parse(row)?);
    }
    Ok(records)
}

fn parse_user_row(row: &Row<'_>) -> RepoResult<User> {
    Ok(User {
        id: row.get("id")?,
        username: row.get("username")?,
        password: row.get("password")?,
        status: parse_status(row, "users")?,
        created_at: parse_created_at(row, "users")?,
    })
}

fn parse_inquiry_row(row: &Row<'_>) -> RepoResult<Inquiry> {
    Ok(Inquiry {
        id: row.get("id")?,
        first_name: row.get("first_name")?,
        last_name: row.get("last_name")?,
        email: row.get("email")?,
        phone: row.get("phone")?,
        service: row.get("service")?,
        message: row.get("message")?,
        status: parse_status(row, "inquiries")?,
        created_at: parse_created_at(row, "inquiries")?,
    })
}

fn parse_service_request_row(row: &Row<'_>) -> RepoResult<ServiceRequest> {
    let urgency_text: String = row.get("urgency")?;
    let urgency = Urgency::parse(&urgency_text).ok_or_else(|| {
        RepoError::InvalidData(format!(
            "invalid urgency `{urgency_text}` in service_requests.urgency"
        ))
    })?;

    Ok(ServiceRequest {
        id: row.get("id")?,
        name: row.get("name")?,
        email: row.get("email")?,
        phone: row.get("phone")?,
        service_type: row.get("service_type")?,
        details: row.get("details")?,
        urgency,
        status: parse_status(row, "service_requests")?,
        created_at: parse_created_at(row, "service_requests")?,
    })
}

fn parse_registration_row(row: &Row<'_>) -> RepoResult<RegistrationAssistance> {
    Ok(RegistrationAssistance {
        id: row.get("id")?,
        student_name: row.get("student_name")?,
        email: row.get("email")?,
        phone: row.get("phone")?,
        university: row.get("university")?,
        program: row.get("program")?,
        assistance_type: row.get("assistance_type")?,
        documents: row.get("documents")?,
        status: parse_status(row, "registration_assistance")?,
        created_at: parse_created_at(row, "registration_assistance")?,
    })
}

fn parse_status(row: &Row<'_>, table: &str) -> RepoResult<RecordStatus> {
    let value: String = row.get("status")?;
    RecordStatus::parse(&value).ok_or_else(|| {
        RepoError::InvalidData(format!("invalid status `{value}` in {table}.status"))
    })
}

fn parse_created_at(row: &Row<'_>, table: &str) -> RepoResult<DateTime<Utc>> {
    let value: i64 = row.get("created_at")?;
    from_epoch_ms(value).ok_or_else(|| {
        RepoError::InvalidData(format!("invalid timestamp `{value}` in {table}.created_at"))
    })
}

fn is_unique_violation(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(code, _)
            if code.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE
    )
}

fn ensure_connection_ready(conn: &Connection) -> RepoResult<()> {
    let expected_version = latest_version();
    let actual_version = current_user_version(conn)?;
    if actual_version != expected_version {
        return Err(RepoError::UninitializedConnection {
            expected_version,
            actual_version,
        });
    }

    for &(table, columns) in REQUIRED_COLUMNS {
        if !table_exists(conn, table)? {
            return Err(RepoError::MissingRequiredTable(table));
        }
        for &column in columns {
            if !table_has_column(conn, table, column)? {
                return Err(RepoError::MissingRequiredColumn { table, column });
            }
        }
    }

    Ok(())
}

fn table_exists(conn: &Connection, table: &str) -> RepoResult<bool> {
    let found = conn
        .query_row(
            "SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = ?1;",
            [table],
            |row| row.get::<_, i64>(0),
        )
        .optional()?;
    Ok(found.is_some())
}

fn table_has_column(conn: &Connection, table: &str, column: &str) -> RepoResult<bool> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info({table});"))?;
    let mut rows = stmt.query([])?;
    while let Some(row) = rows.next()? {
        let current: String = row.get(1)?;
        if current == column {
            return Ok(true);
        }
    }
    Ok(false)
}
