//! MySQL-backed attendance store.
//!
//! Uniqueness is enforced by the `uq_attendance_employee_date` index
//! (see `migrations/001_create_attendance.sql`); a SQLSTATE 23000 violation
//! on insert is surfaced as [`StoreError::Duplicate`]. Check-out goes
//! through a single conditional UPDATE guarded on status.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::MySqlPool;
use sqlx::types::Json;

use crate::model::{AttendanceRecord, AttendanceStatus, DeviceInfo, GeoLocation};

use super::{AttendanceStore, CheckoutPatch, NewAttendanceRecord, StoreError};

const SELECT_COLUMNS: &str = r#"
    SELECT id, employee_id, employee_name, date,
           check_in_time, check_out_time,
           check_in_location, check_out_location,
           total_hours, status,
           photo_data, check_out_photo_data, device_info
    FROM attendance_record
"#;

#[derive(sqlx::FromRow)]
struct AttendanceRow {
    id: u64,
    employee_id: u64,
    employee_name: String,
    date: NaiveDate,
    check_in_time: Option<DateTime<Utc>>,
    check_out_time: Option<DateTime<Utc>>,
    check_in_location: Option<Json<GeoLocation>>,
    check_out_location: Option<Json<GeoLocation>>,
    total_hours: Option<f64>,
    status: String,
    photo_data: Option<String>,
    check_out_photo_data: Option<String>,
    device_info: Option<Json<DeviceInfo>>,
}

impl From<AttendanceRow> for AttendanceRecord {
    fn from(row: AttendanceRow) -> Self {
        AttendanceRecord {
            id: row.id,
            employee_id: row.employee_id,
            employee_name: row.employee_name,
            date: row.date,
            check_in_time: row.check_in_time,
            check_out_time: row.check_out_time,
            check_in_location: row.check_in_location.map(|Json(l)| l),
            check_out_location: row.check_out_location.map(|Json(l)| l),
            total_hours: row.total_hours,
            status: row.status.parse().unwrap_or(AttendanceStatus::Absent),
            photo_data: row.photo_data,
            check_out_photo_data: row.check_out_photo_data,
            device_info: row.device_info.map(|Json(d)| d),
        }
    }
}

pub struct MySqlAttendanceStore {
    pool: MySqlPool,
}

impl MySqlAttendanceStore {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    async fn fetch(&self, id: u64) -> Result<Option<AttendanceRecord>, StoreError> {
        let row: Option<AttendanceRow> =
            sqlx::query_as(&format!("{SELECT_COLUMNS} WHERE id = ?"))
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;
        Ok(row.map(Into::into))
    }
}

#[async_trait]
impl AttendanceStore for MySqlAttendanceStore {
    async fn find_by_employee_and_date(
        &self,
        employee_id: u64,
        date: NaiveDate,
    ) -> Result<Option<AttendanceRecord>, StoreError> {
        let row: Option<AttendanceRow> =
            sqlx::query_as(&format!("{SELECT_COLUMNS} WHERE employee_id = ? AND date = ?"))
                .bind(employee_id)
                .bind(date)
                .fetch_optional(&self.pool)
                .await?;
        Ok(row.map(Into::into))
    }

    async fn find_by_id(&self, id: u64) -> Result<Option<AttendanceRecord>, StoreError> {
        self.fetch(id).await
    }

    async fn insert(
        &self,
        record: NewAttendanceRecord,
    ) -> Result<AttendanceRecord, StoreError> {
        let result = sqlx::query(
            r#"
            INSERT INTO attendance_record
            (employee_id, employee_name, date, check_in_time, check_in_location,
             status, photo_data, device_info)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(record.employee_id)
        .bind(&record.employee_name)
        .bind(record.date)
        .bind(record.check_in_time)
        .bind(Json(&record.check_in_location))
        .bind(record.status.to_string())
        .bind(&record.photo_data)
        .bind(record.device_info.as_ref().map(Json))
        .execute(&self.pool)
        .await;

        let inserted = match result {
            Ok(r) => r,
            Err(e) => {
                // Unique index fired: both check-ins raced past the advisory
                // lookup, only the first insert wins.
                if let sqlx::Error::Database(db_err) = &e {
                    if db_err.code().as_deref() == Some("23000") {
                        return Err(StoreError::Duplicate {
                            employee_id: record.employee_id,
                            date: record.date,
                        });
                    }
                }
                return Err(e.into());
            }
        };

        let id = inserted.last_insert_id();
        self.fetch(id).await?.ok_or(StoreError::NotFound { id })
    }

    async fn complete_checkout(
        &self,
        id: u64,
        patch: CheckoutPatch,
    ) -> Result<AttendanceRecord, StoreError> {
        let result = sqlx::query(
            r#"
            UPDATE attendance_record
            SET check_out_time = ?,
                check_out_location = ?,
                total_hours = ?,
                status = ?,
                check_out_photo_data = COALESCE(?, check_out_photo_data)
            WHERE id = ?
            AND status <> ?
            "#,
        )
        .bind(patch.check_out_time)
        .bind(Json(&patch.check_out_location))
        .bind(patch.total_hours)
        .bind(AttendanceStatus::CheckedOut.to_string())
        .bind(&patch.photo_data)
        .bind(id)
        .bind(AttendanceStatus::CheckedOut.to_string())
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            // Zero rows means either the id is unknown or the guard refused
            // an already-finalized record. One more read tells them apart.
            return match self.fetch(id).await? {
                None => Err(StoreError::NotFound { id }),
                Some(_) => Err(StoreError::AlreadyFinalized { id }),
            };
        }

        self.fetch(id).await?.ok_or(StoreError::NotFound { id })
    }

    async fn list_by_employee(
        &self,
        employee_id: u64,
        limit: u32,
    ) -> Result<Vec<AttendanceRecord>, StoreError> {
        let rows: Vec<AttendanceRow> = sqlx::query_as(&format!(
            "{SELECT_COLUMNS} WHERE employee_id = ? ORDER BY date DESC LIMIT ?"
        ))
        .bind(employee_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn list_by_date(&self, date: NaiveDate) -> Result<Vec<AttendanceRecord>, StoreError> {
        let rows: Vec<AttendanceRow> = sqlx::query_as(&format!(
            "{SELECT_COLUMNS} WHERE date = ? ORDER BY check_in_time DESC"
        ))
        .bind(date)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(Into::into).collect())
    }
}
