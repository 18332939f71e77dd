use crate::{
    auth::session::Session,
    model::attendance::{AttendanceRecord, AttendanceStatus},
};
use actix_web::{HttpResponse, Responder, web};
use chrono::{Local, NaiveDate};
use serde::Deserialize;
use serde_json::json;
use sqlx::SqlitePool;
use tracing::error;
use utoipa::ToSchema;

#[derive(Deserialize, ToSchema)]
pub struct MarkAttendanceReq {
    #[schema(example = 1)]
    pub employee_id: i64,

    /// Defaults to today when omitted.
    #[schema(example = "2025-02-01", value_type = Option<String>, format = "date")]
    pub date: Option<NaiveDate>,

    pub status: AttendanceStatus,
}

#[derive(Debug, PartialEq, Eq)]
pub enum MarkOutcome {
    Marked,
    AlreadyMarked,
}

/// Appends one attendance entry per (employee, date). The existence check
/// runs first; a duplicate performs no write.
pub async fn mark_attendance(
    pool: &SqlitePool,
    employee_id: i64,
    date: NaiveDate,
    status: AttendanceStatus,
) -> Result<MarkOutcome, sqlx::Error> {
    let already: bool = sqlx::query_scalar(
        "SELECT EXISTS(SELECT 1 FROM attendance WHERE emp_id = ? AND date = ?)",
    )
    .bind(employee_id)
    .bind(date)
    .fetch_one(pool)
    .await?;

    if already {
        return Ok(MarkOutcome::AlreadyMarked);
    }

    sqlx::query("INSERT INTO attendance (emp_id, date, status) VALUES (?, ?, ?)")
        .bind(employee_id)
        .bind(date)
        .bind(status)
        .execute(pool)
        .await?;

    Ok(MarkOutcome::Marked)
}

/// Attendance entries joined against the current employee set, latest date
/// first. Orphaned entries (deleted employees) drop out of the join.
pub async fn fetch_attendance(pool: &SqlitePool) -> Result<Vec<AttendanceRecord>, sqlx::Error> {
    sqlx::query_as::<_, AttendanceRecord>(
        r#"
        SELECT e.name AS employee_name, a.date, a.status
        FROM attendance a
        JOIN employee e ON a.emp_id = e.id
        ORDER BY a.date DESC
        "#,
    )
    .fetch_all(pool)
    .await
}

pub async fn employee_exists(pool: &SqlitePool, employee_id: i64) -> Result<bool, sqlx::Error> {
    sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM employee WHERE id = ?)")
        .bind(employee_id)
        .fetch_one(pool)
        .await
}

/// Mark attendance
#[utoipa::path(
    post,
    path = "/api/attendance",
    request_body = MarkAttendanceReq,
    responses(
        (status = 200, description = "Attendance marked", body = Object, example = json!({
            "message": "Attendance marked successfully"
        })),
        (status = 404, description = "Employee not found"),
        (status = 409, description = "Already marked for this date", body = Object, example = json!({
            "message": "Attendance already marked for this date"
        })),
        (status = 401, description = "Unauthorized"),
        (status = 500, description = "Internal server error")
    ),
    security(("bearer_auth" = [])),
    tag = "Attendance"
)]
pub async fn mark(
    _session: Session,
    pool: web::Data<SqlitePool>,
    payload: web::Json<MarkAttendanceReq>,
) -> actix_web::Result<impl Responder> {
    let date = payload.date.unwrap_or_else(|| Local::now().date_naive());

    let exists = employee_exists(pool.get_ref(), payload.employee_id)
        .await
        .map_err(|e| {
            error!(error = %e, employee_id = payload.employee_id, "Employee lookup failed");
            actix_web::error::ErrorInternalServerError("Internal Server Error")
        })?;

    if !exists {
        return Ok(HttpResponse::NotFound().json(json!({
            "message": "Employee not found"
        })));
    }

    let outcome = mark_attendance(pool.get_ref(), payload.employee_id, date, payload.status)
        .await
        .map_err(|e| {
            error!(error = %e, employee_id = payload.employee_id, "Failed to mark attendance");
            actix_web::error::ErrorInternalServerError("Internal Server Error")
        })?;

    match outcome {
        MarkOutcome::AlreadyMarked => Ok(HttpResponse::Conflict().json(json!({
            "message": "Attendance already marked for this date"
        }))),
        MarkOutcome::Marked => Ok(HttpResponse::Ok().json(json!({
            "message": "Attendance marked successfully"
        }))),
    }
}

/// List attendance records
#[utoipa::path(
    get,
    path = "/api/attendance",
    responses(
        (status = 200, description = "Attendance records, latest first", body = [AttendanceRecord]),
        (status = 401, description = "Unauthorized"),
        (status = 500, description = "Internal server error")
    ),
    security(("bearer_auth" = [])),
    tag = "Attendance"
)]
pub async fn list(
    _session: Session,
    pool: web::Data<SqlitePool>,
) -> actix_web::Result<impl Responder> {
    let records = fetch_attendance(pool.get_ref()).await.map_err(|e| {
        error!(error = %e, "Failed to fetch attendance");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;

    Ok(HttpResponse::Ok().json(records))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::employee::{CreateEmployee, insert_employee, remove_employee};
    use crate::db::test_pool;

    async fn add_employee(pool: &SqlitePool, name: &str) -> i64 {
        insert_employee(
            pool,
            &CreateEmployee {
                name: name.to_string(),
                department: "Engineering".to_string(),
                role: "Engineer".to_string(),
                salary: 30000.0,
            },
        )
        .await
        .unwrap()
    }

    fn day(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[actix_web::test]
    async fn double_mark_keeps_a_single_entry() {
        let pool = test_pool().await;
        let id = add_employee(&pool, "A").await;

        let first = mark_attendance(&pool, id, day("2025-02-01"), AttendanceStatus::Present)
            .await
            .unwrap();
        assert_eq!(first, MarkOutcome::Marked);

        // Second call with a different status still refuses to write.
        let second = mark_attendance(&pool, id, day("2025-02-01"), AttendanceStatus::Absent)
            .await
            .unwrap();
        assert_eq!(second, MarkOutcome::AlreadyMarked);

        let rows: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM attendance WHERE emp_id = ? AND date = ?")
                .bind(id)
                .bind(day("2025-02-01"))
                .fetch_one(&pool)
                .await
                .unwrap();
        assert_eq!(rows, 1);

        let status: AttendanceStatus =
            sqlx::query_scalar("SELECT status FROM attendance WHERE emp_id = ?")
                .bind(id)
                .fetch_one(&pool)
                .await
                .unwrap();
        assert_eq!(status, AttendanceStatus::Present);
    }

    #[actix_web::test]
    async fn same_employee_may_mark_different_dates() {
        let pool = test_pool().await;
        let id = add_employee(&pool, "A").await;

        mark_attendance(&pool, id, day("2025-02-01"), AttendanceStatus::Present)
            .await
            .unwrap();
        let outcome = mark_attendance(&pool, id, day("2025-02-02"), AttendanceStatus::Present)
            .await
            .unwrap();
        assert_eq!(outcome, MarkOutcome::Marked);
    }

    #[actix_web::test]
    async fn listing_is_ordered_latest_first() {
        let pool = test_pool().await;
        let id = add_employee(&pool, "A").await;

        mark_attendance(&pool, id, day("2025-02-01"), AttendanceStatus::Present)
            .await
            .unwrap();
        mark_attendance(&pool, id, day("2025-02-03"), AttendanceStatus::Absent)
            .await
            .unwrap();
        mark_attendance(&pool, id, day("2025-02-02"), AttendanceStatus::Present)
            .await
            .unwrap();

        let records = fetch_attendance(&pool).await.unwrap();
        assert_eq!(records.len(), 3);
        assert_eq!(records[0].date, day("2025-02-03"));
        assert_eq!(records[2].date, day("2025-02-01"));
    }

    #[actix_web::test]
    async fn listing_excludes_orphaned_entries() {
        let pool = test_pool().await;
        let kept = add_employee(&pool, "Kept").await;
        let gone = add_employee(&pool, "Gone").await;

        mark_attendance(&pool, kept, day("2025-02-01"), AttendanceStatus::Present)
            .await
            .unwrap();
        mark_attendance(&pool, gone, day("2025-02-01"), AttendanceStatus::Present)
            .await
            .unwrap();

        remove_employee(&pool, gone).await.unwrap();

        let records = fetch_attendance(&pool).await.unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].employee_name, "Kept");

        // The orphaned row itself is still in the table.
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM attendance")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(total, 2);
    }
}
