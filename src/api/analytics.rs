use crate::{
    api::payroll::round2, auth::session::Session, model::attendance::AttendanceStatus,
};
use actix_web::{HttpResponse, Responder, web};
use anyhow::Context;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::json;
use sqlx::SqlitePool;
use tracing::error;
use utoipa::{IntoParams, ToSchema};

#[derive(Deserialize, IntoParams, ToSchema)]
pub struct AnalyticsQuery {
    /// Month to drill into, `YYYY-MM`. Defaults to the latest month with
    /// attendance data.
    #[schema(example = "2025-02")]
    pub month: Option<String>,
}

#[derive(Debug, Serialize, sqlx::FromRow, ToSchema)]
pub struct StatusCount {
    pub status: AttendanceStatus,
    #[schema(example = 10)]
    pub entries: i64,
}

#[derive(Debug, Serialize, sqlx::FromRow, ToSchema)]
pub struct EmployeePresence {
    #[schema(example = 1)]
    pub employee_id: i64,
    #[schema(example = "Rahul Sharma")]
    pub name: String,
    #[schema(example = 2)]
    pub present_days: i64,
}

#[derive(Debug, Serialize, sqlx::FromRow, ToSchema)]
pub struct DailyPresence {
    #[schema(example = "2025-02-01", value_type = String, format = "date")]
    pub date: NaiveDate,
    #[schema(example = 5)]
    pub present_employees: i64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct AnalyticsReport {
    pub total_employees: i64,
    pub average_salary: f64,
    /// Sum of all monthly salaries: the payroll cost of a full month.
    pub total_monthly_payroll: f64,
    pub status_distribution: Vec<StatusCount>,
    /// Month the per-employee breakdown covers, if any attendance exists.
    pub month: Option<String>,
    pub employee_presence: Vec<EmployeePresence>,
    pub daily_present_trend: Vec<DailyPresence>,
}

/// Aggregate read model behind the analytics view. Writes nothing.
pub async fn analytics_report(
    pool: &SqlitePool,
    month: Option<String>,
) -> anyhow::Result<AnalyticsReport> {
    let total_employees: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM employee")
        .fetch_one(pool)
        .await
        .context("count employees")?;

    let average_salary: Option<f64> = sqlx::query_scalar("SELECT AVG(salary) FROM employee")
        .fetch_one(pool)
        .await
        .context("average salary")?;

    let total_monthly_payroll: Option<f64> = sqlx::query_scalar("SELECT SUM(salary) FROM employee")
        .fetch_one(pool)
        .await
        .context("payroll sum")?;

    let status_distribution = sqlx::query_as::<_, StatusCount>(
        r#"
        SELECT status, COUNT(*) AS entries
        FROM attendance
        GROUP BY status
        ORDER BY entries DESC
        "#,
    )
    .fetch_all(pool)
    .await
    .context("status distribution")?;

    // Fall back to the most recent month that has any data.
    let month = match month {
        Some(m) => Some(m),
        None => sqlx::query_scalar("SELECT MAX(substr(date, 1, 7)) FROM attendance")
            .fetch_one(pool)
            .await
            .context("latest month")?,
    };

    let employee_presence = match &month {
        Some(m) => {
            sqlx::query_as::<_, EmployeePresence>(
                r#"
                SELECT e.id AS employee_id, e.name, COUNT(*) AS present_days
                FROM attendance a
                JOIN employee e ON a.emp_id = e.id
                WHERE a.status = ? AND substr(a.date, 1, 7) = ?
                GROUP BY e.id, e.name
                ORDER BY present_days DESC, e.name
                "#,
            )
            .bind(AttendanceStatus::Present)
            .bind(m)
            .fetch_all(pool)
            .await
            .context("employee presence")?
        }
        None => Vec::new(),
    };

    let daily_present_trend = sqlx::query_as::<_, DailyPresence>(
        r#"
        SELECT date, COUNT(*) AS present_employees
        FROM attendance
        WHERE status = ?
        GROUP BY date
        ORDER BY date
        "#,
    )
    .bind(AttendanceStatus::Present)
    .fetch_all(pool)
    .await
    .context("daily trend")?;

    Ok(AnalyticsReport {
        total_employees,
        average_salary: round2(average_salary.unwrap_or(0.0)),
        total_monthly_payroll: total_monthly_payroll.unwrap_or(0.0),
        status_distribution,
        month,
        employee_presence,
        daily_present_trend,
    })
}

/// HR analytics
#[utoipa::path(
    get,
    path = "/api/analytics",
    params(AnalyticsQuery),
    responses(
        (status = 200, description = "Aggregate HR metrics", body = AnalyticsReport),
        (status = 400, description = "Malformed month"),
        (status = 401, description = "Unauthorized"),
        (status = 500, description = "Internal server error")
    ),
    security(("bearer_auth" = [])),
    tag = "Reporting"
)]
pub async fn report(
    _session: Session,
    pool: web::Data<SqlitePool>,
    query: web::Query<AnalyticsQuery>,
) -> actix_web::Result<impl Responder> {
    if let Some(month) = &query.month {
        let first_day = format!("{month}-01");
        if NaiveDate::parse_from_str(&first_day, "%Y-%m-%d").is_err() {
            return Ok(HttpResponse::BadRequest().json(json!({
                "message": "Month must be in YYYY-MM form"
            })));
        }
    }

    let report = analytics_report(pool.get_ref(), query.month.clone())
        .await
        .map_err(|e| {
            error!(error = %e, "Analytics aggregation failed");
            actix_web::error::ErrorInternalServerError("Internal Server Error")
        })?;

    Ok(HttpResponse::Ok().json(report))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::employee::remove_employee;
    use crate::db::{seed_demo_data, test_pool};

    #[actix_web::test]
    async fn empty_store_degrades_to_an_empty_report() {
        let pool = test_pool().await;
        let report = analytics_report(&pool, None).await.unwrap();

        assert_eq!(report.total_employees, 0);
        assert_eq!(report.total_monthly_payroll, 0.0);
        assert!(report.status_distribution.is_empty());
        assert!(report.month.is_none());
        assert!(report.employee_presence.is_empty());
        assert!(report.daily_present_trend.is_empty());
    }

    #[actix_web::test]
    async fn seeded_store_aggregates_by_status_and_month() {
        let pool = test_pool().await;
        seed_demo_data(&pool).await.unwrap();

        let report = analytics_report(&pool, None).await.unwrap();

        assert_eq!(report.total_employees, 6);
        assert_eq!(report.total_monthly_payroll, 295000.0);
        assert_eq!(report.month.as_deref(), Some("2025-02"));

        let present = report
            .status_distribution
            .iter()
            .find(|s| s.status == AttendanceStatus::Present)
            .unwrap();
        assert_eq!(present.entries, 10);

        let absent = report
            .status_distribution
            .iter()
            .find(|s| s.status == AttendanceStatus::Absent)
            .unwrap();
        assert_eq!(absent.entries, 3);

        // Rahul Sharma has two Present days in the seeded month.
        let rahul = report
            .employee_presence
            .iter()
            .find(|p| p.name == "Rahul Sharma")
            .unwrap();
        assert_eq!(rahul.present_days, 2);

        // Only two distinct dates carry Present entries.
        assert_eq!(report.daily_present_trend.len(), 2);
    }

    #[actix_web::test]
    async fn explicit_month_filters_the_breakdown() {
        let pool = test_pool().await;
        seed_demo_data(&pool).await.unwrap();

        let report = analytics_report(&pool, Some("2024-01".to_string()))
            .await
            .unwrap();
        assert_eq!(report.month.as_deref(), Some("2024-01"));
        assert!(report.employee_presence.is_empty());
    }

    #[actix_web::test]
    async fn orphaned_entries_are_excluded_from_presence() {
        let pool = test_pool().await;
        seed_demo_data(&pool).await.unwrap();

        remove_employee(&pool, 1).await.unwrap();

        let report = analytics_report(&pool, Some("2025-02".to_string()))
            .await
            .unwrap();
        assert!(report.employee_presence.iter().all(|p| p.employee_id != 1));
    }
}
