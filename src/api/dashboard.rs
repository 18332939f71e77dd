use crate::{
    api::payroll::{month_bounds, round2},
    auth::session::Session,
    model::attendance::AttendanceStatus,
    model::employee::Employee,
};
use actix_web::{HttpResponse, Responder, web};
use anyhow::Context;
use chrono::{Datelike, Local, NaiveDate};
use serde::Serialize;
use sqlx::SqlitePool;
use tracing::error;
use utoipa::ToSchema;

#[derive(Debug, Serialize, sqlx::FromRow, ToSchema)]
pub struct DepartmentCount {
    #[schema(example = "Engineering")]
    pub department: String,
    #[schema(example = 2)]
    pub employees: i64,
}

#[derive(Debug, Serialize, sqlx::FromRow, ToSchema)]
pub struct MonthlyPresence {
    /// Calendar month in `YYYY-MM` form.
    #[schema(example = "2025-02")]
    pub month: String,
    #[schema(example = 9)]
    pub present_days: i64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct DashboardSummary {
    pub total_employees: i64,
    pub total_departments: i64,
    pub average_salary: f64,
    /// Present entries this month over `employees * 30`, as a percentage.
    pub attendance_rate: f64,
    pub department_distribution: Vec<DepartmentCount>,
    pub monthly_present_trend: Vec<MonthlyPresence>,
    pub top_paid: Option<Employee>,
}

/// High-level overview of employees, payroll and attendance. Degrades to a
/// zeroed summary when the store is empty.
pub async fn dashboard_summary(
    pool: &SqlitePool,
    today: NaiveDate,
) -> anyhow::Result<DashboardSummary> {
    let total_employees: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM employee")
        .fetch_one(pool)
        .await
        .context("count employees")?;

    let total_departments: i64 =
        sqlx::query_scalar("SELECT COUNT(DISTINCT department) FROM employee")
            .fetch_one(pool)
            .await
            .context("count departments")?;

    let average_salary: Option<f64> = sqlx::query_scalar("SELECT AVG(salary) FROM employee")
        .fetch_one(pool)
        .await
        .context("average salary")?;

    let (month_start, month_end) = month_bounds(today.month(), today.year())?;
    let present_this_month: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM attendance WHERE status = ? AND date >= ? AND date < ?",
    )
    .bind(AttendanceStatus::Present)
    .bind(month_start)
    .bind(month_end)
    .fetch_one(pool)
    .await
    .context("count present entries")?;

    let attendance_rate = if total_employees > 0 {
        round2(present_this_month as f64 / (total_employees as f64 * 30.0) * 100.0)
    } else {
        0.0
    };

    let department_distribution = sqlx::query_as::<_, DepartmentCount>(
        r#"
        SELECT department, COUNT(*) AS employees
        FROM employee
        GROUP BY department
        ORDER BY employees DESC, department
        "#,
    )
    .fetch_all(pool)
    .await
    .context("department distribution")?;

    let monthly_present_trend = sqlx::query_as::<_, MonthlyPresence>(
        r#"
        SELECT substr(date, 1, 7) AS month, COUNT(*) AS present_days
        FROM attendance
        WHERE status = ?
        GROUP BY month
        ORDER BY month
        "#,
    )
    .bind(AttendanceStatus::Present)
    .fetch_all(pool)
    .await
    .context("monthly trend")?;

    let top_paid = sqlx::query_as::<_, Employee>(
        "SELECT id, name, department, role, salary FROM employee ORDER BY salary DESC LIMIT 1",
    )
    .fetch_optional(pool)
    .await
    .context("top paid employee")?;

    Ok(DashboardSummary {
        total_employees,
        total_departments,
        average_salary: round2(average_salary.unwrap_or(0.0)),
        attendance_rate,
        department_distribution,
        monthly_present_trend,
        top_paid,
    })
}

/// Dashboard overview
#[utoipa::path(
    get,
    path = "/api/dashboard",
    responses(
        (status = 200, description = "KPIs and distributions", body = DashboardSummary),
        (status = 401, description = "Unauthorized"),
        (status = 500, description = "Internal server error")
    ),
    security(("bearer_auth" = [])),
    tag = "Reporting"
)]
pub async fn overview(
    _session: Session,
    pool: web::Data<SqlitePool>,
) -> actix_web::Result<impl Responder> {
    let summary = dashboard_summary(pool.get_ref(), Local::now().date_naive())
        .await
        .map_err(|e| {
            error!(error = %e, "Dashboard aggregation failed");
            actix_web::error::ErrorInternalServerError("Internal Server Error")
        })?;

    Ok(HttpResponse::Ok().json(summary))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{seed_demo_data, test_pool};

    fn day(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[actix_web::test]
    async fn empty_store_degrades_to_zeroes() {
        let pool = test_pool().await;
        let summary = dashboard_summary(&pool, day("2025-02-15")).await.unwrap();

        assert_eq!(summary.total_employees, 0);
        assert_eq!(summary.total_departments, 0);
        assert_eq!(summary.average_salary, 0.0);
        assert_eq!(summary.attendance_rate, 0.0);
        assert!(summary.department_distribution.is_empty());
        assert!(summary.top_paid.is_none());
    }

    #[actix_web::test]
    async fn seeded_store_produces_expected_kpis() {
        let pool = test_pool().await;
        seed_demo_data(&pool).await.unwrap();

        let summary = dashboard_summary(&pool, day("2025-02-15")).await.unwrap();

        assert_eq!(summary.total_employees, 6);
        // Engineering, HR, Finance, Sales, Marketing
        assert_eq!(summary.total_departments, 5);
        // (60000+50000+45000+48000+40000+52000) / 6
        assert_eq!(summary.average_salary, 49166.67);
        // 10 Present entries in Feb 2025 over 6 * 30 slots
        assert_eq!(summary.attendance_rate, round2(10.0 / 180.0 * 100.0));
        assert_eq!(summary.top_paid.as_ref().unwrap().name, "Rahul Sharma");

        let engineering = summary
            .department_distribution
            .iter()
            .find(|d| d.department == "Engineering")
            .unwrap();
        assert_eq!(engineering.employees, 2);

        assert_eq!(summary.monthly_present_trend.len(), 1);
        assert_eq!(summary.monthly_present_trend[0].month, "2025-02");
        assert_eq!(summary.monthly_present_trend[0].present_days, 10);
    }
}
