use crate::{
    api::employee::{fetch_employee, fetch_employees},
    auth::session::Session,
    model::{attendance::AttendanceStatus, employee::Employee, payroll::PayrollLine},
};
use actix_web::{HttpResponse, Responder, web};
use anyhow::Context;
use chrono::{Local, NaiveDate};
use serde::Deserialize;
use serde_json::json;
use sqlx::SqlitePool;
use tracing::error;
use utoipa::{IntoParams, ToSchema};

/// Fixed divisor for the daily rate, regardless of the actual length of the
/// month. Documented product decision, not a bug.
const DAYS_PER_MONTH: f64 = 30.0;

#[derive(Deserialize, IntoParams, ToSchema)]
pub struct PayrollQuery {
    #[schema(example = 2)]
    pub month: u32,

    #[schema(example = 2025)]
    pub year: i32,
}

pub(crate) fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

pub(crate) fn month_bounds(month: u32, year: i32) -> anyhow::Result<(NaiveDate, NaiveDate)> {
    let start = NaiveDate::from_ymd_opt(year, month, 1)
        .with_context(|| format!("invalid month {year}-{month}"))?;
    let end = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)
    }
    .with_context(|| format!("invalid month {year}-{month}"))?;

    Ok((start, end))
}

async fn count_present_days(
    pool: &SqlitePool,
    employee_id: i64,
    start: NaiveDate,
    end: NaiveDate,
) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar(
        "SELECT COUNT(*) FROM attendance WHERE emp_id = ? AND status = ? AND date >= ? AND date < ?",
    )
    .bind(employee_id)
    .bind(AttendanceStatus::Present)
    .bind(start)
    .bind(end)
    .fetch_one(pool)
    .await
}

fn payroll_line(employee: &Employee, present_days: i64) -> PayrollLine {
    let daily_salary = employee.salary / DAYS_PER_MONTH;

    PayrollLine {
        employee_id: employee.id,
        name: employee.name.clone(),
        department: employee.department.clone(),
        role: employee.role.clone(),
        monthly_salary: employee.salary,
        present_days,
        salary_payable: round2(present_days as f64 * daily_salary),
    }
}

/// One line per currently existing employee. Pure read-side: nothing is
/// persisted, every call recomputes from the raw attendance rows.
pub async fn compute_payroll(
    pool: &SqlitePool,
    month: u32,
    year: i32,
) -> anyhow::Result<Vec<PayrollLine>> {
    let (start, end) = month_bounds(month, year)?;
    let employees = fetch_employees(pool).await.context("fetch employees")?;

    let mut lines = Vec::with_capacity(employees.len());
    for employee in &employees {
        let present_days = count_present_days(pool, employee.id, start, end)
            .await
            .context("count present days")?;
        lines.push(payroll_line(employee, present_days));
    }

    Ok(lines)
}

pub async fn payroll_line_for(
    pool: &SqlitePool,
    employee: &Employee,
    month: u32,
    year: i32,
) -> anyhow::Result<PayrollLine> {
    let (start, end) = month_bounds(month, year)?;
    let present_days = count_present_days(pool, employee.id, start, end)
        .await
        .context("count present days")?;

    Ok(payroll_line(employee, present_days))
}

fn month_name(month: u32) -> &'static str {
    // month is validated to 1..=12 before this is reached
    [
        "January",
        "February",
        "March",
        "April",
        "May",
        "June",
        "July",
        "August",
        "September",
        "October",
        "November",
        "December",
    ][(month as usize).clamp(1, 12) - 1]
}

/// Fixed-layout plain-text payslip, the exportable artifact.
pub fn render_payslip(
    employee: &Employee,
    line: &PayrollLine,
    month: u32,
    year: i32,
    generated_on: NaiveDate,
) -> String {
    format!(
        "\nPAYSLIP - {month_name} {year}\n\
         \n\
         Employee Name : {name}\n\
         Department    : {department}\n\
         Role          : {role}\n\
         \n\
         Monthly Salary: {salary:.0}\n\
         Present Days  : {present_days}\n\
         Daily Salary  : {daily:.2}\n\
         \n\
         ----------------------------------\n\
         Salary Payable: {payable:.2}\n\
         ----------------------------------\n\
         \n\
         Generated on  : {generated_on}\n",
        month_name = month_name(month),
        name = employee.name,
        department = employee.department,
        role = employee.role,
        salary = employee.salary,
        present_days = line.present_days,
        daily = employee.salary / DAYS_PER_MONTH,
        payable = line.salary_payable,
    )
}

/// Payroll report for a month
#[utoipa::path(
    get,
    path = "/api/payroll",
    params(PayrollQuery),
    responses(
        (status = 200, description = "One payroll line per employee", body = [PayrollLine]),
        (status = 400, description = "Invalid month"),
        (status = 401, description = "Unauthorized"),
        (status = 500, description = "Internal server error")
    ),
    security(("bearer_auth" = [])),
    tag = "Payroll"
)]
pub async fn report(
    _session: Session,
    pool: web::Data<SqlitePool>,
    query: web::Query<PayrollQuery>,
) -> actix_web::Result<impl Responder> {
    if !(1..=12).contains(&query.month) {
        return Ok(HttpResponse::BadRequest().json(json!({
            "message": "Month must be between 1 and 12"
        })));
    }

    let lines = compute_payroll(pool.get_ref(), query.month, query.year)
        .await
        .map_err(|e| {
            error!(error = %e, month = query.month, year = query.year, "Payroll computation failed");
            actix_web::error::ErrorInternalServerError("Internal Server Error")
        })?;

    Ok(HttpResponse::Ok().json(lines))
}

/// Download payslip as a text file
#[utoipa::path(
    get,
    path = "/api/payroll/{employee_id}/payslip",
    params(
        ("employee_id", Path, description = "Employee ID"),
        PayrollQuery
    ),
    responses(
        (status = 200, description = "Plain-text payslip attachment", content_type = "text/plain"),
        (status = 400, description = "Invalid month"),
        (status = 404, description = "Employee not found"),
        (status = 401, description = "Unauthorized"),
        (status = 500, description = "Internal server error")
    ),
    security(("bearer_auth" = [])),
    tag = "Payroll"
)]
pub async fn payslip(
    _session: Session,
    pool: web::Data<SqlitePool>,
    path: web::Path<i64>,
    query: web::Query<PayrollQuery>,
) -> actix_web::Result<impl Responder> {
    if !(1..=12).contains(&query.month) {
        return Ok(HttpResponse::BadRequest().json(json!({
            "message": "Month must be between 1 and 12"
        })));
    }

    let employee_id = path.into_inner();

    let employee = fetch_employee(pool.get_ref(), employee_id)
        .await
        .map_err(|e| {
            error!(error = %e, employee_id, "Failed to fetch employee");
            actix_web::error::ErrorInternalServerError("Internal Server Error")
        })?;

    let Some(employee) = employee else {
        return Ok(HttpResponse::NotFound().json(json!({
            "message": "Employee not found"
        })));
    };

    let line = payroll_line_for(pool.get_ref(), &employee, query.month, query.year)
        .await
        .map_err(|e| {
            error!(error = %e, employee_id, "Payslip computation failed");
            actix_web::error::ErrorInternalServerError("Internal Server Error")
        })?;

    let today = Local::now().date_naive();
    let body = render_payslip(&employee, &line, query.month, query.year, today);

    let filename = format!(
        "Payslip_{}_{}_{}.txt",
        employee.name,
        month_name(query.month),
        query.year
    );

    Ok(HttpResponse::Ok()
        .content_type("text/plain; charset=utf-8")
        .insert_header((
            "Content-Disposition",
            format!("attachment; filename=\"{filename}\""),
        ))
        .body(body))
}
