use crate::api::analytics::{
    AnalyticsQuery, AnalyticsReport, DailyPresence, EmployeePresence, StatusCount,
};
use crate::api::attendance::MarkAttendanceReq;
use crate::api::dashboard::{DashboardSummary, DepartmentCount, MonthlyPresence};
use crate::api::employee::CreateEmployee;
use crate::api::payroll::PayrollQuery;
use crate::auth::handlers::LoginResponse;
use crate::model::attendance::{AttendanceRecord, AttendanceStatus};
use crate::model::employee::Employee;
use crate::model::payroll::PayrollLine;
use crate::models::LoginReqDto;
use utoipa::Modify;
use utoipa::OpenApi;
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "HRMS API",
        version = "1.0.0",
        description = r#"
## HRMS

API for a small human-resources management system:

- **Employee Management** — add, list, bulk-edit and delete employee records
- **Attendance** — one entry per employee per day, Present or Absent
- **Payroll** — monthly pro-rated payroll (salary / 30 per present day) and
  downloadable plain-text payslips
- **Dashboard & Analytics** — read-only aggregates over the store

All `/api` routes require a session token from `/auth/login`.
"#,
    ),
    paths(
        crate::auth::handlers::login,
        crate::auth::handlers::logout,

        crate::api::employee::create_employee,
        crate::api::employee::list_employees,
        crate::api::employee::replace_employees,
        crate::api::employee::delete_employee,

        crate::api::attendance::mark,
        crate::api::attendance::list,

        crate::api::payroll::report,
        crate::api::payroll::payslip,

        crate::api::dashboard::overview,
        crate::api::analytics::report
    ),
    components(
        schemas(
            LoginReqDto,
            LoginResponse,
            Employee,
            CreateEmployee,
            AttendanceStatus,
            AttendanceRecord,
            MarkAttendanceReq,
            PayrollQuery,
            PayrollLine,
            DashboardSummary,
            DepartmentCount,
            MonthlyPresence,
            AnalyticsQuery,
            AnalyticsReport,
            StatusCount,
            EmployeePresence,
            DailyPresence
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Auth", description = "Session login/logout"),
        (name = "Employee", description = "Employee record APIs"),
        (name = "Attendance", description = "Attendance marking APIs"),
        (name = "Payroll", description = "Payroll and payslip APIs"),
        (name = "Reporting", description = "Dashboard and analytics APIs"),
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}
