use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// One payroll line per employee for a given month. Never persisted; every
/// computation starts from the raw attendance rows.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct PayrollLine {
    #[schema(example = 1)]
    pub employee_id: i64,

    #[schema(example = "Rahul Sharma")]
    pub name: String,

    #[schema(example = "Engineering")]
    pub department: String,

    #[schema(example = "Software Engineer")]
    pub role: String,

    #[schema(example = 60000.0)]
    pub monthly_salary: f64,

    #[schema(example = 2)]
    pub present_days: i64,

    #[schema(example = 4000.0)]
    pub salary_payable: f64,
}
