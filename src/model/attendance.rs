use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};
use utoipa::ToSchema;

/// Daily attendance status. Stored as its string form in the `attendance`
/// table; the input surface accepts nothing outside this set.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    sqlx::Type,
    ToSchema,
)]
pub enum AttendanceStatus {
    Present,
    Absent,
}

#[derive(Debug, Serialize, Deserialize, sqlx::FromRow)]
pub struct Attendance {
    pub id: i64,
    pub emp_id: i64,
    pub date: NaiveDate,
    pub status: AttendanceStatus,
}

/// Row shape of the attendance listing: entries joined against the current
/// employee set, so orphaned entries never appear here.
#[derive(Debug, Serialize, sqlx::FromRow, ToSchema)]
pub struct AttendanceRecord {
    #[schema(example = "Rahul Sharma")]
    pub employee_name: String,

    #[schema(example = "2025-02-01", value_type = String, format = "date")]
    pub date: NaiveDate,

    pub status: AttendanceStatus,
}
