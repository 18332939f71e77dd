use crate::{auth::session::Session, model::employee::Employee};
use actix_web::{HttpResponse, Responder, web};
use serde::{Deserialize, Serialize};
use serde_json::json;
use sqlx::SqlitePool;
use tracing::error;
use utoipa::ToSchema;

#[derive(Deserialize, Serialize, ToSchema)]
pub struct CreateEmployee {
    #[schema(example = "John Doe")]
    pub name: String,
    #[schema(example = "Engineering")]
    pub department: String,
    #[schema(example = "Software Engineer")]
    pub role: String,
    #[schema(example = 55000.0)]
    pub salary: f64,
}

pub async fn insert_employee(
    pool: &SqlitePool,
    employee: &CreateEmployee,
) -> Result<i64, sqlx::Error> {
    let result =
        sqlx::query("INSERT INTO employee (name, department, role, salary) VALUES (?, ?, ?, ?)")
            .bind(&employee.name)
            .bind(&employee.department)
            .bind(&employee.role)
            .bind(employee.salary)
            .execute(pool)
            .await?;

    Ok(result.last_insert_rowid())
}

pub async fn fetch_employees(pool: &SqlitePool) -> Result<Vec<Employee>, sqlx::Error> {
    sqlx::query_as::<_, Employee>(
        "SELECT id, name, department, role, salary FROM employee ORDER BY id",
    )
    .fetch_all(pool)
    .await
}

pub async fn fetch_employee(
    pool: &SqlitePool,
    employee_id: i64,
) -> Result<Option<Employee>, sqlx::Error> {
    sqlx::query_as::<_, Employee>(
        "SELECT id, name, department, role, salary FROM employee WHERE id = ?",
    )
    .bind(employee_id)
    .fetch_optional(pool)
    .await
}

/// Bulk overwrite used by the edit-table flow: drop every row, then reinsert
/// the submitted records with their ids. Runs inside one transaction so a
/// failure mid-way never leaves the table empty.
pub async fn replace_all_employees(
    pool: &SqlitePool,
    employees: &[Employee],
) -> Result<(), sqlx::Error> {
    let mut tx = pool.begin().await?;

    sqlx::query("DELETE FROM employee").execute(&mut *tx).await?;

    for emp in employees {
        sqlx::query(
            "INSERT INTO employee (id, name, department, role, salary) VALUES (?, ?, ?, ?, ?)",
        )
        .bind(emp.id)
        .bind(&emp.name)
        .bind(&emp.department)
        .bind(&emp.role)
        .bind(emp.salary)
        .execute(&mut *tx)
        .await?;
    }

    tx.commit().await
}

/// Deletes the employee row only. Attendance entries referencing the id are
/// retained for historical payroll (see DESIGN.md); the attendance listing
/// joins them away.
pub async fn remove_employee(pool: &SqlitePool, employee_id: i64) -> Result<u64, sqlx::Error> {
    let result = sqlx::query("DELETE FROM employee WHERE id = ?")
        .bind(employee_id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected())
}

/// Create Employee
#[utoipa::path(
    post,
    path = "/api/employees",
    request_body = CreateEmployee,
    responses(
        (status = 201, description = "Employee created", body = Object, example = json!({
            "id": 7,
            "message": "Employee added successfully"
        })),
        (status = 400, description = "Negative salary"),
        (status = 401, description = "Unauthorized"),
        (status = 500, description = "Internal server error")
    ),
    security(("bearer_auth" = [])),
    tag = "Employee"
)]
pub async fn create_employee(
    _session: Session,
    pool: web::Data<SqlitePool>,
    payload: web::Json<CreateEmployee>,
) -> impl Responder {
    if payload.salary < 0.0 {
        return HttpResponse::BadRequest().json(json!({
            "message": "Salary must be non-negative"
        }));
    }

    match insert_employee(pool.get_ref(), &payload).await {
        Ok(id) => HttpResponse::Created().json(json!({
            "id": id,
            "message": "Employee added successfully"
        })),
        Err(e) => {
            error!(error = %e, "Failed to create employee");
            HttpResponse::InternalServerError().json(json!({
                "message": "Internal Server Error"
            }))
        }
    }
}

/// List Employees
#[utoipa::path(
    get,
    path = "/api/employees",
    responses(
        (status = 200, description = "All employees, ordered by id", body = [Employee]),
        (status = 401, description = "Unauthorized"),
        (status = 500, description = "Internal server error")
    ),
    security(("bearer_auth" = [])),
    tag = "Employee"
)]
pub async fn list_employees(
    _session: Session,
    pool: web::Data<SqlitePool>,
) -> actix_web::Result<impl Responder> {
    let employees = fetch_employees(pool.get_ref()).await.map_err(|e| {
        error!(error = %e, "Failed to fetch employees");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;

    Ok(HttpResponse::Ok().json(employees))
}

/// Replace all employees (edit-table save)
#[utoipa::path(
    put,
    path = "/api/employees",
    request_body = [Employee],
    responses(
        (status = 200, description = "Employee table replaced", body = Object, example = json!({
            "message": "Changes saved successfully"
        })),
        (status = 400, description = "Negative salary in submitted rows"),
        (status = 401, description = "Unauthorized"),
        (status = 500, description = "Internal server error")
    ),
    security(("bearer_auth" = [])),
    tag = "Employee"
)]
pub async fn replace_employees(
    _session: Session,
    pool: web::Data<SqlitePool>,
    payload: web::Json<Vec<Employee>>,
) -> impl Responder {
    if payload.iter().any(|e| e.salary < 0.0) {
        return HttpResponse::BadRequest().json(json!({
            "message": "Salary must be non-negative"
        }));
    }

    match replace_all_employees(pool.get_ref(), &payload).await {
        Ok(()) => HttpResponse::Ok().json(json!({
            "message": "Changes saved successfully"
        })),
        Err(e) => {
            error!(error = %e, "Failed to replace employees");
            HttpResponse::InternalServerError().json(json!({
                "message": "Internal Server Error"
            }))
        }
    }
}

/// Delete Employee
#[utoipa::path(
    delete,
    path = "/api/employees/{employee_id}",
    params(
        ("employee_id", Path, description = "Employee ID")
    ),
    responses(
        (status = 200, description = "Successfully deleted", body = Object, example = json!({
            "message": "Employee deleted successfully"
        })),
        (status = 404, description = "Employee not found"),
        (status = 401, description = "Unauthorized"),
        (status = 500, description = "Internal server error")
    ),
    security(("bearer_auth" = [])),
    tag = "Employee"
)]
pub async fn delete_employee(
    _session: Session,
    pool: web::Data<SqlitePool>,
    path: web::Path<i64>,
) -> impl Responder {
    let employee_id = path.into_inner();

    match remove_employee(pool.get_ref(), employee_id).await {
        Ok(0) => HttpResponse::NotFound().json(json!({
            "message": "Employee not found"
        })),
        Ok(_) => HttpResponse::Ok().json(json!({
            "message": "Employee deleted successfully"
        })),
        Err(e) => {
            error!(error = %e, employee_id, "Failed to delete employee");
            HttpResponse::InternalServerError().json(json!({
                "message": "Internal Server Error"
            }))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_pool;

    fn new_employee(name: &str, salary: f64) -> CreateEmployee {
        CreateEmployee {
            name: name.to_string(),
            department: "Engineering".to_string(),
            role: "Engineer".to_string(),
            salary,
        }
    }

    #[actix_web::test]
    async fn insert_then_list_preserves_order() {
        let pool = test_pool().await;

        let first = insert_employee(&pool, &new_employee("A", 1000.0))
            .await
            .unwrap();
        let second = insert_employee(&pool, &new_employee("B", 2000.0))
            .await
            .unwrap();
        assert!(second > first);

        let employees = fetch_employees(&pool).await.unwrap();
        assert_eq!(employees.len(), 2);
        assert_eq!(employees[0].name, "A");
        assert_eq!(employees[1].name, "B");
    }

    #[actix_web::test]
    async fn replace_with_empty_list_clears_table() {
        let pool = test_pool().await;
        insert_employee(&pool, &new_employee("A", 1000.0))
            .await
            .unwrap();

        replace_all_employees(&pool, &[]).await.unwrap();

        let employees = fetch_employees(&pool).await.unwrap();
        assert!(employees.is_empty());
    }

    #[actix_web::test]
    async fn replace_keeps_submitted_ids() {
        let pool = test_pool().await;
        insert_employee(&pool, &new_employee("Old", 1000.0))
            .await
            .unwrap();

        let replacement = vec![Employee {
            id: 42,
            name: "New".to_string(),
            department: "HR".to_string(),
            role: "Manager".to_string(),
            salary: 5000.0,
        }];
        replace_all_employees(&pool, &replacement).await.unwrap();

        let employees = fetch_employees(&pool).await.unwrap();
        assert_eq!(employees.len(), 1);
        assert_eq!(employees[0].id, 42);
        assert_eq!(employees[0].name, "New");
    }

    #[actix_web::test]
    async fn delete_leaves_attendance_rows_in_place() {
        let pool = test_pool().await;
        let id = insert_employee(&pool, &new_employee("A", 1000.0))
            .await
            .unwrap();

        sqlx::query("INSERT INTO attendance (emp_id, date, status) VALUES (?, '2025-02-01', 'Present')")
            .bind(id)
            .execute(&pool)
            .await
            .unwrap();

        let affected = remove_employee(&pool, id).await.unwrap();
        assert_eq!(affected, 1);

        let employees = fetch_employees(&pool).await.unwrap();
        assert!(employees.is_empty());

        let orphaned: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM attendance WHERE emp_id = ?")
            .bind(id)
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(orphaned, 1);
    }

    #[actix_web::test]
    async fn delete_unknown_employee_affects_nothing() {
        let pool = test_pool().await;
        let affected = remove_employee(&pool, 999).await.unwrap();
        assert_eq!(affected, 0);
    }
}
