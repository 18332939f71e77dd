use std::str::FromStr;

use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use tracing::info;

pub async fn init_db(database_url: &str) -> SqlitePool {
    let options = SqliteConnectOptions::from_str(database_url)
        .expect("Invalid DATABASE_URL")
        .create_if_missing(true);

    let pool = SqlitePoolOptions::new()
        .connect_with(options)
        .await
        .expect("Failed to connect to database");

    create_tables(&pool).await.expect("Failed to create tables");
    seed_demo_data(&pool).await.expect("Failed to seed demo data");

    pool
}

/// Creates the required tables if they do not exist. Safe to run on every
/// startup.
pub async fn create_tables(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS employee (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL,
            department TEXT NOT NULL,
            role TEXT NOT NULL,
            salary REAL NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS attendance (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            emp_id INTEGER NOT NULL,
            date TEXT NOT NULL,
            status TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

/// Inserts demo data only when the employee table is empty, so a second run
/// is a no-op.
pub async fn seed_demo_data(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM employee")
        .fetch_one(pool)
        .await?;

    if count > 0 {
        return Ok(());
    }

    info!("Empty employee table, seeding demo data");

    let employees: [(&str, &str, &str, f64); 6] = [
        ("Rahul Sharma", "Engineering", "Software Engineer", 60000.0),
        ("Ananya Patel", "HR", "HR Manager", 50000.0),
        ("Karthik R", "Finance", "Accountant", 45000.0),
        ("Neha Singh", "Engineering", "QA Engineer", 48000.0),
        ("Amit Verma", "Sales", "Sales Executive", 40000.0),
        ("Priya Nair", "Marketing", "Marketing Lead", 52000.0),
    ];

    for (name, department, role, salary) in employees {
        sqlx::query("INSERT INTO employee (name, department, role, salary) VALUES (?, ?, ?, ?)")
            .bind(name)
            .bind(department)
            .bind(role)
            .bind(salary)
            .execute(pool)
            .await?;
    }

    let attendance: [(i64, &str, &str); 13] = [
        (1, "2025-02-01", "Present"),
        (1, "2025-02-02", "Present"),
        (1, "2025-02-03", "Absent"),
        (2, "2025-02-01", "Present"),
        (2, "2025-02-02", "Present"),
        (3, "2025-02-01", "Absent"),
        (3, "2025-02-02", "Present"),
        (4, "2025-02-01", "Present"),
        (4, "2025-02-02", "Present"),
        (5, "2025-02-01", "Present"),
        (5, "2025-02-02", "Absent"),
        (6, "2025-02-01", "Present"),
        (6, "2025-02-02", "Present"),
    ];

    // Dates are bound as ISO-8601 text, the same encoding chrono's NaiveDate
    // uses for this column.
    for (emp_id, date, status) in attendance {
        sqlx::query("INSERT INTO attendance (emp_id, date, status) VALUES (?, ?, ?)")
            .bind(emp_id)
            .bind(date)
            .bind(status)
            .execute(pool)
            .await?;
    }

    Ok(())
}

#[cfg(test)]
pub(crate) async fn test_pool() -> SqlitePool {
    // A single connection keeps every statement on the same in-memory
    // database.
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .expect("in-memory pool");
    create_tables(&pool).await.expect("create tables");
    pool
}

#[cfg(test)]
mod tests {
    use super::*;

    #[actix_web::test]
    async fn seeding_starts_with_six_employees() {
        let pool = test_pool().await;
        seed_demo_data(&pool).await.unwrap();

        let employees: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM employee")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(employees, 6);

        let entries: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM attendance")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(entries, 13);
    }

    #[actix_web::test]
    async fn seeding_twice_is_idempotent() {
        let pool = test_pool().await;
        seed_demo_data(&pool).await.unwrap();
        seed_demo_data(&pool).await.unwrap();

        let employees: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM employee")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(employees, 6);
    }

    #[actix_web::test]
    async fn create_tables_is_idempotent() {
        let pool = test_pool().await;
        create_tables(&pool).await.unwrap();
    }
}
