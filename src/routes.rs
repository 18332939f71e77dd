use crate::{
    api::{analytics, attendance, dashboard, employee, payroll},
    auth::handlers,
    config::Config,
};
use actix_web::web;

pub fn configure(cfg: &mut web::ServiceConfig, config: &Config) {
    // Public routes
    cfg.service(
        web::scope("/auth")
            .service(web::resource("/login").route(web::post().to(handlers::login)))
            .service(web::resource("/logout").route(web::post().to(handlers::logout))),
    );

    // Session-protected routes; every handler takes a Session extractor.
    cfg.service(
        web::scope(&config.api_prefix)
            .service(
                web::scope("/employees")
                    // /employees
                    .service(
                        web::resource("")
                            .route(web::post().to(employee::create_employee))
                            .route(web::get().to(employee::list_employees))
                            .route(web::put().to(employee::replace_employees)),
                    )
                    // /employees/{id}
                    .service(
                        web::resource("/{id}").route(web::delete().to(employee::delete_employee)),
                    ),
            )
            .service(
                web::scope("/attendance").service(
                    web::resource("")
                        .route(web::post().to(attendance::mark))
                        .route(web::get().to(attendance::list)),
                ),
            )
            .service(
                web::scope("/payroll")
                    // /payroll
                    .service(web::resource("").route(web::get().to(payroll::report)))
                    // /payroll/{id}/payslip
                    .service(
                        web::resource("/{id}/payslip").route(web::get().to(payroll::payslip)),
                    ),
            )
            .service(web::resource("/dashboard").route(web::get().to(dashboard::overview)))
            .service(web::resource("/analytics").route(web::get().to(analytics::report))),
    );
}
