//! Route configuration
//!
//! Centralized route setup; each domain manages its own scope.

use actix_web::web;

use crate::handlers;

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1")
            .route("/health", web::get().to(handlers::health::health_check))
            .route(
                "/health/ready",
                web::get().to(handlers::health::readiness_check),
            )
            .configure(auth)
            .configure(patients)
            .configure(doctors)
            .configure(studies)
            .configure(images)
            .configure(reports)
            .configure(appointments)
            .configure(analysis),
    );
}

fn auth(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/auth")
            .route("/register", web::post().to(handlers::auth::register))
            .route("/login", web::post().to(handlers::auth::login))
            .route("/me", web::get().to(handlers::auth::me))
            .route("/me", web::patch().to(handlers::auth::update_me))
            .route(
                "/change-password",
                web::post().to(handlers::auth::change_password),
            )
            .route(
                "/request-set-password",
                web::post().to(handlers::auth::request_set_password),
            )
            .route(
                "/validate-set-password",
                web::get().to(handlers::auth::validate_set_password),
            )
            .route("/set-password", web::post().to(handlers::auth::set_password)),
    );
}

fn patients(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/patients")
            .route("", web::get().to(handlers::patients::list_patients))
            .route("", web::post().to(handlers::patients::create_patient))
            .route("/{id}", web::get().to(handlers::patients::get_patient))
            .route("/{id}", web::patch().to(handlers::patients::update_patient))
            .route("/{id}", web::delete().to(handlers::patients::delete_patient)),
    );
}

fn doctors(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/doctors")
            .route("", web::get().to(handlers::doctors::list_doctors))
            .route("", web::post().to(handlers::doctors::create_doctor))
            .route("/{id}", web::get().to(handlers::doctors::get_doctor))
            .route("/{id}", web::patch().to(handlers::doctors::update_doctor))
            .route("/{id}", web::delete().to(handlers::doctors::delete_doctor)),
    );
}

fn studies(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/studies")
            .route("", web::get().to(handlers::studies::list_studies))
            .route("", web::post().to(handlers::studies::create_study))
            .route("/{id}", web::get().to(handlers::studies::get_study))
            .route("/{id}", web::patch().to(handlers::studies::update_study))
            .route("/{id}", web::delete().to(handlers::studies::delete_study))
            .route(
                "/{id}/images",
                web::post().to(handlers::images::upload_image),
            ),
    );
}

fn images(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/images")
            .route("", web::get().to(handlers::images::list_images))
            .route("/{id}", web::get().to(handlers::images::get_image))
            .route("/{id}", web::delete().to(handlers::images::delete_image)),
    );
}

fn reports(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/reports")
            .route("", web::get().to(handlers::reports::list_reports))
            .route("", web::post().to(handlers::reports::create_report))
            .route("/{id}", web::get().to(handlers::reports::get_report))
            .route("/{id}", web::patch().to(handlers::reports::update_report))
            .route("/{id}", web::delete().to(handlers::reports::delete_report)),
    );
}

fn appointments(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/appointments")
            .route(
                "",
                web::post().to(handlers::appointments::create_appointment),
            )
            .route("", web::get().to(handlers::appointments::list_appointments))
            .route(
                "/{id}",
                web::get().to(handlers::appointments::get_appointment),
            ),
    );
}

fn analysis(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/analysis")
            .route("/predict", web::post().to(handlers::analysis::predict))
            .route("/ping", web::get().to(handlers::analysis::ping)),
    );
}
