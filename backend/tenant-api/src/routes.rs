use crate::handlers;
use crate::state::AppState;
use actix_web::middleware::Condition;
use actix_web::web;
use edge_auth::TenantCtxMiddleware;

/// Register every route; employee routes run the edge check in-process
/// when `emulate_edge` is set
pub fn configure(state: web::Data<AppState>) -> impl FnOnce(&mut web::ServiceConfig) {
    move |cfg| {
        let edge = Condition::new(
            state.emulate_edge,
            TenantCtxMiddleware::new(state.verifier.clone()),
        );

        cfg.app_data(state.clone())
            .route("/health", web::get().to(handlers::health))
            .service(
                web::scope("/api/auth")
                    .route("/login", web::post().to(handlers::login))
                    .route("/logout", web::post().to(handlers::logout)),
            )
            .service(
                web::scope("/api/employee")
                    .wrap(edge)
                    .route("", web::get().to(handlers::list_employees))
                    .route("", web::post().to(handlers::add_employee))
                    .route("/search", web::get().to(handlers::search_employees))
                    .route("/{id}", web::put().to(handlers::update_employee)),
            );
    }
}
