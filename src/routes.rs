use crate::{
    api::{attendance, employee, health},
    auth::{handlers, middleware::session_middleware},
    config::Config,
};
use actix_governor::{
    Governor, GovernorConfigBuilder, PeerIpKeyExtractor, governor::middleware::NoOpMiddleware,
};
use actix_web::{middleware::from_fn, web};

fn build_limiter(requests_per_min: u32) -> Governor<PeerIpKeyExtractor, NoOpMiddleware> {
    let requests_per_min = requests_per_min.max(1);
    let cfg = GovernorConfigBuilder::default()
        .per_millisecond((60_000 / requests_per_min as u64).max(1))
        .burst_size(requests_per_min)
        .key_extractor(PeerIpKeyExtractor)
        .finish()
        .unwrap_or_default();
    Governor::new(&cfg)
}

/// Employee and attendance routes, relative to the protected prefix.
pub fn api_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/employees")
            // /employees
            .service(
                web::resource("")
                    .route(web::get().to(employee::list_employees))
                    .route(web::post().to(employee::create_employee)),
            )
            // /employees/options, registered ahead of /{id}
            .service(web::resource("/options").route(web::get().to(employee::employee_options)))
            // /employees/{id}
            .service(
                web::resource("/{id}")
                    .route(web::get().to(employee::get_employee))
                    .route(web::put().to(employee::update_employee))
                    .route(web::delete().to(employee::delete_employee)),
            ),
    )
    .service(
        web::scope("/attendance")
            .service(web::resource("/today").route(web::get().to(attendance::list_today)))
            .service(web::resource("/recent").route(web::get().to(attendance::list_recent)))
            // /attendance/{id}
            .service(
                web::resource("/{id}")
                    .route(web::get().to(attendance::today_record))
                    .route(web::delete().to(attendance::delete_today)),
            )
            .service(web::resource("/{id}/check-in").route(web::post().to(attendance::check_in)))
            .service(web::resource("/{id}/check-out").route(web::post().to(attendance::check_out)))
            .service(web::resource("/{id}/status").route(web::put().to(attendance::set_status))),
    );
}

pub fn configure(cfg: &mut web::ServiceConfig, config: &Config) {
    // Public routes, no rate limit on sign-in
    cfg.route("/health", web::get().to(health::health)).service(
        web::scope("/auth")
            .service(
                web::resource("/login")
                    .route(web::post().to(handlers::login_password))
                    .route(web::get().to(handlers::login_token)),
            )
            .service(web::resource("/logout").route(web::post().to(handlers::logout))),
    );

    // Protected routes
    cfg.service(
        web::scope(&config.api_prefix)
            .wrap(from_fn(session_middleware)) // session check
            .wrap(build_limiter(config.rate_protected_per_min)) // rate limiting
            .service(web::resource("/session").route(web::get().to(handlers::current_session)))
            .configure(api_routes),
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::gate::AccessGate;
    use crate::config::AuthSecrets;
    use crate::service::{AttendanceService, Dispatcher, EmployeeRepository};
    use crate::store::memory::MemoryStore;
    use actix_web::{App, http::StatusCode, test};
    use std::sync::Arc;

    fn config() -> Config {
        Config::from_lookup(|name: &str| match name {
            "SERVER_ADDR" => Some("127.0.0.1:0".into()),
            "DATABASE_URL" => Some("postgres://unused".into()),
            "SESSION_SECRET" => Some("session-secret".into()),
            "AUTH_TOKEN" => Some("invite-1".into()),
            _ => None,
        })
        .unwrap()
    }

    #[actix_web::test]
    async fn protected_routes_need_a_session() {
        let config = config();
        let store = Arc::new(MemoryStore::new());
        let dispatcher = Dispatcher::new(
            AttendanceService::new(store.clone()),
            EmployeeRepository::new(store),
        );
        let gate = AccessGate::new(
            AuthSecrets {
                tokens: ["invite-1".to_string()].into(),
                ..Default::default()
            },
            config.session_secret.clone(),
            config.session_ttl,
        );

        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(dispatcher))
                .app_data(web::Data::new(gate))
                .configure(|cfg| configure(cfg, &config)),
        )
        .await;

        let req = test::TestRequest::get()
            .uri("/api/attendance/today")
            .peer_addr("127.0.0.1:5000".parse().unwrap())
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::UNAUTHORIZED);

        let req = test::TestRequest::get()
            .uri("/auth/login?token=invite-1")
            .to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        let token = body["session_token"].as_str().unwrap().to_string();

        let req = test::TestRequest::get()
            .uri("/api/attendance/today")
            .peer_addr("127.0.0.1:5000".parse().unwrap())
            .insert_header(("Authorization", format!("Bearer {token}")))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let rows: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(rows, serde_json::json!([]));
    }
}
