use crate::{
    api::{analytics, attendance, health, leaves, meetings, notifications, roles, work, workitems},
    auth::{handlers, middleware::auth_middleware},
    config::Config,
};
use actix_governor::{
    Governor, GovernorConfigBuilder, PeerIpKeyExtractor, governor::middleware::NoOpMiddleware,
};
use actix_web::{middleware::from_fn, web};

pub fn configure(cfg: &mut web::ServiceConfig, config: Config) {
    // Helper to build per-route limiter
    fn build_limiter(requests_per_min: u32) -> Governor<PeerIpKeyExtractor, NoOpMiddleware> {
        let per_ms = if requests_per_min == 0 {
            1
        } else {
            60_000 / requests_per_min as u64
        };
        let cfg = GovernorConfigBuilder::default()
            .per_millisecond(per_ms)
            .burst_size(requests_per_min)
            .key_extractor(PeerIpKeyExtractor)
            .finish()
            .unwrap();
        Governor::new(&cfg)
    }

    let login_limiter = build_limiter(config.rate_login_per_min);
    let register_limiter = build_limiter(config.rate_register_per_min);
    let refresh_limiter = build_limiter(config.rate_refresh_per_min);
    let protected_limiter = build_limiter(config.rate_protected_per_min);

    // Public routes; /auth/me is the one authenticated resource in this scope
    cfg.service(
        web::scope("/auth")
            .service(
                web::resource("/register")
                    .wrap(register_limiter)
                    .route(web::post().to(handlers::register)),
            )
            .service(
                web::resource("/login")
                    .wrap(login_limiter)
                    .route(web::post().to(handlers::login)),
            )
            .service(
                web::resource("/refresh")
                    .wrap(refresh_limiter)
                    .route(web::post().to(handlers::refresh)),
            )
            .service(
                web::resource("/me")
                    .wrap(from_fn(auth_middleware))
                    .route(web::get().to(handlers::me)),
            ),
    );

    cfg.service(web::resource("/health").route(web::get().to(health::health)));

    // Protected routes
    cfg.service(
        web::scope(&config.api_prefix)
            .wrap(from_fn(auth_middleware))
            .wrap(protected_limiter)
            .service(
                web::scope("/roles")
                    .service(
                        web::resource("")
                            .route(web::get().to(roles::list_roles))
                            .route(web::post().to(roles::create_role)),
                    )
                    .service(
                        web::resource("/{id}")
                            .route(web::get().to(roles::get_role))
                            .route(web::put().to(roles::update_role))
                            .route(web::delete().to(roles::delete_role)),
                    ),
            )
            .service(
                web::scope("/attendance")
                    .service(
                        web::resource("")
                            .route(web::get().to(attendance::list_attendance))
                            .route(web::post().to(attendance::create_attendance)),
                    )
                    .service(
                        web::resource("/{id}/checkout")
                            .route(web::post().to(attendance::checkout)),
                    ),
            )
            .service(
                web::scope("/work")
                    .service(
                        web::resource("/breaks")
                            .route(web::get().to(work::list_breaks))
                            .route(web::post().to(work::create_break)),
                    )
                    .service(
                        web::resource("/breaks/{id}")
                            .route(web::put().to(work::update_break))
                            .route(web::delete().to(work::delete_break)),
                    )
                    .service(
                        web::resource("/schedules")
                            .route(web::get().to(work::list_schedules))
                            .route(web::post().to(work::create_schedule)),
                    )
                    .service(
                        web::resource("/schedules/{id}")
                            .route(web::put().to(work::update_schedule))
                            .route(web::delete().to(work::delete_schedule)),
                    ),
            )
            .service(
                web::scope("/meetings")
                    .service(
                        web::resource("")
                            .route(web::get().to(meetings::list_meetings))
                            .route(web::post().to(meetings::create_meeting)),
                    )
                    .service(
                        web::resource("/{id}")
                            .route(web::get().to(meetings::get_meeting))
                            .route(web::put().to(meetings::update_meeting))
                            .route(web::delete().to(meetings::delete_meeting)),
                    )
                    .service(
                        web::resource("/{id}/participants")
                            .route(web::get().to(meetings::list_participants))
                            .route(web::post().to(meetings::add_participant))
                            .route(web::delete().to(meetings::remove_participant)),
                    ),
            )
            .service(
                web::scope("/workitems")
                    .service(
                        web::resource("/projects")
                            .route(web::get().to(workitems::list_projects))
                            .route(web::post().to(workitems::create_project)),
                    )
                    .service(
                        web::resource("/projects/{id}")
                            .route(web::get().to(workitems::get_project))
                            .route(web::put().to(workitems::update_project))
                            .route(web::delete().to(workitems::delete_project)),
                    )
                    .service(
                        web::resource("/tasks")
                            .route(web::get().to(workitems::list_tasks))
                            .route(web::post().to(workitems::create_task)),
                    )
                    .service(
                        web::resource("/tasks/{id}")
                            .route(web::get().to(workitems::get_task))
                            .route(web::put().to(workitems::update_task))
                            .route(web::delete().to(workitems::delete_task)),
                    ),
            )
            .service(
                web::scope("/leaves")
                    .service(
                        web::resource("")
                            .route(web::get().to(leaves::list_leaves))
                            .route(web::post().to(leaves::create_leave)),
                    )
                    .service(
                        web::resource("/{id}")
                            .route(web::get().to(leaves::get_leave))
                            .route(web::put().to(leaves::update_leave))
                            .route(web::delete().to(leaves::cancel_leave)),
                    )
                    .service(
                        web::resource("/{id}/approve")
                            .route(web::post().to(leaves::approve_leave)),
                    )
                    .service(
                        web::resource("/{id}/reject")
                            .route(web::post().to(leaves::reject_leave)),
                    ),
            )
            .service(
                web::scope("/notifications")
                    .service(
                        web::resource("")
                            .route(web::get().to(notifications::list_notifications))
                            .route(web::post().to(notifications::create_notification)),
                    )
                    .service(
                        web::resource("/{id}/read")
                            .route(web::post().to(notifications::mark_read)),
                    ),
            )
            .service(
                web::scope("/analytics")
                    .service(
                        web::resource("/attendance/summary")
                            .route(web::get().to(analytics::attendance_summary)),
                    )
                    .service(
                        web::resource("/tasks/status")
                            .route(web::get().to(analytics::task_status)),
                    )
                    .service(
                        web::resource("/leaves/pending")
                            .route(web::get().to(analytics::pending_leaves)),
                    )
                    .service(
                        web::resource("/notifications/unread")
                            .route(web::get().to(analytics::unread_notifications)),
                    ),
            ),
    );
}

// LOGIN
//  ├─ access_token (4 h)
//  └─ refresh_token (30 days)
//
// API REQUEST
//  └─ Authorization: Bearer access_token
//
// ACCESS EXPIRED
//  └─ POST /auth/refresh with refresh_token
//       └─ returns new access_token
