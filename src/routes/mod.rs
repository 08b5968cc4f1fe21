pub mod auth;
pub mod dashboard;
pub mod health;
pub mod sessions;
pub mod tasks;
pub mod users;

use actix_web::web;

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/auth")
            .service(auth::login)
            .service(auth::register)
            .service(auth::logout)
            .service(auth::me),
    )
    .service(
        web::scope("/tasks")
            .service(tasks::get_tasks)
            .service(tasks::create_task)
            .service(tasks::get_task)
            .service(tasks::update_task)
            .service(tasks::delete_task),
    )
    .service(
        web::scope("/users")
            .service(users::list_users)
            .service(users::create_user)
            .service(users::get_user)
            .service(users::update_user)
            .service(users::delete_user),
    )
    .service(
        web::scope("/auth-sessions")
            .service(sessions::list_sessions)
            .service(sessions::get_session)
            .service(sessions::delete_session),
    )
    .service(web::scope("/dashboard").service(dashboard::summary));
}
