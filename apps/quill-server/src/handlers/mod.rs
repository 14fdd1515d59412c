//! HTTP handlers and route configuration.

mod auth;
mod comments;
mod components;
mod error_page;
mod health;
mod posts;
mod tags;

#[cfg(test)]
mod tests;

use actix_web::web;

/// Configure all application routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/error", web::get().to(error_page::error_page))
        .service(
            web::scope("/api")
                // Public routes
                .route("/health", web::get().to(health::health_check))
                // Auth routes
                .service(
                    web::scope("/auth")
                        .route("/register", web::post().to(auth::register))
                        .route("/login", web::post().to(auth::login))
                        .route("/logout", web::post().to(auth::logout))
                        .route("/me", web::get().to(auth::me)),
                )
                // Posts
                .service(
                    web::scope("/posts")
                        .route("", web::get().to(posts::list))
                        .route("", web::post().to(posts::create))
                        .route("/search", web::get().to(posts::search))
                        .route("/{url}", web::get().to(posts::get_by_url))
                        .route("/{id}", web::put().to(posts::update))
                        .route("/{id}", web::delete().to(posts::delete))
                        .route("/{id}/reactions", web::post().to(posts::toggle_reaction))
                        .route("/{id}/reactions", web::delete().to(posts::remove_reaction))
                        .route("/{id}/comments", web::get().to(comments::list_for_post))
                        .route("/{id}/comments", web::post().to(comments::create)),
                )
                .route("/users/{id}/posts", web::get().to(posts::by_user))
                // Comments
                .service(
                    web::scope("/comments")
                        .route("/{id}/replies", web::get().to(comments::replies))
                        .route("/{id}", web::put().to(comments::update))
                        .route("/{id}", web::delete().to(comments::delete))
                        .route("/{id}/reactions", web::post().to(comments::toggle_reaction))
                        .route("/{id}/reactions", web::delete().to(comments::remove_reaction)),
                )
                // Tags
                .service(
                    web::scope("/tags")
                        .route("", web::get().to(tags::list))
                        .route("", web::post().to(tags::create))
                        .route("/{url}", web::get().to(tags::get_by_url))
                        .route("/{url}/posts", web::get().to(posts::by_tag))
                        .route("/{id}", web::put().to(tags::update))
                        .route("/{id}", web::delete().to(tags::delete)),
                )
                // Home page and sidebar lists
                .route("/components/{name}", web::get().to(components::component)),
        );
}
