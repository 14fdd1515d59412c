//! Ranked lists for the home page and sidebars.

use actix_web::{HttpResponse, web};

use quill_shared::dto::{PostDetailsResponse, TagCountResponse, TagResponse};

use crate::middleware::error::{AppError, AppResult};
use crate::middleware::session::Session;

fn posts(list: Vec<quill_core::domain::PostDetails>) -> Vec<PostDetailsResponse> {
    list.into_iter().map(Into::into).collect()
}

fn tags(list: Vec<quill_core::domain::TagDetails>) -> Vec<TagCountResponse> {
    list.into_iter().map(Into::into).collect()
}

/// GET /api/components/{name}
pub async fn component(session: Session, path: web::Path<String>) -> AppResult<HttpResponse> {
    let name = path.into_inner();
    let lists = session.lists();

    let response = match name.as_str() {
        "featured-posts" => HttpResponse::Ok().json(posts(lists.featured_posts().await?)),
        "latest-posts" => HttpResponse::Ok().json(posts(lists.latest_posts().await?)),
        "new-posts" => HttpResponse::Ok().json(posts(lists.new_posts().await?)),
        "popular-posts" => HttpResponse::Ok().json(posts(lists.popular_posts().await?)),
        "tag-cloud" => HttpResponse::Ok().json(tags(lists.tag_cloud().await?)),
        "tag-home" => HttpResponse::Ok().json(tags(lists.tag_home().await?)),
        "tag-menu" => {
            let menu: Vec<TagResponse> = lists
                .tag_menu()
                .await?
                .into_iter()
                .map(Into::into)
                .collect();
            HttpResponse::Ok().json(menu)
        }
        other => return Err(AppError::not_found("Component", other)),
    };

    Ok(response)
}
