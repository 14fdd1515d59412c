//! Tag handlers. Writes are admin-only.

use actix_web::{HttpResponse, web};
use uuid::Uuid;
use validator::Validate;

use quill_core::domain::Tag;
use quill_shared::dto::{CreateTagRequest, TagCountResponse, TagResponse, UpdateTagRequest};
use quill_shared::validation::{slugify, validate_slug};

use crate::middleware::auth::Identity;
use crate::middleware::error::{AppError, AppResult};
use crate::middleware::session::Session;

/// GET /api/tags
pub async fn list(session: Session) -> AppResult<HttpResponse> {
    let tags: Vec<TagCountResponse> = session
        .tags()
        .get_all_with_posts()
        .await?
        .into_iter()
        .map(Into::into)
        .collect();

    Ok(HttpResponse::Ok().json(tags))
}

/// GET /api/tags/{url}
pub async fn get_by_url(session: Session, path: web::Path<String>) -> AppResult<HttpResponse> {
    let url = path.into_inner();
    let tag = session
        .tags()
        .get_by_url(&url)
        .await?
        .ok_or_else(|| AppError::not_found("Tag", &url))?;

    Ok(HttpResponse::Ok().json(TagResponse::from(tag)))
}

/// POST /api/tags
pub async fn create(
    session: Session,
    identity: Identity,
    body: web::Json<CreateTagRequest>,
) -> AppResult<HttpResponse> {
    identity.require_admin()?;
    let req = body.into_inner();
    req.validate()?;

    let url = req.url.unwrap_or_else(|| slugify(&req.name));
    if validate_slug(&url).is_err() {
        return Err(AppError::Validation(vec![
            "url: Could not derive a valid URL from the name, please provide one".to_string(),
        ]));
    }
    if session.tags().name_exists(&req.name).await? {
        return Err(AppError::Conflict(format!("Tag '{}' already exists", req.name)));
    }
    if session.tags().url_exists(&url).await? {
        return Err(AppError::Conflict(format!("URL '{}' is already in use", url)));
    }

    let tag = Tag::new(req.name, url, req.color);
    session.tags().add(tag.clone()).await;
    session.commit().await?;

    tracing::info!(tag_id = %tag.id, name = %tag.name, "Tag created");
    Ok(HttpResponse::Created().json(TagResponse::from(tag)))
}

/// PUT /api/tags/{id}
pub async fn update(
    session: Session,
    identity: Identity,
    path: web::Path<Uuid>,
    body: web::Json<UpdateTagRequest>,
) -> AppResult<HttpResponse> {
    identity.require_admin()?;
    let id = path.into_inner();
    let req = body.into_inner();
    req.validate()?;

    let mut tag = session
        .tags()
        .get_by_id(id)
        .await?
        .ok_or_else(|| AppError::not_found("Tag", id))?;

    if let Some(name) = req.name {
        if name != tag.name && session.tags().name_exists(&name).await? {
            return Err(AppError::Conflict(format!("Tag '{}' already exists", name)));
        }
        tag.name = name;
    }
    if let Some(url) = req.url {
        if url != tag.url && session.tags().url_exists(&url).await? {
            return Err(AppError::Conflict(format!("URL '{}' is already in use", url)));
        }
        tag.url = url;
    }
    if let Some(color) = req.color {
        tag.color = color;
    }
    if let Some(is_active) = req.is_active {
        tag.is_active = is_active;
    }

    session.tags().update(tag.clone()).await;
    session.commit().await?;

    Ok(HttpResponse::Ok().json(TagResponse::from(tag)))
}

/// DELETE /api/tags/{id}
pub async fn delete(
    session: Session,
    identity: Identity,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    identity.require_admin()?;
    let id = path.into_inner();
    let tag = session
        .tags()
        .get_by_id(id)
        .await?
        .ok_or_else(|| AppError::not_found("Tag", id))?;

    session.tags().delete(&tag).await;
    session.commit().await?;

    tracing::info!(tag_id = %tag.id, "Tag deleted");
    Ok(HttpResponse::NoContent().finish())
}
