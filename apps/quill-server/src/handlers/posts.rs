//! Post handlers.

use actix_web::{HttpResponse, web};
use chrono::Utc;
use uuid::Uuid;
use validator::Validate;

use quill_core::domain::{Post, PostReaction, PostStatus, ReactionToggle};
use quill_infra::BlogSession;
use quill_shared::dto::{
    CreatePostRequest, PostDetailsResponse, PostResponse, ReactionRequest, ReactionResponse,
    SearchQuery, UpdatePostRequest,
};
use quill_shared::validation::{slugify, validate_slug};

use crate::middleware::auth::{Identity, OptionalIdentity};
use crate::middleware::error::{AppError, AppResult};
use crate::middleware::session::Session;

/// Unpublished posts are only shown to their author and admins.
fn visible(post: &Post, viewer: Option<&Identity>) -> bool {
    post.is_live() || viewer.is_some_and(|v| v.owns(post.user_id))
}

async fn get_post(session: &BlogSession, id: Uuid) -> AppResult<Post> {
    session
        .posts()
        .get_by_id(id)
        .await?
        .ok_or_else(|| AppError::not_found("Post", id))
}

/// A post the viewer may see. Hidden posts read as missing.
pub(crate) async fn get_visible_post(
    session: &BlogSession,
    id: Uuid,
    viewer: Option<&Identity>,
) -> AppResult<Post> {
    let post = get_post(session, id).await?;
    if visible(&post, viewer) {
        Ok(post)
    } else {
        Err(AppError::not_found("Post", id))
    }
}

async fn details(session: &BlogSession, id: Uuid) -> AppResult<PostDetailsResponse> {
    let details = session
        .posts()
        .get_by_id_with_details(id)
        .await?
        .ok_or_else(|| AppError::not_found("Post", id))?;
    Ok(details.into())
}

async fn ensure_tags_exist(session: &BlogSession, tag_ids: &[Uuid]) -> AppResult<()> {
    for id in tag_ids {
        if session.tags().get_by_id(*id).await?.is_none() {
            return Err(AppError::BadRequest(format!("Tag {} does not exist", id)));
        }
    }
    Ok(())
}

fn parse_status(status: Option<&str>) -> AppResult<Option<PostStatus>> {
    Ok(status.map(str::parse::<PostStatus>).transpose()?)
}

/// GET /api/posts
pub async fn list(session: Session, viewer: OptionalIdentity) -> AppResult<HttpResponse> {
    let posts: Vec<PostDetailsResponse> = session
        .posts()
        .get_all_with_details()
        .await?
        .into_iter()
        .filter(|d| visible(&d.post, viewer.identity()))
        .map(Into::into)
        .collect();

    Ok(HttpResponse::Ok().json(posts))
}

/// GET /api/posts/search?q=
pub async fn search(
    session: Session,
    viewer: OptionalIdentity,
    query: web::Query<SearchQuery>,
) -> AppResult<HttpResponse> {
    let posts: Vec<PostResponse> = session
        .posts()
        .search(&query.q)
        .await?
        .into_iter()
        .filter(|p| visible(p, viewer.identity()))
        .map(Into::into)
        .collect();

    Ok(HttpResponse::Ok().json(posts))
}

/// GET /api/posts/{url}
pub async fn get_by_url(
    session: Session,
    viewer: OptionalIdentity,
    path: web::Path<String>,
) -> AppResult<HttpResponse> {
    let url = path.into_inner();
    let details = session
        .posts()
        .get_by_url_with_details(&url)
        .await?
        .filter(|d| visible(&d.post, viewer.identity()))
        .ok_or_else(|| AppError::not_found("Post", &url))?;

    Ok(HttpResponse::Ok().json(PostDetailsResponse::from(details)))
}

/// POST /api/posts
pub async fn create(
    session: Session,
    identity: Identity,
    body: web::Json<CreatePostRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();
    req.validate()?;

    let url = match req.url {
        Some(url) => url,
        None => slugify(&req.title),
    };
    if url.len() < 5 || url.len() > 200 || validate_slug(&url).is_err() {
        return Err(AppError::Validation(vec![
            "url: Could not derive a valid URL from the title, please provide one".to_string(),
        ]));
    }
    if session.posts().url_exists(&url).await? {
        return Err(AppError::Conflict(format!("URL '{}' is already in use", url)));
    }
    ensure_tags_exist(&session, &req.tag_ids).await?;

    let mut post = Post::new(
        identity.user_id,
        req.title,
        req.content,
        req.description,
        url,
    );
    post.image = req.image;
    let status = parse_status(req.status.as_deref())?.unwrap_or_default();
    post.transition(status, req.scheduled_publish_time, Utc::now())?;

    session.posts().add(post.clone()).await;
    if !req.tag_ids.is_empty() {
        session.posts().set_tags(post.id, req.tag_ids).await;
    }
    session.commit().await?;

    tracing::info!(post_id = %post.id, status = %post.status, "Post created");
    Ok(HttpResponse::Created().json(details(&session, post.id).await?))
}

/// PUT /api/posts/{id}
pub async fn update(
    session: Session,
    identity: Identity,
    path: web::Path<Uuid>,
    body: web::Json<UpdatePostRequest>,
) -> AppResult<HttpResponse> {
    let id = path.into_inner();
    let req = body.into_inner();
    req.validate()?;

    let mut post = get_post(&session, id).await?;
    identity.require_owner(post.user_id)?;

    if let Some(url) = req.url {
        if url != post.url && session.posts().url_exists(&url).await? {
            return Err(AppError::Conflict(format!("URL '{}' is already in use", url)));
        }
        post.url = url;
    }
    if let Some(title) = req.title {
        post.title = title;
    }
    if let Some(content) = req.content {
        post.content = content;
    }
    if let Some(description) = req.description {
        post.description = description;
    }
    if req.image.is_some() {
        post.image = req.image;
    }
    if let Some(is_active) = req.is_active {
        post.is_active = is_active;
    }

    match parse_status(req.status.as_deref())? {
        Some(status) => post.transition(status, req.scheduled_publish_time, Utc::now())?,
        // Rescheduling without a status change.
        None if post.status == PostStatus::Scheduled && req.scheduled_publish_time.is_some() => {
            post.transition(PostStatus::Scheduled, req.scheduled_publish_time, Utc::now())?
        }
        None => {}
    }

    session.posts().update(post.clone()).await;
    if let Some(tag_ids) = req.tag_ids {
        ensure_tags_exist(&session, &tag_ids).await?;
        session.posts().set_tags(post.id, tag_ids).await;
    }
    session.commit().await?;

    Ok(HttpResponse::Ok().json(details(&session, post.id).await?))
}

/// DELETE /api/posts/{id}
pub async fn delete(
    session: Session,
    identity: Identity,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let post = get_post(&session, path.into_inner()).await?;
    identity.require_owner(post.user_id)?;

    session.posts().delete(&post).await;
    session.commit().await?;

    tracing::info!(post_id = %post.id, "Post deleted");
    Ok(HttpResponse::NoContent().finish())
}

/// GET /api/users/{id}/posts
pub async fn by_user(
    session: Session,
    viewer: OptionalIdentity,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let posts: Vec<PostResponse> = session
        .posts()
        .get_by_user(path.into_inner())
        .await?
        .into_iter()
        .filter(|p| visible(p, viewer.identity()))
        .map(Into::into)
        .collect();

    Ok(HttpResponse::Ok().json(posts))
}

/// GET /api/tags/{url}/posts
pub async fn by_tag(
    session: Session,
    viewer: OptionalIdentity,
    path: web::Path<String>,
) -> AppResult<HttpResponse> {
    let url = path.into_inner();
    let tag = session
        .tags()
        .get_by_url(&url)
        .await?
        .ok_or_else(|| AppError::not_found("Tag", &url))?;

    let posts: Vec<PostResponse> = session
        .posts()
        .get_by_tag(tag.id)
        .await?
        .into_iter()
        .filter(|p| visible(p, viewer.identity()))
        .map(Into::into)
        .collect();

    Ok(HttpResponse::Ok().json(posts))
}

/// POST /api/posts/{id}/reactions
///
/// Same polarity as the stored reaction removes it; the opposite polarity
/// replaces it.
pub async fn toggle_reaction(
    session: Session,
    identity: Identity,
    path: web::Path<Uuid>,
    body: web::Json<ReactionRequest>,
) -> AppResult<HttpResponse> {
    let post = get_visible_post(&session, path.into_inner(), Some(&identity)).await?;
    let is_like = body.is_like;

    let existing = session
        .posts()
        .get_reaction(post.id, identity.user_id)
        .await?;
    let toggle = ReactionToggle::decide(existing.as_ref().map(|r| r.is_like), is_like);

    if let Some(existing) = existing.as_ref().filter(|_| toggle != ReactionToggle::Add) {
        session.posts().remove_reaction(existing).await?;
    }
    if toggle != ReactionToggle::Remove {
        let reaction = PostReaction::new(post.id, identity.user_id, is_like);
        session.posts().add_reaction(&reaction).await?;
    }

    Ok(HttpResponse::Ok().json(ReactionResponse {
        is_like: (toggle != ReactionToggle::Remove).then_some(is_like),
    }))
}

/// DELETE /api/posts/{id}/reactions
pub async fn remove_reaction(
    session: Session,
    identity: Identity,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let post = get_visible_post(&session, path.into_inner(), Some(&identity)).await?;

    if let Some(existing) = session
        .posts()
        .get_reaction(post.id, identity.user_id)
        .await?
    {
        session.posts().remove_reaction(&existing).await?;
    }

    Ok(HttpResponse::NoContent().finish())
}
