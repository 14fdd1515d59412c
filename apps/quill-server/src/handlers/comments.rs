//! Comment handlers.

use actix_web::{HttpResponse, web};
use uuid::Uuid;
use validator::Validate;

use quill_core::domain::{Comment, CommentReaction, ReactionToggle};
use quill_infra::BlogSession;
use quill_shared::dto::{
    CommentDetailsResponse, CommentResponse, CreateCommentRequest, ReactionRequest,
    ReactionResponse, UpdateCommentRequest,
};

use super::posts::get_visible_post;
use crate::middleware::auth::{Identity, OptionalIdentity};
use crate::middleware::error::{AppError, AppResult};
use crate::middleware::session::Session;

async fn get_comment(session: &BlogSession, id: Uuid) -> AppResult<Comment> {
    session
        .comments()
        .get_by_id(id)
        .await?
        .ok_or_else(|| AppError::not_found("Comment", id))
}

/// GET /api/posts/{id}/comments
pub async fn list_for_post(
    session: Session,
    viewer: OptionalIdentity,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let post_id = path.into_inner();
    get_visible_post(&session, post_id, viewer.identity()).await?;

    let comments: Vec<CommentDetailsResponse> = session
        .comments()
        .get_by_post_with_details(post_id)
        .await?
        .into_iter()
        .filter(|d| d.comment.is_active)
        .map(Into::into)
        .collect();

    Ok(HttpResponse::Ok().json(comments))
}

/// POST /api/posts/{id}/comments
pub async fn create(
    session: Session,
    identity: Identity,
    path: web::Path<Uuid>,
    body: web::Json<CreateCommentRequest>,
) -> AppResult<HttpResponse> {
    let post_id = path.into_inner();
    let req = body.into_inner();
    req.validate()?;

    get_visible_post(&session, post_id, Some(&identity)).await?;

    let mut comment = Comment::new(post_id, identity.user_id, req.content);
    if let Some(parent_id) = req.parent_comment_id {
        let parent = get_comment(&session, parent_id).await?;
        if parent.post_id != post_id {
            return Err(AppError::BadRequest(
                "Replies must belong to the same post as their parent".to_string(),
            ));
        }
        if parent.is_reply() {
            return Err(AppError::BadRequest(
                "Replies cannot be answered; reply to the top-level comment".to_string(),
            ));
        }
        comment = comment.reply_to(parent.id);
    }

    session.comments().add(comment.clone()).await;
    session.commit().await?;

    tracing::debug!(comment_id = %comment.id, post_id = %post_id, "Comment created");
    Ok(HttpResponse::Created().json(CommentResponse::from(comment)))
}

/// GET /api/comments/{id}/replies
pub async fn replies(
    session: Session,
    viewer: OptionalIdentity,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let parent = get_comment(&session, path.into_inner()).await?;
    get_visible_post(&session, parent.post_id, viewer.identity()).await?;

    let replies: Vec<CommentResponse> = session
        .comments()
        .get_replies_by_parent_id(parent.id)
        .await?
        .into_iter()
        .filter(|c| c.is_active)
        .map(Into::into)
        .collect();

    Ok(HttpResponse::Ok().json(replies))
}

/// PUT /api/comments/{id}
pub async fn update(
    session: Session,
    identity: Identity,
    path: web::Path<Uuid>,
    body: web::Json<UpdateCommentRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();
    req.validate()?;

    let mut comment = get_comment(&session, path.into_inner()).await?;
    identity.require_owner(comment.user_id)?;

    comment.content = req.content;
    session.comments().update(comment.clone()).await;
    session.commit().await?;

    Ok(HttpResponse::Ok().json(CommentResponse::from(comment)))
}

/// DELETE /api/comments/{id}
pub async fn delete(
    session: Session,
    identity: Identity,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let comment = get_comment(&session, path.into_inner()).await?;
    identity.require_owner(comment.user_id)?;

    session.comments().delete(&comment).await;
    session.commit().await?;

    Ok(HttpResponse::NoContent().finish())
}

/// POST /api/comments/{id}/reactions
pub async fn toggle_reaction(
    session: Session,
    identity: Identity,
    path: web::Path<Uuid>,
    body: web::Json<ReactionRequest>,
) -> AppResult<HttpResponse> {
    let comment = get_comment(&session, path.into_inner()).await?;
    get_visible_post(&session, comment.post_id, Some(&identity)).await?;
    let is_like = body.is_like;

    let existing = session
        .comments()
        .get_reaction(comment.id, identity.user_id)
        .await?;
    let toggle = ReactionToggle::decide(existing.as_ref().map(|r| r.is_like), is_like);

    if let Some(existing) = existing.as_ref().filter(|_| toggle != ReactionToggle::Add) {
        session.comments().remove_reaction(existing).await?;
    }
    if toggle != ReactionToggle::Remove {
        let reaction = CommentReaction::new(comment.id, identity.user_id, is_like);
        session.comments().add_reaction(&reaction).await?;
    }

    Ok(HttpResponse::Ok().json(ReactionResponse {
        is_like: (toggle != ReactionToggle::Remove).then_some(is_like),
    }))
}

/// DELETE /api/comments/{id}/reactions
pub async fn remove_reaction(
    session: Session,
    identity: Identity,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let comment = get_comment(&session, path.into_inner()).await?;

    if let Some(existing) = session
        .comments()
        .get_reaction(comment.id, identity.user_id)
        .await?
    {
        session.comments().remove_reaction(&existing).await?;
    }

    Ok(HttpResponse::NoContent().finish())
}
