//! Post repository, including the post-tag association and post reactions.

use std::collections::{BTreeSet, HashMap};

use async_trait::async_trait;
use sea_orm::sea_query::{Expr, Func, LikeExpr, SimpleExpr};
use sea_orm::{
    ColumnTrait, Condition, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect,
};
use uuid::Uuid;

use quill_core::domain::{Comment, Post, PostDetails, PostReaction, Tag, User};
use quill_core::error::RepoError;
use quill_core::ports::{Change, PostRepository, UnitOfWork};

use super::base::SeaRepository;
use super::context::repo_error;
use super::entity::post::{self, Entity as PostEntity};
use super::entity::{comment, post_reaction, post_tag, tag, user};

/// SeaORM post repository.
pub type SeaPostRepository = SeaRepository<PostEntity>;

/// `lower(column) LIKE pattern ESCAPE '\'`, with `pattern` already lowercased.
fn lower_like(column: post::Column, pattern: &str) -> SimpleExpr {
    Expr::expr(Func::lower(Expr::col(column))).like(LikeExpr::new(pattern).escape('\\'))
}

/// Substring pattern matching `term` literally.
fn contains_pattern(term: &str) -> String {
    let mut pattern = String::with_capacity(term.len() + 2);
    pattern.push('%');
    for c in term.chars() {
        if matches!(c, '\\' | '%' | '_') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

/// Case-insensitive substring match over the searchable fields.
fn matches_term(post: &Post, term: &str) -> bool {
    [&post.title, &post.content, &post.description]
        .iter()
        .any(|field| field.to_lowercase().contains(term))
}

impl SeaPostRepository {
    /// Attach authors, tags, comments and reactions to a batch of posts.
    async fn with_details(&self, posts: Vec<post::Model>) -> Result<Vec<PostDetails>, RepoError> {
        if posts.is_empty() {
            return Ok(Vec::new());
        }
        let db = self.db();
        let post_ids: Vec<Uuid> = posts.iter().map(|p| p.id).collect();
        let author_ids: BTreeSet<Uuid> = posts.iter().map(|p| p.user_id).collect();

        let authors: HashMap<Uuid, User> = user::Entity::find()
            .filter(user::Column::Id.is_in(author_ids))
            .all(db)
            .await
            .map_err(repo_error)?
            .into_iter()
            .map(|m| (m.id, User::from(m)))
            .collect();

        let links = post_tag::Entity::find()
            .filter(post_tag::Column::PostId.is_in(post_ids.clone()))
            .all(db)
            .await
            .map_err(repo_error)?;
        let tag_ids: BTreeSet<Uuid> = links.iter().map(|l| l.tag_id).collect();
        let tags: HashMap<Uuid, Tag> = tag::Entity::find()
            .filter(tag::Column::Id.is_in(tag_ids))
            .all(db)
            .await
            .map_err(repo_error)?
            .into_iter()
            .map(|m| (m.id, Tag::from(m)))
            .collect();
        let mut tags_by_post: HashMap<Uuid, Vec<Tag>> = HashMap::new();
        for link in links {
            if let Some(tag) = tags.get(&link.tag_id) {
                tags_by_post
                    .entry(link.post_id)
                    .or_default()
                    .push(tag.clone());
            }
        }

        let mut comments_by_post: HashMap<Uuid, Vec<Comment>> = HashMap::new();
        for model in comment::Entity::find()
            .filter(comment::Column::PostId.is_in(post_ids.clone()))
            .order_by_asc(comment::Column::CreatedAt)
            .all(db)
            .await
            .map_err(repo_error)?
        {
            comments_by_post
                .entry(model.post_id)
                .or_default()
                .push(model.into());
        }

        let mut reactions_by_post: HashMap<Uuid, Vec<PostReaction>> = HashMap::new();
        for model in post_reaction::Entity::find()
            .filter(post_reaction::Column::PostId.is_in(post_ids))
            .all(db)
            .await
            .map_err(repo_error)?
        {
            reactions_by_post
                .entry(model.post_id)
                .or_default()
                .push(model.into());
        }

        Ok(posts
            .into_iter()
            .map(|model| {
                let post: Post = model.into();
                let mut tags = tags_by_post.remove(&post.id).unwrap_or_default();
                tags.sort_by(|a, b| a.name.cmp(&b.name));
                // Authors may own several posts in the batch.
                let author = authors.get(&post.user_id).cloned();
                PostDetails {
                    author,
                    tags,
                    comments: comments_by_post.remove(&post.id).unwrap_or_default(),
                    reactions: reactions_by_post.remove(&post.id).unwrap_or_default(),
                    post,
                }
            })
            .collect())
    }
}

#[async_trait]
impl PostRepository for SeaPostRepository {
    async fn get_by_url(&self, url: &str) -> Result<Option<Post>, RepoError> {
        let result = PostEntity::find()
            .filter(post::Column::Url.eq(url))
            .one(self.db())
            .await
            .map_err(repo_error)?;

        Ok(result.map(Into::into))
    }

    async fn get_by_id_with_details(&self, id: Uuid) -> Result<Option<PostDetails>, RepoError> {
        let Some(model) = PostEntity::find_by_id(id)
            .one(self.db())
            .await
            .map_err(repo_error)?
        else {
            return Ok(None);
        };

        Ok(self.with_details(vec![model]).await?.pop())
    }

    async fn get_by_url_with_details(
        &self,
        url: &str,
    ) -> Result<Option<PostDetails>, RepoError> {
        let Some(model) = PostEntity::find()
            .filter(post::Column::Url.eq(url))
            .one(self.db())
            .await
            .map_err(repo_error)?
        else {
            return Ok(None);
        };

        Ok(self.with_details(vec![model]).await?.pop())
    }

    async fn get_all_with_details(&self) -> Result<Vec<PostDetails>, RepoError> {
        let posts = PostEntity::find()
            .all(self.db())
            .await
            .map_err(repo_error)?;

        self.with_details(posts).await
    }

    async fn get_by_user(&self, user_id: Uuid) -> Result<Vec<Post>, RepoError> {
        let result = PostEntity::find()
            .filter(post::Column::UserId.eq(user_id))
            .order_by_desc(post::Column::CreatedAt)
            .all(self.db())
            .await
            .map_err(repo_error)?;

        Ok(result.into_iter().map(Into::into).collect())
    }

    async fn get_by_tag(&self, tag_id: Uuid) -> Result<Vec<Post>, RepoError> {
        let result = PostEntity::find()
            .inner_join(tag::Entity)
            .filter(tag::Column::Id.eq(tag_id))
            .order_by_desc(post::Column::CreatedAt)
            .all(self.db())
            .await
            .map_err(repo_error)?;

        Ok(result.into_iter().map(Into::into).collect())
    }

    async fn search(&self, term: &str) -> Result<Vec<Post>, RepoError> {
        let term = term.trim();
        if term.is_empty() {
            return Ok(Vec::new());
        }
        let term = term.to_lowercase();
        tracing::debug!(term = %term, "Searching posts");

        let mut query = PostEntity::find().order_by_desc(post::Column::CreatedAt);
        // SQLite's lower() only folds ASCII, so non-ASCII terms are matched
        // in memory against every post.
        if term.is_ascii() {
            let pattern = contains_pattern(&term);
            query = query.filter(
                Condition::any()
                    .add(lower_like(post::Column::Title, &pattern))
                    .add(lower_like(post::Column::Content, &pattern))
                    .add(lower_like(post::Column::Description, &pattern)),
            );
        }

        let result = query.all(self.db()).await.map_err(repo_error)?;

        Ok(result
            .into_iter()
            .map(Post::from)
            .filter(|post| matches_term(post, &term))
            .collect())
    }

    async fn url_exists(&self, url: &str) -> Result<bool, RepoError> {
        let count = PostEntity::find()
            .filter(post::Column::Url.eq(url))
            .count(self.db())
            .await
            .map_err(repo_error)?;

        Ok(count > 0)
    }

    async fn set_tags(&self, post_id: Uuid, tag_ids: Vec<Uuid>) {
        self.context
            .stage(Change::SetPostTags { post_id, tag_ids })
            .await;
    }

    async fn get_reaction(
        &self,
        post_id: Uuid,
        user_id: Uuid,
    ) -> Result<Option<PostReaction>, RepoError> {
        let result = post_reaction::Entity::find()
            .filter(post_reaction::Column::PostId.eq(post_id))
            .filter(post_reaction::Column::UserId.eq(user_id))
            .one(self.db())
            .await
            .map_err(repo_error)?;

        Ok(result.map(Into::into))
    }

    async fn add_reaction(&self, reaction: &PostReaction) -> Result<(), RepoError> {
        post_reaction::Entity::insert(post_reaction::ActiveModel::from(reaction.clone()))
            .exec_without_returning(self.db())
            .await
            .map_err(repo_error)?;

        tracing::debug!(
            post_id = %reaction.post_id,
            user_id = %reaction.user_id,
            is_like = reaction.is_like,
            "Post reaction added"
        );
        Ok(())
    }

    async fn remove_reaction(&self, reaction: &PostReaction) -> Result<(), RepoError> {
        let result = post_reaction::Entity::delete_by_id(reaction.id)
            .exec(self.db())
            .await
            .map_err(repo_error)?;

        tracing::debug!(
            post_id = %reaction.post_id,
            user_id = %reaction.user_id,
            removed = result.rows_affected,
            "Post reaction removed"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::contains_pattern;

    #[test]
    fn test_contains_pattern_escapes_wildcards() {
        assert_eq!(contains_pattern("rust"), "%rust%");
        assert_eq!(contains_pattern("100%"), "%100\\%%");
        assert_eq!(contains_pattern("a_b\\c"), "%a\\_b\\\\c%");
    }
}
