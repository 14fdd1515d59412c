//! Ranked post and tag lists shown on the home page and sidebars.
//!
//! Every list has the same shape: take the full collection, keep what passes
//! the filter, sort descending by a key, take the first N. Sorting is stable,
//! so entries with equal keys keep their storage order.

use std::cmp::Reverse;

use crate::domain::{PostDetails, Tag, TagDetails};
use crate::error::RepoError;
use crate::ports::{PostRepository, TagRepository};

pub const FEATURED_LIMIT: usize = 6;
pub const LATEST_LIMIT: usize = 3;
pub const NEW_LIMIT: usize = 3;
pub const POPULAR_LIMIT: usize = 3;
pub const TAG_CLOUD_LIMIT: usize = 20;
pub const TAG_HOME_LIMIT: usize = 10;

fn rank<T, K, F, S>(items: Vec<T>, keep: F, key: S, limit: usize) -> Vec<T>
where
    K: Ord,
    F: Fn(&T) -> bool,
    S: Fn(&T) -> K,
{
    let mut items: Vec<T> = items.into_iter().filter(|item| keep(item)).collect();
    items.sort_by_key(|item| Reverse(key(item)));
    items.truncate(limit);
    items
}

/// Live posts weighted towards likes: `likes * 2 + comments`.
pub fn featured(posts: Vec<PostDetails>) -> Vec<PostDetails> {
    rank(
        posts,
        |p| p.post.is_live(),
        |p| p.like_count() * 2 + p.comment_count(),
        FEATURED_LIMIT,
    )
}

/// Most recently published live posts. Undated posts sort last.
pub fn latest(posts: Vec<PostDetails>) -> Vec<PostDetails> {
    rank(
        posts,
        |p| p.post.is_live(),
        |p| p.post.published_on,
        LATEST_LIMIT,
    )
}

/// Most recently created posts regardless of status or activity.
pub fn newest(posts: Vec<PostDetails>) -> Vec<PostDetails> {
    rank(posts, |_| true, |p| p.post.created_at, NEW_LIMIT)
}

/// Live posts by `likes + comments`.
pub fn popular(posts: Vec<PostDetails>) -> Vec<PostDetails> {
    rank(
        posts,
        |p| p.post.is_live(),
        |p| p.like_count() + p.comment_count(),
        POPULAR_LIMIT,
    )
}

pub fn tag_cloud(tags: Vec<TagDetails>) -> Vec<TagDetails> {
    rank(tags, |t| t.tag.is_active, TagDetails::post_count, TAG_CLOUD_LIMIT)
}

pub fn tag_home(tags: Vec<TagDetails>) -> Vec<TagDetails> {
    rank(tags, |t| t.tag.is_active, TagDetails::post_count, TAG_HOME_LIMIT)
}

/// Builds the ranked lists from a session's repositories.
pub struct ListBuilder<'a> {
    posts: &'a dyn PostRepository,
    tags: &'a dyn TagRepository,
}

impl<'a> ListBuilder<'a> {
    pub fn new(posts: &'a dyn PostRepository, tags: &'a dyn TagRepository) -> Self {
        Self { posts, tags }
    }

    pub async fn featured_posts(&self) -> Result<Vec<PostDetails>, RepoError> {
        Ok(featured(self.posts.get_all_with_details().await?))
    }

    pub async fn latest_posts(&self) -> Result<Vec<PostDetails>, RepoError> {
        Ok(latest(self.posts.get_all_with_details().await?))
    }

    pub async fn new_posts(&self) -> Result<Vec<PostDetails>, RepoError> {
        Ok(newest(self.posts.get_all_with_details().await?))
    }

    pub async fn popular_posts(&self) -> Result<Vec<PostDetails>, RepoError> {
        Ok(popular(self.posts.get_all_with_details().await?))
    }

    pub async fn tag_cloud(&self) -> Result<Vec<TagDetails>, RepoError> {
        Ok(tag_cloud(self.tags.get_all_with_posts().await?))
    }

    pub async fn tag_home(&self) -> Result<Vec<TagDetails>, RepoError> {
        Ok(tag_home(self.tags.get_all_with_posts().await?))
    }

    /// Every tag in storage order, unfiltered.
    pub async fn tag_menu(&self) -> Result<Vec<Tag>, RepoError> {
        self.tags.get_all().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Comment, Post, PostReaction, PostStatus};
    use chrono::{DateTime, TimeDelta, Utc};
    use uuid::Uuid;

    fn post(title: &str, status: PostStatus, active: bool) -> Post {
        let mut post = Post::new(
            Uuid::new_v4(),
            title.to_string(),
            "content".to_string(),
            "description".to_string(),
            title.to_lowercase(),
        );
        post.status = status;
        post.is_active = active;
        if status == PostStatus::Published {
            post.published_on = Some(post.created_at);
        }
        post
    }

    fn details(post: Post, likes: usize, comments: usize) -> PostDetails {
        let reactions = (0..likes)
            .map(|_| PostReaction::new(post.id, Uuid::new_v4(), true))
            .collect();
        let comments = (0..comments)
            .map(|_| Comment::new(post.id, Uuid::new_v4(), "hi".to_string()))
            .collect();
        PostDetails {
            post,
            author: None,
            tags: Vec::new(),
            comments,
            reactions,
        }
    }

    fn titles(list: &[PostDetails]) -> Vec<&str> {
        list.iter().map(|d| d.post.title.as_str()).collect()
    }

    fn at(minutes: i64) -> DateTime<Utc> {
        DateTime::<Utc>::from_timestamp(1_700_000_000, 0).unwrap() + TimeDelta::minutes(minutes)
    }

    #[test]
    fn test_featured_orders_by_weighted_score() {
        let posts = vec![
            details(post("Six", PostStatus::Published, true), 2, 2),
            details(post("Eleven", PostStatus::Published, true), 5, 1),
            details(post("Ten", PostStatus::Published, true), 0, 10),
        ];

        let ranked = featured(posts);
        assert_eq!(titles(&ranked), vec!["Eleven", "Ten", "Six"]);
    }

    #[test]
    fn test_featured_excludes_unpublished_and_inactive() {
        let posts = vec![
            details(post("Draft", PostStatus::Draft, true), 50, 50),
            details(post("Hidden", PostStatus::Published, false), 50, 50),
            details(post("Archived", PostStatus::Archived, true), 50, 50),
            details(post("Live", PostStatus::Published, true), 0, 0),
        ];

        let ranked = featured(posts);
        assert_eq!(titles(&ranked), vec!["Live"]);
    }

    #[test]
    fn test_featured_takes_six() {
        let posts = (0..10)
            .map(|i| details(post(&format!("P{i}"), PostStatus::Published, true), i, 0))
            .collect();

        let ranked = featured(posts);
        assert_eq!(ranked.len(), FEATURED_LIMIT);
        assert_eq!(ranked[0].post.title, "P9");
    }

    #[test]
    fn test_latest_puts_undated_last() {
        let mut undated = post("Undated", PostStatus::Published, true);
        undated.published_on = None;
        let mut old = post("Old", PostStatus::Published, true);
        old.published_on = Some(at(0));
        let mut newer = post("Newer", PostStatus::Published, true);
        newer.published_on = Some(at(10));
        let mut newest_post = post("Newest", PostStatus::Published, true);
        newest_post.published_on = Some(at(20));

        let posts = vec![
            details(undated, 0, 0),
            details(old, 0, 0),
            details(newest_post, 0, 0),
            details(newer, 0, 0),
        ];

        let ranked = latest(posts);
        assert_eq!(titles(&ranked), vec!["Newest", "Newer", "Old"]);
    }

    #[test]
    fn test_latest_undated_only_fills_remaining_slots() {
        let mut undated = post("Undated", PostStatus::Published, true);
        undated.published_on = None;
        let mut dated = post("Dated", PostStatus::Published, true);
        dated.published_on = Some(at(0));

        let ranked = latest(vec![details(undated, 0, 0), details(dated, 0, 0)]);
        assert_eq!(titles(&ranked), vec!["Dated", "Undated"]);
    }

    #[test]
    fn test_newest_ignores_status_and_activity() {
        let mut a = post("Draft", PostStatus::Draft, false);
        a.created_at = at(30);
        let mut b = post("Published", PostStatus::Published, true);
        b.created_at = at(10);
        let mut c = post("Archived", PostStatus::Archived, true);
        c.created_at = at(20);
        let mut d = post("Oldest", PostStatus::Published, true);
        d.created_at = at(0);

        let ranked = newest(vec![
            details(b, 0, 0),
            details(d, 0, 0),
            details(a, 0, 0),
            details(c, 0, 0),
        ]);
        assert_eq!(titles(&ranked), vec!["Draft", "Archived", "Published"]);
    }

    #[test]
    fn test_popular_uses_unweighted_sum() {
        let posts = vec![
            details(post("Likes", PostStatus::Published, true), 4, 0),
            details(post("Comments", PostStatus::Published, true), 0, 5),
            details(post("Quiet", PostStatus::Published, true), 1, 0),
            details(post("Mixed", PostStatus::Published, true), 1, 2),
        ];

        let ranked = popular(posts);
        assert_eq!(titles(&ranked), vec!["Comments", "Likes", "Mixed"]);
    }

    #[test]
    fn test_ties_keep_storage_order() {
        let posts = vec![
            details(post("First", PostStatus::Published, true), 1, 1),
            details(post("Second", PostStatus::Published, true), 1, 1),
            details(post("Third", PostStatus::Published, true), 1, 1),
        ];

        assert_eq!(titles(&featured(posts.clone())), vec!["First", "Second", "Third"]);
        assert_eq!(titles(&popular(posts)), vec!["First", "Second", "Third"]);
    }

    fn tag(name: &str, active: bool, posts: usize) -> TagDetails {
        let mut tag = Tag::new(name.to_string(), name.to_lowercase(), None);
        tag.is_active = active;
        TagDetails {
            tag,
            post_ids: (0..posts).map(|_| Uuid::new_v4()).collect(),
        }
    }

    #[test]
    fn test_tag_cloud_filters_and_sorts_by_post_count() {
        let tags = vec![
            tag("Rust", true, 3),
            tag("Hidden", false, 100),
            tag("Go", true, 7),
            tag("Zig", true, 0),
        ];

        let ranked = tag_cloud(tags);
        let names: Vec<&str> = ranked.iter().map(|t| t.tag.name.as_str()).collect();
        assert_eq!(names, vec!["Go", "Rust", "Zig"]);
    }

    #[test]
    fn test_tag_limits() {
        let tags: Vec<TagDetails> = (0..30).map(|i| tag(&format!("T{i}"), true, i)).collect();

        assert_eq!(tag_cloud(tags.clone()).len(), TAG_CLOUD_LIMIT);
        let home = tag_home(tags);
        assert_eq!(home.len(), TAG_HOME_LIMIT);
        assert_eq!(home[0].tag.name, "T29");
    }
}
