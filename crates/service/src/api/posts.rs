use std::collections::HashMap;

use fanflux_database::basic_db::SafeDatabase;
use fanflux_database::collection::{self, POSTS};
use tracing::{debug, info};

use super::{new_id, now, validate_content, Fanflux};
use crate::error::{ServiceError, ServiceResult};
use crate::parser::post::{Comment, FeedComment, FeedPost, Post};
use crate::parser::user::Role;

const UNKNOWN_CREATOR: &str = "Unknown Creator";
const UNKNOWN_USER: &str = "Unknown User";

impl<D: SafeDatabase> Fanflux<D> {
    pub fn create_post(&self, creator_address: &str, content: &str) -> ServiceResult<Post> {
        validate_content(content)?;
        let _guard = self.exclusive()?;

        let is_creator = self
            .get_user(creator_address)?
            .map(|u| u.role == Role::Creator)
            .unwrap_or(false);
        if !is_creator {
            return Err(ServiceError::NotFound("Creator not found".to_string()));
        }

        let post = Post {
            id: new_id(),
            creator_address: creator_address.to_string(),
            content: content.to_string(),
            timestamp: now(),
            likes: Vec::new(),
            comments: Vec::new(),
        };
        collection::save(&self.db, POSTS, &post.id, &post)?;

        info!(post = %post.id, creator = creator_address, "created post");
        Ok(post)
    }

    /// All posts, oldest first.
    pub fn get_posts(&self) -> ServiceResult<Vec<Post>> {
        let mut posts: Vec<Post> = collection::load_all(&self.db, POSTS)?;
        posts.sort_by(|a, b| a.timestamp.cmp(&b.timestamp).then_with(|| a.id.cmp(&b.id)));
        Ok(posts)
    }

    pub fn get_creator_posts(&self, creator_address: &str) -> ServiceResult<Vec<Post>> {
        Ok(self
            .get_posts()?
            .into_iter()
            .filter(|p| p.creator_address == creator_address)
            .collect())
    }

    /// Newest first, with creator and commenter names resolved.
    pub fn get_feed(&self) -> ServiceResult<Vec<FeedPost>> {
        let names: HashMap<String, String> = self
            .all_users()?
            .into_iter()
            .map(|u| (u.wallet_address, u.name))
            .collect();
        let name_of = |address: &str, fallback: &str| {
            names
                .get(address)
                .cloned()
                .unwrap_or_else(|| fallback.to_string())
        };

        let mut posts = self.get_posts()?;
        posts.reverse();

        Ok(posts
            .into_iter()
            .map(|post| FeedPost {
                creator_name: name_of(&post.creator_address, UNKNOWN_CREATOR),
                comments: post
                    .comments
                    .into_iter()
                    .map(|comment| FeedComment {
                        user_name: name_of(&comment.user_address, UNKNOWN_USER),
                        comment,
                    })
                    .collect(),
                id: post.id,
                creator_address: post.creator_address,
                content: post.content,
                timestamp: post.timestamp,
                likes: post.likes,
            })
            .collect())
    }

    /// Likes the post, or removes the like if `user_address` already liked it.
    pub fn toggle_like(&self, post_id: &str, user_address: &str) -> ServiceResult<Post> {
        let _guard = self.exclusive()?;

        let mut post = self.load_post(post_id)?;
        match post.likes.iter().position(|a| a == user_address) {
            Some(index) => {
                post.likes.remove(index);
            }
            None => post.likes.push(user_address.to_string()),
        }
        collection::save(&self.db, POSTS, post_id, &post)?;

        debug!(post = post_id, address = user_address, likes = post.likes.len(), "toggled like");
        Ok(post)
    }

    pub fn add_comment(&self, post_id: &str, user_address: &str, content: &str) -> ServiceResult<Comment> {
        validate_content(content)?;
        let _guard = self.exclusive()?;

        let mut post = self.load_post(post_id)?;
        let comment = Comment {
            id: new_id(),
            post_id: post_id.to_string(),
            user_address: user_address.to_string(),
            content: content.to_string(),
            timestamp: now(),
        };
        post.comments.push(comment.clone());
        collection::save(&self.db, POSTS, post_id, &post)?;

        debug!(post = post_id, address = user_address, "added comment");
        Ok(comment)
    }

    pub fn get_comments(&self, post_id: &str) -> ServiceResult<Vec<Comment>> {
        Ok(collection::load::<Post, _>(&self.db, POSTS, post_id)?
            .map(|p| p.comments)
            .unwrap_or_default())
    }

    fn load_post(&self, post_id: &str) -> ServiceResult<Post> {
        collection::load(&self.db, POSTS, post_id)?
            .ok_or_else(|| ServiceError::NotFound("Post not found".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::test_support::{open_store, tick};
    use crate::api::MAX_CONTENT_LEN;
    use crate::parser::user::UserProfile;

    fn named(name: &str) -> UserProfile {
        UserProfile {
            name: name.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_create_post_requires_creator() {
        let (_dir, store) = open_store();
        store.register_user("0xfan", Role::Follower, UserProfile::default()).unwrap();

        for address in ["0xfan", "0xnobody"] {
            match store.create_post(address, "hello") {
                Err(ServiceError::NotFound(msg)) => assert_eq!(msg, "Creator not found"),
                other => panic!("unexpected result: {:?}", other),
            }
        }
    }

    #[test]
    fn test_create_post_validates_content() {
        let (_dir, store) = open_store();
        store.register_user("0xc", Role::Creator, UserProfile::default()).unwrap();

        assert!(matches!(store.create_post("0xc", ""), Err(ServiceError::Validation(_))));
        let oversized = "x".repeat(MAX_CONTENT_LEN + 1);
        assert!(matches!(store.create_post("0xc", &oversized), Err(ServiceError::Validation(_))));
    }

    #[test]
    fn test_posts_listing_and_creator_filter() {
        let (_dir, store) = open_store();
        store.register_user("0xa", Role::Creator, UserProfile::default()).unwrap();
        store.register_user("0xb", Role::Creator, UserProfile::default()).unwrap();

        let first = store.create_post("0xa", "first").unwrap();
        tick();
        let second = store.create_post("0xb", "second").unwrap();
        tick();
        let third = store.create_post("0xa", "third").unwrap();

        let ids: Vec<String> = store.get_posts().unwrap().into_iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![first.id.clone(), second.id, third.id.clone()]);

        let mine: Vec<String> = store.get_creator_posts("0xa").unwrap().into_iter().map(|p| p.id).collect();
        assert_eq!(mine, vec![first.id, third.id]);
    }

    #[test]
    fn test_toggle_like() {
        let (_dir, store) = open_store();
        store.register_user("0xc", Role::Creator, UserProfile::default()).unwrap();
        let post = store.create_post("0xc", "like me").unwrap();

        let liked = store.toggle_like(&post.id, "0xfan").unwrap();
        assert_eq!(liked.likes, vec!["0xfan".to_string()]);

        let other = store.toggle_like(&post.id, "0xother").unwrap();
        assert_eq!(other.likes.len(), 2);

        let unliked = store.toggle_like(&post.id, "0xfan").unwrap();
        assert_eq!(unliked.likes, vec!["0xother".to_string()]);

        match store.toggle_like("missing", "0xfan") {
            Err(ServiceError::NotFound(msg)) => assert_eq!(msg, "Post not found"),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_comments() {
        let (_dir, store) = open_store();
        store.register_user("0xc", Role::Creator, UserProfile::default()).unwrap();
        let post = store.create_post("0xc", "discuss").unwrap();

        let first = store.add_comment(&post.id, "0xfan", "nice").unwrap();
        let second = store.add_comment(&post.id, "0xc", "thanks").unwrap();
        assert_eq!(first.post_id, post.id);

        let comments = store.get_comments(&post.id).unwrap();
        assert_eq!(comments, vec![first, second]);

        assert!(store.get_comments("missing").unwrap().is_empty());
        assert!(matches!(
            store.add_comment("missing", "0xfan", "hello"),
            Err(ServiceError::NotFound(_))
        ));
    }

    #[test]
    fn test_feed_resolves_names() {
        let (_dir, store) = open_store();
        store.register_user("0xc", Role::Creator, named("Carol")).unwrap();
        store.register_user("0xf", Role::Follower, named("Frank")).unwrap();

        let older = store.create_post("0xc", "older").unwrap();
        tick();
        let newer = store.create_post("0xc", "newer").unwrap();
        store.add_comment(&older.id, "0xf", "hi").unwrap();
        store.add_comment(&older.id, "0xghost", "boo").unwrap();

        let feed = store.get_feed().unwrap();
        assert_eq!(feed.len(), 2);
        assert_eq!(feed[0].id, newer.id);
        assert_eq!(feed[1].id, older.id);
        assert_eq!(feed[1].creator_name, "Carol");
        assert_eq!(feed[1].comments[0].user_name, "Frank");
        assert_eq!(feed[1].comments[1].user_name, UNKNOWN_USER);
    }
}
