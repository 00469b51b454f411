//! Demo content for a fresh store: a handful of posts from two creators and
//! a marketplace catalogue for one community.

use chrono::{Duration, Utc};
use fanflux_database::basic_db::SafeDatabase;
use fanflux_database::collection::{self, ARTICLES, POSTS};
use tracing::info;

use crate::api::Fanflux;
use crate::error::ServiceResult;
use crate::parser::article::Article;
use crate::parser::post::{Comment, Post};

pub const DEMO_COMMUNITY_ID: &str = "a83fde87-b5b2-415f-8a6b-39f861792e2f";

#[derive(Debug, Default, PartialEq, Eq)]
pub struct SeedReport {
    pub posts: usize,
    pub articles: usize,
}

fn post(id: &str, creator: &str, content: &str, age_ms: i64, likes: &[&str], comments: &[(&str, &str, &str, i64)]) -> Post {
    let now = Utc::now();
    Post {
        id: id.to_string(),
        creator_address: creator.to_string(),
        content: content.to_string(),
        timestamp: now - Duration::milliseconds(age_ms),
        likes: likes.iter().map(|a| a.to_string()).collect(),
        comments: comments
            .iter()
            .map(|(comment_id, user, text, comment_age)| Comment {
                id: comment_id.to_string(),
                post_id: id.to_string(),
                user_address: user.to_string(),
                content: text.to_string(),
                timestamp: now - Duration::milliseconds(*comment_age),
            })
            .collect(),
    }
}

fn demo_posts() -> Vec<Post> {
    vec![
        post(
            "1",
            "0x123",
            "Just launched my new NFT collection! Check it out and let me know what you think. This collection represents my journey in digital art over the past year.",
            3_600_000,
            &["0x456", "0xabc"],
            &[
                ("1", "0x456", "Looks amazing! Can't wait to see more.", 3_500_000),
                ("2", "0xabc", "The colors in this collection are stunning! What inspired you?", 3_400_000),
                ("3", "0x123", "Thanks everyone! The inspiration came from my travels through Southeast Asia last summer.", 3_300_000),
            ],
        ),
        post(
            "2",
            "0x789",
            "Just published a new tutorial on building smart contracts with Cairo! Check it out and let me know if you have any questions. Link in bio.",
            7_200_000,
            &["0x456", "0xabc", "0x123"],
            &[
                ("4", "0x456", "This is exactly what I needed! Been struggling with Cairo for weeks.", 7_100_000),
                ("5", "0xabc", "Great tutorial! Would love to see more content about testing strategies.", 7_000_000),
            ],
        ),
        post(
            "3",
            "0x123",
            "Working on some exciting new pieces for my next collection. Here's a sneak peek at the concept art. What do you think about the direction?",
            86_400_000,
            &["0x789", "0xabc"],
            &[
                ("6", "0x789", "The geometric patterns are fascinating! Are you using any specific algorithms to generate these?", 86_000_000),
                ("7", "0xabc", "This style reminds me of your early work, but with a more refined approach. Love it!", 85_800_000),
                ("8", "0x456", "Can't wait to see the final pieces! Will there be an auction?", 85_600_000),
                ("9", "0x123", "Thanks for the feedback! Yes, I'm using a custom algorithm I developed. And yes, there will be an auction next month!", 85_400_000),
            ],
        ),
        post(
            "4",
            "0x789",
            "Just wrapped up a successful workshop on StarkNet development! Thanks to everyone who participated. The community questions were fantastic. I'll be posting the recording soon.",
            172_800_000,
            &["0x123", "0x456", "0xabc"],
            &[
                ("10", "0x123", "The workshop was incredibly helpful! Learned so much about account abstraction.", 172_000_000),
                ("11", "0x456", "Will you be doing more workshops soon? I missed this one but would love to join the next.", 171_000_000),
                ("12", "0x789", "Yes! Planning another one next month. I'll announce the date soon.", 170_000_000),
            ],
        ),
    ]
}

fn demo_articles() -> Vec<Article> {
    let catalogue = [
        ("1", "Exclusive NFT Collection", "Get access to our exclusive NFT collection featuring unique digital art pieces.", 100, "nft1"),
        ("2", "Premium Workshop Access", "Access to our premium workshop series on digital art creation.", 250, "workshop1"),
        ("3", "Digital Art Masterclass", "Learn advanced techniques in digital art creation.", 150, "masterclass1"),
        ("4", "Community Membership", "Get exclusive access to our community events and discussions.", 75, "membership1"),
        ("5", "Art Tools Bundle", "Premium digital art tools and resources bundle.", 200, "tools1"),
        ("6", "One-on-One Mentoring", "Personal mentoring session with our expert artists.", 300, "mentoring1"),
        ("7", "Art Portfolio Review", "Professional review of your art portfolio.", 125, "portfolio1"),
        ("8", "Digital Art Templates", "Collection of premium digital art templates.", 50, "templates1"),
    ];

    let now = Utc::now();
    catalogue
        .iter()
        .map(|(id, title, description, price, image)| Article {
            id: id.to_string(),
            community_id: DEMO_COMMUNITY_ID.to_string(),
            title: title.to_string(),
            description: description.to_string(),
            content: "Full content here...".to_string(),
            price: *price,
            created_at: now,
            creator_address: "0x123".to_string(),
            image_url: format!("https://picsum.photos/seed/{}/400/400", image),
        })
        .collect()
}

impl<D: SafeDatabase> Fanflux<D> {
    /// Seeds posts and articles, each only when its table is empty.
    pub fn initialize_mock_data(&self) -> ServiceResult<SeedReport> {
        let _guard = self.exclusive()?;
        let mut report = SeedReport::default();
        let mut ops = Vec::new();

        if self.database().read_all(POSTS)?.is_empty() {
            for post in demo_posts() {
                ops.push(collection::put_op(POSTS, &post.id, &post)?);
                report.posts += 1;
            }
        }

        if self.database().read_all(ARTICLES)?.is_empty() {
            for article in demo_articles() {
                ops.push(collection::put_op(ARTICLES, &article.id, &article)?);
                report.articles += 1;
            }
        }

        if !ops.is_empty() {
            self.database().commit(&ops)?;
        }

        info!(posts = report.posts, articles = report.articles, "seeded demo data");
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::test_support::open_store;

    #[test]
    fn test_seed_fills_empty_tables_once() -> Result<(), Box<dyn std::error::Error>> {
        let (_dir, store) = open_store();

        let first = store.initialize_mock_data()?;
        assert_eq!(first, SeedReport { posts: 4, articles: 8 });

        let second = store.initialize_mock_data()?;
        assert_eq!(second, SeedReport::default());

        let posts = store.get_posts()?;
        assert_eq!(posts.len(), 4);
        // oldest first: post 4 is two days old
        assert_eq!(posts[0].id, "4");
        assert_eq!(posts[3].id, "1");
        assert_eq!(store.get_comments("3")?.len(), 4);

        let articles = store.get_community_articles(DEMO_COMMUNITY_ID)?;
        assert_eq!(articles.len(), 8);

        Ok(())
    }

    #[test]
    fn test_seed_keeps_existing_posts() -> Result<(), Box<dyn std::error::Error>> {
        let (_dir, store) = open_store();
        store.register_user("0xc", crate::parser::user::Role::Creator, Default::default())?;
        store.create_post("0xc", "mine")?;

        let report = store.initialize_mock_data()?;
        assert_eq!(report.posts, 0);
        assert_eq!(report.articles, 8);
        assert_eq!(store.get_posts()?.len(), 1);

        Ok(())
    }

    #[test]
    fn test_seeded_interactions_earn_tokens() -> Result<(), Box<dyn std::error::Error>> {
        use crate::parser::token::{NewTokenReward, RewardAmount, RewardRates};
        use crate::parser::user::{Role, UserProfile};

        let (_dir, store) = open_store();
        store.initialize_mock_data()?;
        store.register_user("0x456", Role::Follower, UserProfile::default())?;
        store.create_token_reward(
            "0x123",
            NewTokenReward {
                total_supply: 1000,
                rewards: RewardRates {
                    likes: RewardAmount { amount: 1 },
                    comments: RewardAmount { amount: 5 },
                    followers: RewardAmount { amount: 10 },
                },
            },
        )?;

        // 0x456 liked post 1, commented on posts 1 and 3
        assert_eq!(store.award_tokens("0x456", "0x123")?, 1 + 2 * 5 + 10);

        Ok(())
    }
}
