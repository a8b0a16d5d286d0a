//! Seeded fixture data
//!
//! Five users, six posts about football transfers, and two comments each
//! for posts 1-4. Posts 5 and 6 have no comments.

use super::{DataSource, SourceError};
use crate::model::{Comment, Post, User};
use async_trait::async_trait;

/// Data source returning the hardcoded seed dataset
#[derive(Debug, Clone)]
pub struct FixtureSource {
    users: Vec<User>,
    posts: Vec<Post>,
    comments: Vec<Comment>,
}

impl FixtureSource {
    pub fn new() -> Self {
        Self {
            users: seed_users(),
            posts: seed_posts(),
            comments: seed_comments(),
        }
    }
}

impl Default for FixtureSource {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DataSource for FixtureSource {
    fn name(&self) -> &str {
        "fixture"
    }

    async fn fetch_users(&self) -> Result<Vec<User>, SourceError> {
        Ok(self.users.clone())
    }

    async fn fetch_posts(&self) -> Result<Vec<Post>, SourceError> {
        Ok(self.posts.clone())
    }

    async fn fetch_comments(&self, post_id: i64) -> Result<Vec<Comment>, SourceError> {
        Ok(self
            .comments
            .iter()
            .filter(|c| c.post_id == post_id)
            .cloned()
            .collect())
    }

    async fn fetch_all_comments(&self) -> Result<Vec<Comment>, SourceError> {
        Ok(self.comments.clone())
    }
}

fn seed_users() -> Vec<User> {
    vec![
        User::new(1, "Youssef Eldesouky", "youssef.eldesouky@example.com", "+20 100 111 2222", "Cairo"),
        User::new(2, "Ahmed Hassan", "ahmed.hassan@example.com", "+20 122 333 4444", "Alexandria"),
        User::new(3, "Mohamed Samir", "mohamed.samir@example.com", "+20 111 222 3333", "Giza"),
        User::new(4, "Karim Mostafa", "karim.mostafa@example.com", "+20 155 666 7777", "Mansoura"),
        User::new(5, "Omar Nader", "omar.nader@example.com", "+20 199 888 0000", "Tanta"),
    ]
}

fn seed_posts() -> Vec<Post> {
    vec![
        Post::new(
            1,
            1,
            "Zamalek signs promising striker",
            "Zamalek announced the signing of a young striker on a three-year deal. Fans expect him to add pace and finishing to the frontline.",
        ),
        Post::new(
            2,
            2,
            "Al Ahly close to midfield maestro",
            "Al Ahly reportedly reached an agreement to bring a creative midfielder expected to strengthen control in the midfield.",
        ),
        Post::new(
            3,
            3,
            "Egyptian defender moves to Europe",
            "An Egyptian national team defender has completed a transfer to a Portuguese club, aiming to take the next step in his career.",
        ),
        Post::new(
            4,
            4,
            "Local club signs veteran goalkeeper",
            "A veteran goalkeeper has joined a premier league side to bolster experience and leadership at the back.",
        ),
        Post::new(
            5,
            5,
            "Summer transfer round-up: rumors and deals",
            "A quick roundup of the summer window covering regional moves, loan deals, and a few surprise signings.",
        ),
        Post::new(
            1,
            6,
            "Youth academy talent promoted to first team",
            "A talented academy forward is promoted to the first team after impressive performances in preseason.",
        ),
    ]
}

fn comment(post_id: i64, id: i64, name: &str, email: &str, body: &str) -> Comment {
    Comment {
        post_id,
        id,
        name: name.to_string(),
        email: email.to_string(),
        body: body.to_string(),
    }
}

fn seed_comments() -> Vec<Comment> {
    vec![
        comment(1, 1, "Fatma Ali", "fatma.ali@example.com", "Welcome to the team! Can't wait to see him score."),
        comment(1, 2, "Hassan Ibrahim", "hassan.ibr@example.com", "Good signing — needs time to adapt to the league."),
        comment(2, 3, "Sara Mostafa", "sara.mos@example.com", "If he joins, midfield will look much stronger."),
        comment(2, 4, "Mahmoud Tarek", "mahmoud.trk@example.com", "Hope the deal goes through — can't wait for derby matches."),
        comment(3, 5, "Laila Hany", "laila.hany@example.com", "Fantastic move — great for his development."),
        comment(3, 6, "Amr Galal", "amr.gal@example.com", "Portugal is a good stepping stone for African players."),
        comment(4, 7, "Noura Sami", "noura.sami@example.com", "Veteran presence will calm the defense."),
        comment(4, 8, "Khaled Omar", "khaled.omr@example.com", "Experience is priceless, great pickup."),
    ]
}
