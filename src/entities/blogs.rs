use serde::Deserialize;
use serde::Serialize;

use crate::forms::Field;
use crate::forms::Schema;

use super::Entity;
use super::Kind;

const POST_MOODS: &[&str] = &["Terrible", "Not Good", "Ok", "Good", "Amazing"];

/// A blog post, open for comments
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct Blog {
    pub subject: String,
    pub content: String,
    pub tag: String,

    /// Mood of the author at the time of writing
    pub post_mood: String,
}

impl Entity for Blog {
    const KIND: Kind = Kind::Blog;

    const SCHEMA: Schema = Schema::new(&[
        Field::text("subject", "Subject").required(),
        Field::text("content", "Blog").required(),
        Field::text("tag", "Tag").required(),
        Field::choice("post_mood", "What is your mood for today?", POST_MOODS).required(),
    ]);

    const COMMENTABLE: bool = true;
}
