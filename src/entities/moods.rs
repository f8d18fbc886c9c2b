use serde::Deserialize;
use serde::Serialize;

use crate::forms::Field;
use crate::forms::Schema;

use super::Entity;
use super::Kind;

const EMOTIONS: &[&str] = &["Furious", "Depressed", "Stressed", "Sad", "OK", "Happy"];
const ACTIVITIES: &[&str] = &["Family", "Friend", "Work", "Study", "Relationship"];

/// How a user felt, and what they were doing at the time
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct Mood {
    pub emotion: String,
    pub activity: String,
    pub description: String,
}

impl Entity for Mood {
    const KIND: Kind = Kind::Mood;

    const SCHEMA: Schema = Schema::new(&[
        Field::choice("emotion", "Emotion", EMOTIONS).required(),
        Field::choice("activity", "Activity", ACTIVITIES).required(),
        Field::text("description", "Description").required(),
    ]);

    const COMMENTABLE: bool = true;
}
