use serde::Deserialize;
use serde::Serialize;

use crate::forms::Field;
use crate::forms::Schema;

use super::Entity;
use super::Kind;

/// A comment on a mood or a blog
///
/// The parent is kept on the stored document, not in the fields
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct Comment {
    pub content: String,
}

impl Entity for Comment {
    const KIND: Kind = Kind::Comment;

    const SCHEMA: Schema = Schema::new(&[Field::text("content", "Comment").required()]);

    const NESTED: bool = true;
}
