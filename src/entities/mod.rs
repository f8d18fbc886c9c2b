//! Entity kinds that users log through forms
//!
//! All kinds share one shape: an author, a modify date and a set of validated fields. The fields
//! are declared once per kind as a [`Schema`](crate::forms::Schema) and a plain serde struct.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDateTime;
use serde::Deserialize;
use serde::Serialize;
use serde::de::DeserializeOwned;
use uuid::Uuid;

use crate::forms::Schema;
use crate::forms::Values;
use crate::storage::Document;

pub use blogs::Blog;
pub use clinics::Clinic;
pub use comments::Comment;
pub use consents::Consent;
pub use moods::Mood;
pub use profiles::Profile;
pub use sleeps::Sleep;

mod blogs;
mod clinics;
mod comments;
mod consents;
mod moods;
mod profiles;
mod sleeps;

/// All entity kinds, each stored in its own collection
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Kind {
    Mood,
    Sleep,
    Blog,
    Comment,
    Clinic,
    Profile,
    Consent,
}

impl Kind {
    /// Singular name, used in routes and messages
    pub fn as_str(self) -> &'static str {
        match self {
            Kind::Mood => "mood",
            Kind::Sleep => "sleep",
            Kind::Blog => "blog",
            Kind::Comment => "comment",
            Kind::Clinic => "clinic",
            Kind::Profile => "profile",
            Kind::Consent => "consent",
        }
    }

    /// Plural name, used for the short list route
    pub fn plural(self) -> &'static str {
        match self {
            Kind::Mood => "moods",
            Kind::Sleep => "sleeps",
            Kind::Blog => "blogs",
            Kind::Comment => "comments",
            Kind::Clinic => "clinics",
            Kind::Profile => "profiles",
            Kind::Consent => "consents",
        }
    }

    /// Capitalized name, used at the start of messages
    pub fn label(self) -> &'static str {
        match self {
            Kind::Mood => "Mood",
            Kind::Sleep => "Sleep",
            Kind::Blog => "Blog",
            Kind::Comment => "Comment",
            Kind::Clinic => "Clinic",
            Kind::Profile => "Profile",
            Kind::Consent => "Consent",
        }
    }

    /// Route to view a single entity of this kind
    pub fn view_path(self, id: &Uuid) -> String {
        format!("/{self}/{id}")
    }

    pub fn new_path(self) -> String {
        format!("/{self}/new")
    }

    pub fn edit_path(self, id: &Uuid) -> String {
        format!("/{self}/edit/{id}")
    }

    /// Route to comment on a single entity of this kind
    pub fn comment_path(self, id: &Uuid) -> String {
        format!("/{self}/{id}/comment/new")
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unknown entity kind
#[derive(Debug)]
pub struct UnknownKind(pub String);

impl fmt::Display for UnknownKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Unknown entity kind: {}", self.0)
    }
}

impl std::error::Error for UnknownKind {}

impl FromStr for Kind {
    type Err = UnknownKind;

    fn from_str(kind: &str) -> Result<Self, Self::Err> {
        [
            Kind::Mood,
            Kind::Sleep,
            Kind::Blog,
            Kind::Comment,
            Kind::Clinic,
            Kind::Profile,
            Kind::Consent,
        ]
        .into_iter()
        .find(|candidate| candidate.as_str() == kind)
        .ok_or_else(|| UnknownKind(kind.to_string()))
    }
}

/// Reference from a child document to the document it belongs to
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct ParentRef {
    pub kind: Kind,
    pub id: Uuid,
}

/// An entity kind with its form
pub trait Entity: Serialize + DeserializeOwned + Clone + fmt::Debug + Send + Sync + 'static {
    /// The kind, also the collection it is stored in
    const KIND: Kind;

    /// The form users fill in
    const SCHEMA: Schema;

    /// Comments can be placed on entities of this kind
    const COMMENTABLE: bool = false;

    /// Only created underneath a parent entity
    const NESTED: bool = false;
}

/// A stored entity with its typed fields
#[derive(Clone, Debug, Serialize)]
pub struct Record<E: Entity> {
    pub id: Uuid,
    pub author: Uuid,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent: Option<ParentRef>,
    pub created_at: NaiveDateTime,
    pub modify_date: NaiveDateTime,
    #[serde(flatten)]
    pub fields: E,
}

impl<E: Entity> Record<E> {
    /// Create a typed record from a stored document
    pub fn from_document(document: Document) -> Result<Self, serde_json::Error> {
        Ok(Self {
            id: document.id,
            author: document.author,
            parent: document.parent,
            created_at: document.created_at,
            modify_date: document.modify_date,
            fields: serde_json::from_value(serde_json::Value::Object(document.fields))?,
        })
    }

    /// Create multiple typed records, keeping their order
    pub fn from_document_multiple(
        documents: Vec<Document>,
    ) -> Result<Vec<Self>, serde_json::Error> {
        documents.into_iter().map(Self::from_document).collect()
    }

    /// Where to send the user after saving this record
    ///
    /// Child records send the user to their parent
    pub fn location(&self) -> String {
        self.parent.map_or_else(
            || E::KIND.view_path(&self.id),
            |parent| parent.kind.view_path(&parent.id),
        )
    }
}

/// Check that validated values fit the entity type
///
/// Catches a schema that disagrees with its struct before anything is stored
pub fn check_values<E: Entity>(values: &Values) -> Result<E, serde_json::Error> {
    serde_json::from_value(serde_json::Value::Object(values.clone()))
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;

    #[test]
    fn test_kind_names() {
        assert_eq!("mood", Kind::Mood.to_string());
        assert_eq!("sleeps", Kind::Sleep.plural());
        assert_eq!(Kind::Blog, "blog".parse::<Kind>().unwrap());
        assert!("moods".parse::<Kind>().is_err());
    }

    #[test]
    fn test_record_location() {
        let parent = ParentRef {
            kind: Kind::Mood,
            id: Uuid::new_v4(),
        };

        let mut fields = Values::new();
        fields.insert("content".to_string(), "hang in there".into());

        let document = Document {
            id: Uuid::new_v4(),
            kind: Kind::Comment,
            author: Uuid::new_v4(),
            parent: Some(parent),
            fields,
            created_at: Utc::now().naive_utc(),
            modify_date: Utc::now().naive_utc(),
            deleted_at: None,
        };

        let comment = Record::<Comment>::from_document(document).unwrap();

        assert_eq!("hang in there", comment.fields.content);
        assert_eq!(format!("/mood/{}", parent.id), comment.location());
    }

    #[test]
    fn test_schemas_match_structs() {
        use crate::forms::to_raw_fields;

        fn roundtrip<E: Entity>(pairs: &[(&str, &str)]) {
            let raw = pairs
                .iter()
                .map(|(name, value)| ((*name).to_string(), (*value).to_string()))
                .collect();

            let values = E::SCHEMA.validate(&raw).unwrap();
            let entity = check_values::<E>(&values).unwrap();

            // stored values pre-fill a form that validates again
            let stored = match serde_json::to_value(&entity).unwrap() {
                serde_json::Value::Object(map) => map,
                _ => unreachable!(),
            };
            assert!(E::SCHEMA.validate(&to_raw_fields(&stored)).is_ok());
        }

        roundtrip::<Mood>(&[
            ("emotion", "Happy"),
            ("activity", "Work"),
            ("description", "good day"),
        ]);
        roundtrip::<Sleep>(&[
            ("rating", "4"),
            ("feel", "3"),
            ("start_time", "22:45"),
            ("sleep_date", "2024-05-01"),
            ("minutes_to_sleep", "20"),
        ]);
        roundtrip::<Blog>(&[
            ("subject", "Exams"),
            ("content", "Studying a lot"),
            ("tag", "school"),
            ("post_mood", "Not Good"),
        ]);
        roundtrip::<Comment>(&[("content", "You got this")]);
        roundtrip::<Clinic>(&[
            ("name", "Campus Health"),
            ("street_address", "1 College Ave"),
            ("city", "Oakland"),
            ("state", "CA"),
            ("zipcode", "94601"),
            ("description", "Walk-in counseling"),
            ("website", "https://health.example.edu"),
        ]);
        roundtrip::<Profile>(&[
            ("role", "Student"),
            ("first_name", "Sam"),
            ("last_name", "Lee"),
            ("phone", "555-0100"),
        ]);
        roundtrip::<Consent>(&[
            ("adult_first_name", "Alex"),
            ("adult_last_name", "Lee"),
            ("adult_email", "alex@example.com"),
            ("consent", "False"),
        ]);
    }
}
