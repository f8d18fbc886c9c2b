use serde::Deserialize;
use serde::Serialize;

use crate::forms::Field;
use crate::forms::Schema;

use super::Entity;
use super::Kind;

/// Whether a parent or teacher may look at the sleep data of a student
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct Consent {
    pub adult_first_name: String,
    pub adult_last_name: String,
    pub adult_email: String,
    pub consent: bool,
}

impl Entity for Consent {
    const KIND: Kind = Kind::Consent;

    const SCHEMA: Schema = Schema::new(&[
        Field::text("adult_first_name", "First Name").required(),
        Field::text("adult_last_name", "Last Name").required(),
        Field::email("adult_email", "Email").required(),
        Field::boolean(
            "consent",
            "Do you want your parents or teachers to see your sleep data/graph",
        )
        .required(),
    ]);
}
