use serde::Deserialize;
use serde::Serialize;

use crate::forms::Field;
use crate::forms::Schema;

use super::Entity;
use super::Kind;

const ROLES: &[&str] = &["Teacher", "Student"];

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct Profile {
    pub role: String,
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
}

impl Entity for Profile {
    const KIND: Kind = Kind::Profile;

    const SCHEMA: Schema = Schema::new(&[
        Field::choice("role", "Role", ROLES).required(),
        Field::text("first_name", "First Name").required(),
        Field::text("last_name", "Last Name").required(),
        Field::text("phone", "Phone").required(),
    ]);
}
