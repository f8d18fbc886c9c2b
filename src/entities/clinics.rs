use serde::Deserialize;
use serde::Serialize;

use crate::forms::Field;
use crate::forms::Schema;

use super::Entity;
use super::Kind;

/// A place students can go to for help
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct Clinic {
    pub name: String,
    pub street_address: String,
    pub city: String,
    pub state: String,
    pub zipcode: String,
    pub description: String,
    pub website: Option<String>,
}

impl Entity for Clinic {
    const KIND: Kind = Kind::Clinic;

    const SCHEMA: Schema = Schema::new(&[
        Field::text("name", "Name").required(),
        Field::text("street_address", "Address").required(),
        Field::text("city", "City").required(),
        Field::text("state", "State").required(),
        Field::text("zipcode", "Zipcode").required(),
        Field::text("description", "Description").required(),
        Field::url("website", "Website"),
    ]);
}
