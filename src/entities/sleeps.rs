use chrono::NaiveDate;
use chrono::NaiveTime;
use serde::Deserialize;
use serde::Serialize;

use crate::forms::Field;
use crate::forms::Schema;

use super::Entity;
use super::Kind;

const RATINGS: &[&str] = &["1", "2", "3", "4", "5"];

/// A night of sleep
///
/// Ratings go from 1 (poor) to 5 (great)
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct Sleep {
    /// How well the user slept
    pub rating: i64,

    /// How the user felt when waking up
    pub feel: i64,

    pub start_time: Option<NaiveTime>,
    pub end_time: Option<NaiveTime>,
    pub sleep_date: Option<NaiveDate>,
    pub wake_date: Option<NaiveDate>,

    /// Minutes it took to fall asleep
    pub minutes_to_sleep: i64,
}

impl Entity for Sleep {
    const KIND: Kind = Kind::Sleep;

    const SCHEMA: Schema = Schema::new(&[
        Field::number_choice(
            "rating",
            "How would you rate your sleep: 5 is great, 1 is poor",
            RATINGS,
        )
        .required(),
        Field::time("start_time", "Start Time"),
        Field::time("end_time", "End Time"),
        Field::number_choice(
            "feel",
            "How did you feel when you woke up: 5 is great, 1 is poor",
            RATINGS,
        )
        .required(),
        Field::date("sleep_date", "What date did you go to sleep"),
        Field::date("wake_date", "What date did you wake up"),
        Field::integer(
            "minutes_to_sleep",
            "How many minutes did it take you to fall asleep?",
            0,
            180,
        )
        .required(),
    ]);
}
