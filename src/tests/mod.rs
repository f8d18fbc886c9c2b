//! Router tests, on the in-memory storage or on a test database with the `postgres` feature

#![cfg_attr(feature = "postgres", allow(dead_code))]

#[cfg(not(feature = "postgres"))]
mod consents;
#[cfg(not(feature = "postgres"))]
mod login;
#[cfg(not(feature = "postgres"))]
mod ownership;
#[cfg(feature = "postgres")]
mod postgres;
#[cfg(not(feature = "postgres"))]
mod users;
