#![deny(clippy::all, clippy::pedantic)]

pub mod blogs;
pub mod comments;
pub mod graphql;
pub mod posts;
pub mod session;
pub mod subscriptions;
pub mod uploads;
