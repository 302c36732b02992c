//! Database model types for Diesel ORM.

use diesel::prelude::*;

use super::schema::{social_event_tickers, social_events};

/// Database row for a social event (insertable).
#[derive(Insertable, Debug, Clone)]
#[diesel(table_name = social_events)]
pub struct NewSocialEventRow {
    pub observed_at: String,
    pub source: String,
    pub body: String,
    pub sentiment: f64,
    pub tickers: String,
}

/// Database row for a social event (queryable).
#[derive(Queryable, Selectable, Debug, Clone)]
#[diesel(table_name = social_events)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct SocialEventRow {
    pub id: i64,
    pub observed_at: String,
    pub source: String,
    pub body: String,
    pub sentiment: f64,
    pub tickers: String,
}

/// Database row linking an event to one ticker tag.
#[derive(Insertable, Queryable, Selectable, Debug, Clone)]
#[diesel(table_name = social_event_tickers)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct SocialEventTickerRow {
    pub event_id: i64,
    pub ticker: String,
    pub observed_at: String,
}
