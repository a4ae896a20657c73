pub mod access;
pub mod assistance;
pub mod attachment;
pub mod audit;
pub mod auth;
pub mod files;
pub mod lookup;
pub mod messaging;
pub mod outreach;
pub mod people;
pub mod schedule;
pub mod serde;
pub mod storage;
