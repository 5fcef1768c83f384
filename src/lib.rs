pub mod auction;
pub mod bidding;
pub mod business_code;
pub mod config;
pub mod database;
pub mod error;
pub mod event_store;
pub mod handlers;
pub mod ids;
pub mod message_broker;
pub mod payments;
pub mod relisting;
pub mod repository;
pub mod routes;
pub mod status;
