//! Multimodal routing server.
//!
//! Answers: "what is the fastest way from here to there, using only
//! these ways of travelling?" over a city graph of walk, bike, car, bus
//! and subway connections.

pub mod cache;
pub mod config;
pub mod domain;
pub mod graph;
pub mod planner;
pub mod spatial;
pub mod store;
pub mod web;
