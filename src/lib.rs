// Library exports for the knight's tour engine
// This allows the replay and survey tools to use the core tour logic

#[macro_use]
extern crate rocket;

pub mod advisor;
pub mod board;
pub mod clock;
pub mod config;
pub mod handler;
pub mod journal;
pub mod ledger;
pub mod movegen;
pub mod oracle;
pub mod replay;
pub mod server;
pub mod session;
pub mod survey;
pub mod tour;
pub mod types;
