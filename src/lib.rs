//! Tweet feed backend: users own tweets (text up to 280 characters, optional
//! photo), and `GET /` renders every tweet newest first.

pub mod app;
pub mod config;
pub mod db;
pub mod photos;
pub mod render;
pub mod state;
pub mod storage;
pub mod tweets;
pub mod users;
