//! End-to-end tests: real HTTP server on 127.0.0.1:0 with scripted models.

mod common;
mod enhance;
mod health;
mod modify;
