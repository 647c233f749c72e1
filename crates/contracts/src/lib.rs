//! Types shared between the browser application and the dev server.

pub mod domain;
pub mod shared;
