//! Rebuild-and-reload loop: file watcher, build runner and the browser socket.

pub mod socket;
pub mod watcher;
