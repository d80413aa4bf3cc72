//! Reloads datasets when the scraper rewrites the cache directory

pub mod watcher;

pub use watcher::{DatasetWatcher, WatchEvent, WatcherService, apply_event};
