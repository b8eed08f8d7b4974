//! HTTP API handlers for trackstash

pub mod edit;
pub mod files;
pub mod health;
pub mod index;
pub mod profile;
pub mod track;

pub use edit::{get_edit, search_edits, upload_edit};
pub use files::{download_file, list_files};
pub use health::health_routes;
pub use index::index;
pub use profile::{get_profile, update_profile};
pub use track::{get_track, search_tracks, upload_track};
