//! HTTP API handlers for parish-web

pub mod announcements;
pub mod archive;
pub mod error;
pub mod events;
pub mod gallery;
pub mod health;
pub mod podcasts;
pub mod sermons;

pub use announcements::list_announcements;
pub use archive::{get_archive, get_archive_year};
pub use error::ApiError;
pub use events::list_ongoing_events;
pub use gallery::list_gallery;
pub use health::health_routes;
pub use podcasts::get_podcast_series;
pub use sermons::list_sermons;
