pub mod auth_service;
pub use auth_service::{AuthError, AuthService, Registration};

pub mod auth_service_impl;
pub use auth_service_impl::SeaOrmAuthService;

pub mod media_service;
pub use media_service::{MediaError, MediaService, NewMedia};

pub mod media_service_impl;
pub use media_service_impl::SeaOrmMediaService;

pub mod stats_service;
pub use stats_service::{StatsError, StatsService, WeeklyStats};

pub mod stats_service_impl;
pub use stats_service_impl::SeaOrmStatsService;

pub mod placement;
pub use placement::{PlacedFile, PlacementError, PlacementService};
