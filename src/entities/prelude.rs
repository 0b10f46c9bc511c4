pub use super::media::Entity as Media;
pub use super::stats::Entity as Stats;
pub use super::users::Entity as Users;
