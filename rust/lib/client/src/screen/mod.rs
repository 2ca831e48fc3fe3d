//! Feed screens: one [`crate::FeedHolder`] per list plus the mutations
//! that screen offers.

mod events;
mod jobs;
mod posts;
mod users;
mod wall;

pub use events::EventsScreen;
pub use jobs::{JobOwner, JobsScreen};
pub use posts::PostsScreen;
pub use users::UsersScreen;
pub use wall::{UserWallScreen, LOOKING_FOR_WORK};
