//! Database repositories.

pub mod clipper_profile;
pub mod creator_profile;
pub mod notification;
pub mod submission;
pub mod transaction;
pub mod user;

pub use clipper_profile::ClipperProfileRepository;
pub use creator_profile::CreatorProfileRepository;
pub use notification::NotificationRepository;
pub use submission::SubmissionRepository;
pub use transaction::TransactionRepository;
pub use user::UserRepository;
