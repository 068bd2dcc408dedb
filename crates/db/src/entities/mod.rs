//! Database entities.

pub mod clipper_profile;
pub mod creator_profile;
pub mod notification;
pub mod submission;
pub mod transaction;
pub mod user;

pub use clipper_profile::Entity as ClipperProfile;
pub use creator_profile::Entity as CreatorProfile;
pub use notification::Entity as Notification;
pub use notification::NotificationType;
pub use submission::Entity as Submission;
pub use submission::SubmissionStatus;
pub use transaction::Entity as Transaction;
pub use transaction::TransactionStatus;
pub use user::Entity as User;
pub use user::UserRole;
