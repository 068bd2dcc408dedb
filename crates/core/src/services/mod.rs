//! Business logic services.

pub mod notification;
pub mod payments;
pub mod profile;
pub mod rate;
pub mod settlement;
pub mod stats;
pub mod submission;
pub mod user;
pub mod video;

pub use notification::NotificationService;
pub use payments::{CreateTransfer, HttpPaymentGateway, PaymentGateway, TransferHandle};
pub use profile::{ProfileService, SetupClipperInput, SetupCreatorInput};
pub use rate::compute_payment;
pub use settlement::{
    verify_webhook_signature, SettlementConfig, SettlementService, TransferWebhookEvent,
};
pub use stats::{ClipperStats, StatsService};
pub use submission::{
    next_status, status_name, CreateSubmissionInput, SubmissionAction, SubmissionService,
};
pub use user::{RegisterInput, UserService};
pub use video::{HttpVideoProvider, VideoMetadata, VideoProvider};
