//! Aduan Service: the domain operations behind the REST surface.
//!
//! Each service is generic over the repository traits it needs and, where it
//! notifies, over a [`Notifier`](aduan_core::notifier::Notifier). Every
//! operation authorizes through [`AccessPolicy`](aduan_core::policy::AccessPolicy)
//! before touching data it does not own.

pub mod account;
pub mod comment;
pub mod complaint;
mod recipients;
pub mod response;

pub use account::{AccountProfile, AccountService};
pub use comment::CommentService;
pub use complaint::{ComplaintDetail, ComplaintService, NewComplaint};
pub use response::ResponseService;
