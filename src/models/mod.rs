//! SBI data types exchanged on the wire.

pub mod ee_subscription;
pub mod patch;
pub mod problem_details;

pub use ee_subscription::EeSubscription;
pub use patch::{apply_patch, PatchError, PatchItem, PatchOperation};
pub use problem_details::{cause, ProblemDetails};
