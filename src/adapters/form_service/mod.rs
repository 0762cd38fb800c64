//! Form provider adapters.

pub mod callvu_client;
pub mod mock;

pub use callvu_client::{CallvuConfig, CallvuFormClient};
pub use mock::{MockFormProvider, RecordedLaunch};
