mod error;
mod medium;
mod policy;
mod store;

pub use error::StoreError;
pub use medium::{FileMedium, InMemoryMedium, MediumError, StorageMedium};
pub use policy::{Policy, PolicyDraft};
pub use store::{PolicyStore, NEXT_ID_KEY, POLICIES_KEY};
