//! PolicyStore - authoritative in-memory policy collection with a mirrored
//! persistence medium.
//!
//! Every mutating operation ends with an explicit `save` into the medium;
//! there is no observer or effect system between state change and mirror
//! write. The store is constructed once and cloned to whoever needs a
//! handle (clones share state).
//!
//! ## Example
//!
//! ```
//! use policy_store::{InMemoryMedium, PolicyDraft, PolicyStore};
//!
//! let store = PolicyStore::open(InMemoryMedium::new());
//! let policy = store.add(PolicyDraft {
//!     policy_number: "POL-001".into(),
//!     customer_name: "John Doe".into(),
//!     start_date: "2024-01-01".into(),
//!     end_date: "2024-12-31".into(),
//!     premium_amount: 1500.0,
//! }).unwrap();
//! assert_eq!(policy.id, 1);
//! ```

mod layout;
mod policy_store;

pub use layout::{NEXT_ID_KEY, POLICIES_KEY};
pub use policy_store::PolicyStore;
