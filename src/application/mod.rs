// Application layer: the validating facade over the in-memory store.
// Presentation layers (the CLI session, embedders) only talk to `LedgerService`.

pub mod decision;
pub mod error;
pub mod service;
pub mod settings;

pub use decision::*;
pub use error::*;
pub use service::*;
pub use settings::*;
