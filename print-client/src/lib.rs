//! POS-side print client
//!
//! Notices new orders (polling storage or a realtime subscription),
//! downloads each ticket and hands it to the printer fallback chain.
//!
//! ```text
//! print-client/src/
//! ├── config.rs    # environment settings
//! ├── error.rs     # ClientError
//! ├── jobs.rs      # fetch-and-print, shared by both triggers
//! ├── logger.rs    # console + rolling file logs
//! ├── poller.rs    # polling trigger
//! ├── realtime/    # Supabase Realtime trigger
//! └── state.rs     # last printed id
//! ```

pub mod config;
pub mod error;
pub mod jobs;
pub mod logger;
pub mod poller;
pub mod realtime;
pub mod state;

pub use config::{ClientConfig, TriggerMode};
pub use error::{ClientError, ClientResult};
pub use jobs::PrintJobRunner;
pub use poller::{PollStep, Poller};
pub use realtime::RealtimeListener;
pub use state::PollState;
