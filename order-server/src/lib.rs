//! Order intake server
//!
//! Accepts orders over HTTP, renders each one as a plain-text ticket,
//! uploads the ticket to cloud storage and inserts an order row so print
//! clients can pick it up.
//!
//! ```text
//! order-server/src/
//! ├── api/        # routes and handlers
//! ├── config.rs   # environment settings
//! ├── error.rs    # ApiError -> {success: false, message}
//! ├── ids.rs      # sequential order ids (last_id.txt)
//! ├── renderer.rs # ticket layout
//! └── state.rs    # handler state
//! ```

pub mod api;
pub mod config;
pub mod error;
pub mod ids;
pub mod renderer;
pub mod state;

pub use config::Config;
pub use error::{ApiError, ApiResult};
pub use state::AppState;
