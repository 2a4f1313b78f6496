//! TesaPay Backend API
//!
//! Thin typed client over the PHP endpoints used by the transfer workflow:
//!
//! | Method | Path | Purpose |
//! |--------|-------------------------------------|----------------------------|
//! | GET | `get_transfer_fees.php?type=momo` | MOMO fee tiers |
//! | GET | `get_transfer_fees.php?type=crypto` | blockchain + platform fees |
//! | POST | `transfers.php` | submit a transfer |
//! | POST | `verify_pin.php` | check a transaction PIN |

pub mod client;
pub mod error;
pub mod types;

pub use client::ApiClient;
pub use error::{ApiError, ApiResult};
pub use types::{FeeKind, Session};
