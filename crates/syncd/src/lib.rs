//! Daemon half of the split SAI adapter.
//!
//! A single-threaded [`Dispatcher`] drains the request and get-request
//! queues, translates virtual ids to the real ids the vendor SDK
//! understands, performs the hardware call, and publishes get responses
//! and notifications back onto the bus. The [`translator`] owns the
//! persistent VID⇄RID tables; [`view`] compiles candidate configurations
//! for the two-phase init/apply protocol.
//!
//! The daemon is fail-stop: metadata misses, unknown kinds, missing
//! translations, and failed hardware mutations all terminate the process
//! so a supervisor restart can resume from the persistent store.

pub mod diag;
pub mod dispatcher;
pub mod logging;
pub mod sdk;
pub mod sim;
pub mod translator;
pub mod view;

pub use dispatcher::{Dispatcher, FatalError};
pub use sdk::VendorSdk;
pub use sim::SimSdk;
pub use translator::{IdTranslator, TranslateError};
