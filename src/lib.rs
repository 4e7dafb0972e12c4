//! sdkbridge -- core of the hardware SDK binding layer.
//!
//! Two leaf components used by the event-argument and error layers above:
//!
//! - [`flags`]: `has` / `missing` / `include` / `remove` over flag types of
//!   any integer width up to 64 bits, signed or unsigned.
//! - [`native`]: status code to [`native::NativeError`] translation with the
//!   OS message attached.
//!
//! [`sdk`] holds the SDK's own flag vocabularies; [`config`] and [`logging`]
//! are shared setup for the `sdkbridge` binary and embedding applications.

pub mod config;
pub mod flags;
pub mod logging;
pub mod native;
mod platform;
pub mod sdk;

#[doc(hidden)]
pub use bitflags;
