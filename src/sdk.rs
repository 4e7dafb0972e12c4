//! Flag vocabularies reported by the hardware SDK.
//!
//! These are the types event-argument layers wrap: keyboard callbacks report
//! `KeyModifiers`, device enumeration reports `DeviceCaps`, and the callback
//! dispatcher tags each notification with exactly one `EventKind`.
//!
//! `DeviceCaps` puts its vendor extension bits at the top of the 64-bit
//! range, which is why the flag algebra has an unsigned lane.

use bitflags::bitflags;

bitflags! {
    /// Modifier and lock keys held while a key event fired.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct KeyModifiers: i32 {
        const SHIFT = 0x0001;
        const CTRL = 0x0002;
        const ALT = 0x0004;
        const META = 0x0008;
        const CAPS_LOCK = 0x0010;
        const NUM_LOCK = 0x0020;
        const SCROLL_LOCK = 0x0040;
        /// Reported by firmware that pushes the Fn layer through the SDK.
        const FN = 0x4000_0000;
    }
}

bitflags! {
    /// Capabilities a connected device advertises.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct DeviceCaps: u64 {
        const KEYBOARD = 0x0000_0000_0000_0001;
        const POINTER = 0x0000_0000_0000_0002;
        const CONSUMER_KEYS = 0x0000_0000_0000_0004;
        const ONBOARD_MEMORY = 0x0000_0000_0001_0000;
        // Vendor extension block.
        const HAPTICS = 0x2000_0000_0000_0000;
        const LIGHTING = 0x4000_0000_0000_0000;
        const MACROS = 0x8000_0000_0000_0000;
    }
}

crate::impl_flag_enum!(KeyModifiers, DeviceCaps);

crate::flag_enum! {
    /// Kind of notification delivered by the SDK callback dispatcher.
    ///
    /// Closed: one kind per notification, so combinations do not exist.
    pub enum EventKind: i32 {
        None = 0,
        KeyDown = 1,
        KeyUp = 2,
        AppActivated = 4,
        AppDeactivated = 8,
        DeviceArrived = 16,
        DeviceRemoved = 32,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
