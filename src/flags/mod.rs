//! Bitwise set algebra over flag enumerations of any integer width.
//!
//! `FlagEnum` is the capability a type needs: conversion to and from a
//! primitive representation (`FlagRepr`). `FlagOps` is blanket-implemented on
//! top of it and provides the four operations the SDK event layers use:
//!
//! | Operation | Result |
//! |-----------|--------|
//! | `has`     | every probe bit is set in the value |
//! | `missing` | `!has` (a value holding only some of the probe bits is missing) |
//! | `include` | `value \| addition` |
//! | `remove`  | `value & !subtraction` |
//!
//! Both operands are normalized to a 64-bit `NumericView` first, so a `u64`
//! flag set occupying the top bits behaves exactly like an `i32` one.
//!
//! Operands must share one flag type. On this generic path that is enforced
//! by the type system:
//!
//! ```compile_fail
//! use sdkbridge::flags::FlagOps;
//! use sdkbridge::sdk::{DeviceCaps, KeyModifiers};
//!
//! KeyModifiers::SHIFT.has(DeviceCaps::HAPTICS);
//! ```
//!
//! Values whose type is only known at runtime go through `erased::FlagValue`,
//! which checks the same preconditions and reports them as `FlagError`s.

pub mod erased;
mod repr;

pub use repr::{FlagRepr, Lane, NumericView};

use std::any;

/// Message carried by `FlagError::InvalidArgument` for an absent receiver.
pub const ABSENT_RECEIVER: &str = "value must not be absent";

/// Message carried by `FlagError::InvalidArgument` for a non-flag operand.
pub const NOT_ENUMERATED: &str = "value provided is not an enumerated type";

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FlagError {
    /// The receiver is absent or an operand is not a flag enumeration.
    #[error("invalid argument: {0}")]
    InvalidArgument(&'static str),

    /// The operands belong to different flag types.
    #[error("flag type mismatch: expected {expected}, got {actual}")]
    TypeMismatch {
        expected: &'static str,
        actual: &'static str,
    },

    /// The result bits name no value of the destination type.
    #[error("bit pattern {bits:#x} is not representable as {type_name}")]
    Unrepresentable { type_name: &'static str, bits: u64 },
}

// ---------------------------------------------------------------------------
// Capability traits
// ---------------------------------------------------------------------------

/// A type whose values are bit patterns over a primitive integer.
///
/// Implemented for `bitflags` types with `impl_flag_enum!` and for closed
/// `#[repr]` enums declared with `flag_enum!`.
pub trait FlagEnum: Copy + 'static {
    type Repr: FlagRepr;

    fn to_repr(self) -> Self::Repr;

    /// Returns `None` when `repr` names no value of this type.
    fn from_repr(repr: Self::Repr) -> Option<Self>;

    fn type_name() -> &'static str {
        any::type_name::<Self>()
    }

    fn to_view(self) -> NumericView {
        self.to_repr().to_view()
    }

    /// Re-materializes a view produced by the algebra.
    fn from_view(view: NumericView) -> Result<Self, FlagError> {
        Self::Repr::from_view(view)
            .and_then(Self::from_repr)
            .ok_or_else(|| FlagError::Unrepresentable {
                type_name: Self::type_name(),
                bits: view.bits(),
            })
    }
}

/// Set operations available on every `FlagEnum`.
pub trait FlagOps: FlagEnum {
    fn has(self, probe: Self) -> bool {
        self.to_view().contains(probe.to_view())
    }

    fn missing(self, probe: Self) -> bool {
        !self.has(probe)
    }

    fn include(self, addition: Self) -> Result<Self, FlagError> {
        Self::from_view(self.to_view().or(addition.to_view()))
    }

    fn remove(self, subtraction: Self) -> Result<Self, FlagError> {
        Self::from_view(self.to_view().and_not(subtraction.to_view()))
    }
}

impl<T: FlagEnum> FlagOps for T {}

// ---------------------------------------------------------------------------
// Receiver-checked entry points
// ---------------------------------------------------------------------------
//
// Event payloads decoded from the SDK carry optional flag fields. These wrap
// `FlagOps` and reject an absent receiver instead of defaulting it.

fn receiver<T>(value: Option<T>) -> Result<T, FlagError> {
    value.ok_or(FlagError::InvalidArgument(ABSENT_RECEIVER))
}

pub fn has<T: FlagEnum>(value: Option<T>, probe: T) -> Result<bool, FlagError> {
    Ok(receiver(value)?.has(probe))
}

pub fn missing<T: FlagEnum>(value: Option<T>, probe: T) -> Result<bool, FlagError> {
    Ok(receiver(value)?.missing(probe))
}

pub fn include<T: FlagEnum>(value: Option<T>, addition: T) -> Result<T, FlagError> {
    receiver(value)?.include(addition)
}

pub fn remove<T: FlagEnum>(value: Option<T>, subtraction: T) -> Result<T, FlagError> {
    receiver(value)?.remove(subtraction)
}

// ---------------------------------------------------------------------------
// Declaration macros
// ---------------------------------------------------------------------------

/// Implements `FlagEnum` for one or more `bitflags` types.
///
/// Any bit pattern is representable (`from_bits_retain`), so `include` and
/// `remove` never fail for these types.
///
/// ```
/// use sdkbridge::flags::FlagOps;
///
/// sdkbridge::bitflags::bitflags! {
///     #[derive(Debug, Clone, Copy, PartialEq, Eq)]
///     pub struct Leds: u8 {
///         const CAPS = 1;
///         const NUM = 2;
///     }
/// }
/// sdkbridge::impl_flag_enum!(Leds);
///
/// let leds = Leds::CAPS.include(Leds::NUM).unwrap();
/// assert!(leds.has(Leds::NUM));
/// ```
#[macro_export]
macro_rules! impl_flag_enum {
    ($($ty:ty),+ $(,)?) => {$(
        impl $crate::flags::FlagEnum for $ty {
            type Repr = <$ty as $crate::bitflags::Flags>::Bits;

            fn to_repr(self) -> Self::Repr {
                <$ty as $crate::bitflags::Flags>::bits(&self)
            }

            fn from_repr(repr: Self::Repr) -> Option<Self> {
                Some(<$ty as $crate::bitflags::Flags>::from_bits_retain(repr))
            }
        }
    )+};
}

/// Declares a closed `#[repr]` enum and implements `FlagEnum` for it.
///
/// Only the declared members are representable: combining two members into a
/// pattern no member names fails with `FlagError::Unrepresentable`. The macro
/// derives `Debug`, `Clone`, `Copy`, `PartialEq`, `Eq` and `Hash`.
///
/// ```
/// use sdkbridge::flags::FlagOps;
///
/// sdkbridge::flag_enum! {
///     pub enum Channel: u8 {
///         Mute = 0,
///         Left = 1,
///         Right = 2,
///         Both = 3,
///     }
/// }
///
/// assert_eq!(Channel::Left.include(Channel::Right), Ok(Channel::Both));
/// assert_eq!(Channel::Both.remove(Channel::Left), Ok(Channel::Right));
/// ```
#[macro_export]
macro_rules! flag_enum {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident : $repr:ident {
            $( $(#[$vmeta:meta])* $variant:ident = $value:expr ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        #[repr($repr)]
        $vis enum $name {
            $( $(#[$vmeta])* $variant = $value ),+
        }

        impl $crate::flags::FlagEnum for $name {
            type Repr = $repr;

            fn to_repr(self) -> $repr {
                self as $repr
            }

            fn from_repr(repr: $repr) -> Option<Self> {
                $(
                    if repr == $name::$variant as $repr {
                        return Some($name::$variant);
                    }
                )+
                None
            }
        }
    };
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
