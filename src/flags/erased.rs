//! Runtime-typed flag values.
//!
//! Event payloads handed across the native boundary arrive before the layer
//! that owns them knows their flag type. `FlagValue` carries the bits together
//! with the identity of the flag type they came from (or no identity at all,
//! for raw integers) so the algebra can still be applied, with the checks the
//! generic path gets from the compiler done here at runtime:
//!
//! 1. receiver present            -> else `InvalidArgument(ABSENT_RECEIVER)`
//! 2. receiver and operand typed  -> else `InvalidArgument(NOT_ENUMERATED)`
//! 3. both of the same flag type  -> else `TypeMismatch`
//! 4. result representable        -> else `Unrepresentable`

use std::any::TypeId;
use std::fmt;

use super::{FlagEnum, FlagError, NumericView, ABSENT_RECEIVER, NOT_ENUMERATED};

// ---------------------------------------------------------------------------
// Type tag
// ---------------------------------------------------------------------------

/// Identity of a flag type, captured when a value is erased.
#[derive(Clone, Copy)]
struct TypeTag {
    id: TypeId,
    name: &'static str,
    /// Whether a view converts back into the tagged type.
    representable: fn(NumericView) -> bool,
}

impl TypeTag {
    fn of<T: FlagEnum>() -> Self {
        TypeTag {
            id: TypeId::of::<T>(),
            name: T::type_name(),
            representable: |view| T::from_view(view).is_ok(),
        }
    }
}

// ---------------------------------------------------------------------------
// FlagValue
// ---------------------------------------------------------------------------

/// Flag bits plus the identity of their flag type, if any.
#[derive(Clone, Copy)]
pub struct FlagValue {
    tag: Option<TypeTag>,
    view: NumericView,
}

impl FlagValue {
    /// Erases a typed flag value.
    pub fn of<T: FlagEnum>(value: T) -> Self {
        FlagValue {
            tag: Some(TypeTag::of::<T>()),
            view: value.to_view(),
        }
    }

    /// Wraps a raw integer that has no flag type.
    ///
    /// Such a value can be inspected but is rejected by every set operation.
    pub fn plain(raw: i64) -> Self {
        FlagValue {
            tag: None,
            view: NumericView::Signed(raw),
        }
    }

    pub fn is_enumerated(&self) -> bool {
        self.tag.is_some()
    }

    /// Name of the flag type, or `None` for a plain integer.
    pub fn type_name(&self) -> Option<&'static str> {
        self.tag.map(|tag| tag.name)
    }

    pub fn view(&self) -> NumericView {
        self.view
    }

    pub fn bits(&self) -> u64 {
        self.view.bits()
    }

    /// Recovers the typed value.
    pub fn downcast<T: FlagEnum>(&self) -> Result<T, FlagError> {
        let tag = self.tag.ok_or(FlagError::InvalidArgument(NOT_ENUMERATED))?;
        if tag.id != TypeId::of::<T>() {
            return Err(FlagError::TypeMismatch {
                expected: T::type_name(),
                actual: tag.name,
            });
        }
        T::from_view(self.view)
    }

    pub fn has(&self, probe: &FlagValue) -> Result<bool, FlagError> {
        has(Some(self), probe)
    }

    pub fn missing(&self, probe: &FlagValue) -> Result<bool, FlagError> {
        missing(Some(self), probe)
    }

    pub fn include(&self, addition: &FlagValue) -> Result<FlagValue, FlagError> {
        include(Some(self), addition)
    }

    pub fn remove(&self, subtraction: &FlagValue) -> Result<FlagValue, FlagError> {
        remove(Some(self), subtraction)
    }
}

impl PartialEq for FlagValue {
    fn eq(&self, other: &Self) -> bool {
        self.tag.map(|tag| tag.id) == other.tag.map(|tag| tag.id) && self.view == other.view
    }
}

impl Eq for FlagValue {}

impl fmt::Debug for FlagValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FlagValue")
            .field("type", &self.type_name().unwrap_or("<plain>"))
            .field("bits", &format_args!("{:#x}", self.view))
            .finish()
    }
}

impl<T: FlagEnum> From<T> for FlagValue {
    fn from(value: T) -> Self {
        FlagValue::of(value)
    }
}

// ---------------------------------------------------------------------------
// Checked operations
// ---------------------------------------------------------------------------

/// Runs checks 1-3 and returns the shared tag with both views.
fn operands(
    value: Option<&FlagValue>,
    operand: &FlagValue,
) -> Result<(TypeTag, NumericView, NumericView), FlagError> {
    let value = value.ok_or(FlagError::InvalidArgument(ABSENT_RECEIVER))?;
    let (Some(tag), Some(other)) = (value.tag, operand.tag) else {
        return Err(FlagError::InvalidArgument(NOT_ENUMERATED));
    };
    if tag.id != other.id {
        log::warn!(
            "flags: refusing to combine {} with {}",
            tag.name,
            other.name
        );
        return Err(FlagError::TypeMismatch {
            expected: tag.name,
            actual: other.name,
        });
    }
    Ok((tag, value.view, operand.view))
}

fn rebuild(tag: TypeTag, view: NumericView) -> Result<FlagValue, FlagError> {
    if !(tag.representable)(view) {
        return Err(FlagError::Unrepresentable {
            type_name: tag.name,
            bits: view.bits(),
        });
    }
    Ok(FlagValue {
        tag: Some(tag),
        view,
    })
}

pub fn has(value: Option<&FlagValue>, probe: &FlagValue) -> Result<bool, FlagError> {
    let (_, value, probe) = operands(value, probe)?;
    Ok(value.contains(probe))
}

pub fn missing(value: Option<&FlagValue>, probe: &FlagValue) -> Result<bool, FlagError> {
    has(value, probe).map(|found| !found)
}

pub fn include(value: Option<&FlagValue>, addition: &FlagValue) -> Result<FlagValue, FlagError> {
    let (tag, value, addition) = operands(value, addition)?;
    rebuild(tag, value.or(addition))
}

pub fn remove(
    value: Option<&FlagValue>,
    subtraction: &FlagValue,
) -> Result<FlagValue, FlagError> {
    let (tag, value, subtraction) = operands(value, subtraction)?;
    rebuild(tag, value.and_not(subtraction))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    bitflags::bitflags! {
        #[derive(Debug, Clone, Copy, PartialEq, Eq)]
        struct Narrow: i32 {
            const FOO = 1;
            const BAR = 2;
            const BAZ = 4;
        }
    }

    bitflags::bitflags! {
        #[derive(Debug, Clone, Copy, PartialEq, Eq)]
        struct Wide: u64 {
            const FOO = 1;
        }
    }

    crate::impl_flag_enum!(Narrow, Wide);

    crate::flag_enum! {
        enum Mode: u8 {
            Off = 0,
            Read = 1,
            Write = 2,
        }
    }

    fn all_ops(value: Option<&FlagValue>, operand: &FlagValue) -> [Result<(), FlagError>; 4] {
        [
            has(value, operand).map(drop),
            missing(value, operand).map(drop),
            include(value, operand).map(drop),
            remove(value, operand).map(drop),
        ]
    }

    #[test]
    fn typed_round_trip_through_erasure() {
        let combined = FlagValue::of(Narrow::FOO)
            .include(&Narrow::BAR.into())
            .unwrap();
        assert_eq!(combined.downcast::<Narrow>(), Ok(Narrow::FOO | Narrow::BAR));
        assert_eq!(combined.has(&Narrow::BAZ.into()), Ok(false));
        assert_eq!(combined.missing(&Narrow::BAZ.into()), Ok(true));
        let rest = combined.remove(&Narrow::FOO.into()).unwrap();
        assert_eq!(rest.downcast::<Narrow>(), Ok(Narrow::BAR));
    }

    #[test]
    fn absent_receiver_fails_every_operation() {
        let operand = FlagValue::of(Narrow::FOO);
        for result in all_ops(None, &operand) {
            assert_eq!(result, Err(FlagError::InvalidArgument(ABSENT_RECEIVER)));
        }
    }

    #[test]
    fn plain_operand_fails_every_operation() {
        let value = FlagValue::of(Narrow::FOO);
        let plain = FlagValue::plain(1);
        for result in all_ops(Some(&value), &plain) {
            assert_eq!(result, Err(FlagError::InvalidArgument(NOT_ENUMERATED)));
        }
    }

    #[test]
    fn plain_receiver_fails_every_operation() {
        let plain = FlagValue::plain(1);
        let operand = FlagValue::of(Narrow::FOO);
        for result in all_ops(Some(&plain), &operand) {
            assert_eq!(result, Err(FlagError::InvalidArgument(NOT_ENUMERATED)));
        }
    }

    /// Same bits, different flag types: an explicit error, not a silent answer.
    #[test]
    fn mixed_types_fail_every_operation() {
        let value = FlagValue::of(Narrow::FOO);
        let other = FlagValue::of(Wide::FOO);
        for result in all_ops(Some(&value), &other) {
            assert!(
                matches!(result, Err(FlagError::TypeMismatch { .. })),
                "{result:?}"
            );
        }
    }

    #[test]
    fn downcast_checks_type_identity() {
        let value = FlagValue::of(Narrow::FOO);
        assert!(matches!(
            value.downcast::<Wide>(),
            Err(FlagError::TypeMismatch { .. })
        ));
        assert_eq!(
            FlagValue::plain(1).downcast::<Narrow>(),
            Err(FlagError::InvalidArgument(NOT_ENUMERATED))
        );
    }

    #[test]
    fn closed_enum_result_must_be_named() {
        let read = FlagValue::of(Mode::Read);
        let write = FlagValue::of(Mode::Write);
        assert!(matches!(
            read.include(&write),
            Err(FlagError::Unrepresentable { bits: 3, .. })
        ));
        assert_eq!(
            read.remove(&read).unwrap().downcast::<Mode>(),
            Ok(Mode::Off)
        );
    }

    #[test]
    fn equality_includes_type_identity() {
        assert_eq!(FlagValue::of(Narrow::FOO), FlagValue::of(Narrow::FOO));
        assert_ne!(FlagValue::of(Narrow::FOO), FlagValue::of(Wide::FOO));
        assert_ne!(FlagValue::of(Narrow::FOO), FlagValue::plain(1));
        assert!(!FlagValue::plain(1).is_enumerated());
        assert_eq!(FlagValue::plain(1).type_name(), None);
    }
}
