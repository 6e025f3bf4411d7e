//! Forge type logic built on top of the substrate predicates in
//! `forge_syntax::types` (§4.G): arithmetic containing-type and
//! casting-mode classification.

use forge_core::SourceRange;
use forge_syntax::{self as syntax, Type};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CastingMode {
    Implicit,
    Explicit,
    Illegal,
}

/// The type an arithmetic operator's result takes, given its two operand
/// types. `None` when the operands have no common arithmetic type.
pub fn arithmetic_containing_type(a: &Type, b: &Type, pointer_bit_width: u32, range: SourceRange) -> Option<Type> {
    if a.compare(b) {
        return Some(a.deep_clone());
    }
    if !syntax::is_number(a) || !syntax::is_number(b) {
        return None;
    }

    let kind = if syntax::is_float(a) || syntax::is_float(b) {
        syntax::BitWidthKind::Float
    } else if syntax::signedness(a) == Some(true) || syntax::signedness(b) == Some(true) {
        syntax::BitWidthKind::SignedInt
    } else {
        syntax::BitWidthKind::UnsignedInt
    };

    let width_a = syntax::number_bit_width(a, pointer_bit_width).unwrap_or(pointer_bit_width);
    let width_b = syntax::number_bit_width(b, pointer_bit_width).unwrap_or(pointer_bit_width);
    Some(Type::with_bit_width(kind, width_a.max(width_b), range))
}

/// Classifies the cast from `from` to `to` (§4.G). Identical types are
/// always implicit; two non-number types that aren't identical are always
/// illegal — structured-type and pointer casts beyond identity are out of
/// scope (pointer equality already falls out of `Type::compare`).
pub fn casting_mode(from: &Type, to: &Type, pointer_bit_width: u32) -> CastingMode {
    if from.compare(to) {
        return CastingMode::Implicit;
    }
    if !syntax::is_number(from) || !syntax::is_number(to) {
        return CastingMode::Illegal;
    }

    let from_float = syntax::is_float(from);
    let to_float = syntax::is_float(to);
    let from_width = syntax::number_bit_width(from, pointer_bit_width).unwrap_or(pointer_bit_width);
    let to_width = syntax::number_bit_width(to, pointer_bit_width).unwrap_or(pointer_bit_width);

    match (from_float, to_float) {
        (true, true) => {
            if to_width >= from_width {
                CastingMode::Implicit
            } else {
                CastingMode::Explicit
            }
        }
        (false, true) => CastingMode::Implicit,
        (true, false) => CastingMode::Explicit,
        (false, false) => {
            let from_signed = syntax::signedness(from);
            let to_signed = syntax::signedness(to);
            match (from_signed, to_signed) {
                (Some(fs), Some(ts)) if fs == ts => {
                    if to_width >= from_width {
                        CastingMode::Implicit
                    } else {
                        CastingMode::Explicit
                    }
                }
                (Some(false), Some(true)) => {
                    if from_width < to_width {
                        CastingMode::Implicit
                    } else {
                        CastingMode::Explicit
                    }
                }
                _ => CastingMode::Explicit,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use forge_syntax::BitWidthKind;

    fn r() -> SourceRange {
        SourceRange::synthetic()
    }

    #[test]
    fn identical_types_are_implicit() {
        let t = Type::with_bit_width(BitWidthKind::SignedInt, 32, r());
        assert_eq!(casting_mode(&t, &t, 64), CastingMode::Implicit);
    }

    #[test]
    fn widening_signed_is_implicit_narrowing_is_explicit() {
        let i32_t = Type::with_bit_width(BitWidthKind::SignedInt, 32, r());
        let i64_t = Type::with_bit_width(BitWidthKind::SignedInt, 64, r());
        assert_eq!(casting_mode(&i32_t, &i64_t, 64), CastingMode::Implicit);
        assert_eq!(casting_mode(&i64_t, &i32_t, 64), CastingMode::Explicit);
    }

    #[test]
    fn unsigned_to_signed_implicit_only_when_strictly_widening() {
        let u32_t = Type::with_bit_width(BitWidthKind::UnsignedInt, 32, r());
        let i64_t = Type::with_bit_width(BitWidthKind::SignedInt, 64, r());
        let i32_t = Type::with_bit_width(BitWidthKind::SignedInt, 32, r());
        assert_eq!(casting_mode(&u32_t, &i64_t, 64), CastingMode::Implicit);
        assert_eq!(casting_mode(&u32_t, &i32_t, 64), CastingMode::Explicit);
    }

    #[test]
    fn integer_to_float_is_always_implicit() {
        let i32_t = Type::with_bit_width(BitWidthKind::SignedInt, 32, r());
        let f32_t = Type::with_bit_width(BitWidthKind::Float, 32, r());
        assert_eq!(casting_mode(&i32_t, &f32_t, 64), CastingMode::Implicit);
    }

    #[test]
    fn mixed_non_numbers_are_illegal() {
        let b = Type::basic(syntax::BasicKind::Bool, r());
        let i = Type::with_bit_width(BitWidthKind::SignedInt, 32, r());
        assert_eq!(casting_mode(&b, &i, 64), CastingMode::Illegal);
    }

    #[test]
    fn arithmetic_containing_type_picks_float_over_int_and_max_width() {
        let i32_t = Type::with_bit_width(BitWidthKind::SignedInt, 32, r());
        let f64_t = Type::with_bit_width(BitWidthKind::Float, 64, r());
        let result = arithmetic_containing_type(&i32_t, &f64_t, 64, r()).unwrap();
        assert!(syntax::is_float(&result));
        assert_eq!(syntax::number_bit_width(&result, 64), Some(64));
    }

    #[test]
    fn arithmetic_containing_type_none_for_bool_and_int() {
        let b = Type::basic(syntax::BasicKind::Bool, r());
        let i = Type::with_bit_width(BitWidthKind::SignedInt, 32, r());
        assert!(arithmetic_containing_type(&b, &i, 64, r()).is_none());
    }
}
