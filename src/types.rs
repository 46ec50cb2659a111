//! Primitive types and the widening rules between them.

use crate::error::InternalError;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Type {
    None,
    Void,
    Char,
    Int,
    Long,
    VoidPtr,
    CharPtr,
    IntPtr,
    LongPtr,
}

/// Which side of a binary operation has to be wrapped in a widening node.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Coercion {
    None,
    WidenLeft,
    WidenRight,
}

/// Whether both operands may be widened or only the left one, into the
/// right one's type (assignment, return).
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Direction {
    Either,
    LeftIntoRight,
}

impl Type {
    #[inline]
    pub fn is_pointer(self) -> bool {
        matches!(
            self,
            Self::VoidPtr | Self::CharPtr | Self::IntPtr | Self::LongPtr
        )
    }

    /// Storage size in bytes.
    pub fn size(self) -> Result<u8, InternalError> {
        match self {
            Self::Char => Ok(1),
            Self::Int => Ok(4),
            Self::Long | Self::VoidPtr | Self::CharPtr | Self::IntPtr | Self::LongPtr => Ok(8),
            Self::None | Self::Void => Err(InternalError::Sizeless(self)),
        }
    }

    fn size_or_zero(self) -> u8 {
        self.size().unwrap_or(0)
    }

    pub fn pointer_to(self) -> Result<Self, InternalError> {
        match self {
            Self::Void => Ok(Self::VoidPtr),
            Self::Char => Ok(Self::CharPtr),
            Self::Int => Ok(Self::IntPtr),
            Self::Long => Ok(Self::LongPtr),
            _ => Err(InternalError::NoPointerType(self)),
        }
    }

    pub fn pointee(self) -> Result<Self, InternalError> {
        match self {
            Self::VoidPtr => Ok(Self::Void),
            Self::CharPtr => Ok(Self::Char),
            Self::IntPtr => Ok(Self::Int),
            Self::LongPtr => Ok(Self::Long),
            _ => Err(InternalError::NotAPointer(self)),
        }
    }
}

/// Decide whether `left` and `right` can meet in one operation.
///
/// `None` means incompatible. Two different pointer types never mix.
pub fn compatible(left: Type, right: Type, direction: Direction) -> Option<Coercion> {
    if left == Type::Void || right == Type::Void {
        return None;
    }
    if left == right {
        return Some(Coercion::None);
    }
    if left.is_pointer() && right.is_pointer() {
        return None;
    }

    let left_size = left.size_or_zero();
    let right_size = right.size_or_zero();
    if left_size == 0 || right_size == 0 {
        return None;
    }

    if left_size < right_size {
        return Some(Coercion::WidenLeft);
    }
    if right_size < left_size {
        return match direction {
            Direction::Either => Some(Coercion::WidenRight),
            Direction::LeftIntoRight => None,
        };
    }
    Some(Coercion::None)
}

/// Result type of a binary operation over two compatible operands.
pub fn wider(left: Type, right: Type) -> Type {
    if right.size_or_zero() > left.size_or_zero() {
        right
    } else {
        left
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sizes() {
        assert_eq!(Type::Char.size(), Ok(1));
        assert_eq!(Type::Int.size(), Ok(4));
        assert_eq!(Type::Long.size(), Ok(8));
        assert_eq!(Type::VoidPtr.size(), Ok(8));
        assert_eq!(Type::CharPtr.size(), Ok(8));
        assert_eq!(Type::Void.size(), Err(InternalError::Sizeless(Type::Void)));
        assert_eq!(Type::None.size(), Err(InternalError::Sizeless(Type::None)));
    }

    #[test]
    fn test_pointer_round_trip() {
        for t in [Type::Void, Type::Char, Type::Int, Type::Long] {
            let p = t.pointer_to().unwrap();
            assert!(p.is_pointer());
            assert_eq!(p.pointee(), Ok(t));
        }
    }

    #[test]
    fn test_invalid_pointer_operands() {
        assert_eq!(
            Type::IntPtr.pointer_to(),
            Err(InternalError::NoPointerType(Type::IntPtr))
        );
        assert_eq!(Type::None.pointer_to(), Err(InternalError::NoPointerType(Type::None)));
        assert_eq!(Type::Int.pointee(), Err(InternalError::NotAPointer(Type::Int)));
    }

    #[test]
    fn test_void_is_incompatible() {
        assert_eq!(compatible(Type::Void, Type::Int, Direction::Either), None);
        assert_eq!(compatible(Type::Int, Type::Void, Direction::Either), None);
        assert_eq!(compatible(Type::Void, Type::Void, Direction::Either), None);
        assert_eq!(compatible(Type::None, Type::Int, Direction::Either), None);
    }

    #[test]
    fn test_same_types() {
        for t in [Type::Char, Type::Int, Type::Long, Type::IntPtr] {
            assert_eq!(compatible(t, t, Direction::LeftIntoRight), Some(Coercion::None));
        }
    }

    #[test]
    fn test_widening_only_touches_narrower_side() {
        assert_eq!(
            compatible(Type::Char, Type::Int, Direction::Either),
            Some(Coercion::WidenLeft)
        );
        assert_eq!(
            compatible(Type::Long, Type::Int, Direction::Either),
            Some(Coercion::WidenRight)
        );
        assert_eq!(wider(Type::Char, Type::Int), Type::Int);
        assert_eq!(wider(Type::Long, Type::Char), Type::Long);
        assert_eq!(wider(Type::Int, Type::Int), Type::Int);
    }

    #[test]
    fn test_no_narrowing_into_right() {
        // int value into char destination
        assert_eq!(compatible(Type::Int, Type::Char, Direction::LeftIntoRight), None);
        // char value into int destination
        assert_eq!(
            compatible(Type::Char, Type::Int, Direction::LeftIntoRight),
            Some(Coercion::WidenLeft)
        );
    }

    #[test]
    fn test_pointers() {
        assert_eq!(compatible(Type::IntPtr, Type::CharPtr, Direction::Either), None);
        assert_eq!(
            compatible(Type::IntPtr, Type::Long, Direction::LeftIntoRight),
            Some(Coercion::None)
        );
        assert_eq!(
            compatible(Type::Int, Type::IntPtr, Direction::Either),
            Some(Coercion::WidenLeft)
        );
    }
}
