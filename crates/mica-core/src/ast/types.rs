//! Type model for type-checked Mica expressions.
//!
//! A closed set of variants with capability queries; consumers match
//! exhaustively instead of downcasting.

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Type {
    Elementary(ElementaryType),
    Array(ArrayType),
    Mapping(Box<Type>, Box<Type>),
    Function(FunctionType),
    Magic(MagicKind),
    /// Type of expressions that produce no value (e.g. calls to functions
    /// without returns).
    Unit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementaryType {
    Uint256,
    Bool,
    Address,
}

/// Where reference-typed data lives at runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataLocation {
    Storage,
    Memory,
    Calldata,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArrayType {
    pub element: Box<Type>,
    pub location: DataLocation,
    pub dynamically_sized: bool,
    /// Fixed element count for statically sized arrays.
    pub length: Option<u64>,
    /// True for rebindable references into storage (local storage
    /// pointers), false for the state variable itself.
    pub is_pointer: bool,
}

impl ArrayType {
    pub fn stored_in(&self, location: DataLocation) -> bool {
        self.location == location
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StateMutability {
    Pure,
    View,
    NonPayable,
    Payable,
}

impl StateMutability {
    /// True for mutabilities that cannot modify storage.
    pub fn is_view_or_pure(self) -> bool {
        matches!(self, StateMutability::Pure | StateMutability::View)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionType {
    pub parameters: Vec<Type>,
    pub returns: Vec<Type>,
    pub mutability: StateMutability,
}

/// Built-in context objects (`msg`, `block`, `tx`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MagicKind {
    Message,
    Block,
    Transaction,
}

impl Type {
    pub fn uint256() -> Self {
        Type::Elementary(ElementaryType::Uint256)
    }

    pub fn bool() -> Self {
        Type::Elementary(ElementaryType::Bool)
    }

    pub fn address() -> Self {
        Type::Elementary(ElementaryType::Address)
    }

    pub fn is_array(&self) -> bool {
        matches!(self, Type::Array(_))
    }

    pub fn as_array(&self) -> Option<&ArrayType> {
        match self {
            Type::Array(a) => Some(a),
            _ => None,
        }
    }

    /// True if this is reference-typed data living in `location`.
    pub fn data_stored_in(&self, location: DataLocation) -> bool {
        match self {
            Type::Array(a) => a.location == location,
            Type::Elementary(_)
            | Type::Mapping(_, _)
            | Type::Function(_)
            | Type::Magic(_)
            | Type::Unit => false,
        }
    }

    /// True for reference types whose value can be re-pointed to a
    /// different underlying location during execution.
    pub fn is_pointer(&self) -> bool {
        match self {
            Type::Array(a) => a.is_pointer,
            _ => false,
        }
    }

    pub fn as_function(&self) -> Option<&FunctionType> {
        match self {
            Type::Function(f) => Some(f),
            _ => None,
        }
    }
}
