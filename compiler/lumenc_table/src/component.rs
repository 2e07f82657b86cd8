//! Contains all the definition of the components that can be attached to a
//! symbol.
//!
//! Components are small, independent pieces of data stored per symbol.
//! Which components a symbol carries depends on its [`SymbolKind`]; the
//! invariants are documented on each component.

use std::collections::HashMap;

use derive_more::{Deref, DerefMut};
use enum_as_inner::EnumAsInner;

use crate::ID;

/// A component representing the metadata name of a symbol.
///
/// The name is the empty string for every global namespace variant and
/// non-empty for everything else.
#[derive(
    Debug,
    Clone,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Default,
    Deref,
    DerefMut,
)]
pub struct Name(pub String);

/// A component storing the parent of the symbol.
///
/// Present on nested namespaces, missing namespaces, modules, and types;
/// absent on assemblies and on every global namespace.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Deref, DerefMut,
)]
pub struct Parent(pub ID);

/// A component storing the symbols defined in the scope of the current
/// symbol, indexed by name.
///
/// A single name may map to more than one symbol: a namespace and a type
/// can legitimately share a name, and two structurally drifted declarations
/// of the same namespace may coexist. Member lookups therefore always
/// return every symbol under the queried name.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deref, DerefMut)]
pub struct Member(pub HashMap<String, Vec<ID>>);

/// A component linking an assembly or module symbol to the global
/// namespace it owns.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Deref, DerefMut,
)]
pub struct GlobalNamespace(pub ID);

/// A marker component present on synthesized placeholder namespaces.
///
/// A missing namespace stands in for a namespace reference that does not
/// actually resolve in source. It carries a [`Name`] and a [`Parent`] like
/// an ordinary nested namespace, but is never registered as a member of
/// its parent.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default,
)]
pub struct Missing;

/// A component representing an enumeration of the different kinds of
/// symbols.
///
/// Every symbol has a kind.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    EnumAsInner,
)]
#[allow(missing_docs)]
pub enum SymbolKind {
    Assembly,
    Module,
    Namespace,
    Type,
}

impl SymbolKind {
    /// Checks if this kind of symbol has a [`Member`] component.
    #[must_use]
    pub const fn has_members(&self) -> bool {
        matches!(self, Self::Assembly | Self::Namespace)
    }

    /// Gets the description string of the kind.
    #[must_use]
    pub const fn kind_str(&self) -> &'static str {
        match self {
            Self::Assembly => "assembly",
            Self::Module => "module",
            Self::Namespace => "namespace",
            Self::Type => "type",
        }
    }
}

/// A component describing where a namespace sits in the containment
/// hierarchy.
///
/// Present on every namespace symbol. The three global variants are a
/// closed set: a global namespace is always the root of exactly one
/// module, assembly, or the whole compilation, and matching on this enum
/// is exhaustive, so an unmodeled namespace shape cannot reach encoding.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    EnumAsInner,
)]
pub enum NamespaceExtent {
    /// An ordinary namespace contained in another namespace; the symbol
    /// carries a [`Parent`] component.
    Nested,

    /// The global namespace of the module with the given ID.
    ModuleGlobal(ID),

    /// The global namespace of the assembly with the given ID.
    AssemblyGlobal(ID),

    /// The compilation-wide global namespace.
    CompilationGlobal,
}

impl NamespaceExtent {
    /// Checks if the namespace is one of the three global variants.
    #[must_use]
    pub const fn is_global(&self) -> bool { !matches!(self, Self::Nested) }
}
