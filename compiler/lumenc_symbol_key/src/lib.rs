//! The symbolic identity codec of the symbol-analysis layer.
//!
//! A [`SymbolKey`] is a portable, structurally self-describing identity of
//! a symbol: an ordered token sequence encoding the symbol's whole
//! containment chain with no reference to the table that produced it. A
//! key encoded against one [`Table`] can later be resolved against a
//! different but structurally related table, yielding a *candidate set* of
//! matching symbols rather than assuming a unique answer — including
//! synthesizing placeholder namespaces for references that do not actually
//! resolve.
//!
//! Both operations are pure traversals over an immutable snapshot of the
//! table (synthesis allocates fresh symbols but mutates nothing existing),
//! so keys may be encoded and resolved concurrently from multiple threads.

use lumenc_table::{component::SymbolKind, GlobalID, Table};
use serde::{Deserialize, Serialize};

use crate::{
    assembly::AssemblyCodec, module::ModuleCodec, namespace::NamespaceCodec,
    stream::{Reader, Token, Writer},
};

pub mod set;
pub mod stream;

mod assembly;
mod module;
mod namespace;

/// The error type for structurally invalid keys and unencodable symbols.
///
/// Resolution ambiguity or absence is never an error; it is reported as
/// the size of the candidate set.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    thiserror::Error,
    displaydoc::Display,
)]
pub enum KeyError {
    /// the token stream ended before the expected token
    UnexpectedEnd,

    /// expected a string token at position {0}
    ExpectedString(usize),

    /// expected a boolean token at position {0}
    ExpectedBool(usize),

    /// expected a nested identity or the null sentinel at position {0}
    ExpectedKey(usize),

    /// the symbol `{0:?}` has no components in the table
    DanglingSymbol(GlobalID),

    /// symbols of kind {0:?} have no key codec
    UnsupportedKind(SymbolKind),
}

/// The symbol kinds that have a key codec, written as the tag of every
/// nested identity so the reader knows which codec to dispatch to.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
)]
#[allow(missing_docs)]
pub enum KeyKind {
    Assembly,
    Module,
    Namespace,
}

impl KeyKind {
    /// Gets the codec responsible for this kind of symbol.
    #[must_use]
    pub fn codec(self) -> &'static dyn KeyCodec {
        match self {
            Self::Assembly => &AssemblyCodec,
            Self::Module => &ModuleCodec,
            Self::Namespace => &NamespaceCodec,
        }
    }
}

impl TryFrom<SymbolKind> for KeyKind {
    type Error = KeyError;

    fn try_from(kind: SymbolKind) -> Result<Self, KeyError> {
        match kind {
            SymbolKind::Assembly => Ok(Self::Assembly),
            SymbolKind::Module => Ok(Self::Module),
            SymbolKind::Namespace => Ok(Self::Namespace),
            SymbolKind::Type => Err(KeyError::UnsupportedKind(kind)),
        }
    }
}

/// The encode/resolve pair a symbol kind supplies to the codec.
///
/// The containment chain is encoded through mutual recursion: a codec
/// writes its own fields, then hands the containing symbol back to
/// [`Writer::write_symbol_key`], which dispatches to the containing
/// symbol's codec — and symmetrically on the way back through
/// [`Reader::read_symbol_key`]. Recursion depth is bounded by namespace
/// nesting depth.
pub trait KeyCodec: Send + Sync {
    /// Writes the identity of `id` onto the writer.
    ///
    /// Two structurally equivalent symbols in different tables encode
    /// identically; the tokens carry no symbol IDs.
    ///
    /// # Errors
    ///
    /// See [`KeyError`] for the structural failure modes.
    fn encode(
        &self,
        table: &Table,
        id: GlobalID,
        writer: &mut Writer,
    ) -> Result<(), KeyError>;

    /// Reads this codec's fields from the reader and accumulates every
    /// plausibly matching symbol of `table` into `candidates`.
    ///
    /// An empty candidate set is a legitimate "no match", never an error.
    ///
    /// # Errors
    ///
    /// See [`KeyError`] for the structural failure modes.
    fn resolve(
        &self,
        table: &Table,
        reader: &mut Reader,
        candidates: &mut set::Candidates,
    ) -> Result<(), KeyError>;
}

/// The portable, order-sensitive token encoding of a symbol's containment
/// chain.
///
/// Produced by [`SymbolKey::of`]; resolved — possibly against a different
/// table — by [`SymbolKey::resolve`]. Keys serialize through `serde` for
/// embedding in larger identity streams.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SymbolKey(Vec<Token>);

impl SymbolKey {
    /// Encodes the identity of the given symbol.
    ///
    /// # Errors
    ///
    /// - [`KeyError::DanglingSymbol`]: a symbol on the containment chain
    ///   has no components in the table.
    /// - [`KeyError::UnsupportedKind`]: a symbol on the containment chain
    ///   has no key codec.
    pub fn of(table: &Table, id: GlobalID) -> Result<Self, KeyError> {
        let mut writer = Writer::default();
        writer.write_symbol_key(table, Some(id))?;

        Ok(Self(writer.into_tokens()))
    }

    /// Resolves the key against the given table, returning the set of
    /// symbols plausibly matching it.
    ///
    /// The returned buffer is drawn from a scratch pool and goes back to
    /// it when dropped.
    ///
    /// # Errors
    ///
    /// Returns a [`KeyError`] only for a malformed token sequence; for a
    /// well-formed key that matches nothing the candidate set is simply
    /// empty.
    pub fn resolve(&self, table: &Table) -> Result<set::Pooled, KeyError> {
        let mut candidates = set::Candidates::acquire();

        Reader::new(&self.0).read_symbol_key(table, &mut candidates)?;

        Ok(candidates)
    }

    /// Views the raw token sequence.
    #[must_use]
    pub fn tokens(&self) -> &[Token] { &self.0 }
}

impl From<Vec<Token>> for SymbolKey {
    fn from(tokens: Vec<Token>) -> Self { Self(tokens) }
}

#[cfg(test)]
mod test;
