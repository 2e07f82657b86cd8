//! Contains the definition of [`Table`], the compilation context used by
//! the symbol-analysis layer.
//!
//! The table stores every symbol the compilation knows about — assemblies,
//! modules, namespaces, and types — as a [`GlobalID`] with a set of
//! components attached (see [`component`]). It exposes the operations the
//! identity codec relies on: member lookup, global-namespace access, and
//! synthesis of placeholder namespaces for error recovery.

use std::{
    collections::HashMap,
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc,
    },
};

use derive_new::new;
use serde::{Deserialize, Serialize};

use crate::{
    component::{
        GlobalNamespace, Member, Missing, Name, NamespaceExtent, Parent,
        SymbolKind,
    },
    storage::Storage,
};

pub mod component;

mod storage;

/// Represents an identifier for a target.
///
/// Each referenced assembly forms its own target; the compilation itself
/// is the [`TargetID::COMPILATION`] target.
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
pub struct TargetID(pub u64);

impl TargetID {
    /// The target representing the compilation itself.
    pub const COMPILATION: Self = Self(0);
}

/// Represents an identifier for a symbol within a target.
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
pub struct ID(pub usize);

impl ID {
    /// The root symbol of a target: the compilation-wide global namespace
    /// for the [`TargetID::COMPILATION`] target, the assembly symbol for
    /// every other target.
    pub const ROOT: Self = Self(0);
}

/// Represents an identifier for a symbol across the targets.
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
    new,
)]
pub struct GlobalID {
    /// The target in which the symbol is defined.
    pub target_id: TargetID,

    /// The identifier of the symbol within the target.
    pub id: ID,
}

/// Represents a single compilation target.
#[derive(Debug, Default)]
struct Target {
    generated_ids: AtomicUsize,
}

impl Target {
    /// Generates an ID for a new symbol that will be defined within the
    /// target.
    ///
    /// Works through `&self` so symbols can be synthesized while the table
    /// is shared.
    fn generate_id(&self) -> ID {
        ID(self.generated_ids.fetch_add(1, Ordering::Relaxed))
    }
}

/// The error type returned by the symbol-creating operations of [`Table`].
#[derive(
    Debug,
    Clone,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    thiserror::Error,
    displaydoc::Display,
)]
pub enum AddSymbolError {
    /// the assembly name `{0}` is already in use
    DuplicateAssemblyName(String),

    /// the symbol `{0:?}` does not exist in the table
    UnknownSymbol(GlobalID),

    /// expected a symbol of kind {expected:?} but found {found:?}
    UnexpectedSymbolKind {
        /// The kind the operation requires.
        expected: SymbolKind,

        /// The kind the given symbol actually has.
        found: SymbolKind,
    },
}

/// The compilation context: every symbol of the compilation and its
/// referenced assemblies, with their components.
///
/// All lookup operations and [`Table::create_missing_namespace`] take
/// `&self` and are safe to call concurrently; construction of declared
/// symbols takes `&mut self`.
pub struct Table {
    storage: Storage,
    targets_by_id: HashMap<TargetID, Target>,
    targets_by_name: HashMap<String, TargetID>,
    next_target: u64,
}

impl Default for Table {
    fn default() -> Self { Self::new() }
}

impl std::fmt::Debug for Table {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Table")
            .field("targets_by_name", &self.targets_by_name)
            .finish_non_exhaustive()
    }
}

impl Table {
    /// Creates a new [`Table`] containing only the compilation-wide global
    /// namespace.
    #[must_use]
    pub fn new() -> Self {
        let mut table = Self {
            storage: Storage::default(),
            targets_by_id: HashMap::new(),
            targets_by_name: HashMap::new(),
            next_target: 1,
        };

        let compilation = Target::default();
        let global = GlobalID::new(
            TargetID::COMPILATION,
            compilation.generate_id(),
        );

        assert!(table
            .targets_by_id
            .insert(TargetID::COMPILATION, compilation)
            .is_none());

        assert!(table.storage.add(global, Name::default()));
        assert!(table.storage.add(global, SymbolKind::Namespace));
        assert!(table.storage.add(global, NamespaceExtent::CompilationGlobal));
        assert!(table.storage.add(global, Member::default()));

        table
    }

    /// Gets the compilation-wide global namespace.
    #[must_use]
    pub const fn global_namespace(&self) -> GlobalID {
        GlobalID { target_id: TargetID::COMPILATION, id: ID::ROOT }
    }

    /// Gets the component of the given type from the symbol with the given
    /// ID.
    #[must_use]
    pub fn get<T: std::any::Any + Send + Sync>(
        &self,
        id: GlobalID,
    ) -> Option<Arc<T>> {
        self.storage.get::<T>(id)
    }

    /// Gets the kind of the symbol with the given ID.
    #[must_use]
    pub fn kind_of(&self, id: GlobalID) -> Option<SymbolKind> {
        self.storage.get::<SymbolKind>(id).as_deref().copied()
    }

    /// Gets the parent symbol of the given symbol.
    #[must_use]
    pub fn parent_of(&self, id: GlobalID) -> Option<GlobalID> {
        self.storage
            .get::<Parent>(id)
            .map(|parent| GlobalID::new(id.target_id, **parent))
    }

    /// Gets the global namespace owned by the given assembly or module
    /// symbol.
    #[must_use]
    pub fn global_namespace_of(&self, id: GlobalID) -> Option<GlobalID> {
        self.storage
            .get::<GlobalNamespace>(id)
            .map(|namespace| GlobalID::new(id.target_id, **namespace))
    }

    /// Gets the assembly symbol with the given name.
    #[must_use]
    pub fn assembly_by_name(&self, name: &str) -> Option<GlobalID> {
        self.targets_by_name
            .get(name)
            .map(|&target_id| GlobalID::new(target_id, ID::ROOT))
    }

    /// Searches for every member with the given name in the given symbol.
    ///
    /// Returns an empty list if the symbol does not exist, has no
    /// [`Member`] component, or has no member under that name.
    #[must_use]
    pub fn members_named(&self, id: GlobalID, name: &str) -> Vec<GlobalID> {
        self.storage.get::<Member>(id).map_or_else(Vec::new, |members| {
            members
                .get(name)
                .into_iter()
                .flatten()
                .map(|&member| GlobalID::new(id.target_id, member))
                .collect()
        })
    }

    /// Adds a referenced assembly with the given name to the table.
    ///
    /// The assembly receives its own target and its own global namespace.
    ///
    /// # Errors
    ///
    /// Returns [`AddSymbolError::DuplicateAssemblyName`] if an assembly
    /// with the same name already exists.
    pub fn add_assembly(
        &mut self,
        name: impl Into<String>,
    ) -> Result<GlobalID, AddSymbolError> {
        let name = name.into();

        if self.targets_by_name.contains_key(&name) {
            return Err(AddSymbolError::DuplicateAssemblyName(name));
        }

        let target_id = TargetID(self.next_target);
        self.next_target += 1;

        let target = Target::default();
        let assembly = GlobalID::new(target_id, target.generate_id());
        let global = GlobalID::new(target_id, target.generate_id());

        assert!(self.targets_by_id.insert(target_id, target).is_none());
        assert!(self
            .targets_by_name
            .insert(name.clone(), target_id)
            .is_none());

        assert!(self.storage.add(assembly, Name(name)));
        assert!(self.storage.add(assembly, SymbolKind::Assembly));
        assert!(self.storage.add(assembly, Member::default()));
        assert!(self.storage.add(assembly, GlobalNamespace(global.id)));

        assert!(self.storage.add(global, Name::default()));
        assert!(self.storage.add(global, SymbolKind::Namespace));
        assert!(self
            .storage
            .add(global, NamespaceExtent::AssemblyGlobal(assembly.id)));
        assert!(self.storage.add(global, Member::default()));

        Ok(assembly)
    }

    /// Adds a module with the given name to the given assembly.
    ///
    /// The module receives its own global namespace.
    ///
    /// # Errors
    ///
    /// - [`AddSymbolError::UnknownSymbol`]: `assembly` is not in the table.
    /// - [`AddSymbolError::UnexpectedSymbolKind`]: `assembly` is not an
    ///   assembly symbol.
    pub fn add_module(
        &mut self,
        assembly: GlobalID,
        name: impl Into<String>,
    ) -> Result<GlobalID, AddSymbolError> {
        self.expect_kind(assembly, SymbolKind::Assembly)?;

        let module = self.new_symbol_in(assembly.target_id);
        let global = self.new_symbol_in(assembly.target_id);
        let name = name.into();

        assert!(self.storage.add(module, Name(name.clone())));
        assert!(self.storage.add(module, SymbolKind::Module));
        assert!(self.storage.add(module, Parent(assembly.id)));
        assert!(self.storage.add(module, GlobalNamespace(global.id)));

        assert!(self.storage.add(global, Name::default()));
        assert!(self.storage.add(global, SymbolKind::Namespace));
        assert!(self
            .storage
            .add(global, NamespaceExtent::ModuleGlobal(module.id)));
        assert!(self.storage.add(global, Member::default()));

        assert!(self.storage.update::<Member>(assembly, |members| {
            members.entry(name).or_default().push(module.id);
        }));

        Ok(module)
    }

    /// Adds an ordinary namespace with the given name under the given
    /// parent namespace.
    ///
    /// Two same-named namespaces may coexist under one parent; merging of
    /// declarations is the concern of whoever builds the table, and member
    /// lookup reports every one of them.
    ///
    /// # Errors
    ///
    /// - [`AddSymbolError::UnknownSymbol`]: `parent` is not in the table.
    /// - [`AddSymbolError::UnexpectedSymbolKind`]: `parent` is not a
    ///   namespace symbol.
    pub fn add_namespace(
        &mut self,
        parent: GlobalID,
        name: impl Into<String>,
    ) -> Result<GlobalID, AddSymbolError> {
        self.expect_kind(parent, SymbolKind::Namespace)?;

        let namespace = self.new_symbol_in(parent.target_id);
        let name = name.into();

        assert!(self.storage.add(namespace, Name(name.clone())));
        assert!(self.storage.add(namespace, SymbolKind::Namespace));
        assert!(self.storage.add(namespace, NamespaceExtent::Nested));
        assert!(self.storage.add(namespace, Parent(parent.id)));
        assert!(self.storage.add(namespace, Member::default()));

        assert!(self.storage.update::<Member>(parent, |members| {
            members.entry(name).or_default().push(namespace.id);
        }));

        Ok(namespace)
    }

    /// Adds a type symbol with the given name under the given parent
    /// namespace.
    ///
    /// # Errors
    ///
    /// - [`AddSymbolError::UnknownSymbol`]: `parent` is not in the table.
    /// - [`AddSymbolError::UnexpectedSymbolKind`]: `parent` is not a
    ///   namespace symbol.
    pub fn add_type(
        &mut self,
        parent: GlobalID,
        name: impl Into<String>,
    ) -> Result<GlobalID, AddSymbolError> {
        self.expect_kind(parent, SymbolKind::Namespace)?;

        let type_symbol = self.new_symbol_in(parent.target_id);
        let name = name.into();

        assert!(self.storage.add(type_symbol, Name(name.clone())));
        assert!(self.storage.add(type_symbol, SymbolKind::Type));
        assert!(self.storage.add(type_symbol, Parent(parent.id)));

        assert!(self.storage.update::<Member>(parent, |members| {
            members.entry(name).or_default().push(type_symbol.id);
        }));

        Ok(type_symbol)
    }

    /// Synthesizes a placeholder namespace with the given name under the
    /// given parent namespace.
    ///
    /// The new symbol carries the [`Missing`] marker and is **not**
    /// registered as a member of `parent`; no existing symbol is mutated.
    /// Each call allocates a fresh symbol, so repeated synthesis yields
    /// distinct IDs that are structurally equal (see
    /// [`Table::namespaces_structurally_equal`]).
    #[must_use]
    pub fn create_missing_namespace(
        &self,
        parent: GlobalID,
        name: &str,
    ) -> GlobalID {
        debug_assert_eq!(self.kind_of(parent), Some(SymbolKind::Namespace));

        let namespace = self.new_symbol_in(parent.target_id);

        assert!(self.storage.add(namespace, Name(name.to_owned())));
        assert!(self.storage.add(namespace, SymbolKind::Namespace));
        assert!(self.storage.add(namespace, NamespaceExtent::Nested));
        assert!(self.storage.add(namespace, Parent(parent.id)));
        assert!(self.storage.add(namespace, Member::default()));
        assert!(self.storage.add(namespace, Missing));

        namespace
    }

    /// Gets the qualified name of the symbol such as `System.Text`.
    ///
    /// Global namespaces contribute nothing to the name, so the qualified
    /// name of a symbol directly under a global namespace is just its own
    /// name.
    ///
    /// # Returns
    ///
    /// Returns `None` if the `id` is not found.
    #[must_use]
    pub fn get_qualified_name(&self, mut id: GlobalID) -> Option<String> {
        let mut qualified_name = String::new();

        loop {
            let current_name = self.storage.get::<Name>(id)?;

            if !current_name.is_empty() {
                if !qualified_name.is_empty() {
                    qualified_name.insert(0, '.');
                }
                qualified_name.insert_str(0, &current_name);
            }

            if let Some(parent_id) = self.parent_of(id) {
                id = parent_id;
            } else {
                break;
            }
        }

        Some(qualified_name)
    }

    /// Checks whether two namespace symbols are structurally equal: same
    /// name and structurally equal containment chains.
    ///
    /// This is the correctness criterion for synthesized missing
    /// namespaces, which never compare identical by ID.
    #[must_use]
    pub fn namespaces_structurally_equal(
        &self,
        first: GlobalID,
        second: GlobalID,
    ) -> bool {
        if first == second {
            return true;
        }

        if self.kind_of(first) != Some(SymbolKind::Namespace)
            || self.kind_of(second) != Some(SymbolKind::Namespace)
        {
            return false;
        }

        if self.storage.get::<Name>(first) != self.storage.get::<Name>(second)
        {
            return false;
        }

        let (Some(first_extent), Some(second_extent)) = (
            self.storage.get::<NamespaceExtent>(first),
            self.storage.get::<NamespaceExtent>(second),
        ) else {
            return false;
        };

        match (*first_extent, *second_extent) {
            (NamespaceExtent::Nested, NamespaceExtent::Nested) => {
                match (self.parent_of(first), self.parent_of(second)) {
                    (Some(first_parent), Some(second_parent)) => self
                        .namespaces_structurally_equal(
                            first_parent,
                            second_parent,
                        ),
                    _ => false,
                }
            }

            (
                NamespaceExtent::CompilationGlobal,
                NamespaceExtent::CompilationGlobal,
            ) => true,

            (
                NamespaceExtent::AssemblyGlobal(first_owner),
                NamespaceExtent::AssemblyGlobal(second_owner),
            )
            | (
                NamespaceExtent::ModuleGlobal(first_owner),
                NamespaceExtent::ModuleGlobal(second_owner),
            ) => {
                self.storage
                    .get::<Name>(GlobalID::new(first.target_id, first_owner))
                    == self.storage.get::<Name>(GlobalID::new(
                        second.target_id,
                        second_owner,
                    ))
            }

            _ => false,
        }
    }

    fn new_symbol_in(&self, target_id: TargetID) -> GlobalID {
        let target = self
            .targets_by_id
            .get(&target_id)
            .expect("symbol belongs to a registered target");

        GlobalID::new(target_id, target.generate_id())
    }

    fn expect_kind(
        &self,
        id: GlobalID,
        expected: SymbolKind,
    ) -> Result<(), AddSymbolError> {
        let found =
            self.kind_of(id).ok_or(AddSymbolError::UnknownSymbol(id))?;

        if found == expected {
            Ok(())
        } else {
            Err(AddSymbolError::UnexpectedSymbolKind { expected, found })
        }
    }
}
