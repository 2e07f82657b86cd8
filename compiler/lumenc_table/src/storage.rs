//! Type-erased component storage keyed by [`GlobalID`].

use std::{
    any::{Any, TypeId},
    collections::{hash_map::Entry, HashMap},
    sync::Arc,
};

use parking_lot::RwLock;

use crate::GlobalID;

/// Stores the components of every symbol in the table.
///
/// Components are type-erased behind `Arc<dyn Any>` and keyed by the pair
/// of symbol ID and component type. The map sits behind a [`RwLock`] so
/// reads from multiple threads are concurrent and new components (notably
/// synthesized missing namespaces) can be added through `&self`.
#[derive(Default)]
pub(crate) struct Storage {
    components: RwLock<HashMap<(GlobalID, TypeId), Arc<dyn Any + Send + Sync>>>,
}

impl Storage {
    /// Adds a component to the symbol with the given ID.
    ///
    /// Returns `false` if the symbol already has a component of this type.
    pub(crate) fn add<T: Any + Send + Sync>(
        &self,
        id: GlobalID,
        component: T,
    ) -> bool {
        match self.components.write().entry((id, TypeId::of::<T>())) {
            Entry::Occupied(_) => false,
            Entry::Vacant(entry) => {
                entry.insert(Arc::new(component));
                true
            }
        }
    }

    /// Gets the component of the given type from the symbol with the given
    /// ID.
    pub(crate) fn get<T: Any + Send + Sync>(
        &self,
        id: GlobalID,
    ) -> Option<Arc<T>> {
        self.components
            .read()
            .get(&(id, TypeId::of::<T>()))
            .cloned()
            .and_then(|component| component.downcast::<T>().ok())
    }

    /// Updates the component of the given type in place, cloning it first
    /// if it is currently shared.
    ///
    /// Returns `false` if the symbol has no component of this type.
    pub(crate) fn update<T: Any + Send + Sync + Clone>(
        &self,
        id: GlobalID,
        f: impl FnOnce(&mut T),
    ) -> bool {
        let mut components = self.components.write();

        let Some(slot) = components.get_mut(&(id, TypeId::of::<T>())) else {
            return false;
        };
        let Ok(mut component) = slot.clone().downcast::<T>() else {
            return false;
        };

        f(Arc::make_mut(&mut component));
        *slot = component;

        true
    }
}

impl std::fmt::Debug for Storage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Storage").finish_non_exhaustive()
    }
}
