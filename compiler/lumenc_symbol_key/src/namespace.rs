//! The key codec for namespace symbols.

use lumenc_table::{
    component::{Missing, Name, NamespaceExtent, SymbolKind},
    GlobalID, Table,
};

use crate::{
    set::Candidates,
    stream::{Reader, Writer},
    KeyCodec, KeyError,
};

/// Encodes a namespace as its metadata name, a missing flag, a
/// compilation-global flag, and the nested identity of whatever contains
/// it (containing namespace, owning module or assembly, or the null
/// sentinel for the compilation-wide global namespace).
///
/// The token order is the compatibility surface; new fields must not
/// change the order of the existing four.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct NamespaceCodec;

impl KeyCodec for NamespaceCodec {
    fn encode(
        &self,
        table: &Table,
        id: GlobalID,
        writer: &mut Writer,
    ) -> Result<(), KeyError> {
        let name =
            table.get::<Name>(id).ok_or(KeyError::DanglingSymbol(id))?;

        writer.write_string(&name);

        if table.get::<Missing>(id).is_some() {
            writer.write_bool(true);
            // The original encoder conflated "compilation global" with
            // "empty name" on this branch; the flag is kept bit-for-bit
            // compatible.
            writer.write_bool(name.is_empty());
            return writer.write_symbol_key(table, table.parent_of(id));
        }

        writer.write_bool(false);

        let extent = *table
            .get::<NamespaceExtent>(id)
            .ok_or(KeyError::DanglingSymbol(id))?;

        match extent {
            NamespaceExtent::Nested => {
                writer.write_bool(false);
                writer.write_symbol_key(table, table.parent_of(id))
            }

            NamespaceExtent::ModuleGlobal(owner)
            | NamespaceExtent::AssemblyGlobal(owner) => {
                writer.write_bool(false);
                writer.write_symbol_key(
                    table,
                    Some(GlobalID::new(id.target_id, owner)),
                )
            }

            NamespaceExtent::CompilationGlobal => {
                writer.write_bool(true);
                writer.write_symbol_key(table, None)
            }
        }
    }

    fn resolve(
        &self,
        table: &Table,
        reader: &mut Reader,
        candidates: &mut Candidates,
    ) -> Result<(), KeyError> {
        let metadata_name = reader.read_string()?;
        let is_missing = reader.read_bool()?;
        let is_compilation_global = reader.read_bool()?;

        let mut containing = Candidates::acquire();
        reader.read_symbol_key(table, &mut containing)?;

        log::trace!(
            "resolving namespace key `{metadata_name}` against {} containing \
             candidate(s)",
            containing.len()
        );

        if is_compilation_global {
            candidates.insert(table.global_namespace());
            return Ok(());
        }

        if is_missing {
            let parent = containing.iter().find(|&id| {
                table.kind_of(id).is_some_and(|kind| kind.is_namespace())
            });

            if let Some(parent) = parent {
                candidates
                    .insert(table.create_missing_namespace(parent, metadata_name));
            }

            return Ok(());
        }

        for candidate in containing.iter() {
            let Some(kind) = table.kind_of(candidate) else {
                continue;
            };

            match kind {
                SymbolKind::Assembly | SymbolKind::Module => {
                    assert!(
                        metadata_name.is_empty(),
                        "a global namespace key must carry an empty metadata \
                         name"
                    );

                    if let Some(global) = table.global_namespace_of(candidate)
                    {
                        candidates.insert(global);
                    }
                }

                SymbolKind::Namespace => {
                    for member in
                        table.members_named(candidate, metadata_name)
                    {
                        if table
                            .kind_of(member)
                            .is_some_and(|kind| kind.is_namespace())
                        {
                            candidates.insert(member);
                        }
                    }
                }

                // legitimate ambiguity: the containing identity resolved
                // to an unrelated kind
                SymbolKind::Type => log::trace!(
                    "ignoring containing candidate {candidate:?} of kind {}",
                    kind.kind_str()
                ),
            }
        }

        Ok(())
    }
}
