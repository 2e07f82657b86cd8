//! The key codec for module symbols.

use lumenc_table::{component::Name, GlobalID, Table};

use crate::{
    set::Candidates,
    stream::{Reader, Writer},
    KeyCodec, KeyError,
};

/// Encodes a module as its name followed by the nested identity of its
/// owning assembly.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct ModuleCodec;

impl KeyCodec for ModuleCodec {
    fn encode(
        &self,
        table: &Table,
        id: GlobalID,
        writer: &mut Writer,
    ) -> Result<(), KeyError> {
        let name =
            table.get::<Name>(id).ok_or(KeyError::DanglingSymbol(id))?;

        writer.write_string(&name);
        writer.write_symbol_key(table, table.parent_of(id))
    }

    fn resolve(
        &self,
        table: &Table,
        reader: &mut Reader,
        candidates: &mut Candidates,
    ) -> Result<(), KeyError> {
        let name = reader.read_string()?;

        let mut containing = Candidates::acquire();
        reader.read_symbol_key(table, &mut containing)?;

        for candidate in containing.iter() {
            let Some(kind) = table.kind_of(candidate) else {
                continue;
            };

            if !kind.is_assembly() {
                log::trace!(
                    "ignoring containing candidate {candidate:?} of kind {}",
                    kind.kind_str()
                );
                continue;
            }

            for member in table.members_named(candidate, name) {
                if table.kind_of(member).is_some_and(|kind| kind.is_module())
                {
                    candidates.insert(member);
                }
            }
        }

        Ok(())
    }
}
