//! The key codec for assembly symbols.

use lumenc_table::{component::Name, GlobalID, Table};

use crate::{
    set::Candidates,
    stream::{Reader, Writer},
    KeyCodec, KeyError,
};

/// Encodes an assembly as its name alone; assemblies are the roots of the
/// containment chain.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct AssemblyCodec;

impl KeyCodec for AssemblyCodec {
    fn encode(
        &self,
        table: &Table,
        id: GlobalID,
        writer: &mut Writer,
    ) -> Result<(), KeyError> {
        let name =
            table.get::<Name>(id).ok_or(KeyError::DanglingSymbol(id))?;

        writer.write_string(&name);

        Ok(())
    }

    fn resolve(
        &self,
        table: &Table,
        reader: &mut Reader,
        candidates: &mut Candidates,
    ) -> Result<(), KeyError> {
        let name = reader.read_string()?;

        if let Some(assembly) = table.assembly_by_name(name) {
            candidates.insert(assembly);
        }

        Ok(())
    }
}
