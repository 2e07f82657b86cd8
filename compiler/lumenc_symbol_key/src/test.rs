use lumenc_table::{component::SymbolKind, GlobalID, Table};
use proptest::{prop_assert, prop_assert_eq, proptest};

use crate::{
    set::Candidates,
    stream::Token,
    KeyError, KeyKind, SymbolKey,
};

fn singleton(key: &SymbolKey, table: &Table) -> GlobalID {
    let candidates = key.resolve(table).unwrap();
    assert_eq!(candidates.len(), 1, "{:?}", candidates.as_slice());

    candidates.first().unwrap()
}

#[test]
fn compilation_global_round_trip() {
    let table = Table::new();
    let global = table.global_namespace();

    let key = SymbolKey::of(&table, global).unwrap();

    assert_eq!(singleton(&key, &table), global);
}

#[test]
fn ordinary_namespace_round_trip() {
    let mut table = Table::new();
    let global = table.global_namespace();
    let system = table.add_namespace(global, "System").unwrap();
    let text = table.add_namespace(system, "Text").unwrap();

    let key = SymbolKey::of(&table, text).unwrap();

    assert_eq!(singleton(&key, &table), text);
    assert_eq!(singleton(&SymbolKey::of(&table, system).unwrap(), &table), system);
}

#[test]
fn namespace_key_token_order_is_stable() {
    let mut table = Table::new();
    let global = table.global_namespace();
    let system = table.add_namespace(global, "System").unwrap();
    let text = table.add_namespace(system, "Text").unwrap();

    let key = SymbolKey::of(&table, text).unwrap();

    assert_eq!(key.tokens(), &[
        Token::Tag(KeyKind::Namespace),
        Token::Str("Text".to_owned()),
        Token::Bool(false),
        Token::Bool(false),
        Token::Tag(KeyKind::Namespace),
        Token::Str("System".to_owned()),
        Token::Bool(false),
        Token::Bool(false),
        Token::Tag(KeyKind::Namespace),
        Token::Str(String::new()),
        Token::Bool(false),
        Token::Bool(true),
        Token::None,
    ]);
}

#[test]
fn missing_namespace_resolves_to_a_fresh_synthesis() {
    let table = Table::new();
    let global = table.global_namespace();
    let missing = table.create_missing_namespace(global, "Foo");

    let key = SymbolKey::of(&table, missing).unwrap();

    let first = singleton(&key, &table);
    let second = singleton(&key, &table);

    // synthesis allocates fresh symbols; structural equality is the
    // correctness criterion
    assert_ne!(first, missing);
    assert!(table.namespaces_structurally_equal(first, missing));
    assert!(table.namespaces_structurally_equal(first, second));
    assert_eq!(table.parent_of(first), Some(global));

    // the parent was never mutated
    assert!(table.members_named(global, "Foo").is_empty());
}

#[test]
fn missing_namespace_without_namespace_parent_resolves_to_nothing() {
    let table = Table::new();

    // a missing-namespace key whose containing identity is the sentinel
    let key = SymbolKey::from(vec![
        Token::Tag(KeyKind::Namespace),
        Token::Str("Foo".to_owned()),
        Token::Bool(true),
        Token::Bool(false),
        Token::None,
    ]);

    assert!(key.resolve(&table).unwrap().is_empty());
}

#[test]
fn assembly_global_round_trip() {
    let mut table = Table::new();
    let assembly = table.add_assembly("corelib").unwrap();
    let global = table.global_namespace_of(assembly).unwrap();

    let key = SymbolKey::of(&table, global).unwrap();

    assert_eq!(singleton(&key, &table), global);
}

#[test]
fn module_global_round_trip() {
    let mut table = Table::new();
    let assembly = table.add_assembly("corelib").unwrap();
    let module = table.add_module(assembly, "runtime").unwrap();
    let global = table.global_namespace_of(module).unwrap();

    let key = SymbolKey::of(&table, global).unwrap();

    assert_eq!(singleton(&key, &table), global);
}

#[test]
fn namespace_under_assembly_global_round_trip() {
    let mut table = Table::new();
    let assembly = table.add_assembly("corelib").unwrap();
    let global = table.global_namespace_of(assembly).unwrap();
    let system = table.add_namespace(global, "System").unwrap();

    let key = SymbolKey::of(&table, system).unwrap();

    assert_eq!(singleton(&key, &table), system);
}

#[test]
fn ambiguous_containing_identity_yields_every_member() {
    let mut table = Table::new();
    let global = table.global_namespace();

    // two drifted declarations of `S`, each containing an `X`
    let first_s = table.add_namespace(global, "S").unwrap();
    let second_s = table.add_namespace(global, "S").unwrap();
    let first_x = table.add_namespace(first_s, "X").unwrap();
    let second_x = table.add_namespace(second_s, "X").unwrap();

    let key = SymbolKey::of(&table, first_x).unwrap();
    let candidates = key.resolve(&table).unwrap();

    assert_eq!(candidates.len(), 2);
    assert!(candidates.contains(first_x));
    assert!(candidates.contains(second_x));
}

#[test]
fn non_namespace_members_are_ignored() {
    let mut table = Table::new();
    let global = table.global_namespace();
    let namespace = table.add_namespace(global, "X").unwrap();
    table.add_type(global, "X").unwrap();

    let key = SymbolKey::of(&table, namespace).unwrap();

    assert_eq!(singleton(&key, &table), namespace);
}

#[test]
fn resolving_against_a_structurally_related_table() {
    let mut source = Table::new();
    let source_global = source.global_namespace();
    let source_system = source.add_namespace(source_global, "System").unwrap();
    let source_text = source.add_namespace(source_system, "Text").unwrap();

    let key = SymbolKey::of(&source, source_text).unwrap();

    // the resolving table was built independently and has drifted
    let mut target = Table::new();
    let target_global = target.global_namespace();
    let target_system = target.add_namespace(target_global, "System").unwrap();
    let target_text = target.add_namespace(target_system, "Text").unwrap();
    target.add_namespace(target_system, "Json").unwrap();

    assert_eq!(singleton(&key, &target), target_text);
}

#[test]
fn unresolvable_key_yields_an_empty_set() {
    let mut source = Table::new();
    let global = source.global_namespace();
    let nowhere = source.add_namespace(global, "Nowhere").unwrap();

    let key = SymbolKey::of(&source, nowhere).unwrap();
    let target = Table::new();

    assert!(key.resolve(&target).unwrap().is_empty());
}

#[test]
fn type_symbols_have_no_codec() {
    let mut table = Table::new();
    let global = table.global_namespace();
    let type_symbol = table.add_type(global, "Widget").unwrap();

    assert_eq!(
        SymbolKey::of(&table, type_symbol),
        Err(KeyError::UnsupportedKind(SymbolKind::Type))
    );
}

#[test]
fn malformed_streams_are_structural_errors() {
    let table = Table::new();

    assert_eq!(
        SymbolKey::from(vec![Token::Bool(true)]).resolve(&table).unwrap_err(),
        KeyError::ExpectedKey(0)
    );
    assert_eq!(
        SymbolKey::from(vec![Token::Tag(KeyKind::Namespace)])
            .resolve(&table)
            .unwrap_err(),
        KeyError::UnexpectedEnd
    );
    assert_eq!(
        SymbolKey::from(vec![
            Token::Tag(KeyKind::Namespace),
            Token::Str("X".to_owned()),
            Token::Str("Y".to_owned()),
        ])
        .resolve(&table)
        .unwrap_err(),
        KeyError::ExpectedBool(2)
    );
}

#[test]
fn pooled_buffers_come_back_cleared() {
    let mut first = Candidates::acquire();
    first.insert(GlobalID::new(
        lumenc_table::TargetID(7),
        lumenc_table::ID(7),
    ));
    assert_eq!(first.len(), 1);
    drop(first);

    let second = Candidates::acquire();
    assert!(second.is_empty());
}

#[test]
fn keys_serialize_through_ron() {
    let mut table = Table::new();
    let global = table.global_namespace();
    let system = table.add_namespace(global, "System").unwrap();

    let key = SymbolKey::of(&table, system).unwrap();
    let serialized = ron::to_string(&key).unwrap();
    let deserialized: SymbolKey = ron::from_str(&serialized).unwrap();

    assert_eq!(deserialized, key);
    assert_eq!(singleton(&deserialized, &table), system);
}

proptest! {
    #[test]
    fn arbitrary_chains_round_trip(
        names in proptest::collection::vec("[A-Za-z][A-Za-z0-9]{0,8}", 1..6)
    ) {
        let mut table = Table::new();
        let mut parent = table.global_namespace();

        for name in &names {
            parent = table.add_namespace(parent, name.as_str()).unwrap();
        }

        let key = SymbolKey::of(&table, parent).unwrap();
        let candidates = key.resolve(&table).unwrap();

        prop_assert!(candidates.contains(parent));
        prop_assert_eq!(candidates.len(), 1);
    }
}
