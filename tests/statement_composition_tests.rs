// Integration tests for statement embedding and combination
use cypher_dsl::clauses::{Call, Create, Match, Union, Unwind, Use};
use cypher_dsl::expr::operators::eq;
use cypher_dsl::pattern::node;
use cypher_dsl::references::{NodeRef, Param, Variable};
use cypher_dsl::Statement;
use serde_json::json;

#[test]
fn test_call_subquery_shares_one_environment() {
    let person = NodeRef::new(["Person"]);
    let inner = Match::new(node(&person)).returns([&person]);
    let outer = Call::subquery(&inner).return_star();
    let compiled = outer.compile().unwrap();
    assert_eq!(
        compiled.text,
        "CALL {\n    MATCH (this0:`Person`)\n    RETURN this0\n}\nRETURN *"
    );
}

#[test]
fn test_compiling_from_the_embedded_side_yields_the_full_tree() {
    let person = NodeRef::new(["Person"]);
    let inner = Match::new(node(&person)).returns([&person]);
    let outer = Call::subquery(&inner);
    assert_eq!(inner.compile().unwrap(), outer.compile().unwrap());
}

#[test]
fn test_nested_embedding_compiles_from_the_deepest_node() {
    let person = NodeRef::new(["Person"]);
    let inner = Match::new(node(&person)).returns([&person]);
    let middle = Call::subquery(&inner);
    let outer = Call::subquery(&middle).return_star();
    let compiled = inner.compile().unwrap();
    assert_eq!(compiled, outer.compile().unwrap());
    assert!(compiled.text.starts_with("CALL {\n    CALL {"));
}

#[test]
fn test_reembedding_silently_overwrites_the_parent_link() {
    let person = NodeRef::new(["Person"]);
    let inner = Match::new(node(&person)).returns([&person]);
    {
        let first = Call::subquery(&inner);
        assert!(first.compile().unwrap().text.starts_with("CALL {"));
    }
    // The first embedding is gone. Adopting the statement again replaces the
    // stale parent link without erroring, and the new parent wins when
    // compiling from the child. Intentional: re-parenting overwrites.
    let second = Call::subquery(&inner).return_star();
    let compiled = inner.compile().unwrap();
    assert_eq!(compiled, second.compile().unwrap());
    assert_eq!(
        compiled.text,
        "CALL {\n    MATCH (this0:`Person`)\n    RETURN this0\n}\nRETURN *"
    );
}

#[test]
fn test_union_branches_share_parameter_numbering() {
    let a = NodeRef::new(["Person"]);
    let pa = Param::new(json!("Keanu"));
    let left = Match::new(node(&a))
        .where_(eq(a.property("name"), &pa))
        .returns([&a]);

    let b = NodeRef::new(["Person"]);
    let pb = Param::new(json!("Carrie"));
    let right = Match::new(node(&b))
        .where_(eq(b.property("name"), &pb))
        .returns([&b]);

    let compiled = Union::new().add(&left).add(&right).compile().unwrap();
    assert_eq!(
        compiled.text,
        "MATCH (this0:`Person`)\nWHERE this0.name = $param0\nRETURN this0\nUNION\nMATCH (this1:`Person`)\nWHERE this1.name = $param1\nRETURN this1"
    );
    assert_eq!(compiled.parameters["param0"], json!("Keanu"));
    assert_eq!(compiled.parameters["param1"], json!("Carrie"));
}

#[test]
fn test_use_wraps_a_union() {
    let a = NodeRef::unlabeled();
    let left = Match::new(node(&a)).return_star();
    let b = NodeRef::unlabeled();
    let right = Match::new(node(&b)).return_star();
    let compiled = Use::new("graphdb", &Union::new_all().add(&left).add(&right))
        .compile()
        .unwrap();
    assert!(compiled.text.starts_with("USE graphdb\nMATCH"));
    assert!(compiled.text.contains("\nUNION ALL\n"));
}

#[test]
fn test_unwind_alias_shared_with_embedded_create() {
    let names = Param::new(json!(["a", "b"]));
    let name = Variable::new();
    let unwind = Unwind::new(&names, &name).returns([&name]);
    let compiled = unwind.compile().unwrap();
    assert_eq!(compiled.text, "UNWIND $param0 AS var0\nRETURN var0");
    assert_eq!(compiled.parameters["param0"], json!(["a", "b"]));

    // The same alias handle keeps its identity in another statement tree.
    let person = NodeRef::new(["Person"]);
    let create = Create::new(node(&person).with_properties([("name", &name)]));
    let compiled = Call::subquery(&create).compile().unwrap();
    assert_eq!(
        compiled.text,
        "CALL {\n    CREATE (this0:`Person` { name: var1 })\n}"
    );
}
