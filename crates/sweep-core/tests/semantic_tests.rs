//! Integration tests for the collector and resolver over the shared fixtures
//!
//! Snapshots the scope tree and the declaration table so that changes to
//! hoisting or shadowing show up as a reviewable diff.

use std::fs;
use std::path::Path;

use insta::assert_json_snapshot;
use serde::Serialize;
use sweep_core::semantic::BindingKind;
use sweep_core::{
    Declared, NoopObserver, RecordingObserver, SyntaxTree, UsageSet, collect, parse, resolve,
};

const FIXTURES_DIR: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/../../tests/fixtures");

fn read_fixture(relative_path: &str) -> String {
    let path = Path::new(FIXTURES_DIR).join(relative_path);
    fs::read_to_string(&path)
        .unwrap_or_else(|e| panic!("Failed to read fixture {}: {}", path.display(), e))
}

fn analyze(name: &str) -> (SyntaxTree, Declared, UsageSet) {
    let tree = parse(name, &read_fixture(name)).expect("parse failed");
    let declared = collect(&tree, &mut NoopObserver);
    let usage = resolve(&tree, &declared, &mut NoopObserver);
    (tree, declared, usage)
}

#[derive(Serialize)]
struct ScopeSnapshot {
    kind: String,
    children_count: usize,
    has_parent: bool,
}

#[derive(Serialize)]
struct DeclarationSnapshot {
    name: String,
    kind: BindingKind,
    scope: String,
    line: usize,
    column: usize,
    used: bool,
}

fn scope_snapshots(declared: &Declared) -> Vec<ScopeSnapshot> {
    declared
        .scopes
        .ids()
        .iter()
        .map(|&id| {
            let scope = declared.scopes.get(id);
            ScopeSnapshot {
                kind: format!("{:?}", scope.kind),
                children_count: scope.children.len(),
                has_parent: scope.parent.is_some(),
            }
        })
        .collect()
}

fn declaration_snapshots(
    tree: &SyntaxTree,
    declared: &Declared,
    usage: &UsageSet,
) -> Vec<DeclarationSnapshot> {
    let mut snapshots: Vec<_> = declared
        .declarations
        .iter()
        .map(|decl| {
            let (line, column) = tree.location(decl.span.lo);
            DeclarationSnapshot {
                name: decl.name.clone(),
                kind: decl.kind,
                scope: format!("{:?}", declared.scopes.get(decl.scope).kind),
                line,
                column,
                used: usage.contains(decl.id),
            }
        })
        .collect();
    snapshots.sort_by_key(|s| (s.line, s.column));
    snapshots
}

#[test]
fn scopes_fixture_scope_tree() {
    let (_, declared, _) = analyze("scopes.js");

    assert_json_snapshot!(scope_snapshots(&declared), @r#"
    [
      {
        "kind": "Module",
        "children_count": 3,
        "has_parent": false
      },
      {
        "kind": "Function",
        "children_count": 0,
        "has_parent": true
      },
      {
        "kind": "Function",
        "children_count": 0,
        "has_parent": true
      },
      {
        "kind": "Function",
        "children_count": 0,
        "has_parent": true
      }
    ]
    "#);
}

#[test]
fn scopes_fixture_declarations() {
    let (tree, declared, usage) = analyze("scopes.js");

    assert_json_snapshot!(declaration_snapshots(&tree, &declared, &usage), @r#"
    [
      {
        "name": "f",
        "kind": "function",
        "scope": "Module",
        "line": 1,
        "column": 10,
        "used": true
      },
      {
        "name": "x",
        "kind": "variable",
        "scope": "Function",
        "line": 2,
        "column": 9,
        "used": false
      },
      {
        "name": "g",
        "kind": "function",
        "scope": "Module",
        "line": 5,
        "column": 10,
        "used": true
      },
      {
        "name": "x",
        "kind": "variable",
        "scope": "Function",
        "line": 6,
        "column": 9,
        "used": true
      },
      {
        "name": "shadowed",
        "kind": "variable",
        "scope": "Module",
        "line": 10,
        "column": 7,
        "used": false
      },
      {
        "name": "h",
        "kind": "function",
        "scope": "Module",
        "line": 12,
        "column": 10,
        "used": true
      },
      {
        "name": "shadowed",
        "kind": "parameter",
        "scope": "Function",
        "line": 12,
        "column": 12,
        "used": true
      }
    ]
    "#);
}

#[test]
fn var_hoists_out_of_blocks() {
    let code = "function outer() {\n  if (ok) {\n    var late = 1;\n  }\n  return late;\n}\nouter();\n";
    let tree = parse("hoist.js", code).unwrap();
    let declared = collect(&tree, &mut NoopObserver);
    let usage = resolve(&tree, &declared, &mut NoopObserver);

    let late = declared
        .declarations
        .iter()
        .find(|d| d.name == "late")
        .expect("late declared");

    assert_eq!(
        format!("{:?}", declared.scopes.get(late.scope).kind),
        "Function"
    );
    assert!(usage.contains(late.id));
}

#[test]
fn calls_fixture_credits_every_use_shape() {
    let tree = parse("calls.js", &read_fixture("calls.js")).unwrap();
    let declared = collect(&tree, &mut NoopObserver);
    let mut observer = RecordingObserver::new();

    resolve(&tree, &declared, &mut observer);

    let mut used = observer.used_names();
    used.sort_unstable();
    assert_eq!(used, vec!["config", "counter", "obj", "recurse", "used"]);
    assert!(observer.unresolved_names().is_empty());
}

#[test]
fn components_fixture_kinds() {
    let (_, declared, usage) = analyze("components.jsx");

    let kind_of = |name: &str| {
        declared
            .declarations
            .iter()
            .find(|d| d.name == name)
            .map(|d| d.kind)
    };

    assert_eq!(kind_of("Header"), Some(BindingKind::Component));
    assert_eq!(kind_of("Footer"), Some(BindingKind::Component));
    assert_eq!(kind_of("Layout"), Some(BindingKind::Component));
    assert_eq!(kind_of("React"), Some(BindingKind::Import));

    let layout = declared
        .declarations
        .iter()
        .find(|d| d.name == "Layout")
        .unwrap();
    assert!(usage.contains(layout.id));
}

#[test]
fn exports_fixture_names() {
    let (_, declared, _) = analyze("exports.ts");

    assert_eq!(
        declared.exports,
        vec!["Options", "DEFAULTS", "run", "legacy", "formatDate"]
    );
    assert_eq!(declared.imports, vec!["formatDate", "parseDate"]);
    assert_eq!(
        declared.unimported_exports().collect::<Vec<_>>(),
        vec!["Options", "DEFAULTS", "run", "legacy"]
    );
}
