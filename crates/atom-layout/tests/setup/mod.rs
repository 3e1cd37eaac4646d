#![allow(dead_code)]

use std::{
    panic::{UnwindSafe, catch_unwind},
    sync::OnceLock,
};

use atom_layout::{
    Atom, AtomId, AtomKind, AtomTree, BranchName, LayoutBox, LayoutContext, LayoutError,
    Settings,
};

static DEFAULT_CONTEXT: OnceLock<LayoutContext> = OnceLock::new();
pub fn default_ctx() -> &'static LayoutContext {
    DEFAULT_CONTEXT.get_or_init(LayoutContext::default)
}

static DISPLAY_CONTEXT: OnceLock<LayoutContext> = OnceLock::new();
pub fn display_ctx() -> &'static LayoutContext {
    DISPLAY_CONTEXT
        .get_or_init(|| LayoutContext::new(Settings::builder().display_mode(true).build()))
}

/// Tolerance for comparisons of values that went through arithmetic
pub const EPSILON: f64 = 1e-9;

pub fn assert_close(actual: f64, expected: f64, what: &str) {
    assert!(
        (actual - expected).abs() < EPSILON,
        "{what}: expected {expected}, got {actual}"
    );
}

/// Adds a value-bearing atom
pub fn sym(tree: &mut AtomTree, kind: AtomKind, value: &str) -> AtomId {
    tree.add(Atom::symbol(kind, value))
}

pub fn ord(tree: &mut AtomTree, value: &str) -> AtomId {
    sym(tree, AtomKind::Ord, value)
}

/// Adds a group whose body holds `children`
pub fn group(tree: &mut AtomTree, children: Vec<AtomId>) -> Result<AtomId, LayoutError> {
    let id = tree.add(Atom::new(AtomKind::Group));
    tree.set_branch(id, BranchName::Body, children)?;
    Ok(id)
}

/// Adds a structural atom with the given branches
pub fn structure(
    tree: &mut AtomTree,
    kind: AtomKind,
    branches: Vec<(BranchName, Vec<AtomId>)>,
) -> Result<AtomId, LayoutError> {
    let id = tree.add(Atom::new(kind));
    for (name, children) in branches {
        tree.set_branch(id, name, children)?;
    }
    Ok(id)
}

/// Depth-first search for the first box carrying `class`
pub fn find_class<'a>(root: &'a LayoutBox, class: &str) -> Option<&'a LayoutBox> {
    if root.has_class(class) {
        return Some(root);
    }
    root.children()
        .iter()
        .find_map(|child| find_class(child, class))
}

/// Leaf boxes in reading order
pub fn leaves(root: &LayoutBox) -> Vec<&LayoutBox> {
    let mut out = Vec::new();
    collect_leaves(root, &mut out);
    out
}

fn collect_leaves<'a>(root: &'a LayoutBox, out: &mut Vec<&'a LayoutBox>) {
    if root.value().is_some() {
        out.push(root);
    }
    for child in root.children() {
        collect_leaves(child, out);
    }
}

pub fn it<F>(desc: &str, test_fn: F)
where
    F: FnOnce() -> Result<(), LayoutError> + UnwindSafe,
{
    let result = catch_unwind(test_fn);

    match result {
        Ok(Ok(())) => {}
        Ok(Err(e)) => {
            let atom = e
                .atom
                .map_or_else(|| "unknown".to_owned(), |atom| atom.to_string());
            panic!("Test '{desc}' failed with Result::Err: {e} (at atom {atom})");
        }
        Err(panic_payload) => {
            let msg = if let Some(s) = panic_payload.downcast_ref::<&str>() {
                (*s).to_owned()
            } else if let Some(s) = panic_payload.downcast_ref::<String>() {
                s.clone()
            } else {
                "<non-string panic payload>".to_owned()
            };
            panic!("Test '{desc}' panicked: {msg}");
        }
    }
}
