//! Write game records back out as canonical SGF.
//!
//! The header becomes the first node, with properties sorted by name. Every
//! following node is written as `;` plus its move and other properties, and
//! each variation is parenthesized right after the node it branches from.
//! Consecutive values of one property are folded into `NAME[a][b]`.
//!
//! A variation's head is the node its `(` opens. Parsed heads are always
//! empty, so they are written as nothing and the `;` that follows the `(`
//! stands for the head's successor, as it did in the source document.

use crate::game::{Game, NodeRef, Property};

/// Serialize a game record as SGF text.
///
/// A record with neither header nor tree produces an empty string.
pub fn to_sgf(game: &Game) -> String {
    let mut out = String::new();
    if game.info().is_empty() && game.root().is_none() {
        return out;
    }

    out.push_str("(;");
    let header: Vec<Property> = game
        .info()
        .sorted()
        .into_iter()
        .map(|(name, value)| Property::new(name, value))
        .collect();
    write_properties(&mut out, header.iter());

    if let Some(root) = game.root() {
        write_sequence(&mut out, root);
    }
    out.push(')');
    out
}

/// Pending output, kept on an explicit stack so nesting depth is bounded by
/// memory rather than by the call stack.
enum Step<'a> {
    /// Write a node, then schedule its variations and successor.
    Node { node: NodeRef<'a>, head: bool },
    /// Open a variation starting at the given head.
    Variation(NodeRef<'a>),
    Close,
}

fn write_sequence(out: &mut String, first: NodeRef<'_>) {
    let mut steps = vec![Step::Node {
        node: first,
        head: false,
    }];
    while let Some(step) = steps.pop() {
        match step {
            Step::Node { node, head } => {
                if !(head && node.node().is_empty()) {
                    out.push(';');
                    write_properties(out, node.move_property().into_iter().chain(node.properties()));
                }
                // Pushed in reverse: variations are written before the successor.
                if let Some(next) = node.next() {
                    steps.push(Step::Node { node: next, head: false });
                }
                let variations: Vec<NodeRef<'_>> = node.variations().collect();
                steps.extend(variations.into_iter().rev().map(Step::Variation));
            }
            Step::Variation(head) => {
                out.push('(');
                steps.push(Step::Close);
                steps.push(Step::Node { node: head, head: true });
            }
            Step::Close => out.push(')'),
        }
    }
}

fn write_properties<'a>(out: &mut String, props: impl Iterator<Item = &'a Property>) {
    let mut previous: Option<&str> = None;
    for prop in props {
        if previous != Some(prop.name.as_str()) {
            out.push_str(&prop.name);
        }
        out.push('[');
        out.push_str(&prop.value);
        out.push(']');
        previous = Some(prop.name.as_str());
    }
}
