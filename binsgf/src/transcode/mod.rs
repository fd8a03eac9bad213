//! Transcoding game records into general-purpose data formats.
//!
//! A record is first flattened into a [`Shape`], a minimal tree of strings,
//! lists and ordered maps. Each format module then maps the shape onto its
//! own value type:
//!
//! ```text
//! info:   { KEY: value, ... }                 keys sorted
//! tree:   [node, node, ...]                   main line, absent without a root
//! errors: ["message", ...]
//! node:   { move: {name, value}, properties: [{name, value}, ...],
//!           variations: [[node, ...], ...] }  move absent when the node has none
//! ```
//!
//! Sequences are lists rather than chains of `next` links, so output nesting
//! grows with variation depth only. The format libraries serialize nested
//! values recursively, so records whose variations nest deeper than
//! [`MAX_VARIATION_DEPTH`] are refused instead of transcoded.

pub mod cbor;
pub mod json;
pub mod toml;
pub mod yaml;

use libsgf::{Game, NodeRef, Property};
use std::mem;

/// Deepest variation nesting `record` accepts.
pub const MAX_VARIATION_DEPTH: usize = 256;

/// Format-neutral view of a game record.
#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    Text(String),
    List(Vec<Shape>),
    /// Entries keep their insertion order.
    Map(Vec<(String, Shape)>),
}

impl Shape {
    fn text(s: &str) -> Self {
        Shape::Text(s.to_string())
    }

    fn entry(key: &str, value: Shape) -> (String, Shape) {
        (key.to_string(), value)
    }
}

/// Flatten a game record.
pub fn record(game: &Game) -> Result<Shape, String> {
    let info = game
        .info()
        .sorted()
        .into_iter()
        .map(|(name, value)| Shape::entry(name, Shape::text(value)))
        .collect();

    let mut entries = vec![Shape::entry("info", Shape::Map(info))];
    if let Some(root) = game.root() {
        entries.push(Shape::entry("tree", sequence(root)?));
    }
    let errors = game
        .errors()
        .iter()
        .map(|err| Shape::Text(err.to_string()))
        .collect();
    entries.push(Shape::entry("errors", Shape::List(errors)));
    Ok(Shape::Map(entries))
}

/// A sequence whose nodes are being flattened.
struct Frame<'a> {
    nodes: Vec<NodeRef<'a>>,
    /// Flattened nodes; the next one to finish is `nodes[done.len()]`.
    done: Vec<Shape>,
    /// Flattened variations of that node.
    variations: Vec<Shape>,
}

impl<'a> Frame<'a> {
    fn new(first: NodeRef<'a>) -> Self {
        Self {
            nodes: first.main_line().collect(),
            done: Vec::new(),
            variations: Vec::new(),
        }
    }
}

/// Flatten a sequence and everything below it without recursing.
fn sequence(first: NodeRef<'_>) -> Result<Shape, String> {
    let mut stack = vec![Frame::new(first)];
    let mut finished = None;

    while let Some(frame) = stack.last_mut() {
        let current = frame.nodes[frame.done.len()];
        if let Some(head) = current.variations().nth(frame.variations.len()) {
            if stack.len() > MAX_VARIATION_DEPTH {
                return Err(format!(
                    "variations nested deeper than {} levels cannot be transcoded",
                    MAX_VARIATION_DEPTH
                ));
            }
            stack.push(Frame::new(head));
            continue;
        }

        let variations = mem::take(&mut frame.variations);
        frame.done.push(node(current, variations));
        if frame.done.len() < frame.nodes.len() {
            continue;
        }

        let list = Shape::List(mem::take(&mut frame.done));
        stack.pop();
        match stack.last_mut() {
            Some(parent) => parent.variations.push(list),
            None => finished = Some(list),
        }
    }
    Ok(finished.unwrap_or(Shape::List(Vec::new())))
}

fn node(node: NodeRef<'_>, variations: Vec<Shape>) -> Shape {
    let mut entries = Vec::new();
    if let Some(mv) = node.move_property() {
        entries.push(Shape::entry("move", property(mv)));
    }
    entries.push(Shape::entry(
        "properties",
        Shape::List(node.properties().iter().map(property).collect()),
    ));
    entries.push(Shape::entry("variations", Shape::List(variations)));
    Shape::Map(entries)
}

fn property(prop: &Property) -> Shape {
    Shape::Map(vec![
        Shape::entry("name", Shape::text(&prop.name)),
        Shape::entry("value", Shape::text(&prop.value)),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use libsgf::parse;

    fn flatten(text: &str) -> Shape {
        record(&parse(text)).unwrap()
    }

    /// A record whose variations nest `depth` levels deep.
    pub(crate) fn nested(depth: usize) -> String {
        let mut text = String::from("(;GM[1];B[aa]");
        for _ in 0..depth {
            text.push_str("(;W[bb]");
        }
        text.push_str(&")".repeat(depth + 1));
        text
    }

    fn get<'a>(shape: &'a Shape, key: &str) -> Option<&'a Shape> {
        match shape {
            Shape::Map(entries) => entries.iter().find(|(k, _)| k == key).map(|(_, v)| v),
            _ => None,
        }
    }

    #[test]
    fn test_record_layout() {
        let shape = flatten("(;SZ[9]GM[1];B[ee]C[hi];W[cc])");
        let info = get(&shape, "info").unwrap();
        assert_eq!(
            info,
            &Shape::Map(vec![
                Shape::entry("GM", Shape::text("1")),
                Shape::entry("SZ", Shape::text("9")),
            ])
        );

        let Some(Shape::List(tree)) = get(&shape, "tree") else {
            panic!("tree should be a list");
        };
        assert_eq!(tree.len(), 2);
        assert_eq!(
            get(&tree[0], "move"),
            Some(&property(&Property::new("B", "ee")))
        );
        assert_eq!(
            get(&tree[0], "properties"),
            Some(&Shape::List(vec![property(&Property::new("C", "hi"))]))
        );
        assert_eq!(get(&shape, "errors"), Some(&Shape::List(vec![])));
    }

    #[test]
    fn test_record_without_tree() {
        let shape = flatten("(;GM[1])");
        assert!(get(&shape, "tree").is_none());
    }

    #[test]
    fn test_record_keeps_errors() {
        let shape = flatten("(;GM[1];B[aa]");
        let Some(Shape::List(errors)) = get(&shape, "errors") else {
            panic!("errors should be a list");
        };
        assert_eq!(errors.len(), 1);
    }

    #[test]
    fn test_variations_are_nested_sequences() {
        let shape = flatten("(;GM[1];B[aa](;W[bb])(;W[cc]))");
        let Some(Shape::List(tree)) = get(&shape, "tree") else {
            panic!("tree should be a list");
        };
        let Some(Shape::List(variations)) = get(&tree[0], "variations") else {
            panic!("variations should be a list");
        };
        assert_eq!(variations.len(), 2);
        // Each branch is its empty head followed by the move node.
        let Shape::List(branch) = &variations[0] else {
            panic!("branch should be a list");
        };
        assert_eq!(branch.len(), 2);
        assert!(get(&branch[0], "move").is_none());
        assert_eq!(
            get(&branch[1], "move"),
            Some(&property(&Property::new("W", "bb")))
        );
    }

    #[test]
    fn test_nesting_up_to_the_limit() {
        let shape = flatten(&nested(MAX_VARIATION_DEPTH));
        let mut depth = 0;
        let mut sequence = get(&shape, "tree").unwrap();
        while let Shape::List(nodes) = sequence {
            let Some(Shape::List(variations)) = get(nodes.last().unwrap(), "variations") else {
                panic!("variations should be a list");
            };
            match variations.first() {
                Some(branch) => {
                    depth += 1;
                    sequence = branch;
                }
                None => break,
            }
        }
        assert_eq!(depth, MAX_VARIATION_DEPTH);
    }

    #[test]
    fn test_very_deep_nesting_is_refused() {
        let game = parse(&nested(100_000));
        assert!(game.is_ok());
        let err = record(&game).unwrap_err();
        assert!(err.contains("nested deeper than 256 levels"), "{}", err);
        assert!(record(&parse(&nested(MAX_VARIATION_DEPTH + 1))).is_err());
    }
}
