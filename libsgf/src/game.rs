//! SGF game record representation.
//!
//! A parsed document becomes a [`Game`]: header properties collected before
//! the first real node, an optional node tree, and the errors that stopped
//! the parse.
//!
//! Nodes live in a [`GameTree`] arena and refer to each other by index.
//! Only the parser adds nodes, and it gives every node exactly one incoming
//! edge, so the structure is a tree no matter how the ids are followed.
//! Dropping a tree frees one flat vector, which keeps teardown of very long
//! main lines off the call stack.

use std::collections::HashMap;
use std::fmt;

use crate::error::{LookupError, ParseError};
use crate::props;

/// A property name with one raw value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Property {
    /// Canonical uppercase name.
    pub name: String,
    /// Text between the brackets, verbatim.
    pub value: String,
}

impl Property {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }

    /// Returns `true` for the `B` and `W` move properties.
    pub fn is_move(&self) -> bool {
        props::is_move(&self.name)
    }
}

impl fmt::Display for Property {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}[{}]", self.name, self.value)
    }
}

/// Index of a node within its [`GameTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub(crate) struct NodeId(usize);

/// One node of the game tree.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Node {
    move_property: Option<Property>,
    properties: Vec<Property>,
    next: Option<NodeId>,
    variations: Vec<NodeId>,
}

impl Node {
    /// The `B` or `W` property, if this node has one.
    pub fn move_property(&self) -> Option<&Property> {
        self.move_property.as_ref()
    }

    /// Properties other than the move, in document order.
    pub fn properties(&self) -> &[Property] {
        &self.properties
    }

    /// Returns `true` if the node has neither a move nor other properties.
    pub fn is_empty(&self) -> bool {
        self.move_property.is_none() && self.properties.is_empty()
    }

    /// First value of the named property, including the move property.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.get_all(name).next()
    }

    /// Every value of the named property, in document order.
    pub fn get_all<'a>(&'a self, name: &str) -> impl Iterator<Item = &'a str> + 'a {
        let name = name.to_uppercase();
        self.move_property
            .iter()
            .chain(self.properties.iter())
            .filter(move |p| p.name == name)
            .map(|p| p.value.as_str())
    }

    /// Attach a completed property. A move replaces any earlier move.
    pub(crate) fn add_property(&mut self, prop: Property) {
        if prop.is_move() {
            self.move_property = Some(prop);
        } else {
            self.properties.push(prop);
        }
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(mv) = &self.move_property {
            write!(f, "{}", mv)?;
        }
        for prop in &self.properties {
            write!(f, "{}", prop)?;
        }
        Ok(())
    }
}

/// Arena owning every node of one game tree. The root is always the first node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameTree {
    nodes: Vec<Node>,
}

impl GameTree {
    /// A tree holding a single empty root.
    pub(crate) fn with_root() -> Self {
        Self {
            nodes: vec![Node::default()],
        }
    }

    pub(crate) fn root_id(&self) -> NodeId {
        NodeId(0)
    }

    pub fn root(&self) -> NodeRef<'_> {
        NodeRef {
            tree: self,
            id: self.root_id(),
        }
    }

    /// Total number of nodes across all variations.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Always `false`: a tree has at least its root.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub(crate) fn node_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id.0]
    }

    fn push(&mut self) -> NodeId {
        self.nodes.push(Node::default());
        NodeId(self.nodes.len() - 1)
    }

    /// Create the node that follows `parent` in its sequence.
    pub(crate) fn append_next(&mut self, parent: NodeId) -> NodeId {
        let id = self.push();
        let parent = self.node_mut(parent);
        debug_assert!(parent.next.is_none(), "node already has a successor");
        parent.next = Some(id);
        id
    }

    /// Create a new variation branching after `parent`.
    pub(crate) fn append_variation(&mut self, parent: NodeId) -> NodeId {
        let id = self.push();
        self.node_mut(parent).variations.push(id);
        id
    }
}

/// Borrowed, read-only view of one node together with its tree.
#[derive(Clone, Copy)]
pub struct NodeRef<'a> {
    tree: &'a GameTree,
    id: NodeId,
}

impl<'a> NodeRef<'a> {
    /// The underlying node.
    pub fn node(&self) -> &'a Node {
        &self.tree.nodes[self.id.0]
    }

    pub fn move_property(&self) -> Option<&'a Property> {
        self.node().move_property()
    }

    pub fn properties(&self) -> &'a [Property] {
        self.node().properties()
    }

    /// First value of the named property, including the move property.
    pub fn get(&self, name: &str) -> Option<&'a str> {
        self.node().get(name)
    }

    /// Every value of the named property, in document order.
    pub fn get_all(&self, name: &str) -> Vec<&'a str> {
        self.node().get_all(name).collect()
    }

    pub fn next(&self) -> Option<NodeRef<'a>> {
        let tree = self.tree;
        self.node().next.map(|id| NodeRef { tree, id })
    }

    pub fn variations(&self) -> impl ExactSizeIterator<Item = NodeRef<'a>> + 'a {
        let tree = self.tree;
        self.node()
            .variations
            .iter()
            .map(move |&id| NodeRef { tree, id })
    }

    /// This node and every node reachable from it through `next` links.
    pub fn main_line(&self) -> MainLine<'a> {
        MainLine { cursor: Some(*self) }
    }
}

impl fmt::Debug for NodeRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NodeRef")
            .field("id", &self.id)
            .field("node", self.node())
            .finish()
    }
}

impl fmt::Display for NodeRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self.node(), f)
    }
}

/// Iterator over a sequence, following only `next` links.
#[derive(Debug, Clone)]
pub struct MainLine<'a> {
    cursor: Option<NodeRef<'a>>,
}

impl<'a> Iterator for MainLine<'a> {
    type Item = NodeRef<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.cursor?;
        self.cursor = current.next();
        Some(current)
    }
}

/// Header properties, keyed by canonical uppercase name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GameInfo {
    properties: HashMap<String, String>,
}

impl GameInfo {
    /// Store a property, replacing any earlier value of the same name.
    pub(crate) fn insert(&mut self, prop: Property) {
        self.properties.insert(prop.name.to_uppercase(), prop.value);
    }

    /// Value of a header property, looked up case-insensitively.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.properties.get(&name.to_uppercase()).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.properties.len()
    }

    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }

    /// Entries in arbitrary order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.properties
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Entries sorted by name.
    pub fn sorted(&self) -> Vec<(&str, &str)> {
        let mut entries: Vec<(&str, &str)> = self.iter().collect();
        entries.sort_unstable();
        entries
    }

    pub fn black_player(&self) -> PlayerInfo {
        PlayerInfo::from_info(
            self,
            props::BLACK_PLAYER_NAME,
            props::BLACK_PLAYER_RANK,
            props::BLACK_PLAYER_TEAM,
        )
    }

    pub fn white_player(&self) -> PlayerInfo {
        PlayerInfo::from_info(
            self,
            props::WHITE_PLAYER_NAME,
            props::WHITE_PLAYER_RANK,
            props::WHITE_PLAYER_TEAM,
        )
    }
}

/// A player's name, rank and team as written in the header.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlayerInfo {
    pub name: Option<String>,
    pub rank: Option<String>,
    pub team: Option<String>,
}

impl PlayerInfo {
    fn from_info(info: &GameInfo, name: &str, rank: &str, team: &str) -> Self {
        Self {
            name: info.get(name).map(String::from),
            rank: info.get(rank).map(String::from),
            team: info.get(team).map(String::from),
        }
    }
}

impl fmt::Display for PlayerInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name.as_deref().unwrap_or("?"))?;
        if let Some(rank) = &self.rank {
            write!(f, " ({})", rank)?;
        }
        if let Some(team) = &self.team {
            write!(f, " [{}]", team)?;
        }
        Ok(())
    }
}

/// A parsed SGF document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Game {
    pub(crate) info: GameInfo,
    pub(crate) tree: Option<GameTree>,
    pub(crate) errors: Vec<ParseError>,
}

impl Game {
    /// Header properties.
    pub fn info(&self) -> &GameInfo {
        &self.info
    }

    /// The node tree, absent when the document never reached its second node.
    pub fn tree(&self) -> Option<&GameTree> {
        self.tree.as_ref()
    }

    pub fn root(&self) -> Option<NodeRef<'_>> {
        self.tree.as_ref().map(GameTree::root)
    }

    /// Errors that stopped the parse. At most one, since parsing is fail-fast.
    pub fn errors(&self) -> &[ParseError] {
        &self.errors
    }

    /// Returns `true` if the document parsed without errors.
    pub fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }

    /// The main line, from the root along `next` links.
    pub fn main_line(&self) -> MainLine<'_> {
        MainLine {
            cursor: self.root(),
        }
    }

    /// Number of nodes on the main line. Variations are not counted.
    pub fn node_count(&self) -> usize {
        self.main_line().count()
    }

    /// The `n`th main-line node, counting the root as 1.
    pub fn nth_node(&self, n: usize) -> Result<NodeRef<'_>, LookupError> {
        if n == 0 {
            return Err(LookupError::ZeroIndex);
        }
        self.main_line()
            .nth(n - 1)
            .ok_or_else(|| LookupError::OutOfRange {
                index: n,
                len: self.node_count(),
            })
    }
}
