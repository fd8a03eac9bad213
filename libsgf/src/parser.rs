//! Tree builder
//!
//! The builder pulls tokens from the lexer and assembles the game record.
//! It moves through three phases:
//!
//! 1. **Idle**: before the first semicolon.
//! 2. **Header**: properties of the first node go to the header map.
//! 3. **Tree**: the second semicolon creates the root; every later semicolon
//!    appends a node to the current sequence.
//!
//! Inside the tree, `(` saves the current node on a stack and opens a new
//! variation after it, and `)` returns to the saved node. Unbalanced closing
//! parentheses are ignored.

use std::ops::ControlFlow;

use tracing::{debug, trace};

use crate::game::{Game, GameInfo, GameTree, NodeId, Property};
use crate::lexer::{Lexer, Token, TokenType};

/// Where the builder is in the document.
#[derive(Debug)]
enum Phase {
    Idle,
    Header,
    Tree { tree: GameTree, cursor: NodeId },
}

struct Builder {
    phase: Phase,
    info: GameInfo,
    /// Nodes to return to when the enclosing variation closes.
    stack: Vec<NodeId>,
    /// Name of the property whose values are being read.
    pending: String,
}

impl Builder {
    fn new() -> Self {
        Self {
            phase: Phase::Idle,
            info: GameInfo::default(),
            stack: Vec::new(),
            pending: String::new(),
        }
    }

    fn accept(&mut self, token: Token) -> ControlFlow<()> {
        match token.typ {
            TokenType::LeftParen => self.open_variation(),
            TokenType::RightParen => self.close_variation(),
            TokenType::Semicolon => self.start_node(),
            TokenType::PropertyName => self.pending = token.text,
            TokenType::PropertyValue => {
                self.add_property(Property::new(self.pending.clone(), token.text))
            }
            TokenType::Eof => return ControlFlow::Break(()),
        }
        ControlFlow::Continue(())
    }

    fn open_variation(&mut self) {
        // The document's own opening parenthesis arrives before the tree exists.
        if let Phase::Tree { tree, cursor } = &mut self.phase {
            self.stack.push(*cursor);
            *cursor = tree.append_variation(*cursor);
        }
    }

    fn close_variation(&mut self) {
        if let Phase::Tree { cursor, .. } = &mut self.phase {
            if let Some(saved) = self.stack.pop() {
                *cursor = saved;
            }
        }
    }

    fn start_node(&mut self) {
        self.phase = match &mut self.phase {
            Phase::Idle => Phase::Header,
            Phase::Header => {
                let tree = GameTree::with_root();
                let cursor = tree.root_id();
                Phase::Tree { tree, cursor }
            }
            Phase::Tree { tree, cursor } => {
                *cursor = tree.append_next(*cursor);
                return;
            }
        };
    }

    fn add_property(&mut self, prop: Property) {
        match &mut self.phase {
            Phase::Idle | Phase::Header => self.info.insert(prop),
            Phase::Tree { tree, cursor } => tree.node_mut(*cursor).add_property(prop),
        }
    }

    fn finish(self) -> Game {
        let tree = match self.phase {
            Phase::Tree { tree, .. } => Some(tree),
            Phase::Idle | Phase::Header => None,
        };
        Game {
            info: self.info,
            tree,
            errors: Vec::new(),
        }
    }
}

/// Consume `lexer` until end of input or the first error.
///
/// Whatever was built before an error is kept in the returned record.
pub fn build(lexer: Lexer) -> Game {
    let mut builder = Builder::new();
    let mut error = None;

    for item in lexer {
        match item {
            Ok(token) => {
                trace!(typ = ?token.typ, offset = token.offset, text = %token.text, "token");
                if builder.accept(token).is_break() {
                    break;
                }
            }
            Err(err) => {
                debug!(offset = err.offset(), "lexical error stops the parse: {}", err);
                error = Some(err);
                break;
            }
        }
    }

    let mut game = builder.finish();
    game.errors.extend(error);
    game
}
