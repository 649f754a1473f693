use super::context::ContextHint;
use super::bit_flags::Bits;
use super::kind::NodeKind;
use super::text::Text;

/// Stable index into an [`crate::arena::Arena`]'s node table.
///
/// Plays the role the spec's non-owning intrusive pointers play, translated
/// to an index rather than a raw pointer or `Rc` cycle — see the "Cyclic
/// parent/child links" design note. Node IDs are assigned in strictly
/// increasing allocation order, so `NodeId` doubles as the "unique
/// monotonically increasing identifier" §3 asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(u32);

impl NodeId {
    pub(crate) fn from_index(index: usize) -> Self {
        NodeId(index as u32)
    }

    pub(crate) fn index(self) -> usize {
        self.0 as usize
    }

    /// The raw, test-and-debug-facing node id value.
    pub fn raw(self) -> u32 {
        self.0
    }
}

/// The single structural unit of the AST.
///
/// One concrete struct with a `kind` discriminant and a handful of
/// generically-named slots reused across kinds, rather than an
/// enum-per-construct class hierarchy — see the "Polymorphism across node
/// kinds" design note. Child order is preserved by an intrusive singly
/// linked list (`first_child`/`next_sibling`) with an O(1) append via the
/// builder's tail cache (see [`crate::parser::NodeBuilder`]), not a `Vec`.
#[derive(Debug, Clone)]
pub struct AstNode<'input> {
    pub kind: NodeKind,
    pub node_id: NodeId,
    pub primary_text: Option<Text<'input>>,
    pub secondary_text: Option<Text<'input>>,
    pub schema_name: Option<Text<'input>>,
    pub flags: Bits,
    pub semantic_flags: Bits,
    pub context_hint: ContextHint,
    pub line: u32,
    pub column: u32,
    pub byte_offset: u32,

    pub parent: Option<NodeId>,
    pub first_child: Option<NodeId>,
    pub next_sibling: Option<NodeId>,
    pub child_count: u32,
    /// Tail of the child list, cached so appending the next child stays
    /// O(1) instead of walking the sibling chain each time.
    pub(crate) last_child: Option<NodeId>,
}

impl<'input> AstNode<'input> {
    pub fn new(kind: NodeKind, context_hint: ContextHint) -> Self {
        Self {
            kind,
            // Overwritten by `Arena::push`; placeholder until then.
            node_id: NodeId(0),
            primary_text: None,
            secondary_text: None,
            schema_name: None,
            flags: Bits::empty(),
            semantic_flags: Bits::empty(),
            context_hint,
            line: 0,
            column: 0,
            byte_offset: 0,
            parent: None,
            first_child: None,
            next_sibling: None,
            child_count: 0,
            last_child: None,
        }
    }
}
