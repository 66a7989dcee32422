use arsen_ir::Address;

/// A recovered control construct.
///
/// Blocks are referenced by start address into the function's CFG rather
/// than by pointer, so the tree needs no back-references. The taxonomy
/// includes loop and switch variants for emission completeness, but the
/// structuring rules only ever produce straight-line and if/else shapes;
/// cyclic control flow falls through to plain blocks (see
/// [`crate::structure`]).
#[derive(Debug, Clone, PartialEq)]
pub enum Region {
    Sequence(Vec<Region>),
    Block(Address),
    IfThen {
        condition: String,
        body: Vec<Region>,
    },
    IfThenElse {
        condition: String,
        then_body: Vec<Region>,
        else_body: Vec<Region>,
    },
    WhileLoop {
        condition: String,
        body: Vec<Region>,
    },
    DoWhileLoop {
        condition: String,
        body: Vec<Region>,
    },
    InfiniteLoop {
        body: Vec<Region>,
    },
    Switch {
        selector: String,
        cases: Vec<Region>,
    },
    Unknown(Vec<Region>),
}
