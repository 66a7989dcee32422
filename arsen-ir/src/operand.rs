use serde::Serialize;

/// Operand classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum OperandKind {
    Register,
    Immediate,
    Memory,
    Displacement,
}

/// A single decoded operand: a display string plus a numeric value.
///
/// The value carries the register encoding, immediate/displacement
/// magnitude, or memory descriptor value depending on `kind`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Operand {
    pub kind: OperandKind,
    pub text: String,
    pub value: i64,
}

impl Operand {
    pub fn register(text: impl Into<String>) -> Self {
        Operand {
            kind: OperandKind::Register,
            text: text.into(),
            value: 0,
        }
    }

    pub fn immediate(text: impl Into<String>, value: i64) -> Self {
        Operand {
            kind: OperandKind::Immediate,
            text: text.into(),
            value,
        }
    }

    pub fn memory(text: impl Into<String>, value: i64) -> Self {
        Operand {
            kind: OperandKind::Memory,
            text: text.into(),
            value,
        }
    }

    pub fn displacement(text: impl Into<String>, value: i64) -> Self {
        Operand {
            kind: OperandKind::Displacement,
            text: text.into(),
            value,
        }
    }
}
