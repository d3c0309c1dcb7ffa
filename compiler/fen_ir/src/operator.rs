//! Operator fixity and precedence.

use std::cmp::Ordering;

/// Declared role of an operator.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum Fixity {
    Prefix,
    LeftInfix,
    RightInfix,
}

/// Operator metadata: fixity plus precedence level.
///
/// Higher precedence binds tighter. During shuffling, a left-associative
/// operator pops equal-precedence operators off the operator stack;
/// right-associative and prefix operators do not.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct Operator {
    pub fixity: Fixity,
    pub precedence: u8,
}

impl Operator {
    #[inline]
    pub const fn new(fixity: Fixity, precedence: u8) -> Self {
        Operator { fixity, precedence }
    }

    #[inline]
    pub const fn prefix(precedence: u8) -> Self {
        Operator::new(Fixity::Prefix, precedence)
    }

    #[inline]
    pub const fn left_infix(precedence: u8) -> Self {
        Operator::new(Fixity::LeftInfix, precedence)
    }

    #[inline]
    pub const fn right_infix(precedence: u8) -> Self {
        Operator::new(Fixity::RightInfix, precedence)
    }

    /// True when `self`, sitting on the operator stack, must be popped
    /// before `incoming` is pushed.
    #[inline]
    pub fn outranks(&self, incoming: &Operator) -> bool {
        match self.precedence.cmp(&incoming.precedence) {
            Ordering::Greater => true,
            Ordering::Equal => incoming.fixity == Fixity::LeftInfix,
            Ordering::Less => false,
        }
    }
}
