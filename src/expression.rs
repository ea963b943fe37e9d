use core::fmt::{Display, Formatter};

use heapless::Vec;

use crate::{
    token::{Constant, Operation, Token},
    Error,
};

/// Sequential id of a folded sub-expression, displayed as `e1`, `e2`, …
/// in creation order.
pub type ExprId = u16;

/// An operand of a folded sub-expression, classified while the plan is
/// built and resolved only when it is evaluated.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Operand {
    Literal(f64),
    Constant(Constant),
    Reference(ExprId),
}

impl Operand {
    /// classifies a value word: an integer literal, a named constant,
    /// or nothing
    pub fn from_word(word: &str) -> Result<Self, Error> {
        if let Ok(n) = word.parse::<i64>() {
            return Ok(Operand::Literal(n as f64));
        }

        match Constant::from_word(word) {
            Some(constant) => Ok(Operand::Constant(constant)),
            None => Err(Error::InvalidOperand),
        }
    }
}

impl Display for Operand {
    fn fmt(&self, f: &mut Formatter) -> core::fmt::Result {
        match self {
            Operand::Literal(value) => write!(f, "{}", value),
            Operand::Constant(constant) => write!(f, "{}", constant),
            Operand::Reference(id) => write!(f, "e{}", id),
        }
    }
}

/// One named binary operation of the evaluation plan.
#[derive(Debug, Clone, PartialEq)]
pub struct SubExpression {
    pub id: ExprId,
    pub operation: Operation,
    pub lhs: Operand,
    pub rhs: Operand,
}

impl Display for SubExpression {
    fn fmt(&self, f: &mut Formatter) -> core::fmt::Result {
        write!(f, "e{} = {} {} {}", self.id, self.lhs, self.operation, self.rhs)
    }
}

/// Content of one position of the mutable slot array. Slots whose
/// content has been consumed by a fold become `None` and later scans
/// skip them.
#[derive(Debug, Clone, Copy)]
enum Slot<'a> {
    Op(Operation),
    Value(&'a str),
    Ref(ExprId),
}

impl<'a> From<Token<'a>> for Slot<'a> {
    fn from(token: Token<'a>) -> Self {
        match token {
            Token::Op(op) => Slot::Op(op),
            Token::Value(word) => Slot::Value(word),
        }
    }
}

fn classify(slot: &Slot) -> Result<Operand, Error> {
    match slot {
        Slot::Op(_) => Err(Error::InvalidOperand),
        Slot::Value(word) => Operand::from_word(word),
        Slot::Ref(id) => Ok(Operand::Reference(*id)),
    }
}

/// Resolves the operand left of the operator in `index`, returning it
/// together with the slot it was found in.
///
/// A `+` or `-` in the very first slot has no left neighbor and takes
/// an implicit zero instead, which is what turns a leading `-` into a
/// subtraction chain starting from zero.
fn left_operand(
    slots: &[Option<Slot>],
    index: usize,
    operation: Operation,
) -> Result<(Operand, Option<usize>), Error> {
    if index == 0 {
        return match operation {
            Operation::Add | Operation::Subtract => Ok((Operand::Literal(0.0), None)),
            _ => Err(Error::InvalidOperand),
        };
    }

    match &slots[index - 1] {
        Some(slot) => Ok((classify(slot)?, Some(index - 1))),
        // the neighbor was consumed by an earlier fold, walk back to
        // the sub-expression that swallowed it
        None => {
            for back in (0..index - 1).rev() {
                if let Some(Slot::Ref(id)) = slots[back] {
                    return Ok((Operand::Reference(id), Some(back)));
                }
            }

            Err(Error::InvalidOperand)
        }
    }
}

/// Mirror of [`left_operand`] for the right side; walks forward across
/// consumed slots. Exhausting the array here is what catches trailing
/// operators.
fn right_operand(
    slots: &[Option<Slot>],
    index: usize,
) -> Result<(Operand, usize), Error> {
    if index + 1 >= slots.len() {
        return Err(Error::InvalidOperand);
    }

    match &slots[index + 1] {
        Some(slot) => Ok((classify(slot)?, index + 1)),
        None => {
            for ahead in index + 2..slots.len() {
                if let Some(Slot::Ref(id)) = slots[ahead] {
                    return Ok((Operand::Reference(id), ahead));
                }
            }

            Err(Error::InvalidOperand)
        }
    }
}

/// One left-to-right pass over the slot array folding every live
/// operator of the given precedence tier into a sub-expression.
fn fold_tier<'a, const E: usize>(
    slots: &mut Vec<Option<Slot<'a>>, E>,
    queue: &mut Vec<SubExpression, E>,
    counter: &mut ExprId,
    precedence: u8,
) -> Result<(), Error> {
    for index in 0..slots.len() {
        let operation = match slots[index] {
            Some(Slot::Op(op)) if op.precedence() == precedence => op,
            _ => continue,
        };

        let (lhs, lhs_slot) = left_operand(slots, index, operation)?;
        let (rhs, rhs_slot) = right_operand(slots, index)?;

        *counter += 1;
        let id = *counter;

        queue
            .push(SubExpression { id, operation, lhs, rhs })
            .map_err(|_| Error::NotEnoughMemory)?;

        // the folded span collapses onto the slot the left operand came
        // from; an implicit zero has no slot of its own, so the operator
        // slot carries the name instead
        slots[rhs_slot] = None;
        match lhs_slot {
            Some(found) => {
                slots[index] = None;
                slots[found] = Some(Slot::Ref(id));
            }
            None => slots[index] = Some(Slot::Ref(id)),
        }
    }

    Ok(())
}

/// Folds a token sequence into the FIFO evaluation plan: one pass for
/// `*` and `/`, a second for `+` and `-`, sharing one naming counter so
/// ids reflect global creation order.
///
/// An equation with no operators produces no plan; a lone operand is
/// resolved through the evaluator short-circuit instead of here.
pub fn build<const E: usize>(tokens: &[Token<'_>]) -> Result<Vec<SubExpression, E>, Error> {
    let mut slots: Vec<Option<Slot>, E> = Vec::new();

    for token in tokens {
        slots
            .push(Some(Slot::from(*token)))
            .map_err(|_| Error::NotEnoughMemory)?;
    }

    let mut queue = Vec::new();
    let mut counter: ExprId = 0;

    fold_tier(&mut slots, &mut queue, &mut counter, Operation::Multiply.precedence())?;
    fold_tier(&mut slots, &mut queue, &mut counter, Operation::Add.precedence())?;

    if queue.is_empty() {
        // several operands but nothing to combine them with
        return Err(Error::InvalidOperand);
    }

    Ok(queue)
}
