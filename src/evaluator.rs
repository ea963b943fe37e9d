use heapless::LinearMap;

use crate::{
    expression::{ExprId, Operand, SubExpression},
    token::{Operation, Token},
    Error,
};

/// Values of already computed sub-expressions, keyed by id.
///
/// Entries are inserted in dequeue order and never overwritten, ids are
/// unique by construction.
pub struct ResultMap<const E: usize> {
    map: LinearMap<ExprId, f64, E>,
}

impl<const E: usize> ResultMap<E> {
    pub fn new() -> Self {
        ResultMap {
            map: LinearMap::new(),
        }
    }

    pub fn insert(&mut self, id: ExprId, value: f64) -> Result<(), Error> {
        self.map
            .insert(id, value)
            .map(|_| ())
            .map_err(|_| Error::NotEnoughMemory)
    }

    pub fn get(&self, id: ExprId) -> Option<f64> {
        self.map.get(&id).copied()
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}

impl<const E: usize> Default for ResultMap<E> {
    fn default() -> Self {
        ResultMap::new()
    }
}

fn resolve<const E: usize>(operand: &Operand, results: &ResultMap<E>) -> Result<f64, Error> {
    match operand {
        Operand::Literal(value) => Ok(*value),
        Operand::Constant(constant) => Ok(constant.value()),
        Operand::Reference(id) => results.get(*id).ok_or(Error::UnresolvedReference(*id)),
    }
}

fn apply(operation: Operation, lhs: f64, rhs: f64) -> Result<f64, Error> {
    Ok(match operation {
        Operation::Add => lhs + rhs,
        Operation::Subtract => lhs - rhs,
        Operation::Multiply => lhs * rhs,
        Operation::Divide => {
            if rhs == 0.0 {
                return Err(Error::DivideByZero);
            }

            lhs / rhs
        }
    })
}

/// Drains the evaluation plan in enqueue order; the value of the last
/// sub-expression is the value of the whole equation.
pub fn evaluate_queue<const E: usize>(queue: &[SubExpression]) -> Result<f64, Error> {
    let mut results = ResultMap::<E>::new();
    let mut value = None;

    for sub in queue {
        let lhs = resolve(&sub.lhs, &results)?;
        let rhs = resolve(&sub.rhs, &results)?;

        let computed = apply(sub.operation, lhs, rhs)?;
        results.insert(sub.id, computed)?;
        value = Some(computed);
    }

    value.ok_or(Error::InvalidOperand)
}

/// Short-circuit for an equation that is a single operand with no
/// operator: the token resolves directly instead of through a plan.
pub fn resolve_single(token: &Token) -> Result<f64, Error> {
    match token {
        Token::Value(word) => match Operand::from_word(word)? {
            Operand::Literal(value) => Ok(value),
            Operand::Constant(constant) => Ok(constant.value()),
            Operand::Reference(id) => Err(Error::UnresolvedReference(id)),
        },
        Token::Op(_) => Err(Error::InvalidOperand),
    }
}
