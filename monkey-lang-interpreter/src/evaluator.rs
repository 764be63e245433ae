use std::collections::HashMap;

use gc::Gc;
use monkey_lang_core::ast;
use monkey_lang_core::ast::{Expression, InfixOperationKind, PrefixOperationKind};

use crate::builtins;
use crate::environment::Environment;
use crate::object::{EvaluationError, Function, HashKey, HashPair, Object, QuickReturn};

/// Runs `program` in `environment` and returns the value of its last
/// statement, or of the first top-level `return`. Bindings made by the
/// program stay in `environment`, which is what lets a REPL carry state
/// from one input to the next.
pub fn eval_program(
    program: &ast::Program,
    environment: &mut Environment,
) -> Result<Gc<Object>, EvaluationError> {
    tracing::debug!(statements = program.statements.len(), "evaluating program");

    let mut output = Object::null();
    for statement in &program.statements {
        match eval_statement(statement, environment) {
            Err(QuickReturn::Return(value)) => return Ok(value),
            Err(QuickReturn::Error(error)) => {
                tracing::debug!(%error, "evaluation failed");
                return Err(error);
            }
            Ok(object) => output = object,
        };
    }
    Ok(output)
}

fn eval_statement(
    statement: &ast::Statement,
    environment: &mut Environment,
) -> Result<Gc<Object>, QuickReturn> {
    match statement {
        ast::Statement::Expression(expression) => eval_expression(expression, environment),
        ast::Statement::Return(statement) => {
            let value = eval_expression(&statement.value, environment)?;
            Err(QuickReturn::Return(value))
        }
        ast::Statement::Let(statement) => {
            let value = eval_expression(&statement.value, environment)?;
            environment.set(&statement.identifier.name, value);
            Ok(Object::null())
        }
    }
}

/// Evaluates the statements of `block` in `environment`. A `return` or an
/// error stops the block and travels up through the `Err` side.
fn eval_block_statement(
    block: &ast::BlockStatement,
    environment: &mut Environment,
) -> Result<Gc<Object>, QuickReturn> {
    let mut result = Object::null();
    for statement in &block.statements {
        result = eval_statement(statement, environment)?;
    }
    Ok(result)
}

fn eval_expression(
    expression: &Expression,
    environment: &mut Environment,
) -> Result<Gc<Object>, QuickReturn> {
    match expression {
        Expression::IntegerLiteral(value) => Ok(Object::integer(*value)),
        Expression::BooleanLiteral(value) => Ok(Object::boolean(*value)),
        Expression::StringLiteral(value) => Ok(Object::string(value.clone())),
        Expression::ArrayLiteral(elements) => {
            Ok(Object::array(eval_expressions(elements, environment)?))
        }
        Expression::HashLiteral(literal) => {
            let mut hashmap = HashMap::new();
            for (key, value) in literal {
                let key = eval_expression(key, environment)?;
                let hashed_key = HashKey::try_from(&*key)?;
                let value = eval_expression(value, environment)?;
                hashmap.insert(hashed_key, HashPair { key, value });
            }
            Ok(Object::hash(hashmap))
        }
        Expression::Identifier(identifier) => Ok(eval_identifier(identifier, environment)?),
        Expression::PrefixOperation(kind, right) => {
            let right = eval_expression(right, environment)?;
            Ok(eval_prefix_operation(*kind, right)?)
        }
        Expression::InfixOperation(kind, left, right) => {
            let left = eval_expression(left, environment)?;
            let right = eval_expression(right, environment)?;
            Ok(eval_infix_operation(*kind, left, right)?)
        }
        Expression::IfExpression {
            condition,
            consequence,
            alternative,
        } => {
            let condition = eval_expression(condition, environment)?;
            let branch = if condition.is_truthy() {
                Some(consequence)
            } else {
                alternative.as_ref()
            };
            match branch {
                Some(block) => {
                    let mut scope = Environment::new_enclosed(environment.clone());
                    eval_block_statement(block, &mut scope)
                }
                None => Ok(Object::null()),
            }
        }
        Expression::FunctionLiteral { parameters, body } => Ok(Object::function(
            parameters.clone(),
            body.clone(),
            environment.clone(),
        )),
        Expression::CallExpression {
            function,
            arguments,
        } => {
            let function = eval_expression(function, environment)?;
            let arguments = eval_expressions(arguments, environment)?;
            match &*function {
                Object::Function(function) => Ok(apply_function(function, arguments)?),
                Object::BuiltinFunction(builtin) => {
                    tracing::trace!(builtin = builtin.name, "calling builtin");
                    Ok((builtin.func)(arguments)?)
                }
                other => Err(EvaluationError::CallNonFunction(other.type_name()).into()),
            }
        }
        Expression::IndexExpression { left, index } => {
            let left = eval_expression(left, environment)?;
            let index = eval_expression(index, environment)?;
            Ok(eval_index_expression(&left, &index)?)
        }
    }
}

fn eval_identifier(
    identifier: &ast::Identifier,
    environment: &Environment,
) -> Result<Gc<Object>, EvaluationError> {
    if let Some(value) = environment.get(&identifier.name) {
        return Ok(value);
    }
    builtins::lookup(&identifier.name)
        .map(Object::builtin_function)
        .ok_or_else(|| EvaluationError::UnknownIdentifier(identifier.name.clone()))
}

/// Evaluates left to right, stopping at the first failure.
fn eval_expressions(
    expressions: &[Expression],
    environment: &mut Environment,
) -> Result<Vec<Gc<Object>>, QuickReturn> {
    let mut result = Vec::with_capacity(expressions.len());
    for expression in expressions {
        result.push(eval_expression(expression, environment)?);
    }
    Ok(result)
}

/// Runs the body in a fresh scope enclosed by the function's own
/// environment. A `return` inside the body ends here.
fn apply_function(
    function: &Function,
    arguments: Vec<Gc<Object>>,
) -> Result<Gc<Object>, EvaluationError> {
    if function.parameters.len() != arguments.len() {
        return Err(EvaluationError::WrongArgumentCount {
            expected: function.parameters.len(),
            actual: arguments.len(),
        });
    }
    tracing::trace!(arity = arguments.len(), "calling function");

    let mut scope = Environment::new_enclosed(function.env.clone());
    for (parameter, argument) in function.parameters.iter().zip(arguments) {
        scope.set(&parameter.name, argument);
    }
    match eval_block_statement(&function.body, &mut scope) {
        Ok(object) | Err(QuickReturn::Return(object)) => Ok(object),
        Err(QuickReturn::Error(err)) => Err(err),
    }
}

fn eval_prefix_operation(
    kind: PrefixOperationKind,
    right: Gc<Object>,
) -> Result<Gc<Object>, EvaluationError> {
    match (kind, &*right) {
        (PrefixOperationKind::Bang, object) => Ok(Object::boolean(!object.is_truthy())),
        (PrefixOperationKind::Minus, Object::Integer(value)) => {
            Ok(Object::integer(value.wrapping_neg()))
        }
        (PrefixOperationKind::Minus, object) => Err(EvaluationError::UnknownPrefixOperator {
            operation: kind,
            right: object.type_name(),
        }),
    }
}

fn eval_infix_operation(
    kind: InfixOperationKind,
    left: Gc<Object>,
    right: Gc<Object>,
) -> Result<Gc<Object>, EvaluationError> {
    match (&*left, &*right) {
        (Object::Integer(l), Object::Integer(r)) => eval_integer_infix_operation(kind, *l, *r),
        // Strings compare by contents, not identity.
        (Object::String(l), Object::String(r)) => match kind {
            InfixOperationKind::Plus => Ok(Object::string(format!("{}{}", l, r))),
            InfixOperationKind::Equal => Ok(Object::boolean(l == r)),
            InfixOperationKind::NotEqual => Ok(Object::boolean(l != r)),
            _ => Err(unknown_infix_operator(kind, &left, &right)),
        },
        // Booleans and null are shared instances, so identity is equality.
        _ if kind == InfixOperationKind::Equal => Ok(Object::boolean(Object::same(&left, &right))),
        _ if kind == InfixOperationKind::NotEqual => {
            Ok(Object::boolean(!Object::same(&left, &right)))
        }
        (l, r) if l.type_name() != r.type_name() => Err(EvaluationError::TypeMismatch {
            left: l.type_name(),
            operation: kind,
            right: r.type_name(),
        }),
        _ => Err(unknown_infix_operator(kind, &left, &right)),
    }
}

fn unknown_infix_operator(kind: InfixOperationKind, left: &Object, right: &Object) -> EvaluationError {
    EvaluationError::UnknownInfixOperator {
        left: left.type_name(),
        operation: kind,
        right: right.type_name(),
    }
}

/// Arithmetic wraps on overflow. Division truncates toward zero.
fn eval_integer_infix_operation(
    kind: InfixOperationKind,
    left: i64,
    right: i64,
) -> Result<Gc<Object>, EvaluationError> {
    use InfixOperationKind::*;
    match kind {
        Plus => Ok(Object::integer(left.wrapping_add(right))),
        Minus => Ok(Object::integer(left.wrapping_sub(right))),
        Multiply => Ok(Object::integer(left.wrapping_mul(right))),
        Divide if right == 0 => Err(EvaluationError::DivisionByZero),
        Divide => left
            .checked_div(right)
            .map(Object::integer)
            .ok_or(EvaluationError::DivisionOverflow { left, right }),
        LessThan => Ok(Object::boolean(left < right)),
        GreaterThan => Ok(Object::boolean(left > right)),
        Equal => Ok(Object::boolean(left == right)),
        NotEqual => Ok(Object::boolean(left != right)),
    }
}

fn eval_index_expression(
    left: &Gc<Object>,
    index: &Gc<Object>,
) -> Result<Gc<Object>, EvaluationError> {
    match (&**left, &**index) {
        (Object::Array(array), Object::Integer(index)) => Ok(usize::try_from(*index)
            .ok()
            .and_then(|index| array.get(index))
            .cloned()
            .unwrap_or_else(Object::null)),
        (Object::Hash(hash), key) => {
            let hashed_key = HashKey::try_from(key)?;
            Ok(hash
                .get(&hashed_key)
                .map(|pair| pair.value.clone())
                .unwrap_or_else(Object::null))
        }
        (object, _) => Err(EvaluationError::IndexNotSupported(object.type_name())),
    }
}
