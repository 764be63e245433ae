use gc::Gc;
use monkey_lang_core::ast::Program;
use monkey_lang_interpreter::environment::Environment;
use monkey_lang_interpreter::evaluator;
use monkey_lang_interpreter::object::{EvaluationError, Object};

pub trait Evaluator {
    type Object;

    fn evaluate(&mut self, program: Program) -> Self::Object;
}

/// Keeps one root environment alive for the whole session.
pub struct InterpreterEvaluator {
    environment: Environment,
}

impl InterpreterEvaluator {
    pub fn new() -> Self {
        Self {
            environment: Environment::new(),
        }
    }
}

impl Default for InterpreterEvaluator {
    fn default() -> Self {
        Self::new()
    }
}

impl Evaluator for InterpreterEvaluator {
    type Object = Result<Gc<Object>, EvaluationError>;

    fn evaluate(&mut self, program: Program) -> Self::Object {
        evaluator::eval_program(&program, &mut self.environment)
    }
}
