use std::path::{Path, PathBuf};

use gc::Gc;
use monkey_lang_core::parser::{self, ParseError};
use monkey_lang_interpreter::environment::Environment;
use monkey_lang_interpreter::evaluator;
use monkey_lang_interpreter::object::{EvaluationError, Object};
use rustyline::error::ReadlineError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RunError {
    #[error("could not read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("{}", parse_errors_message(.0))]
    Parse(Vec<ParseError>),
    #[error("ERROR: {0}")]
    Evaluation(#[from] EvaluationError),
    #[error("readline failed: {0}")]
    Readline(#[from] ReadlineError),
}

/// One error per line.
pub fn parse_errors_message(errors: &[ParseError]) -> String {
    errors
        .iter()
        .map(|error| error.to_string())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Parses and evaluates `source` in a fresh environment.
pub fn execute(source: &str) -> Result<Gc<Object>, RunError> {
    let program = parser::parse(source).map_err(RunError::Parse)?;
    let mut env = Environment::new();
    Ok(evaluator::eval_program(&program, &mut env)?)
}

pub fn run_file(path: &Path) -> Result<(), RunError> {
    tracing::debug!(path = %path.display(), "running script");
    let source = std::fs::read_to_string(path).map_err(|source| RunError::Io {
        path: path.to_owned(),
        source,
    })?;

    let result = execute(&source)?;
    if !matches!(*result, Object::Null) {
        println!("{}", result);
    }
    Ok(())
}
