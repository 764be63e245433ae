use gc::Gc;

use crate::object::{BuiltinFn, BuiltinFunction, EvaluationError, Object};

fn check_arity(args: &[Gc<Object>], expected: usize) -> Result<(), EvaluationError> {
    if args.len() != expected {
        return Err(EvaluationError::WrongArgumentCount {
            expected,
            actual: args.len(),
        });
    }
    Ok(())
}

fn expected_array(function: &'static str, got: &Object) -> EvaluationError {
    EvaluationError::WrongArgumentType {
        function,
        expected: "ARRAY",
        got: got.type_name(),
    }
}

fn builtin_len(args: Vec<Gc<Object>>) -> Result<Gc<Object>, EvaluationError> {
    check_arity(&args, 1)?;
    match &*args[0] {
        Object::String(s) => Ok(Object::integer(s.len() as i64)),
        Object::Array(arr) => Ok(Object::integer(arr.len() as i64)),
        other => Err(EvaluationError::UnsupportedArgument {
            function: "len",
            got: other.type_name(),
        }),
    }
}

fn builtin_first(args: Vec<Gc<Object>>) -> Result<Gc<Object>, EvaluationError> {
    check_arity(&args, 1)?;
    match &*args[0] {
        Object::Array(arr) => Ok(arr.first().cloned().unwrap_or_else(Object::null)),
        other => Err(expected_array("first", other)),
    }
}

fn builtin_last(args: Vec<Gc<Object>>) -> Result<Gc<Object>, EvaluationError> {
    check_arity(&args, 1)?;
    match &*args[0] {
        Object::Array(arr) => Ok(arr.last().cloned().unwrap_or_else(Object::null)),
        other => Err(expected_array("last", other)),
    }
}

fn builtin_rest(args: Vec<Gc<Object>>) -> Result<Gc<Object>, EvaluationError> {
    check_arity(&args, 1)?;
    match &*args[0] {
        Object::Array(arr) if arr.is_empty() => Ok(Object::null()),
        Object::Array(arr) => Ok(Object::array(arr[1..].to_vec())),
        other => Err(expected_array("rest", other)),
    }
}

fn builtin_push(args: Vec<Gc<Object>>) -> Result<Gc<Object>, EvaluationError> {
    check_arity(&args, 2)?;
    match &*args[0] {
        Object::Array(arr) => {
            let mut new_arr = arr.clone();
            new_arr.push(args[1].clone());
            Ok(Object::array(new_arr))
        }
        other => Err(expected_array("push", other)),
    }
}

fn builtin_puts(args: Vec<Gc<Object>>) -> Result<Gc<Object>, EvaluationError> {
    for arg in &args {
        let value: &Object = arg;
        println!("{}", value);
    }
    Ok(Object::null())
}

fn builtin_to_string(args: Vec<Gc<Object>>) -> Result<Gc<Object>, EvaluationError> {
    check_arity(&args, 1)?;
    Ok(Object::string(args[0].to_string()))
}

const BUILTINS: [(&str, BuiltinFn); 7] = [
    ("len", builtin_len),
    ("first", builtin_first),
    ("last", builtin_last),
    ("rest", builtin_rest),
    ("push", builtin_push),
    ("puts", builtin_puts),
    ("to_string", builtin_to_string),
];

/// The fixed table of native functions reachable from Monkey code.
pub fn lookup(name: &str) -> Option<BuiltinFunction> {
    BUILTINS
        .iter()
        .find(|(known, _)| *known == name)
        .map(|&(name, func)| BuiltinFunction { name, func })
}
