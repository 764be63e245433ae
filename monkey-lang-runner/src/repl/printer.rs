use std::io::Write;

use gc::Gc;
use monkey_lang_interpreter::object::{EvaluationError, Object};

pub trait Printer {
    type Object;

    fn print(&mut self, object: Self::Object);
}

pub struct InterpreterPrinter<W: Write> {
    out: W,
}

impl<W: Write> InterpreterPrinter<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }
}

impl<W: Write> Printer for InterpreterPrinter<W> {
    type Object = Result<Gc<Object>, EvaluationError>;

    fn print(&mut self, object: Self::Object) {
        let written = match object {
            Ok(obj) => writeln!(self.out, "{}", obj),
            Err(err) => writeln!(self.out, "ERROR: {}", err),
        };
        if let Err(err) = written {
            tracing::warn!(%err, "could not write result");
        }
    }
}
