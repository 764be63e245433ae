mod evaluator;
mod printer;
mod reader;

use rustyline::DefaultEditor;

use evaluator::{Evaluator, InterpreterEvaluator};
use printer::{InterpreterPrinter, Printer};
use reader::{ReadOutput, Reader};

use crate::runner::RunError;

struct Repl<E: Evaluator, P: Printer> {
    reader: Reader,
    evaluator: E,
    printer: P,
}

impl<O, E: Evaluator<Object = O>, P: Printer<Object = O>> Repl<E, P> {
    fn run(mut self) -> Result<(), RunError> {
        loop {
            match self.reader.read()? {
                ReadOutput::Exit => break,
                ReadOutput::Skip => continue,
                ReadOutput::Value(program) => {
                    let result = self.evaluator.evaluate(program);
                    self.printer.print(result)
                }
            }
        }
        Ok(())
    }
}

/// Read-eval-print loop over stdin. Bindings persist across inputs.
pub fn start() -> Result<(), RunError> {
    let rl = DefaultEditor::new()?;

    Repl {
        reader: Reader::new(rl),
        evaluator: InterpreterEvaluator::new(),
        printer: InterpreterPrinter::new(std::io::stdout()),
    }
    .run()
}
