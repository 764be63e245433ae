use monkey_lang_core::ast::Program;
use monkey_lang_core::parser;
use rustyline::error::ReadlineError;
use rustyline::history::DefaultHistory;
use rustyline::Editor;

use crate::runner::parse_errors_message;

const PROMPT: &str = ">> ";

pub enum ReadOutput {
    Exit,
    Skip,
    Value(Program),
}

pub struct Reader {
    rl: Editor<(), DefaultHistory>,
}

impl Reader {
    pub fn new(rl: Editor<(), DefaultHistory>) -> Self {
        Self { rl }
    }

    /// Reads one line and parses it. Parse errors are reported here and the
    /// line is dropped.
    pub fn read(&mut self) -> Result<ReadOutput, ReadlineError> {
        let line = match self.rl.readline(PROMPT) {
            Err(ReadlineError::Interrupted) => {
                println!("CTRL-C");
                return Ok(ReadOutput::Skip);
            }
            Err(ReadlineError::Eof) => {
                println!("CTRL-D");
                return Ok(ReadOutput::Exit);
            }
            Err(err) => return Err(err),
            Ok(line) => line,
        };

        if line.trim().is_empty() {
            return Ok(ReadOutput::Skip);
        }
        self.rl.add_history_entry(line.as_str())?;

        match parser::parse(&line) {
            Ok(program) => Ok(ReadOutput::Value(program)),
            Err(errors) => {
                println!("{}", parse_errors_message(&errors));
                Ok(ReadOutput::Skip)
            }
        }
    }
}
