use std::io::{self, BufRead, Write};

use crate::cli::{apply, parse_line, SESSION_HELP};
use crate::core::error::AppError;
use crate::core::form::FormController;

pub fn run(form: FormController) -> Result<(), AppError> {
    let stdin = io::stdin();
    let stdout = io::stdout();
    session(form, stdin.lock(), stdout.lock())
}

pub fn session<R: BufRead, W: Write>(
    mut form: FormController,
    mut input: R,
    mut output: W,
) -> Result<(), AppError> {
    let mut line = String::new();

    loop {
        line.clear();
        write!(output, "submerge> ")?;
        output.flush()?;

        let bytes_read = input.read_line(&mut line)?;
        if bytes_read == 0 {
            break;
        }

        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }

        if trimmed.eq_ignore_ascii_case("exit") || trimmed.eq_ignore_ascii_case("quit") {
            break;
        }

        if trimmed.eq_ignore_ascii_case("help") {
            for help in SESSION_HELP {
                writeln!(output, "{help}")?;
            }
            continue;
        }

        if trimmed.eq_ignore_ascii_case("clear") {
            continue;
        }

        match parse_line(trimmed) {
            Ok(command) => {
                for text in apply(&mut form, command) {
                    writeln!(output, "{text}")?;
                }
                if let Some(alert) = form.dismiss_alert() {
                    writeln!(output, "!! {alert}")?;
                }
            }
            Err(err) => {
                writeln!(output, "{}", err.trim_end())?;
            }
        }
    }

    Ok(())
}
