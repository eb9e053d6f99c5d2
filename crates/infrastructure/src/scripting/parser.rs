//! Parser for the hook script language.
//!
//! One command per line:
//! - `set("name", "value")` - Set a context variable
//! - `setProperty("name", "value")` - Set a custom project property
//! - `log("message")` - Write to the script log
//! - `assert("condition", "message")` - Fail the hook unless the condition holds
//!
//! Blank lines and lines starting with `//` or `#` are ignored.

use apiforge_application::ScriptError;
use apiforge_domain::HookCommand;
use thiserror::Error;

/// Error type for script parsing.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// Unknown command.
    #[error("Unknown command: {name}")]
    UnknownCommand {
        /// The line number where the command appears.
        line: usize,
        /// The command name.
        name: String,
    },
    /// Invalid syntax.
    #[error("Invalid syntax: {message}")]
    InvalidSyntax {
        /// The line number where the error occurred.
        line: usize,
        /// The error message.
        message: String,
    },
    /// Wrong number of arguments.
    #[error("Missing argument for command {command}: expected {expected}")]
    MissingArgument {
        /// The line number where the command appears.
        line: usize,
        /// The command name.
        command: String,
        /// The expected argument description.
        expected: &'static str,
    },
}

impl ParseError {
    /// Returns the 1-based line of the error.
    #[must_use]
    pub const fn line(&self) -> usize {
        match self {
            Self::UnknownCommand { line, .. }
            | Self::InvalidSyntax { line, .. }
            | Self::MissingArgument { line, .. } => *line,
        }
    }
}

impl From<ParseError> for ScriptError {
    fn from(err: ParseError) -> Self {
        Self::Parse {
            line: err.line(),
            message: err.to_string(),
        }
    }
}

/// Parse a script into a list of commands.
///
/// # Errors
///
/// Returns an error if the script contains invalid syntax.
pub fn parse_script(script: &str) -> Result<Vec<HookCommand>, ParseError> {
    let mut commands = Vec::new();

    for (line_num, line) in script.lines().enumerate() {
        let line = line.trim().trim_end_matches(';').trim_end();

        if line.is_empty() || line.starts_with("//") || line.starts_with('#') {
            continue;
        }

        commands.push(parse_line(line, line_num + 1)?);
    }

    Ok(commands)
}

fn parse_line(line: &str, line_num: usize) -> Result<HookCommand, ParseError> {
    let Some(paren_pos) = line.find('(') else {
        return Err(ParseError::InvalidSyntax {
            line: line_num,
            message: "Expected '(' after command name".to_string(),
        });
    };

    let command_name = line[..paren_pos].trim();
    let args_str = line[paren_pos..].trim();

    let Some(args_content) = args_str
        .strip_prefix('(')
        .and_then(|rest| rest.strip_suffix(')'))
    else {
        return Err(ParseError::InvalidSyntax {
            line: line_num,
            message: "Missing closing ')'".to_string(),
        });
    };
    let mut args = parse_arguments(args_content, line_num)?.into_iter();

    let missing = |expected| ParseError::MissingArgument {
        line: line_num,
        command: command_name.to_string(),
        expected,
    };

    match command_name {
        "set" | "setVariable" => match (args.next(), args.next(), args.next()) {
            (Some(name), Some(value), None) => Ok(HookCommand::SetVariable { name, value }),
            _ => Err(missing("2 arguments (name, value)")),
        },
        "setProperty" | "project.setPropertyValue" => {
            match (args.next(), args.next(), args.next()) {
                (Some(name), Some(value), None) => Ok(HookCommand::SetProperty { name, value }),
                _ => Err(missing("2 arguments (name, value)")),
            }
        }
        "log" | "log.info" => {
            let message: Vec<String> = args.collect();
            if message.is_empty() {
                return Err(missing("1 argument (message)"));
            }
            Ok(HookCommand::Log {
                message: message.join(", "),
            })
        }
        "assert" => match (args.next(), args.next(), args.next()) {
            (Some(condition), message, None) => Ok(HookCommand::Assert { condition, message }),
            _ => Err(missing("1-2 arguments (condition, optional message)")),
        },
        _ => Err(ParseError::UnknownCommand {
            line: line_num,
            name: command_name.to_string(),
        }),
    }
}

fn parse_arguments(args_str: &str, line_num: usize) -> Result<Vec<String>, ParseError> {
    let mut args = Vec::new();
    let mut current = String::new();
    let mut in_string = false;
    let mut string_char = '"';
    let mut escape_next = false;
    let mut quoted = false;

    for ch in args_str.chars() {
        if escape_next {
            current.push(ch);
            escape_next = false;
            continue;
        }

        match ch {
            '\\' => {
                escape_next = true;
            }
            '"' | '\'' => {
                if !in_string {
                    in_string = true;
                    quoted = true;
                    string_char = ch;
                } else if ch == string_char {
                    in_string = false;
                } else {
                    current.push(ch);
                }
            }
            ',' if !in_string => {
                push_argument(&mut args, &current, quoted);
                current.clear();
                quoted = false;
            }
            _ => {
                current.push(ch);
            }
        }
    }

    if in_string {
        return Err(ParseError::InvalidSyntax {
            line: line_num,
            message: "Unterminated string".to_string(),
        });
    }

    push_argument(&mut args, &current, quoted);
    Ok(args)
}

// A quoted argument counts even when empty.
fn push_argument(args: &mut Vec<String>, raw: &str, quoted: bool) {
    let arg = raw.trim();
    if quoted || !arg.is_empty() {
        args.push(arg.to_string());
    }
}
