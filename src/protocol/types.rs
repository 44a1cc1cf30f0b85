use crate::errors::CommandError;

/// Fields per request line: the command name plus at most two arguments.
const MAX_FIELDS: usize = 3;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    pub command: String,
    pub args: Vec<String>,
}

impl Request {
    /// Splits a request line on whitespace into at most three fields. The last field
    /// keeps everything after the second separator, inner and trailing whitespace
    /// included, so `upload notes.txt two words` carries `two words` as content.
    pub fn parse(line: &str) -> Result<Self, CommandError> {
        let mut fields = split_fields(line, MAX_FIELDS).into_iter();
        let command = fields.next().ok_or(CommandError::EmptyCommand)?;
        Ok(Self { command: command.to_string(), args: fields.map(str::to_string).collect() })
    }
}

fn split_fields(line: &str, max: usize) -> Vec<&str> {
    let mut fields = Vec::new();
    let mut rest = line.trim_start();
    while !rest.is_empty() {
        if fields.len() + 1 == max {
            fields.push(rest);
            break;
        }
        match rest.find(char::is_whitespace) {
            Some(end) => {
                fields.push(&rest[..end]);
                rest = rest[end..].trim_start();
            }
            None => {
                fields.push(rest);
                break;
            }
        }
    }
    fields
}
