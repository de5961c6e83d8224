use std::fmt::Display;
use std::io::{self, Write};

use serde::Serialize;
use serde_json::Value;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, Lines};

use crate::error::CliResult;

/// Line-oriented prompt/echo over any async reader and sync writer.
pub struct Console<R, W> {
    lines: Lines<R>,
    out: W,
}

impl<R, W> Console<R, W>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    pub fn new(reader: R, out: W) -> Self {
        Self {
            lines: reader.lines(),
            out,
        }
    }

    pub fn say(&mut self, line: impl Display) -> io::Result<()> {
        writeln!(self.out, "{line}")
    }

    /// Print `prompt` and read one line, without its line terminator.
    /// End of input is `UnexpectedEof`.
    pub async fn ask(&mut self, prompt: &str) -> io::Result<String> {
        write!(self.out, "{prompt}")?;
        self.out.flush()?;
        match self.lines.next_line().await? {
            Some(line) => Ok(line),
            None => Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "input closed",
            )),
        }
    }

    /// Number and print `items` without their ids, then let the user pick one.
    ///
    /// Prints a message and returns `None` for an empty list, a number out of
    /// range, or input that is not a number.
    pub async fn select<T: Serialize>(
        &mut self,
        items: Vec<T>,
        item_type: &str,
    ) -> CliResult<Option<T>> {
        if items.is_empty() {
            self.say(format!("No {item_type} found."))?;
            return Ok(None);
        }

        for (index, item) in items.iter().enumerate() {
            self.say(format!("{}. {}", index + 1, without_id(item)?))?;
        }

        let answer = self
            .ask(&format!("Select a {item_type} by number: "))
            .await?;
        let Ok(choice) = answer.trim().parse::<usize>() else {
            self.say("Invalid input.")?;
            return Ok(None);
        };
        if choice == 0 || choice > items.len() {
            self.say("Invalid selection.")?;
            return Ok(None);
        }
        Ok(items.into_iter().nth(choice - 1))
    }

    pub fn into_output(self) -> W {
        self.out
    }
}

/// Compact JSON rendering of a record.
pub fn render<T: Serialize>(item: &T) -> CliResult<String> {
    Ok(serde_json::to_string(item)?)
}

fn without_id<T: Serialize>(item: &T) -> CliResult<String> {
    let mut value = serde_json::to_value(item)?;
    if let Value::Object(map) = &mut value {
        map.remove("id");
    }
    Ok(value.to_string())
}
