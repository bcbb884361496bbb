use std::{
    io::{self, BufRead, Write},
    path::PathBuf,
};

pub const PROMPT: &str = "Enter the path to the key: ";

/// Use the directory from the command line, or ask for one on `input`.
/// Only the line terminator is stripped; an empty answer means the current directory.
pub fn resolve_directory(
    arg: Option<PathBuf>,
    input: &mut impl BufRead,
    output: &mut impl Write,
) -> io::Result<PathBuf> {
    if let Some(dir) = arg {
        return Ok(dir);
    }

    write!(output, "{PROMPT}")?;
    output.flush()?;

    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Err(io::Error::new(
            io::ErrorKind::UnexpectedEof,
            "no key path entered",
        ));
    }

    match line.trim_end_matches(['\r', '\n']) {
        "" => Ok(PathBuf::from(".")),
        path => Ok(PathBuf::from(path)),
    }
}
