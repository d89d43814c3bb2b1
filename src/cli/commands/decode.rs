//! Decode command implementation

use crate::cli::error::CliError;
use crate::stream::{Accumulator, DeltaStream, StreamProtocol};
use std::fs::File;
use std::io::{ErrorKind, Read, Write};
use std::path::PathBuf;

const CHUNK_SIZE: usize = 8 * 1024;

/// Open input from file or stdin
fn open_input(input: &str) -> Result<Box<dyn Read>, CliError> {
    if input == "-" {
        Ok(Box::new(std::io::stdin()))
    } else {
        let path = PathBuf::from(input);
        let file = File::open(&path).map_err(|e| CliError::FileReadError(path, e.to_string()))?;
        Ok(Box::new(file))
    }
}

/// Handle the `decode` command
///
/// Text fragments are written to stdout as they are decoded; malformed
/// frames and usage go to stderr once the stream ends.
pub fn handle_decode(input: &str, protocol: &StreamProtocol) -> Result<(), CliError> {
    let mut reader = open_input(input)?;
    let mut read_error = None;
    let chunks = std::iter::from_fn(|| {
        let mut buffer = vec![0u8; CHUNK_SIZE];
        loop {
            match reader.read(&mut buffer) {
                Ok(0) => return None,
                Ok(n) => {
                    buffer.truncate(n);
                    return Some(buffer);
                }
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => {
                    read_error = Some(e);
                    return None;
                }
            }
        }
    });

    let mut accumulator = Accumulator::new();
    let mut stdout = std::io::stdout().lock();
    for fragment in accumulator.consume(DeltaStream::new(chunks, protocol.clone())) {
        write_out(&mut stdout, fragment.as_bytes())?;
    }
    write_out(&mut stdout, b"\n")?;

    if let Some(e) = read_error {
        return Err(CliError::FileReadError(PathBuf::from(input), e.to_string()));
    }

    for warning in accumulator.warnings() {
        eprintln!("⚠️  {}", warning);
    }
    if let Some(usage) = accumulator.usage() {
        eprintln!(
            "Tokens: {} prompt + {} completion = {}",
            usage.prompt_tokens, usage.completion_tokens, usage.total_tokens
        );
    }

    Ok(())
}

fn write_out(stdout: &mut impl Write, bytes: &[u8]) -> Result<(), CliError> {
    stdout
        .write_all(bytes)
        .and_then(|_| stdout.flush())
        .map_err(|e| CliError::OutputError(e.to_string()))
}
