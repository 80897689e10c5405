pub mod commands;
pub mod feed;
pub mod filler;
pub mod health;
pub mod runtime;
pub mod state;

use std::io::Write;

/// Read one console line. `None` signals end of input.
pub fn readline() -> Result<Option<String>, String> {
    write!(std::io::stdout(), "> ").map_err(|e| e.to_string())?;
    std::io::stdout().flush().map_err(|e| e.to_string())?;
    let mut buffer = String::new();
    let bytes = std::io::stdin()
        .read_line(&mut buffer)
        .map_err(|e| e.to_string())?;
    if bytes == 0 {
        return Ok(None);
    }
    Ok(Some(buffer))
}
