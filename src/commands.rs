use anyhow::{bail, Context, Result};
use tracing::debug;

use crate::error::OptionsError;
use crate::options::Options;
use crate::setting::SettingType;

/// Apply a block of already-read configuration text to the registry, one
/// directive per line. Blank lines and `#` comments are skipped. Stops at
/// the first failing line, reporting its line number.
///
/// The grammar matches what [`Options::dump_all`] produces, so a dump can
/// be fed back through here unchanged.
pub fn source(options: &mut Options, input: &str) -> Result<()> {
    for (number, line) in input.lines().enumerate() {
        apply_line(options, line).with_context(|| format!("line {}", number + 1))?;
    }
    Ok(())
}

fn apply_line(options: &mut Options, line: &str) -> Result<()> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return Ok(());
    }

    let (verb, argument) = match line.split_once(char::is_whitespace) {
        Some((verb, rest)) => (verb, rest.trim_start()),
        None => (line, ""),
    };

    match verb {
        "set" => set_directive(options, argument),
        _ => bail!("unknown directive '{}'", verb),
    }
}

/// Handle the argument of one `set` directive.
///
/// `key=value` assigns; the value is the remainder of the line, verbatim,
/// since column lists and format strings contain spaces. A bare key sets a
/// boolean option to true, the `no`-prefixed form sets it to false, and a
/// trailing `!` toggles it.
pub fn set_directive(options: &mut Options, argument: &str) -> Result<()> {
    if argument.is_empty() {
        bail!("expected option name");
    }

    if let Some((key, value)) = argument.split_once('=') {
        options.set(key.trim_end(), value)?;
        return Ok(());
    }

    if let Some(key) = argument.strip_suffix('!') {
        options.toggle(key)?;
        return Ok(());
    }

    // Bare form: booleans only. Aliases count when their target does.
    let key = argument;
    if let Some(cell) = options.resolve(key) {
        if cell.kind() != SettingType::Boolean {
            return Err(OptionsError::NotBoolean(key.to_string()).into());
        }
        debug!("COMMANDS: set {}", key);
        options.set(key, "true")?;
        return Ok(());
    }
    if let Some(target) = key.strip_prefix("no") {
        if matches!(options.resolve(target), Some(cell) if cell.kind() == SettingType::Boolean) {
            debug!("COMMANDS: set {}", key);
            options.set(target, "false")?;
            return Ok(());
        }
    }
    Err(OptionsError::InvalidOption(key.to_string()).into())
}
