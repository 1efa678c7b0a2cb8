// Motor sequence loading
//
// Config format: plain text, one step per non-blank line as
// "<speed> <duration_ms>". Malformed lines are skipped with a warning;
// any failure to produce at least one step falls back to the built-in
// default, so the loaded sequence is never empty.

use std::fs;
use std::path::Path;

use crate::config::DEFAULT_SEQUENCE;
use crate::log::EventLog;

/// One timed actuation of the feeder motor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MotorStep {
    pub speed: i32,
    pub duration_ms: u64,
}

/// The built-in fallback sequence.
pub fn default_sequence() -> Vec<MotorStep> {
    DEFAULT_SEQUENCE
        .iter()
        .map(|&(speed, duration_ms)| MotorStep { speed, duration_ms })
        .collect()
}

/// Load the motor sequence from a config file, in file order.
///
/// Never fails: an unreadable file or a file yielding zero steps degrades
/// to the default sequence after reporting the problem.
pub fn load_sequence(path: &Path, log: &dyn EventLog) -> Vec<MotorStep> {
    let contents = match fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(e) => {
            log.error(&format!(
                "Could not open config file {}: {}. Using default sequence.",
                path.display(),
                e
            ));
            return default_sequence();
        }
    };

    let mut sequence = Vec::new();
    for line in contents.lines() {
        if line.trim().is_empty() {
            continue;
        }
        match parse_step(line) {
            Some(step) => sequence.push(step),
            None => log.warn(&format!("Invalid line in config file: {}", line)),
        }
    }

    if sequence.is_empty() {
        log.warn(&format!(
            "No motor sequence found in config file {}. Using default sequence.",
            path.display()
        ));
        return default_sequence();
    }

    log.info(&format!(
        "Motor sequence loaded from {} ({} steps)",
        path.display(),
        sequence.len()
    ));
    sequence
}

fn parse_step(line: &str) -> Option<MotorStep> {
    let mut fields = line.split_whitespace();
    // The speed field must be a whole integer; leftover characters would
    // block the duration read. The duration field only needs a valid
    // integer prefix, and anything after the second field is ignored.
    let speed = fields.next()?.parse().ok()?;
    let duration_ms = leading_int(fields.next()?).parse().ok()?;
    Some(MotorStep { speed, duration_ms })
}

/// Longest prefix of `field` that looks like a signed integer.
fn leading_int(field: &str) -> &str {
    let sign = matches!(field.as_bytes().first(), Some(b'+' | b'-')) as usize;
    let digits = field[sign..]
        .bytes()
        .take_while(|b| b.is_ascii_digit())
        .count();
    &field[..sign + digits]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::log::MemoryLog;
    use std::io::Write;

    fn write_config(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn parses_steps_in_file_order() {
        let file = write_config("100 1000\n50 500\n75 250\n");
        let log = MemoryLog::new();

        let sequence = load_sequence(file.path(), &log);

        assert_eq!(
            sequence,
            vec![
                MotorStep { speed: 100, duration_ms: 1000 },
                MotorStep { speed: 50, duration_ms: 500 },
                MotorStep { speed: 75, duration_ms: 250 },
            ]
        );
    }

    #[test]
    fn skips_malformed_lines_with_warning() {
        let file = write_config("100 1000\nnot a step\n50 500\n");
        let log = MemoryLog::new();

        let sequence = load_sequence(file.path(), &log);

        assert_eq!(sequence.len(), 2);
        assert_eq!(log.count(crate::log::Level::Warn), 1);
    }

    #[test]
    fn extra_fields_take_leading_integers() {
        let file = write_config("1 2 3\n100 200abc\n");
        let log = MemoryLog::new();

        let sequence = load_sequence(file.path(), &log);

        assert_eq!(
            sequence,
            vec![
                MotorStep { speed: 1, duration_ms: 2 },
                MotorStep { speed: 100, duration_ms: 200 },
            ]
        );
        assert_eq!(log.count(crate::log::Level::Warn), 0);
    }

    #[test]
    fn partial_speed_field_is_malformed() {
        let file = write_config("12.5 100\n50 500\n");
        let log = MemoryLog::new();

        let sequence = load_sequence(file.path(), &log);

        assert_eq!(sequence, vec![MotorStep { speed: 50, duration_ms: 500 }]);
        assert_eq!(log.count(crate::log::Level::Warn), 1);
    }

    #[test]
    fn missing_file_yields_default_sequence() {
        let log = MemoryLog::new();

        let sequence = load_sequence(Path::new("does_not_exist.txt"), &log);

        assert_eq!(sequence, default_sequence());
        assert_eq!(log.count(crate::log::Level::Error), 1);
    }

    #[test]
    fn all_malformed_yields_default_sequence() {
        let file = write_config("\n  \nfoo bar\n1 two three\n");
        let log = MemoryLog::new();

        let sequence = load_sequence(file.path(), &log);

        assert_eq!(sequence, default_sequence());
    }

    #[test]
    fn blank_lines_are_ignored() {
        let file = write_config("\n100 1000\n\n\n50 500\n");
        let log = MemoryLog::new();

        let sequence = load_sequence(file.path(), &log);

        assert_eq!(sequence.len(), 2);
        assert_eq!(log.count(crate::log::Level::Warn), 0);
    }
}
