//! Operating modes selected on the command line

use crate::domain::ModeError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mode {
    /// Configure and start tracing, then exit leaving it running
    Start,
    /// Stop a running session and report
    End,
    /// Trace while running a command, then report
    Wrap(Vec<String>),
}

impl Mode {
    /// # Errors
    /// `ModeError` for `--start` with `--end`, a command with either of
    /// them, or neither flag and no command.
    pub fn from_flags(start: bool, end: bool, command: &[String]) -> Result<Self, ModeError> {
        match (start, end, command.is_empty()) {
            (true, true, _) => Err(ModeError::StartAndEnd),
            (true, false, false) => Err(ModeError::CommandWithStart),
            (false, true, false) => Err(ModeError::CommandWithEnd),
            (false, false, true) => Err(ModeError::MissingCommand),
            (true, false, true) => Ok(Self::Start),
            (false, true, true) => Ok(Self::End),
            (false, false, false) => Ok(Self::Wrap(command.to_vec())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cmd() -> Vec<String> {
        vec!["sleep".to_string(), "1".to_string()]
    }

    #[test]
    fn test_valid_modes() {
        assert_eq!(Mode::from_flags(true, false, &[]), Ok(Mode::Start));
        assert_eq!(Mode::from_flags(false, true, &[]), Ok(Mode::End));
        assert_eq!(Mode::from_flags(false, false, &cmd()), Ok(Mode::Wrap(cmd())));
    }

    #[test]
    fn test_invalid_combinations() {
        assert_eq!(Mode::from_flags(true, true, &[]), Err(ModeError::StartAndEnd));
        assert_eq!(Mode::from_flags(true, true, &cmd()), Err(ModeError::StartAndEnd));
        assert_eq!(Mode::from_flags(true, false, &cmd()), Err(ModeError::CommandWithStart));
        assert_eq!(Mode::from_flags(false, true, &cmd()), Err(ModeError::CommandWithEnd));
        assert_eq!(Mode::from_flags(false, false, &[]), Err(ModeError::MissingCommand));
    }
}
