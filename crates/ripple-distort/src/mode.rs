use std::fmt;

use thiserror::Error;

/// Distortion function selected in the post-processing shader.
///
/// The discriminant is the integer written to the `mode` uniform.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Default)]
#[repr(i32)]
pub enum Mode {
    /// RGB channels split along the pointer's wake.
    #[default]
    Color = 1,
    /// Image pulled toward the pointer.
    Zoom = 2,
    /// Noisy displacement around the pointer.
    Random = 3,
}

#[derive(Debug, Clone, Copy, Eq, PartialEq, Error)]
pub enum ModeError {
    #[error("unknown distortion mode index {0} (expected 1, 2 or 3)")]
    UnknownIndex(u32),
}

impl Mode {
    pub const ALL: [Mode; 3] = [Mode::Color, Mode::Zoom, Mode::Random];

    /// Value written to the shader's `mode` uniform.
    #[inline]
    pub fn uniform_value(self) -> i32 {
        self as i32
    }

    pub fn name(self) -> &'static str {
        match self {
            Mode::Color => "color",
            Mode::Zoom => "zoom",
            Mode::Random => "random",
        }
    }
}

impl TryFrom<u32> for Mode {
    type Error = ModeError;

    /// Converts a 1-based selector index.
    fn try_from(index: u32) -> Result<Self, Self::Error> {
        match index {
            1 => Ok(Mode::Color),
            2 => Ok(Mode::Zoom),
            3 => Ok(Mode::Random),
            other => Err(ModeError::UnknownIndex(other)),
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn indices_are_one_based() {
        assert_eq!(Mode::try_from(1), Ok(Mode::Color));
        assert_eq!(Mode::try_from(2), Ok(Mode::Zoom));
        assert_eq!(Mode::try_from(3), Ok(Mode::Random));
    }

    #[test]
    fn out_of_range_index_is_rejected() {
        assert_eq!(Mode::try_from(0), Err(ModeError::UnknownIndex(0)));
        assert_eq!(Mode::try_from(4), Err(ModeError::UnknownIndex(4)));
    }

    #[test]
    fn uniform_value_matches_index() {
        for (i, mode) in Mode::ALL.iter().enumerate() {
            assert_eq!(mode.uniform_value(), i as i32 + 1);
        }
    }

    #[test]
    fn error_message_names_the_index() {
        let msg = ModeError::UnknownIndex(7).to_string();
        assert!(msg.contains('7'));
    }
}
