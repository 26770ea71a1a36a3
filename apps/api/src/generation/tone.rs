//! Tone presets for the companion email.
//!
//! Unknown tone strings are not an error: they resolve to [`Tone::Formal`],
//! the documented default, so a stale or hand-edited form value still produces an email.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tone {
    #[default]
    Formal,
    Enthusiastic,
    ShortDirect,
}

impl Tone {
    /// Parses a form value (`formal`, `enthusiastic`, `short_direct`), matched exactly.
    /// Anything else, padded values included, falls back to [`Tone::Formal`].
    pub fn parse(value: &str) -> Self {
        Self::from_known(value).unwrap_or_default()
    }

    /// Strict lookup; `None` for unrecognized values.
    pub fn from_known(value: &str) -> Option<Self> {
        match value {
            "formal" => Some(Self::Formal),
            "enthusiastic" => Some(Self::Enthusiastic),
            "short_direct" => Some(Self::ShortDirect),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Formal => "formal",
            Self::Enthusiastic => "enthusiastic",
            Self::ShortDirect => "short_direct",
        }
    }

    /// Opening instruction of the email prompt.
    pub fn instruction(self) -> &'static str {
        match self {
            Self::Formal => "Write a formal, professional email that is polite and concise.",
            Self::Enthusiastic => {
                "Write an enthusiastic email that conveys excitement and passion for the position."
            }
            Self::ShortDirect => "Write a short, direct email that gets straight to the point.",
        }
    }
}

impl fmt::Display for Tone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
