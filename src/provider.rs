//! Provider selection.

use std::fmt;
use std::str::FromStr;

/// Supported upstream illustration providers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProviderKind {
    /// Pixazo: JSON POST, optional bearer token.
    #[default]
    Pixazo,
    /// `OpenRouter`: JSON POST, bearer token required.
    OpenRouter,
    /// Pollinations: public URL template, no request issued by the gateway.
    Pollinations,
}

impl ProviderKind {
    /// Display name used in messages and logs.
    #[must_use]
    pub fn display_name(self) -> &'static str {
        match self {
            Self::Pixazo => "Pixazo",
            Self::OpenRouter => "OpenRouter",
            Self::Pollinations => "Pollinations",
        }
    }

    /// Prefix shared by this provider's environment variables.
    #[must_use]
    pub fn env_prefix(self) -> &'static str {
        match self {
            Self::Pixazo => "PIXAZO",
            Self::OpenRouter => "OPENROUTER",
            Self::Pollinations => "POLLINATIONS",
        }
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

impl FromStr for ProviderKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pixazo" => Ok(Self::Pixazo),
            "openrouter" => Ok(Self::OpenRouter),
            "pollinations" => Ok(Self::Pollinations),
            _ => Err(format!(
                "Unknown provider '{s}'. Expected 'pixazo', 'openrouter' or 'pollinations'."
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_known_providers() {
        assert_eq!("pixazo".parse::<ProviderKind>().unwrap(), ProviderKind::Pixazo);
        assert_eq!("OpenRouter".parse::<ProviderKind>().unwrap(), ProviderKind::OpenRouter);
        assert_eq!(" pollinations ".parse::<ProviderKind>().unwrap(), ProviderKind::Pollinations);
    }

    #[test]
    fn parse_unknown_provider() {
        let err = "dall-e".parse::<ProviderKind>().unwrap_err();
        assert!(err.contains("Unknown provider 'dall-e'"));
    }

    #[test]
    fn default_is_pixazo() {
        assert_eq!(ProviderKind::default(), ProviderKind::Pixazo);
        assert_eq!(ProviderKind::OpenRouter.env_prefix(), "OPENROUTER");
    }
}
