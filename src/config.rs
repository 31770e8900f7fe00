//! Configuration resolution: defaults, environment variables and the secret store.

use std::collections::HashMap;
use std::path::PathBuf;

use crate::cli::Cli;
use crate::error::ImageError;
use crate::provider::ProviderKind;
use crate::secret_store::SecretStore;

/// Environment variable selecting the provider.
pub const PROVIDER_ENV: &str = "IMAGE_PROVIDER";

/// Keychain service name holding the `OpenRouter` API key.
pub const OPENROUTER_KEYCHAIN_SERVICE: &str = "story-train-openrouter";

/// Default prompt prefix: a cute picture-book illustration for primary school
/// children, bright pastel colours, followed by the scene.
pub const DEFAULT_PROMPT_PREFIX: &str =
    "초등학생을 위한 귀여운 동화풍 삽화, 밝은 파스텔 색감, 장면: ";

const PIXAZO_DEFAULT_ENDPOINT: &str = "https://api.pixazo.ai/v1/images/generations";
const OPENROUTER_DEFAULT_ENDPOINT: &str = "https://openrouter.ai/api/v1/images/generations";
const OPENROUTER_DEFAULT_MODEL: &str = "openai/gpt-image-1";
const POLLINATIONS_DEFAULT_TEMPLATE: &str =
    "https://image.pollinations.ai/prompt/{prompt}?width={width}&height={height}&nologo=true";

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 4173;
const DEFAULT_STATIC_ROOT: &str = "public";

/// A source of environment values.
pub trait EnvSource {
    /// Look up `key`, returning `None` when unset.
    fn var(&self, key: &str) -> Option<String>;

    /// Look up `key`, trimmed, treating empty values as unset.
    fn non_empty(&self, key: &str) -> Option<String> {
        self.var(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
    }
}

/// The real process environment.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnv;

impl EnvSource for ProcessEnv {
    fn var(&self, key: &str) -> Option<String> {
        std::env::var(key).ok()
    }
}

impl EnvSource for HashMap<String, String> {
    fn var(&self, key: &str) -> Option<String> {
        self.get(key).cloned()
    }
}

/// Immutable provider parameters, resolved once at startup.
#[derive(Clone, PartialEq, Eq)]
pub struct ProviderConfig {
    /// Which provider these parameters target.
    pub kind: ProviderKind,
    /// Request endpoint, or URL template for Pollinations.
    pub endpoint: String,
    /// API key, if one was found.
    pub credential: Option<String>,
    /// Environment variable the credential is read from.
    pub credential_var: String,
    /// Model identifier (`OpenRouter` only).
    pub model: Option<String>,
    /// Target image width in pixels.
    pub width: u32,
    /// Target image height in pixels.
    pub height: u32,
    /// Text prepended to every sentence.
    pub prompt_prefix: String,
    /// `HTTP-Referer` header value (`OpenRouter` only).
    pub referer: Option<String>,
    /// `X-Title` header value (`OpenRouter` only).
    pub app_title: Option<String>,
}

impl std::fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderConfig")
            .field("kind", &self.kind)
            .field("endpoint", &self.endpoint)
            .field("credential", &self.credential.as_ref().map(|_| "<redacted>"))
            .field("model", &self.model)
            .field("width", &self.width)
            .field("height", &self.height)
            .field("prompt_prefix", &self.prompt_prefix)
            .field("referer", &self.referer)
            .field("app_title", &self.app_title)
            .finish_non_exhaustive()
    }
}

impl ProviderConfig {
    /// Resolve parameters for `kind` from `env`, consulting `secrets` for the
    /// `OpenRouter` key when the environment has none.
    ///
    /// # Errors
    ///
    /// Returns an error if a width or height is not a positive integer.
    pub fn resolve(
        kind: ProviderKind,
        env: &dyn EnvSource,
        secrets: &dyn SecretStore,
    ) -> Result<Self, ImageError> {
        let prefix = kind.env_prefix();
        let var = |suffix: &str| env.non_empty(&format!("{prefix}_{suffix}"));

        let (default_endpoint, default_size) = match kind {
            ProviderKind::Pixazo => (PIXAZO_DEFAULT_ENDPOINT, 512),
            ProviderKind::OpenRouter => (OPENROUTER_DEFAULT_ENDPOINT, 1024),
            ProviderKind::Pollinations => (POLLINATIONS_DEFAULT_TEMPLATE, 512),
        };
        let endpoint_var = match kind {
            ProviderKind::Pollinations => "URL_TEMPLATE",
            _ => "ENDPOINT",
        };

        let credential_var = format!("{prefix}_API_KEY");
        let credential = match kind {
            ProviderKind::Pixazo => env.non_empty(&credential_var),
            ProviderKind::OpenRouter => env.non_empty(&credential_var).or_else(|| {
                let user = env.non_empty("USER").or_else(|| env.non_empty("USERNAME"));
                secrets.lookup(OPENROUTER_KEYCHAIN_SERVICE, user.as_deref())
            }),
            ProviderKind::Pollinations => None,
        };

        let model = match kind {
            ProviderKind::OpenRouter => {
                Some(var("MODEL").unwrap_or_else(|| OPENROUTER_DEFAULT_MODEL.to_string()))
            }
            _ => None,
        };
        let (referer, app_title) = match kind {
            ProviderKind::OpenRouter => (var("SITE_URL"), var("APP_TITLE")),
            _ => (None, None),
        };

        // The prefix is trimmed as a whole, so a trailing space in it is dropped.
        let prompt_prefix = env
            .var(&format!("{prefix}_PROMPT_PREFIX"))
            .unwrap_or_else(|| DEFAULT_PROMPT_PREFIX.to_string())
            .trim()
            .to_string();

        Ok(Self {
            kind,
            endpoint: var(endpoint_var).unwrap_or_else(|| default_endpoint.to_string()),
            credential,
            credential_var,
            model,
            width: parse_dimension(&format!("{prefix}_WIDTH"), var("WIDTH"), default_size)?,
            height: parse_dimension(&format!("{prefix}_HEIGHT"), var("HEIGHT"), default_size)?,
            prompt_prefix,
            referer,
            app_title,
        })
    }

    /// Prefix the sentence with the configured prompt prefix.
    #[must_use]
    pub fn compose_prompt(&self, sentence: &str) -> String {
        format!("{}{sentence}", self.prompt_prefix)
    }
}

fn parse_dimension(name: &str, raw: Option<String>, default: u32) -> Result<u32, ImageError> {
    let Some(raw) = raw else { return Ok(default) };
    match raw.parse::<u32>() {
        Ok(value) if value > 0 => Ok(value),
        _ => Err(ImageError::Config(format!("{name} must be a positive integer, got '{raw}'"))),
    }
}

/// Select the provider: CLI flag, then `IMAGE_PROVIDER`, then the default.
///
/// # Errors
///
/// Returns an error if the name is not a known provider.
pub fn resolve_provider_kind(
    explicit: Option<&str>,
    env: &dyn EnvSource,
) -> Result<ProviderKind, ImageError> {
    match explicit.map(str::to_string).or_else(|| env.non_empty(PROVIDER_ENV)) {
        Some(name) => name.parse().map_err(ImageError::Config),
        None => Ok(ProviderKind::default()),
    }
}

/// Where and what the gateway serves.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// Bind address.
    pub host: String,
    /// Bind port.
    pub port: u16,
    /// Directory static files are served from.
    pub static_root: PathBuf,
}

impl ServerConfig {
    /// Resolve from CLI flags, then `HOST`/`PORT`/`STATIC_ROOT`, then defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if `PORT` is not a valid port number.
    pub fn resolve(cli: &Cli, env: &dyn EnvSource) -> Result<Self, ImageError> {
        let host = cli
            .host
            .clone()
            .or_else(|| env.non_empty("HOST"))
            .unwrap_or_else(|| DEFAULT_HOST.to_string());

        let port = match (cli.port, env.non_empty("PORT")) {
            (Some(port), _) => port,
            (None, Some(raw)) => raw.parse().map_err(|_| {
                ImageError::Config(format!("PORT must be a port number, got '{raw}'"))
            })?,
            (None, None) => DEFAULT_PORT,
        };

        let static_root = cli
            .root
            .clone()
            .or_else(|| env.non_empty("STATIC_ROOT").map(PathBuf::from))
            .unwrap_or_else(|| PathBuf::from(DEFAULT_STATIC_ROOT));

        Ok(Self { host, port, static_root })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::secret_store::NoSecretStore;
    use clap::Parser;

    fn env(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs.iter().map(|(k, v)| ((*k).to_string(), (*v).to_string())).collect()
    }

    struct FixedStore(&'static str);

    impl SecretStore for FixedStore {
        fn lookup(&self, service: &str, account: Option<&str>) -> Option<String> {
            assert_eq!(service, OPENROUTER_KEYCHAIN_SERVICE);
            assert_eq!(account, Some("kim"));
            Some(self.0.to_string())
        }
    }

    struct PanicStore;

    impl SecretStore for PanicStore {
        fn lookup(&self, _service: &str, _account: Option<&str>) -> Option<String> {
            panic!("secret store must not be consulted");
        }
    }

    #[test]
    fn pixazo_defaults() {
        let config = ProviderConfig::resolve(ProviderKind::Pixazo, &env(&[]), &PanicStore).unwrap();
        assert_eq!(config.endpoint, PIXAZO_DEFAULT_ENDPOINT);
        assert_eq!(config.credential, None);
        assert_eq!(config.credential_var, "PIXAZO_API_KEY");
        assert_eq!((config.width, config.height), (512, 512));
        assert_eq!(config.prompt_prefix, DEFAULT_PROMPT_PREFIX.trim());
        assert_eq!(config.model, None);
    }

    #[test]
    fn pixazo_env_overrides() {
        let vars = env(&[
            ("PIXAZO_ENDPOINT", " https://example.test/gen "),
            ("PIXAZO_API_KEY", "secret"),
            ("PIXAZO_WIDTH", "768"),
            ("PIXAZO_HEIGHT", "640"),
            ("PIXAZO_PROMPT_PREFIX", "Watercolor: "),
        ]);
        let config = ProviderConfig::resolve(ProviderKind::Pixazo, &vars, &PanicStore).unwrap();
        assert_eq!(config.endpoint, "https://example.test/gen");
        assert_eq!(config.credential.as_deref(), Some("secret"));
        assert_eq!((config.width, config.height), (768, 640));
        assert_eq!(config.compose_prompt("a fox"), "Watercolor:a fox");
    }

    #[test]
    fn blank_key_counts_as_missing() {
        let vars = env(&[("PIXAZO_API_KEY", "   ")]);
        let config = ProviderConfig::resolve(ProviderKind::Pixazo, &vars, &PanicStore).unwrap();
        assert_eq!(config.credential, None);
    }

    #[test]
    fn invalid_dimension_is_config_error() {
        for bad in ["wide", "0", "-5"] {
            let vars = env(&[("PIXAZO_WIDTH", bad)]);
            let err =
                ProviderConfig::resolve(ProviderKind::Pixazo, &vars, &PanicStore).unwrap_err();
            assert!(err.to_string().contains("PIXAZO_WIDTH"), "{err}");
        }
    }

    #[test]
    fn openrouter_env_key_skips_keychain() {
        let vars = env(&[("OPENROUTER_API_KEY", "from-env"), ("OPENROUTER_MODEL", "vendor/model")]);
        let config =
            ProviderConfig::resolve(ProviderKind::OpenRouter, &vars, &PanicStore).unwrap();
        assert_eq!(config.credential.as_deref(), Some("from-env"));
        assert_eq!(config.model.as_deref(), Some("vendor/model"));
        assert_eq!((config.width, config.height), (1024, 1024));
    }

    #[test]
    fn openrouter_falls_back_to_keychain() {
        let vars = env(&[("USER", "kim"), ("OPENROUTER_SITE_URL", "https://story.example")]);
        let config =
            ProviderConfig::resolve(ProviderKind::OpenRouter, &vars, &FixedStore("from-keychain"))
                .unwrap();
        assert_eq!(config.credential.as_deref(), Some("from-keychain"));
        assert_eq!(config.model.as_deref(), Some(OPENROUTER_DEFAULT_MODEL));
        assert_eq!(config.referer.as_deref(), Some("https://story.example"));
        assert_eq!(config.app_title, None);
    }

    #[test]
    fn openrouter_without_any_key() {
        let config =
            ProviderConfig::resolve(ProviderKind::OpenRouter, &env(&[]), &NoSecretStore).unwrap();
        assert_eq!(config.credential, None);
    }

    #[test]
    fn pollinations_template() {
        let vars = env(&[("POLLINATIONS_URL_TEMPLATE", "https://img.test/{prompt}")]);
        let config =
            ProviderConfig::resolve(ProviderKind::Pollinations, &vars, &PanicStore).unwrap();
        assert_eq!(config.endpoint, "https://img.test/{prompt}");
        assert_eq!(config.credential, None);
    }

    #[test]
    fn debug_redacts_credential() {
        let vars = env(&[("PIXAZO_API_KEY", "super-secret")]);
        let config = ProviderConfig::resolve(ProviderKind::Pixazo, &vars, &PanicStore).unwrap();
        let printed = format!("{config:?}");
        assert!(!printed.contains("super-secret"));
        assert!(printed.contains("<redacted>"));
    }

    #[test]
    fn provider_kind_precedence() {
        let vars = env(&[(PROVIDER_ENV, "openrouter")]);
        assert_eq!(resolve_provider_kind(None, &vars).unwrap(), ProviderKind::OpenRouter);
        assert_eq!(
            resolve_provider_kind(Some("pollinations"), &vars).unwrap(),
            ProviderKind::Pollinations
        );
        assert_eq!(resolve_provider_kind(None, &env(&[])).unwrap(), ProviderKind::Pixazo);
        assert!(resolve_provider_kind(Some("bogus"), &vars).is_err());
    }

    #[test]
    fn server_defaults() {
        let cli = Cli::parse_from(["story-train"]);
        let server = ServerConfig::resolve(&cli, &env(&[])).unwrap();
        assert_eq!(server.host, "0.0.0.0");
        assert_eq!(server.port, 4173);
        assert_eq!(server.static_root, PathBuf::from("public"));
    }

    #[test]
    fn server_cli_beats_env() {
        let cli = Cli::parse_from(["story-train", "--port", "9000"]);
        let vars = env(&[("PORT", "8080"), ("HOST", "127.0.0.1"), ("STATIC_ROOT", "/srv/www")]);
        let server = ServerConfig::resolve(&cli, &vars).unwrap();
        assert_eq!(server.port, 9000);
        assert_eq!(server.host, "127.0.0.1");
        assert_eq!(server.static_root, PathBuf::from("/srv/www"));
    }

    #[test]
    fn server_rejects_bad_port() {
        let cli = Cli::parse_from(["story-train"]);
        assert!(ServerConfig::resolve(&cli, &env(&[("PORT", "http")])).is_err());
    }
}
