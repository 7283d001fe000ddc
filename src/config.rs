use crate::error::ConfigError;
use crate::stream::DEFAULT_CHUNK_SIZE;
use crate::util::{env_value, parse_bool_str, parse_positive};
use std::io::IsTerminal;
use std::time::Duration;

const TITLE_ENV: &str = "VEX_CONSOLE_TITLE";
const CHUNK_SIZE_ENV: &str = "VEX_CONSOLE_CHUNK_SIZE";
const TICK_MS_ENV: &str = "VEX_CONSOLE_TICK_MS";
const RESPONSE_DELAY_MS_ENV: &str = "VEX_CONSOLE_RESPONSE_DELAY_MS";
const COPY_RESET_MS_ENV: &str = "VEX_CONSOLE_COPY_RESET_MS";
const COLORS_ENV: &str = "VEX_CONSOLE_COLORS";

pub const DEFAULT_TITLE: &str = "Extracting Plain Text from Websites";
pub const DEFAULT_COMMAND_LINE: &str = "npm run start";
pub const DEFAULT_TICK_INTERVAL: Duration = Duration::from_millis(100);
pub const DEFAULT_RESPONSE_DELAY: Duration = Duration::from_millis(500);
pub const DEFAULT_COPY_RESET: Duration = Duration::from_secs(2);

/// Reply revealed after every user message.
pub const DEFAULT_RESPONSE: &str = "The window is still pointing at the source tree. After the Vite build the helper HTML lives under `.vite/build`, so resolve it from the working directory and make sure the build copies the file.\nChanges applied successfully. The path now correctly points to the file location in the build output directory.\n```code-suggestions\n[{\"file\":\"src/main.ts\",\"description\":\"Resolve the scraping helper from the build output\",\"newCode\":\"const scrapingPath = path.join(process.cwd(), '.vite/build/helpers/ipc/model.html');\\nawait scrapingWindow.loadFile(scrapingPath);\",\"highlight\":[1]},{\"file\":\"vite.config.ts\",\"description\":\"Copy the scraping helper into the build output\",\"newCode\":\"build: {\\n  rollupOptions: {\\n    input: { scraping: 'src/scraping/scraping.html' }\\n  }\\n}\",\"isAdded\":true}]\n```";

/// Reply used by `/demo`.
pub const DEMO_RESPONSE: &str = "Streaming demo: this reply arrives in small chunks, the way a model would stream it.\nCode fences are lifted out as soon as they close:\n```python\ndef extract_text(html):\n    return soup(html).get_text()  # plain text\n```\nAnything after the fence keeps streaming as prose.";

#[derive(Debug, Clone)]
pub struct Config {
    pub title: String,
    pub command_line: String,
    pub chunk_size: usize,
    pub tick_interval: Duration,
    pub response_delay: Duration,
    pub copy_reset: Duration,
    pub colors_enabled: bool,
    pub response: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            title: DEFAULT_TITLE.to_string(),
            command_line: DEFAULT_COMMAND_LINE.to_string(),
            chunk_size: DEFAULT_CHUNK_SIZE,
            tick_interval: DEFAULT_TICK_INTERVAL,
            response_delay: DEFAULT_RESPONSE_DELAY,
            copy_reset: DEFAULT_COPY_RESET,
            colors_enabled: true,
            response: DEFAULT_RESPONSE.to_string(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let chunk_size = match env_value(CHUNK_SIZE_ENV) {
            Some(raw) => positive(CHUNK_SIZE_ENV, &raw)? as usize,
            None => defaults.chunk_size,
        };
        let tick_interval = match env_value(TICK_MS_ENV) {
            Some(raw) => Duration::from_millis(positive(TICK_MS_ENV, &raw)?),
            None => defaults.tick_interval,
        };
        // Zero is a valid delay: the reply starts on the next tick.
        let response_delay = match env_value(RESPONSE_DELAY_MS_ENV) {
            Some(raw) => Duration::from_millis(raw.parse::<u64>().map_err(|_| {
                ConfigError::Invalid(format!(
                    "{RESPONSE_DELAY_MS_ENV} must be a whole number of milliseconds, got '{raw}'"
                ))
            })?),
            None => defaults.response_delay,
        };
        let copy_reset = match env_value(COPY_RESET_MS_ENV) {
            Some(raw) => Duration::from_millis(positive(COPY_RESET_MS_ENV, &raw)?),
            None => defaults.copy_reset,
        };
        let colors_enabled = match env_value(COLORS_ENV) {
            Some(raw) => parse_bool_str(&raw).ok_or(ConfigError::InvalidFlag {
                var: COLORS_ENV,
                value: raw,
            })?,
            None => std::env::var_os("NO_COLOR").is_none() && std::io::stdout().is_terminal(),
        };

        Ok(Self {
            title: env_value(TITLE_ENV).unwrap_or(defaults.title),
            command_line: defaults.command_line,
            chunk_size,
            tick_interval,
            response_delay,
            copy_reset,
            colors_enabled,
            response: defaults.response,
        })
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.chunk_size == 0 {
            return Err(ConfigError::Invalid(
                "chunk size must be at least one character".to_string(),
            ));
        }
        if self.tick_interval.is_zero() {
            return Err(ConfigError::Invalid(
                "tick interval must be greater than zero".to_string(),
            ));
        }
        if self.copy_reset.is_zero() {
            return Err(ConfigError::Invalid(
                "copy indicator reset must be greater than zero".to_string(),
            ));
        }
        if self.title.trim().is_empty() {
            return Err(ConfigError::Invalid("title must not be blank".to_string()));
        }
        Ok(())
    }
}

fn positive(var: &'static str, raw: &str) -> Result<u64, ConfigError> {
    parse_positive(raw).ok_or_else(|| ConfigError::InvalidNumber {
        var,
        value: raw.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::ScopedEnv;

    const CONSOLE_VARS: [&str; 6] = [
        TITLE_ENV,
        CHUNK_SIZE_ENV,
        TICK_MS_ENV,
        RESPONSE_DELAY_MS_ENV,
        COPY_RESET_MS_ENV,
        COLORS_ENV,
    ];

    #[test]
    fn test_load_uses_defaults_when_env_is_unset() {
        let _env = ScopedEnv::cleared(&CONSOLE_VARS);
        let config = Config::load().unwrap();
        assert_eq!(config.title, DEFAULT_TITLE);
        assert_eq!(config.chunk_size, 15);
        assert_eq!(config.tick_interval, Duration::from_millis(100));
        assert_eq!(config.response_delay, Duration::from_millis(500));
        assert_eq!(config.copy_reset, Duration::from_secs(2));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_load_reads_overrides() {
        let mut env = ScopedEnv::cleared(&CONSOLE_VARS);
        env.set(TITLE_ENV, "Scratch");
        env.set(CHUNK_SIZE_ENV, "4");
        env.set(TICK_MS_ENV, "20");
        env.set(RESPONSE_DELAY_MS_ENV, "0");
        env.set(COLORS_ENV, "off");

        let config = Config::load().unwrap();

        assert_eq!(config.title, "Scratch");
        assert_eq!(config.chunk_size, 4);
        assert_eq!(config.tick_interval, Duration::from_millis(20));
        assert!(config.response_delay.is_zero());
        assert!(!config.colors_enabled);
    }

    #[test]
    fn test_load_rejects_invalid_values_naming_the_variable() {
        let mut env = ScopedEnv::cleared(&CONSOLE_VARS);
        env.set(CHUNK_SIZE_ENV, "0");
        let err = Config::load().unwrap_err();
        assert!(err.to_string().contains(CHUNK_SIZE_ENV));

        env.remove(CHUNK_SIZE_ENV);
        env.set(COLORS_ENV, "sometimes");
        let err = Config::load().unwrap_err();
        assert!(matches!(err, ConfigError::InvalidFlag { .. }));

        env.remove(COLORS_ENV);
        env.set(RESPONSE_DELAY_MS_ENV, "soon");
        let err = Config::load().unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn test_validate_rejects_zero_chunk_size() {
        let config = Config {
            chunk_size: 0,
            ..Config::default()
        };
        assert!(config.validate().is_err());
    }
}
