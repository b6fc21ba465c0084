//! Step inputs.
//!
//! CI runners hand step inputs to the process as `INPUT_<NAME>` environment
//! variables (name upper-cased, spaces replaced by underscores). Empty values
//! mean the input was not supplied.

use thiserror::Error;

use crate::exec::CommandRequest;
use crate::ssh::{KeyboardResponder, SshAuth, SshConfig, DEFAULT_CONNECT_TIMEOUT};

const DEFAULT_HOST: &str = "localhost";
const DEFAULT_PORT: u16 = 22;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum InputError {
    #[error("Input required and not supplied: {0}")]
    Required(&'static str),

    #[error("Invalid port: {0:?} (expected an integer between 1 and 65535)")]
    InvalidPort(String),

    #[error("Input does not meet YAML 1.2 \"Core Schema\" specification: {name} (got {value:?})")]
    InvalidBool { name: &'static str, value: String },
}

/// Raw step inputs after validation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ActionInputs {
    pub command: String,
    pub host: String,
    pub username: String,
    pub port: u16,
    pub private_key: Option<String>,
    pub password: Option<String>,
    pub passphrase: Option<String>,
    pub try_keyboard: bool,
}

impl ActionInputs {
    /// Read inputs from the process environment.
    pub fn from_env() -> Result<Self, InputError> {
        Self::from_lookup(|name| std::env::var(env_name(name)).ok())
    }

    /// Read inputs through `lookup`, which receives the input name as
    /// declared (e.g. `privateKey`).
    pub fn from_lookup<F>(lookup: F) -> Result<Self, InputError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| {
            lookup(name)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let command = get("command").ok_or(InputError::Required("command"))?;
        let username = get("username").ok_or(InputError::Required("username"))?;
        let host = get("host").unwrap_or_else(|| DEFAULT_HOST.to_string());
        let port = match get("port") {
            Some(raw) => parse_port(&raw)?,
            None => DEFAULT_PORT,
        };
        let try_keyboard = match get("tryKeyboard") {
            Some(raw) => parse_bool("tryKeyboard", &raw)?,
            None => false,
        };

        // Key material is multi-line; only surrounding whitespace is dropped.
        Ok(Self {
            command,
            host,
            username,
            port,
            private_key: get("privateKey"),
            password: get("password"),
            passphrase: get("passphrase"),
            try_keyboard,
        })
    }

    /// Pick the single authentication method to use. A private key wins
    /// over a password.
    pub fn auth(&self) -> SshAuth {
        if let Some(key) = &self.private_key {
            return SshAuth::PrivateKey {
                key: key.clone(),
                passphrase: self.passphrase.clone(),
            };
        }
        match &self.password {
            Some(password) => SshAuth::Password {
                password: password.clone(),
                keyboard_interactive: self
                    .try_keyboard
                    .then(|| KeyboardResponder::new(password.clone())),
            },
            None => SshAuth::None,
        }
    }

    /// Split into connection settings and the command to run.
    pub fn into_parts(self) -> (SshConfig, CommandRequest) {
        let config = SshConfig {
            auth: self.auth(),
            host: self.host,
            port: self.port,
            username: self.username,
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
        };
        (config, CommandRequest::new(self.command))
    }
}

/// Environment variable carrying input `name`.
pub fn env_name(name: &str) -> String {
    format!("INPUT_{}", name.replace(' ', "_").to_uppercase())
}

fn parse_port(raw: &str) -> Result<u16, InputError> {
    match raw.parse::<u16>() {
        Ok(port) if port > 0 => Ok(port),
        _ => Err(InputError::InvalidPort(raw.to_string())),
    }
}

fn parse_bool(name: &'static str, raw: &str) -> Result<bool, InputError> {
    match raw {
        "true" | "True" | "TRUE" => Ok(true),
        "false" | "False" | "FALSE" => Ok(false),
        _ => Err(InputError::InvalidBool {
            name,
            value: raw.to_string(),
        }),
    }
}
