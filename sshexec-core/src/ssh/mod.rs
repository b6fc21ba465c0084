pub mod error;
pub mod keyboard;
pub mod session;

use std::time::Duration;

pub use error::SshError;
pub use keyboard::KeyboardResponder;
pub use session::SshSession;

/// Default time allowed for the TCP connect, handshake and authentication.
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(20);

/// SSH connection configuration.
#[derive(Clone, Debug)]
pub struct SshConfig {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub auth: SshAuth,
    pub connect_timeout: Duration,
}

/// SSH authentication method. Exactly one is attempted per connection.
#[derive(Clone, Debug)]
pub enum SshAuth {
    /// OpenSSH/PEM private key material, not a path.
    PrivateKey {
        key: String,
        passphrase: Option<String>,
    },
    /// Password authentication. When a responder is present the server may
    /// also be answered through keyboard-interactive if plain password auth
    /// is refused.
    Password {
        password: String,
        keyboard_interactive: Option<KeyboardResponder>,
    },
    /// The `none` method, for hosts that accept anonymous logins.
    None,
}

impl SshAuth {
    /// Short label used in progress and error messages.
    pub fn method_name(&self) -> &'static str {
        match self {
            SshAuth::PrivateKey { .. } => "publickey",
            SshAuth::Password { .. } => "password",
            SshAuth::None => "none",
        }
    }
}

impl Default for SshConfig {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 22,
            username: String::new(),
            auth: SshAuth::None,
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
        }
    }
}
