//! Keyboard-interactive answers.
//!
//! Many hosts disable the plain `password` method but still ask for the same
//! password through a keyboard-interactive prompt. The responder answers
//! those prompts with the configured password.

use std::fmt;

#[derive(Clone)]
pub struct KeyboardResponder {
    password: String,
}

impl KeyboardResponder {
    pub fn new(password: impl Into<String>) -> Self {
        Self {
            password: password.into(),
        }
    }

    /// Build one answer per prompt. Prompts asking for a password get the
    /// password; anything else gets an empty answer.
    pub fn respond<'a, I>(&self, prompts: I) -> Vec<String>
    where
        I: IntoIterator<Item = &'a str>,
    {
        prompts
            .into_iter()
            .map(|prompt| {
                if prompt.to_lowercase().contains("password") {
                    self.password.clone()
                } else {
                    String::new()
                }
            })
            .collect()
    }
}

// Keep the secret out of debug logs.
impl fmt::Debug for KeyboardResponder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyboardResponder")
            .field("password", &"<redacted>")
            .finish()
    }
}
