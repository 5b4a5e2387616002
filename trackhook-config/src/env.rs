// Environment variable loading

use std::collections::HashMap;
use std::env;

/// Collects prefixed environment variables as lowercase config keys.
///
/// With prefix `TRACKHOOK`, `TRACKHOOK_API_KEY=abc` becomes `api_key = "abc"`.
pub struct EnvLoader {
    prefix: Option<String>,
}

impl EnvLoader {
    /// Create a new environment loader
    pub fn new(prefix: Option<String>) -> Self {
        Self { prefix }
    }

    /// Load matching variables from the process environment
    pub fn load(&self) -> HashMap<String, String> {
        self.collect(env::vars())
    }

    /// Filter and rename an arbitrary set of variables
    pub fn collect<I>(&self, vars: I) -> HashMap<String, String>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let mut config = HashMap::new();

        for (key, value) in vars {
            let name = match &self.prefix {
                Some(prefix) => match key
                    .strip_prefix(prefix.as_str())
                    .and_then(|rest| rest.strip_prefix('_'))
                {
                    Some(rest) if !rest.is_empty() => rest,
                    _ => continue,
                },
                None => key.as_str(),
            };
            config.insert(name.to_lowercase(), value);
        }

        config
    }

    /// Name of the variable that maps to a config key
    pub fn var_name(&self, key: &str) -> String {
        match &self.prefix {
            Some(prefix) => format!("{}_{}", prefix, key.to_uppercase()),
            None => key.to_uppercase(),
        }
    }
}

impl Default for EnvLoader {
    fn default() -> Self {
        Self::new(None)
    }
}
