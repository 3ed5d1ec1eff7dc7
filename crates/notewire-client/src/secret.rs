//! Secret reference resolver.
//!
//! Password values in `config.toml` may point at a secret kept elsewhere:
//!
//! - `pass::path/in/store` runs `pass show path/in/store` and uses the first line
//! - `env::VAR_NAME` reads `$VAR_NAME`
//! - anything else is the password itself

use std::process::Command;

/// Resolves a value that may contain a secret reference prefix.
pub fn resolve(value: &str) -> Result<String, String> {
    if let Some(entry) = value.strip_prefix("pass::") {
        from_pass(entry)
    } else if let Some(var) = value.strip_prefix("env::") {
        from_env(var)
    } else {
        Ok(value.to_string())
    }
}

fn from_pass(entry: &str) -> Result<String, String> {
    let output = Command::new("pass")
        .args(["show", entry])
        .output()
        .map_err(|e| format!("cannot run `pass show {entry}`: {e}"))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(format!(
            "`pass show {entry}` exited with {}: {}",
            output.status,
            stderr.trim()
        ));
    }

    String::from_utf8_lossy(&output.stdout)
        .lines()
        .next()
        .map(str::to_string)
        .ok_or_else(|| format!("`pass show {entry}` printed nothing"))
}

fn from_env(var: &str) -> Result<String, String> {
    std::env::var(var).map_err(|_| format!("environment variable `{var}` is not set"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn literal_password() {
        assert_eq!(resolve("secret").unwrap(), "secret");
        assert_eq!(resolve("").unwrap(), "");
        assert_eq!(resolve("env:single-colon").unwrap(), "env:single-colon");
    }

    #[test]
    fn env_reference() {
        unsafe {
            std::env::set_var("_NOTEWIRE_TEST_PASSWORD", "from-env");
        }
        assert_eq!(resolve("env::_NOTEWIRE_TEST_PASSWORD").unwrap(), "from-env");
        unsafe {
            std::env::remove_var("_NOTEWIRE_TEST_PASSWORD");
        }
    }

    #[test]
    fn env_reference_unset() {
        let err = resolve("env::_NOTEWIRE_UNSET_VARIABLE_981").unwrap_err();
        assert!(err.contains("not set"));
    }

    #[test]
    fn pass_reference_failure() {
        // Fails whether or not `pass` is installed
        assert!(resolve("pass::notewire/does/not/exist/981").is_err());
    }
}
