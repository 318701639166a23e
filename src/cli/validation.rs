//! Value parsers for CLI arguments.

use std::net::IpAddr;
use std::path::PathBuf;

pub const MAX_ROLLBACK_STEPS: u32 = 100;

pub fn validate_port(value: &str) -> Result<u16, String> {
    match value.parse::<u16>() {
        Ok(0) => Err("Port must be between 1 and 65535. Port 0 is not allowed.".to_string()),
        Ok(port) => Ok(port),
        Err(_) => Err(format!(
            "Port must be a number between 1 and 65535, got: '{}'",
            value
        )),
    }
}

/// The path must name an existing, readable file.
pub fn validate_config_file_path(value: &str) -> Result<PathBuf, String> {
    let path = PathBuf::from(value);

    if !path.is_file() {
        return Err(format!("Configuration file does not exist: '{}'", value));
    }
    std::fs::File::open(&path)
        .map(|_| path)
        .map_err(|e| format!("Cannot read configuration file '{}': {}", value, e))
}

pub fn validate_rollback_steps(value: &str) -> Result<u32, String> {
    let steps: u32 = value
        .parse()
        .map_err(|_| format!("Rollback steps must be a positive number, got: '{}'", value))?;

    if !(1..=MAX_ROLLBACK_STEPS).contains(&steps) {
        return Err(format!(
            "Rollback steps must be between 1 and {}",
            MAX_ROLLBACK_STEPS
        ));
    }
    Ok(steps)
}

/// Accepts IP addresses and RFC 1123 host names.
pub fn validate_host_address(value: &str) -> Result<String, String> {
    let host = value.trim();

    if host.is_empty() {
        return Err("Host address cannot be empty".to_string());
    }
    if host.parse::<IpAddr>().is_ok() {
        return Ok(host.to_string());
    }
    // Dotted digits that failed to parse as an address, e.g. 999.1.1.1
    if host.chars().all(|c| c.is_ascii_digit() || c == '.') {
        return Err(format!("Invalid IPv4 address: '{}'", value));
    }
    if host.len() > 253 {
        return Err("Host name is too long (maximum 253 characters)".to_string());
    }

    let valid_label = |label: &str| {
        !label.is_empty()
            && label.len() <= 63
            && !label.starts_with('-')
            && !label.ends_with('-')
            && label.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
    };
    if host.split('.').all(valid_label) {
        Ok(host.to_string())
    } else {
        Err(format!("Invalid host name: '{}'", value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_host_validation() {
        for host in ["localhost", "127.0.0.1", "0.0.0.0", "::1", "api.example.com", "my-server.local"] {
            assert!(validate_host_address(host).is_ok(), "{} should be valid", host);
        }
        for host in ["", "   ", "host with spaces", "999.999.999.999", "-bad.example", &"x".repeat(300)] {
            assert!(validate_host_address(host).is_err(), "{} should be invalid", host);
        }
    }

    #[test]
    fn test_config_file_validation() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("catalog.toml");
        std::fs::write(&file, "[server]\nport = 8080\n").unwrap();

        assert_eq!(
            validate_config_file_path(file.to_str().unwrap()).unwrap(),
            file
        );
        assert!(validate_config_file_path(dir.path().to_str().unwrap()).is_err());
        assert!(validate_config_file_path("/definitely/not/here.toml").is_err());
    }

    #[test]
    fn test_rollback_rejects_garbage() {
        assert!(validate_rollback_steps("two").is_err());
        assert!(validate_rollback_steps("-1").is_err());
    }

    proptest! {
        #[test]
        fn prop_port_accepts_nonzero(port in 1u16..=u16::MAX) {
            prop_assert_eq!(validate_port(&port.to_string()), Ok(port));
        }

        #[test]
        fn prop_rollback_range(steps in 0u32..500) {
            let result = validate_rollback_steps(&steps.to_string());
            prop_assert_eq!(result.is_ok(), (1..=MAX_ROLLBACK_STEPS).contains(&steps));
        }
    }

    #[test]
    fn test_port_zero_and_overflow() {
        assert!(validate_port("0").is_err());
        assert!(validate_port("65536").is_err());
        assert!(validate_port("http").is_err());
    }
}
