use std::env;

const DEFAULT_PORT: u16 = 8000;
const DEFAULT_SMTP_HOST: &str = "smtp.gmail.com";
const DEFAULT_SMTP_PORT: u16 = 465;

#[derive(Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub data_file: String,
    pub admin_token: Option<String>,
    pub email: Option<EmailConfig>,
}

/// SMTP credentials and the inbox that receives query notifications.
#[derive(Clone)]
pub struct EmailConfig {
    pub sender: String,
    pub password: String,
    pub receiver: String,
    pub smtp_host: String,
    pub smtp_port: u16,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            host: env::var("CONTACT_FORM_HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port: port_var("CONTACT_FORM_PORT", DEFAULT_PORT),
            data_file: env::var("CONTACT_FORM_DATA_FILE")
                .unwrap_or_else(|_| "./submissions.json".to_string()),
            admin_token: non_empty_var("ADMIN_TOKEN"),
            email: EmailConfig::from_env(),
        }
    }
}

impl EmailConfig {
    /// Returns `None` unless sender, password and receiver are all set.
    pub fn from_env() -> Option<Self> {
        let sender = non_empty_var("EMAIL_USER")?;
        let password = non_empty_var("EMAIL_PASS")?;
        let receiver = non_empty_var("RECEIVER_EMAIL")?;

        Some(Self {
            sender,
            password,
            receiver,
            smtp_host: non_empty_var("SMTP_HOST").unwrap_or_else(|| DEFAULT_SMTP_HOST.to_string()),
            smtp_port: port_var("SMTP_PORT", DEFAULT_SMTP_PORT),
        })
    }
}

fn non_empty_var(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Unset means `default`; anything set must be a valid port.
fn port_var(key: &str, default: u16) -> u16 {
    match non_empty_var(key) {
        Some(raw) => parse_port(key, &raw),
        None => default,
    }
}

fn parse_port(key: &str, raw: &str) -> u16 {
    raw.parse()
        .unwrap_or_else(|_| panic!("{} must be a valid number, got {:?}", key, raw))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_port() {
        assert_eq!(parse_port("CONTACT_FORM_PORT", "8080"), 8080);
        assert_eq!(parse_port("SMTP_PORT", "587"), 587);
    }

    #[test]
    #[should_panic(expected = "CONTACT_FORM_PORT must be a valid number")]
    fn test_invalid_listen_port_panics() {
        parse_port("CONTACT_FORM_PORT", "eighty");
    }

    #[test]
    #[should_panic(expected = "SMTP_PORT must be a valid number")]
    fn test_invalid_smtp_port_panics() {
        parse_port("SMTP_PORT", "70000");
    }

    #[test]
    fn test_unset_port_uses_default() {
        assert_eq!(port_var("CONTACT_FORM_TEST_UNSET_PORT", 4242), 4242);
    }
}
