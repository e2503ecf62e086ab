use crossterm::tty::IsTty;

/// Capability snapshot taken once at startup. Display only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceInfo {
    pub is_mobile: bool,
    pub platform: String,
    pub screen_width: u16,
    pub screen_height: u16,
    pub touch_support: bool,
    /// terminal identity, the closest thing a terminal has to a user agent
    pub user_agent: String,
}

const MOBILE_MARKERS: [&str; 5] = ["Mobile", "Android", "iPhone", "iPad", "iPod"];

impl DeviceInfo {
    pub fn probe(screen_width: u16, screen_height: u16) -> Self {
        let env = |key: &str| std::env::var(key).ok();
        Self::from_env(
            env,
            screen_width,
            screen_height,
            std::io::stdout().is_tty(),
        )
    }

    /// Builds the snapshot from an environment lookup so it can be tested
    /// without touching the process environment.
    pub fn from_env<F>(env: F, screen_width: u16, screen_height: u16, is_tty: bool) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let user_agent = match (env("TERM_PROGRAM"), env("TERM")) {
            (Some(program), Some(term)) => format!("{} ({})", program, term),
            (Some(program), None) => program,
            (None, Some(term)) => term,
            (None, None) => "unknown".to_string(),
        };

        let is_mobile = env("TERMUX_VERSION").is_some()
            || env("ANDROID_ROOT").is_some()
            || cfg!(any(target_os = "android", target_os = "ios"))
            || MOBILE_MARKERS
                .iter()
                .any(|m| user_agent.to_lowercase().contains(&m.to_lowercase()));

        // A dumb terminal cannot report mouse or touch presses
        let touch_support = is_tty && env("TERM").map(|t| t != "dumb").unwrap_or(true);

        Self {
            is_mobile,
            platform: format!("{}-{}", std::env::consts::OS, std::env::consts::ARCH),
            screen_width,
            screen_height,
            touch_support,
            user_agent,
        }
    }

    pub fn device_label(&self) -> &'static str {
        if self.is_mobile {
            "Mobile"
        } else {
            "Desktop"
        }
    }

    pub fn touch_label(&self) -> &'static str {
        if self.touch_support {
            "Enabled"
        } else {
            "Disabled"
        }
    }
}
