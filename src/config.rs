use std::path::PathBuf;

/// Application-level constants
pub const APP_NAME: &str = "WellnessIntake";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// General-purpose instruct model small enough for laptop inference.
pub const DEFAULT_MODEL: &str = "llama3.2:3b";

/// Log filter used when `RUST_LOG` is not set.
pub fn default_log_filter() -> &'static str {
    "info,wellness_intake=debug"
}

/// Get the application data directory (~/WellnessIntake/).
///
/// Falls back to the working directory when no home directory is known.
pub fn app_data_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_NAME)
}

/// SQLite file holding persisted intake sessions.
pub fn sessions_db_path() -> PathBuf {
    app_data_dir().join("sessions.db")
}

/// Runtime settings for the intake engine.
#[derive(Debug, Clone, PartialEq)]
pub struct IntakeConfig {
    /// Base URL of the local Ollama instance.
    pub ollama_url: String,
    /// Model used for narrative extraction.
    pub model_name: String,
    /// Per-call timeout for the extraction service.
    pub timeout_secs: u64,
    /// How many trailing turns are embedded in each extraction request.
    pub recent_turns: usize,
}

impl Default for IntakeConfig {
    fn default() -> Self {
        Self {
            ollama_url: "http://localhost:11434".to_string(),
            model_name: DEFAULT_MODEL.to_string(),
            timeout_secs: 60,
            recent_turns: 6,
        }
    }
}

impl IntakeConfig {
    /// Defaults overridden by `INTAKE_OLLAMA_URL`, `INTAKE_MODEL`,
    /// `INTAKE_TIMEOUT_SECS` and `INTAKE_RECENT_TURNS`. Unparseable numbers
    /// keep the default.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();
        if let Some(url) = lookup("INTAKE_OLLAMA_URL").filter(|v| !v.trim().is_empty()) {
            config.ollama_url = url.trim().to_string();
        }
        if let Some(model) = lookup("INTAKE_MODEL").filter(|v| !v.trim().is_empty()) {
            config.model_name = model.trim().to_string();
        }
        if let Some(secs) = lookup("INTAKE_TIMEOUT_SECS").and_then(|v| v.trim().parse().ok()) {
            config.timeout_secs = secs;
        }
        if let Some(n) = lookup("INTAKE_RECENT_TURNS").and_then(|v| v.trim().parse().ok()) {
            config.recent_turns = n;
        }
        config
    }
}
