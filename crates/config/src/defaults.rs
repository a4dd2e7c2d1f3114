// Defaults and constants for csvsync configuration

pub(crate) const OBS_HOST: &str = "127.0.0.1";
pub(crate) const OBS_PORT: u16 = 4455;
pub(crate) const REQUEST_TIMEOUT_MS: u64 = 5000;

// Connection retry
pub(crate) const RETRY_MAX_ATTEMPTS: u32 = 3;
pub(crate) const RETRY_DELAY_MS: u64 = 5000;

// Loop timing
pub(crate) const POLL_INTERVAL_MS: u64 = 1000;
pub(crate) const RECONNECT_INTERVAL_MS: u64 = 30_000;

pub(crate) const TEXT_INPUT_KIND: &str = "text_ft2_source_v2";

// Serde default functions
pub(crate) fn default_obs_host() -> String {
    OBS_HOST.to_string()
}
pub(crate) const fn default_obs_port() -> u16 {
    OBS_PORT
}
pub(crate) const fn default_request_timeout_ms() -> u64 {
    REQUEST_TIMEOUT_MS
}
pub(crate) const fn default_retry_max_attempts() -> u32 {
    RETRY_MAX_ATTEMPTS
}
pub(crate) const fn default_retry_delay_ms() -> u64 {
    RETRY_DELAY_MS
}
pub(crate) const fn default_poll_interval_ms() -> u64 {
    POLL_INTERVAL_MS
}
pub(crate) const fn default_reconnect_interval_ms() -> u64 {
    RECONNECT_INTERVAL_MS
}
pub(crate) const fn default_require_connection() -> bool {
    true
}
pub(crate) fn default_text_input_kind() -> String {
    TEXT_INPUT_KIND.to_string()
}
