/// Generate the default TOML config content with comments.
pub fn default_config_toml() -> &'static str {
    r##"# p2pwatch configuration
# Only override what you want to change -- missing fields use defaults.

[server]
# base_url = "http://127.0.0.1:3000"
# state_path = "/api/state"
# stream_path = "/p2p/sse"

[stream]
# reconnect_delay_ms = 1000        # 100-60000
# max_reconnect_delay_ms = 30000   # 100-600000, not below reconnect_delay_ms

[display]
# tick_interval_ms = 1000          # 100-60000
# show_addresses = true

[logging]
# level = "info"                   # trace, debug, info, warn, error
"##
}
