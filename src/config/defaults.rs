//! Default value functions for `#[serde(default = "...")]` fields, grouped by
//! the config section they belong to.

// ====== Network ======

pub const fn default_port() -> u16 {
    8080
}

// ====== Room template ======

pub const fn default_map_size() -> f64 {
    5000.0
}

pub const fn default_max_players() -> u32 {
    50
}

pub const fn default_food_coverage_percent() -> f64 {
    20.0
}

pub const fn default_food_spawn_rate_per_second() -> f64 {
    200.0
}

pub const fn default_empty_room_ttl_seconds() -> u64 {
    300
}

pub const fn default_suction_radius_multiplier() -> f64 {
    1.0
}

pub const fn default_suction_strength_multiplier() -> f64 {
    1.0
}

pub const fn default_food_value_multiplier() -> f64 {
    1.0
}

pub const fn default_food_near_player_target() -> u32 {
    80
}

pub const fn default_body_radius_multiplier() -> f64 {
    1.0
}

pub const fn default_body_length_multiplier() -> f64 {
    1.0
}

// ====== Server timing ======

pub const fn default_tick_hz() -> f64 {
    20.0
}

pub const fn default_broadcast_hz() -> f64 {
    20.0
}

pub const fn default_heartbeat_interval_secs() -> u64 {
    2
}

pub const fn default_idle_sweep_interval_secs() -> u64 {
    5
}

pub const fn default_pong_timeout_secs() -> u64 {
    30
}

pub const fn default_inactive_timeout_secs() -> u64 {
    600
}

pub const fn default_token_bucket_capacity() -> f64 {
    45.0
}

pub const fn default_token_bucket_refill_per_sec() -> f64 {
    30.0
}

// ====== WebSocket ======

pub const fn default_max_message_size() -> usize {
    4096
}

pub const fn default_outbound_channel_capacity() -> usize {
    16
}

// ====== Logging ======

pub fn default_log_dir() -> String {
    "logs".to_string()
}

pub fn default_log_filename() -> String {
    "worm-arena-server.log".to_string()
}

pub fn default_rotation() -> String {
    "daily".to_string()
}

pub const fn default_enable_file_logging() -> bool {
    false
}
