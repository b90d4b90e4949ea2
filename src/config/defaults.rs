//! Default value functions for configuration.

/// Returns `true` (for serde defaults).
pub fn default_true() -> bool {
    true
}

pub fn default_mask_ttl_secs() -> u64 {
    3600
}

pub fn default_operation_timeout_secs() -> u64 {
    120
}

pub fn default_info_message_ttl_secs() -> u64 {
    2
}

pub fn default_reveal_panel_ttl_secs() -> u64 {
    15
}

pub fn default_queue_capacity() -> usize {
    1024
}

pub fn default_metrics_port() -> u16 {
    9090
}

/// A curated universe of single-emoji masks. Kept short and collision-free
/// at a glance; operators can supply a larger universe via config for groups
/// expecting many concurrent members.
pub fn default_mask_universe() -> Vec<String> {
    [
        "🐶", "🐱", "🐭", "🐹", "🐰", "🦊", "🐻", "🐼", "🐨", "🐯", "🦁", "🐮", "🐷", "🐸", "🐵",
        "🐔", "🐧", "🐦", "🐤", "🦆", "🦉", "🦇", "🐺", "🐗", "🐴", "🦄", "🐝", "🐛", "🦋", "🐌",
        "🐞", "🐢", "🐍", "🦎", "🦂", "🦀", "🐙", "🐠", "🐬", "🐳", "🐊", "🐆", "🐅", "🐫", "🦒",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}
