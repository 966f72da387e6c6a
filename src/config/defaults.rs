//! Default values for configuration fields.
//!
//! These functions are used by serde for default deserialization.

// ============================================================================
// Common Defaults
// ============================================================================

pub fn r#true() -> bool {
    true
}

pub fn r#false() -> bool {
    false
}

// ============================================================================
// [build] Section Defaults
// ============================================================================

pub mod build {
    use std::path::PathBuf;

    pub fn root() -> Option<PathBuf> {
        None
    }

    pub fn data() -> String {
        "site-data.json".into()
    }

    pub fn shell() -> PathBuf {
        "index.html".into()
    }

    pub fn output() -> PathBuf {
        "public".into()
    }

    pub fn assets() -> PathBuf {
        "assets".into()
    }

    pub fn fetch_timeout() -> u64 {
        30
    }
}

// ============================================================================
// [desktop] Section Defaults
// ============================================================================

pub mod desktop {
    pub fn windows() -> Vec<String> {
        ["readme", "about", "projects", "contact"]
            .into_iter()
            .map(String::from)
            .collect()
    }

    pub fn narrow_breakpoint() -> u32 {
        850
    }

    pub fn viewport_width() -> u32 {
        1280
    }

    pub fn z_floor() -> u32 {
        10
    }
}

// ============================================================================
// [serve] Section Defaults
// ============================================================================

pub mod serve {
    pub fn interface() -> String {
        "127.0.0.1".into()
    }

    pub fn port() -> u16 {
        5277
    }
}
