use std::path::PathBuf;

/// Viewer settings, read once from the environment at startup.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewerConfig {
    /// `BIND_ADDR`
    pub bind_addr: String,
    /// `GDS_DIR`: where updated variants are exported and `.gds` files are
    /// listed from.
    pub gds_dir: PathBuf,
    /// `PDK`: `generic` or a path to a JSON technology file.
    pub pdk: String,
    /// `VARIANT_CAPACITY`: customized components kept in memory.
    pub variant_capacity: usize,
}

pub const DEFAULT_VARIANT_CAPACITY: usize = 64;

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            bind_addr: "0.0.0.0:8000".to_string(),
            gds_dir: std::env::temp_dir().join("padkit").join("gds"),
            pdk: "generic".to_string(),
            variant_capacity: DEFAULT_VARIANT_CAPACITY,
        }
    }
}

impl ViewerConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup; unset keys keep their defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();
        if let Some(addr) = lookup("BIND_ADDR") {
            config.bind_addr = addr;
        }
        if let Some(dir) = lookup("GDS_DIR") {
            config.gds_dir = PathBuf::from(dir);
        }
        if let Some(pdk) = lookup("PDK") {
            config.pdk = pdk;
        }
        if let Some(capacity) = lookup("VARIANT_CAPACITY") {
            match capacity.parse::<usize>() {
                Ok(n) if n > 0 => config.variant_capacity = n,
                _ => log::warn!(
                    "Ignoring VARIANT_CAPACITY={capacity:?}, using {}",
                    config.variant_capacity
                ),
            }
        }
        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = ViewerConfig::from_lookup(lookup(&[]));
        assert_eq!(config, ViewerConfig::default());
        assert_eq!(config.bind_addr, "0.0.0.0:8000");
        assert_eq!(config.pdk, "generic");
        assert!(config.gds_dir.ends_with("padkit/gds"));
    }

    #[test]
    fn test_overrides() {
        let config = ViewerConfig::from_lookup(lookup(&[
            ("BIND_ADDR", "127.0.0.1:9000"),
            ("GDS_DIR", "/data/gds"),
            ("PDK", "tech/demo.json"),
            ("VARIANT_CAPACITY", "8"),
        ]));
        assert_eq!(config.bind_addr, "127.0.0.1:9000");
        assert_eq!(config.gds_dir, PathBuf::from("/data/gds"));
        assert_eq!(config.pdk, "tech/demo.json");
        assert_eq!(config.variant_capacity, 8);
    }

    #[test]
    fn test_bad_capacity_keeps_default() {
        for value in ["lots", "0", "-3"] {
            let config = ViewerConfig::from_lookup(lookup(&[("VARIANT_CAPACITY", value)]));
            assert_eq!(config.variant_capacity, DEFAULT_VARIANT_CAPACITY);
        }
    }
}
