use std::collections::HashMap;

/// Severity table, lower is more important.
#[derive(Clone, Debug)]
pub struct LoggerLevels {
    levels: HashMap<String, u8>,
}

impl LoggerLevels {
    pub fn new<K: Into<String>>(levels: impl IntoIterator<Item = (K, u8)>) -> Self {
        LoggerLevels {
            levels: levels.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }

    pub fn get_severity(&self, key: &str) -> Option<u8> {
        self.levels.get(key).copied()
    }

    /// Whether an entry at `level` passes a transport whose minimum is
    /// `min_level`. Names missing from the table are let through.
    pub fn is_enabled(&self, min_level: &str, level: &str) -> bool {
        match (self.get_severity(min_level), self.get_severity(level)) {
            (Some(min), Some(severity)) => severity <= min,
            _ => true,
        }
    }
}

impl Default for LoggerLevels {
    fn default() -> Self {
        LoggerLevels::new([
            ("error", 0),
            ("warn", 1),
            ("info", 2),
            ("debug", 3),
            ("trace", 4),
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_levels_order() {
        let levels = LoggerLevels::default();
        assert!(levels.get_severity("error") < levels.get_severity("info"));
        assert_eq!(levels.get_severity("verbose"), None);
    }

    #[test]
    fn test_is_enabled() {
        let levels = LoggerLevels::default();

        assert!(levels.is_enabled("info", "error"));
        assert!(levels.is_enabled("info", "info"));
        assert!(!levels.is_enabled("info", "debug"));
        assert!(!levels.is_enabled("error", "warn"));
    }

    #[test]
    fn test_unknown_names_pass() {
        let levels = LoggerLevels::default();

        assert!(levels.is_enabled("info", "audit"));
        assert!(levels.is_enabled("custom", "trace"));
    }
}
