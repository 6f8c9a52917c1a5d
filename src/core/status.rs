use std::sync::atomic::{AtomicBool, Ordering};

/// Where the running configuration came from, for the readiness log line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigSource {
    Yaml,
    Defaults,
}

impl ConfigSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConfigSource::Yaml => "yaml",
            ConfigSource::Defaults => "defaults",
        }
    }
}

/// Readiness flag indicating whether the service has finished bootstrapping.
/// One per service container.
#[derive(Debug, Default)]
pub struct Readiness {
    loaded: AtomicBool,
}

impl Readiness {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark the service as ready after configuration loading and the startup
    /// self-test have both succeeded.
    pub fn mark_ready(&self, source: ConfigSource) {
        self.loaded.store(true, Ordering::SeqCst);
        log::info!(
            "Configuration loaded from {}, service is ready",
            source.as_str()
        );
    }

    pub fn is_ready(&self) -> bool {
        self.loaded.load(Ordering::SeqCst)
    }
}
