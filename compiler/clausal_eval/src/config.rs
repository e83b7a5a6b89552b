//! Dispatch configuration.

use std::env;

/// Environment variable read by [`DispatchConfig::from_env`].
pub const MAX_DEPTH_ENV: &str = "CLAUSAL_MAX_DEPTH";

/// Runtime policy for a pattern-matched function.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DispatchConfig {
    /// Deepest allowed nesting of `Frame::call`. The outermost `invoke` is
    /// depth 0. `None` leaves recursion bounded only by memory; the stack
    /// grows on demand.
    pub max_depth: Option<usize>,
}

impl DispatchConfig {
    pub fn with_max_depth(max_depth: usize) -> Self {
        DispatchConfig {
            max_depth: Some(max_depth),
        }
    }

    /// Read `CLAUSAL_MAX_DEPTH`. Unset, empty or unparsable values mean no
    /// limit.
    pub fn from_env() -> Self {
        DispatchConfig::from_value(env::var(MAX_DEPTH_ENV).ok().as_deref())
    }

    fn from_value(raw: Option<&str>) -> Self {
        let max_depth = raw.and_then(|s| s.trim().parse::<usize>().ok());
        if raw.is_some_and(|s| !s.trim().is_empty()) && max_depth.is_none() {
            tracing::warn!(value = ?raw, "ignoring invalid {MAX_DEPTH_ENV}");
        }
        DispatchConfig { max_depth }
    }

    /// Whether a call at `depth` is still within the limit.
    #[inline]
    pub fn allows_depth(&self, depth: usize) -> bool {
        match self.max_depth {
            Some(max) => depth <= max,
            None => true,
        }
    }
}
