//! Runtime policy configuration.
//!
//! Two behaviors of the format engine are policies rather than fixed rules:
//!
//! - What happens to a `%` followed by a code byte outside the supported set
//!   (or a `%` that ends the template). Set via `FRANKENPRINTF_MODE`:
//!   - `compat` (default): drop the directive silently, emit nothing.
//!   - `echo`: emit the directive bytes verbatim.
//!   - `strict`: fail the call with a reportable error.
//! - What `%s` emits for a null text argument. Set via
//!   `FRANKENPRINTF_NULL_STR`: `placeholder` (default, emits `(null)`) or
//!   `omit` (emits nothing).

use std::sync::atomic::{AtomicU8, Ordering};

/// Text emitted for a null `%s` argument under [`NullStrPolicy::Placeholder`].
pub const NULL_STR_PLACEHOLDER: &[u8] = b"(null)";

/// Handling of a directive whose code byte is not supported.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnknownDirectivePolicy {
    /// Consume `%` and the code byte, emit nothing, consume no argument.
    #[default]
    Drop,
    /// Emit `%` and the code byte as literal text.
    Echo,
    /// Abort the call with `UnsupportedDirective` / `DanglingTrigger`.
    Reject,
}

/// Handling of a null text argument to `%s`.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NullStrPolicy {
    /// Emit [`NULL_STR_PLACEHOLDER`].
    #[default]
    Placeholder,
    /// Emit nothing.
    Omit,
}

impl UnknownDirectivePolicy {
    /// Parse from string (case-insensitive). Unknown values map to `Drop`.
    #[must_use]
    pub fn from_str_loose(s: &str) -> Self {
        match s.trim().to_ascii_lowercase().as_str() {
            "echo" | "glibc" | "literal" => Self::Echo,
            "strict" | "reject" | "error" => Self::Reject,
            _ => Self::Drop,
        }
    }

    /// Canonical mode name, the inverse of [`Self::from_str_loose`].
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Drop => "compat",
            Self::Echo => "echo",
            Self::Reject => "strict",
        }
    }
}

impl NullStrPolicy {
    /// Parse from string (case-insensitive). Unknown values map to `Placeholder`.
    #[must_use]
    pub fn from_str_loose(s: &str) -> Self {
        match s.trim().to_ascii_lowercase().as_str() {
            "omit" | "empty" | "none" => Self::Omit,
            _ => Self::Placeholder,
        }
    }

    /// Bytes emitted for a null `%s` argument.
    #[must_use]
    pub const fn text(self) -> &'static [u8] {
        match self {
            Self::Placeholder => NULL_STR_PLACEHOLDER,
            Self::Omit => b"",
        }
    }
}

/// Policy set for one formatting call.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PrintfConfig {
    pub unknown_directive: UnknownDirectivePolicy,
    pub null_str: NullStrPolicy,
}

impl PrintfConfig {
    /// Config that rejects unsupported and dangling directives.
    #[must_use]
    pub const fn strict() -> Self {
        Self {
            unknown_directive: UnknownDirectivePolicy::Reject,
            null_str: NullStrPolicy::Placeholder,
        }
    }

    #[must_use]
    pub const fn with_unknown_directive(mut self, policy: UnknownDirectivePolicy) -> Self {
        self.unknown_directive = policy;
        self
    }

    #[must_use]
    pub const fn with_null_str(mut self, policy: NullStrPolicy) -> Self {
        self.null_str = policy;
        self
    }

    /// Build a config from `FRANKENPRINTF_MODE` / `FRANKENPRINTF_NULL_STR`.
    ///
    /// Missing variables leave the corresponding default in place.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config from an arbitrary key lookup (testable without
    /// touching the process environment).
    #[must_use]
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();
        if let Some(raw) = lookup(MODE_ENV) {
            config.unknown_directive = UnknownDirectivePolicy::from_str_loose(&raw);
        }
        if let Some(raw) = lookup(NULL_STR_ENV) {
            config.null_str = NullStrPolicy::from_str_loose(&raw);
        }
        config
    }

    /// The process-wide config (reads the environment on first call, caches
    /// thereafter).
    ///
    /// A call that arrives while another thread is still reading the
    /// environment gets [`PrintfConfig::default`] instead of waiting, so only
    /// calls made after the first one returns are guaranteed to see the
    /// environment's policies.
    #[must_use]
    pub fn global() -> Self {
        let cached = CACHED_CONFIG.load(Ordering::Acquire);
        if cached != CONFIG_UNRESOLVED && cached != CONFIG_RESOLVING {
            return decode(cached);
        }
        if cached == CONFIG_RESOLVING {
            return Self::default();
        }

        if CACHED_CONFIG
            .compare_exchange(
                CONFIG_UNRESOLVED,
                CONFIG_RESOLVING,
                Ordering::SeqCst,
                Ordering::Relaxed,
            )
            .is_err()
        {
            // Another thread is resolving. Use defaults until it finishes.
            let v = CACHED_CONFIG.load(Ordering::Acquire);
            return if v != CONFIG_UNRESOLVED && v != CONFIG_RESOLVING {
                decode(v)
            } else {
                Self::default()
            };
        }

        let config = Self::from_env();
        CACHED_CONFIG.store(encode(config), Ordering::Release);
        config
    }
}

/// Environment variable selecting the unsupported-directive policy.
pub const MODE_ENV: &str = "FRANKENPRINTF_MODE";
/// Environment variable selecting the null-string policy.
pub const NULL_STR_ENV: &str = "FRANKENPRINTF_NULL_STR";

// Atomic cache: 0=unresolved, 255=resolving, otherwise 1 + packed config.
static CACHED_CONFIG: AtomicU8 = AtomicU8::new(CONFIG_UNRESOLVED);

const CONFIG_UNRESOLVED: u8 = 0;
const CONFIG_RESOLVING: u8 = 255;

fn encode(config: PrintfConfig) -> u8 {
    let unknown = match config.unknown_directive {
        UnknownDirectivePolicy::Drop => 0,
        UnknownDirectivePolicy::Echo => 1,
        UnknownDirectivePolicy::Reject => 2,
    };
    let null_str = match config.null_str {
        NullStrPolicy::Placeholder => 0,
        NullStrPolicy::Omit => 1,
    };
    1 + (unknown | (null_str << 2))
}

fn decode(v: u8) -> PrintfConfig {
    let packed = v.saturating_sub(1);
    let unknown_directive = match packed & 0b11 {
        1 => UnknownDirectivePolicy::Echo,
        2 => UnknownDirectivePolicy::Reject,
        _ => UnknownDirectivePolicy::Drop,
    };
    let null_str = if packed & 0b100 != 0 {
        NullStrPolicy::Omit
    } else {
        NullStrPolicy::Placeholder
    };
    PrintfConfig {
        unknown_directive,
        null_str,
    }
}
