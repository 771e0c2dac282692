/// Days scanned ahead of now when the config does not say otherwise
pub const DEFAULT_SYNC_DAYS: u32 = 30;

/// Longest scan window accepted from config or `--days`
pub const MAX_SYNC_DAYS: u32 = 3650;

/// Title prefix of mirror (copy) events
pub const DEFAULT_MIRROR_PREFIX: &str = "【△】";

/// Opening of the provenance tag at the start of a mirror's description
pub const DEFAULT_TAG_PREFIX: &str = "【copied event from ";

/// Closing of the provenance tag
pub const DEFAULT_TAG_SUFFIX: &str = "】";

/// Provider used for pairs that do not name one
pub const DEFAULT_PROVIDER: &str = "google";
