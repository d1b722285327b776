/// The publicly visible name of the tool
pub const PKG_NAME: &str = "plansql";

/// The documents rendered when no patterns are given
pub const DEFAULT_PLAN_PATTERN: &str = "**/*.plan.toml";

/// The log filter used when none is given
pub const DEFAULT_LOG_FILTER: &str = "info";
