//! Constants for math-callout
//!
//! File names, reserved locations, inline markup tokens and user-facing
//! messages shared across the crate.

// === Locations and Files ===

/// Reserved location holding the fully populated root configuration
pub const ROOT_LOCATION: &str = "/";

/// Directory inside a vault where plugin state is persisted
pub const STATE_DIR: &str = ".math-callout";

/// File holding `{ settings, excludedFiles }`
pub const DATA_FILENAME: &str = "data.json";

/// File holding `{ profiles }`
pub const EXTRA_FILENAME: &str = "extra.json";

/// Extension of indexable documents (without dot)
pub const MARKDOWN_EXTENSION: &str = "md";

/// Environment variable naming the vault directory
pub const ENV_VAULT: &str = "MATH_CALLOUT_VAULT";

/// Environment variable holding the tracing filter
pub const ENV_LOG: &str = "MATH_CALLOUT_LOG";

// === Inline Markup ===

/// Callout type used by math callouts: `> [!math|{...}]`
pub const CALLOUT_TYPE: &str = "math";

/// `number` value requesting automatic numbering
pub const NUMBER_AUTO: &str = "auto";

/// First number of a sequence when no init is configured
pub const DEFAULT_NUMBER_INIT: usize = 1;

/// Separator between the environment prefix and the user label
pub const LABEL_SEPARATOR: &str = ":";

// === Profiles ===

/// Id of the built-in English profile
pub const PROFILE_ENGLISH: &str = "English";

/// Id of the built-in Japanese profile
pub const PROFILE_JAPANESE: &str = "Japanese";

/// Prefix given to copied profiles
pub const COPY_PREFIX: &str = "Copy of ";

// === Error Messages ===

/// Shown when a tag contains anything but lowercase letters and hyphens
pub const ERROR_TAG_SYNTAX: &str = "tags may only contain lowercase letters and hyphens";

/// Shown when trying to unset an option at the root location
pub const ERROR_ROOT_UNSET: &str = "root options cannot be unset";
