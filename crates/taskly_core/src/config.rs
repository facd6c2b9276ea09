//! Product configuration shared by core and UI layers.
//!
//! # Responsibility
//! - Define free-tier quotas and the premium product identifier.
//! - Define the fixed project background palette.
//! - Define durable settings keys.

/// Free-tier project quota. Premium removes the limit.
pub const FREE_PROJECTS_COUNT: usize = 1;

/// Free-tier task quota. Premium removes the limit.
pub const FREE_TASKS_COUNT: usize = 10;

/// How many palette entries are available without premium.
pub const FREE_PROJECT_BACKGROUNDS_COUNT: usize = 3;

/// Store product identifier for the premium unlock.
pub const PREMIUM_PRODUCT_ID: &str = "Taskly.Premium";

/// Fixed palette of project background asset names. UI indexes into this
/// list; persistence stores the name verbatim.
pub const PROJECT_BACKGROUNDS: [&str; 12] = [
    "gray-diamond",
    "black-grill",
    "dark-shades",
    "blur-ocean",
    "dark-gradient",
    "red-waves",
    "blue-waves",
    "multicolor-waves",
    "blue-moon",
    "sunset-sky",
    "evening-mountains",
    "night-laptop",
];

/// Durable flag: premium entitlement state.
pub const SETTING_PREMIUM_USER: &str = "is_premium_user";

/// Durable flag: one-shot "triple tap deletes a task" hint already shown.
pub const SETTING_DELETE_HINT_SHOWN: &str = "did_show_delete_hint";

/// Default background for new project drafts.
pub fn default_background() -> &'static str {
    PROJECT_BACKGROUNDS[0]
}
