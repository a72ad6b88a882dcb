//! Which feature modules are active on the site.

use shroud_common::ModulesConfig;
use shroud_db::entities::ContentType;

/// Active feature modules, handed to every adapter at construction.
///
/// Members are always active.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModuleAvailability {
    pub activity: bool,
    pub groups: bool,
    pub forums: bool,
}

impl ModuleAvailability {
    /// Every module active.
    #[must_use]
    pub const fn all() -> Self {
        Self {
            activity: true,
            groups: true,
            forums: true,
        }
    }

    /// Only members active.
    #[must_use]
    pub const fn members_only() -> Self {
        Self {
            activity: false,
            groups: false,
            forums: false,
        }
    }

    /// Whether items of `content_type` exist on this site.
    #[must_use]
    pub const fn is_active(self, content_type: ContentType) -> bool {
        match content_type {
            ContentType::Activity => self.activity,
            ContentType::Group => self.groups,
            ContentType::Forum | ContentType::Topic | ContentType::Reply => self.forums,
            ContentType::Member => true,
        }
    }
}

impl Default for ModuleAvailability {
    fn default() -> Self {
        Self::all()
    }
}

impl From<ModulesConfig> for ModuleAvailability {
    fn from(config: ModulesConfig) -> Self {
        Self {
            activity: config.activity,
            groups: config.groups,
            forums: config.forums,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_forum_types_follow_forums_module() {
        let modules = ModuleAvailability {
            forums: false,
            ..ModuleAvailability::all()
        };

        assert!(!modules.is_active(ContentType::Forum));
        assert!(!modules.is_active(ContentType::Topic));
        assert!(!modules.is_active(ContentType::Reply));
        assert!(modules.is_active(ContentType::Group));
    }

    #[test]
    fn test_members_always_active() {
        assert!(ModuleAvailability::members_only().is_active(ContentType::Member));
        assert!(!ModuleAvailability::members_only().is_active(ContentType::Activity));
    }

    #[test]
    fn test_from_config() {
        let config = ModulesConfig {
            activity: true,
            groups: false,
            forums: true,
        };
        let modules = ModuleAvailability::from(config);
        assert!(modules.activity);
        assert!(!modules.groups);
        assert!(modules.forums);
    }
}
