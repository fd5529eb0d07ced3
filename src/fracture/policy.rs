//! Which objects are allowed to break

use super::fragment::FractureSource;

/// Tags that are never fractured unless the policy is overridden
pub const DEFAULT_PROTECTED_TAGS: [&str; 2] = ["Unbreakable", "Land"];

/// Decides whether a [`FractureSource`] may be fractured
///
/// A source is refused when it is a fragment (`fracturable == false`) or when
/// its own tag or its parent's tag is protected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FracturePolicy {
    pub protected_tags: Vec<String>,
}

impl FracturePolicy {
    /// Policy protecting exactly `tags`
    pub fn with_protected_tags<I, S>(tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            protected_tags: tags.into_iter().map(Into::into).collect(),
        }
    }

    /// Policy that only refuses fragments
    pub fn permissive() -> Self {
        Self {
            protected_tags: Vec::new(),
        }
    }

    pub fn is_protected(&self, tag: &str) -> bool {
        self.protected_tags.iter().any(|t| t == tag)
    }

    pub fn can_fracture<M>(&self, source: &FractureSource<M>) -> bool {
        if !source.fracturable || self.is_protected(&source.tag) {
            return false;
        }
        !source.parent_tag.as_deref().is_some_and(|tag| self.is_protected(tag))
    }
}

impl Default for FracturePolicy {
    fn default() -> Self {
        Self::with_protected_tags(DEFAULT_PROTECTED_TAGS)
    }
}
