use followme_core::TransformHierarchy;

use crate::avatar::AvatarSetting;

/// An avatar root with its body and part objects resolved.
///
/// Body and part names are looked up as `/`-separated paths below the root
/// first, then by depth-first name search. Call [`AvatarBinding::reset`]
/// whenever the hierarchy or the setting changes.
#[derive(Debug, Clone, PartialEq)]
pub struct AvatarBinding<H> {
    pub root: H,
    pub setting: AvatarSetting,
    body: Option<H>,
    parts: Vec<H>,
}

impl<H: Copy> AvatarBinding<H> {
    /// Creates an unresolved binding.
    #[must_use]
    pub fn new(root: H, setting: AvatarSetting) -> Self {
        Self {
            root,
            setting,
            body: None,
            parts: Vec::new(),
        }
    }

    /// Creates a binding and resolves it against `hierarchy`.
    pub fn bind<T>(hierarchy: &T, root: H, setting: AvatarSetting) -> Self
    where
        T: TransformHierarchy<Handle = H>,
    {
        let mut binding = Self::new(root, setting);
        binding.reset(hierarchy);
        binding
    }

    /// Re-resolves the body and part objects.
    pub fn reset<T>(&mut self, hierarchy: &T)
    where
        T: TransformHierarchy<Handle = H>,
    {
        self.body = None;
        self.parts.clear();

        if !self.setting.body_name.is_empty() {
            self.body = resolve(hierarchy, self.root, &self.setting.body_name);
            if self.body.is_none() {
                log::debug!("Avatar body '{}' not found", self.setting.body_name);
            }
        }

        for name in &self.setting.part_names {
            match resolve(hierarchy, self.root, name) {
                Some(part) => self.parts.push(part),
                None => log::debug!("Avatar part '{name}' not found"),
            }
        }
    }

    #[inline]
    #[must_use]
    pub fn body(&self) -> Option<H> {
        self.body
    }

    #[inline]
    #[must_use]
    pub fn parts(&self) -> &[H] {
        &self.parts
    }
}

fn resolve<T: TransformHierarchy>(hierarchy: &T, root: T::Handle, name: &str) -> Option<T::Handle> {
    hierarchy.find_path(root, name).or_else(|| {
        let leaf = name.rsplit('/').find(|s| !s.is_empty())?;
        hierarchy.find_by_name(root, leaf)
    })
}
