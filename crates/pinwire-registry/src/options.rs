//! Registry configuration.

/// What `add_converter` / `add_dynamic_converter` do when the key is taken.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DuplicatePolicy {
    /// Fail with a `RegistrationError`.
    #[default]
    Reject,
    /// Overwrite the existing entry.
    Replace,
}

/// Options for a [`ConverterRegistry`](crate::ConverterRegistry).
///
/// # Example
///
/// ```
/// use pinwire_registry::{DuplicatePolicy, RegistryOptions};
///
/// let options = RegistryOptions::default()
///     .with_duplicate_policy(DuplicatePolicy::Replace)
///     .with_base_type_depth(2);
/// assert!(options.find_intermediate);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegistryOptions {
    /// Handling of duplicate registrations.
    pub duplicate_policy: DuplicatePolicy,
    /// Whether two-hop chaining through registered edges is attempted.
    pub find_intermediate: bool,
    /// How many levels of base-type fallback are allowed.
    pub base_type_depth: u32,
}

impl Default for RegistryOptions {
    fn default() -> Self {
        Self {
            duplicate_policy: DuplicatePolicy::Reject,
            find_intermediate: true,
            base_type_depth: 1,
        }
    }
}

impl RegistryOptions {
    pub fn with_duplicate_policy(mut self, policy: DuplicatePolicy) -> Self {
        self.duplicate_policy = policy;
        self
    }

    pub fn with_find_intermediate(mut self, enabled: bool) -> Self {
        self.find_intermediate = enabled;
        self
    }

    pub fn with_base_type_depth(mut self, depth: u32) -> Self {
        self.base_type_depth = depth;
        self
    }
}
