//! Operator and control-flow names recognized as keywords

use std::collections::HashSet;
use std::sync::Arc;

/// Built-in HALCON operators and control statements
pub const HALCON_OPERATORS: &[&str] = &[
    "read_image",
    "write_image",
    "dev_open_window",
    "dev_close_window",
    "dev_display",
    "disp_image",
    "clear_window",
    "gen_image_const",
    "threshold",
    "connection",
    "select_shape",
    "union1",
    "difference",
    "intersection",
    "fill_up",
    "dilation1",
    "erosion1",
    "gen_circle",
    "gen_rectangle1",
    "gen_region_points",
    "area_center",
    "orientation_region",
    "count_obj",
    "if",
    "endif",
    "for",
    "endfor",
    "while",
    "endwhile",
    "stop",
    "return",
];

/// Immutable set of keyword names
///
/// Cloning is cheap; clones share the same set.
#[derive(Debug, Clone)]
pub struct KeywordSet {
    names: Arc<HashSet<String>>,
}

impl KeywordSet {
    /// The built-in HALCON operator list
    pub fn halcon() -> Self {
        HALCON_OPERATORS.iter().copied().collect()
    }

    /// A new set holding these names plus `extra`
    pub fn with_extra<I, S>(&self, extra: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut names = (*self.names).clone();
        names.extend(
            extra
                .into_iter()
                .map(Into::into)
                .map(|name: String| name.trim().to_string())
                .filter(|name| !name.is_empty()),
        );
        Self {
            names: Arc::new(names),
        }
    }

    /// Exact, case-sensitive membership check
    pub fn contains(&self, word: &str) -> bool {
        self.names.contains(word)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// All names, sorted
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<_> = self.names.iter().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

impl Default for KeywordSet {
    fn default() -> Self {
        Self::halcon()
    }
}

impl<S: Into<String>> FromIterator<S> for KeywordSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            names: Arc::new(iter.into_iter().map(Into::into).collect()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_halcon_set() {
        let set = KeywordSet::halcon();
        assert_eq!(set.len(), HALCON_OPERATORS.len());
        assert!(set.contains("read_image"));
        assert!(set.contains("endwhile"));
        assert!(!set.contains("READ_IMAGE"));
        assert!(!set.contains("read_image("));
        assert!(!set.contains("foo_bar"));
    }

    #[test]
    fn test_with_extra_leaves_original_untouched() {
        let base = KeywordSet::halcon();
        let extended = base.with_extra(["smooth_image", "  edges_sub_pix ", ""]);
        assert!(extended.contains("smooth_image"));
        assert!(extended.contains("edges_sub_pix"));
        assert!(extended.contains("threshold"));
        assert_eq!(extended.len(), base.len() + 2);
        assert!(!base.contains("smooth_image"));
    }

    #[test]
    fn test_custom_set() {
        let set: KeywordSet = ["b", "a"].into_iter().collect();
        assert_eq!(set.names(), vec!["a", "b"]);
        assert!(!set.is_empty());
        assert!(!set.contains("threshold"));
    }
}
