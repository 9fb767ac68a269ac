use serde::{Deserialize, Serialize};

use crate::constants;

/// Pagination window for case listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Page {
    pub offset: usize,
    pub limit: usize,
}

impl Default for Page {
    fn default() -> Self {
        Self {
            offset: 0,
            limit: constants::DEFAULT_PAGE_LIMIT,
        }
    }
}

impl Page {
    /// Clamp the limit to [1, MAX_PAGE_LIMIT].
    pub fn clamped(self) -> Self {
        Self {
            offset: self.offset,
            limit: self.limit.clamp(1, constants::MAX_PAGE_LIMIT),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clamps_limit_bounds() {
        assert_eq!(Page { offset: 0, limit: 0 }.clamped().limit, 1);
        assert_eq!(Page { offset: 0, limit: 9999 }.clamped().limit, 200);
        assert_eq!(Page { offset: 10, limit: 25 }.clamped().limit, 25);
    }
}
