//! Data mode shared by every store.

use std::fmt::{Display, Formatter};

/// Where reads and writes are served from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DataMode {
    /// Local storage and bundled defaults only; no network writes.
    #[default]
    Mock,
    /// Remote admin API, with local storage kept as a durability cache.
    Live,
}

impl DataMode {
    pub fn is_live(self) -> bool {
        self == Self::Live
    }

    /// Reads the persisted flag (`"true"` means mock mode).
    ///
    /// Anything other than `"true"`/`"false"` falls back to mock.
    pub fn from_persisted(flag: Option<&str>) -> Self {
        match flag.map(str::trim) {
            Some("false") => Self::Live,
            _ => Self::Mock,
        }
    }

    /// Persisted form of the flag.
    pub fn as_persisted(self) -> &'static str {
        match self {
            Self::Mock => "true",
            Self::Live => "false",
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Self::Mock => Self::Live,
            Self::Live => Self::Mock,
        }
    }
}

impl Display for DataMode {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Mock => f.write_str("mock"),
            Self::Live => f.write_str("live"),
        }
    }
}
