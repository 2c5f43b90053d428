//! Target platforms for jacket bundles.

use std::fmt;

/// Mobile OS family a bundle is built for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PlatformTarget {
    Android,
    Ios,
}

impl PlatformTarget {
    /// Every platform, in the order bundles are written.
    pub const ALL: [PlatformTarget; 2] = [PlatformTarget::Android, PlatformTarget::Ios];

    /// Lower-case name used in output file names.
    pub fn slug(&self) -> &'static str {
        match self {
            PlatformTarget::Android => "android",
            PlatformTarget::Ios => "ios",
        }
    }

    /// Unity `BuildTarget` value embedded in the serialized file.
    pub fn unity_build_target(&self) -> i32 {
        match self {
            PlatformTarget::Android => 13,
            PlatformTarget::Ios => 9,
        }
    }
}

impl fmt::Display for PlatformTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlatformTarget::Android => f.write_str("Android"),
            PlatformTarget::Ios => f.write_str("iOS"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_order() {
        assert_eq!(
            PlatformTarget::ALL,
            [PlatformTarget::Android, PlatformTarget::Ios]
        );
    }

    #[test]
    fn test_slugs() {
        assert_eq!(PlatformTarget::Android.slug(), "android");
        assert_eq!(PlatformTarget::Ios.slug(), "ios");
    }

    #[test]
    fn test_build_targets() {
        assert_eq!(PlatformTarget::Android.unity_build_target(), 13);
        assert_eq!(PlatformTarget::Ios.unity_build_target(), 9);
    }

    #[test]
    fn test_display() {
        assert_eq!(PlatformTarget::Ios.to_string(), "iOS");
    }
}
