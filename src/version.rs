//! Packed version numbers as reported by layers and devices
//!
//! Layout: `[major:10 | minor:10 | patch:12]`, most significant bits first.

use std::fmt;

const MAJOR_SHIFT: u32 = 22;
const MINOR_SHIFT: u32 = 12;
const MAJOR_MASK: u32 = 0x3FF;
const MINOR_MASK: u32 = 0x3FF;
const PATCH_MASK: u32 = 0xFFF;

/// Unpacked `major.minor.patch` triple
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Version {
    /// Major version (10 bits)
    pub major: u32,
    /// Minor version (10 bits)
    pub minor: u32,
    /// Patch version (12 bits)
    pub patch: u32,
}

impl Version {
    /// Unpack a 32-bit version integer
    pub fn from_packed(packed: u32) -> Self {
        Self {
            major: extract_major(packed),
            minor: extract_minor(packed),
            patch: extract_patch(packed),
        }
    }

    /// Pack back into a 32-bit integer; fields wider than their slot are masked
    pub fn packed(&self) -> u32 {
        pack(self.major, self.minor, self.patch)
    }
}

impl From<u32> for Version {
    fn from(packed: u32) -> Self {
        Self::from_packed(packed)
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

/// Pack a version triple into a 32-bit integer
pub fn pack(major: u32, minor: u32, patch: u32) -> u32 {
    ((major & MAJOR_MASK) << MAJOR_SHIFT) | ((minor & MINOR_MASK) << MINOR_SHIFT) | (patch & PATCH_MASK)
}

/// Extract the major version (high 10 bits)
pub fn extract_major(version: u32) -> u32 {
    (version >> MAJOR_SHIFT) & MAJOR_MASK
}

/// Extract the minor version (next 10 bits)
pub fn extract_minor(version: u32) -> u32 {
    (version >> MINOR_SHIFT) & MINOR_MASK
}

/// Extract the patch version (low 12 bits)
pub fn extract_patch(version: u32) -> u32 {
    version & PATCH_MASK
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(0, 0, 0)]
    #[case(1, 3, 275)]
    #[case(1023, 0, 0)]
    #[case(0, 1023, 0)]
    #[case(0, 0, 4095)]
    #[case(1023, 1023, 4095)]
    fn test_pack_unpack_round_trip(#[case] major: u32, #[case] minor: u32, #[case] patch: u32) {
        let version = Version::from_packed(pack(major, minor, patch));
        assert_eq!(version, Version { major, minor, patch });
    }

    #[test]
    fn test_unpack_known_values() {
        // VK_API_VERSION_1_3 with patch 275
        assert_eq!(Version::from_packed(0x0040_3113).to_string(), "1.3.275");
        assert_eq!(Version::from_packed(u32::MAX).to_string(), "1023.1023.4095");
        assert_eq!(Version::from(0).to_string(), "0.0.0");
    }

    #[test]
    fn test_pack_masks_oversized_fields() {
        assert_eq!(pack(1024, 0, 0), 0);
        assert_eq!(pack(0, 0, 4096), 0);
        assert_eq!(Version { major: 1, minor: 2, patch: 3 }.packed(), pack(1, 2, 3));
    }
}
