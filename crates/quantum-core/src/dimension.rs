use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// The world state the player currently occupies.
///
/// The controller is always concretely in one of these two states. `Both`
/// exists only as an entity tag (see [`DimensionTag`]), never as a
/// controller state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dimension {
    #[default]
    Light,
    Dark,
}

impl Dimension {
    /// The opposite dimension.
    pub const fn toggled(self) -> Self {
        match self {
            Self::Light => Self::Dark,
            Self::Dark => Self::Light,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
        }
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Dimension membership of a placed entity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DimensionTag {
    Light,
    Dark,
    /// Always active. Also the fail-open default for untagged content.
    #[default]
    Both,
}

impl DimensionTag {
    /// Resolve an optional authoring-time tag string.
    ///
    /// Missing or unrecognized tags become `Both`: hiding content by
    /// accident is worse than over-showing it.
    pub fn resolve(raw: Option<&str>) -> Self {
        match raw {
            None => Self::Both,
            Some(s) => s.parse().unwrap_or_else(|e: UnknownDimension| {
                tracing::warn!("{e}, defaulting to both");
                Self::Both
            }),
        }
    }

    /// The concrete dimension this tag is pinned to, if any.
    pub const fn specific(self) -> Option<Dimension> {
        match self {
            Self::Light => Some(Dimension::Light),
            Self::Dark => Some(Dimension::Dark),
            Self::Both => None,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
            Self::Both => "both",
        }
    }
}

impl From<Dimension> for DimensionTag {
    fn from(d: Dimension) -> Self {
        match d {
            Dimension::Light => Self::Light,
            Dimension::Dark => Self::Dark,
        }
    }
}

impl fmt::Display for DimensionTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a tag string names no known dimension.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownDimension(pub String);

impl fmt::Display for UnknownDimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown dimension tag {:?}", self.0)
    }
}

impl std::error::Error for UnknownDimension {}

impl FromStr for DimensionTag {
    type Err = UnknownDimension;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "light" => Ok(Self::Light),
            "dark" => Ok(Self::Dark),
            "both" => Ok(Self::Both),
            _ => Err(UnknownDimension(s.to_string())),
        }
    }
}

/// Collision policy: whether an entity with `tag` is visible, solid and
/// interactable while the world is in `current`.
///
/// This is the only place the truth table lives. Visibility, physics
/// enable and interaction re-checks all call through here.
pub const fn is_active(tag: DimensionTag, current: Dimension) -> bool {
    match (tag, current) {
        (DimensionTag::Both, _) => true,
        (DimensionTag::Light, Dimension::Light) => true,
        (DimensionTag::Dark, Dimension::Dark) => true,
        (DimensionTag::Light, Dimension::Dark) => false,
        (DimensionTag::Dark, Dimension::Light) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truth_table() {
        let cases = [
            (DimensionTag::Light, Dimension::Light, true),
            (DimensionTag::Light, Dimension::Dark, false),
            (DimensionTag::Dark, Dimension::Light, false),
            (DimensionTag::Dark, Dimension::Dark, true),
            (DimensionTag::Both, Dimension::Light, true),
            (DimensionTag::Both, Dimension::Dark, true),
        ];
        for (tag, current, expected) in cases {
            assert_eq!(
                is_active(tag, current),
                expected,
                "is_active({tag}, {current}) should be {expected}"
            );
        }
    }

    #[test]
    fn toggle_is_involution() {
        assert_eq!(Dimension::Light.toggled(), Dimension::Dark);
        assert_eq!(Dimension::Dark.toggled(), Dimension::Light);
        assert_eq!(Dimension::Light.toggled().toggled(), Dimension::Light);
    }

    #[test]
    fn resolve_fails_open() {
        assert_eq!(DimensionTag::resolve(None), DimensionTag::Both);
        assert_eq!(DimensionTag::resolve(Some("shadow")), DimensionTag::Both);
        assert_eq!(DimensionTag::resolve(Some("Dark")), DimensionTag::Dark);
        assert_eq!(DimensionTag::resolve(Some(" light ")), DimensionTag::Light);
    }

    #[test]
    fn parse_rejects_unknown() {
        let err = "purple".parse::<DimensionTag>().unwrap_err();
        assert_eq!(err, UnknownDimension("purple".to_string()));
    }

    #[test]
    fn tag_specific_dimension() {
        assert_eq!(DimensionTag::Light.specific(), Some(Dimension::Light));
        assert_eq!(DimensionTag::Dark.specific(), Some(Dimension::Dark));
        assert_eq!(DimensionTag::Both.specific(), None);
        assert_eq!(DimensionTag::from(Dimension::Dark), DimensionTag::Dark);
    }

    #[test]
    fn serde_uses_lowercase_names() {
        let json = serde_json::to_string(&DimensionTag::Both).unwrap();
        assert_eq!(json, "\"both\"");
        let d: Dimension = serde_json::from_str("\"dark\"").unwrap();
        assert_eq!(d, Dimension::Dark);
    }
}
