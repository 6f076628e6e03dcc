//! The static sound catalog.
//!
//! A fixed mapping from human-readable labels to [`SoundDefinition`]s. The
//! catalog is the only place sounds are declared; channels always play
//! something selected from here.

use once_cell::sync::Lazy;

use super::sound::{NoiseColor, SoundDefinition};

/// One selectable entry in the catalog.
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogEntry {
    pub label: &'static str,
    pub definition: SoundDefinition,
}

impl CatalogEntry {
    fn tone(label: &'static str, frequency: f32) -> Self {
        Self {
            label,
            definition: SoundDefinition::Tone { frequency },
        }
    }

    fn noise(label: &'static str, color: NoiseColor) -> Self {
        Self {
            label,
            definition: SoundDefinition::Noise(color),
        }
    }

    fn sample(label: &'static str, path: &str) -> Self {
        Self {
            label,
            definition: SoundDefinition::sample(path),
        }
    }
}

static CATALOG: Lazy<Vec<CatalogEntry>> = Lazy::new(|| {
    vec![
        // Tones
        CatalogEntry::tone("174 Hz", 174.0),
        CatalogEntry::tone("285 Hz", 285.0),
        CatalogEntry::tone("396 Hz", 396.0),
        CatalogEntry::tone("417 Hz", 417.0),
        CatalogEntry::tone("432 Hz", 432.0),
        CatalogEntry::tone("528 Hz", 528.0),
        CatalogEntry::tone("639 Hz", 639.0),
        CatalogEntry::tone("741 Hz", 741.0),
        CatalogEntry::tone("852 Hz", 852.0),
        // Noise
        CatalogEntry::noise("White noise", NoiseColor::White),
        CatalogEntry::noise("Pink noise", NoiseColor::Pink),
        CatalogEntry::noise("Brown noise", NoiseColor::Brown),
        CatalogEntry::noise("Green noise", NoiseColor::Green),
        // Two labels, one approximation: both render as filtered brown noise.
        CatalogEntry::noise("Bathtime", NoiseColor::Bath),
        CatalogEntry::noise("Waterfall", NoiseColor::Bath),
        // Ambience
        CatalogEntry::sample("Rain", "assets/sounds/rain.ogg"),
        CatalogEntry::sample("Ocean waves", "assets/sounds/waves.ogg"),
        CatalogEntry::sample("Forest", "assets/sounds/forest.ogg"),
        CatalogEntry::sample("Fireplace", "assets/sounds/fireplace.ogg"),
        CatalogEntry::sample("Thunderstorm", "assets/sounds/thunder.ogg"),
    ]
});

/// All catalog entries, in declaration order.
pub fn all() -> &'static [CatalogEntry] {
    &CATALOG
}

/// Look up a definition by its label.
pub fn find(label: &str) -> Option<&'static SoundDefinition> {
    CATALOG
        .iter()
        .find(|entry| entry.label == label)
        .map(|entry| &entry.definition)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_not_empty() {
        assert!(!all().is_empty());
    }

    #[test]
    fn test_labels_are_unique() {
        let mut labels: Vec<_> = all().iter().map(|e| e.label).collect();
        labels.sort_unstable();
        let len = labels.len();
        labels.dedup();
        assert_eq!(labels.len(), len, "catalog labels must be unique");
    }

    #[test]
    fn test_find_by_label() {
        assert_eq!(
            find("528 Hz"),
            Some(&SoundDefinition::Tone { frequency: 528.0 })
        );
        assert!(find("no such sound").is_none());
    }

    #[test]
    fn test_duplicate_labels_share_one_behavior() {
        // Redundant labels are intentional: same definition, different names.
        assert_eq!(find("Bathtime"), find("Waterfall"));
    }

    #[test]
    fn test_sample_entries_carry_paths() {
        for entry in all() {
            if let SoundDefinition::Sample { path } = &entry.definition {
                assert!(path.starts_with("assets/sounds/"), "unexpected path {path}");
            }
        }
    }
}
