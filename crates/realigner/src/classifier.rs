//! Channel classification.
//!
//! Shared by the discovery and rewrite passes so both see the same family
//! for the same record.

use contracts::{Family, FamilyPrefixes, Payload, RealignConfig, Timestamp};

/// Family and stamp of a classified record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Classification {
    /// Family of the channel (or of the first child frame on the transform channel)
    pub family: Family,
    /// Stamp used for offset discovery
    pub stamp: Timestamp,
}

/// Maps `(channel, payload)` to a family
#[derive(Debug, Clone)]
pub struct Classifier {
    transform_channel: String,
    prefixes: FamilyPrefixes,
}

impl Classifier {
    /// Build from the run configuration
    pub fn new(config: &RealignConfig) -> Self {
        Self {
            transform_channel: config.transform_channel.clone(),
            prefixes: config.families.clone(),
        }
    }

    /// Whether `channel` is the multi-transform channel
    pub fn is_transform_channel(&self, channel: &str) -> bool {
        channel == self.transform_channel
    }

    /// Classify a record.
    ///
    /// On the transform channel only the first sub-transform is inspected:
    /// its `child_frame_id` is the classified name and its stamp is returned.
    /// A transform record without sub-transforms is unclassified. On any
    /// other channel the channel name is classified and the payload must
    /// expose a single header stamp.
    pub fn classify(&self, channel: &str, payload: &Payload) -> Option<Classification> {
        let (name, stamp) = if self.is_transform_channel(channel) {
            let first = payload.transforms()?.first()?;
            (first.child_frame_id.as_str(), first.header.stamp)
        } else {
            (channel, payload.header_stamp()?)
        };

        self.family_of(name)
            .map(|family| Classification { family, stamp })
    }

    /// Family of a bare channel / frame name
    ///
    /// Leading `/` are ignored; matching is a case-sensitive prefix test,
    /// hose first. `shooter` therefore belongs to the shoot family.
    pub fn family_of(&self, name: &str) -> Option<Family> {
        let name = normalize_name(name);
        if name.starts_with(self.prefixes.hose.as_str()) {
            Some(Family::Hose)
        } else if name.starts_with(self.prefixes.shoot.as_str()) {
            Some(Family::Shoot)
        } else {
            None
        }
    }
}

impl Default for Classifier {
    fn default() -> Self {
        Self::new(&RealignConfig::default())
    }
}

/// Strip all leading path separators
pub fn normalize_name(name: &str) -> &str {
    name.trim_start_matches('/')
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::TransformStamped;
    use serde_json::json;

    fn stamped(stamp: i64) -> Payload {
        Payload::stamped(Timestamp(stamp))
    }

    fn tf(frames: &[(&str, i64)]) -> Payload {
        Payload::Transforms {
            transforms: frames
                .iter()
                .map(|(child, stamp)| TransformStamped::identity(*child, Timestamp(*stamp)))
                .collect(),
        }
    }

    #[test]
    fn test_leading_separators_are_ignored() {
        let classifier = Classifier::default();
        let a = classifier.classify("/hose/scan", &stamped(10));
        let b = classifier.classify("hose/scan", &stamped(10));
        let c = classifier.classify("///hose/scan", &stamped(10));
        assert_eq!(a, b);
        assert_eq!(b, c);
        assert_eq!(
            a,
            Some(Classification {
                family: Family::Hose,
                stamp: Timestamp(10)
            })
        );
    }

    #[test]
    fn test_prefix_match_is_not_a_word_match() {
        let classifier = Classifier::default();
        let result = classifier.classify("shooter", &stamped(3));
        assert_eq!(result.map(|c| c.family), Some(Family::Shoot));
        assert_eq!(classifier.family_of("hosepipe"), Some(Family::Hose));
    }

    #[test]
    fn test_unmatched_names() {
        let classifier = Classifier::default();
        assert_eq!(classifier.classify("/odom", &stamped(1)), None);
        assert_eq!(classifier.classify("", &stamped(1)), None);
        assert_eq!(classifier.classify("/", &stamped(1)), None);
        assert_eq!(classifier.classify("/Hose/scan", &stamped(1)), None);
        assert_eq!(classifier.classify("/robot/hose", &stamped(1)), None);
    }

    #[test]
    fn test_unstamped_payload_is_unclassified() {
        let classifier = Classifier::default();
        let payload = Payload::Unstamped {
            body: json!({ "data": 42 }),
        };
        assert_eq!(classifier.classify("/hose/status", &payload), None);
    }

    #[test]
    fn test_transform_channel_uses_first_child_frame() {
        let classifier = Classifier::default();
        let payload = tf(&[("shoot_tip", 50), ("hose_tip", 70)]);
        assert_eq!(
            classifier.classify("/tf", &payload),
            Some(Classification {
                family: Family::Shoot,
                stamp: Timestamp(50)
            })
        );
    }

    #[test]
    fn test_transform_child_frame_with_leading_slash() {
        let classifier = Classifier::default();
        let payload = tf(&[("/hose_tip", 5)]);
        assert_eq!(
            classifier.classify("/tf", &payload).map(|c| c.family),
            Some(Family::Hose)
        );
    }

    #[test]
    fn test_empty_transform_record_is_unclassified() {
        let classifier = Classifier::default();
        assert_eq!(classifier.classify("/tf", &tf(&[])), None);
    }

    #[test]
    fn test_transform_channel_with_other_payload_is_unclassified() {
        let classifier = Classifier::default();
        assert_eq!(classifier.classify("/tf", &stamped(5)), None);
    }

    #[test]
    fn test_transforms_off_the_transform_channel_are_unclassified() {
        let classifier = Classifier::default();
        assert_eq!(classifier.classify("/hose/tf", &tf(&[("hose_tip", 5)])), None);
    }

    #[test]
    fn test_classification_is_deterministic() {
        let classifier = Classifier::default();
        let payload = tf(&[("hose_a", 1), ("shoot_b", 2)]);
        let first = classifier.classify("/tf", &payload);
        for _ in 0..10 {
            assert_eq!(classifier.classify("/tf", &payload), first);
        }
    }

    #[test]
    fn test_custom_configuration() {
        let mut config = RealignConfig::default();
        config.transform_channel = "/tf_robot".into();
        config.families.shoot = "nozzle".into();
        let classifier = Classifier::new(&config);

        assert_eq!(classifier.classify("/tf", &tf(&[("hose_tip", 1)])), None);
        assert_eq!(
            classifier
                .classify("/tf_robot", &tf(&[("hose_tip", 1)]))
                .map(|c| c.family),
            Some(Family::Hose)
        );
        assert_eq!(classifier.family_of("/nozzle/cam"), Some(Family::Shoot));
        assert_eq!(classifier.family_of("/shoot/cam"), None);
    }
}
