use crate::error::TagError;
use core_types::CustomTag;
use serde::Serialize;
use std::collections::HashSet;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct NormalizationSummary {
    /// Reverse exclusion edges added to make the graph symmetric.
    pub mirrored_exclusions: usize,
    /// References to unknown tags or to the tag itself that were dropped.
    pub dropped_references: usize,
}

/// Rewrites the relationship graph into its canonical form before it is saved.
///
/// Mutual exclusion becomes symmetric; suggestions and requirements stay
/// directed. Self references and references to tags that no longer exist are
/// removed. Fails if a tag would both require and exclude the same tag.
pub fn normalize_relationships(tags: &mut [CustomTag]) -> Result<NormalizationSummary, TagError> {
    let known: HashSet<Uuid> = tags.iter().map(|t| t.id).collect();
    let mut summary = NormalizationSummary::default();

    for tag in tags.iter_mut() {
        let own = tag.id;
        let rel = &mut tag.relationships;
        for set in [&mut rel.mutually_exclusive_with, &mut rel.suggested_with, &mut rel.required_with] {
            let before = set.len();
            set.retain(|id| *id != own && known.contains(id));
            summary.dropped_references += before - set.len();
        }
    }

    let edges: Vec<(Uuid, Uuid)> = tags
        .iter()
        .flat_map(|t| t.relationships.mutually_exclusive_with.iter().map(move |other| (t.id, *other)))
        .collect();
    for (from, to) in edges {
        if let Some(target) = tags.iter_mut().find(|t| t.id == to) {
            if target.relationships.mutually_exclusive_with.insert(from) {
                summary.mirrored_exclusions += 1;
            }
        }
    }

    for tag in tags.iter() {
        let rel = &tag.relationships;
        if let Some(other) = rel.required_with.intersection(&rel.mutually_exclusive_with).next() {
            let other = tags
                .iter()
                .find(|t| t.id == *other)
                .map(|t| t.name.clone())
                .unwrap_or_else(|| other.to_string());
            return Err(TagError::ContradictoryRelationship {
                tag: tag.name.clone(),
                other,
            });
        }
    }

    tracing::debug!(?summary, "Normalized tag relationships");
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exclusion_becomes_symmetric() {
        let mut a = CustomTag::new("A");
        let b = CustomTag::new("B");
        a.relationships.mutually_exclusive_with.insert(b.id);
        let (a_id, b_id) = (a.id, b.id);
        let mut tags = vec![a, b];

        let summary = normalize_relationships(&mut tags).unwrap();
        assert_eq!(summary.mirrored_exclusions, 1);
        assert!(tags[1].relationships.mutually_exclusive_with.contains(&a_id));
        assert!(tags[0].relationships.mutually_exclusive_with.contains(&b_id));

        // Idempotent.
        assert_eq!(normalize_relationships(&mut tags).unwrap(), NormalizationSummary::default());
    }

    #[test]
    fn suggestions_stay_directed_and_dangling_ids_are_dropped() {
        let mut a = CustomTag::new("A");
        let b = CustomTag::new("B");
        a.relationships.suggested_with.insert(b.id);
        a.relationships.required_with.insert(Uuid::new_v4());
        let mut tags = vec![a, b];

        let summary = normalize_relationships(&mut tags).unwrap();
        assert_eq!(summary.dropped_references, 1);
        assert!(tags[0].relationships.required_with.is_empty());
        assert!(tags[1].relationships.suggested_with.is_empty());
    }

    #[test]
    fn mirrored_exclusion_can_expose_a_contradiction() {
        // B requires A, A excludes B: after mirroring B both requires and excludes A.
        let mut a = CustomTag::new("A");
        let mut b = CustomTag::new("B");
        a.relationships.mutually_exclusive_with.insert(b.id);
        b.relationships.required_with.insert(a.id);
        let mut tags = vec![a, b];

        let err = normalize_relationships(&mut tags).unwrap_err();
        assert_eq!(
            err,
            TagError::ContradictoryRelationship {
                tag: "B".to_string(),
                other: "A".to_string()
            }
        );
    }
}
