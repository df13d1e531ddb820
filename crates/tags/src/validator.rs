use core_types::{CustomTag, LabelCatalog};
use serde::Serialize;
use std::collections::BTreeSet;
use uuid::Uuid;

/// Result of checking whether a candidate tag may join the current selection.
///
/// Names are listed in catalog order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TagValidation {
    /// False iff `conflicts` is non-empty. Missing requirements do not block the addition.
    pub is_valid: bool,
    /// Selected tags that exclude the candidate or are excluded by it.
    pub conflicts: Vec<String>,
    /// Tags the candidate suggests that are not selected yet.
    pub suggestions: Vec<String>,
    /// Tags the candidate requires that are not selected yet.
    pub required: Vec<String>,
}

/// A conflicting or incomplete pair found in a whole selection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TagPair {
    pub tag: String,
    pub other: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SelectionValidation {
    pub is_valid: bool,
    pub conflicts: Vec<TagPair>,
    /// `tag` requires `other`, which is not selected.
    pub missing_required: Vec<TagPair>,
}

/// Returns true if either tag lists the other as mutually exclusive.
///
/// Relationship graphs may be authored one-sidedly, so both directions are checked.
pub fn excludes_either_way(a: &CustomTag, b: &CustomTag) -> bool {
    a.relationships.mutually_exclusive_with.contains(&b.id)
        || b.relationships.mutually_exclusive_with.contains(&a.id)
}

/// Checks a candidate tag against an existing selection.
///
/// Never fails: an unknown candidate yields a valid, empty result, and unknown
/// selected ids are ignored.
pub fn validate_tag_addition(
    selected: &BTreeSet<Uuid>,
    candidate: Uuid,
    catalog: &LabelCatalog,
) -> TagValidation {
    let Some(candidate_tag) = catalog.tag(&candidate) else {
        tracing::warn!(%candidate, "Validating a tag that is not in the catalog");
        return TagValidation {
            is_valid: true,
            ..Default::default()
        };
    };
    let relationships = &candidate_tag.relationships;

    let mut result = TagValidation::default();
    for tag in &catalog.tags {
        if tag.id == candidate {
            continue;
        }
        let is_selected = selected.contains(&tag.id);
        if is_selected && excludes_either_way(candidate_tag, tag) {
            result.conflicts.push(tag.name.clone());
        }
        if !is_selected && relationships.suggested_with.contains(&tag.id) {
            result.suggestions.push(tag.name.clone());
        }
        if !is_selected && relationships.required_with.contains(&tag.id) {
            result.required.push(tag.name.clone());
        }
    }
    result.is_valid = result.conflicts.is_empty();

    if !result.is_valid {
        tracing::debug!(tag = %candidate_tag.name, conflicts = ?result.conflicts, "Tag addition conflicts");
    }
    result
}

/// Checks a complete selection: every exclusive pair and every unmet requirement.
pub fn validate_selection(selected: &BTreeSet<Uuid>, catalog: &LabelCatalog) -> SelectionValidation {
    let chosen: Vec<&CustomTag> = catalog.tags.iter().filter(|t| selected.contains(&t.id)).collect();

    let mut result = SelectionValidation::default();
    for (i, tag) in chosen.iter().enumerate() {
        for other in &chosen[i + 1..] {
            if excludes_either_way(tag, other) {
                result.conflicts.push(TagPair {
                    tag: tag.name.clone(),
                    other: other.name.clone(),
                });
            }
        }
        for required in tag.relationships.required_with.iter().filter(|id| !selected.contains(*id)) {
            // Dangling requirements name the id so they stay visible.
            let other = catalog
                .tag_name(required)
                .map(str::to_string)
                .unwrap_or_else(|| required.to_string());
            result.missing_required.push(TagPair {
                tag: tag.name.clone(),
                other,
            });
        }
    }
    result.is_valid = result.conflicts.is_empty() && result.missing_required.is_empty();
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    /// A excludes B one-sidedly, A suggests C, D requires A.
    fn catalog() -> (LabelCatalog, [Uuid; 4]) {
        let mut a = CustomTag::new("A");
        let b = CustomTag::new("B");
        let c = CustomTag::new("C");
        let mut d = CustomTag::new("D");
        a.relationships.mutually_exclusive_with.insert(b.id);
        a.relationships.suggested_with.insert(c.id);
        d.relationships.required_with.insert(a.id);
        let ids = [a.id, b.id, c.id, d.id];
        (
            LabelCatalog {
                tags: vec![a, b, c, d],
                ..Default::default()
            },
            ids,
        )
    }

    #[test]
    fn asymmetric_exclusion_is_detected_from_the_other_side() {
        let (catalog, [a, b, _, _]) = catalog();
        let result = validate_tag_addition(&BTreeSet::from([a]), b, &catalog);
        assert!(!result.is_valid);
        assert_eq!(result.conflicts, vec!["A".to_string()]);
    }

    #[test]
    fn exclusion_is_detected_from_the_authoring_side() {
        let (catalog, [a, b, _, _]) = catalog();
        let result = validate_tag_addition(&BTreeSet::from([b]), a, &catalog);
        assert!(!result.is_valid);
        assert_eq!(result.conflicts, vec!["B".to_string()]);
        assert_eq!(result.suggestions, vec!["C".to_string()]);
    }

    #[test]
    fn suggestions_and_requirements_skip_selected_tags() {
        let (catalog, [a, _, c, d]) = catalog();
        let result = validate_tag_addition(&BTreeSet::new(), d, &catalog);
        assert!(result.is_valid);
        assert_eq!(result.required, vec!["A".to_string()]);

        let result = validate_tag_addition(&BTreeSet::from([a]), d, &catalog);
        assert!(result.required.is_empty());

        let result = validate_tag_addition(&BTreeSet::from([c]), a, &catalog);
        assert!(result.suggestions.is_empty());
    }

    #[test]
    fn unknown_candidate_is_valid_and_empty() {
        let (catalog, [a, _, _, _]) = catalog();
        let result = validate_tag_addition(&BTreeSet::from([a]), Uuid::new_v4(), &catalog);
        assert!(result.is_valid);
        assert!(result.conflicts.is_empty());
    }

    #[test]
    fn whole_selection_reports_pairs_and_missing_requirements() {
        let (catalog, [a, b, _, d]) = catalog();
        let result = validate_selection(&BTreeSet::from([a, b]), &catalog);
        assert!(!result.is_valid);
        assert_eq!(
            result.conflicts,
            vec![TagPair {
                tag: "A".to_string(),
                other: "B".to_string()
            }]
        );

        let result = validate_selection(&BTreeSet::from([d]), &catalog);
        assert!(!result.is_valid);
        assert_eq!(result.missing_required[0].other, "A");

        assert!(validate_selection(&BTreeSet::from([a, d]), &catalog).is_valid);
    }
}
