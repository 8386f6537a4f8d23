//! Compatibility resolution over a catalog snapshot.
//!
//! Pure functions of `(index, selections, target)`: no I/O, no internal
//! state, and no error paths. Missing data of any kind (unknown subcategory,
//! unknown name, absent compatibility record) resolves to an empty list so a
//! gap in one corner of the catalog never blocks resolution of unrelated
//! subcategories. Callers that need to distinguish "genuinely incompatible"
//! from "catalog incomplete" lint the catalog out-of-band (`catalog-lint`).

use crate::catalog::identity::{CategoryId, TechnologyName};
use crate::catalog::index::TechnologyIndex;
use crate::catalog::model::CompatibilityRule;
use std::collections::BTreeMap;

#[derive(Clone, Debug, Default, Eq, PartialEq)]
/// The user's in-progress choices: at most one technology per subcategory.
///
/// Created fresh per form session and mutated one entry at a time; the map
/// representation makes the one-name-per-subcategory invariant structural.
pub struct SelectionSet {
    choices: BTreeMap<CategoryId, TechnologyName>,
}

impl SelectionSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Choose `name` for `category`, returning any previous choice.
    pub fn select(&mut self, category: CategoryId, name: TechnologyName) -> Option<TechnologyName> {
        self.choices.insert(category, name)
    }

    /// Drop the choice for `category`, returning it if one was set.
    pub fn clear(&mut self, category: &CategoryId) -> Option<TechnologyName> {
        self.choices.remove(category)
    }

    pub fn get(&self, category: &CategoryId) -> Option<&TechnologyName> {
        self.choices.get(category)
    }

    pub fn is_empty(&self) -> bool {
        self.choices.is_empty()
    }

    pub fn len(&self) -> usize {
        self.choices.len()
    }

    /// Iterates choices in stable subcategory order.
    pub fn iter(&self) -> impl Iterator<Item = (&CategoryId, &TechnologyName)> {
        self.choices.iter()
    }
}

impl FromIterator<(CategoryId, TechnologyName)> for SelectionSet {
    fn from_iter<I: IntoIterator<Item = (CategoryId, TechnologyName)>>(iter: I) -> Self {
        Self {
            choices: iter.into_iter().collect(),
        }
    }
}

/// Forward lookup: compatibility data read directly off the selected record.
///
/// Unknown subcategories and names yield an empty list; at query time absence
/// means "no compatible options", never an error. When the record carries a
/// `languages` list and the language axis is queried, that list is the
/// answer. Legacy flat-list rules are returned for whichever subcategory was
/// asked for; the entries carry no category of their own.
pub fn compatible_technologies(
    index: &TechnologyIndex,
    selected_category: &CategoryId,
    selected_name: &TechnologyName,
    target_category: &CategoryId,
) -> Vec<TechnologyName> {
    let Some(tech) = index.technology(selected_category, selected_name) else {
        return Vec::new();
    };

    if target_category.0 == CategoryId::LANGUAGES {
        if let Some(languages) = &tech.languages {
            return languages.clone();
        }
    }

    match &tech.compatible_with {
        CompatibilityRule::Unspecified => Vec::new(),
        CompatibilityRule::Names(names) => names.clone(),
        CompatibilityRule::ByCategory(map) => {
            map.get(target_category).cloned().unwrap_or_default()
        }
    }
}

/// Reverse lookup: scan `target_category` for records that name the selected
/// technology as compatible.
///
/// The graph records relations asymmetrically (sometimes only on one side),
/// so resolution consults this direction when the forward lookup is empty to
/// avoid false negatives.
pub fn reverse_dependencies(
    index: &TechnologyIndex,
    selected_category: &CategoryId,
    selected_name: &TechnologyName,
    target_category: &CategoryId,
) -> Vec<TechnologyName> {
    index
        .technologies_in(target_category)
        .iter()
        .filter(|candidate| {
            rule_mentions(&candidate.compatible_with, selected_category, selected_name)
        })
        .map(|candidate| candidate.name.clone())
        .collect()
}

fn rule_mentions(
    rule: &CompatibilityRule,
    selected_category: &CategoryId,
    selected_name: &TechnologyName,
) -> bool {
    match rule {
        CompatibilityRule::Unspecified => false,
        CompatibilityRule::Names(names) => names.contains(selected_name),
        CompatibilityRule::ByCategory(map) => map
            .get(selected_category)
            .is_some_and(|names| names.contains(selected_name)),
    }
}

/// Multi-constraint resolution: the options in `target_category` compatible
/// with every current selection.
///
/// With no selections the full option list comes back: topology first, then
/// whatever the graph records under the subcategory. Otherwise each selection
/// contributes one compatibility set (forward lookup, falling back to the
/// reverse direction only when forward is empty) and the sets are
/// intersected. An empty result is a valid "nothing fits all constraints"
/// state, not a fault. Output order follows the first selection's set.
pub fn filter_compatible(
    index: &TechnologyIndex,
    selections: &SelectionSet,
    target_category: &CategoryId,
) -> Vec<TechnologyName> {
    if selections.is_empty() {
        return all_options(index, target_category);
    }

    let mut survivors: Option<Vec<TechnologyName>> = None;
    for (category, name) in selections.iter() {
        let mut compatible = compatible_technologies(index, category, name, target_category);
        if compatible.is_empty() {
            compatible = reverse_dependencies(index, category, name, target_category);
        }

        survivors = Some(match survivors {
            None => compatible,
            Some(current) => current
                .into_iter()
                .filter(|candidate| compatible.contains(candidate))
                .collect(),
        });

        if survivors.as_ref().is_some_and(|set| set.is_empty()) {
            return Vec::new();
        }
    }

    survivors.unwrap_or_default()
}

fn all_options(index: &TechnologyIndex, target_category: &CategoryId) -> Vec<TechnologyName> {
    if let Some(options) = index.topology().options_for(target_category) {
        return options.to_vec();
    }
    index
        .technologies_in(target_category)
        .iter()
        .map(|tech| tech.name.clone())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::model::TechnologyCatalog;
    use serde_json::json;

    fn cat(raw: &str) -> CategoryId {
        CategoryId(raw.to_string())
    }

    fn tech(raw: &str) -> TechnologyName {
        TechnologyName(raw.to_string())
    }

    fn names(raw: &[&str]) -> Vec<TechnologyName> {
        raw.iter().map(|name| tech(name)).collect()
    }

    fn selections(pairs: &[(&str, &str)]) -> SelectionSet {
        pairs
            .iter()
            .map(|(category, name)| (cat(category), tech(name)))
            .collect()
    }

    fn fixture_index() -> TechnologyIndex {
        let catalog: TechnologyCatalog = serde_json::from_value(json!({
            "schema_version": "tech_catalog_v1",
            "categories": {
                "frontend": {
                    "subcategories": {
                        "frameworks": ["React", "Vue", "Express.js"],
                        "languages": ["JavaScript", "TypeScript"],
                        "stateManagement": ["Redux", "MobX", "Vuex"]
                    }
                },
                "database": {"subcategories": {"databases": ["PostgreSQL", "MySQL"]}},
                "hosting": {"subcategories": {"hosting": ["Heroku", "AWS"]}},
                "testing": {"subcategories": {"unitTesting": ["Jest", "Vitest"]}}
            },
            "technologies": {
                "frameworks": [
                    {
                        "name": "React",
                        "languages": ["JavaScript", "TypeScript"],
                        "compatibleWith": {"stateManagement": ["Redux", "MobX"]}
                    },
                    {"name": "Vue", "compatibleWith": {"stateManagement": ["Vuex"]}},
                    {
                        "name": "Express.js",
                        "compatibleWith": {
                            "databases": ["PostgreSQL", "MySQL"],
                            "hosting": ["Heroku", "AWS"]
                        }
                    }
                ],
                "stateManagement": [
                    {"name": "Redux", "compatibleWith": {"frameworks": ["React"]}},
                    {"name": "Vuex", "compatibleWith": {"frameworks": ["Vue"]}}
                ],
                "hosting": [
                    {
                        "name": "Heroku",
                        "compatibleWith": {
                            "databases": ["PostgreSQL", "MySQL"],
                            "frameworks": ["Express.js"]
                        }
                    },
                    {"name": "AWS", "compatibleWith": {"frameworks": ["Express.js"]}}
                ],
                "unitTesting": [
                    {
                        "name": "Jest",
                        "compatibleWith": {
                            "frameworks": ["React", "Express.js"],
                            "databases": ["PostgreSQL"]
                        }
                    },
                    {"name": "Vitest", "compatibleWith": {"frameworks": ["React", "Vue"]}}
                ],
                "legacy": [
                    {"name": "Flatliner", "compatibleWith": ["Alpha", "Beta"]}
                ]
            }
        }))
        .unwrap();
        TechnologyIndex::from_catalog(catalog).unwrap()
    }

    #[test]
    fn forward_lookup_reads_per_category_rule() {
        let index = fixture_index();
        assert_eq!(
            compatible_technologies(
                &index,
                &cat("frameworks"),
                &tech("React"),
                &cat("stateManagement")
            ),
            names(&["Redux", "MobX"])
        );
        // No entry for the requested subcategory.
        assert!(
            compatible_technologies(&index, &cat("frameworks"), &tech("React"), &cat("hosting"))
                .is_empty()
        );
    }

    #[test]
    fn forward_lookup_tolerates_unknown_inputs() {
        let index = fixture_index();
        assert!(
            compatible_technologies(
                &index,
                &cat("noSuchCategory"),
                &tech("React"),
                &cat("stateManagement")
            )
            .is_empty()
        );
        assert!(
            compatible_technologies(
                &index,
                &cat("frameworks"),
                &tech("NoSuchTech"),
                &cat("stateManagement")
            )
            .is_empty()
        );
    }

    #[test]
    fn languages_axis_returns_the_record_list() {
        let index = fixture_index();
        assert_eq!(
            compatible_technologies(
                &index,
                &cat("frameworks"),
                &tech("React"),
                &cat("languages")
            ),
            names(&["JavaScript", "TypeScript"])
        );
        // Vue carries no languages list and its rule has no languages entry.
        assert!(
            compatible_technologies(&index, &cat("frameworks"), &tech("Vue"), &cat("languages"))
                .is_empty()
        );
    }

    #[test]
    fn flat_list_rule_applies_to_any_target() {
        let index = fixture_index();
        let for_hosting =
            compatible_technologies(&index, &cat("legacy"), &tech("Flatliner"), &cat("hosting"));
        let for_databases =
            compatible_technologies(&index, &cat("legacy"), &tech("Flatliner"), &cat("databases"));
        assert_eq!(for_hosting, names(&["Alpha", "Beta"]));
        assert_eq!(for_hosting, for_databases);
    }

    #[test]
    fn reverse_lookup_scans_the_target_side() {
        let index = fixture_index();
        assert_eq!(
            reverse_dependencies(
                &index,
                &cat("databases"),
                &tech("PostgreSQL"),
                &cat("hosting")
            ),
            names(&["Heroku"])
        );
        assert!(
            reverse_dependencies(&index, &cat("databases"), &tech("SQLite"), &cat("hosting"))
                .is_empty()
        );
    }

    #[test]
    fn empty_selection_returns_full_topology_list() {
        let index = fixture_index();
        let empty = SelectionSet::new();
        assert_eq!(
            filter_compatible(&index, &empty, &cat("stateManagement")),
            names(&["Redux", "MobX", "Vuex"])
        );
        // Graph-only subcategory: topology misses, the graph supplies names.
        assert_eq!(
            filter_compatible(&index, &empty, &cat("legacy")),
            names(&["Flatliner"])
        );
        // Unknown everywhere resolves to empty, not an error.
        assert!(filter_compatible(&index, &empty, &cat("noSuchCategory")).is_empty());
    }

    #[test]
    fn single_selection_matches_forward_lookup() {
        let index = fixture_index();
        let picked = selections(&[("frameworks", "React")]);
        assert_eq!(
            filter_compatible(&index, &picked, &cat("stateManagement")),
            compatible_technologies(
                &index,
                &cat("frameworks"),
                &tech("React"),
                &cat("stateManagement")
            )
        );
    }

    #[test]
    fn single_selection_falls_back_to_reverse_lookup() {
        let index = fixture_index();
        // PostgreSQL has no record of its own; only Heroku names it.
        let picked = selections(&[("databases", "PostgreSQL")]);
        assert_eq!(
            filter_compatible(&index, &picked, &cat("hosting")),
            reverse_dependencies(
                &index,
                &cat("databases"),
                &tech("PostgreSQL"),
                &cat("hosting")
            )
        );
    }

    #[test]
    fn forward_direction_wins_when_nonempty() {
        let index = fixture_index();
        // Reverse alone would only find Redux (MobX carries no record); the
        // forward data on React includes both.
        let picked = selections(&[("frameworks", "React")]);
        let result = filter_compatible(&index, &picked, &cat("stateManagement"));
        assert!(result.contains(&tech("MobX")));
    }

    #[test]
    fn asymmetric_relations_stay_one_sided() {
        let index = fixture_index();
        let picked = selections(&[("frameworks", "React")]);
        let result = filter_compatible(&index, &picked, &cat("stateManagement"));
        assert_eq!(result, names(&["Redux", "MobX"]));
        // Vuex names Vue, not React; it must not leak in.
        assert!(!result.contains(&tech("Vuex")));
    }

    #[test]
    fn multi_constraint_intersection() {
        let index = fixture_index();
        let picked = selections(&[("frameworks", "Express.js"), ("databases", "PostgreSQL")]);
        let result = filter_compatible(&index, &picked, &cat("hosting"));
        assert_eq!(result, names(&["Heroku"]));
        assert!(!result.contains(&tech("AWS")));
    }

    #[test]
    fn adding_a_constraint_never_grows_the_result() {
        let index = fixture_index();
        let one = selections(&[("frameworks", "React")]);
        let narrowed = filter_compatible(&index, &one, &cat("unitTesting"));

        let two = selections(&[("frameworks", "React"), ("databases", "PostgreSQL")]);
        let narrower = filter_compatible(&index, &two, &cat("unitTesting"));

        assert_eq!(narrowed, names(&["Jest", "Vitest"]));
        assert_eq!(narrower, names(&["Jest"]));
        assert!(narrower.iter().all(|name| narrowed.contains(name)));
    }

    #[test]
    fn contradictory_constraints_yield_empty() {
        let index = fixture_index();
        let picked = selections(&[("frameworks", "React"), ("stateManagement", "Vuex")]);
        assert!(filter_compatible(&index, &picked, &cat("unitTesting")).is_empty());
    }

    #[test]
    fn resolution_is_idempotent() {
        let index = fixture_index();
        let picked = selections(&[("frameworks", "Express.js"), ("databases", "PostgreSQL")]);
        let first = filter_compatible(&index, &picked, &cat("hosting"));
        let second = filter_compatible(&index, &picked, &cat("hosting"));
        assert_eq!(first, second);
    }

    #[test]
    fn selection_set_keeps_one_choice_per_subcategory() {
        let mut picked = SelectionSet::new();
        assert!(picked.select(cat("frameworks"), tech("React")).is_none());
        let replaced = picked.select(cat("frameworks"), tech("Vue"));
        assert_eq!(replaced, Some(tech("React")));
        assert_eq!(picked.len(), 1);
        assert_eq!(picked.get(&cat("frameworks")), Some(&tech("Vue")));
        assert_eq!(picked.clear(&cat("frameworks")), Some(tech("Vue")));
        assert!(picked.is_empty());
    }
}
