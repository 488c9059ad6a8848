use std::collections::BTreeMap;

use crate::model::{EntityType, Property, SchemaModel};
use crate::names;

/// Same property name and same primitive kind. This is the overlap measure
/// behind fuzzy entity matching.
#[must_use]
pub fn equivalent_properties(a: &Property, b: &Property) -> bool {
    a.name == b.name && a.kind == b.kind
}

#[derive(Debug)]
pub(crate) struct EntityPairs<'m> {
    pub paired: Vec<EntityPair<'m>>,
    /// Target-only entity types, in target declaration order.
    pub created: Vec<&'m EntityType>,
    /// Source-only entity types, in source declaration order.
    pub dropped: Vec<&'m EntityType>,
}

#[derive(Debug)]
pub(crate) struct EntityPair<'m> {
    pub source: &'m EntityType,
    pub target: &'m EntityType,
    /// `(source, target)` property pairs, matched by name then column name.
    pub properties: Vec<(&'m Property, &'m Property)>,
    pub source_only: Vec<&'m Property>,
    pub target_only: Vec<&'m Property>,
}

/// Pairs entity types across the two models. First pass matches equal
/// logical names; a second pass fuzzy-matches the remainders by property
/// overlap against `fuzzy_threshold`. Every entity appears in at most one
/// pair; ties keep the first candidate in declaration order.
pub(crate) fn pair_entity_types<'m>(
    source: &'m SchemaModel,
    target: &'m SchemaModel,
    fuzzy_threshold: f64,
) -> EntityPairs<'m> {
    let mut paired = Vec::new();
    let mut matched_source = vec![false; source.entity_types.len()];
    let mut matched_target = vec![false; target.entity_types.len()];

    for (source_idx, source_entity) in source.entity_types.iter().enumerate() {
        let simple = target
            .entity_types
            .iter()
            .enumerate()
            .find(|(target_idx, candidate)| {
                !matched_target[*target_idx] && candidate.name == source_entity.name
            });

        if let Some((target_idx, target_entity)) = simple {
            matched_source[source_idx] = true;
            matched_target[target_idx] = true;
            paired.push(pair_properties(source_entity, target_entity));
        }
    }

    for (source_idx, source_entity) in source.entity_types.iter().enumerate() {
        if matched_source[source_idx] {
            continue;
        }

        let mut best: Option<(usize, f64)> = None;
        for (target_idx, target_entity) in target.entity_types.iter().enumerate() {
            if matched_target[target_idx] {
                continue;
            }
            let overlap = property_overlap(source_entity, target_entity);
            if overlap >= fuzzy_threshold
                && best.is_none_or(|(_, best_overlap)| overlap > best_overlap)
            {
                best = Some((target_idx, overlap));
            }
        }

        if let Some((target_idx, _)) = best {
            matched_source[source_idx] = true;
            matched_target[target_idx] = true;
            paired.push(pair_properties(
                source_entity,
                &target.entity_types[target_idx],
            ));
        }
    }

    let dropped = source
        .entity_types
        .iter()
        .enumerate()
        .filter(|(idx, _)| !matched_source[*idx])
        .map(|(_, entity)| entity)
        .collect();
    let created = target
        .entity_types
        .iter()
        .enumerate()
        .filter(|(idx, _)| !matched_target[*idx])
        .map(|(_, entity)| entity)
        .collect();

    EntityPairs {
        paired,
        created,
        dropped,
    }
}

/// Share of equivalent properties, counted against the mean property count
/// of the two entities.
fn property_overlap(source: &EntityType, target: &EntityType) -> f64 {
    if source.properties.is_empty() && target.properties.is_empty() {
        return 0.0;
    }

    let matches = source
        .properties
        .iter()
        .filter(|source_property| {
            target
                .properties
                .iter()
                .any(|target_property| equivalent_properties(source_property, target_property))
        })
        .count();
    let mean = (source.properties.len() + target.properties.len()) as f64 / 2.0;
    matches as f64 / mean
}

/// Pairs properties within one entity pair: first by property name, then,
/// among the unmatched, by resolved column name.
fn pair_properties<'m>(source: &'m EntityType, target: &'m EntityType) -> EntityPair<'m> {
    let mut matched_target = vec![false; target.properties.len()];
    let mut properties = Vec::new();
    let mut by_column = Vec::new();

    for source_property in &source.properties {
        let by_name = target
            .properties
            .iter()
            .enumerate()
            .find(|(target_idx, candidate)| {
                !matched_target[*target_idx] && candidate.name == source_property.name
            });

        match by_name {
            Some((target_idx, target_property)) => {
                matched_target[target_idx] = true;
                properties.push((source_property, target_property));
            }
            None => by_column.push(source_property),
        }
    }

    let mut source_only = Vec::new();
    for source_property in by_column {
        let source_column = names::column_name(source_property);
        let matched = target
            .properties
            .iter()
            .enumerate()
            .find(|(target_idx, candidate)| {
                !matched_target[*target_idx] && names::column_name(candidate) == source_column
            });

        match matched {
            Some((target_idx, target_property)) => {
                matched_target[target_idx] = true;
                properties.push((source_property, target_property));
            }
            None => source_only.push(source_property),
        }
    }

    let target_only = target
        .properties
        .iter()
        .enumerate()
        .filter(|(target_idx, _)| !matched_target[*target_idx])
        .map(|(_, property)| property)
        .collect();

    EntityPair {
        source,
        target,
        properties,
        source_only,
        target_only,
    }
}

/// Global `source property → target property` pairing, keyed by owning
/// entity. Key, foreign-key, and index equivalence all route through this.
#[derive(Debug, Default)]
pub(crate) struct PropertyMap {
    pairs: BTreeMap<(String, String), (String, String)>,
}

impl PropertyMap {
    pub fn from_pairs(pairs: &EntityPairs<'_>) -> Self {
        let mut map = Self::default();
        for pair in &pairs.paired {
            for (source_property, target_property) in &pair.properties {
                map.pairs.insert(
                    (pair.source.name.clone(), source_property.name.clone()),
                    (pair.target.name.clone(), target_property.name.clone()),
                );
            }
        }
        map
    }

    pub fn maps_to(
        &self,
        source_entity: &str,
        source_property: &str,
        target_entity: &str,
        target_property: &str,
    ) -> bool {
        self.pairs
            .get(&(source_entity.to_string(), source_property.to_string()))
            .is_some_and(|(entity, property)| {
                entity == target_entity && property == target_property
            })
    }

    /// Pairwise check that two property lists map through the pairing.
    pub fn lists_map(
        &self,
        source_entity: &str,
        source_properties: &[String],
        target_entity: &str,
        target_properties: &[String],
    ) -> bool {
        source_properties.len() == target_properties.len()
            && source_properties
                .iter()
                .zip(target_properties)
                .all(|(source_property, target_property)| {
                    self.maps_to(
                        source_entity,
                        source_property,
                        target_entity,
                        target_property,
                    )
                })
    }
}
