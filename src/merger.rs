//! Folds fragments into the aggregate document.

use crate::document::{Operation, PathItem, SpecificationDocument, TagEntry};
use crate::fragment::Fragment;
use indexmap::IndexMap;
use log::debug;
use std::hash::Hash;

/// Merges every fragment into `doc`, in order.
pub fn add_data(doc: &mut SpecificationDocument, fragments: impl IntoIterator<Item = Fragment>) {
    for fragment in fragments {
        merge_fragment(doc, fragment);
    }
}

/// Merges one fragment into `doc`.
///
/// - Paths: per route and method, fields set by the incoming operation replace
///   existing ones and unset fields are kept; other methods stay
/// - Tags: appended unless a tag with the same name is already present
/// - Keyed collections: later keys overwrite earlier ones
/// - Consumes/produces: appended unless already listed
pub fn merge_fragment(doc: &mut SpecificationDocument, fragment: Fragment) {
    match fragment {
        Fragment::Paths(paths) => {
            for (route, item) in paths {
                debug!("Merging {} method(s) into {}", item.operations.len(), route);
                merge_path_item(doc.paths.entry(route).or_default(), item);
            }
        }
        Fragment::Tags(tags) => attach_tags(&mut doc.tags, tags),
        Fragment::Definitions(definitions) => overwrite(&mut doc.definitions, definitions),
        Fragment::Parameters(parameters) => overwrite(&mut doc.parameters, parameters),
        Fragment::Responses(responses) => overwrite(&mut doc.responses, responses),
        Fragment::SecurityDefinitions(schemes) => overwrite(&mut doc.security_definitions, schemes),
        Fragment::Consumes(types) => union(&mut doc.consumes, types),
        Fragment::Produces(types) => union(&mut doc.produces, types),
    }
}

fn merge_path_item(target: &mut PathItem, incoming: PathItem) {
    if incoming.reference.is_some() {
        target.reference = incoming.reference;
    }
    if incoming.parameters.is_some() {
        target.parameters = incoming.parameters;
    }
    for (method, operation) in incoming.operations {
        merge_operation(target.operations.entry(method).or_default(), operation);
    }
    target.extensions.extend(incoming.extensions);
}

fn merge_operation(target: &mut Operation, incoming: Operation) {
    if !incoming.tags.is_empty() {
        target.tags = incoming.tags;
    }
    replace_if_set(&mut target.summary, incoming.summary);
    replace_if_set(&mut target.description, incoming.description);
    replace_if_set(&mut target.operation_id, incoming.operation_id);
    replace_if_set(&mut target.produces, incoming.produces);
    replace_if_set(&mut target.consumes, incoming.consumes);
    replace_if_set(&mut target.parameters, incoming.parameters);
    if !incoming.responses.is_empty() {
        target.responses = incoming.responses;
    }
    replace_if_set(&mut target.security, incoming.security);
    target.deprecated |= incoming.deprecated;
    target.extensions.extend(incoming.extensions);
}

fn replace_if_set<T>(target: &mut Option<T>, incoming: Option<T>) {
    if incoming.is_some() {
        *target = incoming;
    }
}

fn attach_tags(target: &mut Vec<TagEntry>, tags: Vec<TagEntry>) {
    for tag in tags {
        if target.iter().any(|existing| existing.name == tag.name) {
            debug!("Skipping duplicate tag {}", tag.name);
            continue;
        }
        target.push(tag);
    }
}

fn overwrite<K: Hash + Eq, V>(target: &mut IndexMap<K, V>, incoming: IndexMap<K, V>) {
    target.extend(incoming);
}

fn union(target: &mut Vec<String>, incoming: Vec<String>) {
    for value in incoming {
        if !target.contains(&value) {
            target.push(value);
        }
    }
}
