//! Property Deduplication
//!
//! Collapses repeated static keys in a props object. With merging enabled, repeated
//! `class`, `style` and `on*` values are combined into an array for the runtime to merge;
//! every other repeated key keeps its last occurrence, at that occurrence's position.

use indexmap::IndexMap;

use crate::output::output_ast::{self as o, Expression, LiteralMapEntry};

fn is_mergeable(name: &str) -> bool {
    name == "class" || name == "style" || name.starts_with("on")
}

pub fn dedupe_properties(entries: Vec<LiteralMapEntry>, merge_props: bool) -> Vec<LiteralMapEntry> {
    let mut slots: Vec<Option<LiteralMapEntry>> = Vec::with_capacity(entries.len());
    let mut known: IndexMap<String, usize> = IndexMap::new();

    for entry in entries {
        let name = match &entry {
            LiteralMapEntry::Property(property) => property.key.string_name().map(str::to_string),
            LiteralMapEntry::Spread(_) => None,
        };
        let Some(name) = name else {
            slots.push(Some(entry));
            continue;
        };

        match known.get(&name).copied() {
            Some(index) if merge_props && is_mergeable(&name) => {
                if let (Some(LiteralMapEntry::Property(existing)), LiteralMapEntry::Property(incoming)) =
                    (slots[index].as_mut(), entry)
                {
                    let previous = std::mem::replace(existing.value.as_mut(), o::null_expr());
                    *existing.value = merge_values(previous, *incoming.value);
                }
            }
            Some(index) => {
                slots[index] = None;
                known.insert(name, slots.len());
                slots.push(Some(entry));
            }
            None => {
                known.insert(name, slots.len());
                slots.push(Some(entry));
            }
        }
    }

    slots.into_iter().flatten().collect()
}

fn merge_values(existing: Expression, incoming: Expression) -> Expression {
    match existing {
        Expression::LiteralArray(mut array) => {
            array.entries.push(incoming);
            Expression::LiteralArray(array)
        }
        other => o::literal_arr(vec![other, incoming]),
    }
}
