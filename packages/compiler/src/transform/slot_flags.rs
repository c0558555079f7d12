//! Slot Flag Analysis
//!
//! Classifies a slots object literal as stable, dynamic or forwarded.

use tracing::trace;

use super::flags::SlotFlag;
use crate::output::output_ast::{Expression, LiteralMapEntry, PropertyKey};

/// Identifier under which a component receives its own slots.
pub const FORWARDED_SLOTS: &str = "slots";

/// Scan `entries` left to right, stopping at the first dynamic entry, and combine the
/// verdict with `prior` (a flag already forced by the surrounding tree).
pub fn classify(entries: &[LiteralMapEntry], prior: SlotFlag) -> SlotFlag {
    let mut has_dynamic = false;
    let mut has_forwarded = false;

    for entry in entries {
        let property = match entry {
            // { ...slots }
            LiteralMapEntry::Spread(spread) if spread.argument.is_identifier_named(FORWARDED_SLOTS) => {
                has_forwarded = true;
                continue;
            }
            // { ...other }
            LiteralMapEntry::Spread(_) => {
                has_dynamic = true;
                break;
            }
            LiteralMapEntry::Property(property) => property,
        };

        // { [name]: () => … }
        if matches!(property.key, PropertyKey::Computed(_)) {
            has_dynamic = true;
            break;
        }

        match property.value.as_ref() {
            // { foo: slots.foo }
            value if value.is_member_of(FORWARDED_SLOTS) => has_forwarded = true,
            // { foo: slots.foo ? a : b } forwards, { foo: cond ? a : b } does not
            Expression::Conditional(cond) => {
                if cond.condition.is_member_of(FORWARDED_SLOTS) {
                    has_forwarded = true;
                } else {
                    has_dynamic = true;
                    break;
                }
            }
            _ => {}
        }
    }

    let verdict = if has_dynamic {
        SlotFlag::Dynamic
    } else if has_forwarded {
        SlotFlag::Forwarded
    } else {
        SlotFlag::Stable
    };
    let flag = prior.escalate(verdict);
    trace!(?prior, ?verdict, ?flag, "classified slots object");
    flag
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::output_ast as o;

    fn stable_slot() -> Expression {
        o::arrow_fn(vec![], o::variable("a"))
    }

    #[test]
    fn plain_functions_are_stable() {
        let entries = vec![LiteralMapEntry::named("default", stable_slot())];
        assert_eq!(classify(&entries, SlotFlag::Stable), SlotFlag::Stable);
    }

    #[test]
    fn empty_object_keeps_prior() {
        assert_eq!(classify(&[], SlotFlag::Stable), SlotFlag::Stable);
        assert_eq!(classify(&[], SlotFlag::Forwarded), SlotFlag::Forwarded);
        assert_eq!(classify(&[], SlotFlag::Dynamic), SlotFlag::Dynamic);
    }

    #[test]
    fn computed_member_read_forwards() {
        let entries = vec![LiteralMapEntry::named(
            "foo",
            o::variable("slots").key(o::literal("foo")),
        )];
        assert_eq!(classify(&entries, SlotFlag::Stable), SlotFlag::Forwarded);
    }
}
