//! Patch and Slot Flags
//!
//! Optimization hints consumed by the runtime's patch algorithm. Both only ever escalate
//! while they propagate up the tree.

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

bitflags! {
    /// Which parts of a vnode may change between renders.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct PatchFlags: u32 {
        const TEXT = 1;
        const CLASS = 1 << 1;
        const STYLE = 1 << 2;
        const PROPS = 1 << 3;
        /// Keys are not known statically; the granular bits above are ignored when set.
        const FULL_PROPS = 1 << 4;
        const HYDRATE_EVENTS = 1 << 5;
        const STABLE_FRAGMENT = 1 << 6;
        const KEYED_FRAGMENT = 1 << 7;
        const UNKEYED_FRAGMENT = 1 << 8;
        /// Only non-props patching is needed (refs, directives).
        const NEED_PATCH = 1 << 9;
        const DYNAMIC_SLOTS = 1 << 10;
        const DEV_ROOT_FRAGMENT = 1 << 11;
    }
}

/// How a component's slots depend on the parent's render scope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[repr(u8)]
pub enum SlotFlag {
    /// Slots only read their own parameters.
    #[default]
    Stable = 1,
    /// Slots close over outer reactive state or appear conditionally.
    Dynamic = 2,
    /// Slots passed through from the parent's own slots; refined at runtime.
    Forwarded = 3,
}

impl SlotFlag {
    fn rank(self) -> u8 {
        match self {
            SlotFlag::Stable => 0,
            SlotFlag::Forwarded => 1,
            SlotFlag::Dynamic => 2,
        }
    }

    /// The more pessimistic of the two flags.
    pub fn escalate(self, other: SlotFlag) -> SlotFlag {
        if other.rank() > self.rank() {
            other
        } else {
            self
        }
    }

    /// Value written into the `_` slot-object property.
    pub fn value(self) -> u32 {
        self as u32
    }
}
