use std::fmt;

/// Dense `u32` handle into one of the `CircuitDB` tables. `Debug` prints the
/// table-qualified form, `Display` the short tag used in log lines.
macro_rules! table_id {
    ($(#[$meta:meta])* $name:ident, $tag:literal) => {
        $(#[$meta])*
        #[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        #[repr(transparent)]
        pub struct $name(pub u32);

        impl $name {
            #[inline]
            pub fn new(id: usize) -> Self {
                debug_assert!(id <= u32::MAX as usize);
                Self(id as u32)
            }

            #[inline]
            pub fn index(self) -> usize {
                self.0 as usize
            }

            /// Every id of a table holding `count` rows.
            pub fn range(count: usize) -> impl Iterator<Item = Self> {
                (0..count).map(Self::new)
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), self.0)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}{}", $tag, self.0)
            }
        }
    };
}

table_id!(
    /// A placed component (footprint plus pins).
    ComponentId,
    "C"
);
table_id!(PinId, "P");
table_id!(WireId, "W");
