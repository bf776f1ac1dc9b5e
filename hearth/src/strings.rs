// NOTE: this needs to be above the module definitions because otherwise the
// macro is not declared.

/// Defines an enum that maps to plain string values.
///
/// Used for the tag and attribute names the view description can carry, so
/// that the string form is shared by the markup renderer and the DOM
/// builder.
#[macro_export]
macro_rules! make_str_enum {
    (
        $enum_name:ident {
            $( $name:ident = $value:literal, )*
        }
    ) => {
        #[repr(u16)]
        #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
        pub enum $enum_name {
            $( $name, )*
        }

        impl $enum_name {
            /// Convert to a string.
            pub fn as_str(self) -> &'static str {
                match self {
                    $(
                        Self::$name => $value,
                    )*
                }
            }
        }

        impl std::fmt::Display for $enum_name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}
