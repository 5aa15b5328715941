//! Enumerations stored as text in the IR.

use crate::IrError;

macro_rules! text_enum {
    (
        $(#[$meta:meta])*
        pub enum $name:ident { $($variant:ident => $text:literal),+ $(,)? }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            pub const ALL: &'static [Self] = &[$(Self::$variant),+];

            /// Text stored in the IR
            #[must_use]
            pub const fn as_str(self) -> &'static str {
                match self {
                    $(Self::$variant => $text),+
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl std::str::FromStr for $name {
            type Err = IrError;

            fn from_str(text: &str) -> Result<Self, Self::Err> {
                match text {
                    $($text => Ok(Self::$variant),)+
                    other => Err(IrError::corrupt(format!(
                        concat!("unknown ", stringify!($name), " '{}'"),
                        other
                    ))),
                }
            }
        }

        impl rusqlite::ToSql for $name {
            fn to_sql(&self) -> rusqlite::Result<rusqlite::types::ToSqlOutput<'_>> {
                Ok(rusqlite::types::ToSqlOutput::from(self.as_str()))
            }
        }
    };
}

text_enum! {
    /// Kind of a schema type
    pub enum TypeKind {
        Object => "OBJECT",
        Interface => "INTERFACE",
        Union => "UNION",
        Enum => "ENUM",
        Scalar => "SCALAR",
        Input => "INPUT",
    }
}

text_enum! {
    /// Kind of a document
    pub enum DocumentKind {
        Query => "query",
        Mutation => "mutation",
        Subscription => "subscription",
        Fragment => "fragment",
    }
}

text_enum! {
    /// Kind of a selection
    pub enum SelectionKind {
        Field => "field",
        Fragment => "fragment",
        InlineFragment => "inline_fragment",
    }
}

impl TypeKind {
    /// Object, interface or union
    #[must_use]
    pub const fn is_composite(self) -> bool {
        matches!(self, Self::Object | Self::Interface | Self::Union)
    }

    /// Scalar or enum
    #[must_use]
    pub const fn is_leaf(self) -> bool {
        matches!(self, Self::Scalar | Self::Enum)
    }
}

impl DocumentKind {
    #[must_use]
    pub const fn is_operation(self) -> bool {
        !matches!(self, Self::Fragment)
    }
}
