//! Macros for defining validated text types.

/// Macro for defining a non-empty text type, having no surrounding
/// whitespace and limited in length.
///
/// # Example
///
/// ```rust
/// use common::define_text;
///
/// define_text! {
///     #[doc = "Title of an article."]
///     struct Title(max = 16);
/// }
///
/// assert!(Title::new("Hello").is_some());
/// assert!(Title::new(" Hello").is_none());
/// assert!(Title::new("").is_none());
/// assert!(Title::new("a".repeat(17)).is_none());
/// assert_eq!("Hello".parse::<Title>().unwrap().as_ref(), "Hello");
/// ```
#[macro_export]
macro_rules! define_text {
    (
        #[doc = $doc:literal]
        struct $name:ident(max = $max:literal);
    ) => {
        #[derive(Clone, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
        #[doc = $doc]
        pub struct $name(::std::string::String);

        impl $name {
            /// Maximum number of characters.
            pub const MAX_LEN: usize = $max;

            /// Creates a new value out of the provided `text`, if it's valid.
            #[must_use]
            pub fn new(
                text: impl ::core::convert::Into<::std::string::String>,
            ) -> ::core::option::Option<Self> {
                let text = text.into();
                Self::check(&text).then_some(Self(text))
            }

            /// Unwraps the underlying [`String`].
            #[must_use]
            pub fn into_inner(self) -> ::std::string::String {
                self.0
            }

            /// Checks whether the provided `text` is valid.
            fn check(text: &str) -> bool {
                text.trim() == text
                    && !text.is_empty()
                    && text.chars().count() <= Self::MAX_LEN
            }
        }

        impl ::core::convert::AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        impl ::core::fmt::Display for $name {
            fn fmt(
                &self,
                f: &mut ::core::fmt::Formatter<'_>,
            ) -> ::core::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl ::core::str::FromStr for $name {
            type Err = &'static str;

            fn from_str(s: &str) -> ::core::result::Result<Self, Self::Err> {
                Self::new(s).ok_or(::core::concat!(
                    "invalid `",
                    ::core::stringify!($name),
                    "`",
                ))
            }
        }

        #[cfg(feature = "postgres")]
        impl<'a> $crate::private::postgres_types::FromSql<'a> for $name {
            fn from_sql(
                ty: &$crate::private::postgres_types::Type,
                raw: &'a [u8],
            ) -> Result<
                $name,
                Box<dyn ::std::error::Error
                    + ::core::marker::Sync
                    + ::core::marker::Send>,
            > {
                <::std::string::String as
                    $crate::private::postgres_types::FromSql>::from_sql(
                    ty, raw,
                )
                .map(Self)
            }

            fn accepts(ty: &$crate::private::postgres_types::Type) -> bool {
                <::std::string::String as
                    $crate::private::postgres_types::FromSql>::accepts(ty)
            }
        }

        #[cfg(feature = "postgres")]
        impl $crate::private::postgres_types::ToSql for $name {
            $crate::private::postgres_types::to_sql_checked!();

            fn to_sql(
                &self,
                ty: &$crate::private::postgres_types::Type,
                w: &mut $crate::private::postgres_types::private::BytesMut,
            ) -> Result<
                $crate::private::postgres_types::IsNull,
                ::std::boxed::Box<
                    dyn ::std::error::Error
                        + ::core::marker::Sync
                        + ::core::marker::Send
                >,
            > {
                $crate::private::postgres_types::ToSql::to_sql(
                    &self.0, ty, w,
                )
            }

            fn accepts(ty: &$crate::private::postgres_types::Type) -> bool {
                <::std::string::String as
                    $crate::private::postgres_types::ToSql>::accepts(ty)
            }
        }
    };
}
