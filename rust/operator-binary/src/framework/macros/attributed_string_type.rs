use snafu::Snafu;
use strum::{EnumDiscriminants, IntoStaticStr};

#[derive(Debug, EnumDiscriminants, Snafu)]
#[snafu(visibility(pub))]
#[strum_discriminants(derive(IntoStaticStr))]
pub enum Error {
    #[snafu(display("minimum length not met"))]
    MinimumLengthNotMet { length: usize, min_length: usize },

    #[snafu(display("maximum length exceeded"))]
    LengthExceeded { length: usize, max_length: usize },

    #[snafu(display("not a valid label name as defined in RFC 1035"))]
    InvalidRfc1035LabelName {
        source: stackable_operator::validation::Errors,
    },

    #[snafu(display("not a valid DNS subdomain name as defined in RFC 1123"))]
    InvalidRfc1123DnsSubdomainName {
        source: stackable_operator::validation::Errors,
    },

    #[snafu(display("not a valid label name as defined in RFC 1123"))]
    InvalidRfc1123LabelName {
        source: stackable_operator::validation::Errors,
    },
}

/// Restricted string type with attributes like maximum length.
///
/// Supported attributes are `(min_length = ...)`, `(max_length = ...)`,
/// `is_rfc_1035_label_name`, `is_rfc_1123_label_name` and `is_rfc_1123_dns_subdomain_name`.
/// The resulting `MIN_LENGTH` and `MAX_LENGTH` are constants, so that the lengths of names
/// derived from this type can be checked at compile-time.
///
/// Fully-qualified types are used to ease the import into other modules.
///
/// # Examples
///
/// ```rust
/// # use stackable_postgres_operator::attributed_string_type;
/// attributed_string_type! {
///     ClusterName,
///     "The name of a PostgresCluster",
///     "hippo",
///     (max_length = 30),
///     is_rfc_1035_label_name
/// }
/// ```
#[macro_export(local_inner_macros)]
macro_rules! attributed_string_type {
    ($name:ident, $description:literal, $example:literal $(, $attribute:tt)*) => {
        #[doc = std::concat!($description, ", e.g. \"", $example, "\"")]
        #[derive(Clone, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
        pub struct $name(String);

        impl $name {
            /// The minimum length
            pub const MIN_LENGTH: usize = attributed_string_type!(@min_length $($attribute)*);

            /// The maximum length
            pub const MAX_LENGTH: usize = attributed_string_type!(@max_length $($attribute)*);
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                self.0.fmt(f)
            }
        }

        impl From<$name> for String {
            fn from(value: $name) -> Self {
                value.0
            }
        }

        impl From<&$name> for String {
            fn from(value: &$name) -> Self {
                value.0.clone()
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        impl std::str::FromStr for $name {
            type Err = $crate::framework::macros::attributed_string_type::Error;

            fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
                // ResultExt::context is used on most but not all usages of this macro
                #[allow(unused_imports)]
                use snafu::ResultExt;

                $(attributed_string_type!(@from_str $name, s, $attribute);)*

                Ok(Self(s.to_owned()))
            }
        }

        impl<'de> serde::Deserialize<'de> for $name {
            fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
            where
                D: serde::Deserializer<'de>,
            {
                let string: String = serde::Deserialize::deserialize(deserializer)?;
                <$name as std::str::FromStr>::from_str(&string)
                    .map_err(|err| serde::de::Error::custom(&err))
            }
        }

        impl serde::Serialize for $name {
            fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
            where
                S: serde::Serializer,
            {
                self.0.serialize(serializer)
            }
        }

        #[cfg(test)]
        impl $name {
            #[allow(dead_code)]
            pub fn from_str_unsafe(s: &str) -> Self {
                std::str::FromStr::from_str(s).expect("should be a valid {name}")
            }

            // A dead_code warning is emitted if there is no unit test that calls this function.
            pub fn test_example() {
                Self::from_str_unsafe($example);
            }
        }
    };

    // std::str::FromStr

    (@from_str $name:ident, $s:expr, (min_length = $min_length:expr)) => {
        let length = $s.len();
        snafu::ensure!(
            length >= $name::MIN_LENGTH,
            $crate::framework::macros::attributed_string_type::MinimumLengthNotMetSnafu {
                length,
                min_length: $name::MIN_LENGTH,
            }
        );
    };
    (@from_str $name:ident, $s:expr, (max_length = $max_length:expr)) => {
        let length = $s.len();
        snafu::ensure!(
            length <= $name::MAX_LENGTH,
            $crate::framework::macros::attributed_string_type::LengthExceededSnafu {
                length,
                max_length: $name::MAX_LENGTH,
            }
        );
    };
    (@from_str $name:ident, $s:expr, is_rfc_1035_label_name) => {
        stackable_operator::validation::is_lowercase_rfc_1035_label($s)
            .context($crate::framework::macros::attributed_string_type::InvalidRfc1035LabelNameSnafu)?;
    };
    (@from_str $name:ident, $s:expr, is_rfc_1123_dns_subdomain_name) => {
        stackable_operator::validation::is_lowercase_rfc_1123_subdomain($s)
            .context($crate::framework::macros::attributed_string_type::InvalidRfc1123DnsSubdomainNameSnafu)?;
    };
    (@from_str $name:ident, $s:expr, is_rfc_1123_label_name) => {
        stackable_operator::validation::is_lowercase_rfc_1123_label($s)
            .context($crate::framework::macros::attributed_string_type::InvalidRfc1123LabelNameSnafu)?;
    };

    // MIN_LENGTH

    (@min_length) => {
        // The minimum String length is 0.
        0
    };
    (@min_length (min_length = $min_length:expr) $($attribute:tt)*) => {
        $crate::framework::macros::attributed_string_type::max(
            $min_length,
            attributed_string_type!(@min_length $($attribute)*)
        )
    };
    (@min_length (max_length = $max_length:expr) $($attribute:tt)*) => {
        attributed_string_type!(@min_length $($attribute)*)
    };
    (@min_length $validation:ident $($attribute:tt)*) => {
        // All DNS names must contain at least one character.
        $crate::framework::macros::attributed_string_type::max(
            1,
            attributed_string_type!(@min_length $($attribute)*)
        )
    };

    // MAX_LENGTH

    (@max_length) => {
        // If there is no other max_length defined, then the upper bound is usize::MAX.
        usize::MAX
    };
    (@max_length (min_length = $min_length:expr) $($attribute:tt)*) => {
        attributed_string_type!(@max_length $($attribute)*)
    };
    (@max_length (max_length = $max_length:expr) $($attribute:tt)*) => {
        $crate::framework::macros::attributed_string_type::min(
            $max_length,
            attributed_string_type!(@max_length $($attribute)*)
        )
    };
    (@max_length is_rfc_1035_label_name $($attribute:tt)*) => {
        $crate::framework::macros::attributed_string_type::min(
            stackable_operator::validation::RFC_1035_LABEL_MAX_LENGTH,
            attributed_string_type!(@max_length $($attribute)*)
        )
    };
    (@max_length is_rfc_1123_dns_subdomain_name $($attribute:tt)*) => {
        $crate::framework::macros::attributed_string_type::min(
            stackable_operator::validation::RFC_1123_SUBDOMAIN_MAX_LENGTH,
            attributed_string_type!(@max_length $($attribute)*)
        )
    };
    (@max_length is_rfc_1123_label_name $($attribute:tt)*) => {
        $crate::framework::macros::attributed_string_type::min(
            stackable_operator::validation::RFC_1123_LABEL_MAX_LENGTH,
            attributed_string_type!(@max_length $($attribute)*)
        )
    };
}

/// Returns the minimum of the given values.
///
/// As opposed to [`std::cmp::min`], this function can be used at compile-time.
pub const fn min(x: usize, y: usize) -> usize {
    if x < y { x } else { y }
}

/// Returns the maximum of the given values.
///
/// As opposed to [`std::cmp::max`], this function can be used at compile-time.
pub const fn max(x: usize, y: usize) -> usize {
    if x < y { y } else { x }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use serde_json::Value;

    use super::{ErrorDiscriminants, max, min};

    attributed_string_type! {
        UnrestrictedTest,
        "test without attributes",
        ""
    }

    #[test]
    fn test_attributed_string_type_without_attributes() {
        type T = UnrestrictedTest;

        T::test_example();
        assert_eq!(0, T::MIN_LENGTH);
        assert_eq!(usize::MAX, T::MAX_LENGTH);
        assert_eq!("any String!", T::from_str_unsafe("any String!").to_string());
    }

    attributed_string_type! {
        LengthTest,
        "length test",
        "test",
        (min_length = 2),
        (max_length = 8),
        is_rfc_1123_label_name // should be overruled by min_length and max_length
    }

    #[test]
    fn test_attributed_string_type_length() {
        type T = LengthTest;

        T::test_example();
        assert_eq!(2, T::MIN_LENGTH);
        assert_eq!(8, T::MAX_LENGTH);
        assert_eq!(
            Err(ErrorDiscriminants::MinimumLengthNotMet),
            T::from_str("a").map_err(ErrorDiscriminants::from)
        );
        assert_eq!(
            Err(ErrorDiscriminants::LengthExceeded),
            T::from_str("test-12345").map_err(ErrorDiscriminants::from)
        );
    }

    attributed_string_type! {
        IsRfc1035LabelNameTest,
        "is_rfc_1035_label_name test",
        "a-b",
        is_rfc_1035_label_name
    }

    #[test]
    fn test_attributed_string_type_is_rfc_1035_label_name() {
        type T = IsRfc1035LabelNameTest;

        T::test_example();
        assert_eq!(1, T::MIN_LENGTH);
        assert_eq!(63, T::MAX_LENGTH);
        // RFC 1035 labels must start with a letter.
        assert_eq!(
            Err(ErrorDiscriminants::InvalidRfc1035LabelName),
            T::from_str("1-a").map_err(ErrorDiscriminants::from)
        );
        assert_eq!(
            Err(ErrorDiscriminants::InvalidRfc1035LabelName),
            T::from_str("A").map_err(ErrorDiscriminants::from)
        );
    }

    attributed_string_type! {
        IsRfc1123LabelNameTest,
        "is_rfc_1123_label_name test",
        "1-a",
        is_rfc_1123_label_name
    }

    #[test]
    fn test_attributed_string_type_is_rfc_1123_label_name() {
        type T = IsRfc1123LabelNameTest;

        T::test_example();
        assert_eq!(63, T::MAX_LENGTH);
        assert_eq!(
            Err(ErrorDiscriminants::InvalidRfc1123LabelName),
            T::from_str("a.b").map_err(ErrorDiscriminants::from)
        );
        assert_eq!(
            Err(ErrorDiscriminants::InvalidRfc1123LabelName),
            T::from_str("a-").map_err(ErrorDiscriminants::from)
        );
    }

    attributed_string_type! {
        IsRfc1123DnsSubdomainNameTest,
        "is_rfc_1123_dns_subdomain_name test",
        "a-b.c",
        is_rfc_1123_dns_subdomain_name
    }

    #[test]
    fn test_attributed_string_type_is_rfc_1123_dns_subdomain_name() {
        type T = IsRfc1123DnsSubdomainNameTest;

        T::test_example();
        assert_eq!(253, T::MAX_LENGTH);
        assert_eq!(
            Err(ErrorDiscriminants::InvalidRfc1123DnsSubdomainName),
            T::from_str("A").map_err(ErrorDiscriminants::from)
        );
    }

    attributed_string_type! {
        SerdeTest,
        "serde test",
        "test",
        (max_length = 4),
        is_rfc_1035_label_name
    }

    #[test]
    fn test_attributed_string_type_serde() {
        type T = SerdeTest;

        T::test_example();
        assert_eq!(
            "\"test\"".to_owned(),
            serde_json::to_string(&T::from_str_unsafe("test")).expect("should be serializable")
        );
        assert_eq!(
            T::from_str_unsafe("test"),
            serde_json::from_value(Value::String("test".to_owned()))
                .expect("should be deserializable")
        );
        assert_eq!(
            Err("maximum length exceeded".to_owned()),
            serde_json::from_value::<T>(Value::String("testt".to_owned()))
                .map_err(|err| err.to_string())
        );
        assert_eq!(
            Err("not a valid label name as defined in RFC 1035".to_owned()),
            serde_json::from_value::<T>(Value::String("-tst".to_owned()))
                .map_err(|err| err.to_string())
        );
        assert_eq!(
            Err("invalid type: null, expected a string".to_owned()),
            serde_json::from_value::<T>(Value::Null).map_err(|err| err.to_string())
        );
    }

    #[test]
    fn test_attributed_string_type_string_from() {
        type T = SerdeTest;

        assert_eq!("test", String::from(T::from_str_unsafe("test")));
        assert_eq!("test", String::from(&T::from_str_unsafe("test")));
        assert_eq!("test", T::from_str_unsafe("test").as_ref());
    }

    #[test]
    fn test_const_min_max() {
        assert_eq!(2, min(2, 3));
        assert_eq!(4, min(5, 4));
        assert_eq!(3, max(2, 3));
        assert_eq!(5, max(5, 4));
    }
}
