/// Use [`std::sync::LazyLock`] to define a static "constant" from a string.
///
/// The string is converted into the given type with [`std::str::FromStr::from_str`].
///
/// # Examples
///
/// ```rust
/// # use stackable_postgres_operator::{
/// #     constant,
/// #     framework::types::kubernetes::{ContainerName, PortName},
/// # };
/// constant!(DATABASE_CONTAINER_NAME: ContainerName = "database");
/// constant!(pub POSTGRES_PORT_NAME: PortName = "postgres");
/// ```
#[macro_export(local_inner_macros)]
macro_rules! constant {
    ($qualifier:vis $name:ident: $type:ident = $value:literal) => {
        $qualifier static $name: std::sync::LazyLock<$type> = std::sync::LazyLock::new(|| {
            <$type as std::str::FromStr>::from_str($value)
                .expect(std::concat!("should be a valid ", std::stringify!($type)))
        });
    };
}
