//! Kubernetes (resource) names and keys
use std::{fmt::Display, str::FromStr};

use snafu::{OptionExt, ResultExt, Snafu};
use stackable_operator::{
    k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta,
    kube::runtime::reflector::{Lookup, ObjectRef},
};
use strum::{EnumDiscriminants, IntoStaticStr};

use crate::attributed_string_type;

attributed_string_type! {
    NamespaceName,
    "The name of a Namespace",
    "pgo",
    is_rfc_1123_label_name
}

attributed_string_type! {
    ObjectName,
    "The name of a namespaced object which is also usable as a DNS label, e.g. the name of a \
    ConfigMap, Service, Secret or Endpoints",
    "hippo-config",
    is_rfc_1123_label_name
}

attributed_string_type! {
    ContainerName,
    "The name of a container in a Pod",
    "database",
    is_rfc_1123_label_name
}

attributed_string_type! {
    PortName,
    "The name of a container or Service port",
    "postgres",
    // see https://github.com/kubernetes/kubernetes/blob/v1.34.1/staging/src/k8s.io/apimachinery/pkg/util/validation/validation.go#L318-L339
    (max_length = 15),
    is_rfc_1123_label_name
}

#[derive(Snafu, Debug, EnumDiscriminants)]
#[strum_discriminants(derive(IntoStaticStr))]
pub enum Error {
    #[snafu(display("object has no name"))]
    GetName {},

    #[snafu(display("object has no namespace"))]
    GetNamespace {},

    #[snafu(display("failed to parse the object name"))]
    ParseName {
        source: crate::framework::macros::attributed_string_type::Error,
    },

    #[snafu(display("failed to parse the namespace"))]
    ParseNamespace {
        source: crate::framework::macros::attributed_string_type::Error,
    },
}

type Result<T, E = Error> = std::result::Result<T, E>;

/// Namespace and name of an object
///
/// Suitable to look up an object in the Kubernetes API or to create it. The name type restricts
/// which names the key can hold, e.g. `ObjectKey<ClusterName>` identifies a PostgresCluster.
#[derive(Clone, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct ObjectKey<N = ObjectName> {
    pub namespace: NamespaceName,
    pub name: N,
}

impl<N> ObjectKey<N> {
    pub fn new(namespace: NamespaceName, name: N) -> Self {
        ObjectKey { namespace, name }
    }
}

impl<N> ObjectKey<N>
where
    N: FromStr<Err = crate::framework::macros::attributed_string_type::Error>,
{
    /// Key of the given object
    ///
    /// Fails if the object has no namespace or name, or if they are not valid for this key.
    pub fn from_resource(resource: &impl Lookup) -> Result<Self> {
        let raw_namespace = resource.namespace().context(GetNamespaceSnafu)?;
        let raw_name = resource.name().context(GetNameSnafu)?;

        Ok(ObjectKey {
            namespace: NamespaceName::from_str(&raw_namespace).context(ParseNamespaceSnafu)?,
            name: N::from_str(&raw_name).context(ParseNameSnafu)?,
        })
    }
}

impl<N: AsRef<str>> ObjectKey<N> {
    /// Metadata with only the namespace and name set, as needed to create the object
    pub fn to_object_meta(&self) -> ObjectMeta {
        ObjectMeta {
            namespace: Some(self.namespace.to_string()),
            name: Some(self.name.as_ref().to_owned()),
            ..ObjectMeta::default()
        }
    }

    /// Reference to look up the object of kind `K`, e.g. in a reflector store
    pub fn to_object_ref<K>(&self) -> ObjectRef<K>
    where
        K: Lookup,
        K::DynamicType: Default,
    {
        ObjectRef::new(self.name.as_ref()).within(self.namespace.as_ref())
    }
}

impl<N: Display> Display for ObjectKey<N> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.namespace, self.name)
    }
}
