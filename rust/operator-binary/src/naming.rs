//! Names of the Kubernetes objects which make up a PostgresCluster
//!
//! All objects of a cluster live in the namespace of the cluster. Their names are derived from
//! the cluster name by appending hyphen-separated suffixes, so that every name is a single DNS
//! label. Except for instance names, every name is a pure function of its input, so that
//! repeated reconciliations find the same objects again.
//!
//! The lengths of the input names are restricted when they are parsed. Compile-time checks
//! ensure that no derived name exceeds [`MAX_DNS_LABEL_LENGTH`].

use std::str::FromStr;

use rand::Rng;
use strum::{EnumIter, IntoEnumIterator};

use crate::{
    constant,
    framework::{
        MAX_DNS_LABEL_LENGTH,
        macros::attributed_string_type::max,
        types::{
            kubernetes::{ContainerName, ObjectKey, ObjectName, PortName},
            operator::{ClusterName, InstanceName, InstanceSetName},
        },
    },
};

pub mod patroni;

constant!(pub DATABASE_CONTAINER_NAME: ContainerName = "database");
pub use self::DATABASE_CONTAINER_NAME as POSTGRESQL_CONTAINER_NAME;

constant!(pub POSTGRESQL_PORT_NAME: PortName = "postgres");

/// Length of the random suffix of instance names
pub const RANDOM_SUFFIX_LENGTH: usize = 4;

const RANDOM_SUFFIX_ALPHABET: &[u8] = b"abcdefghijklmnopqrstuvwxyz0123456789";

/// Objects which exist once per cluster
#[derive(Clone, Copy, Debug, EnumIter, Eq, PartialEq)]
pub enum ClusterResource {
    /// ConfigMap shared by all instances
    ConfigMap,

    /// Service responsible for the network identity of the Pods
    PodService,

    /// Service which exposes the PostgreSQL primary instance
    PrimaryService,
}

impl ClusterResource {
    // used at compile-time
    const MAX_SUFFIX_LENGTH: usize = max(
        ClusterResource::ConfigMap.suffix().len(),
        max(
            ClusterResource::PodService.suffix().len(),
            ClusterResource::PrimaryService.suffix().len(),
        ),
    );

    pub const fn suffix(self) -> &'static str {
        match self {
            ClusterResource::ConfigMap => "config",
            // The hyphen before the suffix ensures that the DNS name will not be interpreted as
            // a top-level domain. Partially qualified requests for "{pod}.{cluster}-pods" should
            // not leave the Kubernetes cluster, and if they do they are less likely to resolve.
            ClusterResource::PodService => "pods",
            ClusterResource::PrimaryService => "primary",
        }
    }
}

/// Objects which exist once per instance
#[derive(Clone, Copy, Debug, EnumIter, Eq, PartialEq)]
pub enum InstanceResource {
    /// ConfigMap shared by the containers of the instance
    ConfigMap,

    /// Secret containing the certificates of the instance
    Certificates,
}

impl InstanceResource {
    // used at compile-time
    const MAX_SUFFIX_LENGTH: usize = max(
        InstanceResource::ConfigMap.suffix().len(),
        InstanceResource::Certificates.suffix().len(),
    );

    pub const fn suffix(self) -> &'static str {
        match self {
            InstanceResource::ConfigMap => "config",
            InstanceResource::Certificates => "certs",
        }
    }
}

/// Joins the given name and suffix with a hyphen.
///
/// The callers must ensure at compile-time that the result fits into a DNS label.
fn suffixed_name(name: &impl AsRef<str>, suffix: &str) -> ObjectName {
    let name = name.as_ref();
    ObjectName::from_str(&format!("{name}-{suffix}")).expect(
        "should be a valid object name because the name and the suffix are valid DNS labels \
        and the length is checked at compile-time",
    )
}

/// Draws a random suffix for instance names.
///
/// The suffix consists of [`RANDOM_SUFFIX_LENGTH`] lowercase alphanumeric characters. It is
/// independent of previous calls, so it can collide with an existing name.
pub fn random_suffix<R: Rng>(rng: &mut R) -> String {
    (0..RANDOM_SUFFIX_LENGTH)
        .map(|_| {
            let index = rng.random_range(0..RANDOM_SUFFIX_ALPHABET.len());
            char::from(RANDOM_SUFFIX_ALPHABET[index])
        })
        .collect()
}

/// Names of the objects which exist once per cluster
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ClusterResourceNames {
    pub cluster: ObjectKey<ClusterName>,
}

impl ClusterResourceNames {
    pub fn new(cluster: ObjectKey<ClusterName>) -> Self {
        ClusterResourceNames { cluster }
    }

    pub fn object_key(&self, resource: ClusterResource) -> ObjectKey {
        // Compile-time check
        const _: () = assert!(
            ClusterName::MAX_LENGTH + 1 /* dash */ + ClusterResource::MAX_SUFFIX_LENGTH
                <= MAX_DNS_LABEL_LENGTH,
            "The names `<cluster_name>-<suffix>` must not exceed 63 characters."
        );

        ObjectKey::new(
            self.cluster.namespace.clone(),
            suffixed_name(&self.cluster.name, resource.suffix()),
        )
    }

    /// The ConfigMap shared by all instances
    pub fn config_map(&self) -> ObjectKey {
        self.object_key(ClusterResource::ConfigMap)
    }

    /// The Service that is responsible for the network identity of the Pods
    pub fn pod_service(&self) -> ObjectKey {
        self.object_key(ClusterResource::PodService)
    }

    /// The Service that exposes the PostgreSQL primary instance
    pub fn primary_service(&self) -> ObjectKey {
        self.object_key(ClusterResource::PrimaryService)
    }

    /// Generates a random name for a new instance of the given instance set.
    ///
    /// The name is not guaranteed to be unique. If the creation of the instance fails because
    /// the name is already taken, then a new name must be generated.
    pub fn generate_instance<R: Rng>(
        &self,
        rng: &mut R,
        instance_set: &InstanceSetName,
    ) -> ObjectKey<InstanceName> {
        // Compile-time check
        const _: () = assert!(
            ClusterName::MAX_LENGTH
                + 1 // dash
                + InstanceSetName::MAX_LENGTH
                + 1 // dash
                + RANDOM_SUFFIX_LENGTH
                <= InstanceName::MAX_LENGTH,
            "The instance name `<cluster_name>-<instance_set_name>-<suffix>` must be a valid InstanceName."
        );

        let name = format!(
            "{cluster_name}-{instance_set}-{suffix}",
            cluster_name = self.cluster.name,
            suffix = random_suffix(rng)
        );
        let instance = ObjectKey::new(
            self.cluster.namespace.clone(),
            InstanceName::from_str(&name).expect(
                "should be a valid instance name because all parts are valid DNS labels and the \
                length is checked at compile-time",
            ),
        );

        tracing::debug!(%instance, "Generated instance name");

        instance
    }

    /// The names of the objects Patroni maintains for this cluster
    pub fn patroni(&self) -> patroni::PatroniNames {
        patroni::PatroniNames::new(&self.cluster)
    }

    /// All deterministic object keys of this cluster, including the Patroni objects for the
    /// given storage kind
    ///
    /// Useful to grant permissions or to clean up the objects of a deleted cluster.
    pub fn object_keys(&self, dcs_kind: patroni::DcsKind) -> Vec<ObjectKey> {
        ClusterResource::iter()
            .map(|resource| self.object_key(resource))
            .chain(self.patroni().object_keys(dcs_kind))
            .collect()
    }
}

/// Names of the objects which exist once per instance
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct InstanceResourceNames {
    pub instance: ObjectKey<InstanceName>,
}

impl InstanceResourceNames {
    pub fn new(instance: ObjectKey<InstanceName>) -> Self {
        InstanceResourceNames { instance }
    }

    pub fn object_key(&self, resource: InstanceResource) -> ObjectKey {
        // Compile-time check
        const _: () = assert!(
            InstanceName::MAX_LENGTH + 1 /* dash */ + InstanceResource::MAX_SUFFIX_LENGTH
                <= MAX_DNS_LABEL_LENGTH,
            "The names `<instance_name>-<suffix>` must not exceed 63 characters."
        );

        ObjectKey::new(
            self.instance.namespace.clone(),
            suffixed_name(&self.instance.name, resource.suffix()),
        )
    }

    /// The ConfigMap of the instance
    pub fn config_map(&self) -> ObjectKey {
        self.object_key(InstanceResource::ConfigMap)
    }

    /// The Secret containing the certificates of the instance
    pub fn certificates(&self) -> ObjectKey {
        self.object_key(InstanceResource::Certificates)
    }
}
