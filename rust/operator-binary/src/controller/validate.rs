//! The validate step in the PostgresCluster controller

use std::{collections::BTreeMap, str::FromStr};

use snafu::{ResultExt, Snafu, ensure};
use strum::{EnumDiscriminants, IntoStaticStr};

use crate::{
    crd::v1alpha1,
    framework::types::{
        kubernetes::ObjectKey,
        operator::{ClusterName, InstanceSetName},
    },
};

#[derive(Snafu, Debug, EnumDiscriminants)]
#[strum_discriminants(derive(IntoStaticStr))]
pub enum Error {
    #[snafu(display("failed to get the cluster namespace and name"))]
    GetClusterKey {
        source: crate::framework::types::kubernetes::Error,
    },

    #[snafu(display("failed to set the instance set name"))]
    ParseInstanceSetName {
        source: crate::framework::macros::attributed_string_type::Error,
    },

    #[snafu(display("the instance set name {instance_set_name:?} is used more than once"))]
    DuplicateInstanceSetName { instance_set_name: String },
}

type Result<T, E = Error> = std::result::Result<T, E>;

/// Validated cluster identity and instance sets
///
/// All names of the objects of the cluster can be derived from these values without further
/// checks.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ValidatedCluster {
    pub cluster: ObjectKey<ClusterName>,
    /// Instance set names with their number of replicas
    pub instance_sets: BTreeMap<InstanceSetName, u16>,
}

/// Validates the [`v1alpha1::PostgresCluster`] and returns a [`ValidatedCluster`]
///
/// Names which are too long to derive valid object names from are rejected here.
pub fn validate(cluster: &v1alpha1::PostgresCluster) -> Result<ValidatedCluster> {
    let cluster_key =
        ObjectKey::<ClusterName>::from_resource(cluster).context(GetClusterKeySnafu)?;

    let mut instance_sets = BTreeMap::new();
    for instance_set in &cluster.spec.instances {
        let instance_set_name =
            InstanceSetName::from_str(&instance_set.name).context(ParseInstanceSetNameSnafu)?;

        ensure!(
            !instance_sets.contains_key(&instance_set_name),
            DuplicateInstanceSetNameSnafu {
                instance_set_name: instance_set.name.clone()
            }
        );

        // Kubernetes defaults to 1 if not set
        instance_sets.insert(instance_set_name, instance_set.replicas.unwrap_or(1));
    }

    Ok(ValidatedCluster {
        cluster: cluster_key,
        instance_sets,
    })
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::{ErrorDiscriminants, ValidatedCluster, validate};
    use crate::{
        crd::v1alpha1,
        framework::types::{
            kubernetes::{NamespaceName, ObjectKey},
            operator::{ClusterName, InstanceSetName},
        },
    };

    fn cluster(name: &str, instance_set_names: &[&str]) -> v1alpha1::PostgresCluster {
        serde_json::from_value(serde_json::json!({
            "apiVersion": "postgres-operator.stackable.tech/v1alpha1",
            "kind": "PostgresCluster",
            "metadata": {
                "name": name,
                "namespace": "pgo"
            },
            "spec": {
                "instances": instance_set_names
                    .iter()
                    .map(|name| serde_json::json!({ "name": name }))
                    .collect::<Vec<_>>()
            }
        }))
        .expect("should be a valid PostgresCluster")
    }

    #[test]
    fn test_validate_ok() {
        assert_eq!(
            ValidatedCluster {
                cluster: ObjectKey::new(
                    NamespaceName::from_str_unsafe("pgo"),
                    ClusterName::from_str_unsafe("hippo")
                ),
                instance_sets: BTreeMap::from([
                    (InstanceSetName::from_str_unsafe("instance1"), 1),
                    (InstanceSetName::from_str_unsafe("instance2"), 1),
                ]),
            },
            validate(&cluster("hippo", &["instance1", "instance2"])).expect("should be valid")
        );
    }

    #[test]
    fn test_validate_err_cluster_name_too_long() {
        assert_eq!(
            Err(ErrorDiscriminants::GetClusterKey),
            validate(&cluster(&"a".repeat(31), &["instance1"]))
                .map_err(ErrorDiscriminants::from)
        );
    }

    #[test]
    fn test_validate_err_instance_set_name_invalid() {
        assert_eq!(
            Err(ErrorDiscriminants::ParseInstanceSetName),
            validate(&cluster("hippo", &["instance.1"])).map_err(ErrorDiscriminants::from)
        );
        assert_eq!(
            Err(ErrorDiscriminants::ParseInstanceSetName),
            validate(&cluster("hippo", &["a".repeat(21).as_str()]))
                .map_err(ErrorDiscriminants::from)
        );
    }

    #[test]
    fn test_validate_err_duplicate_instance_set_name() {
        assert_eq!(
            Err(ErrorDiscriminants::DuplicateInstanceSetName),
            validate(&cluster("hippo", &["instance1", "instance1"]))
                .map_err(ErrorDiscriminants::from)
        );
    }
}
