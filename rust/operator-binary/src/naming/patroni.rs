//! Naming contract with Patroni
//!
//! Patroni keeps the state of its distributed configuration store (DCS) in Kubernetes objects.
//! It is only told its "scope" and derives the object names itself, see the Patroni settings
//! `config_path`, `leader_path` and `failover_path`. The suffixes below must therefore match
//! Patroni exactly. A mismatch is not reported by either side; the operator would just look at
//! objects that do not exist.
//!
//! The same constants configure Patroni (see [`PatroniNames::environment_variables`]) and
//! predict the names of the objects it creates.

use std::collections::BTreeMap;

use strum::{EnumIter, IntoEnumIterator};

use super::suffixed_name;
use crate::framework::{
    MAX_DNS_LABEL_LENGTH,
    macros::attributed_string_type::max,
    types::{
        kubernetes::{NamespaceName, ObjectKey, ObjectName},
        operator::ClusterName,
    },
};

/// Appended to the cluster name to form the scope
pub const SCOPE_SUFFIX: &str = "ha";

/// Appended to the scope to form the name of the DCS configuration object
pub const CONFIG_PATH_SUFFIX: &str = "config";

/// Appended to the scope to form the name of the leader ConfigMap
///
/// If Patroni uses Endpoints, the leader object is named after the scope itself.
pub const LEADER_PATH_SUFFIX: &str = "leader";

/// Appended to the scope to form the name of the object which triggers a controlled failover
pub const FAILOVER_PATH_SUFFIX: &str = "failover";

const ENV_SCOPE: &str = "PATRONI_SCOPE";
const ENV_KUBERNETES_NAMESPACE: &str = "PATRONI_KUBERNETES_NAMESPACE";
const ENV_KUBERNETES_USE_ENDPOINTS: &str = "PATRONI_KUBERNETES_USE_ENDPOINTS";

/// Kind of the Kubernetes objects in which Patroni stores its state
#[derive(Clone, Copy, Debug, Default, EnumIter, Eq, PartialEq)]
pub enum DcsKind {
    ConfigMaps,

    #[default]
    Endpoints,
}

/// Names of the objects Patroni creates for a cluster
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PatroniNames {
    namespace: NamespaceName,
    scope: ObjectName,
}

impl PatroniNames {
    // used at compile-time
    const MAX_SCOPE_LENGTH: usize = ClusterName::MAX_LENGTH + 1 /* dash */ + SCOPE_SUFFIX.len();

    pub fn new(cluster: &ObjectKey<ClusterName>) -> Self {
        // Compile-time check
        const _: () = assert!(
            PatroniNames::MAX_SCOPE_LENGTH
                + 1 // dash
                + max(
                    CONFIG_PATH_SUFFIX.len(),
                    max(LEADER_PATH_SUFFIX.len(), FAILOVER_PATH_SUFFIX.len())
                )
                <= MAX_DNS_LABEL_LENGTH,
            "The names `<cluster_name>-ha-<suffix>` must not exceed 63 characters."
        );

        PatroniNames {
            namespace: cluster.namespace.clone(),
            scope: suffixed_name(&cluster.name, SCOPE_SUFFIX),
        }
    }

    /// The scope Patroni uses for the cluster
    pub fn scope(&self) -> &ObjectName {
        &self.scope
    }

    fn object_key(&self, name: ObjectName) -> ObjectKey {
        ObjectKey::new(self.namespace.clone(), name)
    }

    /// The ConfigMap or Endpoints holding the distributed configuration
    ///
    /// Both kinds use the same name.
    pub fn distributed_configuration(&self) -> ObjectKey {
        self.object_key(suffixed_name(&self.scope, CONFIG_PATH_SUFFIX))
    }

    /// The ConfigMap used for the leader election if Patroni stores its state in ConfigMaps
    pub fn leader_config_map(&self) -> ObjectKey {
        self.object_key(suffixed_name(&self.scope, LEADER_PATH_SUFFIX))
    }

    /// The Endpoints used for the leader election if Patroni stores its state in Endpoints
    pub fn leader_endpoints(&self) -> ObjectKey {
        self.object_key(self.scope.clone())
    }

    pub fn leader(&self, dcs_kind: DcsKind) -> ObjectKey {
        match dcs_kind {
            DcsKind::ConfigMaps => self.leader_config_map(),
            DcsKind::Endpoints => self.leader_endpoints(),
        }
    }

    /// The ConfigMap or Endpoints used to initiate a controlled change of the leader
    pub fn trigger(&self) -> ObjectKey {
        self.object_key(suffixed_name(&self.scope, FAILOVER_PATH_SUFFIX))
    }

    pub fn object_keys(&self, dcs_kind: DcsKind) -> Vec<ObjectKey> {
        vec![
            self.distributed_configuration(),
            self.leader(dcs_kind),
            self.trigger(),
        ]
    }

    /// The names of the objects for all storage kinds, e.g. to clean up after the kind changed
    pub fn all_object_keys(&self) -> Vec<ObjectKey> {
        let mut object_keys: Vec<ObjectKey> =
            DcsKind::iter().flat_map(|dcs_kind| self.object_keys(dcs_kind)).collect();
        object_keys.sort();
        object_keys.dedup();
        object_keys
    }

    /// Environment variables which make Patroni use the names above
    pub fn environment_variables(&self, dcs_kind: DcsKind) -> BTreeMap<String, String> {
        [
            (ENV_SCOPE, self.scope.to_string()),
            (ENV_KUBERNETES_NAMESPACE, self.namespace.to_string()),
            (
                ENV_KUBERNETES_USE_ENDPOINTS,
                (dcs_kind == DcsKind::Endpoints).to_string(),
            ),
        ]
        .map(|(name, value)| (name.to_owned(), value))
        .into()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::{DcsKind, PatroniNames};
    use crate::framework::{
        MAX_DNS_LABEL_LENGTH,
        types::{
            kubernetes::{NamespaceName, ObjectKey, ObjectName},
            operator::ClusterName,
        },
    };

    fn patroni_names(namespace: &str, name: &str) -> PatroniNames {
        PatroniNames::new(&ObjectKey::new(
            NamespaceName::from_str_unsafe(namespace),
            ClusterName::from_str_unsafe(name),
        ))
    }

    fn object_key(namespace: &str, name: &str) -> ObjectKey {
        ObjectKey::new(
            NamespaceName::from_str_unsafe(namespace),
            ObjectName::from_str_unsafe(name),
        )
    }

    #[test]
    fn test_patroni_names() {
        let names = patroni_names("pgo", "hippo");

        assert_eq!("hippo-ha", names.scope().to_string());
        assert_eq!(
            object_key("pgo", "hippo-ha-config"),
            names.distributed_configuration()
        );
        assert_eq!(object_key("pgo", "hippo-ha-leader"), names.leader_config_map());
        // The leader Endpoints have no suffix.
        assert_eq!(object_key("pgo", "hippo-ha"), names.leader_endpoints());
        assert_eq!(object_key("pgo", "hippo-ha-failover"), names.trigger());
    }

    #[test]
    fn test_leader() {
        let names = patroni_names("pgo", "hippo");

        assert_eq!(names.leader_config_map(), names.leader(DcsKind::ConfigMaps));
        assert_eq!(names.leader_endpoints(), names.leader(DcsKind::Endpoints));
        assert_eq!(names.leader_endpoints(), names.leader(DcsKind::default()));
    }

    #[test]
    fn test_patroni_names_are_deterministic() {
        assert_eq!(patroni_names("pgo", "hippo"), patroni_names("pgo", "hippo"));
        assert_eq!(
            patroni_names("pgo", "hippo").all_object_keys(),
            patroni_names("pgo", "hippo").all_object_keys()
        );
        assert!(
            patroni_names("other", "hippo")
                .all_object_keys()
                .iter()
                .all(|object_key| object_key.namespace.to_string() == "other")
        );
    }

    #[test]
    fn test_all_object_keys() {
        assert_eq!(
            vec![
                object_key("pgo", "hippo-ha"),
                object_key("pgo", "hippo-ha-config"),
                object_key("pgo", "hippo-ha-failover"),
                object_key("pgo", "hippo-ha-leader"),
            ],
            patroni_names("pgo", "hippo").all_object_keys()
        );
    }

    #[test]
    fn test_maximum_length() {
        let names = patroni_names("pgo", &"a".repeat(ClusterName::MAX_LENGTH));

        assert!(
            names
                .all_object_keys()
                .iter()
                .all(|object_key| object_key.name.as_ref().len() <= MAX_DNS_LABEL_LENGTH)
        );
    }

    #[test]
    fn test_environment_variables() {
        let names = patroni_names("pgo", "hippo");

        let expected: BTreeMap<String, String> = [
            ("PATRONI_KUBERNETES_NAMESPACE", "pgo"),
            ("PATRONI_KUBERNETES_USE_ENDPOINTS", "true"),
            ("PATRONI_SCOPE", "hippo-ha"),
        ]
        .map(|(k, v)| (k.to_owned(), v.to_owned()))
        .into();
        assert_eq!(expected, names.environment_variables(DcsKind::Endpoints));

        assert_eq!(
            Some(&"false".to_owned()),
            names
                .environment_variables(DcsKind::ConfigMaps)
                .get("PATRONI_KUBERNETES_USE_ENDPOINTS")
        );
    }
}
