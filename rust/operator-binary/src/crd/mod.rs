use serde::{Deserialize, Serialize};
use stackable_operator::{
    kube::CustomResource,
    schemars::{self, JsonSchema},
    versioned::versioned,
};

#[versioned(version(name = "v1alpha1"))]
pub mod versioned {

    /// A PostgreSQL cluster with one or more sets of instances that replicate data from the
    /// primary instance. Patroni elects the primary instance and coordinates failovers.
    #[derive(Clone, CustomResource, Debug, Deserialize, JsonSchema, PartialEq, Serialize)]
    #[versioned(k8s(
        group = "postgres-operator.stackable.tech",
        kind = "PostgresCluster",
        plural = "postgresclusters",
        shortname = "postgres",
        namespaced,
        crates(
            kube_core = "stackable_operator::kube::core",
            k8s_openapi = "stackable_operator::k8s_openapi",
            schemars = "stackable_operator::schemars"
        )
    ))]
    #[serde(rename_all = "camelCase")]
    pub struct PostgresClusterSpec {
        /// Sets of PostgreSQL instances. The name of a set is part of the names of its instances,
        /// so it must be a valid DNS label with at most 20 characters.
        pub instances: Vec<PostgresInstanceSetSpec>,
    }

    #[derive(Clone, Debug, Deserialize, JsonSchema, PartialEq, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct PostgresInstanceSetSpec {
        /// The name of the instance set, e.g. `instance1`
        pub name: String,

        /// The number of instances in this set; defaults to 1
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub replicas: Option<u16>,
    }
}
