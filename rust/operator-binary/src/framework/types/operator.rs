//! Names for PostgresClusters and their instances

use crate::{attributed_string_type, naming::RANDOM_SUFFIX_LENGTH};

attributed_string_type! {
    ClusterName,
    "The name of a PostgresCluster",
    "hippo",
    // Suffixes are added to produce resource names. According compile-time checks ensure that
    // max_length cannot be set higher.
    (max_length = 30),
    // The name must start with a letter because it is also the first part of Service names.
    is_rfc_1035_label_name
}

attributed_string_type! {
    InstanceSetName,
    "The name of an instance set of a PostgresCluster",
    "instance1",
    // The instance set name is part of the instance names. Compile-time checks ensure that
    // max_length cannot be set higher if not the ClusterName is set lower accordingly.
    (max_length = 20),
    is_rfc_1123_label_name
}

attributed_string_type! {
    InstanceName,
    "The name of an instance of a PostgresCluster",
    "hippo-instance1-x7k2",
    // `<cluster_name>-<instance_set_name>-<random_suffix>`
    (max_length = ClusterName::MAX_LENGTH
        + 1 // dash
        + InstanceSetName::MAX_LENGTH
        + 1 // dash
        + RANDOM_SUFFIX_LENGTH),
    is_rfc_1123_label_name
}
