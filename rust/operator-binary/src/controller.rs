//! The PostgresCluster controller
//!
//! Creating the objects is not implemented yet. The controller validates the cluster and derives
//! the keys of the objects which make up the cluster.

use std::sync::Arc;

use snafu::{ResultExt, Snafu};
use stackable_operator::{
    kube::{
        core::{DeserializeGuard, error_boundary},
        runtime::controller::Action,
    },
    logging::controller::ReconcilerError,
};
use strum::{EnumDiscriminants, IntoStaticStr};

use crate::{
    crd::v1alpha1,
    naming::{ClusterResourceNames, patroni::DcsKind},
};

pub mod validate;

pub const OPERATOR_NAME: &str = "postgres.stackable.tech";
pub const CONTROLLER_NAME: &str = "postgrescluster";

pub struct Context {
    pub full_controller_name: String,
}

impl Default for Context {
    fn default() -> Self {
        Context {
            full_controller_name: format!("{CONTROLLER_NAME}.{OPERATOR_NAME}"),
        }
    }
}

#[derive(Snafu, Debug, EnumDiscriminants)]
#[strum_discriminants(derive(IntoStaticStr))]
pub enum Error {
    #[snafu(display("PostgresCluster object is invalid"))]
    InvalidPostgresCluster {
        source: error_boundary::InvalidObject,
    },

    #[snafu(display("failed to validate cluster"))]
    ValidateCluster { source: validate::Error },
}

type Result<T, E = Error> = std::result::Result<T, E>;

impl ReconcilerError for Error {
    fn category(&self) -> &'static str {
        ErrorDiscriminants::from(self).into()
    }
}

pub fn error_policy(
    _obj: Arc<DeserializeGuard<v1alpha1::PostgresCluster>>,
    error: &Error,
    _ctx: Arc<Context>,
) -> Action {
    match error {
        // root object is invalid, will be requed when modified
        Error::InvalidPostgresCluster { .. } | Error::ValidateCluster { .. } => {
            Action::await_change()
        }
    }
}

pub async fn reconcile(
    postgres: Arc<DeserializeGuard<v1alpha1::PostgresCluster>>,
    ctx: Arc<Context>,
) -> Result<Action> {
    tracing::info!(controller = %ctx.full_controller_name, "Starting reconcile");

    let cluster = postgres
        .0
        .as_ref()
        .map_err(error_boundary::InvalidObject::clone)
        .context(InvalidPostgresClusterSnafu)?;

    let validated_cluster = validate::validate(cluster).context(ValidateClusterSnafu)?;

    let names = ClusterResourceNames::new(validated_cluster.cluster);
    for object_key in names.object_keys(DcsKind::default()) {
        tracing::debug!(%object_key, "Derived object key");
    }
    for (instance_set_name, replicas) in &validated_cluster.instance_sets {
        tracing::debug!(
            cluster = %names.cluster,
            instance_set = %instance_set_name,
            replicas = *replicas,
            "Validated instance set"
        );
    }

    Ok(Action::await_change())
}
