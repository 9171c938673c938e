//! Command identifier index
//!
//! Built once from a [`ClusterCatalog`] and read-only afterwards, so it can be
//! shared between concurrent dispatches without locking.

use std::collections::HashMap;

use crate::zcl::{ClusterCatalog, ClusterId, Command, CommandShape};

/// Maps `(cluster, command shape)` to the identifier the wire protocol expects
#[derive(Debug, Clone, Default)]
pub struct CommandIndex {
    clusters: HashMap<ClusterId, HashMap<CommandShape, u8>>,
}

impl CommandIndex {
    /// Index every inbound command of every cluster the catalog declares
    #[must_use]
    pub fn build(catalog: &dyn ClusterCatalog) -> Self {
        let mut clusters: HashMap<ClusterId, HashMap<CommandShape, u8>> = HashMap::new();

        for cluster in catalog.clusters() {
            let commands = clusters.entry(cluster.id).or_default();
            for descriptor in cluster.received {
                if let Some(previous) = commands.insert(descriptor.shape, descriptor.id) {
                    tracing::warn!(
                        cluster = %cluster.id,
                        shape = %descriptor.shape,
                        previous,
                        id = descriptor.id,
                        "catalog declares a command shape twice, keeping the last id"
                    );
                }
            }
        }

        let index = Self { clusters };
        tracing::debug!(
            clusters = index.clusters.len(),
            commands = index.len(),
            "built command index"
        );
        index
    }

    /// Resolve the identifier of `command` on `cluster`
    ///
    /// Returns `None` if the cluster is unknown or doesn't accept this command.
    #[must_use]
    pub fn lookup(&self, cluster: ClusterId, command: &Command) -> Option<u8> {
        self.lookup_shape(cluster, command.shape())
    }

    /// Resolve the identifier of a command shape on `cluster`
    #[must_use]
    pub fn lookup_shape(&self, cluster: ClusterId, shape: CommandShape) -> Option<u8> {
        self.clusters.get(&cluster)?.get(&shape).copied()
    }

    #[must_use]
    pub fn contains_cluster(&self, cluster: ClusterId) -> bool {
        self.clusters.contains_key(&cluster)
    }

    /// Total number of `(cluster, shape)` entries
    #[must_use]
    pub fn len(&self) -> usize {
        self.clusters.values().map(HashMap::len).sum()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// All entries ordered by cluster, then command id
    #[must_use]
    pub fn entries(&self) -> Vec<(ClusterId, CommandShape, u8)> {
        let mut entries: Vec<_> = self
            .clusters
            .iter()
            .flat_map(|(&cluster, commands)| {
                commands.iter().map(move |(&shape, &id)| (cluster, shape, id))
            })
            .collect();
        entries.sort_by_key(|&(cluster, shape, id)| (cluster, id, shape));
        entries
    }
}
