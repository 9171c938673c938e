//! Cluster catalog: which commands each cluster accepts, and under which id

use super::{ClusterId, CommandShape};

/// A command a cluster server accepts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommandDescriptor {
    pub id: u8,
    pub shape: CommandShape,
}

/// A cluster and the commands it receives
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClusterDescriptor {
    pub id: ClusterId,
    pub name: String,
    pub received: Vec<CommandDescriptor>,
}

impl ClusterDescriptor {
    fn new(id: ClusterId, name: &str, received: &[(u8, CommandShape)]) -> Self {
        Self {
            id,
            name: name.to_string(),
            received: received
                .iter()
                .map(|&(id, shape)| CommandDescriptor { id, shape })
                .collect(),
        }
    }
}

/// Source of cluster definitions, consulted once when the command index is built
pub trait ClusterCatalog {
    fn clusters(&self) -> Vec<ClusterDescriptor>;
}

/// The standard home-automation clusters the coordinator knows how to drive
#[derive(Debug, Clone, Copy, Default)]
pub struct StandardCatalog;

impl ClusterCatalog for StandardCatalog {
    fn clusters(&self) -> Vec<ClusterDescriptor> {
        use CommandShape as S;

        vec![
            ClusterDescriptor::new(
                ClusterId::BASIC,
                "Basic",
                &[(0x00, S::ResetToFactoryDefaults)],
            ),
            ClusterDescriptor::new(
                ClusterId::IDENTIFY,
                "Identify",
                &[
                    (0x00, S::Identify),
                    (0x01, S::IdentifyQuery),
                    (0x40, S::TriggerEffect),
                ],
            ),
            ClusterDescriptor::new(
                ClusterId::GROUPS,
                "Groups",
                &[
                    (0x00, S::AddGroup),
                    (0x01, S::ViewGroup),
                    (0x03, S::RemoveGroup),
                    (0x04, S::RemoveAllGroups),
                ],
            ),
            ClusterDescriptor::new(
                ClusterId::SCENES,
                "Scenes",
                &[(0x04, S::StoreScene), (0x05, S::RecallScene)],
            ),
            ClusterDescriptor::new(
                ClusterId::ON_OFF,
                "OnOff",
                &[
                    (0x00, S::Off),
                    (0x01, S::On),
                    (0x02, S::Toggle),
                    (0x40, S::OffWithEffect),
                    (0x42, S::OnWithTimedOff),
                ],
            ),
            ClusterDescriptor::new(
                ClusterId::LEVEL_CONTROL,
                "LevelControl",
                &[
                    (0x00, S::MoveToLevel),
                    (0x01, S::Move),
                    (0x02, S::Step),
                    (0x03, S::Stop),
                    (0x04, S::MoveToLevelWithOnOff),
                    (0x07, S::StopWithOnOff),
                ],
            ),
            ClusterDescriptor::new(
                ClusterId::COLOR_CONTROL,
                "ColorControl",
                &[
                    (0x00, S::MoveToHue),
                    (0x03, S::MoveToSaturation),
                    (0x06, S::MoveToHueAndSaturation),
                    (0x07, S::MoveToColor),
                    (0x0a, S::MoveToColorTemperature),
                ],
            ),
        ]
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn standard_clusters_are_unique() {
        let clusters = StandardCatalog.clusters();
        let ids: HashSet<ClusterId> = clusters.iter().map(|c| c.id).collect();
        assert_eq!(ids.len(), clusters.len());
    }

    #[test]
    fn command_ids_unique_within_cluster() {
        for cluster in StandardCatalog.clusters() {
            let ids: HashSet<u8> = cluster.received.iter().map(|c| c.id).collect();
            assert_eq!(ids.len(), cluster.received.len(), "duplicate id in {}", cluster.name);
        }
    }

    #[test]
    fn names_match_well_known_ids() {
        for cluster in StandardCatalog.clusters() {
            assert_eq!(cluster.id.name(), Some(cluster.name.as_str()));
        }
    }
}
