//! Density-based cluster engine under cosine distance.
//!
//! Two tickets are directly connected when their cosine distance is below
//! `eps`. A cluster is the transitive closure of connections anchored at
//! core points (points with at least `min_neighbors` neighbors, counting
//! themselves). Everything unreachable from a core lands in the single
//! `Noise` bucket instead of being discarded.

use tracing::debug;

use crate::embedding::cosine_distance;
use crate::error::{TriageError, TriageResult};
use crate::ticket::Ticket;

use super::{Cluster, ClusterLabel};

/// Fixed engine configuration. The thresholds are engine constants, not
/// run-time inputs.
#[derive(Debug, Clone, Copy)]
pub struct ClusterEngine {
    /// Maximum cosine distance for two tickets to be directly connected.
    eps: f32,
    /// Minimum neighborhood size (self-inclusive) for a core point.
    min_neighbors: usize,
}

impl ClusterEngine {
    pub const DEFAULT_EPS: f32 = 0.60;
    pub const DEFAULT_MIN_NEIGHBORS: usize = 3;

    pub fn new(eps: f32, min_neighbors: usize) -> Self {
        Self {
            eps,
            min_neighbors: min_neighbors.max(1),
        }
    }

    /// Group tickets into labeled clusters.
    ///
    /// Every ticket appears exactly once in the output. Deterministic for
    /// identical inputs: clusters are numbered in order of their lowest
    /// member index, and members keep ingestion order.
    pub fn cluster(
        &self,
        tickets: &[Ticket],
        embeddings: &[Vec<f32>],
    ) -> TriageResult<Vec<Cluster>> {
        if tickets.len() != embeddings.len() {
            return Err(TriageError::EmbeddingMismatch {
                tickets: tickets.len(),
                vectors: embeddings.len(),
            });
        }
        if tickets.is_empty() {
            return Ok(Vec::new());
        }

        let n = tickets.len();
        let neighbors: Vec<Vec<usize>> = (0..n)
            .map(|i| {
                (0..n)
                    .filter(|&j| cosine_distance(&embeddings[i], &embeddings[j]) < self.eps)
                    .collect()
            })
            .collect();

        const UNASSIGNED: usize = usize::MAX;
        let mut assignment = vec![UNASSIGNED; n];
        let mut next_label: u32 = 0;

        // Expand each unvisited core point into a full cluster, breadth-first.
        for seed in 0..n {
            if assignment[seed] != UNASSIGNED || neighbors[seed].len() < self.min_neighbors {
                continue;
            }

            let label = next_label as usize;
            next_label += 1;

            let mut frontier = vec![seed];
            assignment[seed] = label;

            while let Some(point) = frontier.pop() {
                // Only core points extend the closure; border points join
                // but do not recruit.
                if neighbors[point].len() < self.min_neighbors {
                    continue;
                }
                for &next in &neighbors[point] {
                    if assignment[next] == UNASSIGNED {
                        assignment[next] = label;
                        frontier.push(next);
                    }
                }
            }
        }

        let mut clusters: Vec<Cluster> = (0..next_label)
            .map(|label| Cluster {
                label: ClusterLabel::Numbered(label),
                members: Vec::new(),
            })
            .collect();
        let mut noise = Cluster {
            label: ClusterLabel::Noise,
            members: Vec::new(),
        };

        for (idx, ticket) in tickets.iter().enumerate() {
            match assignment[idx] {
                UNASSIGNED => noise.members.push(ticket.clone()),
                label => clusters[label].members.push(ticket.clone()),
            }
        }

        if !noise.members.is_empty() {
            clusters.push(noise);
        }

        debug!(
            tickets = n,
            clusters = clusters.len(),
            "clustering complete"
        );

        Ok(clusters)
    }
}

impl Default for ClusterEngine {
    fn default() -> Self {
        Self::new(Self::DEFAULT_EPS, Self::DEFAULT_MIN_NEIGHBORS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::embedding::{Embedder, HashingEmbedder};

    fn ticket(id: u64, merchant_id: u64, message: &str) -> Ticket {
        Ticket {
            id,
            merchant_id,
            message: message.to_string(),
        }
    }

    fn embed(tickets: &[Ticket]) -> Vec<Vec<f32>> {
        let messages: Vec<String> = tickets.iter().map(|t| t.message.clone()).collect();
        HashingEmbedder::default().embed(&messages).unwrap()
    }

    #[test]
    fn test_zero_tickets_yields_empty_mapping() {
        let clusters = ClusterEngine::default().cluster(&[], &[]).unwrap();
        assert!(clusters.is_empty());
    }

    #[test]
    fn test_length_mismatch_rejected() {
        let tickets = vec![ticket(1, 1, "hello world")];
        let err = ClusterEngine::default()
            .cluster(&tickets, &[])
            .unwrap_err();
        assert!(matches!(
            err,
            crate::error::TriageError::EmbeddingMismatch { .. }
        ));
    }

    #[test]
    fn test_similar_tickets_form_one_cluster() {
        let tickets = vec![
            ticket(1, 1, "500 error on checkout in production"),
            ticket(2, 2, "another 500 in production checkout"),
            ticket(3, 2, "production outage checkout 500"),
        ];
        let embeddings = embed(&tickets);
        let clusters = ClusterEngine::default()
            .cluster(&tickets, &embeddings)
            .unwrap();

        assert_eq!(clusters.len(), 1);
        assert_eq!(clusters[0].label, ClusterLabel::Numbered(0));
        assert_eq!(clusters[0].members.len(), 3);
    }

    #[test]
    fn test_unrelated_singletons_land_in_noise() {
        let tickets = vec![
            ticket(1, 1, "where can I find the API docs example for schema"),
            ticket(2, 2, "checkout button misaligned on mobile safari"),
        ];
        let embeddings = embed(&tickets);
        let clusters = ClusterEngine::default()
            .cluster(&tickets, &embeddings)
            .unwrap();

        assert_eq!(clusters.len(), 1);
        assert_eq!(clusters[0].label, ClusterLabel::Noise);
        assert_eq!(clusters[0].members.len(), 2);
    }

    #[test]
    fn test_every_ticket_appears_exactly_once() {
        let tickets = vec![
            ticket(1, 1, "500 error on checkout in production"),
            ticket(2, 2, "another 500 in production checkout"),
            ticket(3, 2, "production outage checkout 500"),
            ticket(4, 3, "how do I rotate my API keys"),
            ticket(5, 4, "webhook retry policy question"),
        ];
        let embeddings = embed(&tickets);
        let clusters = ClusterEngine::default()
            .cluster(&tickets, &embeddings)
            .unwrap();

        let mut seen: Vec<u64> = clusters
            .iter()
            .flat_map(|c| c.members.iter().map(|t| t.id))
            .collect();
        seen.sort_unstable();
        assert_eq!(seen, vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_clustering_is_deterministic() {
        let tickets = vec![
            ticket(1, 1, "500 error on checkout in production"),
            ticket(2, 2, "another 500 in production checkout"),
            ticket(3, 2, "production outage checkout 500"),
            ticket(4, 3, "how do I rotate my API keys"),
        ];
        let embeddings = embed(&tickets);
        let engine = ClusterEngine::default();

        let first = engine.cluster(&tickets, &embeddings).unwrap();
        let second = engine.cluster(&tickets, &embeddings).unwrap();

        let shape = |clusters: &[Cluster]| -> Vec<(ClusterLabel, Vec<u64>)> {
            clusters
                .iter()
                .map(|c| (c.label, c.members.iter().map(|t| t.id).collect()))
                .collect()
        };
        assert_eq!(shape(&first), shape(&second));
    }

    #[test]
    fn test_min_neighbors_one_eliminates_noise() {
        // Demo-mode configuration: every ticket seeds its own cluster, so
        // noise cannot occur.
        let tickets = vec![
            ticket(1, 1, "completely unrelated alpha"),
            ticket(2, 2, "different topic beta entirely"),
        ];
        let embeddings = embed(&tickets);
        let clusters = ClusterEngine::new(ClusterEngine::DEFAULT_EPS, 1)
            .cluster(&tickets, &embeddings)
            .unwrap();

        assert!(clusters.iter().all(|c| !c.label.is_noise()));
        let total: usize = clusters.iter().map(|c| c.members.len()).sum();
        assert_eq!(total, 2);
    }
}
