//! Interchange cluster detection.
//!
//! A cluster is a group of platforms of one station that are all pairwise linked by transfers.
//! The layout draws such a group as a single circumscribed circle instead of separate lines.

use crate::network::{Graph, PlatformId, StationId};
use rustc_hash::FxHashMap;

/// Smallest clique that is drawn as a circle.
pub const MIN_CLUSTER_SIZE: usize = 3;

/// Transfer adjacency restricted to the platforms of one station.
#[derive(Debug, Clone)]
pub struct StationTransfers {
    platforms: Vec<PlatformId>,
    adjacent: Vec<Vec<bool>>,
}

impl StationTransfers {
    pub fn new(graph: &Graph, station: StationId) -> Self {
        let platforms = graph.station(station).platforms.clone();
        let local: FxHashMap<PlatformId, usize> = platforms
            .iter()
            .enumerate()
            .map(|(i, &p)| (p, i))
            .collect();
        let n = platforms.len();
        let mut adjacent = vec![vec![false; n]; n];
        for t in graph.transfers() {
            let (Some(&a), Some(&b)) = (local.get(&t.source), local.get(&t.target)) else {
                continue;
            };
            if a == b {
                continue;
            }
            adjacent[a][b] = true;
            adjacent[b][a] = true;
        }
        Self {
            platforms,
            adjacent,
        }
    }

    pub fn is_linked(&self, a: usize, b: usize) -> bool {
        self.adjacent[a][b]
    }

    /// Largest clique (Bron–Kerbosch over local indices in ascending order). Ties keep the clique
    /// found first. Local indices are returned ascending.
    fn largest_clique(&self) -> Vec<usize> {
        let n = self.platforms.len();
        let mut best = Vec::new();
        let mut current = Vec::new();
        let candidates = (0..n).collect::<Vec<_>>();
        self.expand(&mut current, candidates, Vec::new(), &mut best);
        best.sort_unstable();
        best
    }

    fn expand(
        &self,
        current: &mut Vec<usize>,
        mut candidates: Vec<usize>,
        mut excluded: Vec<usize>,
        best: &mut Vec<usize>,
    ) {
        if candidates.is_empty() {
            if excluded.is_empty() && current.len() > best.len() {
                *best = current.clone();
            }
            return;
        }
        // Prune: even taking every candidate cannot beat the incumbent.
        if current.len() + candidates.len() <= best.len() {
            return;
        }
        while let Some(&v) = candidates.first() {
            let next_candidates = candidates
                .iter()
                .copied()
                .filter(|&u| u != v && self.adjacent[v][u])
                .collect();
            let next_excluded = excluded
                .iter()
                .copied()
                .filter(|&u| self.adjacent[v][u])
                .collect();
            current.push(v);
            self.expand(current, next_candidates, next_excluded, best);
            current.pop();
            candidates.remove(0);
            excluded.push(v);
        }
    }
}

/// Finds a fully transfer-connected subset of the station's platforms with at least
/// [`MIN_CLUSTER_SIZE`] members.
///
/// Returns the largest such clique, members sorted by platform id, or `None` when the
/// station has no qualifying group (always the case for stations with fewer than three
/// platforms).
pub fn find_interchange_cluster(graph: &Graph, station: StationId) -> Option<Vec<PlatformId>> {
    if graph.station(station).platforms.len() < MIN_CLUSTER_SIZE {
        return None;
    }
    let transfers = StationTransfers::new(graph, station);
    let clique = transfers.largest_clique();
    if clique.len() < MIN_CLUSTER_SIZE {
        return None;
    }
    let mut members: Vec<PlatformId> = clique
        .into_iter()
        .map(|i| transfers.platforms[i])
        .collect();
    members.sort_unstable();
    Some(members)
}
