/*
 * Copyright (c) 2021 Works Applications Co., Ltd.
 *
 * Licensed under the Apache License, Version 2.0 (the "License");
 * you may not use this file except in compliance with the License.
 * You may obtain a copy of the License at
 *
 *     http://www.apache.org/licenses/LICENSE-2.0
 *
 * Unless required by applicable law or agreed to in writing, software
 * distributed under the License is distributed on an "AS IS" BASIS,
 * WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
 * See the License for the specific language governing permissions and
 * limitations under the License.
 */

//! Maximum-weight path search over the weighted lattice.

use std::collections::HashMap;

use crate::error::{SejongError, SejongResult};
use crate::lattice::node::Node;
use crate::lattice::WeightedEdge;

/// Finds the maximum-weight path from `source` to `sink` and its cost.
///
/// Bellman-Ford relaxation in longest-path form: distances start at
/// `(min edge weight - 1) * |V|`, edges are relaxed in their given order
/// for at most `|V|` rounds with an early stop, and a round that still
/// relaxes after stabilization means a positive cycle. Relaxation uses a
/// strict comparison, so on ties the first-seen predecessor wins; with a
/// fixed edge order the result is fully deterministic.
pub fn longest_path(
    edges: &[WeightedEdge],
    source: &Node,
    sink: &Node,
) -> SejongResult<(Vec<Node>, f64)> {
    // dense ids in first-appearance order keep the relaxation loop off
    // string hashing
    let mut ids: HashMap<Node, usize> = HashMap::new();
    let mut nodes: Vec<Node> = Vec::new();
    for edge in edges {
        for node in [&edge.from, &edge.to].iter() {
            if !ids.contains_key(*node) {
                ids.insert((*node).clone(), nodes.len());
                nodes.push((*node).clone());
            }
        }
    }

    let source_id = *ids.get(source).ok_or(SejongError::EosBosDisconnect)?;
    let sink_id = *ids.get(sink).ok_or(SejongError::EosBosDisconnect)?;

    let indexed: Vec<(usize, usize, f64)> = edges
        .iter()
        .map(|edge| (ids[&edge.from], ids[&edge.to], edge.weight))
        .collect();

    let min_weight = indexed.iter().map(|&(_, _, w)| w).fold(f64::INFINITY, f64::min);
    let inf = (min_weight - 1.0) * nodes.len() as f64;

    let mut dist = vec![inf; nodes.len()];
    dist[source_id] = 0.0;
    let mut prev: Vec<Option<usize>> = vec![None; nodes.len()];

    for _ in 0..nodes.len() {
        let mut changed = false;
        for &(u, v, w) in &indexed {
            let relaxed = dist[u] + w;
            if relaxed > dist[v] {
                dist[v] = relaxed;
                prev[v] = Some(u);
                changed = true;
            }
        }
        if !changed {
            break;
        }
    }

    for &(u, v, w) in &indexed {
        if dist[u] + w > dist[v] {
            return Err(SejongError::CycleDetected);
        }
    }

    let mut path = vec![sink_id];
    let mut cursor = sink_id;
    while cursor != source_id {
        cursor = prev[cursor].ok_or(SejongError::EosBosDisconnect)?;
        path.push(cursor);
    }
    path.reverse();

    let cost = dist[sink_id];
    Ok((path.into_iter().map(|id| nodes[id].clone()).collect(), cost))
}
