//! Lineage Tracker (spec §4.11, C11): arena-based parent/child graph,
//! per-edge delta/transformation inference, and cumulative health analysis.
//!
//! Node storage is an arena (`Vec<LineageNode>` + `NodeIdx(usize)`) rather
//! than `Rc<RefCell<_>>` cycles, per the Design Note referenced in §9.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sondeck_core::LineageNodeId;
use strum::{Display, EnumString};

use crate::delta::{calculate_delta, infer_transformation, DeltaSeverity, LineageMetric, MetricDelta, MetricSnapshot, TransformationInference};
use crate::errors::DataIntegrityIssue;
use crate::stage::Stage;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum NodeState {
    Raw,
    Derived,
    Final,
}

#[derive(Debug, Clone)]
pub struct LineageNode {
    pub id: LineageNodeId,
    pub parent_id: Option<LineageNodeId>,
    pub metrics: Option<MetricSnapshot>,
    pub operations: Vec<Stage>,
    pub created_at: DateTime<Utc>,
    pub sample_rate_hz: Option<u32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeIdx(pub usize);

/// Finds the duplicate ids, orphan parent references, and cycles in a
/// candidate node list, independent of whether a tree is ever built from it.
#[must_use]
pub fn validate_integrity(nodes: &[LineageNode]) -> Vec<DataIntegrityIssue> {
    let mut issues = Vec::new();

    let mut seen = std::collections::HashSet::new();
    let mut reported_duplicates = std::collections::HashSet::new();
    for node in nodes {
        if !seen.insert(node.id) && reported_duplicates.insert(node.id) {
            issues.push(DataIntegrityIssue::DuplicateId(node.id));
        }
    }

    let known_ids: std::collections::HashSet<LineageNodeId> = nodes.iter().map(|n| n.id).collect();
    for node in nodes {
        if let Some(parent) = node.parent_id {
            if !known_ids.contains(&parent) {
                issues.push(DataIntegrityIssue::OrphanParent { child: node.id, parent });
            }
        }
    }

    let by_id: HashMap<LineageNodeId, &LineageNode> = nodes.iter().map(|n| (n.id, n)).collect();
    for node in nodes {
        let mut visited = std::collections::HashSet::new();
        let mut current = node.parent_id;
        visited.insert(node.id);
        while let Some(parent_id) = current {
            if !visited.insert(parent_id) {
                issues.push(DataIntegrityIssue::Cycle(node.id));
                break;
            }
            current = by_id.get(&parent_id).and_then(|p| p.parent_id);
        }
    }

    issues
}

pub struct LineageTree {
    nodes: Vec<LineageNode>,
    index: HashMap<LineageNodeId, NodeIdx>,
    children: Vec<Vec<NodeIdx>>,
    pub roots: Vec<NodeIdx>,
}

impl LineageTree {
    #[must_use]
    pub fn node(&self, idx: NodeIdx) -> &LineageNode {
        &self.nodes[idx.0]
    }

    #[must_use]
    pub fn children_of(&self, idx: NodeIdx) -> &[NodeIdx] {
        &self.children[idx.0]
    }

    #[must_use]
    pub fn idx_of(&self, id: LineageNodeId) -> Option<NodeIdx> {
        self.index.get(&id).copied()
    }

    #[must_use]
    pub fn state_of(&self, idx: NodeIdx) -> NodeState {
        let node = self.node(idx);
        if node.parent_id.is_none() {
            NodeState::Raw
        } else if self.children_of(idx).is_empty() {
            NodeState::Final
        } else {
            NodeState::Derived
        }
    }

    fn edges(&self) -> Vec<(NodeIdx, NodeIdx)> {
        self.nodes
            .iter()
            .enumerate()
            .flat_map(|(i, _)| self.children_of(NodeIdx(i)).iter().map(move |&child| (NodeIdx(i), child)))
            .collect()
    }

    fn depth_of(&self, idx: NodeIdx) -> usize {
        let mut depth = 0;
        let mut current = self.node(idx).parent_id;
        while let Some(parent_id) = current {
            depth += 1;
            current = self.idx_of(parent_id).and_then(|i| self.node(i).parent_id);
        }
        depth
    }

    /// The longest root-to-leaf path, in chronological (root-first) order —
    /// the "main line" pattern detection walks.
    fn main_line(&self) -> Vec<NodeIdx> {
        let mut best: Vec<NodeIdx> = Vec::new();
        for &root in &self.roots {
            let mut stack = vec![(root, vec![root])];
            while let Some((idx, path)) = stack.pop() {
                let children = self.children_of(idx);
                if children.is_empty() && path.len() > best.len() {
                    best = path.clone();
                }
                for &child in children {
                    let mut next = path.clone();
                    next.push(child);
                    stack.push((child, next));
                }
            }
        }
        best
    }
}

/// Builds a lineage tree from a candidate node list, refusing to build one
/// at all when integrity validation finds duplicate ids, orphan parents, or
/// a cycle.
pub fn build_lineage_tree(nodes: Vec<LineageNode>) -> Result<LineageTree, Vec<DataIntegrityIssue>> {
    let issues = validate_integrity(&nodes);
    if !issues.is_empty() {
        return Err(issues);
    }

    let index: HashMap<LineageNodeId, NodeIdx> = nodes.iter().enumerate().map(|(i, n)| (n.id, NodeIdx(i))).collect();
    let mut children = vec![Vec::new(); nodes.len()];
    let mut roots = Vec::new();
    for (i, node) in nodes.iter().enumerate() {
        match node.parent_id {
            Some(parent_id) => children[index[&parent_id].0].push(NodeIdx(i)),
            None => roots.push(NodeIdx(i)),
        }
    }

    Ok(LineageTree { nodes, index, children, roots })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Display, EnumString)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum EdgeHealth {
    Healthy,
    Degraded,
    Concerning,
    Critical,
}

fn edge_health(deltas: &[MetricDelta]) -> EdgeHealth {
    let worst = deltas.iter().map(|d| d.severity).max().unwrap_or(DeltaSeverity::Negligible);
    match worst {
        DeltaSeverity::Negligible | DeltaSeverity::Minor => EdgeHealth::Healthy,
        DeltaSeverity::Moderate => EdgeHealth::Degraded,
        DeltaSeverity::Major => EdgeHealth::Concerning,
        DeltaSeverity::Extreme => EdgeHealth::Critical,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum LineagePattern {
    LoudnessEscalation,
    DynamicCompression,
    OscillatingChanges,
    SampleRateDegradation,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum QualityTrend {
    Improving,
    Stable,
    Degrading,
    Fluctuating,
}

pub struct EdgeReport {
    pub from: LineageNodeId,
    pub to: LineageNodeId,
    pub deltas: Vec<MetricDelta>,
    pub transformation: TransformationInference,
    pub health: EdgeHealth,
}

pub struct HealthReport {
    pub overall: EdgeHealth,
    pub edges: Vec<EdgeReport>,
    pub generations: usize,
    pub cumulative_abs_delta: HashMap<LineageMetric, f64>,
    pub per_generation_loss: Vec<f64>,
    pub patterns: Vec<LineagePattern>,
    pub trend: QualityTrend,
}

fn signed_changes(main_line: &[NodeIdx], tree: &LineageTree, metric: LineageMetric) -> Vec<f64> {
    main_line
        .windows(2)
        .filter_map(|w| {
            let parent = tree.node(w[0]).metrics.as_ref()?.get(&metric)?;
            let child = tree.node(w[1]).metrics.as_ref()?.get(&metric)?;
            Some(child - parent)
        })
        .collect()
}

fn detect_patterns(main_line: &[NodeIdx], tree: &LineageTree) -> Vec<LineagePattern> {
    let mut patterns = Vec::new();

    let loudness_changes = signed_changes(main_line, tree, LineageMetric::IntegratedLoudness);
    if !loudness_changes.is_empty() && loudness_changes.iter().all(|&c| c > 0.0) && loudness_changes.iter().sum::<f64>() > 2.0 {
        patterns.push(LineagePattern::LoudnessEscalation);
    }
    if loudness_changes.len() >= 2 {
        let flips = loudness_changes.windows(2).filter(|w| w[0].signum() != w[1].signum() && w[0] != 0.0 && w[1] != 0.0).count();
        if flips >= loudness_changes.len() - 1 {
            patterns.push(LineagePattern::OscillatingChanges);
        }
    }

    let dr_changes = signed_changes(main_line, tree, LineageMetric::DynamicRange);
    if !dr_changes.is_empty() && dr_changes.iter().all(|&c| c < 0.0) && dr_changes.iter().sum::<f64>() < -2.0 {
        patterns.push(LineagePattern::DynamicCompression);
    }

    let sample_rates: Vec<u32> = main_line.iter().filter_map(|&idx| tree.node(idx).sample_rate_hz).collect();
    if sample_rates.windows(2).any(|w| w[1] < w[0]) {
        patterns.push(LineagePattern::SampleRateDegradation);
    }

    patterns
}

fn trend_from(patterns: &[LineagePattern], total_abs_change: f64) -> QualityTrend {
    if patterns.contains(&LineagePattern::OscillatingChanges) {
        QualityTrend::Fluctuating
    } else if patterns.contains(&LineagePattern::LoudnessEscalation) || patterns.contains(&LineagePattern::DynamicCompression) || patterns.contains(&LineagePattern::SampleRateDegradation) {
        QualityTrend::Degrading
    } else if total_abs_change < 2.0 {
        QualityTrend::Stable
    } else {
        QualityTrend::Improving
    }
}

/// Walks every parent→child edge, infers its transformation and health, and
/// aggregates a cumulative health report across the whole lineage.
#[must_use]
pub fn analyze_lineage_health(tree: &LineageTree) -> HealthReport {
    let mut edges = Vec::new();
    let mut cumulative_abs_delta: HashMap<LineageMetric, f64> = HashMap::new();

    for (parent_idx, child_idx) in tree.edges() {
        let parent = tree.node(parent_idx);
        let child = tree.node(child_idx);
        let (Some(parent_metrics), Some(child_metrics)) = (&parent.metrics, &child.metrics) else { continue };

        let deltas = calculate_delta(parent_metrics, child_metrics);
        for delta in &deltas {
            *cumulative_abs_delta.entry(delta.metric).or_insert(0.0) += delta.change.abs();
        }
        let transformation = infer_transformation(&deltas);
        let health = edge_health(&deltas);

        edges.push(EdgeReport { from: parent.id, to: child.id, deltas, transformation, health });
    }

    let overall = edges.iter().map(|e| e.health).max().unwrap_or(EdgeHealth::Healthy);
    let generations = tree.nodes.iter().enumerate().map(|(i, _)| tree.depth_of(NodeIdx(i))).max().unwrap_or(0);

    let main_line = tree.main_line();
    let per_generation_loss: Vec<f64> = main_line
        .windows(2)
        .map(|w| {
            let parent = tree.node(w[0]);
            let child = tree.node(w[1]);
            match (&parent.metrics, &child.metrics) {
                (Some(p), Some(c)) => calculate_delta(p, c).iter().map(|d| d.change.abs()).sum(),
                _ => 0.0,
            }
        })
        .collect();

    let patterns = detect_patterns(&main_line, tree);
    let total_abs_change: f64 = cumulative_abs_delta.values().sum();
    let trend = trend_from(&patterns, total_abs_change);

    HealthReport { overall, edges, generations, cumulative_abs_delta, per_generation_loss, patterns, trend }
}
