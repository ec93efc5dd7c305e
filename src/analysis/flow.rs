//! Process flow graph: activities as nodes, observed transitions as edges.

use super::timeline::case_timelines;
use crate::parser::EventLogEntry;
use crate::utils::config::FlowConfig;
use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// Inferred role of an activity in the process
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeRole {
    Start,
    End,
    Gateway,
    Activity,
}

impl NodeRole {
    /// Start and end lists win over gateway keywords
    pub fn infer(activity: &str, config: &FlowConfig) -> Self {
        if config.start_activities.iter().any(|a| a == activity) {
            NodeRole::Start
        } else if config.end_activities.iter().any(|a| a == activity) {
            NodeRole::End
        } else if config
            .gateway_keywords
            .iter()
            .any(|keyword| activity.contains(keyword.as_str()))
        {
            NodeRole::Gateway
        } else {
            NodeRole::Activity
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlowNode {
    pub id: String,
    pub label: String,

    /// Total occurrences of the activity
    pub count: usize,

    #[serde(rename = "type")]
    pub role: NodeRole,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlowEdge {
    pub source: String,
    pub target: String,

    /// Times the transition was observed
    pub count: usize,

    /// Distinct cases containing the transition at least once
    pub case_count: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProcessFlow {
    pub nodes: Vec<FlowNode>,
    pub edges: Vec<FlowEdge>,
}

impl ProcessFlow {
    pub fn node(&self, id: &str) -> Option<&FlowNode> {
        self.nodes.iter().find(|node| node.id == id)
    }

    pub fn edge(&self, source: &str, target: &str) -> Option<&FlowEdge> {
        self.edges
            .iter()
            .find(|edge| edge.source == source && edge.target == target)
    }

    /// Sum of edge counts leaving `source`
    pub fn outgoing_count(&self, source: &str) -> usize {
        self.edges
            .iter()
            .filter(|edge| edge.source == source)
            .map(|edge| edge.count)
            .sum()
    }
}

/// Build the flow graph from the raw event log
///
/// **Public** - main entry point for flow construction
///
/// # Algorithm
/// 1. Count every activity occurrence
/// 2. Group events by case and order them by timestamp
/// 3. Count each adjacent (source, target) pair, once per occurrence
///    and once per distinct case
pub fn build_process_flow(events: &[EventLogEntry], config: &FlowConfig) -> ProcessFlow {
    let mut node_index: HashMap<&str, usize> = HashMap::new();
    let mut nodes: Vec<FlowNode> = Vec::new();

    for event in events {
        let activity = event.activity.as_str();
        let idx = *node_index.entry(activity).or_insert_with(|| {
            nodes.push(FlowNode {
                id: activity.to_string(),
                label: activity.to_string(),
                count: 0,
                role: NodeRole::infer(activity, config),
            });
            nodes.len() - 1
        });
        nodes[idx].count += 1;
    }

    let mut edge_index: HashMap<(&str, &str), usize> = HashMap::new();
    let mut edges: Vec<FlowEdge> = Vec::new();

    let timelines = case_timelines(events);
    for timeline in &timelines {
        let mut seen_in_case: HashSet<usize> = HashSet::new();

        for (from, to) in timeline.transitions() {
            let key = (from.activity.as_str(), to.activity.as_str());
            let idx = *edge_index.entry(key).or_insert_with(|| {
                edges.push(FlowEdge {
                    source: key.0.to_string(),
                    target: key.1.to_string(),
                    count: 0,
                    case_count: 0,
                });
                edges.len() - 1
            });
            edges[idx].count += 1;
            if seen_in_case.insert(idx) {
                edges[idx].case_count += 1;
            }
        }
    }

    debug!(
        "Built process flow: {} nodes, {} edges from {} cases",
        nodes.len(),
        edges.len(),
        timelines.len()
    );

    ProcessFlow { nodes, edges }
}
