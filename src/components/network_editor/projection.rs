//! Derivation of the simulation-request network from the live graph.
//!
//! External ids are never stored: every call numbers nodes and channels
//! densely from 1 in iteration order.

use std::collections::HashMap;

use log::warn;
use serde::{Deserialize, Serialize};

use super::types::{Edge, FiberType, Node, NodeHandle, Protocol};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NodePayload {
	pub id: u32,
	pub detector_efficiency: f64,
	pub dark_count_rate: f64,
	pub mu: f64,
	pub num_pulses: u64,
	pub pulse_repetition_rate: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ChannelPayload {
	pub id: u32,
	pub from: u32,
	pub to: u32,
	pub fiber_length_km: f64,
	pub fiber_attenuation_db_per_km: f64,
	pub wavelength_nm: f64,
	pub fiber_type: FiberType,
	pub phase_flip_prob: f64,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub bit_flip_error_prob: Option<f64>,
}

/// The `{nodes, channels}` part of a simulation request.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct NetworkPayload {
	/// Parties, ids `1..=n` in store order.
	pub nodes: Vec<NodePayload>,
	/// Channels, ids `1..=m` in store order, endpoints as node ids.
	pub channels: Vec<ChannelPayload>,
}

pub fn project(nodes: &[Node], edges: &[Edge], protocol: Protocol) -> NetworkPayload {
	let ids: HashMap<NodeHandle, u32> = nodes
		.iter()
		.zip(1..)
		.map(|(node, id)| (node.handle, id))
		.collect();

	let nodes = nodes
		.iter()
		.zip(1..)
		.map(|(node, id)| NodePayload {
			id,
			detector_efficiency: node.params.detector_efficiency,
			dark_count_rate: node.params.dark_count_rate,
			mu: node.params.mu,
			num_pulses: node.params.num_pulses,
			pulse_repetition_rate: node.params.pulse_repetition_rate,
		})
		.collect();

	let channels = edges
		.iter()
		.filter_map(|edge| match (ids.get(&edge.source), ids.get(&edge.target)) {
			(Some(&from), Some(&to)) => Some((edge, from, to)),
			_ => {
				warn!("channel {} has a dead endpoint, skipped", edge.handle);
				None
			}
		})
		.zip(1..)
		.map(|((edge, from, to), id)| {
			let fiber = edge.params.fiber();
			ChannelPayload {
				id,
				from,
				to,
				fiber_length_km: fiber.fiber_length_km,
				fiber_attenuation_db_per_km: fiber.fiber_attenuation_db_per_km,
				wavelength_nm: fiber.wavelength_nm,
				fiber_type: fiber.fiber_type,
				phase_flip_prob: fiber.phase_flip_prob,
				bit_flip_error_prob: edge.params.bit_flip_error_prob_for(protocol),
			}
		})
		.collect();

	NetworkPayload { nodes, channels }
}

#[cfg(test)]
mod tests {
	use serde_json::json;

	use super::*;
	use crate::components::network_editor::graph::GraphStore;

	#[test]
	fn channel_wire_shape() {
		let mut store = GraphStore::seeded();
		let (a, b) = (store.nodes()[0].handle, store.nodes()[1].handle);
		store.connect(b, a, Protocol::Dps);

		let payload = project(store.nodes(), store.edges(), Protocol::Dps);
		assert_eq!(
			serde_json::to_value(&payload.channels[0]).unwrap(),
			json!({
				"id": 1,
				"from": 2,
				"to": 1,
				"fiber_length_km": 10.0,
				"fiber_attenuation_db_per_km": 0.2,
				"wavelength_nm": 1550.0,
				"fiber_type": "standard_single_mode",
				"phase_flip_prob": 0.05
			})
		);
		assert_eq!(
			serde_json::to_value(&payload.nodes[1]).unwrap(),
			json!({
				"id": 2,
				"detector_efficiency": 0.9,
				"dark_count_rate": 1e-8,
				"mu": 0.2,
				"num_pulses": 10000,
				"pulse_repetition_rate": 1.0
			})
		);
	}

	#[test]
	fn ids_are_dense_after_removal() {
		let mut store = GraphStore::seeded();
		let c = store.add_node();
		let d = store.add_node();
		let b = store.nodes()[1].handle;
		store.connect(c, d, Protocol::Dps);
		store.connect(d, c, Protocol::Dps);
		store.remove_node(b);

		let payload = project(store.nodes(), store.edges(), Protocol::Dps);
		let ids: Vec<_> = payload.nodes.iter().map(|n| n.id).collect();
		assert_eq!(ids, vec![1, 2, 3]);
		let ends: Vec<_> = payload.channels.iter().map(|c| (c.id, c.from, c.to)).collect();
		assert_eq!(ends, vec![(1, 2, 3), (2, 3, 2)]);
	}

	#[test]
	fn projection_is_stable_without_mutation() {
		let mut store = GraphStore::seeded();
		let (a, b) = (store.nodes()[0].handle, store.nodes()[1].handle);
		store.connect(a, b, Protocol::Cow);
		let first = project(store.nodes(), store.edges(), Protocol::Cow);
		let second = project(store.nodes(), store.edges(), Protocol::Cow);
		assert_eq!(first, second);
	}

	#[test]
	fn bit_flip_is_projected_only_under_cow() {
		let mut store = GraphStore::seeded();
		let (a, b) = (store.nodes()[0].handle, store.nodes()[1].handle);
		store.connect(a, b, Protocol::Dps);
		store.connect(a, b, Protocol::Cow);

		let dps = project(store.nodes(), store.edges(), Protocol::Dps);
		assert!(dps.channels.iter().all(|c| c.bit_flip_error_prob.is_none()));
		let json = serde_json::to_string(&dps).unwrap();
		assert!(!json.contains("bit_flip_error_prob"));

		let cow = project(store.nodes(), store.edges(), Protocol::Cow);
		assert!(cow.channels.iter().all(|c| c.bit_flip_error_prob == Some(0.05)));
	}

	#[test]
	fn dangling_channel_is_skipped_without_gaps() {
		let store = GraphStore::seeded();
		let (a, b) = (store.nodes()[0].handle, store.nodes()[1].handle);
		let mut edges = Vec::new();
		for (source, target) in [(a, b), (a, NodeHandle::new()), (b, a)] {
			edges.push(Edge {
				handle: Default::default(),
				source,
				target,
				params: crate::components::network_editor::types::ChannelParams::defaults_for(Protocol::Dps),
			});
		}
		let payload = project(store.nodes(), &edges, Protocol::Dps);
		let ids: Vec<_> = payload.channels.iter().map(|c| c.id).collect();
		assert_eq!(ids, vec![1, 2]);
	}
}
